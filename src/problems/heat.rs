//! 2 次元の熱方程式。
//!
//! 場の変数 u、空間変数 x・y、時間変数 t について
//!
//! ```text
//! ∂u/∂t = α ∇²u          (x, y) ∈ [0,1]², t ∈ [0,1]
//! u = 0                   4 辺の壁
//! u = sin(πx) sin(πy)     t = 0
//! ```
//!
//! を課します。解析解は u = sin(πx) sin(πy) exp(−2π²αt) です。

use std::collections::BTreeMap;
use std::f32::consts::PI;

use crate::condition::Condition;
use crate::domain::CartesianDomain;
use crate::equation::Equation;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::operators;
use crate::problem::Problem;

/// 熱方程式の問題定義。
pub struct Heat {
    alpha: f32,
    conditions: BTreeMap<String, Condition>,
}

impl Heat {
    /// 拡散係数 α を指定して問題を作ります。
    pub fn new(alpha: f32) -> Self {
        let mut conditions = BTreeMap::new();

        // 4 辺の壁はすべて u = 0。
        let walls = [
            ("gamma_left", CartesianDomain::new().fixed("x", 0.0).range("y", 0.0, 1.0)),
            ("gamma_right", CartesianDomain::new().fixed("x", 1.0).range("y", 0.0, 1.0)),
            ("gamma_bot", CartesianDomain::new().range("x", 0.0, 1.0).fixed("y", 0.0)),
            ("gamma_top", CartesianDomain::new().range("x", 0.0, 1.0).fixed("y", 1.0)),
        ];
        for (name, location) in walls {
            conditions.insert(
                name.to_string(),
                Condition::new(
                    location.range("t", 0.0, 1.0),
                    Equation::new(|net, pts| operators::output(net, pts, 0)),
                ),
            );
        }

        // 初期条件 u(x, y, 0) = sin(πx) sin(πy)。
        conditions.insert(
            "t0".to_string(),
            Condition::new(
                CartesianDomain::new()
                    .range("x", 0.0, 1.0)
                    .range("y", 0.0, 1.0)
                    .fixed("t", 0.0),
                Equation::new(|net, pts| {
                    let u = operators::output(net, pts, 0)?;
                    let x = pts.column("x")?.inner().inner();
                    let y = pts.column("y")?.inner().inner();
                    let initial = x.mul_scalar(PI).sin() * y.mul_scalar(PI).sin();
                    Ok(u - initial)
                }),
            ),
        );

        // 支配方程式 α∇²u − ∂u/∂t = 0。
        conditions.insert(
            "D".to_string(),
            Condition::new(
                CartesianDomain::new()
                    .range("x", 0.0, 1.0)
                    .range("y", 0.0, 1.0)
                    .range("t", 0.0, 1.0),
                Equation::new(move |net, pts| {
                    let u_t = operators::grad(net, pts, 0, &["t"])?;
                    let nabla_u = operators::laplacian(net, pts, 0, &["x", "y"])?;
                    Ok(nabla_u.mul_scalar(alpha) - u_t)
                }),
            ),
        );

        Self { alpha, conditions }
    }
}

impl Problem for Heat {
    fn output_variables(&self) -> Vec<String> {
        vec!["u".to_string()]
    }

    fn domain(&self) -> CartesianDomain {
        CartesianDomain::new()
            .range("x", 0.0, 1.0)
            .range("y", 0.0, 1.0)
            .range("t", 0.0, 1.0)
    }

    fn conditions(&self) -> &BTreeMap<String, Condition> {
        &self.conditions
    }

    fn truth_solution(&self, pts: &LabelTensor) -> Result<Option<LabelTensor>, PinnError> {
        let x = pts.column("x")?;
        let y = pts.column("y")?;
        let t = pts.column("t")?;
        let u = x.mul_scalar(PI).sin()
            * y.mul_scalar(PI).sin()
            * t.mul_scalar(-2.0 * PI * PI * self.alpha).exp();
        Ok(Some(LabelTensor::new(u, &["u"])?))
    }

    fn spatial_domain(&self) -> Option<CartesianDomain> {
        Some(CartesianDomain::new().range("x", 0.0, 1.0).range("y", 0.0, 1.0))
    }

    fn temporal_domain(&self) -> Option<CartesianDomain> {
        Some(CartesianDomain::new().range("t", 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diff2Backend;
    use crate::domain::SampleMode;
    use crate::model::Network;
    use crate::pinn::Pinn;
    use burn::tensor::Tensor;

    /// 解析解をそのまま順伝播するネットワーク。
    struct TruthNet {
        alpha: f32,
    }

    impl Network for TruthNet {
        fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2> {
            let n = input.dims()[0];
            let x = input.clone().slice([0..n, 0..1]);
            let y = input.clone().slice([0..n, 1..2]);
            let t = input.slice([0..n, 2..3]);
            x.mul_scalar(PI).sin()
                * y.mul_scalar(PI).sin()
                * t.mul_scalar(-2.0 * PI * PI * self.alpha).exp()
        }
    }

    #[test]
    fn conditions_cover_walls_initial_and_interior() {
        let heat = Heat::new(0.1);
        let names: Vec<&String> = heat.conditions().keys().collect();
        assert_eq!(
            names,
            vec!["D", "gamma_bot", "gamma_left", "gamma_right", "gamma_top", "t0"]
        );
        assert_eq!(heat.input_variables(), vec!["x", "y", "t"]);
    }

    #[test]
    fn truth_solution_satisfies_every_condition() {
        let alpha = 0.1;
        let mut pinn = Pinn::new(Heat::new(alpha), Box::new(TruthNet { alpha }));
        pinn.sample_points(20, SampleMode::LatinHypercube).unwrap();
        let losses = pinn.condition_losses().unwrap();
        for (name, loss) in losses {
            assert!(loss < 1e-3, "条件 {name} の残差 MSE が大きすぎる: {loss}");
        }
    }

    #[test]
    fn spatial_and_temporal_domains_partition_the_inputs() {
        let heat = Heat::new(0.1);
        let spatial = heat.spatial_domain().unwrap();
        let temporal = heat.temporal_domain().unwrap();
        assert_eq!(spatial.variables(), vec!["x", "y"]);
        assert_eq!(temporal.variables(), vec!["t"]);
        let merged = spatial.merge(&temporal).unwrap();
        assert_eq!(merged.variables(), heat.input_variables());
    }

    #[test]
    fn truth_solution_decays_in_time() {
        let heat = Heat::new(0.1);
        let device = Default::default();
        let pts = LabelTensor::new(
            Tensor::<Diff2Backend, 1>::from_floats(
                [0.5, 0.5, 0.0, 0.5, 0.5, 1.0].as_slice(),
                &device,
            )
            .reshape([2, 3]),
            &["x", "y", "t"],
        )
        .unwrap();
        let truth = heat.truth_solution(&pts).unwrap().unwrap();
        let values = truth.values_vec().unwrap();
        assert!((values[0] - 1.0).abs() < 1e-5);
        assert!(values[1] < values[0]);
    }
}
