//! 1 次元の移流方程式。
//!
//! 場の変数 u、空間変数 x、時間変数 t について
//!
//! ```text
//! ∂u/∂t + c ∂u/∂x = 0     x ∈ [−1,1], t ∈ [0,1]
//! u = sin(πx)             t = 0
//! u = sin(πct)            x = −1（流入境界）
//! ```
//!
//! を課します。解析解は u = sin(π(x − ct)) です。

use std::collections::BTreeMap;
use std::f32::consts::PI;

use crate::condition::Condition;
use crate::domain::CartesianDomain;
use crate::equation::Equation;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::operators;
use crate::problem::Problem;

/// 移流方程式の問題定義。
pub struct Advection {
    speed: f32,
    conditions: BTreeMap<String, Condition>,
}

impl Advection {
    /// 移流速度 c を指定して問題を作ります。
    pub fn new(speed: f32) -> Self {
        let mut conditions = BTreeMap::new();

        // 初期条件 u(x, 0) = sin(πx)。
        conditions.insert(
            "t0".to_string(),
            Condition::new(
                CartesianDomain::new().range("x", -1.0, 1.0).fixed("t", 0.0),
                Equation::new(|net, pts| {
                    let u = operators::output(net, pts, 0)?;
                    let x = pts.column("x")?.inner().inner();
                    Ok(u - x.mul_scalar(PI).sin())
                }),
            ),
        );

        // 流入境界 u(−1, t) = sin(πct)。
        conditions.insert(
            "gamma_in".to_string(),
            Condition::new(
                CartesianDomain::new().fixed("x", -1.0).range("t", 0.0, 1.0),
                Equation::new(move |net, pts| {
                    let u = operators::output(net, pts, 0)?;
                    let t = pts.column("t")?.inner().inner();
                    Ok(u - t.mul_scalar(PI * speed).sin())
                }),
            ),
        );

        // 支配方程式 ∂u/∂t + c ∂u/∂x = 0。
        conditions.insert(
            "D".to_string(),
            Condition::new(
                CartesianDomain::new().range("x", -1.0, 1.0).range("t", 0.0, 1.0),
                Equation::new(move |net, pts| {
                    let u_t = operators::grad(net, pts, 0, &["t"])?;
                    let u_x = operators::grad(net, pts, 0, &["x"])?;
                    Ok(u_t + u_x.mul_scalar(speed))
                }),
            ),
        );

        Self { speed, conditions }
    }
}

impl Problem for Advection {
    fn output_variables(&self) -> Vec<String> {
        vec!["u".to_string()]
    }

    fn domain(&self) -> CartesianDomain {
        CartesianDomain::new().range("x", -1.0, 1.0).range("t", 0.0, 1.0)
    }

    fn conditions(&self) -> &BTreeMap<String, Condition> {
        &self.conditions
    }

    fn truth_solution(&self, pts: &LabelTensor) -> Result<Option<LabelTensor>, PinnError> {
        let x = pts.column("x")?;
        let t = pts.column("t")?;
        let u = (x - t.mul_scalar(self.speed)).mul_scalar(PI).sin();
        Ok(Some(LabelTensor::new(u, &["u"])?))
    }

    fn spatial_domain(&self) -> Option<CartesianDomain> {
        Some(CartesianDomain::new().range("x", -1.0, 1.0))
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

    /// 解析解 u = sin(π(x − ct)) をそのまま順伝播するネットワーク。
    struct TruthNet {
        speed: f32,
    }

    impl Network for TruthNet {
        fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2> {
            let n = input.dims()[0];
            let x = input.clone().slice([0..n, 0..1]);
            let t = input.slice([0..n, 1..2]);
            (x - t.mul_scalar(self.speed)).mul_scalar(PI).sin()
        }
    }

    #[test]
    fn truth_solution_satisfies_every_condition() {
        let speed = 1.0;
        let mut pinn = Pinn::new(Advection::new(speed), Box::new(TruthNet { speed }));
        pinn.sample_points(50, SampleMode::Random).unwrap();
        let losses = pinn.condition_losses().unwrap();
        for (name, loss) in losses {
            assert!(loss < 1e-3, "条件 {name} の残差 MSE が大きすぎる: {loss}");
        }
    }

    #[test]
    fn truth_solution_matches_initial_profile() {
        let advection = Advection::new(1.0);
        let device = Default::default();
        let pts = LabelTensor::new(
            Tensor::<Diff2Backend, 1>::from_floats([0.5, 0.0].as_slice(), &device)
                .reshape([1, 2]),
            &["x", "t"],
        )
        .unwrap();
        let truth = advection.truth_solution(&pts).unwrap().unwrap();
        let values = truth.values_vec().unwrap();
        assert!((values[0] - 1.0).abs() < 1e-6);
    }
}
