//! チャネル流れのストークス方程式（運動量 + 連続の式）。
//!
//! 場の変数は速度 ux・uy と圧力 p、空間変数は x・y です。
//!
//! ```text
//! ν∇²uᵢ − ∂p/∂xᵢ = 0     (x, y) ∈ [−2,2] × [−1,1]   (運動量)
//! ∇·u = 0                                            (連続)
//! ux = uy = 0             y = ±1（壁）
//! ux = 2(1 − y²)          x = −2（流入）
//! p = 0                   x = 2（流出）
//! ```
//!
//! 解析解はポアズイユ流 ux = 2(1 − y²), uy = 0, p = 4ν(2 − x) です。

use std::collections::BTreeMap;

use burn::tensor::Tensor;

use crate::condition::Condition;
use crate::domain::CartesianDomain;
use crate::equation::{Equation, SystemEquation};
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::operators;
use crate::problem::Problem;

const UX: usize = 0;
const UY: usize = 1;
const P: usize = 2;

/// ストークス流れの問題定義。
pub struct Stokes {
    nu: f32,
    conditions: BTreeMap<String, Condition>,
}

impl Stokes {
    /// 動粘性係数 ν を指定して問題を作ります。
    pub fn new(nu: f32) -> Self {
        let mut conditions = BTreeMap::new();

        // 壁では速度が 0（滑りなし）。
        let walls = [
            ("gamma_top", CartesianDomain::new().range("x", -2.0, 2.0).fixed("y", 1.0)),
            ("gamma_bot", CartesianDomain::new().range("x", -2.0, 2.0).fixed("y", -1.0)),
        ];
        for (name, location) in walls {
            conditions.insert(
                name.to_string(),
                Condition::new(
                    location,
                    Equation::new(|net, pts| {
                        let ux = operators::output(net, pts, UX)?;
                        let uy = operators::output(net, pts, UY)?;
                        Ok(Tensor::cat(vec![ux, uy], 1))
                    }),
                ),
            );
        }

        // 流入速度は放物線プロファイル ux = 2(1 − y²)。
        conditions.insert(
            "gamma_in".to_string(),
            Condition::new(
                CartesianDomain::new().fixed("x", -2.0).range("y", -1.0, 1.0),
                Equation::new(|net, pts| {
                    let ux = operators::output(net, pts, UX)?;
                    let y = pts.column("y")?.inner().inner();
                    let profile = (-(y.clone() * y)).add_scalar(1.0).mul_scalar(2.0);
                    Ok(ux - profile)
                }),
            ),
        );

        // 流出では圧力を 0 に固定する。
        conditions.insert(
            "gamma_out".to_string(),
            Condition::new(
                CartesianDomain::new().fixed("x", 2.0).range("y", -1.0, 1.0),
                Equation::new(|net, pts| operators::output(net, pts, P)),
            ),
        );

        // 内部では運動量 2 成分と連続の式を連立させる。
        let momentum = |component: usize, var: &'static str| {
            Equation::new(move |net: &dyn crate::model::Network, pts: &LabelTensor| {
                let nabla_u = operators::laplacian(net, pts, component, &["x", "y"])?;
                let p_grad = operators::grad(net, pts, P, &[var])?;
                Ok(nabla_u.mul_scalar(nu) - p_grad)
            })
        };
        conditions.insert(
            "D".to_string(),
            Condition::new(
                CartesianDomain::new().range("x", -2.0, 2.0).range("y", -1.0, 1.0),
                SystemEquation::new(vec![
                    momentum(UX, "x"),
                    momentum(UY, "y"),
                    Equation::new(|net, pts| {
                        operators::div(net, pts, &[UX, UY], &["x", "y"])
                    }),
                ]),
            ),
        );

        Self { nu, conditions }
    }
}

impl Problem for Stokes {
    fn output_variables(&self) -> Vec<String> {
        vec!["ux".to_string(), "uy".to_string(), "p".to_string()]
    }

    fn domain(&self) -> CartesianDomain {
        CartesianDomain::new().range("x", -2.0, 2.0).range("y", -1.0, 1.0)
    }

    fn conditions(&self) -> &BTreeMap<String, Condition> {
        &self.conditions
    }

    fn truth_solution(&self, pts: &LabelTensor) -> Result<Option<LabelTensor>, PinnError> {
        let x = pts.column("x")?;
        let y = pts.column("y")?;
        let ux = (-(y.clone() * y)).add_scalar(1.0).mul_scalar(2.0);
        let uy = x.zeros_like();
        let p = (-x).add_scalar(2.0).mul_scalar(4.0 * self.nu);
        Ok(Some(LabelTensor::new(
            Tensor::cat(vec![ux, uy, p], 1),
            &["ux", "uy", "p"],
        )?))
    }

    // 定常問題なので時間領域は持たない。
    fn spatial_domain(&self) -> Option<CartesianDomain> {
        Some(self.domain())
    }
}
