//! 問題とネットワークを束ねる PINN 本体。
//!
//! 条件ごとのサンプリング点を保持し、各条件の方程式の残差を評価します。
//! 残差の二乗平均が、学習側で最小化されるべき損失になります。

use std::collections::BTreeMap;

use burn::tensor::Tensor;

use crate::BaseBackend;
use crate::domain::SampleMode;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::model::Network;
use crate::problem::Problem;

/// 問題定義・ネットワーク・サンプリング点の組。
pub struct Pinn<P: Problem> {
    /// 解きたい問題。
    pub problem: P,
    /// 座標を物理量に写すネットワーク。
    pub model: Box<dyn Network>,
    /// 条件名ごとのサンプリング点。`sample_points` が設定します。
    pub input_pts: BTreeMap<String, LabelTensor>,
}

impl<P: Problem> Pinn<P> {
    /// 問題とネットワークから PINN を作ります。点は未サンプリングです。
    pub fn new(problem: P, model: Box<dyn Network>) -> Self {
        Self {
            problem,
            model,
            input_pts: BTreeMap::new(),
        }
    }

    /// すべての条件の位置から点をサンプリングします。
    ///
    /// 列の順序は問題の入力変数の順序に揃えます。条件の位置に入力変数の
    /// いずれかが欠けている場合はエラーになります。
    pub fn sample_points(&mut self, n: usize, mode: SampleMode) -> Result<(), PinnError> {
        let vars = self.problem.input_variables();
        let mut input_pts = BTreeMap::new();
        for (name, condition) in self.problem.conditions() {
            let pts = condition.location.sample(n, mode, Some(&vars))?;
            input_pts.insert(name.clone(), pts);
        }
        self.input_pts = input_pts;
        Ok(())
    }

    /// 条件ごとの残差を評価します。
    ///
    /// 先に `sample_points` を呼んでいない条件があるとエラーになります。
    pub fn residuals(&self) -> Result<BTreeMap<String, Tensor<BaseBackend, 2>>, PinnError> {
        let mut residuals = BTreeMap::new();
        for (name, condition) in self.problem.conditions() {
            let pts = self
                .input_pts
                .get(name)
                .ok_or_else(|| PinnError::PointsNotSampled(name.clone()))?;
            let r = condition.equation.residual(self.model.as_ref(), pts)?;
            residuals.insert(name.clone(), r);
        }
        Ok(residuals)
    }

    /// 条件ごとの残差の二乗平均（MSE）を返します。
    pub fn condition_losses(&self) -> Result<BTreeMap<String, f32>, PinnError> {
        let mut losses = BTreeMap::new();
        for (name, residual) in self.residuals()? {
            let mse = residual.powf_scalar(2.0).mean().into_scalar();
            losses.insert(name, mse);
        }
        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diff2Backend;
    use crate::condition::Condition;
    use crate::domain::CartesianDomain;
    use crate::equation::Equation;
    use crate::operators;

    struct Line(BTreeMap<String, Condition>);

    impl Problem for Line {
        fn output_variables(&self) -> Vec<String> {
            vec!["u".to_string()]
        }

        fn domain(&self) -> CartesianDomain {
            CartesianDomain::new().range("x", 0.0, 1.0)
        }

        fn conditions(&self) -> &BTreeMap<String, Condition> {
            &self.0
        }
    }

    struct Zero;

    impl Network for Zero {
        fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2> {
            input.zeros_like()
        }
    }

    fn line() -> Line {
        let mut conditions = BTreeMap::new();
        conditions.insert(
            "interior".to_string(),
            Condition::new(
                CartesianDomain::new().range("x", 0.0, 1.0),
                Equation::new(|net, pts| {
                    Ok(operators::output(net, pts, 0)?.sub_scalar(1.0))
                }),
            ),
        );
        conditions.insert(
            "origin".to_string(),
            Condition::new(
                CartesianDomain::new().fixed("x", 0.0),
                Equation::new(|net, pts| operators::output(net, pts, 0)),
            ),
        );
        Line(conditions)
    }

    #[test]
    fn sample_points_covers_every_condition() {
        let mut pinn = Pinn::new(line(), Box::new(Zero));
        pinn.sample_points(10, SampleMode::Random).unwrap();
        assert_eq!(pinn.input_pts.len(), 2);
        assert_eq!(pinn.input_pts["interior"].tensor().dims(), [10, 1]);
        assert_eq!(pinn.input_pts["origin"].tensor().dims(), [10, 1]);
    }

    #[test]
    fn residuals_require_sampled_points() {
        let pinn = Pinn::new(line(), Box::new(Zero));
        assert!(matches!(
            pinn.residuals(),
            Err(PinnError::PointsNotSampled(_))
        ));
    }

    #[test]
    fn condition_losses_are_mean_squared_residuals() {
        let mut pinn = Pinn::new(line(), Box::new(Zero));
        pinn.sample_points(10, SampleMode::Random).unwrap();
        let losses = pinn.condition_losses().unwrap();
        // ゼロ解なので interior の残差は常に -1、origin は 0。
        assert!((losses["interior"] - 1.0).abs() < 1e-6);
        assert!(losses["origin"].abs() < 1e-6);
    }
}
