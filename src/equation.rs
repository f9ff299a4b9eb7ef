//! 方程式（残差関数）の表現。

use crate::BaseBackend;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::model::Network;
use burn::tensor::Tensor;

/// 残差関数の型。
///
/// サンプリング点上でネットワークを評価し、0 になるべき値（残差）を
/// 返します。多成分の残差は n×k のテンソルで返して構いません。
pub type ResidualFn =
    Box<dyn Fn(&dyn Network, &LabelTensor) -> Result<Tensor<BaseBackend, 2>, PinnError> + Send + Sync>;

/// 残差を評価できるもの。
pub trait Residual: Send + Sync {
    /// 与えられた点の上で残差を評価します。
    fn residual(
        &self,
        net: &dyn Network,
        pts: &LabelTensor,
    ) -> Result<Tensor<BaseBackend, 2>, PinnError>;
}

/// 単一の残差関数をラップした方程式。
pub struct Equation {
    residual: ResidualFn,
}

impl Equation {
    /// 残差関数から方程式を作ります。
    pub fn new(
        residual: impl Fn(&dyn Network, &LabelTensor) -> Result<Tensor<BaseBackend, 2>, PinnError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            residual: Box::new(residual),
        }
    }
}

impl Residual for Equation {
    fn residual(
        &self,
        net: &dyn Network,
        pts: &LabelTensor,
    ) -> Result<Tensor<BaseBackend, 2>, PinnError> {
        (self.residual)(net, pts)
    }
}

/// 複数の方程式をまとめた連立方程式。
///
/// 残差は各方程式の残差を列方向に連結したものになります。
pub struct SystemEquation {
    equations: Vec<Equation>,
}

impl SystemEquation {
    /// 方程式の列から連立方程式を作ります。
    pub fn new(equations: Vec<Equation>) -> Self {
        Self { equations }
    }
}

impl Residual for SystemEquation {
    fn residual(
        &self,
        net: &dyn Network,
        pts: &LabelTensor,
    ) -> Result<Tensor<BaseBackend, 2>, PinnError> {
        if self.equations.is_empty() {
            return Err(PinnError::DimensionMismatch {
                components: 0,
                variables: 0,
            });
        }
        let residuals: Vec<Tensor<BaseBackend, 2>> = self
            .equations
            .iter()
            .map(|eq| eq.residual(net, pts))
            .collect::<Result<_, _>>()?;
        Ok(Tensor::cat(residuals, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diff2Backend;
    use crate::operators;

    struct Identity;

    impl Network for Identity {
        fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2> {
            input
        }
    }

    fn points() -> LabelTensor {
        let device = Default::default();
        let tensor =
            Tensor::<Diff2Backend, 1>::from_floats([1.0, 2.0, 3.0, 4.0].as_slice(), &device)
                .reshape([2, 2]);
        LabelTensor::new(tensor, &["x", "y"]).unwrap()
    }

    #[test]
    fn equation_evaluates_its_residual() {
        let eq = Equation::new(|net, pts| operators::output(net, pts, 0));
        let r = eq.residual(&Identity, &points()).unwrap();
        assert_eq!(r.dims(), [2, 1]);
        assert_eq!(r.into_data().to_vec::<f32>().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn system_concatenates_member_residuals() {
        let system = SystemEquation::new(vec![
            Equation::new(|net, pts| operators::output(net, pts, 0)),
            Equation::new(|net, pts| operators::output(net, pts, 1)),
        ]);
        let r = system.residual(&Identity, &points()).unwrap();
        assert_eq!(r.dims(), [2, 2]);
        assert_eq!(
            r.into_data().to_vec::<f32>().unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn empty_system_is_an_error() {
        let system = SystemEquation::new(vec![]);
        assert!(system.residual(&Identity, &points()).is_err());
    }
}
