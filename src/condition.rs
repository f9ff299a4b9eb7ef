//! 条件: サンプリング位置と、そこで満たすべき方程式の組。

use crate::domain::CartesianDomain;
use crate::equation::Residual;

/// 問題を構成する 1 つの条件。
///
/// `location` からサンプリングした点の上で `equation` の残差を評価します。
/// 境界条件なら位置の一部の変数が固定値になり、支配方程式なら領域全体が
/// 位置になります。
pub struct Condition {
    /// 点をサンプリングする領域。
    pub location: CartesianDomain,
    /// この位置で満たすべき方程式。
    pub equation: Box<dyn Residual>,
}

impl Condition {
    /// 位置と方程式から条件を作ります。
    pub fn new(location: CartesianDomain, equation: impl Residual + 'static) -> Self {
        Self {
            location,
            equation: Box::new(equation),
        }
    }
}
