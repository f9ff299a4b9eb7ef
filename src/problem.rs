//! 問題を表すトレイト群。

use std::collections::BTreeMap;

use crate::condition::Condition;
use crate::domain::CartesianDomain;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;

/// PINN で解く問題の宣言的な定義。
///
/// 問題は入力変数の領域、出力変数、そして名前付きの条件の集合から
/// なります。学習そのものは扱いません。
pub trait Problem {
    /// 出力変数（ネットワーク出力の列に対応、定義順）。
    fn output_variables(&self) -> Vec<String>;

    /// 入力変数全体の領域（時間依存の問題なら空間領域と時間領域の結合）。
    fn domain(&self) -> CartesianDomain;

    /// 名前付きの条件の集合。
    fn conditions(&self) -> &BTreeMap<String, Condition>;

    /// 入力変数（領域の定義順）。
    fn input_variables(&self) -> Vec<String> {
        self.domain().variables()
    }

    /// 解析解があれば、与えた点での値を返します。
    ///
    /// 返り値のラベルは `output_variables` と同じです。
    fn truth_solution(&self, _pts: &LabelTensor) -> Result<Option<LabelTensor>, PinnError> {
        Ok(None)
    }

    /// 空間変数の領域。空間領域を持たない問題は `None` を返します。
    fn spatial_domain(&self) -> Option<CartesianDomain> {
        None
    }

    /// 時間変数の領域。定常問題は `None` を返します。
    fn temporal_domain(&self) -> Option<CartesianDomain> {
        None
    }
}
