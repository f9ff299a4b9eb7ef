//! 列ラベル付きテンソル。
//!
//! 入力点（座標）やネットワーク出力を、`x` や `u` といった変数名で
//! 列を選択できる形で持ち回るためのラッパーです。

use crate::Diff2Backend;
use crate::error::PinnError;
use burn::tensor::Tensor;

/// 列ごとに変数名ラベルを持つ 2 次元テンソル。
///
/// 行がサンプル点、列が変数に対応します。ラベル数は常に列数と一致します。
#[derive(Clone, Debug)]
pub struct LabelTensor {
    tensor: Tensor<Diff2Backend, 2>,
    labels: Vec<String>,
}

impl LabelTensor {
    /// テンソルとラベルから新しい `LabelTensor` を作ります。
    ///
    /// ラベル数が列数と一致しない場合、またはラベルが重複している場合は
    /// エラーになります。
    pub fn new<S: AsRef<str>>(
        tensor: Tensor<Diff2Backend, 2>,
        labels: &[S],
    ) -> Result<Self, PinnError> {
        let columns = tensor.dims()[1];
        if labels.len() != columns {
            return Err(PinnError::LabelMismatch {
                labels: labels.len(),
                columns,
            });
        }
        let labels: Vec<String> = labels.iter().map(|s| s.as_ref().to_string()).collect();
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(PinnError::DuplicateVariable(label.clone()));
            }
        }
        Ok(Self { tensor, labels })
    }

    /// 列ラベルの一覧。
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// ラップしているテンソル。
    pub fn tensor(&self) -> &Tensor<Diff2Backend, 2> {
        &self.tensor
    }

    /// 行数（サンプル点の数）。
    pub fn len(&self) -> usize {
        self.tensor.dims()[0]
    }

    /// 行が空かどうか。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ラベルに対応する列インデックスを返します。
    pub fn index_of(&self, label: &str) -> Result<usize, PinnError> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| PinnError::UnknownVariable(label.to_string()))
    }

    /// 1 つのラベルに対応する列（n×1）を取り出します。
    pub fn column(&self, label: &str) -> Result<Tensor<Diff2Backend, 2>, PinnError> {
        let j = self.index_of(label)?;
        let n = self.len();
        Ok(self.tensor.clone().slice([0..n, j..j + 1]))
    }

    /// 指定したラベルの列を、指定した順序で取り出した `LabelTensor` を返します。
    pub fn extract<S: AsRef<str>>(&self, labels: &[S]) -> Result<LabelTensor, PinnError> {
        let mut columns = Vec::with_capacity(labels.len());
        for label in labels {
            columns.push(self.column(label.as_ref())?);
        }
        LabelTensor::new(Tensor::cat(columns, 1), labels)
    }

    /// 別の `LabelTensor` を列方向に連結します。ラベルの重複はエラーです。
    pub fn append(&self, other: &LabelTensor) -> Result<LabelTensor, PinnError> {
        let mut labels = self.labels.clone();
        for label in other.labels() {
            if labels.contains(label) {
                return Err(PinnError::DuplicateVariable(label.clone()));
            }
            labels.push(label.clone());
        }
        LabelTensor::new(
            Tensor::cat(vec![self.tensor.clone(), other.tensor.clone()], 1),
            &labels,
        )
    }

    /// テンソルの値を行優先の `Vec<f32>` として取り出します（描画用）。
    pub fn values_vec(&self) -> Result<Vec<f32>, PinnError> {
        self.tensor
            .clone()
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| PinnError::Data(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;

    fn sample() -> LabelTensor {
        let device = Default::default();
        let tensor = Tensor::<Diff2Backend, 1>::from_floats(
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].as_slice(),
            &device,
        )
        .reshape([2, 3]);
        LabelTensor::new(tensor, &["x", "y", "t"]).unwrap()
    }

    #[test]
    fn new_rejects_label_count_mismatch() {
        let device = Default::default();
        let tensor = Tensor::<Diff2Backend, 2>::zeros([2, 3], &device);
        let result = LabelTensor::new(tensor, &["x", "y"]);
        assert!(matches!(
            result,
            Err(PinnError::LabelMismatch {
                labels: 2,
                columns: 3
            })
        ));
    }

    #[test]
    fn new_rejects_duplicate_labels() {
        let device = Default::default();
        let tensor = Tensor::<Diff2Backend, 2>::zeros([2, 2], &device);
        let result = LabelTensor::new(tensor, &["x", "x"]);
        assert!(matches!(result, Err(PinnError::DuplicateVariable(_))));
    }

    #[test]
    fn extract_selects_and_reorders_columns() {
        let lt = sample();
        let extracted = lt.extract(&["t", "x"]).unwrap();
        assert_eq!(extracted.labels(), &["t", "x"]);
        let values = extracted.values_vec().unwrap();
        assert_eq!(values, vec![3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn extract_unknown_label_is_an_error() {
        let lt = sample();
        assert!(matches!(
            lt.extract(&["z"]),
            Err(PinnError::UnknownVariable(_))
        ));
    }

    #[test]
    fn append_concatenates_columns() {
        let lt = sample();
        let device = Default::default();
        let extra = LabelTensor::new(
            Tensor::<Diff2Backend, 2>::ones([2, 1], &device),
            &["u"],
        )
        .unwrap();
        let combined = lt.append(&extra).unwrap();
        assert_eq!(combined.labels(), &["x", "y", "t", "u"]);
        assert_eq!(combined.tensor().dims(), [2, 4]);
    }

    #[test]
    fn append_rejects_duplicate_labels() {
        let lt = sample();
        let device = Default::default();
        let extra = LabelTensor::new(
            Tensor::<Diff2Backend, 2>::ones([2, 1], &device),
            &["x"],
        )
        .unwrap();
        assert!(matches!(
            lt.append(&extra),
            Err(PinnError::DuplicateVariable(_))
        ));
    }
}
