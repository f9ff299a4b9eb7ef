//! 直交領域とサンプリング。
//!
//! 変数ごとに区間または固定値を持つ直交領域を定義し、ランダム・格子・
//! ラテン超方格の各方式で点をサンプリングします。

use crate::Diff2Backend;
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use burn::tensor::{Distribution, Tensor};
use rand::Rng;
use rand::seq::SliceRandom;

/// 1 変数分の範囲。区間か、境界条件用の固定値のどちらかです。
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Span {
    /// 固定値。サンプリングすると常に同じ値の列になります。
    Fixed(f32),
    /// 閉区間 `[min, max]`。
    Range(f32, f32),
}

/// サンプリング方式。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    /// 一様乱数で n 点。
    Random,
    /// 区間変数ごとに n 点の格子（直積）。
    Grid,
    /// ラテン超方格で n 点。
    LatinHypercube,
}

/// 変数名と範囲の組で表す直交領域。
///
/// 変数は追加した順に並びます。固定値の変数は境界（例: 壁 `y = 1`）を
/// 表すために使います。
#[derive(Clone, Debug, Default)]
pub struct CartesianDomain {
    axes: Vec<(String, Span)>,
}

impl CartesianDomain {
    /// 空の領域を作ります。
    pub fn new() -> Self {
        Self::default()
    }

    /// 区間変数を追加します。
    pub fn range(mut self, label: &str, min: f32, max: f32) -> Self {
        self.axes.push((label.to_string(), Span::Range(min, max)));
        self
    }

    /// 固定値の変数を追加します。
    pub fn fixed(mut self, label: &str, value: f32) -> Self {
        self.axes.push((label.to_string(), Span::Fixed(value)));
        self
    }

    /// 変数名の一覧（追加順）。
    pub fn variables(&self) -> Vec<String> {
        self.axes.iter().map(|(label, _)| label.clone()).collect()
    }

    /// 変数名に対応する範囲を返します。
    pub fn span(&self, label: &str) -> Result<Span, PinnError> {
        self.axes
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, span)| *span)
            .ok_or_else(|| PinnError::UnknownVariable(label.to_string()))
    }

    /// 2 つの領域を連結した領域を返します（空間領域と時間領域の結合など）。
    pub fn merge(&self, other: &CartesianDomain) -> Result<CartesianDomain, PinnError> {
        let mut axes = self.axes.clone();
        for (label, span) in &other.axes {
            if axes.iter().any(|(l, _)| l == label) {
                return Err(PinnError::DuplicateVariable(label.clone()));
            }
            axes.push((label.clone(), *span));
        }
        Ok(CartesianDomain { axes })
    }

    /// 領域から点をサンプリングします。
    ///
    /// `variables` を指定すると、その変数だけをその順序で含む点集合を
    /// 返します（未知の変数名はエラー）。`None` なら全変数です。
    ///
    /// 点数の数え方は方式によって異なります。`Random` と `LatinHypercube`
    /// では合計 `n` 点、`Grid` では区間変数 1 つにつき `n` 点の直積です。
    /// 固定値の変数は一定値の列になり、格子の点数には寄与しません。
    pub fn sample(
        &self,
        n: usize,
        mode: SampleMode,
        variables: Option<&[String]>,
    ) -> Result<LabelTensor, PinnError> {
        if n == 0 {
            return Err(PinnError::EmptySample);
        }
        let labels: Vec<String> = match variables {
            Some(vars) => vars.to_vec(),
            None => self.variables(),
        };
        if labels.is_empty() {
            return Err(PinnError::EmptySample);
        }
        let spans: Vec<Span> = labels
            .iter()
            .map(|label| self.span(label))
            .collect::<Result<_, _>>()?;

        match mode {
            SampleMode::Random => self.sample_random(n, &labels, &spans),
            SampleMode::Grid => self.sample_grid(n, &labels, &spans),
            SampleMode::LatinHypercube => self.sample_latin(n, &labels, &spans),
        }
    }

    fn sample_random(
        &self,
        n: usize,
        labels: &[String],
        spans: &[Span],
    ) -> Result<LabelTensor, PinnError> {
        let device = Default::default();
        let columns: Vec<Tensor<Diff2Backend, 2>> = spans
            .iter()
            .map(|span| match span {
                Span::Fixed(value) => Tensor::full([n, 1], *value, &device),
                Span::Range(min, max) => Tensor::random(
                    [n, 1],
                    Distribution::Uniform(f64::from(*min), f64::from(*max)),
                    &device,
                ),
            })
            .collect();
        LabelTensor::new(Tensor::cat(columns, 1), labels)
    }

    fn sample_grid(
        &self,
        n: usize,
        labels: &[String],
        spans: &[Span],
    ) -> Result<LabelTensor, PinnError> {
        let device = Default::default();
        // 変数ごとの格子値。固定値は 1 点として扱う。
        let lines: Vec<Vec<f32>> = spans
            .iter()
            .map(|span| match span {
                Span::Fixed(value) => vec![*value],
                Span::Range(min, max) => linspace(*min, *max, n),
            })
            .collect();
        let total: usize = lines.iter().map(Vec::len).product();

        // 直積を行優先で並べる。後の変数ほど内側で変化する。
        let mut columns = Vec::with_capacity(lines.len());
        for (j, line) in lines.iter().enumerate() {
            let inner: usize = lines[j + 1..].iter().map(Vec::len).product();
            let mut values = Vec::with_capacity(total);
            for row in 0..total {
                values.push(line[(row / inner) % line.len()]);
            }
            columns.push(
                Tensor::<Diff2Backend, 1>::from_floats(values.as_slice(), &device)
                    .reshape([total, 1]),
            );
        }
        LabelTensor::new(Tensor::cat(columns, 1), labels)
    }

    fn sample_latin(
        &self,
        n: usize,
        labels: &[String],
        spans: &[Span],
    ) -> Result<LabelTensor, PinnError> {
        let device = Default::default();
        let mut rng = rand::rng();
        let columns: Vec<Tensor<Diff2Backend, 2>> = spans
            .iter()
            .map(|span| match span {
                Span::Fixed(value) => Tensor::full([n, 1], *value, &device),
                Span::Range(min, max) => {
                    // 各層から 1 点ずつ。層の割り当ては変数ごとに独立に混ぜる。
                    let mut strata: Vec<usize> = (0..n).collect();
                    strata.shuffle(&mut rng);
                    let width = (max - min) / n as f32;
                    let values: Vec<f32> = strata
                        .iter()
                        .map(|&k| min + (k as f32 + rng.random::<f32>()) * width)
                        .collect();
                    Tensor::<Diff2Backend, 1>::from_floats(values.as_slice(), &device)
                        .reshape([n, 1])
                }
            })
            .collect();
        LabelTensor::new(Tensor::cat(columns, 1), labels)
    }
}

fn linspace(min: f32, max: f32, n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![min];
    }
    (0..n)
        .map(|i| min + (max - min) * i as f32 / (n - 1) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> CartesianDomain {
        CartesianDomain::new().range("x", -2.0, 2.0).range("y", -1.0, 1.0)
    }

    #[test]
    fn variables_keep_insertion_order() {
        let domain = channel().fixed("t", 0.0);
        assert_eq!(domain.variables(), vec!["x", "y", "t"]);
    }

    #[test]
    fn merge_rejects_duplicate_variables() {
        let spatial = channel();
        let also_x = CartesianDomain::new().range("x", 0.0, 1.0);
        assert!(matches!(
            spatial.merge(&also_x),
            Err(PinnError::DuplicateVariable(_))
        ));
    }

    #[test]
    fn grid_sampling_is_a_cartesian_product() {
        let pts = channel().sample(3, SampleMode::Grid, None).unwrap();
        assert_eq!(pts.tensor().dims(), [9, 2]);
        let values = pts.values_vec().unwrap();
        // 後の変数（y）が内側で変化する。
        assert_eq!(&values[..6], &[-2.0, -1.0, -2.0, 0.0, -2.0, 1.0]);
    }

    #[test]
    fn fixed_axis_contributes_a_constant_column() {
        let wall = CartesianDomain::new().range("x", -2.0, 2.0).fixed("y", 1.0);
        let pts = wall.sample(4, SampleMode::Grid, None).unwrap();
        assert_eq!(pts.tensor().dims(), [4, 2]);
        let y = pts.extract(&["y"]).unwrap().values_vec().unwrap();
        assert_eq!(y, vec![1.0; 4]);
    }

    #[test]
    fn random_sampling_stays_in_bounds() {
        let pts = channel().sample(200, SampleMode::Random, None).unwrap();
        assert_eq!(pts.tensor().dims(), [200, 2]);
        let x = pts.extract(&["x"]).unwrap().values_vec().unwrap();
        assert!(x.iter().all(|&v| (-2.0..=2.0).contains(&v)));
        let y = pts.extract(&["y"]).unwrap().values_vec().unwrap();
        assert!(y.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn latin_hypercube_hits_every_stratum_once() {
        let line = CartesianDomain::new().range("x", 0.0, 1.0);
        let n = 10;
        let pts = line.sample(n, SampleMode::LatinHypercube, None).unwrap();
        let x = pts.values_vec().unwrap();
        let mut counts = vec![0usize; n];
        for v in x {
            let k = ((v * n as f32) as usize).min(n - 1);
            counts[k] += 1;
        }
        assert_eq!(counts, vec![1; n]);
    }

    #[test]
    fn latin_hypercube_covers_every_stratum_on_each_axis() {
        let n = 8;
        let pts = channel().sample(n, SampleMode::LatinHypercube, None).unwrap();
        assert_eq!(pts.tensor().dims(), [n, 2]);
        let x = pts.extract(&["x"]).unwrap().values_vec().unwrap();
        let y = pts.extract(&["y"]).unwrap().values_vec().unwrap();
        for (values, (min, max)) in [(x, (-2.0f32, 2.0f32)), (y, (-1.0f32, 1.0f32))] {
            let mut counts = vec![0usize; n];
            for v in values {
                let k = (((v - min) / (max - min) * n as f32) as usize).min(n - 1);
                counts[k] += 1;
            }
            assert_eq!(counts, vec![1; n]);
        }
    }

    #[test]
    fn subset_selects_and_orders_variables() {
        let domain = channel();
        let vars = vec!["y".to_string()];
        let pts = domain.sample(5, SampleMode::Grid, Some(&vars)).unwrap();
        assert_eq!(pts.labels(), &["y"]);
        assert_eq!(pts.tensor().dims(), [5, 1]);
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let vars = vec!["z".to_string()];
        assert!(matches!(
            channel().sample(5, SampleMode::Grid, Some(&vars)),
            Err(PinnError::UnknownVariable(_))
        ));
    }

    #[test]
    fn zero_points_is_an_error() {
        assert!(matches!(
            channel().sample(0, SampleMode::Random, None),
            Err(PinnError::EmptySample)
        ));
    }
}
