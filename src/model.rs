//! ネットワークの抽象とサンプル実装。
//!
//! 問題定義側は `Network` トレイトだけに依存します。学習は本ライブラリの
//! 範囲外なので、ここにあるのは順伝播と学習済み重みの読み込みだけです。

use crate::Diff2Backend;
use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Tanh};
use burn::prelude::Backend;
use burn::tensor::Tensor;

/// 座標を物理量に写すネットワーク。
///
/// 入力は「行 = サンプル点、列 = 問題の入力変数（定義順）」の 2 次元
/// テンソルで、出力の列は問題の出力変数に対応します。微分作用素が
/// `backward` を実行できるよう、二重自動微分バックエンド上で評価します。
pub trait Network {
    /// 順伝播を実行します。
    fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2>;
}

/// 入出力の幅を指定できる多層パーセプトロン（MLP）。
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    linears: Vec<Linear<B>>,
    activation: Tanh,
}

impl<B: Backend> Model<B> {
    /// 新しいモデルを初期化します。
    pub fn new(device: &B::Device, n_input: usize, n_output: usize) -> Self {
        let n_hidden = 20;
        let n_layers = 4;
        let mut linears = Vec::new();
        linears.push(LinearConfig::new(n_input, n_hidden).init(device));
        for _ in 1..(n_layers - 1) {
            linears.push(LinearConfig::new(n_hidden, n_hidden).init(device));
        }
        linears.push(LinearConfig::new(n_hidden, n_output).init(device));
        Self {
            linears,
            activation: Tanh::new(),
        }
    }

    /// モデルの順伝播を実行します。
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = input;
        for i in 0..(self.linears.len() - 1) {
            x = self.linears[i].forward(x);
            x = self.activation.forward(x);
        }
        self.linears.last().unwrap().forward(x)
    }
}

impl Network for Model<Diff2Backend> {
    fn forward(&self, input: Tensor<Diff2Backend, 2>) -> Tensor<Diff2Backend, 2> {
        Model::forward(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_maps_inputs_to_outputs() {
        let device = Default::default();
        let model = Model::<Diff2Backend>::new(&device, 3, 2);
        let input = Tensor::<Diff2Backend, 2>::zeros([5, 3], &device);
        let output = Network::forward(&model, input);
        assert_eq!(output.dims(), [5, 2]);
    }
}
