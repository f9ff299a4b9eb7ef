//! # 物理情報ニューラルネットワーク (PINN) 問題定義ライブラリ
//!
//! `burn` フレームワークの自動微分を利用して、PDE（熱方程式、移流方程式、
//! ストークス型の運動量・連続の式）を宣言的に定義するためのライブラリです。
//!
//! 問題は「領域」「条件」「方程式」の組み合わせとして記述し、条件ごとの
//! 残差（微分作用素をネットワーク出力に適用した値）を評価できます。
//! 学習ループやオプティマイザは含みません。残差の最小化は本ライブラリを
//! 利用するフレームワーク側の仕事です。
//!
//! また、サンプリング点や予測値（解析解があれば併せて）を描画する
//! プロットユーティリティを提供します。

use burn::backend::{Autodiff, NdArray};

pub mod cli;
pub mod condition;
pub mod domain;
pub mod equation;
pub mod error;
pub mod label_tensor;
pub mod model;
pub mod operators;
pub mod pinn;
pub mod plotter;
pub mod problem;
pub mod problems;

/// 学習済みモデルの既定のファイル名。
pub const MODEL_FILENAME: &str = "pinn_model.mpk";

/// 値の評価に使うベースバックエンド（CPU）。
pub type BaseBackend = NdArray<f32>;

/// 1階微分用の自動微分バックエンド。
pub type DiffBackend = Autodiff<BaseBackend>;

/// 2階微分（ラプラシアン）まで取れる、二重の自動微分バックエンド。
///
/// 入力点とネットワークは常にこのバックエンド上で評価し、微分作用素が
/// 必要な階数だけ `backward` を実行して値を取り出します。
pub type Diff2Backend = Autodiff<DiffBackend>;
