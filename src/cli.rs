use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::MODEL_FILENAME;
use crate::domain::SampleMode;

/// clapでコマンドラインの構造を定義します。
#[derive(Parser, Debug)]
#[command(author, version, about = "Declarative PINN problem definitions with Burn", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 実行するサブコマンドを定義します。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 条件ごとのサンプリング点を描画してファイルに保存します
    Samples {
        /// 対象の問題
        #[arg(long, value_enum)]
        problem: ProblemKind,
        /// サンプル数（格子の場合は変数ごとの点数）
        #[arg(long, default_value_t = 100)]
        n: usize,
        /// サンプリング方式
        #[arg(long, value_enum, default_value = "random")]
        mode: SampleModeArg,
        /// 描画する変数（カンマ区切り。spatial / temporal で変数グループを指定、省略時は全変数）
        #[arg(long, value_delimiter = ',')]
        variables: Option<Vec<String>>,
        /// 出力する PNG ファイル
        #[arg(long, default_value = "samples.png")]
        output: PathBuf,
    },
    /// 出力成分の予測値を描画してファイルに保存します
    Plot {
        /// 対象の問題
        #[arg(long, value_enum)]
        problem: ProblemKind,
        /// 描画する出力成分（省略時は最初の出力変数）
        #[arg(long)]
        component: Option<String>,
        /// 固定する変数（例: --fixed t=0.5、複数指定可）
        #[arg(long)]
        fixed: Vec<String>,
        /// 格子の解像度
        #[arg(long, default_value_t = 64)]
        res: usize,
        /// 学習済みモデルのファイル（値なしなら既定のファイル名、省略時は未学習のモデル）
        #[arg(long, num_args = 0..=1, default_missing_value = MODEL_FILENAME)]
        model: Option<PathBuf>,
        /// 出力する PNG ファイル
        #[arg(long, default_value = "plot.png")]
        output: PathBuf,
    },
    /// 条件ごとの残差 MSE を評価して表示します
    Residuals {
        /// 対象の問題
        #[arg(long, value_enum)]
        problem: ProblemKind,
        /// サンプル数
        #[arg(long, default_value_t = 1000)]
        n: usize,
        /// サンプリング方式
        #[arg(long, value_enum, default_value = "latin-hypercube")]
        mode: SampleModeArg,
        /// 学習済みモデルのファイル（値なしなら既定のファイル名、省略時は未学習のモデル）
        #[arg(long, num_args = 0..=1, default_missing_value = MODEL_FILENAME)]
        model: Option<PathBuf>,
    },
}

/// コマンドラインから選べる問題。
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProblemKind {
    /// 2 次元の熱方程式
    Heat,
    /// 1 次元の移流方程式
    Advection,
    /// チャネル流れのストークス方程式
    Stokes,
}

/// コマンドラインから選べるサンプリング方式。
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SampleModeArg {
    Random,
    Grid,
    LatinHypercube,
}

impl From<SampleModeArg> for SampleMode {
    fn from(mode: SampleModeArg) -> Self {
        match mode {
            SampleModeArg::Random => SampleMode::Random,
            SampleModeArg::Grid => SampleMode::Grid,
            SampleModeArg::LatinHypercube => SampleMode::LatinHypercube,
        }
    }
}
