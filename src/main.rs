//! # PINN 問題定義ライブラリのコマンドラインツール
//!
//! 定義済みの問題（熱方程式・移流方程式・ストークス方程式）について、
//! サンプリング点や予測値の描画、条件ごとの残差評価を実行します。
//!
//! ## 使い方
//!
//! ### サンプリング点の描画
//! ```bash
//! cargo run --release -- samples --problem heat --variables x,y
//! cargo run --release -- samples --problem heat --variables spatial
//! ```
//!
//! ### 予測値の描画（学習済みモデルがあれば指定）
//! ```bash
//! cargo run --release -- plot --problem heat --fixed t=0.5 --model pinn_model.mpk
//! ```
//!
//! ### 残差の評価
//! ```bash
//! cargo run --release -- residuals --problem stokes
//! ```

use std::error::Error;
use std::path::Path;

use burn::module::Module;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use clap::Parser;

use pinn_problems::Diff2Backend;
use pinn_problems::cli::{Cli, Commands, ProblemKind};
use pinn_problems::domain::SampleMode;
use pinn_problems::model::{Model, Network};
use pinn_problems::pinn::Pinn;
use pinn_problems::plotter::{self, SampleVariables};
use pinn_problems::problem::Problem;
use pinn_problems::problems::{Advection, Heat, Stokes};

/// 熱方程式の既定の拡散係数。
const DEFAULT_ALPHA: f32 = 0.1;
/// 移流方程式の既定の移流速度。
const DEFAULT_SPEED: f32 = 1.0;
/// ストークス方程式の既定の動粘性係数。
const DEFAULT_NU: f32 = 1.0;

/// プログラムのエントリーポイント。
///
/// コマンドライン引数を解析し、各サブコマンドの処理に振り分けます。
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Samples {
            problem,
            n,
            mode,
            variables,
            output,
        } => {
            let mode = SampleMode::from(mode);
            match problem {
                ProblemKind::Heat => {
                    run_samples(Heat::new(DEFAULT_ALPHA), n, mode, variables, &output)
                }
                ProblemKind::Advection => {
                    run_samples(Advection::new(DEFAULT_SPEED), n, mode, variables, &output)
                }
                ProblemKind::Stokes => {
                    run_samples(Stokes::new(DEFAULT_NU), n, mode, variables, &output)
                }
            }
        }
        Commands::Plot {
            problem,
            component,
            fixed,
            res,
            model,
            output,
        } => match problem {
            ProblemKind::Heat => run_plot(
                Heat::new(DEFAULT_ALPHA),
                component,
                &fixed,
                res,
                model.as_deref(),
                &output,
            ),
            ProblemKind::Advection => run_plot(
                Advection::new(DEFAULT_SPEED),
                component,
                &fixed,
                res,
                model.as_deref(),
                &output,
            ),
            ProblemKind::Stokes => run_plot(
                Stokes::new(DEFAULT_NU),
                component,
                &fixed,
                res,
                model.as_deref(),
                &output,
            ),
        },
        Commands::Residuals {
            problem,
            n,
            mode,
            model,
        } => {
            let mode = SampleMode::from(mode);
            match problem {
                ProblemKind::Heat => {
                    run_residuals(Heat::new(DEFAULT_ALPHA), n, mode, model.as_deref())
                }
                ProblemKind::Advection => {
                    run_residuals(Advection::new(DEFAULT_SPEED), n, mode, model.as_deref())
                }
                ProblemKind::Stokes => {
                    run_residuals(Stokes::new(DEFAULT_NU), n, mode, model.as_deref())
                }
            }
        }
    };

    if let Err(e) = result {
        eprintln!("エラー: {e}");
        std::process::exit(1);
    }
}

/// `samples`サブコマンドを実行します。
fn run_samples<P: Problem>(
    problem: P,
    n: usize,
    mode: SampleMode,
    variables: Option<Vec<String>>,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    let model = build_model(&problem, None)?;
    let mut pinn = Pinn::new(problem, model);
    pinn.sample_points(n, mode)?;
    let variables = match variables.as_deref() {
        None => SampleVariables::All,
        Some([v]) if v.as_str() == "spatial" => SampleVariables::Spatial,
        Some([v]) if v.as_str() == "temporal" => SampleVariables::Temporal,
        Some(vars) => SampleVariables::Explicit(vars),
    };
    plotter::plot_samples(&pinn, variables, output)?;
    println!("=> サンプリング点を '{}' に保存しました。", output.display());
    Ok(())
}

/// `plot`サブコマンドを実行します。
fn run_plot<P: Problem>(
    problem: P,
    component: Option<String>,
    fixed: &[String],
    res: usize,
    model_path: Option<&Path>,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    let component = match component {
        Some(component) => component,
        None => problem.output_variables()[0].clone(),
    };
    let fixed = parse_fixed(fixed)?;
    let model = build_model(&problem, model_path)?;
    let pinn = Pinn::new(problem, model);
    plotter::plot(&pinn, &component, &fixed, res, output)?;
    println!(
        "=> 成分 '{}' のプロットを '{}' に保存しました。",
        component,
        output.display()
    );
    Ok(())
}

/// `residuals`サブコマンドを実行します。
fn run_residuals<P: Problem>(
    problem: P,
    n: usize,
    mode: SampleMode,
    model_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let model = build_model(&problem, model_path)?;
    let mut pinn = Pinn::new(problem, model);
    pinn.sample_points(n, mode)?;
    for (name, loss) in pinn.condition_losses()? {
        println!("[条件 {name}] 残差 MSE: {loss:.6}");
    }
    Ok(())
}

/// 問題の入出力幅に合わせてモデルを用意します。
///
/// `model_path` が指定されていれば学習済みの重みを読み込みます。
fn build_model<P: Problem>(
    problem: &P,
    model_path: Option<&Path>,
) -> Result<Box<dyn Network>, Box<dyn Error>> {
    let device = Default::default();
    let model = Model::<Diff2Backend>::new(
        &device,
        problem.input_variables().len(),
        problem.output_variables().len(),
    );
    let model = match model_path {
        Some(path) => {
            if !path.exists() {
                return Err(format!(
                    "モデルファイル '{}' が見つかりません。",
                    path.display()
                )
                .into());
            }
            println!("学習済みモデルを '{}' からロード中...", path.display());
            model.load_file(
                path.to_path_buf(),
                &NamedMpkFileRecorder::<FullPrecisionSettings>::new(),
                &device,
            )?
        }
        None => model,
    };
    Ok(Box::new(model))
}

/// `var=value` 形式の固定変数指定を解析します。
fn parse_fixed(args: &[String]) -> Result<Vec<(String, f32)>, Box<dyn Error>> {
    args.iter()
        .map(|arg| {
            let (name, value) = arg.split_once('=').ok_or_else(|| {
                format!("固定変数は 'var=value' の形式で指定してください: '{arg}'")
            })?;
            let value: f32 = value
                .parse()
                .map_err(|_| format!("'{value}' を数値として解釈できません。"))?;
            Ok((name.to_string(), value))
        })
        .collect()
}
