//! サンプリング点と予測値の描画。
//!
//! `plotters` を使って PNG ファイルに出力します。予測のプロットでは、
//! 問題に解析解があれば「予測・解析解・誤差」を並べて描画します。

use std::path::Path;

use burn::tensor::Tensor;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::Diff2Backend;
use crate::domain::{SampleMode, Span};
use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::pinn::Pinn;
use crate::problem::Problem;

/// 条件ごとの散布図に使う色。
const SERIES_COLORS: [RGBColor; 8] = [
    RED,
    BLUE,
    GREEN,
    MAGENTA,
    CYAN,
    BLACK,
    RGBColor(255, 140, 0),
    RGBColor(128, 0, 128),
];

/// `plot_samples` で描画する変数の選び方。
#[derive(Clone, Copy, Debug)]
pub enum SampleVariables<'a> {
    /// 入力変数すべて。
    All,
    /// 問題の空間領域の変数。
    Spatial,
    /// 問題の時間領域の変数。
    Temporal,
    /// 明示した変数（この順序で描画）。
    Explicit(&'a [String]),
}

/// 条件ごとのサンプリング点を散布図として描画します。
///
/// `variables` で描画する変数を選べます。`Spatial`・`Temporal` は問題の
/// 空間・時間領域の変数に解決されます（持たない問題はエラー）。
/// 変数は 1〜3 個まで。1 変数の場合は y = 0 の直線上に点を並べます。
pub fn plot_samples<P: Problem>(
    pinn: &Pinn<P>,
    variables: SampleVariables<'_>,
    path: &Path,
) -> Result<(), PinnError> {
    let vars: Vec<String> = match variables {
        SampleVariables::All => pinn.problem.input_variables(),
        SampleVariables::Spatial => pinn
            .problem
            .spatial_domain()
            .ok_or(PinnError::MissingSubdomain("空間"))?
            .variables(),
        SampleVariables::Temporal => pinn
            .problem
            .temporal_domain()
            .ok_or(PinnError::MissingSubdomain("時間"))?
            .variables(),
        SampleVariables::Explicit(vars) => vars.to_vec(),
    };
    if !(1..=3).contains(&vars.len()) {
        return Err(PinnError::UnsupportedPlotDimension(vars.len()));
    }
    if pinn.input_pts.is_empty() {
        return Err(PinnError::PointsNotSampled("(全条件)".to_string()));
    }

    let domain = pinn.problem.domain();
    let ranges: Vec<(f32, f32)> = vars
        .iter()
        .map(|v| domain.span(v).map(axis_range))
        .collect::<Result<_, _>>()?;

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    match vars.len() {
        1 => {
            let mut chart = ChartBuilder::on(&root)
                .caption("Sampled points", ("sans-serif", 30).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(ranges[0].0..ranges[0].1, -1.0f32..1.0f32)
                .map_err(plot_err)?;
            chart
                .configure_mesh()
                .x_desc(&vars[0])
                .draw()
                .map_err(plot_err)?;
            for (i, (name, pts)) in pinn.input_pts.iter().enumerate() {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                let coords = pts.extract(&vars)?.values_vec()?;
                chart
                    .draw_series(
                        coords
                            .iter()
                            .map(|&x| Circle::new((x, 0.0f32), 3, color.filled())),
                    )
                    .map_err(plot_err)?
                    .label(name)
                    .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
            }
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }
        2 => {
            let mut chart = ChartBuilder::on(&root)
                .caption("Sampled points", ("sans-serif", 30).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(ranges[0].0..ranges[0].1, ranges[1].0..ranges[1].1)
                .map_err(plot_err)?;
            chart
                .configure_mesh()
                .x_desc(&vars[0])
                .y_desc(&vars[1])
                .draw()
                .map_err(plot_err)?;
            for (i, (name, pts)) in pinn.input_pts.iter().enumerate() {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                let coords = pts.extract(&vars)?.values_vec()?;
                chart
                    .draw_series(
                        coords
                            .chunks(2)
                            .map(|c| Circle::new((c[0], c[1]), 3, color.filled())),
                    )
                    .map_err(plot_err)?
                    .label(name)
                    .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
            }
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }
        _ => {
            let mut chart = ChartBuilder::on(&root)
                .caption("Sampled points", ("sans-serif", 30).into_font())
                .margin(10)
                .build_cartesian_3d(
                    ranges[0].0..ranges[0].1,
                    ranges[1].0..ranges[1].1,
                    ranges[2].0..ranges[2].1,
                )
                .map_err(plot_err)?;
            chart.configure_axes().draw().map_err(plot_err)?;
            for (i, (name, pts)) in pinn.input_pts.iter().enumerate() {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                let coords = pts.extract(&vars)?.values_vec()?;
                chart
                    .draw_series(
                        coords
                            .chunks(3)
                            .map(|c| Circle::new((c[0], c[1], c[2]), 3, color.filled())),
                    )
                    .map_err(plot_err)?
                    .label(name)
                    .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
            }
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// 出力成分の予測値を描画します。
///
/// `fixed_variables` で固定した変数を除いた自由変数を格子サンプリングし、
/// ネットワークの予測を描画します。自由変数が 1 つなら折れ線、2 つなら
/// ヒートマップになり、解析解があれば誤差も並べて描画します。
pub fn plot<P: Problem>(
    pinn: &Pinn<P>,
    component: &str,
    fixed_variables: &[(String, f32)],
    res: usize,
    path: &Path,
) -> Result<(), PinnError> {
    if res < 2 {
        return Err(PinnError::EmptySample);
    }
    let input_vars = pinn.problem.input_variables();
    for (name, _) in fixed_variables {
        if !input_vars.contains(name) {
            return Err(PinnError::UnknownVariable(name.clone()));
        }
    }
    let free: Vec<String> = input_vars
        .iter()
        .filter(|v| !fixed_variables.iter().any(|(f, _)| f == *v))
        .cloned()
        .collect();

    let domain = pinn.problem.domain();
    let mut pts = domain.sample(res, SampleMode::Grid, Some(&free))?;
    let n = pts.len();
    let device = Default::default();
    for (name, value) in fixed_variables {
        let column = LabelTensor::new(
            Tensor::<Diff2Backend, 2>::full([n, 1], *value, &device),
            &[name.as_str()],
        )?;
        pts = pts.append(&column)?;
    }

    // ネットワークへは問題の入力変数順で渡す。
    let ordered = pts.extract(&input_vars)?;
    let outputs = pinn.problem.output_variables();
    let pred = LabelTensor::new(pinn.model.forward(ordered.tensor().clone()), &outputs)?;
    let pred_vals = pred.extract(&[component])?.values_vec()?;
    let truth_vals = match pinn.problem.truth_solution(&ordered)? {
        Some(truth) => Some(truth.extract(&[component])?.values_vec()?),
        None => None,
    };

    match free.len() {
        1 => plot_line(&pts, &free[0], component, &pred_vals, truth_vals.as_deref(), path),
        2 => plot_heatmaps(&pts, &free, res, &pred_vals, truth_vals.as_deref(), path),
        k => Err(PinnError::UnsupportedPlotDimension(k)),
    }
}

fn plot_line(
    pts: &LabelTensor,
    var: &str,
    component: &str,
    pred: &[f32],
    truth: Option<&[f32]>,
    path: &Path,
) -> Result<(), PinnError> {
    let xs = pts.extract(&[var])?.values_vec()?;
    let (x_min, x_max) = (xs[0], xs[xs.len() - 1]);

    let mut y_min = f32::INFINITY;
    let mut y_max = f32::NEG_INFINITY;
    for &v in pred.iter().chain(truth.into_iter().flatten()) {
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    let margin = ((y_max - y_min) * 0.1).max(1e-3);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Output {component}"), ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, (y_min - margin)..(y_max + margin))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(var)
        .y_desc(component)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            xs.iter().copied().zip(pred.iter().copied()),
            &RED,
        ))
        .map_err(plot_err)?
        .label("Prediction")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    if let Some(truth) = truth {
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(truth.iter().copied()),
                &BLUE,
            ))
            .map_err(plot_err)?
            .label("Truth")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn plot_heatmaps(
    pts: &LabelTensor,
    free: &[String],
    res: usize,
    pred: &[f32],
    truth: Option<&[f32]>,
    path: &Path,
) -> Result<(), PinnError> {
    let xs = pts.extract(&free[..1])?.values_vec()?;
    let ys = pts.extract(&free[1..2])?.values_vec()?;
    // 格子は行優先で、2 つ目の変数が内側で変化している。
    let x_line: Vec<f32> = (0..res).map(|i| xs[i * res]).collect();
    let y_line: Vec<f32> = (0..res).map(|j| ys[j]).collect();
    let x_edges = cell_edges(&x_line);
    let y_edges = cell_edges(&y_line);

    let error_vals: Option<Vec<f32>> = truth.map(|truth| {
        truth
            .iter()
            .zip(pred)
            .map(|(t, p)| t - p)
            .collect()
    });
    let mut panels: Vec<(&str, &[f32])> = vec![("Prediction", pred)];
    if let Some(truth) = truth {
        panels.push(("Truth", truth));
    }
    if let Some(error_vals) = error_vals.as_deref() {
        panels.push(("Error", error_vals));
    }

    let width = 500 * panels.len() as u32;
    let root = BitMapBackend::new(path, (width, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let areas = root.split_evenly((1, panels.len()));
    for (area, (title, values)) in areas.iter().zip(&panels) {
        draw_heatmap(area, title, free, &x_edges, &y_edges, values, res)?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    free: &[String],
    x_edges: &[f32],
    y_edges: &[f32],
    values: &[f32],
    res: usize,
) -> Result<(), PinnError> {
    let mut v_min = f32::INFINITY;
    let mut v_max = f32::NEG_INFINITY;
    for &v in values {
        v_min = v_min.min(v);
        v_max = v_max.max(v);
    }
    if v_max - v_min < 1e-12 {
        v_max = v_min + 1.0;
    }

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            x_edges[0]..x_edges[res],
            y_edges[0]..y_edges[res],
        )
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(&free[0])
        .y_desc(&free[1])
        .draw()
        .map_err(plot_err)?;

    let mut cells = Vec::with_capacity(res * res);
    for i in 0..res {
        for j in 0..res {
            let color = ViridisRGB.get_color_normalized(values[i * res + j], v_min, v_max);
            cells.push(Rectangle::new(
                [(x_edges[i], y_edges[j]), (x_edges[i + 1], y_edges[j + 1])],
                color.filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(plot_err)?;
    Ok(())
}

/// 格子値の列からセル境界の列を作ります（隣接点の中点）。
fn cell_edges(line: &[f32]) -> Vec<f32> {
    let n = line.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(line[0]);
    for k in 1..n {
        edges.push((line[k - 1] + line[k]) / 2.0);
    }
    edges.push(line[n - 1]);
    edges
}

fn axis_range(span: Span) -> (f32, f32) {
    match span {
        Span::Range(min, max) => (min, max),
        // 固定値の軸は点が見えるように少し広げる。
        Span::Fixed(value) => (value - 0.5, value + 0.5),
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> PinnError {
    PinnError::Plot(e.to_string())
}
