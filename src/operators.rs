//! 微分作用素。
//!
//! ネットワーク出力に対する勾配・発散・ラプラシアンを `burn` の自動微分で
//! 評価します。残差評価のための作用素なので、結果は計算グラフを持たない
//! ベースバックエンド上の値として返します。
//!
//! 入力点の列順はネットワークの入力変数の順序と一致している必要が
//! あります（`Pinn::sample_points` はその順序でサンプリングします）。

use crate::error::PinnError;
use crate::label_tensor::LabelTensor;
use crate::model::Network;
use crate::{BaseBackend, Diff2Backend, DiffBackend};
use burn::tensor::Tensor;

/// ネットワーク出力の 1 成分を値として取り出します（n×1）。
pub fn output(
    net: &dyn Network,
    pts: &LabelTensor,
    component: usize,
) -> Result<Tensor<BaseBackend, 2>, PinnError> {
    let out = net.forward(pts.tensor().clone());
    let [n, outputs] = out.dims();
    check_component(component, outputs)?;
    Ok(out.slice([0..n, component..component + 1]).inner().inner())
}

/// 出力成分の、指定した入力変数に関する 1 階微分を返します。
///
/// 結果は n×|vars| のテンソルで、列の順序は `vars` の順序に対応します。
pub fn grad(
    net: &dyn Network,
    pts: &LabelTensor,
    component: usize,
    vars: &[&str],
) -> Result<Tensor<BaseBackend, 2>, PinnError> {
    if vars.is_empty() {
        return Err(PinnError::DimensionMismatch {
            components: 1,
            variables: 0,
        });
    }
    let indices: Vec<usize> = vars
        .iter()
        .map(|v| pts.index_of(v))
        .collect::<Result<_, _>>()?;

    let coords = pts.tensor().clone().require_grad();
    let out = net.forward(coords.clone());
    let [n, outputs] = out.dims();
    check_component(component, outputs)?;

    // 1 成分の和を backward すると、その成分の全入力変数に関する勾配が
    // 一度に得られる（行ごとに独立なので和を取っても混ざらない）。
    let comp = out.slice([0..n, component..component + 1]);
    let grads = comp.sum().backward();
    let g: Tensor<DiffBackend, 2> = coords
        .grad(&grads)
        .ok_or_else(|| PinnError::MissingGradient(vars.join(", ")))?;
    let g: Tensor<BaseBackend, 2> = g.inner();

    let columns: Vec<Tensor<BaseBackend, 2>> = indices
        .iter()
        .map(|&j| g.clone().slice([0..n, j..j + 1]))
        .collect();
    Ok(Tensor::cat(columns, 1))
}

/// ベクトル場の発散 Σᵢ ∂cᵢ/∂vᵢ を返します（n×1）。
///
/// `components` と `vars` は同じ長さでなければなりません。
pub fn div(
    net: &dyn Network,
    pts: &LabelTensor,
    components: &[usize],
    vars: &[&str],
) -> Result<Tensor<BaseBackend, 2>, PinnError> {
    if components.len() != vars.len() || components.is_empty() {
        return Err(PinnError::DimensionMismatch {
            components: components.len(),
            variables: vars.len(),
        });
    }
    let mut acc: Option<Tensor<BaseBackend, 2>> = None;
    for (&c, &v) in components.iter().zip(vars) {
        let term = grad(net, pts, c, &[v])?;
        acc = Some(match acc {
            Some(sum) => sum + term,
            None => term,
        });
    }
    Ok(acc.expect("components is non-empty"))
}

/// 出力成分のラプラシアン Σᵢ ∂²c/∂vᵢ² を返します（n×1）。
///
/// 二重の自動微分バックエンドを使い、外側の backward で得た 1 階微分を
/// 内側のバックエンドでもう一度 backward して 2 階微分を取り出します。
/// backward は計算グラフを消費するため、変数ごとに順伝播をやり直します。
pub fn laplacian(
    net: &dyn Network,
    pts: &LabelTensor,
    component: usize,
    vars: &[&str],
) -> Result<Tensor<BaseBackend, 2>, PinnError> {
    if vars.is_empty() {
        return Err(PinnError::DimensionMismatch {
            components: 1,
            variables: 0,
        });
    }
    let mut acc: Option<Tensor<BaseBackend, 2>> = None;
    for var in vars {
        let j = pts.index_of(var)?;

        // 内側のバックエンドでも追跡される葉テンソルを用意してから
        // 外側のバックエンドへ持ち上げる。
        let inner_coords: Tensor<DiffBackend, 2> =
            pts.tensor().clone().inner().require_grad();
        let coords: Tensor<Diff2Backend, 2> =
            Tensor::from_inner(inner_coords.clone()).require_grad();

        let out = net.forward(coords.clone());
        let [n, outputs] = out.dims();
        check_component(component, outputs)?;

        let comp = out.slice([0..n, component..component + 1]);
        let grads = comp.sum().backward();
        let first: Tensor<DiffBackend, 2> = coords
            .grad(&grads)
            .ok_or_else(|| PinnError::MissingGradient((*var).to_string()))?;

        let first_j = first.slice([0..n, j..j + 1]);
        let grads2 = first_j.sum().backward();
        let second: Tensor<BaseBackend, 2> = inner_coords
            .grad(&grads2)
            .ok_or_else(|| PinnError::MissingGradient((*var).to_string()))?;
        let second_jj = second.slice([0..n, j..j + 1]);

        acc = Some(match acc {
            Some(sum) => sum + second_jj,
            None => second_jj,
        });
    }
    Ok(acc.expect("vars is non-empty"))
}

fn check_component(component: usize, outputs: usize) -> Result<(), PinnError> {
    if component >= outputs {
        return Err(PinnError::ComponentOutOfRange { component, outputs });
    }
    Ok(())
}
