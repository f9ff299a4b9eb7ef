use thiserror::Error;

/// 問題定義・残差評価・描画で発生するエラー。
#[derive(Debug, Error)]
pub enum PinnError {
    /// ラベルに対応する変数が見つからない。
    #[error("変数 '{0}' が見つかりません。")]
    UnknownVariable(String),

    /// 同じラベルの変数が重複している。
    #[error("変数 '{0}' が重複しています。")]
    DuplicateVariable(String),

    /// ラベル数とテンソルの列数が一致しない。
    #[error("ラベル数 {labels} がテンソルの列数 {columns} と一致しません。")]
    LabelMismatch { labels: usize, columns: usize },

    /// ネットワーク出力の成分インデックスが範囲外。
    #[error("出力成分 {component} が範囲外です（出力数: {outputs}）。")]
    ComponentOutOfRange { component: usize, outputs: usize },

    /// 発散の計算で成分数と変数数が一致しない。
    #[error("成分数 {components} と変数数 {variables} が一致しません。")]
    DimensionMismatch { components: usize, variables: usize },

    /// 描画できない変数の個数が指定された。
    #[error("{0} 個の変数は描画できません（対応は 1〜3 個です）。")]
    UnsupportedPlotDimension(usize),

    /// 問題が持たない変数グループが要求された。
    #[error("この問題には{0}領域がありません。")]
    MissingSubdomain(&'static str),

    /// backward 後に入力点の勾配が得られなかった。
    #[error("変数 '{0}' の勾配が計算されませんでした。")]
    MissingGradient(String),

    /// サンプリング前に残差評価や描画が要求された。
    #[error("条件 '{0}' の点がサンプリングされていません。先に sample_points を呼んでください。")]
    PointsNotSampled(String),

    /// サンプル数に 0 が指定された。
    #[error("サンプル数には 1 以上を指定してください。")]
    EmptySample,

    /// テンソルから値を取り出せなかった。
    #[error("テンソルの値の取り出しに失敗しました: {0}")]
    Data(String),

    /// 描画バックエンドのエラー。
    #[error("描画に失敗しました: {0}")]
    Plot(String),
}
