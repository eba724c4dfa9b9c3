//! ヤンク（コピー）保持領域

use crate::buffer::Row;

/// ヤンクの粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YankKind {
    /// 何も保持していない
    #[default]
    Empty,
    /// 行内の一部分
    CharWise,
    /// 複数行
    LineWise,
}

/// 選択範囲からコピーした切り離し行の集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Yank {
    rows: Vec<Row>,
    kind: YankKind,
}

impl Yank {
    /// 空のヤンク
    pub fn new() -> Self {
        Self::default()
    }

    /// コピーした行から作成。1行なら文字単位、それ以外は行単位
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let kind = match rows.len() {
            0 => YankKind::Empty,
            1 => YankKind::CharWise,
            _ => YankKind::LineWise,
        };
        Self { rows, kind }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn kind(&self) -> YankKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind == YankKind::Empty
    }

    /// 保持内容を改行で連結した文字列
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.as_str_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 内容を破棄
    pub fn clear(&mut self) {
        self.rows.clear();
        self.kind = YankKind::Empty;
    }
}
