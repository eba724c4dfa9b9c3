//! カーソル位置・表示位置・選択点
//!
//! カーソルと表示オフセットは各バッファが保持する

/// バッファ内のカーソル位置（行・バイト列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    /// 行番号（0ベース、行数と等しい場合は最終行の次）
    pub row: usize,
    /// 列番号（0ベース、バイト単位）
    pub col: usize,
}

impl CursorPosition {
    /// 原点のカーソル
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定された位置のカーソル
    pub fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 行番号マージンを含む表示列へ変換
    pub fn display_col(&self, margin: usize) -> usize {
        self.col + margin
    }
}

/// 表示オフセット（スクロール位置）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
}

/// 選択範囲の端点
///
/// `col` は行番号マージンを含む表示列。`{-1, -1}` は選択なし
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: isize,
    pub col: isize,
}

impl Point {
    /// 選択なしを表す番兵
    pub const NONE: Point = Point { row: -1, col: -1 };

    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// カーソル位置から選択点を作成
    pub fn from_cursor(cursor: CursorPosition, margin: usize) -> Self {
        Self {
            row: cursor.row as isize,
            col: cursor.display_col(margin) as isize,
        }
    }

    /// 番兵かどうか
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// マージンを除いたバイト列（負数は0に丸める）
    pub fn byte_col(&self, margin: usize) -> usize {
        (self.col - margin as isize).max(0) as usize
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::NONE
    }
}
