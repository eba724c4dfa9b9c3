//! バッファ管理モジュール
//!
//! 行の並び、カーソル、選択範囲、取り消し履歴、シンタックス定義を束ねた
//! 1つのドキュメントと、その集合を提供

pub mod cursor;
pub mod manager;
pub mod row;

// 公開API
pub use cursor::{CursorPosition, Point, Viewport};
pub use manager::{BufferSet, SCRATCH_BUFFER_NAME};
pub use row::Row;

use crate::config::EngineConfig;
use crate::editor::{UndoRedoLog, Yank};
use crate::error::{IndexError, Result};
use crate::syntax::{Highlighter, SyntaxDescriptor, SyntaxRegistry};

/// 単一のドキュメント
#[derive(Debug, Clone)]
pub struct Buffer {
    rows: Vec<Row>,
    name: String,
    /// 前回保存以降の変更回数
    dirty: usize,
    pub(crate) history: UndoRedoLog,
    pub(crate) selection_start: Point,
    pub(crate) selection_end: Point,
    pub(crate) yank: Yank,
    syntax: SyntaxDescriptor,
    needs_full_rehighlight: bool,
    cursor: CursorPosition,
    viewport: Viewport,
    index: usize,
    line_number_width: usize,
    pub(crate) tab_stop: usize,
    pub(crate) auto_close_brackets: bool,
}

impl Buffer {
    /// 既定設定の空バッファ
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &EngineConfig::default())
    }

    /// 設定を指定して空バッファを作成
    pub fn with_config(name: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            rows: Vec::new(),
            name: name.into(),
            dirty: 0,
            history: UndoRedoLog::new(config.undo_depth),
            selection_start: Point::NONE,
            selection_end: Point::NONE,
            yank: Yank::new(),
            syntax: SyntaxDescriptor::empty(),
            needs_full_rehighlight: false,
            cursor: CursorPosition::new(),
            viewport: Viewport::default(),
            index: 0,
            line_number_width: config.line_number_width,
            tab_stop: config.tab_stop,
            auto_close_brackets: config.auto_close_brackets,
        }
    }

    /// テキストを行に分けて読み込む（`\n` / `\r\n` 区切り）
    ///
    /// 読み込み直後は未変更扱い
    pub fn from_text(name: impl Into<String>, text: &str, config: &EngineConfig) -> Self {
        let mut buffer = Self::with_config(name, config);
        buffer.load_text(text);
        buffer
    }

    /// 内容を置き換える。履歴と選択範囲は破棄する
    pub fn load_text(&mut self, text: &str) {
        self.rows = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let mut row = Row::from_bytes(line.as_bytes());
                row.set_index(i);
                row
            })
            .collect();
        self.history.clear();
        self.clear_selection();
        self.cursor = CursorPosition::new();
        self.viewport = Viewport::default();
        self.needs_full_rehighlight = true;
        self.rehighlight_all();
        self.dirty = 0;
        log::debug!("loaded {} rows into {}", self.rows.len(), self.name);
    }

    /// 行を `\n` で連結したテキスト（末尾に改行を付ける）
    pub fn rows_to_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            text.push_str(&row.as_str_lossy());
            text.push('\n');
        }
        text
    }

    /// 保存用のバイト列
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.rows.iter().map(|r| r.len() + 1).sum());
        for row in &self.rows {
            bytes.extend_from_slice(row.chars());
            bytes.push(b'\n');
        }
        bytes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 変更回数
    pub fn dirty(&self) -> usize {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// 保存済みとして変更回数を戻す
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// バッファ集合内での位置
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn line_number_width(&self) -> usize {
        self.line_number_width
    }

    pub fn history(&self) -> &UndoRedoLog {
        &self.history
    }

    pub fn yank(&self) -> &Yank {
        &self.yank
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// カーソルを移動（行数・行長に収まるよう丸める）
    pub fn set_cursor(&mut self, cursor: CursorPosition) {
        let row = cursor.row.min(self.rows.len());
        let max_col = self.rows.get(row).map_or(0, Row::len);
        self.cursor = CursorPosition::at(row, cursor.col.min(max_col));
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// カーソルが表示領域に入るようスクロール位置を調整
    pub fn scroll_to_cursor(&mut self, screen_rows: usize, screen_cols: usize) {
        let cursor = self.cursor;
        let viewport = &mut self.viewport;

        if cursor.row < viewport.row_offset {
            viewport.row_offset = cursor.row;
        }
        if screen_rows > 0 && cursor.row >= viewport.row_offset + screen_rows {
            viewport.row_offset = cursor.row + 1 - screen_rows;
        }

        let text_cols = screen_cols.saturating_sub(self.line_number_width);
        if cursor.col < viewport.col_offset {
            viewport.col_offset = cursor.col;
        }
        if text_cols > 0 && cursor.col >= viewport.col_offset + text_cols {
            viewport.col_offset = cursor.col + 1 - text_cols;
        }
    }

    pub fn syntax(&self) -> &SyntaxDescriptor {
        &self.syntax
    }

    pub fn needs_full_rehighlight(&self) -> bool {
        self.needs_full_rehighlight
    }

    /// シンタックス定義を差し替えて全行を再分類
    pub fn set_syntax(&mut self, syntax: SyntaxDescriptor) {
        log::debug!("syntax for {} set to {:?}", self.name, syntax.file_type);
        self.syntax = syntax;
        self.needs_full_rehighlight = true;
        self.rehighlight_all();
    }

    /// ファイル名から定義を選ぶ。一致しなければ空の定義に戻す
    ///
    /// 定義が見つかったかどうかを返す
    pub fn select_syntax(&mut self, file_name: &str, registry: &SyntaxRegistry) -> bool {
        match registry.select(file_name) {
            Some(syntax) => {
                self.set_syntax(syntax.clone());
                true
            }
            None => {
                self.set_syntax(SyntaxDescriptor::empty());
                false
            }
        }
    }

    /// 全行を先頭から再分類
    pub fn rehighlight_all(&mut self) {
        Highlighter::new(&self.syntax).highlight_all(&mut self.rows);
        self.needs_full_rehighlight = false;
    }

    /// 位置 `at` に行を挿入（`at == len` で末尾に追加）
    pub fn insert_row(&mut self, at: usize, row: Row) -> Result<()> {
        if at > self.rows.len() {
            return Err(IndexError::Row {
                index: at,
                len: self.rows.len(),
            }
            .into());
        }
        self.rows.insert(at, row);
        self.after_structural_edit(at);
        Ok(())
    }

    /// 位置 `at` の行を取り除いて返す
    pub fn remove_row(&mut self, at: usize) -> Result<Row> {
        self.check_row(at)?;
        let row = self.rows.remove(at);
        self.after_structural_edit(at);
        Ok(row)
    }

    /// `start` から `count` 行をまとめて取り除く
    pub fn remove_rows(&mut self, start: usize, count: usize) -> Result<Vec<Row>> {
        let end = start.saturating_add(count);
        if end > self.rows.len() {
            return Err(IndexError::Range {
                start,
                end,
                len: self.rows.len(),
            }
            .into());
        }
        let removed: Vec<Row> = self.rows.drain(start..end).collect();
        self.after_structural_edit(start);
        Ok(removed)
    }

    /// 位置 `at` の行を置き換え、元の行を返す
    pub fn replace_row(&mut self, at: usize, row: Row) -> Result<Row> {
        self.check_row(at)?;
        let old = std::mem::replace(&mut self.rows[at], row);
        self.rows[at].set_index(at);
        self.after_row_edit(at);
        Ok(old)
    }

    /// 行 `row` の `col` にバイトを挿入（`col == 行長` で行末に追加）
    pub fn insert_char_at(&mut self, row: usize, col: usize, byte: u8) -> Result<()> {
        self.check_column(row, col, true)?;
        self.rows[row].insert(col, byte, false);
        self.after_row_edit(row);
        Ok(())
    }

    /// 行 `row` の `col` のバイトを削除して返す
    pub fn delete_char_at(&mut self, row: usize, col: usize) -> Result<u8> {
        self.check_column(row, col, false)?;
        let byte = self.rows[row].remove(col);
        self.after_row_edit(row);
        Ok(byte)
    }

    /// 行 `row` の `col` にタブ展開の空白を挿入
    pub(crate) fn insert_tab_at(&mut self, row: usize, col: usize, width: usize) -> Result<()> {
        self.check_column(row, col, true)?;
        for offset in 0..width {
            self.rows[row].insert(col + offset, b' ', true);
        }
        self.after_row_edit(row);
        Ok(())
    }

    /// 行 `row` の `[start, end)` を削除
    pub(crate) fn remove_bytes(&mut self, row: usize, start: usize, end: usize) -> Result<()> {
        self.check_column(row, end, true)?;
        if start > end {
            return Err(IndexError::Column {
                row,
                col: start,
                len: self.rows[row].len(),
            }
            .into());
        }
        if start < end {
            self.rows[row].remove_range(start, end);
            self.after_row_edit(row);
        }
        Ok(())
    }

    /// 全行の並走配列とインデックスが整合しているか
    pub fn check_invariants(&self) -> bool {
        self.rows
            .iter()
            .enumerate()
            .all(|(i, row)| row.index() == i && row.is_synchronized())
    }

    fn check_row(&self, at: usize) -> Result<()> {
        if at < self.rows.len() {
            Ok(())
        } else {
            Err(IndexError::Row {
                index: at,
                len: self.rows.len(),
            }
            .into())
        }
    }

    fn check_column(&self, row: usize, col: usize, allow_end: bool) -> Result<()> {
        self.check_row(row)?;
        let len = self.rows[row].len();
        if col < len || (allow_end && col == len) {
            Ok(())
        } else {
            Err(IndexError::Column { row, col, len }.into())
        }
    }

    /// 行の挿入・削除後の後処理
    fn after_structural_edit(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.set_index(i);
        }
        self.after_row_edit(from);
        self.drop_stale_selection();
    }

    /// 行内容の変更後の後処理
    fn after_row_edit(&mut self, from: usize) {
        self.dirty += 1;
        if self.needs_full_rehighlight {
            self.rehighlight_all();
        } else {
            Highlighter::new(&self.syntax).refresh_from(&mut self.rows, from);
        }
        self.clamp_cursor();
    }

    /// 行が縮んだ・消えた後もカーソルが有効な位置を指すようにする
    fn clamp_cursor(&mut self) {
        let cursor = self.cursor;
        self.set_cursor(cursor);
    }

    /// 存在しない行を指す選択範囲を解除
    fn drop_stale_selection(&mut self) {
        if self.selection_start.is_none() {
            return;
        }
        let len = self.rows.len() as isize;
        if self.selection_start.row >= len || self.selection_end.row >= len {
            log::warn!("selection cleared");
            self.clear_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Highlight;

    fn c_registry() -> SyntaxRegistry {
        SyntaxRegistry::builtin()
    }

    #[test]
    fn load_and_save_round_trip() {
        let buffer = Buffer::from_text("a.txt", "one\r\ntwo\n\nfour", &EngineConfig::default());
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.rows_to_text(), "one\ntwo\n\nfour\n");
        assert_eq!(buffer.to_bytes(), b"one\ntwo\n\nfour\n".to_vec());
        assert!(!buffer.is_dirty());
        assert!(buffer.check_invariants());
    }

    #[test]
    fn primitives_validate_before_mutating() {
        let mut buffer = Buffer::from_text("a", "abc", &EngineConfig::default());

        assert!(buffer.insert_row(2, Row::new()).is_err());
        assert!(buffer.remove_row(1).is_err());
        assert!(buffer.insert_char_at(0, 4, b'x').is_err());
        assert!(buffer.delete_char_at(0, 3).is_err());
        assert!(buffer.remove_rows(0, 2).is_err());

        assert_eq!(buffer.rows_to_text(), "abc\n");
        assert_eq!(buffer.dirty(), 0);
    }

    #[test]
    fn structural_edits_renumber_rows() {
        let mut buffer = Buffer::from_text("a", "a\nb\nc", &EngineConfig::default());
        buffer.insert_row(1, Row::from_bytes(b"x")).unwrap();
        assert!(buffer.check_invariants());
        assert_eq!(buffer.row(2).unwrap().index(), 2);

        let removed = buffer.remove_rows(0, 2).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(buffer.rows_to_text(), "b\nc\n");
        assert!(buffer.check_invariants());
        assert_eq!(buffer.dirty(), 2);
    }

    #[test]
    fn char_edits_refresh_highlight() {
        let mut buffer = Buffer::from_text("main.c", "int a;\nint b;", &EngineConfig::default());
        buffer.select_syntax("main.c", &c_registry());
        assert_eq!(buffer.row(1).unwrap().highlight()[0], Highlight::Type);

        buffer.insert_char_at(0, 0, b'/').unwrap();
        buffer.insert_char_at(0, 1, b'*').unwrap();
        assert!(buffer.row(0).unwrap().comment_open());
        assert_eq!(buffer.row(1).unwrap().highlight()[0], Highlight::MlComment);

        assert_eq!(buffer.delete_char_at(0, 0).unwrap(), b'/');
        assert_eq!(buffer.row(1).unwrap().highlight()[0], Highlight::Type);
    }

    #[test]
    fn unknown_file_name_falls_back_to_plain() {
        let mut buffer = Buffer::from_text("notes", "int 1", &EngineConfig::default());
        assert!(!buffer.select_syntax("notes", &c_registry()));
        assert!(buffer.syntax().is_empty());
        assert!(buffer.row(0).unwrap().highlight().iter().all(|&h| h == Highlight::Normal));
        assert!(!buffer.needs_full_rehighlight());
    }

    #[test]
    fn cursor_is_clamped() {
        let mut buffer = Buffer::from_text("a", "abc\nde", &EngineConfig::default());
        buffer.set_cursor(CursorPosition::at(1, 10));
        assert_eq!(buffer.cursor(), CursorPosition::at(1, 2));
        buffer.set_cursor(CursorPosition::at(9, 9));
        assert_eq!(buffer.cursor(), CursorPosition::at(2, 0));
    }

    #[test]
    fn primitives_keep_cursor_in_bounds() {
        let mut buffer = Buffer::from_text("a", "a\nb\nc", &EngineConfig::default());
        buffer.set_cursor(CursorPosition::at(3, 0));
        buffer.remove_row(0).unwrap();
        assert_eq!(buffer.cursor(), CursorPosition::at(2, 0));

        let mut buffer = Buffer::from_text("a", "hello", &EngineConfig::default());
        buffer.set_cursor(CursorPosition::at(0, 5));
        buffer.replace_row(0, Row::from_bytes(b"hi")).unwrap();
        assert_eq!(buffer.cursor(), CursorPosition::at(0, 2));

        buffer.set_cursor(CursorPosition::at(0, 2));
        buffer.delete_char_at(0, 1).unwrap();
        assert_eq!(buffer.cursor(), CursorPosition::at(0, 1));
    }

    #[test]
    fn scroll_follows_cursor() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut buffer = Buffer::from_text("a", &text, &EngineConfig::default());
        buffer.set_cursor(CursorPosition::at(30, 0));
        buffer.scroll_to_cursor(10, 80);
        assert_eq!(buffer.viewport().row_offset, 21);

        buffer.set_cursor(CursorPosition::at(5, 0));
        buffer.scroll_to_cursor(10, 80);
        assert_eq!(buffer.viewport().row_offset, 5);
    }
}
