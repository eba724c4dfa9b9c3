//! 取り消し・やり直し履歴
//!
//! 各記録は変更前の行スナップショットを持ち、取り消しはスナップショットだけで
//! 行えるよう種別ごとに逆操作が決まっている。やり直しは取り消し時に計算した
//! 逆操作を記録として積むことで実現する。
//!
//! 記録には操作直後の対象行の内容も残し、取り消し時に現在の内容と照合する。

use crate::buffer::{Buffer, CursorPosition, Row};
use crate::error::{EngineError, IndexError, Result};
use std::collections::VecDeque;
use std::ops::Range;

/// 記録の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// 1行の内容変更
    UpdateRow,
    /// 行の分割（改行挿入）
    InsertRow,
    /// 行の削除
    DeleteRow,
    /// 直前の行への連結
    AppendRowToPrevious,
    /// 最終行の次への書き込みで行が増えた
    InsertCharAtEnd,
    /// 複数の記録をまとめた1操作
    Group,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::UpdateRow => "UpdateRow",
            ActionKind::InsertRow => "InsertRow",
            ActionKind::DeleteRow => "DeleteRow",
            ActionKind::AppendRowToPrevious => "AppendRowToPrevious",
            ActionKind::InsertCharAtEnd => "InsertCharAtEnd",
            ActionKind::Group => "Group",
        }
    }
}

/// 種別ごとのスナップショット
#[derive(Debug, Clone, PartialEq)]
pub enum RowChange {
    /// 変更前の行
    UpdateRow { row: Row },
    /// 分割前の行
    InsertRow { row: Row },
    /// 削除された行
    DeleteRow { row: Row },
    /// 連結前の前の行と、連結された行
    AppendRowToPrevious { prev_row: Row, row: Row },
    InsertCharAtEnd,
    /// 適用順に並んだ記録。取り消しは逆順に行う
    Group { actions: Vec<EditorAction> },
}

/// 取り消し可能な1操作の記録
#[derive(Debug, Clone, PartialEq)]
pub struct EditorAction {
    /// 対象行
    pub row_index: usize,
    /// 操作前のカーソル列（バイト）
    pub cursor_col_before: usize,
    /// 記録を適用する時点で期待される行数
    pub expected_rows: usize,
    pub change: RowChange,
    /// 操作直後の対象行の内容。`None` なら照合しない
    pub targets: Option<Vec<Vec<u8>>>,
}

impl EditorAction {
    fn with_change(row_index: usize, cursor_col_before: usize, expected_rows: usize, change: RowChange) -> Self {
        Self {
            row_index,
            cursor_col_before,
            expected_rows,
            change,
            targets: None,
        }
    }

    pub fn update_row(row_index: usize, row: Row, cursor_col_before: usize, expected_rows: usize) -> Self {
        Self::with_change(row_index, cursor_col_before, expected_rows, RowChange::UpdateRow { row })
    }

    pub fn insert_row(row_index: usize, row: Row, cursor_col_before: usize, expected_rows: usize) -> Self {
        Self::with_change(row_index, cursor_col_before, expected_rows, RowChange::InsertRow { row })
    }

    pub fn delete_row(row_index: usize, row: Row, cursor_col_before: usize, expected_rows: usize) -> Self {
        Self::with_change(row_index, cursor_col_before, expected_rows, RowChange::DeleteRow { row })
    }

    /// `row_index` の行を `row_index - 1` の行へ連結した記録
    pub fn append_row_to_previous(
        row_index: usize,
        prev_row: Row,
        row: Row,
        cursor_col_before: usize,
        expected_rows: usize,
    ) -> Self {
        Self::with_change(
            row_index,
            cursor_col_before,
            expected_rows,
            RowChange::AppendRowToPrevious { prev_row, row },
        )
    }

    pub fn insert_char_at_end(row_index: usize, cursor_col_before: usize, expected_rows: usize) -> Self {
        Self::with_change(row_index, cursor_col_before, expected_rows, RowChange::InsertCharAtEnd)
    }

    /// 適用順に並んだ記録を1回の取り消し単位にまとめる
    pub fn group(row_index: usize, actions: Vec<EditorAction>, cursor_col_before: usize, expected_rows: usize) -> Self {
        Self::with_change(row_index, cursor_col_before, expected_rows, RowChange::Group { actions })
    }

    pub fn kind(&self) -> ActionKind {
        match self.change {
            RowChange::UpdateRow { .. } => ActionKind::UpdateRow,
            RowChange::InsertRow { .. } => ActionKind::InsertRow,
            RowChange::DeleteRow { .. } => ActionKind::DeleteRow,
            RowChange::AppendRowToPrevious { .. } => ActionKind::AppendRowToPrevious,
            RowChange::InsertCharAtEnd => ActionKind::InsertCharAtEnd,
            RowChange::Group { .. } => ActionKind::Group,
        }
    }

    /// 操作直後に対象行の内容を写し取る
    ///
    /// まとめた記録は子の記録がそれぞれ写し取る
    pub(crate) fn captured(mut self, buffer: &Buffer) -> Self {
        let targets = self
            .target_rows()
            .map(|i| buffer.row(i).map_or_else(Vec::new, |row| row.chars().to_vec()))
            .collect();
        self.targets = Some(targets);
        self
    }

    /// 操作直後の状態で内容を照合する行
    fn target_rows(&self) -> Range<usize> {
        let i = self.row_index;
        match self.change {
            RowChange::UpdateRow { .. } | RowChange::InsertCharAtEnd => i..i + 1,
            RowChange::InsertRow { .. } => i..i + 2,
            RowChange::AppendRowToPrevious { .. } => i.saturating_sub(1)..i,
            RowChange::DeleteRow { .. } | RowChange::Group { .. } => i..i,
        }
    }

    /// 記録をバッファへ逆適用し、その逆操作を返す
    ///
    /// 行数か対象行が記録と合わない場合はバッファに触れずにエラーを返す
    pub(crate) fn revert(&self, buffer: &mut Buffer) -> Result<EditorAction> {
        self.check(buffer)?;

        let i = self.row_index;
        let len = buffer.len();
        let cursor_col = buffer.cursor().col;

        let inverse = match &self.change {
            RowChange::UpdateRow { row } => {
                let current = buffer.replace_row(i, row.clone())?;
                EditorAction::update_row(i, current, cursor_col, len)
            }
            RowChange::InsertRow { row } => {
                let head = buffer.remove_row(i)?;
                let tail = buffer.replace_row(i, row.clone())?;
                EditorAction::append_row_to_previous(i + 1, head, tail, cursor_col, len - 1)
            }
            RowChange::AppendRowToPrevious { prev_row, row } => {
                let merged = buffer.replace_row(i - 1, prev_row.clone())?;
                buffer.insert_row(i, row.clone())?;
                EditorAction::insert_row(i - 1, merged, cursor_col, len + 1)
            }
            RowChange::DeleteRow { row } => {
                buffer.insert_row(i, row.clone())?;
                EditorAction::insert_char_at_end(i, cursor_col, len + 1)
            }
            RowChange::InsertCharAtEnd => {
                let removed = buffer.remove_row(i)?;
                EditorAction::delete_row(i, removed, cursor_col, len - 1)
            }
            RowChange::Group { actions } => {
                let inverses = revert_all(actions, buffer)?;
                EditorAction::group(i, inverses, cursor_col, buffer.len())
            }
        };

        buffer.set_cursor(CursorPosition::at(i, self.cursor_col_before));
        Ok(inverse.captured(buffer))
    }

    /// 適用前の整合チェック
    fn check(&self, buffer: &Buffer) -> Result<()> {
        let len = buffer.len();
        let mismatch = || EngineError::SnapshotMismatch {
            kind: self.kind().name(),
            row_index: self.row_index,
            expected_rows: self.expected_rows,
            actual_rows: len,
        };
        if len != self.expected_rows {
            return Err(mismatch());
        }

        let i = self.row_index;
        let in_range = match self.change {
            RowChange::UpdateRow { .. } | RowChange::InsertCharAtEnd => i < len,
            RowChange::InsertRow { .. } => i + 1 < len,
            RowChange::AppendRowToPrevious { .. } => i >= 1 && i <= len,
            RowChange::DeleteRow { .. } => i <= len,
            RowChange::Group { .. } => true,
        };
        if !in_range {
            return Err(IndexError::Row { index: i, len }.into());
        }

        if let Some(targets) = &self.targets {
            let matches = self
                .target_rows()
                .zip(targets)
                .all(|(r, expected)| buffer.row(r).is_some_and(|row| row.chars() == expected.as_slice()));
            if !matches {
                return Err(mismatch());
            }
        }
        Ok(())
    }
}

/// まとめた記録を逆順に戻し、逆操作を戻した順に返す
///
/// 途中で失敗したら戻し済みの分をやり直してからエラーを返す
fn revert_all(actions: &[EditorAction], buffer: &mut Buffer) -> Result<Vec<EditorAction>> {
    let mut inverses = Vec::with_capacity(actions.len());
    for action in actions.iter().rev() {
        match action.revert(buffer) {
            Ok(inverse) => inverses.push(inverse),
            Err(err) => {
                for inverse in inverses.iter().rev() {
                    if let Err(rollback) = inverse.revert(buffer) {
                        log::warn!("group rollback failed: {}", rollback);
                        break;
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(inverses)
}

/// 取り消し・やり直しスタック
///
/// どちらも `max_depth` を超えると最も古い記録から捨てる
#[derive(Debug, Clone)]
pub struct UndoRedoLog {
    undo: VecDeque<EditorAction>,
    redo: VecDeque<EditorAction>,
    max_depth: usize,
}

impl Default for UndoRedoLog {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UNDO_DEPTH)
    }
}

impl UndoRedoLog {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo: VecDeque::with_capacity(max_depth),
            redo: VecDeque::with_capacity(max_depth),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// 新しい編集を記録する。やり直しスタックは破棄
    pub fn record(&mut self, action: EditorAction) {
        self.push_undo(action);
        self.redo.clear();
    }

    /// やり直しスタックを保ったまま積む
    pub fn push_undo(&mut self, action: EditorAction) {
        push_bounded(&mut self.undo, action, self.max_depth);
    }

    pub fn pop_undo(&mut self) -> Option<EditorAction> {
        self.undo.pop_back()
    }

    pub fn push_redo(&mut self, action: EditorAction) {
        push_bounded(&mut self.redo, action, self.max_depth);
    }

    pub fn pop_redo(&mut self) -> Option<EditorAction> {
        self.redo.pop_back()
    }

    /// 直近の取り消し記録
    pub fn peek_undo(&self) -> Option<&EditorAction> {
        self.undo.back()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<EditorAction>, action: EditorAction, max_depth: usize) {
    if stack.len() == max_depth {
        stack.pop_front();
    }
    stack.push_back(action);
}
