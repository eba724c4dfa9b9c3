//! 編集操作の統合インターフェース
//!
//! カーソル位置に対する編集を1操作ずつ取り消し履歴へ記録しながら適用する。
//! スナップショットを先に取り、適用が成功した時点で記録を積む。
//! カーソルは行の編集ごとに有効な位置へ丸められる

use crate::buffer::{Buffer, CursorPosition, Row};
use crate::editor::history::EditorAction;
use crate::error::Result;

/// カーソル位置を基準にした編集操作
pub trait EditOperations {
    /// 1バイトを挿入（開き括弧は閉じ括弧を補完）
    fn insert_char(&mut self, byte: u8) -> Result<()>;

    /// タブ幅分の空白を挿入
    fn insert_tab(&mut self) -> Result<()>;

    /// カーソル前の1文字を削除。行頭なら前の行と連結する
    fn delete_char(&mut self) -> Result<bool>;

    /// カーソル位置の1文字を削除
    fn delete_forward(&mut self) -> Result<bool>;

    /// カーソル位置で行を分割
    fn insert_newline(&mut self) -> Result<()>;

    /// カーソル行を削除
    fn delete_line(&mut self) -> Result<bool>;

    /// 直近の編集を取り消す。取り消す記録が無ければ `false`
    fn undo(&mut self) -> Result<bool>;

    /// 直近の取り消しをやり直す
    fn redo(&mut self) -> Result<bool>;
}

/// 補完する閉じ括弧
fn closing_bracket(byte: u8) -> Option<u8> {
    match byte {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}

impl Buffer {
    /// カーソル行への変更を記録する準備。最終行の次なら空行を作る
    fn prepare_row_edit(&mut self) -> Result<(CursorPosition, EditorAction)> {
        let cursor = self.cursor();
        let len = self.len();
        if cursor.row == len {
            let action = EditorAction::insert_char_at_end(len, cursor.col, len + 1);
            self.insert_row(len, Row::new())?;
            Ok((CursorPosition::at(len, 0), action))
        } else {
            let snapshot = self.rows()[cursor.row].clone();
            let action = EditorAction::update_row(cursor.row, snapshot, cursor.col, len);
            Ok((cursor, action))
        }
    }

    /// 適用済みの操作を対象行の内容とともに履歴へ積む
    pub(crate) fn record_action(&mut self, action: EditorAction) {
        let action = action.captured(self);
        self.record_action(action);
    }
}

impl EditOperations for Buffer {
    fn insert_char(&mut self, byte: u8) -> Result<()> {
        let (cursor, action) = self.prepare_row_edit()?;
        self.insert_char_at(cursor.row, cursor.col, byte)?;
        if self.auto_close_brackets {
            if let Some(close) = closing_bracket(byte) {
                self.insert_char_at(cursor.row, cursor.col + 1, close)?;
            }
        }
        self.record_action(action);
        self.set_cursor(CursorPosition::at(cursor.row, cursor.col + 1));
        Ok(())
    }

    fn insert_tab(&mut self) -> Result<()> {
        let (cursor, action) = self.prepare_row_edit()?;
        let width = self.tab_stop;
        self.insert_tab_at(cursor.row, cursor.col, width)?;
        if cursor.col == 0 {
            if let Some(row) = self.row_mut(cursor.row) {
                row.indentation_level += 1;
            }
        }
        self.record_action(action);
        self.set_cursor(CursorPosition::at(cursor.row, cursor.col + width));
        Ok(())
    }

    fn delete_char(&mut self) -> Result<bool> {
        let cursor = self.cursor();
        let len = self.len();
        if cursor.row >= len || (cursor.row == 0 && cursor.col == 0) {
            return Ok(false);
        }

        if cursor.col == 0 {
            let row = self.rows()[cursor.row].clone();
            let prev_row = self.rows()[cursor.row - 1].clone();
            let prev_len = prev_row.len();
            let action =
                EditorAction::append_row_to_previous(cursor.row, prev_row.clone(), row.clone(), 0, len - 1);

            let mut merged = prev_row;
            merged.append(&row);
            self.replace_row(cursor.row - 1, merged)?;
            self.remove_row(cursor.row)?;
            self.record_action(action);
            self.set_cursor(CursorPosition::at(cursor.row - 1, prev_len));
            return Ok(true);
        }

        let row = self.rows()[cursor.row].clone();
        let action = EditorAction::update_row(cursor.row, row.clone(), cursor.col, len);

        let mut start = cursor.col - 1;
        if row.tabs()[start] {
            // タブ展開の空白はまとめて消す
            let mut width = 1;
            while start > 0 && row.tabs()[start - 1] && width < self.tab_stop {
                start -= 1;
                width += 1;
            }
            self.remove_bytes(cursor.row, start, cursor.col)?;
            if let Some(row) = self.row_mut(cursor.row) {
                row.indentation_level = row.indentation_level.saturating_sub(1);
            }
        } else {
            self.delete_char_at(cursor.row, start)?;
        }

        self.record_action(action);
        self.set_cursor(CursorPosition::at(cursor.row, start));
        Ok(true)
    }

    fn delete_forward(&mut self) -> Result<bool> {
        let cursor = self.cursor();
        let len = self.len();
        if cursor.row >= len {
            return Ok(false);
        }
        if cursor.col < self.rows()[cursor.row].len() {
            self.set_cursor(CursorPosition::at(cursor.row, cursor.col + 1));
        } else if cursor.row + 1 < len {
            self.set_cursor(CursorPosition::at(cursor.row + 1, 0));
        } else {
            return Ok(false);
        }
        self.delete_char()
    }

    fn insert_newline(&mut self) -> Result<()> {
        let cursor = self.cursor();
        let len = self.len();

        if cursor.row == len {
            let action = EditorAction::insert_char_at_end(len, cursor.col, len + 1);
            self.insert_row(len, Row::new())?;
            self.record_action(action);
            self.set_cursor(CursorPosition::at(len + 1, 0));
            return Ok(());
        }

        let row = self.rows()[cursor.row].clone();
        let action = EditorAction::insert_row(cursor.row, row.clone(), cursor.col, len + 1);

        let mut head = row;
        let tail = head.split_off(cursor.col);
        self.replace_row(cursor.row, head)?;
        self.insert_row(cursor.row + 1, tail)?;
        self.record_action(action);
        self.set_cursor(CursorPosition::at(cursor.row + 1, 0));
        Ok(())
    }

    fn delete_line(&mut self) -> Result<bool> {
        let cursor = self.cursor();
        let len = self.len();
        if cursor.row >= len {
            return Ok(false);
        }

        let row = self.remove_row(cursor.row)?;
        self.record_action(EditorAction::delete_row(cursor.row, row, cursor.col, len - 1));
        self.set_cursor(CursorPosition::at(cursor.row, 0));
        Ok(true)
    }

    fn undo(&mut self) -> Result<bool> {
        let Some(action) = self.history.pop_undo() else {
            return Ok(false);
        };

        match action.revert(self) {
            Ok(inverse) => {
                log::debug!("undo {} at row {}", action.kind().name(), action.row_index);
                self.history.push_redo(inverse);
                Ok(true)
            }
            Err(err) => {
                log::warn!("undo rejected: {}", err);
                self.history.push_undo(action);
                Err(err)
            }
        }
    }

    fn redo(&mut self) -> Result<bool> {
        let Some(action) = self.history.pop_redo() else {
            return Ok(false);
        };

        match action.revert(self) {
            Ok(inverse) => {
                log::debug!("redo {} at row {}", action.kind().name(), action.row_index);
                self.history.push_undo(inverse);
                Ok(true)
            }
            Err(err) => {
                log::warn!("redo rejected: {}", err);
                self.history.push_redo(action);
                Err(err)
            }
        }
    }
}
