//! 選択範囲
//!
//! 端点は行番号マージンを含む表示列で持つ。判定・削除・コピーは
//! マージンを差し引いたバイト列で行う

use crate::buffer::{Buffer, CursorPosition, Point, Row};
use crate::editor::history::EditorAction;
use crate::editor::Yank;
use crate::error::{EngineError, Result};

/// 2点を (先, 後) の順に並べる
pub fn normalize(a: Point, b: Point) -> (Point, Point) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// バイト位置 (`row`, `col`) が選択範囲に含まれるか（両端を含む）
///
/// `low` と `high` は正規化済みであること
pub fn is_within_selection(row: usize, col: usize, low: Point, high: Point, margin: usize) -> bool {
    if low.is_none() || high.is_none() {
        return false;
    }
    let row = row as isize;
    let col = col as isize;
    let start_col = low.col - margin as isize;
    let end_col = high.col - margin as isize;

    if row == low.row && row == high.row {
        col >= start_col && col <= end_col
    } else if row == low.row {
        col >= start_col
    } else if row == high.row {
        col <= end_col
    } else {
        row > low.row && row < high.row
    }
}

impl Buffer {
    /// 正規化した選択範囲
    pub fn selection(&self) -> (Point, Point) {
        normalize(self.selection_start, self.selection_end)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection_start.is_none() && !self.selection_end.is_none()
    }

    /// カーソル位置から選択を始める（最終行の次では何もしない）
    pub fn start_selection(&mut self) {
        if self.cursor().row >= self.len() {
            return;
        }
        let point = Point::from_cursor(self.cursor(), self.line_number_width());
        self.selection_start = point;
        self.selection_end = point;
    }

    /// 選択の終端をカーソル位置に合わせる
    pub fn extend_selection(&mut self) {
        if self.selection_start.is_none() {
            self.start_selection();
            return;
        }
        if self.cursor().row >= self.len() {
            return;
        }
        self.selection_end = Point::from_cursor(self.cursor(), self.line_number_width());
    }

    /// カーソル行全体を選択
    pub fn select_line(&mut self) {
        let cursor = self.cursor();
        let Some(row) = self.row(cursor.row) else {
            return;
        };
        let margin = self.line_number_width() as isize;
        let len = row.len() as isize;
        self.selection_start = Point::new(cursor.row as isize, margin);
        self.selection_end = Point::new(cursor.row as isize, margin + len);
    }

    /// 端点を直接指定する。存在しない行を指す場合は選択を解除してエラー
    pub fn set_selection(&mut self, start: Point, end: Point) -> Result<()> {
        self.selection_start = start;
        self.selection_end = end;
        self.validated_selection().map(|_| ())
    }

    pub fn clear_selection(&mut self) {
        self.selection_start = Point::NONE;
        self.selection_end = Point::NONE;
    }

    /// バイト位置が選択範囲に含まれるか
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        let (low, high) = self.selection();
        is_within_selection(row, col, low, high, self.line_number_width())
    }

    /// 選択範囲を削除して取り消し履歴に記録する
    ///
    /// 選択が無ければ何もせず `false`
    pub fn delete_selection(&mut self) -> Result<bool> {
        let Some((low, high)) = self.validated_selection()? else {
            return Ok(false);
        };
        let margin = self.line_number_width();
        let start_row = low.row as usize;
        let end_row = high.row as usize;
        let cursor_col = self.cursor().col;
        self.clear_selection();

        if start_row == end_row {
            let row = &self.rows()[start_row];
            let start = low.byte_col(margin).min(row.len());
            let end = (high.byte_col(margin) + 1).min(row.len()).max(start);
            let action = EditorAction::update_row(start_row, row.clone(), cursor_col, self.len());
            self.remove_bytes(start_row, start, end)?;
            self.record_action(action);
        } else {
            self.delete_rows_between(start_row, end_row, low, high, cursor_col)?;
        }

        log::debug!("deleted selection rows {}..={}", start_row, end_row);
        self.set_cursor(CursorPosition::at(start_row, 0));
        Ok(true)
    }

    /// 複数行にまたがる削除。各段階の記録を1回の取り消し単位にまとめて積む
    fn delete_rows_between(
        &mut self,
        start_row: usize,
        end_row: usize,
        low: Point,
        high: Point,
        cursor_col: usize,
    ) -> Result<()> {
        let margin = self.line_number_width();
        let mut steps = Vec::with_capacity(end_row - start_row + 2);

        // 開始行の選択開始以降を落とす
        let first = self.rows()[start_row].clone();
        let cut = low.byte_col(margin).min(first.len());
        let first_len = first.len();
        self.remove_bytes(start_row, cut, first_len)?;
        steps.push(EditorAction::update_row(start_row, first, cursor_col, self.len()).captured(self));

        // 終了行の選択終了より前を落とす
        let last = self.rows()[end_row].clone();
        let keep_from = high.byte_col(margin).min(last.len());
        self.remove_bytes(end_row, 0, keep_from)?;
        steps.push(EditorAction::update_row(end_row, last, cursor_col, self.len()).captured(self));

        // 中間の行を削除
        for _ in start_row + 1..end_row {
            let row = self.remove_row(start_row + 1)?;
            steps.push(EditorAction::delete_row(start_row + 1, row, cursor_col, self.len()).captured(self));
        }

        // 終了行の残りを開始行へ連結
        let prev_row = self.rows()[start_row].clone();
        let tail = self.rows()[start_row + 1].clone();
        let mut merged = prev_row.clone();
        merged.append(&tail);
        self.replace_row(start_row, merged)?;
        self.remove_row(start_row + 1)?;
        steps.push(
            EditorAction::append_row_to_previous(start_row + 1, prev_row, tail, cursor_col, self.len())
                .captured(self),
        );

        self.record_action(EditorAction::group(start_row, steps, cursor_col, self.len()));
        Ok(())
    }

    /// 選択範囲を切り離した行としてヤンクに保持する
    pub fn yank_selection(&mut self) -> Result<bool> {
        let Some((low, high)) = self.validated_selection()? else {
            return Ok(false);
        };
        let margin = self.line_number_width();
        let start_row = low.row as usize;
        let end_row = high.row as usize;

        let rows: Vec<Row> = (start_row..=end_row)
            .map(|i| {
                let row = &self.rows()[i];
                let len = row.len();
                let start = if i == start_row {
                    low.byte_col(margin).min(len)
                } else {
                    0
                };
                let end = if i != end_row {
                    len
                } else if start_row == end_row {
                    (high.byte_col(margin) + 1).min(len)
                } else {
                    high.byte_col(margin).min(len)
                };
                row.detached_slice(start, end.max(start))
            })
            .collect();

        log::debug!("yanked {} rows", rows.len());
        self.yank = Yank::from_rows(rows);
        Ok(true)
    }

    /// 選択範囲を検証する。行が存在しなければ解除してエラー
    fn validated_selection(&mut self) -> Result<Option<(Point, Point)>> {
        if !self.has_selection() {
            return Ok(None);
        }
        let (low, high) = self.selection();
        let len = self.len();
        if low.row < 0 || high.row < 0 || high.row as usize >= len {
            log::warn!("selection cleared");
            self.clear_selection();
            return Err(EngineError::MalformedSelection {
                start_row: low.row,
                end_row: high.row,
                row_count: len,
            });
        }
        Ok(Some((low, high)))
    }
}
