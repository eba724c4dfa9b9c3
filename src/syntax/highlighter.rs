//! ハイライト状態機械
//!
//! 1行ずつバイトを分類する。行の開始状態は直前の行の `comment_open` で決まり、
//! 行末のコメント状態が変わった場合は後続行をワークリスト方式で再分類する

use crate::buffer::Row;
use crate::syntax::{Highlight, SyntaxDescriptor};

/// 行内の走査状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    SingleLineComment,
    MultiLineComment,
    StringLiteral { quote: u8 },
    Number { seen_dot: bool },
}

/// 区切り文字（空白・NUL・記号。`_` も含む）
pub fn is_delimiter(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0 || c.is_ascii_punctuation()
}

/// シンタックス定義に従って行を分類する
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'a> {
    syntax: &'a SyntaxDescriptor,
}

impl<'a> Highlighter<'a> {
    pub fn new(syntax: &'a SyntaxDescriptor) -> Self {
        Self { syntax }
    }

    /// 全行を先頭から再分類
    pub fn highlight_all(&self, rows: &mut [Row]) {
        for index in 0..rows.len() {
            let in_comment = index > 0 && rows[index - 1].comment_open();
            self.highlight_row(&mut rows[index], in_comment);
        }
    }

    /// `start` 行を再分類し、開始状態が食い違う後続行へ伝播する
    ///
    /// 再分類した行数を返す
    pub fn refresh_from(&self, rows: &mut [Row], start: usize) -> usize {
        let mut highlighted = 0;
        let mut index = start;

        while index < rows.len() {
            let in_comment = index > 0 && rows[index - 1].comment_open();
            if index > start && rows[index].seeded_in_comment() == Some(in_comment) {
                break;
            }
            self.highlight_row(&mut rows[index], in_comment);
            highlighted += 1;
            index += 1;
        }

        if highlighted > 1 {
            log::debug!(
                "comment state cascaded from row {} over {} rows",
                start,
                highlighted
            );
        }
        highlighted
    }

    /// 1行を分類する。`in_comment` は直前の行から引き継いだ状態
    pub fn highlight_row(&self, row: &mut Row, in_comment: bool) {
        let exit_in_comment = if self.syntax.is_empty() {
            row.highlight_mut().fill(Highlight::Normal);
            false
        } else {
            self.scan(row, in_comment)
        };
        row.set_comment_open(exit_in_comment);
        row.set_seeded_in_comment(in_comment);
    }

    fn scan(&self, row: &mut Row, in_comment: bool) -> bool {
        let scs = self.syntax.single_line_comment_start.as_bytes();
        let mcs = self.syntax.multi_line_comment_start.as_bytes();
        let mce = self.syntax.multi_line_comment_end.as_bytes();
        let numbers = self.syntax.highlights_numbers();
        let strings = self.syntax.highlights_strings();

        let (chars, hl) = row.parts_mut();
        hl.fill(Highlight::Normal);
        let len = chars.len();

        let mut state = if in_comment {
            State::MultiLineComment
        } else {
            State::Normal
        };
        let mut i = 0;

        while i < len {
            match state {
                State::Normal => {
                    let c = chars[i];
                    if !scs.is_empty() && chars[i..].starts_with(scs) {
                        state = State::SingleLineComment;
                        continue;
                    }
                    if !mcs.is_empty() && chars[i..].starts_with(mcs) {
                        hl[i..i + mcs.len()].fill(Highlight::MlComment);
                        i += mcs.len();
                        state = State::MultiLineComment;
                        continue;
                    }
                    if strings && (c == b'"' || c == b'\'') {
                        hl[i] = Highlight::String;
                        i += 1;
                        state = State::StringLiteral { quote: c };
                        continue;
                    }

                    let at_token_start = i == 0 || is_delimiter(chars[i - 1]);
                    if is_delimiter(c) || !at_token_start {
                        i += 1;
                        continue;
                    }
                    if numbers && c.is_ascii_digit() && starts_number(chars, i) {
                        state = State::Number { seen_dot: false };
                        continue;
                    }

                    let end = token_end(chars, i);
                    if let Some(class) = self.syntax.keyword(&chars[i..end]) {
                        hl[i..end].fill(class);
                    }
                    i = end;
                }
                State::SingleLineComment => {
                    hl[i..].fill(Highlight::Comment);
                    i = len;
                }
                State::MultiLineComment => {
                    if !mce.is_empty() && chars[i..].starts_with(mce) {
                        hl[i..i + mce.len()].fill(Highlight::MlComment);
                        i += mce.len();
                        state = State::Normal;
                    } else {
                        hl[i] = Highlight::MlComment;
                        i += 1;
                    }
                }
                State::StringLiteral { quote } => {
                    hl[i] = Highlight::String;
                    if chars[i] == b'\\' && i + 1 < len {
                        hl[i + 1] = Highlight::String;
                        i += 2;
                        continue;
                    }
                    if chars[i] == quote {
                        state = State::Normal;
                    }
                    i += 1;
                }
                State::Number { seen_dot } => {
                    let c = chars[i];
                    if c.is_ascii_digit() {
                        hl[i] = Highlight::Number;
                        i += 1;
                    } else if c == b'.'
                        && !seen_dot
                        && chars.get(i + 1).is_some_and(u8::is_ascii_digit)
                    {
                        hl[i] = Highlight::Number;
                        i += 1;
                        state = State::Number { seen_dot: true };
                    } else {
                        // 同じ位置を通常状態で評価し直す
                        state = State::Normal;
                    }
                }
            }
        }

        state == State::MultiLineComment
    }
}

/// `start` から始まる数字の並びが区切り文字で終わるか
fn starts_number(chars: &[u8], start: usize) -> bool {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    end == chars.len() || is_delimiter(chars[end])
}

/// `start` から区切り文字の直前までの終端位置
fn token_end(chars: &[u8], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|&c| is_delimiter(c))
        .map_or(chars.len(), |offset| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxFlags;

    fn c_like() -> SyntaxDescriptor {
        let mut syntax = SyntaxDescriptor {
            file_type: "c".to_string(),
            single_line_comment_start: "//".to_string(),
            multi_line_comment_start: "/*".to_string(),
            multi_line_comment_end: "*/".to_string(),
            flags: SyntaxFlags::HIGHLIGHT_NUMBERS | SyntaxFlags::HIGHLIGHT_STRINGS,
            ..SyntaxDescriptor::default()
        };
        syntax.keywords.insert("if".to_string(), Highlight::ControlFlow);
        syntax.keywords.insert("int".to_string(), Highlight::Type);
        syntax
    }

    fn rows(lines: &[&str]) -> Vec<Row> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let mut row = Row::from_bytes(line.as_bytes());
                row.set_index(i);
                row
            })
            .collect()
    }

    #[test]
    fn keywords_and_numbers() {
        let syntax = c_like();
        let mut rows = rows(&["int x = 42;"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        let hl = rows[0].highlight();
        assert_eq!(&hl[0..3], &[Highlight::Type; 3]);
        assert_eq!(hl[4], Highlight::Normal);
        assert_eq!(&hl[8..10], &[Highlight::Number; 2]);
        assert_eq!(hl[10], Highlight::Normal);
    }

    #[test]
    fn keyword_inside_identifier_is_not_highlighted() {
        let syntax = c_like();
        let mut rows = rows(&["iffy x1 int2"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        assert!(rows[0].highlight().iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn underscore_separates_tokens() {
        let syntax = c_like();
        let mut rows = rows(&["int_x x_1"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        let hl = rows[0].highlight();
        assert_eq!(&hl[0..3], &[Highlight::Type; 3]);
        assert_eq!(&hl[3..6], &[Highlight::Normal; 3]);
        assert_eq!(hl[8], Highlight::Number);
    }

    #[test]
    fn decimal_numbers_take_one_dot() {
        let syntax = c_like();
        let mut rows = rows(&["3.14.5"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        let hl = rows[0].highlight();
        assert_eq!(&hl[0..4], &[Highlight::Number; 4]);
        assert_eq!(hl[4], Highlight::Normal);
    }

    #[test]
    fn strings_honor_escapes() {
        let syntax = c_like();
        let mut rows = rows(&[r#"a = "x\"y" + 1"#]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        let hl = rows[0].highlight();
        assert_eq!(&hl[4..10], &[Highlight::String; 6]);
        assert_eq!(hl[10], Highlight::Normal);
        assert_eq!(hl[13], Highlight::Number);
    }

    #[test]
    fn single_line_comment_runs_to_end() {
        let syntax = c_like();
        let mut rows = rows(&["x; // if 1", "//"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        assert_eq!(&rows[0].highlight()[3..], &[Highlight::Comment; 7]);
        assert_eq!(rows[1].highlight(), &[Highlight::Comment; 2]);
        assert!(!rows[0].comment_open());
    }

    #[test]
    fn multi_line_comment_spans_rows() {
        let syntax = c_like();
        let mut rows = rows(&["/* start", "middle", "end */"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        for row in &rows {
            assert!(row.highlight().iter().all(|&h| h == Highlight::MlComment));
        }
        let open: Vec<bool> = rows.iter().map(Row::comment_open).collect();
        assert_eq!(open, vec![true, true, false]);
    }

    #[test]
    fn refresh_propagates_until_state_matches() {
        let syntax = c_like();
        let mut rows = rows(&["a", "b", "c */ d", "e"]);
        let highlighter = Highlighter::new(&syntax);
        highlighter.highlight_all(&mut rows);
        assert!(rows.iter().all(|r| !r.comment_open()));

        rows[0].insert_bytes(0, b"/*");
        let count = highlighter.refresh_from(&mut rows, 0);

        // 行0〜2は状態が変わり、行3は開始状態が変わらないので止まる
        assert_eq!(count, 3);
        assert!(rows[1].highlight().iter().all(|&h| h == Highlight::MlComment));
        assert_eq!(rows[2].highlight()[5], Highlight::Normal);
        assert!(!rows[2].comment_open());
    }

    #[test]
    fn refresh_stops_when_exit_state_is_unchanged() {
        let syntax = c_like();
        let mut rows = rows(&["int a", "int b", "int c"]);
        let highlighter = Highlighter::new(&syntax);
        highlighter.highlight_all(&mut rows);

        rows[1].insert(0, b'x', false);
        assert_eq!(highlighter.refresh_from(&mut rows, 1), 1);
    }

    #[test]
    fn empty_syntax_leaves_everything_normal() {
        let syntax = SyntaxDescriptor::empty();
        let mut rows = rows(&["/* 42 \"s\" */"]);
        Highlighter::new(&syntax).highlight_all(&mut rows);

        assert!(rows[0].highlight().iter().all(|&h| h == Highlight::Normal));
        assert!(!rows[0].comment_open());
    }
}
