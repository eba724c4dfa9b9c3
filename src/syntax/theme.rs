//! ハイライト分類の配色
//!
//! レンダラが参照する固定の分類 → 色対応表

use crate::syntax::Highlight;
use ratatui::style::{Color, Modifier, Style};

/// 分類に対応する前景色（16色端末向け）
pub fn highlight_color(highlight: Highlight) -> Color {
    match highlight {
        Highlight::ControlFlow | Highlight::Keyword => Color::Magenta,
        Highlight::Variable | Highlight::Module => Color::Blue,
        Highlight::Constant | Highlight::Test => Color::Green,
        Highlight::Type | Highlight::Boolean => Color::Yellow,
        Highlight::Function => Color::Cyan,
        Highlight::Preprocessor | Highlight::Debug => Color::DarkGray,
        Highlight::StorageClass => Color::LightBlue,
        Highlight::Operator | Highlight::Normal => Color::White,
        Highlight::Comment | Highlight::MlComment => Color::DarkGray,
        Highlight::String => Color::LightGreen,
        Highlight::Number | Highlight::Builtin => Color::Red,
        Highlight::Annotation => Color::Black,
        Highlight::Exception => Color::LightRed,
        Highlight::Documentation | Highlight::Match => Color::LightYellow,
    }
}

/// 分類に対応するスタイル
pub fn highlight_style(highlight: Highlight) -> Style {
    let style = Style::default().fg(highlight_color(highlight));
    match highlight {
        Highlight::Match => style.bg(Color::Yellow).fg(Color::Black),
        Highlight::Documentation => style.add_modifier(Modifier::ITALIC),
        _ => style,
    }
}

/// 選択範囲の反転表示スタイル
pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_share_a_color() {
        assert_eq!(
            highlight_color(Highlight::Comment),
            highlight_color(Highlight::MlComment)
        );
    }

    #[test]
    fn match_style_has_background() {
        let style = highlight_style(Highlight::Match);
        assert_eq!(style.bg, Some(Color::Yellow));
        assert_eq!(highlight_style(Highlight::Keyword).bg, None);
    }
}
