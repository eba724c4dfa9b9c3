//! シンタックスハイライトモジュール
//!
//! ハイライト分類、言語ごとのシンタックス定義、行単位の状態機械を提供

pub mod highlighter;
pub mod registry;
pub mod theme;

pub use highlighter::Highlighter;
pub use registry::{select_syntax, SyntaxRegistry};
pub use theme::highlight_color;

use bitflags::bitflags;
use serde::Deserialize;
use std::collections::HashMap;

/// バイト単位のハイライト分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Highlight {
    #[default]
    Normal,
    Number,
    Match,
    String,
    Comment,
    MlComment,
    Keyword,
    ControlFlow,
    Type,
    Function,
    Constant,
    Boolean,
    Builtin,
    Module,
    StorageClass,
    Operator,
    Preprocessor,
    Exception,
    Variable,
    Annotation,
    Debug,
    Test,
    Documentation,
}

impl Highlight {
    /// 表示用の短い名前
    pub fn name(self) -> &'static str {
        match self {
            Highlight::Normal => "normal",
            Highlight::Number => "number",
            Highlight::Match => "match",
            Highlight::String => "string",
            Highlight::Comment => "comment",
            Highlight::MlComment => "ml_comment",
            Highlight::Keyword => "keyword",
            Highlight::ControlFlow => "control_flow",
            Highlight::Type => "type",
            Highlight::Function => "function",
            Highlight::Constant => "constant",
            Highlight::Boolean => "boolean",
            Highlight::Builtin => "builtin",
            Highlight::Module => "module",
            Highlight::StorageClass => "storage_class",
            Highlight::Operator => "operator",
            Highlight::Preprocessor => "preprocessor",
            Highlight::Exception => "exception",
            Highlight::Variable => "variable",
            Highlight::Annotation => "annotation",
            Highlight::Debug => "debug",
            Highlight::Test => "test",
            Highlight::Documentation => "documentation",
        }
    }

    /// コメント系の分類か
    pub fn is_comment(self) -> bool {
        matches!(self, Highlight::Comment | Highlight::MlComment)
    }
}

bitflags! {
    /// シンタックス定義のフラグ
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SyntaxFlags: u8 {
        const HIGHLIGHT_NUMBERS = 1 << 0;
        const HIGHLIGHT_STRINGS = 1 << 1;
    }
}

/// 言語ごとのハイライト規則
///
/// バッファ作成時にファイル名から一度だけ選択され、以後は再選択されるまで不変
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SyntaxDescriptor {
    /// ファイル種別（空文字は未選択）
    pub file_type: String,
    /// ファイル名照合パターン（`.` 始まりは拡張子一致、それ以外は部分一致）
    pub file_match: Vec<String>,
    /// トークン → 分類
    pub keywords: HashMap<String, Highlight>,
    pub single_line_comment_start: String,
    pub multi_line_comment_start: String,
    pub multi_line_comment_end: String,
    #[serde(deserialize_with = "flags_from_bits")]
    pub flags: SyntaxFlags,
}

fn flags_from_bits<'de, D>(deserializer: D) -> Result<SyntaxFlags, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bits = u8::deserialize(deserializer)?;
    Ok(SyntaxFlags::from_bits_truncate(bits))
}

impl SyntaxDescriptor {
    /// 空（ハイライトなし）の定義
    pub fn empty() -> Self {
        Self::default()
    }

    /// ファイル種別が設定されているか
    pub fn is_empty(&self) -> bool {
        self.file_type.is_empty()
    }

    /// キーワード分類を引く
    pub fn keyword(&self, token: &[u8]) -> Option<Highlight> {
        std::str::from_utf8(token)
            .ok()
            .and_then(|token| self.keywords.get(token).copied())
    }

    pub fn highlights_numbers(&self) -> bool {
        self.flags.contains(SyntaxFlags::HIGHLIGHT_NUMBERS)
    }

    pub fn highlights_strings(&self) -> bool {
        self.flags.contains(SyntaxFlags::HIGHLIGHT_STRINGS)
    }
}
