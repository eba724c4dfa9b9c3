//! シンタックス定義の登録と選択
//!
//! 組み込み定義と JSON 定義ファイルを扱い、ファイル名から定義を選ぶ

use crate::error::{EngineError, Result, SyntaxError};
use crate::syntax::{Highlight, SyntaxDescriptor, SyntaxFlags};
use std::path::Path;

/// 利用可能なシンタックス定義の一覧
#[derive(Debug, Clone, Default)]
pub struct SyntaxRegistry {
    descriptors: Vec<SyntaxDescriptor>,
}

impl SyntaxRegistry {
    /// 空の一覧
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込み定義を持つ一覧
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![go(), c(), rust(), python(), dockerfile(), makefile()],
        }
    }

    /// JSON 配列から定義を読み込む
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptors: Vec<SyntaxDescriptor> =
            serde_json::from_str(json).map_err(SyntaxError::from)?;
        if descriptors.iter().any(SyntaxDescriptor::is_empty) {
            return Err(EngineError::Syntax(SyntaxError::MissingFileType));
        }
        Ok(Self { descriptors })
    }

    /// 定義ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        log::info!(
            "loaded {} syntax definitions from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// 定義を追加（照合は登録順で、先に一致したものが選ばれる）
    pub fn register(&mut self, descriptor: SyntaxDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// 別の一覧を後ろに連結
    pub fn extend(&mut self, other: SyntaxRegistry) {
        self.descriptors.extend(other.descriptors);
    }

    pub fn descriptors(&self) -> &[SyntaxDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// ファイル名に合う定義を選ぶ
    pub fn select(&self, file_name: &str) -> Option<&SyntaxDescriptor> {
        select_syntax(file_name, &self.descriptors)
    }
}

/// ファイル名から最初に一致する定義を選ぶ
///
/// `.` で始まるパターンは拡張子との完全一致、それ以外はファイル名への部分一致
pub fn select_syntax<'a>(
    file_name: &str,
    descriptors: &'a [SyntaxDescriptor],
) -> Option<&'a SyntaxDescriptor> {
    if file_name.is_empty() {
        return None;
    }
    let ext = extension(file_name);

    descriptors.iter().find(|descriptor| {
        descriptor.file_match.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext.is_some_and(|ext| ext == pattern.as_str())
            } else {
                file_name.contains(pattern.as_str())
            }
        })
    })
}

/// 最後の要素の最後の `.` 以降（`.` を含む）
fn extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    base.rfind('.').map(|pos| &base[pos..])
}

fn descriptor(
    file_type: &str,
    file_match: &[&str],
    comments: (&str, &str, &str),
    keywords: &[(&str, Highlight)],
) -> SyntaxDescriptor {
    let (single, multi_start, multi_end) = comments;
    SyntaxDescriptor {
        file_type: file_type.to_string(),
        file_match: file_match.iter().map(|s| s.to_string()).collect(),
        keywords: keywords
            .iter()
            .flat_map(|(words, class)| {
                words
                    .split_whitespace()
                    .map(move |word| (word.to_string(), *class))
            })
            .collect(),
        single_line_comment_start: single.to_string(),
        multi_line_comment_start: multi_start.to_string(),
        multi_line_comment_end: multi_end.to_string(),
        flags: SyntaxFlags::HIGHLIGHT_NUMBERS | SyntaxFlags::HIGHLIGHT_STRINGS,
    }
}

fn go() -> SyntaxDescriptor {
    descriptor(
        "go",
        &[".go"],
        ("//", "/*", "*/"),
        &[
            (
                "if else for switch case default break continue return goto fallthrough select defer go",
                Highlight::ControlFlow,
            ),
            ("func var const type struct interface map chan range", Highlight::Keyword),
            (
                "int int8 int16 int32 int64 uint uint8 byte rune string bool float32 float64 error",
                Highlight::Type,
            ),
            ("package import", Highlight::Module),
            ("true false", Highlight::Boolean),
            ("nil iota", Highlight::Constant),
            ("make new len cap append copy delete panic recover", Highlight::Builtin),
        ],
    )
}

fn c() -> SyntaxDescriptor {
    descriptor(
        "c",
        &[".c", ".h", ".cpp", ".hpp"],
        ("//", "/*", "*/"),
        &[
            ("if else for while do switch case default break continue return goto", Highlight::ControlFlow),
            ("int long short char double float void unsigned signed struct union enum typedef", Highlight::Type),
            ("static extern const volatile register inline", Highlight::StorageClass),
            ("NULL", Highlight::Constant),
            ("sizeof", Highlight::Operator),
        ],
    )
}

fn rust() -> SyntaxDescriptor {
    descriptor(
        "rust",
        &[".rs"],
        ("//", "/*", "*/"),
        &[
            ("if else match loop while for break continue return in", Highlight::ControlFlow),
            ("fn let mut impl trait struct enum type where as ref move unsafe async await dyn", Highlight::Keyword),
            ("pub const static crate super", Highlight::StorageClass),
            ("mod use extern", Highlight::Module),
            ("i32 i64 u8 u32 u64 usize isize f64 bool char str String Vec Option Result Self", Highlight::Type),
            ("true false", Highlight::Boolean),
            ("None Some Ok Err", Highlight::Constant),
        ],
    )
}

fn python() -> SyntaxDescriptor {
    descriptor(
        "python",
        &[".py"],
        ("#", "", ""),
        &[
            ("if elif else for while break continue return pass yield with in", Highlight::ControlFlow),
            ("def class lambda global nonlocal and or not is del", Highlight::Keyword),
            ("import from", Highlight::Module),
            ("try except finally raise", Highlight::Exception),
            ("True False", Highlight::Boolean),
            ("None", Highlight::Constant),
            ("print len range open isinstance", Highlight::Builtin),
        ],
    )
}

fn dockerfile() -> SyntaxDescriptor {
    descriptor(
        "dockerfile",
        &["Dockerfile"],
        ("#", "", ""),
        &[(
            "FROM RUN CMD COPY ADD ENV ARG WORKDIR EXPOSE ENTRYPOINT USER VOLUME LABEL",
            Highlight::Keyword,
        )],
    )
}

fn makefile() -> SyntaxDescriptor {
    descriptor(
        "makefile",
        &["Makefile", "makefile", ".mk"],
        ("#", "", ""),
        &[("ifeq ifneq ifdef ifndef else endif include define endef", Highlight::Preprocessor)],
    )
}
