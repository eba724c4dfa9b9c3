//! エラーハンドリングシステム
//!
//! ドキュメントエンジン全体で使用される統一されたエラー型を定義
//! すべてのエラーは回復可能で、呼び出し側（入力ディスパッチャ）がステータス表示する

use thiserror::Error;

/// エンジン全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 行・列インデックスの範囲外
    #[error("Index out of range")]
    Index(#[from] IndexError),

    /// 消えた行を参照している選択範囲
    #[error("Malformed selection: rows {start_row}..={end_row} with {row_count} rows")]
    MalformedSelection {
        start_row: isize,
        end_row: isize,
        row_count: usize,
    },

    /// 取り消し対象の行数か行の内容が記録時と一致しない
    #[error("Snapshot mismatch for {kind} at row {row_index} (rows: expected {expected_rows}, found {actual_rows})")]
    SnapshotMismatch {
        kind: &'static str,
        row_index: usize,
        expected_rows: usize,
        actual_rows: usize,
    },

    /// 名前で指定したバッファが存在しない
    #[error("No buffer named {name}")]
    BufferNotFound { name: String },

    /// 同名のバッファが既に存在する
    #[error("Buffer {name} already exists")]
    BufferExists { name: String },

    /// シンタックス定義エラー
    #[error("Syntax definition error")]
    Syntax(#[from] SyntaxError),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// 入出力エラー（設定・シンタックス定義の読み込み）
    #[error("IO error: {message}")]
    Io { message: String },
}

/// インデックス範囲外エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Row {index} is out of bounds (rows: {len})")]
    Row { index: usize, len: usize },

    #[error("Column {col} is out of bounds on row {row} (length: {len})")]
    Column { row: usize, col: usize, len: usize },

    #[error("Rows {start}..{end} are out of bounds (rows: {len})")]
    Range { start: usize, end: usize, len: usize },
}

/// シンタックス定義固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Failed to parse syntax definitions: {message}")]
    Parse { message: String },

    #[error("Syntax definition without file type")]
    MissingFileType,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

impl EngineError {
    /// ステータス表示用のエラーレベル
    pub fn level(&self) -> ErrorLevel {
        match self {
            EngineError::Index(_)
            | EngineError::MalformedSelection { .. }
            | EngineError::BufferNotFound { .. }
            | EngineError::BufferExists { .. } => ErrorLevel::Warning,
            EngineError::SnapshotMismatch { .. } => ErrorLevel::Error,
            EngineError::Syntax(_) | EngineError::Config(_) | EngineError::Io { .. } => {
                ErrorLevel::Error
            }
        }
    }
}

/// ステータスライン表示情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// 表示メッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
}

impl StatusMessage {
    pub fn new(error: &EngineError) -> Self {
        Self {
            message: Self::format_error(error),
            level: error.level(),
        }
    }

    /// 「何もすることがない」通知（空の取り消しスタックなど）
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ErrorLevel::Info,
        }
    }

    fn format_error(error: &EngineError) -> String {
        match error {
            EngineError::Index(IndexError::Row { index, len }) => {
                format!("行番号が範囲外です: {} (全{}行)", index, len)
            }
            EngineError::Index(IndexError::Column { row, col, len }) => {
                format!("列が範囲外です: {}行目 {}列 (長さ{})", row + 1, col, len)
            }
            EngineError::Index(IndexError::Range { start, end, len }) => {
                format!("行範囲が不正です: {}..{} (全{}行)", start, end, len)
            }
            EngineError::MalformedSelection { .. } => {
                "選択範囲が無効になったため解除しました".to_string()
            }
            EngineError::SnapshotMismatch { kind, row_index, .. } => {
                format!("取り消しできません: {} ({}行目) の記録が現在の内容と一致しません", kind, row_index + 1)
            }
            EngineError::BufferNotFound { name } => {
                format!("バッファが見つかりません: {}", name)
            }
            EngineError::BufferExists { name } => {
                format!("同名のバッファが既にあります: {}", name)
            }
            EngineError::Syntax(SyntaxError::Parse { message }) => {
                format!("シンタックス定義を読み込めません: {}", message)
            }
            EngineError::Config(ConfigError::InvalidValue { key, value }) => {
                format!("設定値が不正です: {} = {}", key, value)
            }
            _ => format!("エラーが発生しました: {}", error),
        }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EngineError>;

// std::io::Error から EngineError への変換
impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyntaxError {
    fn from(error: serde_json::Error) -> Self {
        SyntaxError::Parse {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_is_warning() {
        let error = EngineError::Index(IndexError::Row { index: 4, len: 2 });
        let status = StatusMessage::new(&error);

        assert_eq!(status.level, ErrorLevel::Warning);
        assert!(status.message.contains("範囲外"));
    }

    #[test]
    fn test_snapshot_mismatch_is_error() {
        let error = EngineError::SnapshotMismatch {
            kind: "InsertRow",
            row_index: 3,
            expected_rows: 5,
            actual_rows: 2,
        };
        let status = StatusMessage::new(&error);

        assert_eq!(status.level, ErrorLevel::Error);
        assert!(status.message.contains("InsertRow"));
        assert!(error.to_string().contains("expected 5, found 2"));
    }

    #[test]
    fn test_buffer_exists_is_warning() {
        let error = EngineError::BufferExists {
            name: "main.go".to_string(),
        };
        let status = StatusMessage::new(&error);

        assert_eq!(status.level, ErrorLevel::Warning);
        assert!(status.message.contains("main.go"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: EngineError = io.into();

        match error {
            EngineError::Io { message } => assert!(message.contains("missing")),
            _ => panic!("Expected Io error"),
        }
    }
}
