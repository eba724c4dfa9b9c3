//! rowdoc - 端末テキストエディタ向けドキュメントエンジン
//!
//! 行単位のバッファ、シンタックスハイライト、取り消し履歴、選択範囲、
//! 複数バッファ管理を提供する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;

// 編集層
pub mod editor;

// 表示層
pub mod syntax;

// 公開API
pub use buffer::{Buffer, BufferSet, CursorPosition, Point, Row, Viewport};
pub use config::EngineConfig;
pub use editor::{EditOperations, EditorAction, UndoRedoLog, Yank, YankKind};
pub use error::{EngineError, Result};
pub use syntax::{Highlight, Highlighter, SyntaxDescriptor, SyntaxRegistry};
