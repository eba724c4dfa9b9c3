//! エディタモジュール
//!
//! 取り消し履歴、選択範囲、ヤンク、カーソル基準の編集操作

pub mod edit_operations;
pub mod history;
pub mod selection;
pub mod yank;

// 公開API
pub use edit_operations::EditOperations;
pub use history::{ActionKind, EditorAction, RowChange, UndoRedoLog};
pub use selection::{is_within_selection, normalize};
pub use yank::{Yank, YankKind};
