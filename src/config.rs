//! エンジン設定
//!
//! JSON 設定ファイルから読み込む。未指定の項目は既定値を使う

use crate::error::{ConfigError, EngineError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 取り消し履歴の既定の深さ
pub const DEFAULT_UNDO_DEPTH: usize = 30;
/// 行番号マージンの既定幅
pub const DEFAULT_LINE_NUMBER_WIDTH: usize = 5;
/// タブ展開幅
pub const DEFAULT_TAB_STOP: usize = 4;

/// ドキュメントエンジンの設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 取り消し・やり直しスタックの最大深さ
    pub undo_depth: usize,
    /// 行番号マージン幅（表示列の左端オフセット）
    pub line_number_width: usize,
    /// タブキーで挿入する空白数
    pub tab_stop: usize,
    /// 開き括弧入力時に閉じ括弧を補完する
    pub auto_close_brackets: bool,
    /// シンタックス定義ファイル（`~` 展開あり）
    pub syntax_file: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
            line_number_width: DEFAULT_LINE_NUMBER_WIDTH,
            tab_stop: DEFAULT_TAB_STOP,
            auto_close_brackets: true,
            syntax_file: None,
        }
    }
}

impl EngineConfig {
    /// JSON 文字列から設定を構築
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            EngineError::Config(ConfigError::InvalidValue {
                key: "<root>".to_string(),
                value: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            EngineError::Config(ConfigError::InvalidFile {
                path: path.display().to_string(),
            })
        })?;
        Self::from_json(&content)
    }

    /// 既定の場所から設定を読み込む。ファイルが無ければ既定値
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 既定の設定ファイルパス（`<config_dir>/rowdoc/config.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rowdoc").join("config.json"))
    }

    /// シンタックス定義ファイルのパス（`~` と環境変数を展開）
    pub fn syntax_path(&self) -> Option<PathBuf> {
        self.syntax_file.as_ref().map(|raw| {
            let expanded = shellexpand::full(raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
            PathBuf::from(expanded)
        })
    }

    /// 値の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.undo_depth == 0 {
            return Err(invalid("undo_depth", self.undo_depth));
        }
        if self.tab_stop == 0 {
            return Err(invalid("tab_stop", self.tab_stop));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: usize) -> EngineError {
    EngineError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
