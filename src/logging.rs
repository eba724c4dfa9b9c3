//! ロギングシステム
//!
//! エンジン内部は `log` ファサード経由で出力し、このモジュールのロガーが
//! 標準エラー出力と任意のファイルへ書き出す

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// ロガー
///
/// * 開発者向け詳細ログをstderrへ出力
/// * ファイル出力は追記モード
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（テスト向け）
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// グローバルロガーとして登録
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn should_log(&self, level: Level) -> bool {
        level <= self.level
    }

    fn format(record: &Record) -> String {
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        match (record.file(), record.line()) {
            (Some(file), Some(line)) if record.level() >= Level::Debug => {
                format!("{}: {} at {}:{}", tag, record.args(), file, line)
            }
            _ => format!("{}: {} in {}", tag, record.args(), record.target()),
        }
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// 指定レベルでロガーを初期化（二重登録は無視する）
pub fn init(level: LevelFilter) {
    let _ = Logger::new(level).install();
}
