//! 複数バッファの管理
//!
//! 挿入順を保った一覧と、常に1つだけの現在バッファを持つ

use super::Buffer;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::syntax::SyntaxRegistry;

/// 最後のバッファを閉じたときに作られるバッファ名
pub const SCRATCH_BUFFER_NAME: &str = "*scratch*";

/// 開いているバッファの集合
#[derive(Debug, Clone)]
pub struct BufferSet {
    buffers: Vec<Buffer>,
    current: usize,
    config: EngineConfig,
}

impl BufferSet {
    /// `*scratch*` だけを持つ集合
    pub fn new(config: EngineConfig) -> Self {
        let scratch = Buffer::with_config(SCRATCH_BUFFER_NAME, &config);
        Self {
            buffers: vec![scratch],
            current: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// バッファ数（常に1以上）
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// 挿入順のバッファ名一覧
    pub fn names(&self) -> Vec<&str> {
        self.buffers.iter().map(Buffer::name).collect()
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    /// 現在のバッファの位置
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    pub fn get(&self, name: &str) -> Option<&Buffer> {
        self.position(name).map(|i| &self.buffers[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Buffer> {
        self.position(name).map(move |i| &mut self.buffers[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// テキストを新しいバッファとして開き、現在のバッファにする
    ///
    /// 同名のバッファがあれば内容を読み込み直さずにそれへ切り替える
    pub fn open(&mut self, name: &str, text: &str, registry: &SyntaxRegistry) -> usize {
        if let Some(i) = self.position(name) {
            log::debug!("buffer {} already open", name);
            self.current = i;
            return i;
        }

        let mut buffer = Buffer::from_text(name, text, &self.config);
        buffer.select_syntax(name, registry);
        self.add(buffer)
    }

    /// 構築済みのバッファを末尾に追加して現在のバッファにする
    ///
    /// 同名のバッファがあれば置き換える
    pub fn add(&mut self, mut buffer: Buffer) -> usize {
        let index = match self.position(buffer.name()) {
            Some(i) => {
                buffer.set_index(i);
                self.buffers[i] = buffer;
                i
            }
            None => {
                buffer.set_index(self.buffers.len());
                self.buffers.push(buffer);
                self.buffers.len() - 1
            }
        };
        self.current = index;
        index
    }

    /// 名前で現在のバッファを切り替える
    pub fn switch_to(&mut self, name: &str) -> Result<()> {
        let index = self.position(name).ok_or_else(|| not_found(name))?;
        self.current = index;
        Ok(())
    }

    /// 次のバッファへ（末尾の次は先頭）
    pub fn switch_next(&mut self) {
        self.current = (self.current + 1) % self.buffers.len();
    }

    /// バッファを閉じる
    ///
    /// 最後の1つを閉じた場合は新しい `*scratch*` を作る
    pub fn remove(&mut self, name: &str) -> Result<Buffer> {
        let index = self.position(name).ok_or_else(|| not_found(name))?;
        let removed = self.buffers.remove(index);

        if self.buffers.is_empty() {
            self.buffers
                .push(Buffer::with_config(SCRATCH_BUFFER_NAME, &self.config));
        }
        for (i, buffer) in self.buffers.iter_mut().enumerate().skip(index) {
            buffer.set_index(i);
        }

        if self.current > index || self.current >= self.buffers.len() {
            self.current = self.current.saturating_sub(1);
        }
        log::debug!("buffer {} closed", name);
        Ok(removed)
    }

    /// バッファ名を変更
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if from != to && self.contains(to) {
            return Err(EngineError::BufferExists { name: to.to_string() });
        }
        let index = self.position(from).ok_or_else(|| not_found(from))?;
        self.buffers[index].set_name(to.to_string());
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.buffers.iter().position(|b| b.name() == name)
    }
}

impl Default for BufferSet {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn not_found(name: &str) -> EngineError {
    EngineError::BufferNotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_scratch() {
        let set = BufferSet::default();
        assert_eq!(set.names(), vec![SCRATCH_BUFFER_NAME]);
        assert_eq!(set.current().name(), SCRATCH_BUFFER_NAME);
    }

    #[test]
    fn open_switches_and_reuses_names() {
        let registry = SyntaxRegistry::builtin();
        let mut set = BufferSet::default();
        let first = set.open("main.go", "package main", &registry);
        assert_eq!(first, 1);
        assert_eq!(set.current().syntax().file_type, "go");

        set.switch_to(SCRATCH_BUFFER_NAME).unwrap();
        let again = set.open("main.go", "ignored", &registry);
        assert_eq!(again, 1);
        assert_eq!(set.current().rows_to_text(), "package main\n");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_keeps_indices_dense() {
        let registry = SyntaxRegistry::new();
        let mut set = BufferSet::default();
        set.open("a", "", &registry);
        set.open("b", "", &registry);
        set.open("c", "", &registry);

        set.remove("a").unwrap();
        assert_eq!(set.names(), vec![SCRATCH_BUFFER_NAME, "b", "c"]);
        assert_eq!(set.current().name(), "c");
        for (i, buffer) in set.buffers().iter().enumerate() {
            assert_eq!(buffer.index(), i);
        }
    }

    #[test]
    fn removing_last_buffer_creates_scratch() {
        let mut set = BufferSet::default();
        set.remove(SCRATCH_BUFFER_NAME).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.current().name(), SCRATCH_BUFFER_NAME);
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut set = BufferSet::default();
        assert!(matches!(
            set.switch_to("nope"),
            Err(EngineError::BufferNotFound { .. })
        ));
        assert!(set.remove("nope").is_err());
    }

    #[test]
    fn rename_rejects_taken_name() {
        let registry = SyntaxRegistry::new();
        let mut set = BufferSet::default();
        set.open("a", "", &registry);
        set.open("b", "", &registry);

        assert_eq!(
            set.rename("a", "b"),
            Err(EngineError::BufferExists { name: "b".to_string() })
        );
        assert_eq!(set.names(), vec![SCRATCH_BUFFER_NAME, "a", "b"]);

        set.rename("a", "a").unwrap();
        set.rename("a", "c").unwrap();
        assert!(set.contains("c"));
    }
}
