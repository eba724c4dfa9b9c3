//! 行データ
//!
//! 1行分のバイト列と、それに並走するハイライト配列・タブ印配列を保持する。
//! どの変更操作の後でも `chars`、`highlight`、`tabs` の長さは一致する

use crate::syntax::Highlight;

/// 1行分のテキストとメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    chars: Vec<u8>,
    highlight: Vec<Highlight>,
    tabs: Vec<bool>,
    /// インデントの段数
    pub indentation_level: usize,
    index: usize,
    comment_open: bool,
    /// 直近のハイライト時に使った開始状態（未ハイライトなら None）
    seeded_in_comment: Option<bool>,
}

impl Row {
    /// 空の行を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// バイト列から行を作成（末尾の `\r` / `\n` は取り除く）
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut end = bytes.len();
        while end > 0 && matches!(bytes[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        let chars = bytes[..end].to_vec();
        let len = chars.len();
        Self {
            chars,
            highlight: vec![Highlight::Normal; len],
            tabs: vec![false; len],
            ..Self::default()
        }
    }

    /// 行の内容
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// 各バイトのハイライト分類
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// 各バイトがタブ展開で挿入された空白かどうか
    pub fn tabs(&self) -> &[bool] {
        &self.tabs
    }

    /// バイト長
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// バッファ内での位置
    pub fn index(&self) -> usize {
        self.index
    }

    /// 行末で複数行コメントが閉じていないか
    pub fn comment_open(&self) -> bool {
        self.comment_open
    }

    /// 内容を文字列として取得（不正なUTF-8は置換）
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.chars)
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn set_comment_open(&mut self, open: bool) {
        self.comment_open = open;
    }

    pub(crate) fn seeded_in_comment(&self) -> Option<bool> {
        self.seeded_in_comment
    }

    pub(crate) fn set_seeded_in_comment(&mut self, seeded: bool) {
        self.seeded_in_comment = Some(seeded);
    }

    pub(crate) fn highlight_mut(&mut self) -> &mut [Highlight] {
        &mut self.highlight
    }

    /// 内容と分類配列を同時に借用
    pub(crate) fn parts_mut(&mut self) -> (&[u8], &mut [Highlight]) {
        (&self.chars, &mut self.highlight)
    }

    /// 位置 `at` にバイトを挿入
    pub(crate) fn insert(&mut self, at: usize, byte: u8, is_tab: bool) {
        self.chars.insert(at, byte);
        self.highlight.insert(at, Highlight::Normal);
        self.tabs.insert(at, is_tab);
        self.invalidate();
    }

    /// 位置 `at` にバイト列を挿入
    pub(crate) fn insert_bytes(&mut self, at: usize, bytes: &[u8]) {
        self.chars.splice(at..at, bytes.iter().copied());
        self.highlight
            .splice(at..at, std::iter::repeat(Highlight::Normal).take(bytes.len()));
        self.tabs
            .splice(at..at, std::iter::repeat(false).take(bytes.len()));
        self.invalidate();
    }

    /// 位置 `at` のバイトを削除
    pub(crate) fn remove(&mut self, at: usize) -> u8 {
        let byte = self.chars.remove(at);
        self.highlight.remove(at);
        self.tabs.remove(at);
        self.invalidate();
        byte
    }

    /// `[start, end)` を削除
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        self.chars.drain(start..end);
        self.highlight.drain(start..end);
        self.tabs.drain(start..end);
        self.invalidate();
    }

    /// `at` 以降を切り離して新しい行として返す
    pub(crate) fn split_off(&mut self, at: usize) -> Row {
        let chars = self.chars.split_off(at);
        let highlight = self.highlight.split_off(at);
        let tabs = self.tabs.split_off(at);
        self.invalidate();
        Row {
            chars,
            highlight,
            tabs,
            ..Row::default()
        }
    }

    /// 末尾に別の行の内容を連結
    pub(crate) fn append(&mut self, other: &Row) {
        self.chars.extend_from_slice(&other.chars);
        self.highlight.extend_from_slice(&other.highlight);
        self.tabs.extend_from_slice(&other.tabs);
        self.invalidate();
    }

    /// 内容を変えたので次回のハイライトで必ず再分類させる
    fn invalidate(&mut self) {
        self.seeded_in_comment = None;
        debug_assert!(self.is_synchronized(), "row arrays out of sync");
    }

    /// 並走配列の長さが一致しているか
    pub fn is_synchronized(&self) -> bool {
        self.chars.len() == self.highlight.len() && self.chars.len() == self.tabs.len()
    }

    /// 指定範囲をコピーした切り離し行（両端のNULバイトは除去）
    pub(crate) fn detached_slice(&self, start: usize, end: usize) -> Row {
        let bytes = &self.chars[start..end];
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let last = bytes.iter().rposition(|&b| b != 0).map_or(first, |i| i + 1);
        Row::from_bytes(&bytes[first..last])
    }
}
