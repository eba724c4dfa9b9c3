use rowdoc::syntax::{Highlight, SyntaxFlags};
use rowdoc::{Buffer, CursorPosition, EditOperations, EngineConfig, SyntaxDescriptor, SyntaxRegistry};

fn go_buffer(text: &str) -> Buffer {
    let mut buffer = Buffer::from_text("main.go", text, &EngineConfig::default());
    buffer.select_syntax("main.go", &SyntaxRegistry::builtin());
    buffer
}

fn classes(buffer: &Buffer, row: usize) -> Vec<Highlight> {
    buffer.row(row).unwrap().highlight().to_vec()
}

#[test]
fn test_go_keywords_strings_and_numbers() {
    let buffer = go_buffer("func main() { x := \"hi\" + 10 }");
    let hl = classes(&buffer, 0);

    assert_eq!(&hl[0..4], &[Highlight::Keyword; 4]);
    assert_eq!(hl[5], Highlight::Normal);
    assert_eq!(&hl[19..23], &[Highlight::String; 4]);
    assert_eq!(&hl[26..28], &[Highlight::Number; 2]);
}

#[test]
fn test_block_comment_opened_by_typing_cascades() {
    let mut buffer = go_buffer("a := 1\nb := 2\nc := 3");
    buffer.set_cursor(CursorPosition::at(0, 0));
    buffer.insert_char(b'/').unwrap();
    buffer.insert_char(b'*').unwrap();

    for row in 0..3 {
        assert!(classes(&buffer, row).iter().all(|&h| h == Highlight::MlComment));
    }

    buffer.set_cursor(CursorPosition::at(1, 6));
    buffer.insert_char(b'*').unwrap();
    buffer.insert_char(b'/').unwrap();
    assert!(!buffer.row(1).unwrap().comment_open());
    assert_eq!(classes(&buffer, 2)[5], Highlight::Number);
}

#[test]
fn test_removing_comment_start_uncomments_following_rows() {
    let mut buffer = go_buffer("/*\nvar x\n*/ var y");
    assert_eq!(classes(&buffer, 1)[0], Highlight::MlComment);

    buffer.set_cursor(CursorPosition::at(0, 0));
    buffer.delete_line().unwrap();
    assert_eq!(&classes(&buffer, 0)[0..3], &[Highlight::Keyword; 3]);
    assert_eq!(classes(&buffer, 1)[0], Highlight::Normal);
}

#[test]
fn test_flags_disable_numbers_and_strings() {
    let mut syntax = SyntaxDescriptor {
        file_type: "plain-ish".to_string(),
        flags: SyntaxFlags::empty(),
        ..SyntaxDescriptor::default()
    };
    syntax.keywords.insert("let".to_string(), Highlight::Keyword);

    let mut buffer = Buffer::from_text("x", "let a = \"s\" 42", &EngineConfig::default());
    buffer.set_syntax(syntax);
    let hl = classes(&buffer, 0);

    assert_eq!(&hl[0..3], &[Highlight::Keyword; 3]);
    assert!(hl[3..].iter().all(|&h| h == Highlight::Normal));
}

#[test]
fn test_number_inside_identifier_is_not_a_number() {
    let buffer = go_buffer("x1 := 2");
    let hl = classes(&buffer, 0);
    assert_eq!(&hl[0..2], &[Highlight::Normal; 2]);
    assert_eq!(hl[6], Highlight::Number);
}

#[test]
fn test_changing_syntax_rehighlights_everything() {
    let mut buffer = go_buffer("# func");
    assert_eq!(classes(&buffer, 0)[2], Highlight::Keyword);

    buffer.select_syntax("script.py", &SyntaxRegistry::builtin());
    assert_eq!(buffer.syntax().file_type, "python");
    assert!(classes(&buffer, 0).iter().all(|&h| h == Highlight::Comment));
}
