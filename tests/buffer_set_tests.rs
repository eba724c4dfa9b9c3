use rowdoc::buffer::SCRATCH_BUFFER_NAME;
use rowdoc::{BufferSet, EditOperations, EngineConfig, EngineError, SyntaxRegistry};

#[test]
fn test_switching_keeps_each_buffer_state() {
    let registry = SyntaxRegistry::builtin();
    let mut set = BufferSet::new(EngineConfig::default());

    set.current_mut().insert_char(b's').unwrap();
    set.open("notes.txt", "file data", &registry);
    set.current_mut().insert_char(b'>').unwrap();

    set.switch_to(SCRATCH_BUFFER_NAME).unwrap();
    assert_eq!(set.current().rows_to_text(), "s\n");

    set.switch_to("notes.txt").unwrap();
    assert_eq!(set.current().rows_to_text(), ">file data\n");
    assert!(set.current().history().can_undo());
}

#[test]
fn test_names_follow_insertion_order() {
    let registry = SyntaxRegistry::new();
    let mut set = BufferSet::default();
    set.open("b.rs", "", &registry);
    set.open("a.rs", "", &registry);
    assert_eq!(set.names(), vec![SCRATCH_BUFFER_NAME, "b.rs", "a.rs"]);

    set.switch_next();
    assert_eq!(set.current().name(), SCRATCH_BUFFER_NAME);
}

#[test]
fn test_closing_current_buffer_selects_neighbor() {
    let registry = SyntaxRegistry::new();
    let mut set = BufferSet::default();
    set.open("one", "", &registry);
    set.open("two", "", &registry);
    set.switch_to("one").unwrap();

    let closed = set.remove("one").unwrap();
    assert_eq!(closed.name(), "one");
    assert_eq!(set.current().name(), "two");
    assert_eq!(set.current().index(), 1);
}

#[test]
fn test_closing_everything_leaves_scratch() {
    let registry = SyntaxRegistry::new();
    let mut set = BufferSet::default();
    set.open("only", "x", &registry);
    set.remove(SCRATCH_BUFFER_NAME).unwrap();
    set.remove("only").unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.current().name(), SCRATCH_BUFFER_NAME);
    assert!(set.current().is_empty());
}

#[test]
fn test_rename() {
    let registry = SyntaxRegistry::new();
    let mut set = BufferSet::default();
    set.open("old", "", &registry);
    set.rename("old", "new").unwrap();
    assert!(set.contains("new"));
    assert!(!set.contains("old"));

    assert!(matches!(
        set.rename("new", SCRATCH_BUFFER_NAME),
        Err(EngineError::BufferExists { ref name }) if name == SCRATCH_BUFFER_NAME
    ));
    assert!(matches!(
        set.rename("missing", "x"),
        Err(EngineError::BufferNotFound { .. })
    ));
}

#[test]
fn test_config_flows_into_new_buffers() {
    let config = EngineConfig {
        undo_depth: 2,
        line_number_width: 3,
        ..EngineConfig::default()
    };
    let mut set = BufferSet::new(config);
    set.open("f", "", &SyntaxRegistry::new());

    assert_eq!(set.current().history().max_depth(), 2);
    assert_eq!(set.current().line_number_width(), 3);
}
