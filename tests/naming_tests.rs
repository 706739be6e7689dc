//! Decomposition laws for qualified names, checked over a spread of inputs
//! including degenerate ones.

use tablefit::QualifiedName;

const INPUTS: &[&str] = &[
    "",
    ".",
    "..",
    "a",
    "Music",
    "a.b",
    "a.b.c",
    "System.Text.StringBuilder",
    ".a",
    "a.",
    "a..b",
    "...x",
    "a.b!",
    "List<T>.Item",
    "name with spaces.Type",
    "ünï.cödé",
    "eg.music.Display",
];

#[test]
fn dotless_names_have_empty_namespace() {
    for input in INPUTS.iter().filter(|s| !s.contains('.')) {
        let name = QualifiedName::new(*input);
        assert_eq!(name.namespace_prefix(), "", "input {input:?}");
        assert_eq!(name.short_name(), *input, "input {input:?}");
    }
}

#[test]
fn short_name_is_text_after_last_dot() {
    for input in INPUTS {
        let name = QualifiedName::new(*input);
        let expected = input.rsplit('.').next().unwrap();
        assert_eq!(name.short_name(), expected, "input {input:?}");
    }
}

#[test]
fn namespace_and_short_name_rebuild_dotted_input() {
    for input in INPUTS.iter().filter(|s| s.contains('.')) {
        let name = QualifiedName::new(*input);
        let rebuilt = format!("{}.{}", name.namespace_prefix(), name.short_name());
        assert_eq!(rebuilt, *input);
    }
}

#[test]
fn original_is_returned_unchanged() {
    for input in INPUTS {
        assert_eq!(QualifiedName::new(*input).original(), *input);
    }
}

#[test]
fn segments_are_never_empty() {
    for input in INPUTS {
        let name = QualifiedName::new(*input);
        assert!(!name.segments().is_empty(), "input {input:?}");
        assert_eq!(name.segments().join("."), *input);
    }
}

#[test]
fn fully_qualified_examples() {
    assert!(QualifiedName::new("a.b.c").is_fully_qualified());
    assert!(!QualifiedName::new("a..b").is_fully_qualified());
    assert!(!QualifiedName::new(".a").is_fully_qualified());
    assert!(QualifiedName::new("a").is_fully_qualified());
    assert!(!QualifiedName::new("").is_fully_qualified());
    assert!(!QualifiedName::new("a.b!").is_fully_qualified());
}

#[test]
fn concrete_scenarios() {
    let cases = [
        ("System.Text.StringBuilder", "StringBuilder", "System.Text", true),
        ("Music", "Music", "", true),
        ("", "", "", false),
    ];
    for (input, short, namespace, qualified) in cases {
        let name = QualifiedName::new(input);
        assert_eq!(name.short_name(), short);
        assert_eq!(name.namespace_prefix(), namespace);
        assert_eq!(name.is_fully_qualified(), qualified);
    }
}

#[test]
fn names_are_shareable_across_threads() {
    let name = std::sync::Arc::new(QualifiedName::new("eg.music.Display"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let name = std::sync::Arc::clone(&name);
            std::thread::spawn(move || (name.short_name().to_string(), name.is_fully_qualified()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), ("Display".to_string(), true));
    }
}
