//! Command sequences applied to documents
use yamlstore_command::{parse, Operation, Outcome};
use yamlstore_document::{Document, KeyCheck, PathError};

fn run(doc: &mut Document, command: &str) -> Result<Outcome, PathError> {
    parse(command).expect("command should parse").apply(doc)
}

#[test]
fn test_set_on_empty_document() {
    let mut doc = Document::parse("{}").unwrap();
    assert_eq!(run(&mut doc, "set app.name=Demo").unwrap(), Outcome::Created);
    assert_eq!(doc.to_yaml().unwrap(), "app:\n  name: Demo\n");
}

#[test]
fn test_values_are_stored_as_strings() {
    let mut doc = Document::new();
    run(&mut doc, "set app.port=8080").unwrap();
    run(&mut doc, "set app.debug=true").unwrap();
    assert_eq!(
        doc.to_yaml().unwrap(),
        "app:\n  port: '8080'\n  debug: 'true'\n"
    );
}

#[test]
fn test_mutation_sequence() {
    let mut doc = Document::parse("app:\n  name: Demo\n").unwrap();

    assert_eq!(run(&mut doc, "add app.owner=team-a").unwrap(), Outcome::Created);
    assert_eq!(run(&mut doc, "set app.name=Renamed").unwrap(), Outcome::Replaced);
    assert_eq!(run(&mut doc, "set app.hosts.0=a.example").unwrap(), Outcome::Created);
    assert_eq!(run(&mut doc, "set app.hosts.1=b.example").unwrap(), Outcome::Created);
    assert_eq!(run(&mut doc, "delete app.owner").unwrap(), Outcome::Removed);

    assert_eq!(
        doc.to_yaml().unwrap(),
        "app:\n  name: Renamed\n  hosts:\n  - a.example\n  - b.example\n"
    );
}

#[test]
fn test_add_through_scalar_fails() {
    let mut doc = Document::parse("app:\n  name: Demo\n").unwrap();
    let err = run(&mut doc, "add app.name.first=x").unwrap_err();
    assert!(matches!(err, PathError::TypeConflict { .. }));
    assert_eq!(doc.to_yaml().unwrap(), "app:\n  name: Demo\n");
}

#[test]
fn test_add_creates_intermediates_like_set() {
    let mut doc = Document::parse("app:\n  hosts:\n  - a.example\n").unwrap();
    assert_eq!(run(&mut doc, "add db.primary.host=db1").unwrap(), Outcome::Created);
    assert_eq!(
        doc.to_yaml().unwrap(),
        "app:\n  hosts:\n  - a.example\ndb:\n  primary:\n    host: db1\n"
    );

    let err = run(&mut doc, "add app.hosts.5=z.example").unwrap_err();
    assert!(matches!(err, PathError::IndexOutOfRange { index: 5, len: 1, .. }));
}

#[test]
fn test_get_never_returns_value() {
    let mut doc = Document::parse("db:\n  password: hunter2\n").unwrap();
    match run(&mut doc, "get db.password").unwrap() {
        Outcome::Checked(check) => assert_eq!(check, KeyCheck::found(7)),
        other => panic!("Expected key check, got {:?}", other),
    }
}

#[test]
fn test_only_mutations_are_mutating() {
    let mutating: Vec<bool> = ["set a=1", "add a=1", "delete a", "get a", "keys"]
        .iter()
        .map(|c| parse(c).unwrap().is_mutating())
        .collect();
    assert_eq!(mutating, vec![true, true, true, false, false]);
    assert!(matches!(parse("keys").unwrap(), Operation::ListKeys));
}
