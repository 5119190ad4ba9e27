//! Properties that must hold for every document and path
use yamlstore_document::{Document, KeyPath, Node, PathError};

const DOCUMENTS: &[&str] = &[
    "{}",
    "app:\n  name: Demo\n",
    "app:\n  name: Demo\n  ports:\n  - 80\n  - 443\nversion: 2\n",
    "servers:\n- host: a\n  tags: [x, y]\n- host: b\nenabled: true\n",
    "responses:\n  200: ok\n  404: missing\nratio: 0.5\nnothing: ~\n",
    "bucket: !Ref BucketName\nnested:\n  deeper:\n    deepest: value\n",
];

const WRITABLE_PATHS: &[&str] = &[
    "app.name",
    "app.version",
    "fresh",
    "a.b.c.d",
    "servers.0.host",
    "responses.500",
    "nested.deeper.other",
];

fn path(dotted: &str) -> KeyPath {
    dotted.parse().unwrap()
}

#[test]
fn test_serialization_round_trip() {
    for source in DOCUMENTS {
        let doc = Document::parse(source).unwrap();
        let first = doc.to_yaml().unwrap();
        let second = Document::parse(&first).unwrap().to_yaml().unwrap();
        assert_eq!(first, second, "unstable serialization for {:?}", source);
    }
}

#[test]
fn test_set_then_get_returns_value() {
    for source in DOCUMENTS {
        for dotted in WRITABLE_PATHS {
            let mut doc = Document::parse(source).unwrap();
            let value = Node::string(format!("value-for-{}", dotted));
            match doc.set(&path(dotted), value.clone()) {
                Ok(_) => assert_eq!(doc.get(&path(dotted)).unwrap(), &value),
                // Paths that cross a scalar or a sequence by key are rejected
                Err(err) => assert!(
                    matches!(
                        err,
                        PathError::TypeConflict { .. } | PathError::IndexOutOfRange { .. }
                    ),
                    "unexpected error {:?} for {} in {:?}",
                    err,
                    dotted,
                    source
                ),
            }
        }
    }
}

#[test]
fn test_set_is_idempotent() {
    for source in DOCUMENTS {
        for dotted in WRITABLE_PATHS {
            let mut once = Document::parse(source).unwrap();
            if once.set(&path(dotted), Node::string("v")).is_err() {
                continue;
            }
            let mut twice = once.clone();
            twice.set(&path(dotted), Node::string("v")).unwrap();
            assert_eq!(once.to_yaml().unwrap(), twice.to_yaml().unwrap());
        }
    }
}

#[test]
fn test_delete_absent_path_fails_and_leaves_document() {
    let absent = ["missing", "app.missing", "app.name.deeper", "servers.9", "a.b.c"];
    for source in DOCUMENTS {
        for dotted in absent {
            let mut doc = Document::parse(source).unwrap();
            if doc.get(&path(dotted)).is_ok() {
                continue;
            }
            let before = doc.clone();
            assert!(doc.delete(&path(dotted)).is_err());
            assert_eq!(doc, before);
        }
    }
}

#[test]
fn test_list_keys_only_returns_leaves() {
    for source in DOCUMENTS {
        let doc = Document::parse(source).unwrap();
        for key in doc.list_keys() {
            let node = doc.get(&key).unwrap();
            assert!(node.is_leaf(), "{} resolved to a container", key);
            assert!(!node.is_null(), "{} resolved to null", key);
        }
    }
}

#[test]
fn test_scenario_set_on_empty_document() {
    let mut doc = Document::parse("{}").unwrap();
    doc.set(&path("app.name"), Node::string("Demo")).unwrap();
    assert_eq!(doc.to_yaml().unwrap(), "app:\n  name: Demo\n");
}

#[test]
fn test_scenario_delete_missing_names_path() {
    let mut doc = Document::parse("app:\n  name: Demo\n").unwrap();
    let err = doc.delete(&path("app.missing")).unwrap_err();
    assert!(err.to_string().contains("app.missing"));
    assert_eq!(doc.to_yaml().unwrap(), "app:\n  name: Demo\n");
}
