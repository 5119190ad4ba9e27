//! # Path Resolver
//!
//! Navigation, creation and removal of values at a [`KeyPath`].
//!
//! ## Semantics
//!
//! ### Creation
//! - A missing key under a mapping is created. The new container is a
//!   sequence when the following segment is an index, a mapping otherwise.
//! - An index equal to a sequence's length appends; any larger index fails
//!   with `IndexOutOfRange`. Gaps are never filled.
//! - A `null` value along the path is replaced by the container the next
//!   segment needs. Any other scalar along the path is a `TypeConflict`.
//!
//! ### Failure atomicity
//! - Writes validate the whole path before touching the tree, so a failed
//!   `set`/`add` leaves the document unchanged.
//!
//! ### Delete
//! - Removes only the named entry. Ancestors that become empty stay.

use crate::{KeyPath, Node, PathError, Segment};

/// Whether a write created a new entry or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Created,
    Replaced,
}

/// Look up the value at `path`
pub fn get<'a>(root: &'a Node, path: &KeyPath) -> Result<&'a Node, PathError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = lookup(current, segment, path, depth, false)?
            .ok_or_else(|| not_found(path, depth))?;
    }
    Ok(current)
}

/// Find the container holding the final segment of `path`.
///
/// With `create_missing`, intermediate containers are created on the way and
/// the returned container is guaranteed to accept the final segment. Without
/// it the tree is never modified.
pub fn resolve<'a>(
    root: &'a mut Node,
    path: &'a KeyPath,
    create_missing: bool,
) -> Result<(&'a mut Node, &'a Segment), PathError> {
    if create_missing {
        check_writable(root, path)?;
    }

    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return Err(PathError::Invalid {
            path: String::new(),
            reason: "path is empty".to_string(),
        });
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        if create_missing && current.is_null() {
            *current = container_for(segment);
        }
        current = descend_mut(current, segment, &segments[depth + 1], path, depth, create_missing)?;
    }

    if create_missing && current.is_null() {
        *current = container_for(last);
    }

    let accepts = matches!(
        (&*current, last),
        (Node::Mapping(_), _) | (Node::Sequence(_), Segment::Index(_))
    );
    if accepts {
        return Ok((current, last));
    }

    let depth = parents.len();
    Err(match &*current {
        Node::Sequence(_) => conflict(path, depth, "mapping", "sequence"),
        Node::Null => not_found(path, depth),
        other => conflict(path, depth, expected_for(last), other.kind()),
    })
}

/// Create or overwrite the value at `path`
pub fn set(root: &mut Node, path: &KeyPath, value: Node) -> Result<SetOutcome, PathError> {
    let (container, last) = resolve(root, path, true)?;
    let depth = path.len() - 1;

    match container {
        Node::Mapping(map) => Ok(match map.insert(last.as_key(), value) {
            Some(_) => SetOutcome::Replaced,
            None => SetOutcome::Created,
        }),
        Node::Sequence(items) => match last {
            Segment::Index(index) if *index < items.len() => {
                items[*index] = value;
                Ok(SetOutcome::Replaced)
            }
            Segment::Index(index) if *index == items.len() => {
                items.push(value);
                Ok(SetOutcome::Created)
            }
            Segment::Index(index) => Err(out_of_range(path, depth, *index, items.len())),
            Segment::Key(_) => Err(conflict(path, depth, "mapping", "sequence")),
        },
        other => Err(conflict(path, depth, expected_for(last), other.kind())),
    }
}

/// Like [`set`], but refuses to replace a container with a scalar or a
/// scalar with a container
pub fn add(root: &mut Node, path: &KeyPath, value: Node) -> Result<SetOutcome, PathError> {
    check_writable(root, path)?;

    if let Ok(existing) = get(root, path) {
        if !existing.is_null() && existing.is_container() != value.is_container() {
            return Err(PathError::TypeConflict {
                path: path.to_string(),
                expected: value.kind(),
                found: existing.kind(),
            });
        }
    }

    set(root, path, value)
}

/// Remove the value at `path` and return it
pub fn delete(root: &mut Node, path: &KeyPath) -> Result<Node, PathError> {
    let (container, last) = resolve(root, path, false)?;
    let depth = path.len() - 1;

    match container {
        Node::Mapping(map) => map
            .shift_remove(&last.as_key())
            .ok_or_else(|| not_found(path, depth)),
        Node::Sequence(items) => match last {
            Segment::Index(index) if *index < items.len() => Ok(items.remove(*index)),
            Segment::Index(index) => Err(out_of_range(path, depth, *index, items.len())),
            Segment::Key(_) => Err(conflict(path, depth, "mapping", "sequence")),
        },
        other => Err(conflict(path, depth, expected_for(last), other.kind())),
    }
}

/// Walk `path` read-only and fail the way a creating write would
fn check_writable(root: &Node, path: &KeyPath) -> Result<(), PathError> {
    // None while inside containers the write would create
    let mut current = Some(root);

    for (depth, segment) in path.segments().iter().enumerate() {
        current = match current {
            Some(node) if !node.is_null() => lookup(node, segment, path, depth, true)?,
            _ => {
                if let Segment::Index(index) = segment {
                    if *index != 0 {
                        return Err(out_of_range(path, depth, *index, 0));
                    }
                }
                None
            }
        };
    }

    Ok(())
}

/// Child of `node` at `segment`. `Ok(None)` means absent; with `allow_append`
/// the index one past the end of a sequence also counts as absent.
fn lookup<'a>(
    node: &'a Node,
    segment: &Segment,
    path: &KeyPath,
    depth: usize,
    allow_append: bool,
) -> Result<Option<&'a Node>, PathError> {
    match node {
        Node::Mapping(map) => Ok(map.get(&segment.as_key())),
        Node::Sequence(items) => match segment {
            Segment::Index(index) if *index < items.len() => Ok(Some(&items[*index])),
            Segment::Index(index) if *index == items.len() && allow_append => Ok(None),
            Segment::Index(index) => Err(out_of_range(path, depth, *index, items.len())),
            Segment::Key(_) => Err(conflict(path, depth, "mapping", "sequence")),
        },
        Node::Null => Ok(None),
        other => Err(conflict(path, depth, expected_for(segment), other.kind())),
    }
}

fn descend_mut<'a>(
    node: &'a mut Node,
    segment: &Segment,
    next: &Segment,
    path: &KeyPath,
    depth: usize,
    create: bool,
) -> Result<&'a mut Node, PathError> {
    match node {
        Node::Mapping(map) => {
            let key = segment.as_key();
            if create {
                let child = map.entry(key).or_insert_with(|| container_for(next));
                if child.is_null() {
                    *child = container_for(next);
                }
                Ok(child)
            } else {
                map.get_mut(&key).ok_or_else(|| not_found(path, depth))
            }
        }
        Node::Sequence(items) => match segment {
            Segment::Index(index) => {
                let len = items.len();
                if create && *index == len {
                    items.push(container_for(next));
                }
                items
                    .get_mut(*index)
                    .ok_or_else(|| out_of_range(path, depth, *index, len))
            }
            Segment::Key(_) => Err(conflict(path, depth, "mapping", "sequence")),
        },
        Node::Null => Err(not_found(path, depth)),
        other => Err(conflict(path, depth, expected_for(segment), other.kind())),
    }
}

/// Empty container able to hold `segment`
fn container_for(segment: &Segment) -> Node {
    match segment {
        Segment::Index(_) => Node::Sequence(Vec::new()),
        Segment::Key(_) => Node::empty_mapping(),
    }
}

fn expected_for(segment: &Segment) -> &'static str {
    match segment {
        Segment::Index(_) => "sequence or mapping",
        Segment::Key(_) => "mapping",
    }
}

fn not_found(path: &KeyPath, depth: usize) -> PathError {
    PathError::NotFound {
        path: path.prefix(depth + 1),
    }
}

fn out_of_range(path: &KeyPath, depth: usize, index: usize, len: usize) -> PathError {
    PathError::IndexOutOfRange {
        path: path.prefix(depth + 1),
        index,
        len,
    }
}

/// The node at `depth` (the parent of segment `depth`) had the wrong type
fn conflict(path: &KeyPath, depth: usize, expected: &'static str, found: &'static str) -> PathError {
    let at = if depth == 0 {
        "<root>".to_string()
    } else {
        path.prefix(depth)
    };
    PathError::TypeConflict {
        path: at,
        expected,
        found,
    }
}
