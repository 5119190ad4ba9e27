//! # Key Paths
//!
//! A key path is the dotted address of a value, e.g. `app.servers.0.host`.
//!
//! Segments made only of ASCII digits in canonical form (`0`, `7`, `42` but
//! not `007`) parse as [`Segment::Index`]. An index segment addresses a
//! sequence element when the container is a sequence and is used as a plain
//! key when the container is a mapping, so `responses.200.description`
//! still works on a mapping keyed by status codes.

use crate::PathError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub(crate) fn parse(raw: &str) -> Segment {
        let canonical = raw == "0" || !raw.starts_with('0');
        if canonical && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// Segment as a mapping key
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Non-empty ordered list of segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(dotted: &str) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Err(PathError::Invalid {
                path: dotted.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        let mut segments = Vec::new();
        for (position, raw) in dotted.split('.').enumerate() {
            if raw.is_empty() {
                return Err(PathError::Invalid {
                    path: dotted.to_string(),
                    reason: format!("segment {} is empty", position + 1),
                });
            }
            segments.push(Segment::parse(raw));
        }

        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a parsed path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> &Segment {
        // Construction guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// Dotted form of the first `depth` segments
    pub fn prefix(&self, depth: usize) -> String {
        join(&self.segments[..depth.min(self.segments.len())])
    }

    /// Path extended by one segment
    pub fn child(&self, segment: Segment) -> KeyPath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        KeyPath { segments }
    }
}

fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}
