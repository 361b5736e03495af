//! Violations produced while walking a schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step in the location of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A named object key
    Key(String),
    /// A position in a list
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// The check that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The raw value has the wrong primitive type
    Type,
    /// A required key is absent
    Required,
    Email,
    Pattern,
    MinLength,
    MaxLength,
    Integer,
    MinValue,
    MaxValue,
    Picklist,
    MinItems,
    MaxItems,
    /// A cross-field check failed
    Check,
    /// The validator itself misbehaved
    Internal,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Required => "required",
            Self::Email => "email",
            Self::Pattern => "pattern",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Integer => "integer",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::Picklist => "picklist",
            Self::MinItems => "min_items",
            Self::MaxItems => "max_items",
            Self::Check => "check",
            Self::Internal => "internal",
        }
    }

    /// Structural issues make the dataset untyped; constraint issues do not.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Type | Self::Required | Self::Picklist)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violation with the path it was found at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            kind,
            message: message.into(),
            path,
        }
    }

    /// The shallowest named field on the path, if any.
    pub fn field(&self) -> Option<&str> {
        self.path.iter().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Dotted rendering of the path, e.g. `ingredients[2]`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if let PathSegment::Key(_) = segment {
                if !out.is_empty() {
                    out.push('.');
                }
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.kind, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.kind, self.path_string(), self.message)
        }
    }
}
