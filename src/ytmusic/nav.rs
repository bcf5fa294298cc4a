use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One hop into a browse document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Key(&'static str),
    Index(usize),
}

use Step::{Index, Key};

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key(k) => write!(f, ".{k}"),
            Index(i) => write!(f, "[{i}]"),
        }
    }
}

// Shared renderer paths.
pub const SINGLE_COLUMN_TAB: &[Step] = &[
    Key("contents"),
    Key("singleColumnBrowseResultsRenderer"),
    Key("tabs"),
    Index(0),
    Key("tabRenderer"),
    Key("content"),
];
pub const SECTION_LIST: &[Step] = &[Key("sectionListRenderer"), Key("contents")];
pub const RUN_TEXT: &[Step] = &[Key("runs"), Index(0), Key("text")];
pub const TITLE_TEXT: &[Step] = &[Key("title"), Key("runs"), Index(0), Key("text")];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing key at `{path}`")]
    MissingKey { path: String },
    #[error("expected {expected} at `{path}`")]
    UnexpectedType { path: String, expected: &'static str },
}

impl ParseError {
    /// Missing keys mean the document uses a layout this parser does not know.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, ParseError::MissingKey { .. })
    }
}

pub fn render_path(path: &[Step]) -> String {
    let mut out = String::from("$");
    for step in path {
        out.push_str(&step.to_string());
    }
    out
}

/// Follows `path` from `root`, failing on the first absent or mistyped hop.
pub fn nav<'a>(root: &'a Value, path: &[Step]) -> Result<&'a Value, ParseError> {
    let mut node = root;
    for (depth, step) in path.iter().enumerate() {
        node = match (step, node) {
            (Key(k), Value::Object(map)) => map.get(*k).ok_or_else(|| ParseError::MissingKey {
                path: render_path(&path[..=depth]),
            })?,
            (Index(i), Value::Array(items)) => {
                items.get(*i).ok_or_else(|| ParseError::MissingKey {
                    path: render_path(&path[..=depth]),
                })?
            }
            (Key(_), _) => {
                return Err(ParseError::UnexpectedType {
                    path: render_path(&path[..depth]),
                    expected: "object",
                })
            }
            (Index(_), _) => {
                return Err(ParseError::UnexpectedType {
                    path: render_path(&path[..depth]),
                    expected: "array",
                })
            }
        };
    }
    Ok(node)
}

pub fn nav_str<'a>(root: &'a Value, path: &[Step]) -> Result<&'a str, ParseError> {
    nav(root, path)?
        .as_str()
        .ok_or_else(|| ParseError::UnexpectedType {
            path: render_path(path),
            expected: "string",
        })
}

pub fn nav_array<'a>(root: &'a Value, path: &[Step]) -> Result<&'a Vec<Value>, ParseError> {
    nav(root, path)?
        .as_array()
        .ok_or_else(|| ParseError::UnexpectedType {
            path: render_path(path),
            expected: "array",
        })
}
