//! Lenient normalizer for mood playlist pages the strict parser rejects.
//!
//! Two failure boundaries:
//! - the section walk is all-or-nothing: a mistyped node anywhere between the
//!   document root and the item lists yields no playlists at all;
//! - each item is extracted on its own: a malformed card is dropped and its
//!   siblings still come through.
//!
//! Absent keys and JSON `null` read as defaults. A key holding the wrong kind
//! of value is an error at the enclosing boundary.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::models::PlaylistSummary;
use super::renderers::{ItemShape, SectionShape};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected {expected} under `{key}`, found {found}")]
    UnexpectedType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{key}` is empty")]
    Empty { key: &'static str },
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A position in the document that may not exist.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    node: Option<&'a Value>,
    key: &'static str,
}

impl<'a> Cursor<'a> {
    fn root(node: &'a Value) -> Self {
        Cursor {
            node: Some(node),
            key: "$",
        }
    }

    fn is_present(&self) -> bool {
        self.node.is_some()
    }

    fn unexpected(&self, expected: &'static str, found: &Value) -> ShapeError {
        ShapeError::UnexpectedType {
            key: self.key,
            expected,
            found: kind(found),
        }
    }

    fn get(self, key: &'static str) -> Result<Self, ShapeError> {
        let node = match self.node {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => map.get(key).filter(|v| !v.is_null()),
            Some(other) => return Err(self.unexpected("object", other)),
        };
        Ok(Cursor { node, key })
    }

    /// `[0]` of a list. An absent list reads as absent, an empty one is an error.
    fn first(self) -> Result<Self, ShapeError> {
        match self.node {
            None => Ok(self),
            Some(Value::Array(items)) => match items.first() {
                Some(node) => Ok(Cursor {
                    node: Some(node).filter(|v| !v.is_null()),
                    key: self.key,
                }),
                None => Err(ShapeError::Empty { key: self.key }),
            },
            Some(other) => Err(self.unexpected("array", other)),
        }
    }

    fn items(self) -> Result<&'a [Value], ShapeError> {
        match self.node {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.unexpected("array", other)),
        }
    }

    fn text(self) -> Result<String, ShapeError> {
        match self.node {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.unexpected("string", other)),
        }
    }
}

/// Flattens every section's items, in document order.
///
/// Only the first tab is read. A missing path is an empty result, a mistyped
/// one is an error for the whole document.
pub fn walk_sections(doc: &Value) -> Result<Vec<&Value>, ShapeError> {
    let tabs = Cursor::root(doc)
        .get("contents")?
        .get("singleColumnBrowseResultsRenderer")?
        .get("tabs")?
        .items()?;
    let Some(first_tab) = tabs.first() else {
        return Ok(Vec::new());
    };

    let sections = Cursor::root(first_tab)
        .get("tabRenderer")?
        .get("content")?
        .get("sectionListRenderer")?
        .get("contents")?
        .items()?;

    let mut items = Vec::new();
    for section in sections {
        let Some(shape) = SectionShape::detect(section) else {
            continue;
        };
        let shelf = Cursor::root(section)
            .get(shape.key())?
            .get(shape.items_key())?
            .items()?;
        items.extend(shelf);
    }
    Ok(items)
}

/// Picks the extractor for one item. `None` for unknown or malformed items.
pub fn extract_item(item: &Value) -> Option<PlaylistSummary> {
    let shape = ItemShape::detect(item)?;
    let result = renderer(item, shape).and_then(|card| match shape {
        ItemShape::TwoRowItem => extract_two_row(card),
        ItemShape::ResponsiveListItem => extract_responsive_list(card),
        ItemShape::NavigationButton => extract_navigation_button(card),
    });

    match result {
        Ok(summary) => Some(summary),
        Err(e) => {
            debug!(renderer = shape.key(), error = %e, "Dropping malformed item");
            None
        }
    }
}

fn renderer(item: &Value, shape: ItemShape) -> Result<Cursor<'_>, ShapeError> {
    let card = Cursor::root(item).get(shape.key())?;
    match card.node {
        Some(Value::Object(_)) => Ok(card),
        Some(other) => Err(card.unexpected("object", other)),
        None => Err(ShapeError::UnexpectedType {
            key: shape.key(),
            expected: "object",
            found: "null",
        }),
    }
}

fn extract_two_row(card: Cursor<'_>) -> Result<PlaylistSummary, ShapeError> {
    let title = card.get("title")?.get("runs")?.first()?.get("text")?.text()?;

    let endpoint = card.get("navigationEndpoint")?;
    let mut playlist_id = endpoint.get("browseEndpoint")?.get("browseId")?.text()?;
    if playlist_id.is_empty() {
        playlist_id = endpoint.get("watchEndpoint")?.get("playlistId")?.text()?;
    }

    let thumbnails = card
        .get("thumbnailRenderer")?
        .get("musicThumbnailRenderer")?
        .get("thumbnail")?
        .get("thumbnails")?
        .items()?
        .to_vec();

    let description = card
        .get("subtitle")?
        .get("runs")?
        .items()?
        .iter()
        .map(|run| Cursor::root(run).get("text")?.text())
        .collect::<Result<String, _>>()?;

    Ok(PlaylistSummary {
        title,
        playlist_id,
        thumbnails,
        description,
    })
}

fn extract_responsive_list(card: Cursor<'_>) -> Result<PlaylistSummary, ShapeError> {
    let title = card
        .get("flexColumns")?
        .first()?
        .get("musicResponsiveListItemFlexColumnRenderer")?
        .get("text")?
        .get("runs")?
        .first()?
        .get("text")?
        .text()?;

    let direct = card.get("navigationEndpoint")?;
    let endpoint = if direct.is_present() {
        direct
    } else {
        card.get("overlay")?
            .get("musicItemThumbnailOverlayRenderer")?
            .get("content")?
            .get("musicPlayButtonRenderer")?
            .get("playNavigationEndpoint")?
    };
    let mut playlist_id = endpoint.get("watchEndpoint")?.get("playlistId")?.text()?;
    if playlist_id.is_empty() {
        playlist_id = endpoint.get("browseEndpoint")?.get("browseId")?.text()?;
    }

    let thumbnails = card
        .get("thumbnail")?
        .get("musicThumbnailRenderer")?
        .get("thumbnail")?
        .get("thumbnails")?
        .items()?
        .to_vec();

    Ok(PlaylistSummary {
        title,
        playlist_id,
        thumbnails,
        description: String::new(),
    })
}

// Genre and category cards: no artwork, no subtitle.
fn extract_navigation_button(card: Cursor<'_>) -> Result<PlaylistSummary, ShapeError> {
    Ok(PlaylistSummary {
        title: card.get("buttonText")?.get("runs")?.first()?.get("text")?.text()?,
        playlist_id: card
            .get("clickCommand")?
            .get("browseEndpoint")?
            .get("browseId")?
            .text()?,
        thumbnails: Vec::new(),
        description: String::new(),
    })
}

/// Normalizes a mood playlist page. Never fails; unusable input yields `[]`.
pub fn normalize_mood_playlists(doc: &Value) -> Vec<PlaylistSummary> {
    match walk_sections(doc) {
        Ok(items) => items.into_iter().filter_map(extract_item).collect(),
        Err(e) => {
            debug!(error = %e, "Discarding browse document with unexpected layout");
            Vec::new()
        }
    }
}
