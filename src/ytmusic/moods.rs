//! Strict parsers for the moods & genres browse pages.
//!
//! These expect the layout the catalog has served for years and fail with a
//! [`ParseError`] on anything else. See [`super::fallback`] for the lenient path.

use serde_json::Value;

use super::models::{MoodCategory, MoodSection, PlaylistSummary};
use super::nav::{
    nav, nav_array, nav_str, ParseError, Step, RUN_TEXT, SECTION_LIST, SINGLE_COLUMN_TAB,
    TITLE_TEXT,
};
use super::nav::Step::{Index, Key};
use super::renderers::{ItemShape, SectionShape};

const GRID_HEADER_TITLE: &[Step] = &[
    Key("header"),
    Key("gridHeaderRenderer"),
    Key("title"),
    Key("runs"),
    Index(0),
    Key("text"),
];
const CATEGORY_TITLE: &[Step] = &[Key("musicNavigationButtonRenderer"), Key("buttonText")];
const CATEGORY_PARAMS: &[Step] = &[
    Key("musicNavigationButtonRenderer"),
    Key("clickCommand"),
    Key("browseEndpoint"),
    Key("params"),
];
const TITLE_BROWSE_ID: &[Step] = &[
    Key("title"),
    Key("runs"),
    Index(0),
    Key("navigationEndpoint"),
    Key("browseEndpoint"),
    Key("browseId"),
];
const THUMBNAIL_RENDERER: &[Step] = &[
    Key("thumbnailRenderer"),
    Key("musicThumbnailRenderer"),
    Key("thumbnail"),
    Key("thumbnails"),
];

fn section_list(doc: &Value) -> Result<&Vec<Value>, ParseError> {
    nav_array(doc, &[SINGLE_COLUMN_TAB, SECTION_LIST].concat())
}

/// Parses the `FEmusic_moods_and_genres` landing page into titled groups.
pub fn parse_mood_categories(doc: &Value) -> Result<Vec<MoodSection>, ParseError> {
    section_list(doc)?
        .iter()
        .map(|section| {
            let grid = nav(section, &[Key(SectionShape::Grid.key())])?;
            let title = nav_str(grid, GRID_HEADER_TITLE)?.to_string();
            let categories = nav_array(grid, &[Key("items")])?
                .iter()
                .map(parse_category)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MoodSection { title, categories })
        })
        .collect()
}

fn parse_category(item: &Value) -> Result<MoodCategory, ParseError> {
    Ok(MoodCategory {
        title: nav_str(item, &[CATEGORY_TITLE, RUN_TEXT].concat())?.to_string(),
        params: nav_str(item, CATEGORY_PARAMS)?.to_string(),
    })
}

/// Parses a `FEmusic_moods_and_genres_category` page.
///
/// Every item must be a two-row card; other renderers surface as
/// [`ParseError::MissingKey`].
pub fn parse_mood_playlists(doc: &Value) -> Result<Vec<PlaylistSummary>, ParseError> {
    let mut playlists = Vec::new();
    for section in section_list(doc)? {
        let Some(shape) = SectionShape::detect(section) else {
            continue;
        };
        let items = nav_array(section, &[Key(shape.key()), Key(shape.items_key())])?;
        for item in items {
            let card = nav(item, &[Key(ItemShape::TwoRowItem.key())])?;
            playlists.push(parse_playlist(card)?);
        }
    }
    Ok(playlists)
}

fn parse_playlist(card: &Value) -> Result<PlaylistSummary, ParseError> {
    let title = nav_str(card, TITLE_TEXT)?.to_string();
    let browse_id = nav_str(card, TITLE_BROWSE_ID)?;
    let playlist_id = browse_id.strip_prefix("VL").unwrap_or(browse_id).to_string();
    let thumbnails = nav_array(card, THUMBNAIL_RENDERER)?.clone();

    let subtitle = nav(card, &[Key("subtitle")])?;
    let mut description = String::new();
    if subtitle.get("runs").is_some() {
        for run in nav_array(subtitle, &[Key("runs")])? {
            description.push_str(nav_str(run, &[Key("text")])?);
        }
    }

    Ok(PlaylistSummary {
        title,
        playlist_id,
        thumbnails,
        description,
    })
}
