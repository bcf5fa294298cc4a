use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized playlist card handed to the front-end.
///
/// Every field is always present; missing upstream data becomes an empty
/// string or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub title: String,
    #[serde(rename = "playlistId")]
    pub playlist_id: String,
    pub thumbnails: Vec<Value>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodCategory {
    pub title: String,
    pub params: String,
}

/// A titled group of categories, e.g. "Moods & moments" or "Genres".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSection {
    pub title: String,
    pub categories: Vec<MoodCategory>,
}

/// Which parser produced a playlist list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPlaylists {
    pub source: PlaylistSource,
    pub playlists: Vec<PlaylistSummary>,
}
