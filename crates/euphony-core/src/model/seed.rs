use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between title and artist in free-text references such as
/// `Yesterday - The Beatles`.
pub const TITLE_ARTIST_SEPARATOR: &str = " - ";

/// A song from a seed playlist, as returned by a playlist source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSong {
    #[serde(default, alias = "name")]
    pub title: Option<String>,

    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl SeedSong {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// A loosely structured reference to a seed song.
///
/// Deserializes from either a JSON object (`{"title": ..., "artist": ...}`)
/// or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedRef {
    Song(SeedSong),
    Text(String),
}

impl SeedRef {
    /// The title to look up in the catalog, before normalization.
    ///
    /// Structured songs use their explicit title. Free text keeps only the
    /// part before the first `" - "`, dropping a trailing artist.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Song(song) => song.title.as_deref(),
            Self::Text(text) => Some(
                text.split_once(TITLE_ARTIST_SEPARATOR)
                    .map_or(text.as_str(), |(title, _)| title),
            ),
        }
    }
}

impl From<SeedSong> for SeedRef {
    fn from(song: SeedSong) -> Self {
        Self::Song(song)
    }
}

impl From<&str> for SeedRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SeedRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for SeedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Song(song) => {
                let title = song.title.as_deref().unwrap_or("Unknown Song");
                match song.artist.as_deref() {
                    Some(artist) => write!(f, "{title} - {artist}"),
                    None => f.write_str(title),
                }
            }
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_title_drops_artist_suffix() {
        let seed = SeedRef::from("Yesterday - The Beatles");
        assert_eq!(seed.title(), Some("Yesterday"));
    }

    #[test]
    fn test_text_title_splits_on_first_separator() {
        let seed = SeedRef::from("Song - Live - 1999");
        assert_eq!(seed.title(), Some("Song"));
    }

    #[test]
    fn test_text_without_separator() {
        let seed = SeedRef::from("Hey-Ya");
        assert_eq!(seed.title(), Some("Hey-Ya"));
    }

    #[test]
    fn test_structured_title_is_used_verbatim() {
        let seed = SeedRef::from(SeedSong::new("Song - Remastered").with_artist("Band"));
        assert_eq!(seed.title(), Some("Song - Remastered"));
    }

    #[test]
    fn test_structured_without_title() {
        let seed = SeedRef::Song(SeedSong::default());
        assert_eq!(seed.title(), None);
    }

    #[test]
    fn test_deserialize_mixed_references() {
        let json = r#"[
            {"title": "Yesterday", "artist": "The Beatles", "duration_ms": 125000},
            {"name": "Hey Jude"},
            "Let It Be - The Beatles"
        ]"#;
        let seeds: Vec<SeedRef> = serde_json::from_str(json).unwrap();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].title(), Some("Yesterday"));
        assert_eq!(seeds[1].title(), Some("Hey Jude"));
        assert_eq!(seeds[2].title(), Some("Let It Be"));
    }

    #[test]
    fn test_display() {
        let seed = SeedRef::from(SeedSong::new("Yesterday").with_artist("The Beatles"));
        assert_eq!(seed.to_string(), "Yesterday - The Beatles");
    }
}
