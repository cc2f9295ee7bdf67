use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Display text for an empty artist credit.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A quoted name inside a textual list encoding. Double quotes come first
/// so names like `"Guns N' Roses"` survive intact.
#[allow(clippy::expect_used)]
static QUOTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+)"|'([^']+)'"#).expect("quoted-name pattern is valid")
});

/// The artist credit of a catalog track, parsed once at load time.
///
/// Catalog exports sometimes carry the artist column as the textual
/// rendering of a list (`['Daft Punk', 'Pharrell Williams']`). The raw
/// text is kept alongside the parsed form, and equality follows the raw
/// text: two credits that render the same but were encoded differently
/// are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtistCredit {
    /// An ordinary display string, e.g. `Daft Punk`.
    Plain(String),
    /// A textual list encoding and the names recovered from it.
    List { raw: String, names: Vec<String> },
    /// Bracketed text from which no names could be recovered.
    Malformed(String),
}

impl ArtistCredit {
    /// Parse a raw artists field.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
            return Self::Plain(raw.to_string());
        }

        let names: Vec<String> = QUOTED_NAME
            .captures_iter(trimmed)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .filter(|name| !name.trim().is_empty())
            .collect();

        if names.is_empty() {
            return Self::Malformed(raw.to_string());
        }

        // A stringified list of characters: ['A', 'B', 'B', 'A'] -> ABBA
        let exploded = names.len() > 1 && names.iter().all(|n| n.chars().count() == 1);
        let names = if exploded {
            vec![names.concat()]
        } else {
            names
        };

        Self::List {
            raw: raw.to_string(),
            names,
        }
    }

    /// The text exactly as it appeared in the catalog.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Plain(raw) | Self::Malformed(raw) | Self::List { raw, .. } => raw,
        }
    }

    /// Human-readable form: list names comma-joined, everything else as
    /// given, and [`UNKNOWN_ARTIST`] for an empty credit.
    #[must_use]
    pub fn display(&self) -> String {
        let text = match self {
            Self::List { names, .. } => names.join(", "),
            Self::Plain(raw) | Self::Malformed(raw) => raw.trim().to_string(),
        };
        if text.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            text
        }
    }
}

impl Default for ArtistCredit {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl fmt::Display for ArtistCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for ArtistCredit {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
