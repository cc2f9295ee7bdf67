//! Mapping seed references to catalog ordinals.
//!
//! Titles are trimmed and case-folded, then matched exactly against the
//! catalog; failing that, the first catalog name containing the title
//! wins. Ties always go to the lowest ordinal.

use euphony_core::model::SeedRef;
use euphony_core::Catalog;

/// How a seed reference was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
}

/// A successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub ordinal: usize,
    pub kind: MatchKind,
}

/// Resolves seed references against one catalog.
#[derive(Debug, Clone)]
pub struct SongResolver {
    folded_names: Vec<String>,
}

impl SongResolver {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            folded_names: catalog.iter().map(|t| fold(&t.name)).collect(),
        }
    }

    /// Find the catalog track a reference points at, if any.
    #[must_use]
    pub fn resolve(&self, seed: &SeedRef) -> Option<Resolution> {
        let title = fold(seed.title()?);
        if title.is_empty() {
            return None;
        }

        if let Some(ordinal) = self.folded_names.iter().position(|name| *name == title) {
            return Some(Resolution {
                ordinal,
                kind: MatchKind::Exact,
            });
        }

        log::debug!("No exact match for '{}'", title);
        let resolution = self
            .folded_names
            .iter()
            .position(|name| name.contains(&title))
            .map(|ordinal| Resolution {
                ordinal,
                kind: MatchKind::Partial,
            });
        if resolution.is_none() {
            log::debug!("No partial match for '{}'", title);
        }
        resolution
    }
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}
