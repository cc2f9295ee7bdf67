pub mod artist;
pub mod features;
pub mod seed;
pub mod track;

pub use artist::{ArtistCredit, UNKNOWN_ARTIST};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use seed::{SeedRef, SeedSong, TITLE_ARTIST_SEPARATOR};
pub use track::{RecommendationRecord, Track};
