//! The harvested record and its fixed table layout

use serde::{Deserialize, Serialize};

/// Value stored for any field that could not be extracted
pub const SENTINEL: &str = "NaN";

/// Column names of the tabular store, in row order
pub const COLUMNS: [&str; 19] = [
    "title",
    "english_title",
    "type_of_anime",
    "episodes",
    "status",
    "aired",
    "premiered",
    "broadcast",
    "producers",
    "licensors",
    "studios",
    "source",
    "genres",
    "themes",
    "demographics",
    "duration",
    "adult_rating",
    "synopsis",
    "rating",
];

/// One row of the catalog
///
/// Field order matches [`COLUMNS`]; serde serializes the struct positionally,
/// so reordering fields here would reorder the CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub title: String,
    pub english_title: String,
    pub type_of_anime: String,
    pub episodes: String,
    pub status: String,
    pub aired: String,
    pub premiered: String,
    pub broadcast: String,
    pub producers: String,
    pub licensors: String,
    pub studios: String,
    pub source: String,
    pub genres: String,
    pub themes: String,
    pub demographics: String,
    pub duration: String,
    pub adult_rating: String,
    pub synopsis: String,
    pub rating: String,
}

impl AnimeRecord {
    /// Creates a record with the given title and every other field set to [`SENTINEL`]
    pub fn with_title(title: impl Into<String>) -> Self {
        let nan = || SENTINEL.to_string();
        Self {
            title: title.into(),
            english_title: nan(),
            type_of_anime: nan(),
            episodes: nan(),
            status: nan(),
            aired: nan(),
            premiered: nan(),
            broadcast: nan(),
            producers: nan(),
            licensors: nan(),
            studios: nan(),
            source: nan(),
            genres: nan(),
            themes: nan(),
            demographics: nan(),
            duration: nan(),
            adult_rating: nan(),
            synopsis: nan(),
            rating: nan(),
        }
    }

    /// Returns the field values in column order
    pub fn values(&self) -> [&str; 19] {
        [
            &self.title,
            &self.english_title,
            &self.type_of_anime,
            &self.episodes,
            &self.status,
            &self.aired,
            &self.premiered,
            &self.broadcast,
            &self.producers,
            &self.licensors,
            &self.studios,
            &self.source,
            &self.genres,
            &self.themes,
            &self.demographics,
            &self.duration,
            &self.adult_rating,
            &self.synopsis,
            &self.rating,
        ]
    }
}
