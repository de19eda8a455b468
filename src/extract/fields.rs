//! Field table for anime detail pages
//!
//! Adding or removing a column is an edit to [`FIELD_TABLE`]; the extraction
//! loop in [`parse_record`] never changes.

use crate::extract::query::{element_text, extract, find_marker, next_sibling_text, Label, Strategy};
use crate::record::{AnimeRecord, SENTINEL};
use scraper::{ElementRef, Html, Selector};

/// Selector for the mandatory title heading
pub const TITLE_SELECTOR: &str = "h1.title-name.h1_bold_none";

/// Text of the synopsis section heading
pub const SYNOPSIS_HEADING: &str = "Synopsis";

/// One row of the field table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Column the value lands in
    pub column: &'static str,
    pub label: Label,
    pub strategy: Strategy,
    /// Accessor for the record field
    pub slot: fn(&mut AnimeRecord) -> &mut String,
}

/// Every label-anchored field; title and synopsis are handled separately
pub static FIELD_TABLE: [FieldSpec; 17] = [
    FieldSpec {
        column: "english_title",
        label: Label::Exact("English:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.english_title,
    },
    FieldSpec {
        column: "type_of_anime",
        label: Label::Exact("Type:"),
        strategy: Strategy::NextElement,
        slot: |r| &mut r.type_of_anime,
    },
    FieldSpec {
        column: "episodes",
        label: Label::Exact("Episodes:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.episodes,
    },
    FieldSpec {
        column: "status",
        label: Label::Exact("Status:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.status,
    },
    FieldSpec {
        column: "aired",
        label: Label::Exact("Aired:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.aired,
    },
    FieldSpec {
        column: "premiered",
        label: Label::Exact("Premiered:"),
        strategy: Strategy::NextElement,
        slot: |r| &mut r.premiered,
    },
    FieldSpec {
        column: "broadcast",
        label: Label::Exact("Broadcast:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.broadcast,
    },
    FieldSpec {
        column: "producers",
        label: Label::Exact("Producers:"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.producers,
    },
    FieldSpec {
        column: "licensors",
        label: Label::Exact("Licensors:"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.licensors,
    },
    FieldSpec {
        column: "studios",
        label: Label::Exact("Studios:"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.studios,
    },
    FieldSpec {
        column: "source",
        label: Label::Exact("Source:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.source,
    },
    FieldSpec {
        column: "genres",
        label: Label::Exact("Genres:"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.genres,
    },
    // "Theme:" or "Themes:" depending on the count
    FieldSpec {
        column: "themes",
        label: Label::Pattern("Theme"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.themes,
    },
    FieldSpec {
        column: "demographics",
        label: Label::Exact("Demographic:"),
        strategy: Strategy::FollowingSiblings,
        slot: |r| &mut r.demographics,
    },
    FieldSpec {
        column: "duration",
        label: Label::Exact("Duration:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.duration,
    },
    FieldSpec {
        column: "adult_rating",
        label: Label::Exact("Rating:"),
        strategy: Strategy::Sibling,
        slot: |r| &mut r.adult_rating,
    },
    FieldSpec {
        column: "rating",
        label: Label::Exact("ratingValue"),
        strategy: Strategy::RatingAttribute,
        slot: |r| &mut r.rating,
    },
];

/// Builds a record from a detail page
///
/// Returns `None` only when the title heading is missing; every other field
/// degrades to [`SENTINEL`] on its own.
pub fn parse_record(html: &str) -> Option<AnimeRecord> {
    let document = Html::parse_document(html);

    let mut record = AnimeRecord::with_title(extract_title(&document)?);
    for field in FIELD_TABLE.iter() {
        *(field.slot)(&mut record) = extract(&document, &field.label, field.strategy);
    }
    record.synopsis = extract_synopsis(&document);

    Some(record)
}

/// Trimmed text of the title heading, if present and non-empty
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse(TITLE_SELECTOR).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
}

/// Synopsis text with the trailing caption line dropped
///
/// The block after the heading's container ends with a credit line such as
/// `[Written by MAL Rewrite]`; the remaining lines are joined with spaces.
pub fn extract_synopsis(document: &Html) -> String {
    synopsis_block(document)
        .map(|block| {
            let lines: Vec<&str> = block.lines().collect();
            let body = &lines[..lines.len().saturating_sub(1)];
            body.iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|synopsis| !synopsis.is_empty())
        .unwrap_or_else(|| SENTINEL.to_string())
}

fn synopsis_block(document: &Html) -> Option<String> {
    let heading = find_marker(document, "h2", &Label::Exact(SYNOPSIS_HEADING))?;
    let container = ElementRef::wrap(heading.parent()?)?;
    next_sibling_text(container)
}
