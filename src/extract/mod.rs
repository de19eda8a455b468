//! Heuristic field extraction from detail pages
//!
//! This module contains:
//! - Label-anchored lookups with explicit absence handling (`query`)
//! - The static field-to-strategy table and record assembly (`fields`)

mod fields;
mod query;

pub use fields::{
    extract_synopsis, extract_title, parse_record, FieldSpec, FIELD_TABLE, SYNOPSIS_HEADING,
    TITLE_SELECTOR,
};
pub use query::{
    extract, format_value, join_values, normalize, raw_extract, Label, LabelMatcher, RawValue,
    Strategy, PLACEHOLDER,
};
