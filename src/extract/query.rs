//! Label-anchored value lookup over a parsed document
//!
//! Every lookup runs the same three stages:
//!
//! 1. [`raw_extract`] chases the document structure from a marker element and
//!    returns `None` as soon as any step is missing.
//! 2. [`normalize`] folds empty results into absence.
//! 3. [`format_value`] renders the result as a single cell, substituting
//!    [`SENTINEL`] for absence and flattening lists.

use crate::record::SENTINEL;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeSet;

/// Value the source site shows in place of an empty list
pub const PLACEHOLDER: &str = "add some";

/// How a marker element is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Element text equals the string exactly
    Exact(&'static str),
    /// Element text contains a match for the regular expression
    Pattern(&'static str),
}

impl Label {
    /// Prepares the label for repeated matching
    ///
    /// A pattern that fails to compile matches nothing.
    pub fn matcher(&self) -> LabelMatcher {
        match self {
            Self::Exact(expected) => LabelMatcher::Exact(expected),
            Self::Pattern(pattern) => match Regex::new(pattern) {
                Ok(re) => LabelMatcher::Pattern(re),
                Err(e) => {
                    tracing::warn!("Invalid label pattern '{}': {}", pattern, e);
                    LabelMatcher::Never
                }
            },
        }
    }
}

/// A [`Label`] compiled once per lookup
#[derive(Debug, Clone)]
pub enum LabelMatcher {
    Exact(&'static str),
    Pattern(Regex),
    Never,
}

impl LabelMatcher {
    /// Returns true if `text` is recognized
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text == *expected,
            Self::Pattern(re) => re.is_match(text),
            Self::Never => false,
        }
    }
}

/// How the value is located relative to the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First non-blank sibling node right after the marker `<span>`
    Sibling,
    /// First element after the marker `<span>` in document order
    NextElement,
    /// Every element sibling after the marker `<span>`
    FollowingSiblings,
    /// The `<span>` whose `itemprop` attribute matches the label
    RatingAttribute,
}

/// Result of the structural stage, before any formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
}

/// Extracts a single cell value; never fails
///
/// # Example
///
/// ```
/// use anime_harvest::extract::{extract, Label, Strategy};
/// use scraper::Html;
///
/// let doc = Html::parse_document(r#"<div><span>Episodes:</span> 64</div>"#);
/// assert_eq!(extract(&doc, &Label::Exact("Episodes:"), Strategy::Sibling), "64");
/// assert_eq!(extract(&doc, &Label::Exact("Aired:"), Strategy::Sibling), "NaN");
/// ```
pub fn extract(document: &Html, label: &Label, strategy: Strategy) -> String {
    format_value(normalize(raw_extract(document, label, strategy)))
}

/// Structural stage: locate the marker and chase the strategy from it
pub fn raw_extract(document: &Html, label: &Label, strategy: Strategy) -> Option<RawValue> {
    if strategy == Strategy::RatingAttribute {
        let selector = Selector::parse("span[itemprop]").ok()?;
        let matcher = label.matcher();
        return document
            .select(&selector)
            .find(|el| el.value().attr("itemprop").is_some_and(|v| matcher.is_match(v)))
            .map(|el| RawValue::Text(element_text(el)));
    }

    let marker = find_marker(document, "span", label)?;

    match strategy {
        Strategy::Sibling => next_sibling_text(marker).map(RawValue::Text),
        Strategy::NextElement => next_element_text(document, marker).map(RawValue::Text),
        Strategy::FollowingSiblings => Some(RawValue::List(
            marker
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .map(element_text)
                .collect(),
        )),
        Strategy::RatingAttribute => None,
    }
}

/// Absence stage: empty text and empty lists count as missing
pub fn normalize(raw: Option<RawValue>) -> Option<RawValue> {
    match raw? {
        RawValue::Text(text) if text.is_empty() => None,
        RawValue::List(values) => {
            let values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
            if values.is_empty() {
                None
            } else {
                Some(RawValue::List(values))
            }
        }
        text => Some(text),
    }
}

/// Formatting stage: render a value as one table cell
pub fn format_value(value: Option<RawValue>) -> String {
    match value {
        None => SENTINEL.to_string(),
        Some(RawValue::Text(text)) => text,
        Some(RawValue::List(values)) => join_values(&values),
    }
}

/// Deduplicates, sorts and joins list values with `", "`
///
/// A result equal to [`PLACEHOLDER`] collapses to [`SENTINEL`].
pub fn join_values(values: &[String]) -> String {
    let unique: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    let joined = unique.into_iter().collect::<Vec<_>>().join(", ");

    if joined.is_empty() || joined == PLACEHOLDER {
        SENTINEL.to_string()
    } else {
        joined
    }
}

/// Finds the first `tag` element whose own text is recognized by `label`
///
/// Only the element's direct text children count, so a wrapper holding a
/// nested label is not a marker.
pub(crate) fn find_marker<'a>(document: &'a Html, tag: &str, label: &Label) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(tag).ok()?;
    let matcher = label.matcher();
    document
        .select(&selector)
        .find(|el| matcher.is_match(&own_text(*el)))
}

/// Concatenated direct text children of an element
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

/// Trimmed text of the first sibling node after `element` that is an element
/// or non-blank text
pub(crate) fn next_sibling_text(element: ElementRef<'_>) -> Option<String> {
    element.next_siblings().find_map(|node| {
        if let Some(sibling) = ElementRef::wrap(node) {
            return Some(element_text(sibling));
        }
        match node.value() {
            Node::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        }
    })
}

/// Trimmed text of the first element following `marker` in document order
fn next_element_text(document: &Html, marker: ElementRef<'_>) -> Option<String> {
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != marker.id())
        .skip(1)
        .find_map(ElementRef::wrap)
        .map(element_text)
}

/// Trimmed text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
