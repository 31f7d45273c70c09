//! Conversion size heuristic.
//!
//! The count is a literal substring count, not a parse: `<div` inside a
//! comment, a script or an attribute value counts too, and `<DIV` does not.
//! It is only ever shown as "N elements converted".

/// The opening-tag prefix being counted.
pub const COUNTED_TAG: &str = "<div";

/// Count non-overlapping occurrences of [`COUNTED_TAG`] in `markup`.
pub fn count_elements(markup: &str) -> usize {
    markup.matches(COUNTED_TAG).count()
}
