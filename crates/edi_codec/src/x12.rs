//! X12 wire-format primitives
//!
//! Segments are terminated by `~` and elements within a segment are joined
//! by `*`. Only the default delimiters are supported; the ISA envelope this
//! codec emits always declares them.

/// Terminates each segment
pub const SEGMENT_TERMINATOR: char = '~';

/// Separates elements within a segment
pub const ELEMENT_SEPARATOR: char = '*';

/// Builds one segment from a tag and its elements
pub(crate) fn segment(tag: &str, elements: &[&str]) -> String {
    let mut out = String::with_capacity(tag.len() + elements.iter().map(|e| e.len() + 1).sum::<usize>());
    out.push_str(tag);
    for element in elements {
        out.push(ELEMENT_SEPARATOR);
        out.push_str(element);
    }
    out
}

/// Joins segments into a full interchange, terminator after every segment
pub(crate) fn join_segments(segments: &[String]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(seg);
        out.push(SEGMENT_TERMINATOR);
    }
    out
}

/// Splits a raw payload into segments, dropping empty fragments
pub(crate) fn split_segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEGMENT_TERMINATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
