//! Summation text to BioPAX comment.

use regex::Regex;
use std::sync::OnceLock;

use crate::source::Summation;

struct Patterns {
    control: Regex,
    tag: Regex,
    ampersands: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        control: Regex::new(r"[\x00-\x1F\x7F]+").expect("Invalid regex pattern"),
        tag: Regex::new(r"</*[a-zA-Z][^>]*>").expect("Invalid regex pattern"),
        ampersands: Regex::new(r"&+").expect("Invalid regex pattern"),
    })
}

/// Strip markup from one note. `<>` is Reactome's shorthand for a reversible
/// conversion and becomes "interconverts to".
///
/// Only control-character runs are collapsed. Entity names survive with
/// their `&` blanked, and other spacing, leading and trailing included, is
/// left as written.
pub fn remove_tags(notes: &str) -> String {
    let p = patterns();
    let text = p.control.replace_all(notes, " ");
    let text = p.tag.replace_all(&text, " ");
    let text = text.replace("<>", " interconverts to ").replace('<', " ");
    p.ampersands.replace_all(&text, " ").into_owned()
}

/// Cleaned summations, one per line. No summations gives an empty comment.
pub fn comment_from_summations(summations: &[Summation]) -> String {
    summations
        .iter()
        .map(|s| remove_tags(&s.text))
        .collect::<Vec<_>>()
        .join("\n")
}
