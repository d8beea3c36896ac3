//! Anchor ids for headings.
//!
//! Ids are derived from the visible heading text only. Two headings with the
//! same text produce the same id; [`AnchorSlugger`] can be applied afterwards
//! when a consumer needs unique anchors.

use std::collections::{HashMap, HashSet};

/// Derive an anchor id from heading text: lowercase, keep `[a-z0-9]`, fold
/// whitespace and hyphen runs into a single `-`, and trim hyphens at both ends.
/// Returns an empty string when nothing survives.
pub fn heading_anchor_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut id = String::with_capacity(lowered.len());

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            id.push(ch);
        } else if (ch == '-' || ch.is_whitespace()) && !id.ends_with('-') {
            id.push('-');
        }
    }

    id.trim_matches('-').to_string()
}

/// Deterministically generate unique anchors within a single document.
///
/// Anchors processed in order receive monotonic suffixes when duplicates
/// occur (e.g. `section`, `section-2`, `section-3`). A suffixed candidate
/// that is already taken, for instance by a heading whose own text slugs to
/// `section-2`, is skipped.
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor_for(&mut self, base: &str) -> String {
        let count = self.occurrences.entry(base.to_string()).or_insert(0);

        loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{base}-{}", *count)
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
