//! Placeholder scanning
//!
//! Finds `{{ identifier }}` tokens in a template while skipping fenced code
//! regions. Fences are tracked with a plain parity toggle: every triple-backtick
//! marker flips between outside and inside, so an unbalanced marker leaves the
//! rest of the template inside a fence.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

/// Code-fence marker
pub const FENCE: &str = "```";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid"));

/// A placeholder found outside of any fenced region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Identifier between the braces, whitespace trimmed
    pub name: String,
    /// Byte range of the whole `{{ ... }}` token in the template
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Outside,
    Inside,
}

impl FenceState {
    fn toggle(self) -> Self {
        match self {
            FenceState::Outside => FenceState::Inside,
            FenceState::Inside => FenceState::Outside,
        }
    }
}

/// Scan a template left to right and return every placeholder outside fences,
/// in order of appearance. Duplicates are kept.
pub fn scan(template: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut state = FenceState::Outside;
    let mut cursor = 0;
    let mut fences = 0usize;

    for (idx, _) in template.match_indices(FENCE) {
        if state == FenceState::Outside {
            collect_region(template, cursor..idx, &mut placeholders);
        }
        state = state.toggle();
        fences += 1;
        cursor = idx + FENCE.len();
    }

    match state {
        FenceState::Outside => collect_region(template, cursor..template.len(), &mut placeholders),
        FenceState::Inside => {
            warn!(fences, offset = cursor, "scan: unbalanced code fence, remaining text treated as fenced");
        }
    }

    debug!(
        fences,
        placeholders = placeholders.len(),
        "scan: finished"
    );
    placeholders
}

fn collect_region(template: &str, region: Range<usize>, out: &mut Vec<Placeholder>) {
    let offset = region.start;
    for caps in PLACEHOLDER.captures_iter(&template[region]) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(Placeholder {
            name: name.as_str().to_string(),
            span: offset + token.start()..offset + token.end(),
        });
    }
}

/// Identifier names referenced by `placeholders`, de-duplicated, in
/// first-occurrence order.
pub fn unique_names(placeholders: &[Placeholder]) -> Vec<&str> {
    let mut seen = HashSet::new();
    placeholders
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
