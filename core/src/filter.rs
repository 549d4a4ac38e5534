use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::entry::{Entry, EntryId};
use crate::error::NotFoundWarning;
use crate::region::Region;
use crate::store::DatasetStore;

// ── Region filter ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Only(region) => entry.region == *region,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(region) => region.as_tag(),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = NotFoundWarning;

    /// `"all"` or a region tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "all" {
            return Ok(Self::All);
        }
        Region::from_tag(s)
            .map(Self::Only)
            .ok_or_else(|| NotFoundWarning::Region(s.to_string()))
    }
}

// ── Outcome of a refresh ───────────────────────────────────────────

/// How the presentation layer should treat a freshly computed visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// One or more entries visible; show them as usual
    Listed,
    /// A search matched exactly one entry, which must be auto-selected
    SingleMatch(EntryId),
    /// Nothing matches; show a "no results" message rather than a blank view
    EmptyResultSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    /// Visible ids, in dataset order
    pub visible: Vec<EntryId>,
    pub outcome: Outcome,
}

// ── Filter state ───────────────────────────────────────────────────

/// Region, era and search filters. Selection lives in the bridge, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    region: RegionFilter,
    active_era_tags: BTreeSet<String>,
    search_text: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> RegionFilter {
        self.region
    }

    pub fn active_era_tags(&self) -> &BTreeSet<String> {
        &self.active_era_tags
    }

    /// Normalized search text; empty means no search filter.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_searching(&self) -> bool {
        !self.search_text.is_empty()
    }

    pub fn set_region(&mut self, region: RegionFilter) {
        self.region = region;
    }

    /// Returns whether `tag` is active after the toggle.
    pub fn toggle_era_tag(&mut self, tag: &str) -> bool {
        if self.active_era_tags.remove(tag) {
            false
        } else {
            self.active_era_tags.insert(tag.to_string());
            true
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = normalize_search(text);
    }

    pub fn clear_search(&mut self) {
        self.search_text.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Region, then era, then search; all three must hold.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.region.matches(entry)
            && entry.matches_era(&self.active_era_tags)
            && entry.matches_search(&self.search_text)
    }

    /// Every entry passing all filters, in dataset order.
    pub fn compute_visible<'a>(&self, store: &'a DatasetStore) -> Vec<&'a Entry> {
        store.entries().iter().filter(|e| self.matches(e)).collect()
    }

    pub fn refresh(&self, store: &DatasetStore) -> Refresh {
        let visible: Vec<EntryId> = self.compute_visible(store).iter().map(|e| e.id).collect();
        let outcome = match visible.as_slice() {
            [] => Outcome::EmptyResultSet,
            [only] if self.is_searching() => Outcome::SingleMatch(*only),
            _ => Outcome::Listed,
        };
        Refresh { visible, outcome }
    }
}

/// Trim and lower-case user input.
pub fn normalize_search(text: &str) -> String {
    text.trim().to_lowercase()
}
