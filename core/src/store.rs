use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::entry::{Coordinate, Entry, EntryId, RawEntry};
use crate::error::{EntryError, MalformedDatasetError, NotFoundWarning};
use crate::region::Region;

/// The built-in dataset used whenever the real one cannot be loaded.
const SAMPLE_JSON: &str = include_str!("../data/sample.json");

/// Headline numbers for the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub regions: usize,
    /// (earliest, latest) century across all entries with a datable era range
    pub century_range: Option<(u32, u32)>,
}

/// The immutable list of entries for the session.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    entries: Vec<Entry>,
    by_id: HashMap<EntryId, usize>,
}

impl DatasetStore {
    /// Parse and validate a dataset payload.
    ///
    /// Ill-formed entries are skipped with a warning; the payload as a whole
    /// is rejected only if its shape is wrong or nothing usable remains.
    pub fn load(raw: &str) -> Result<Self, MalformedDatasetError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, MalformedDatasetError> {
        let Value::Object(mut root) = value else {
            return Err(MalformedDatasetError::MissingEntries);
        };
        let items = match root.remove("entries").or_else(|| root.remove("filosofos")) {
            Some(Value::Array(items)) => items,
            _ => return Err(MalformedDatasetError::MissingEntries),
        };
        if items.is_empty() {
            return Err(MalformedDatasetError::Empty);
        }

        let total = items.len();
        let mut entries = Vec::with_capacity(total);
        let mut by_id = HashMap::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let entry = serde_json::from_value::<RawEntry>(item)
                .map_err(|e| EntryError::Shape {
                    index,
                    reason: e.to_string(),
                })
                .and_then(|raw| Entry::from_raw(index, raw))
                .and_then(|entry| {
                    if by_id.contains_key(&entry.id) {
                        Err(EntryError::DuplicateId(entry.id))
                    } else {
                        Ok(entry)
                    }
                });
            match entry {
                Ok(entry) => {
                    by_id.insert(entry.id, entries.len());
                    entries.push(entry);
                }
                Err(e) => tracing::warn!("skipping entry: {e}"),
            }
        }

        if entries.is_empty() {
            return Err(MalformedDatasetError::NoValidEntries(total));
        }

        let store = Self { entries, by_id };
        store.warn_shared_coordinates();
        tracing::info!("{} of {} entries loaded", store.len(), total);
        Ok(store)
    }

    /// Like [`load`](Self::load), but never fails: any error is logged and
    /// the built-in sample dataset is returned instead.
    pub fn load_or_sample(raw: &str) -> Self {
        match Self::load(raw) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("dataset rejected ({e}); using built-in sample");
                Self::sample()
            }
        }
    }

    /// The two-entry sample (Averroes and Domingo de Soto).
    pub fn sample() -> Self {
        Self::load(SAMPLE_JSON).expect("embedded sample dataset")
    }

    /// Markers are tracked by id, so a shared coordinate is harmless but
    /// usually a data-entry slip.
    fn warn_shared_coordinates(&self) {
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.coordinate == b.coordinate {
                    tracing::warn!(
                        "entries {} and {} share coordinate ({}, {})",
                        a.id,
                        b.id,
                        a.coordinate.lat,
                        a.coordinate.lng
                    );
                }
            }
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn find_by_id(&self, id: EntryId) -> Result<&Entry, NotFoundWarning> {
        self.by_id
            .get(&id)
            .map(|&i| &self.entries[i])
            .ok_or(NotFoundWarning::Id(id))
    }

    /// Exact-equality lookup. Prefer ids; this exists for callers that only
    /// have a map position to go on.
    pub fn find_by_coordinate(&self, lat: f64, lng: f64) -> Result<&Entry, NotFoundWarning> {
        let target = Coordinate::new(lat, lng);
        self.entries
            .iter()
            .find(|e| e.coordinate == target)
            .ok_or(NotFoundWarning::Coordinate { lat, lng })
    }

    /// Entries per region, each list in dataset order.
    pub fn group_by_region(&self) -> BTreeMap<Region, Vec<&Entry>> {
        let mut groups: BTreeMap<Region, Vec<&Entry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.region).or_default().push(entry);
        }
        groups
    }

    pub fn unique_regions(&self) -> BTreeSet<Region> {
        self.entries.iter().map(|e| e.region).collect()
    }

    /// Era tags actually present; absent tags never make it into an entry.
    pub fn unique_era_tags(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.era_tag.as_deref())
            .collect()
    }

    pub fn region_counts(&self) -> BTreeMap<Region, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.region).or_insert(0) += 1;
        }
        counts
    }

    pub fn stats(&self) -> DatasetStats {
        let centuries: Vec<u32> = self.entries.iter().filter_map(Entry::century).collect();
        let century_range = centuries
            .iter()
            .min()
            .zip(centuries.iter().max())
            .map(|(lo, hi)| (*lo, *hi));
        DatasetStats {
            total: self.entries.len(),
            regions: self.unique_regions().len(),
            century_range,
        }
    }
}
