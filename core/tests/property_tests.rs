//! Property-based tests for the filter/selection state machine
//!
//! 1. Visible-set computation is pure
//! 2. The selected entry is always visible (or nothing is selected)
//! 3. Era toggles are involutions
//! 4. The "all" region is the union of every single-region view
//! 5. Every entry is found by its own name

use std::collections::BTreeSet;

use atlas_core::*;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Test collaborators
// ============================================================================

struct NullMap;

impl MapWidget for NullMap {
    type Handle = EntryId;

    fn add_point(&mut self, _coordinate: Coordinate, style: StyleHint) -> EntryId {
        style.id
    }
    fn remove_point(&mut self, _handle: EntryId) {}
    fn pan_zoom_to(&mut self, _coordinate: Coordinate, _zoom: u8) {}
    fn is_point_visible(&self, _handle: &EntryId) -> bool {
        true
    }
}

struct NullPanel;

impl DetailPanel for NullPanel {
    fn show_entry(&mut self, _entry: &Entry) {}
    fn show_intro(&mut self) {}
    fn show_results(&mut self, _search: &str, _entries: &[&Entry]) {}
    fn show_no_results(&mut self, _search: &str) {}
}

// ============================================================================
// Strategies
// ============================================================================

const REGIONS: &[&str] = &["espana", "italia", "francia", "grecia"];
const ERAS: &[&str] = &[
    "Edad Media",
    "Edad Media (Escolástica)",
    "Renacimiento",
    "Ilustración",
];
const NAMES: &[&str] = &["Averroes", "Suárez", "Bruno", "Vico", "Pascal", "Plethon"];

fn entry_strategy() -> impl Strategy<Value = (usize, Option<usize>, usize)> {
    (
        0..REGIONS.len(),
        proptest::option::of(0..ERAS.len()),
        0..NAMES.len(),
    )
}

fn dataset_strategy() -> impl Strategy<Value = DatasetStore> {
    prop::collection::vec(entry_strategy(), 1..12).prop_map(|specs| {
        let entries: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, (region, era, name))| {
                let mut e = json!({
                    "id": i + 1,
                    "name": NAMES[*name],
                    "region": REGIONS[*region],
                    "location": [35.0 + i as f64, 10.0 + i as f64],
                });
                if let Some(era) = era {
                    e["subcategory"] = json!(ERAS[*era]);
                }
                e
            })
            .collect();
        DatasetStore::from_value(json!({ "entries": entries })).unwrap()
    })
}

#[derive(Debug, Clone)]
enum Op {
    Region(Option<usize>),
    Toggle(usize),
    Search(String),
    Select(u32),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0..REGIONS.len()).prop_map(Op::Region),
        (0..ERAS.len()).prop_map(Op::Toggle),
        prop_oneof![
            Just(String::new()),
            Just("a".to_string()),
            Just("AVERROES".to_string()),
            Just(" bruno ".to_string()),
            Just("edad".to_string()),
            Just("zzz".to_string()),
        ]
        .prop_map(Op::Search),
        (0u32..14).prop_map(Op::Select),
        Just(Op::Clear),
    ]
}

fn apply(atlas: &mut Atlas<NullMap, NullPanel>, op: &Op) {
    match op {
        Op::Region(None) => {
            atlas.set_region(RegionFilter::All);
        }
        Op::Region(Some(i)) => {
            atlas.set_region_tag(REGIONS[*i]);
        }
        Op::Toggle(i) => {
            atlas.toggle_era_tag(ERAS[*i]);
        }
        Op::Search(text) => {
            atlas.set_search_text(text);
        }
        Op::Select(id) => {
            atlas.select(EntryId(*id));
        }
        Op::Clear => atlas.clear_selection(),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_selection_always_visible(
        store in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..30),
    ) {
        let mut atlas = Atlas::new(store, NullMap, NullPanel, MapConfig::default());
        for op in &ops {
            apply(&mut atlas, op);
            if let Selection::Selected(id) = atlas.selection() {
                let visible: Vec<EntryId> = atlas
                    .filter()
                    .compute_visible(atlas.store())
                    .iter()
                    .map(|e| e.id)
                    .collect();
                prop_assert!(visible.contains(&id), "selected {id} not in {visible:?} after {op:?}");
            }
        }
    }

    #[test]
    fn prop_compute_visible_is_pure(
        store in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..10),
    ) {
        let mut atlas = Atlas::new(store, NullMap, NullPanel, MapConfig::default());
        for op in &ops {
            apply(&mut atlas, op);
        }
        let first: Vec<EntryId> = atlas.filter().compute_visible(atlas.store()).iter().map(|e| e.id).collect();
        let second: Vec<EntryId> = atlas.filter().compute_visible(atlas.store()).iter().map(|e| e.id).collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.as_slice(), atlas.visible_ids());
        // Dataset order is preserved
        prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_toggle_twice_is_identity(
        store in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..10),
        tag in 0..ERAS.len(),
    ) {
        let mut atlas = Atlas::new(store.clone(), NullMap, NullPanel, MapConfig::default());
        for op in &ops {
            apply(&mut atlas, op);
        }
        let mut filter = atlas.filter().clone();
        let before_tags = filter.active_era_tags().clone();
        let before: Vec<EntryId> = filter.compute_visible(&store).iter().map(|e| e.id).collect();

        filter.toggle_era_tag(ERAS[tag]);
        filter.toggle_era_tag(ERAS[tag]);

        let after: Vec<EntryId> = filter.compute_visible(&store).iter().map(|e| e.id).collect();
        prop_assert_eq!(filter.active_era_tags(), &before_tags);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_all_region_is_union_of_single_regions(
        store in dataset_strategy(),
        tags in prop::collection::btree_set(0..ERAS.len(), 0..3),
        search in prop_oneof![Just(""), Just("a"), Just("edad"), Just("bruno")],
    ) {
        let mut filter = FilterState::new();
        for t in &tags {
            filter.toggle_era_tag(ERAS[*t]);
        }
        filter.set_search_text(search);

        let all: BTreeSet<EntryId> = filter.compute_visible(&store).iter().map(|e| e.id).collect();
        let mut union = BTreeSet::new();
        for region in Region::ALL {
            let mut only = filter.clone();
            only.set_region(RegionFilter::Only(region));
            for entry in only.compute_visible(&store) {
                prop_assert_eq!(entry.region, region);
                prop_assert!(union.insert(entry.id), "{} listed under two regions", entry.id);
            }
        }
        prop_assert_eq!(all, union);
    }

    #[test]
    fn prop_unfiltered_shows_everything_and_names_are_found(
        store in dataset_strategy(),
        name in 0..NAMES.len(),
    ) {
        let mut filter = FilterState::new();
        prop_assert_eq!(filter.compute_visible(&store).len(), store.len());

        let needle = NAMES[name].to_uppercase();
        filter.set_search_text(&needle);
        let found: BTreeSet<EntryId> = filter.compute_visible(&store).iter().map(|e| e.id).collect();
        for entry in store.entries() {
            if entry.name == NAMES[name] {
                prop_assert!(found.contains(&entry.id), "{} not found by {needle:?}", entry.id);
            }
        }
    }

    #[test]
    fn prop_outcome_matches_visible_set(
        store in dataset_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..10),
    ) {
        let mut atlas = Atlas::new(store, NullMap, NullPanel, MapConfig::default());
        for op in &ops {
            apply(&mut atlas, op);
        }
        let searching = atlas.filter().is_searching();
        match atlas.outcome() {
            Outcome::EmptyResultSet => prop_assert_eq!(atlas.visible_count(), 0),
            Outcome::SingleMatch(id) => {
                prop_assert!(searching);
                prop_assert_eq!(atlas.visible_ids(), &[id][..]);
            }
            Outcome::Listed => {
                prop_assert!(atlas.visible_count() > 0);
                prop_assert!(!(searching && atlas.visible_count() == 1));
            }
        }
    }
}
