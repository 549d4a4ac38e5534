use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::entry::{Entry, EntryId};
use crate::filter::{FilterState, Outcome, Refresh, RegionFilter};
use crate::region::Region;
use crate::render::{self, DetailPanel, LegendItem, MapConfig, MapWidget, StyleHint};
use crate::store::{DatasetStats, DatasetStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(EntryId),
}

impl Selection {
    pub fn id(&self) -> Option<EntryId> {
        match self {
            Self::NoSelection => None,
            Self::Selected(id) => Some(*id),
        }
    }
}

/// The dataset, its filters and the current selection, kept consistent with
/// what the map and the detail panel show.
///
/// Every mutating method recomputes the visible set from scratch, brings the
/// map's points in line with it, and drops the selection if the selected
/// entry is no longer visible. When a method returns, the selected entry (if
/// any) is always visible.
pub struct Atlas<M: MapWidget, P: DetailPanel> {
    store: DatasetStore,
    filter: FilterState,
    selection: Selection,
    visible: Vec<EntryId>,
    outcome: Outcome,
    /// Search text as of the previous refresh
    last_search: String,
    /// Map point for each visible entry, keyed by id
    markers: HashMap<EntryId, M::Handle>,
    map: M,
    panel: P,
    config: MapConfig,
}

impl<M: MapWidget, P: DetailPanel> Atlas<M, P> {
    /// Put every entry on the map and show the intro panel.
    pub fn new(store: DatasetStore, map: M, panel: P, config: MapConfig) -> Self {
        let mut atlas = Self {
            store,
            filter: FilterState::new(),
            selection: Selection::NoSelection,
            visible: Vec::new(),
            outcome: Outcome::Listed,
            last_search: String::new(),
            markers: HashMap::new(),
            map,
            panel,
            config,
        };
        atlas.map.pan_zoom_to(config.center, config.clamp_zoom(config.zoom));
        atlas.refresh();
        atlas.panel.show_intro();
        atlas
    }

    // ── Filter handlers ────────────────────────────────────────────

    pub fn set_region(&mut self, region: RegionFilter) -> Outcome {
        tracing::debug!("region filter: {}", region.as_tag());
        self.filter.set_region(region);
        self.refresh()
    }

    /// Parse `"all"` or a region tag. Unknown tags are logged and ignored.
    pub fn set_region_tag(&mut self, tag: &str) -> Option<Outcome> {
        match tag.parse::<RegionFilter>() {
            Ok(region) => Some(self.set_region(region)),
            Err(w) => {
                tracing::warn!("{w}");
                None
            }
        }
    }

    pub fn toggle_era_tag(&mut self, tag: &str) -> Outcome {
        let active = self.filter.toggle_era_tag(tag);
        tracing::debug!("era tag {tag:?} active: {active}");
        self.refresh()
    }

    pub fn set_search_text(&mut self, text: &str) -> Outcome {
        self.filter.set_search_text(text);
        tracing::debug!("search: {:?}", self.filter.search_text());
        self.refresh()
    }

    pub fn clear_search(&mut self) -> Outcome {
        self.filter.clear_search();
        self.refresh()
    }

    pub fn reset_filters(&mut self) -> Outcome {
        self.filter.reset();
        self.refresh()
    }

    /// Recompute the visible set and bring the map, the selection and the
    /// panel in line with it.
    ///
    /// The panel only changes when the search text changed or the selection
    /// was dropped; a filter change under an unchanged search leaves a
    /// surviving selection's detail card in place.
    fn refresh(&mut self) -> Outcome {
        let Refresh { visible, outcome } = self.filter.refresh(&self.store);
        self.sync_markers(&visible);
        let before = self.selection;
        self.on_visibility_changed(&visible);
        let dropped = before != self.selection;
        self.visible = visible;
        self.outcome = outcome;

        let search_changed = self.filter.search_text() != self.last_search;
        if search_changed {
            self.last_search = self.filter.search_text().to_string();
        }
        let searching = self.filter.is_searching();
        let selected = self.selection != Selection::NoSelection;

        match outcome {
            Outcome::SingleMatch(id) => {
                if self.selection != Selection::Selected(id) {
                    self.select(id);
                }
            }
            Outcome::EmptyResultSet if searching => {
                self.panel.show_no_results(self.filter.search_text());
            }
            Outcome::Listed if searching && (search_changed || !selected) => {
                let entries: Vec<&Entry> = self
                    .visible
                    .iter()
                    .filter_map(|id| self.store.find_by_id(*id).ok())
                    .collect();
                self.panel.show_results(self.filter.search_text(), &entries);
            }
            // Search just went away: drop the stale result list
            _ if !searching && search_changed && !selected && !dropped => {
                self.panel.show_intro();
            }
            _ => {}
        }
        outcome
    }

    /// Remove points for hidden entries, add points for newly visible ones.
    /// Both passes run in dataset order.
    fn sync_markers(&mut self, visible: &[EntryId]) {
        let shown: HashSet<EntryId> = visible.iter().copied().collect();
        for entry in self.store.entries() {
            if shown.contains(&entry.id) {
                continue;
            }
            if let Some(handle) = self.markers.remove(&entry.id) {
                self.map.remove_point(handle);
            }
        }
        for entry in self.store.entries() {
            if shown.contains(&entry.id) && !self.markers.contains_key(&entry.id) {
                let handle = self
                    .map
                    .add_point(entry.coordinate, StyleHint::for_entry(entry));
                self.markers.insert(entry.id, handle);
            }
        }
    }

    // ── Selection ──────────────────────────────────────────────────

    /// Select an entry: center the map on it, then show its details.
    ///
    /// Unknown or currently hidden ids are logged and leave the selection
    /// unchanged. Returns the selection after the call.
    pub fn select(&mut self, id: EntryId) -> Selection {
        let entry = match self.store.find_by_id(id) {
            Ok(entry) => entry,
            Err(w) => {
                tracing::warn!("cannot select: {w}");
                return self.selection;
            }
        };
        if !self.visible.contains(&id) {
            tracing::warn!("cannot select entry {id}: hidden by the current filters");
            return self.selection;
        }
        tracing::debug!("selecting {} ({})", id, entry.display_name());
        self.selection = Selection::Selected(id);
        self.map
            .pan_zoom_to(entry.coordinate, self.config.clamp_zoom(self.config.select_zoom));
        self.panel.show_entry(entry);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::NoSelection;
        self.panel.show_intro();
    }

    /// Drop the selection if its entry is not in `visible`.
    pub fn on_visibility_changed(&mut self, visible: &[EntryId]) {
        if let Selection::Selected(id) = self.selection {
            if !visible.contains(&id) {
                tracing::debug!("selected entry {id} filtered out; clearing selection");
                self.clear_selection();
            }
        }
    }

    /// Pan to an entry without selecting it. Returns false for unknown ids.
    pub fn focus(&mut self, id: EntryId) -> bool {
        match self.store.find_by_id(id) {
            Ok(entry) => {
                self.map
                    .pan_zoom_to(entry.coordinate, self.config.clamp_zoom(self.config.focus_zoom));
                true
            }
            Err(w) => {
                tracing::warn!("cannot focus: {w}");
                false
            }
        }
    }

    // ── Presentation queries ───────────────────────────────────────

    pub fn visible_entries(&self) -> Vec<&Entry> {
        self.visible
            .iter()
            .filter_map(|id| self.store.find_by_id(*id).ok())
            .collect()
    }

    pub fn visible_ids(&self) -> &[EntryId] {
        &self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selection
            .id()
            .and_then(|id| self.store.find_by_id(id).ok())
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Outcome of the most recent refresh.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Entry counts per region over the whole dataset.
    pub fn region_counts(&self) -> BTreeMap<Region, usize> {
        self.store.region_counts()
    }

    /// Colour legend for the regions present in the dataset.
    pub fn legend(&self) -> Vec<LegendItem> {
        render::legend(&self.store.region_counts())
    }

    pub fn era_tags(&self) -> BTreeSet<&str> {
        self.store.unique_era_tags()
    }

    pub fn stats(&self) -> DatasetStats {
        self.store.stats()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Whether the entry currently has a point the map reports as visible.
    pub fn is_on_map(&self, id: EntryId) -> bool {
        self.markers
            .get(&id)
            .is_some_and(|handle| self.map.is_point_visible(handle))
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::entry::Coordinate;

    #[derive(Debug, Clone, PartialEq)]
    enum Effect {
        Add(EntryId),
        Remove(EntryId),
        Pan(Coordinate, u8),
        Detail(EntryId),
        Intro,
        Results(Vec<EntryId>),
        NoResults(String),
    }

    type Log = Rc<RefCell<Vec<Effect>>>;

    struct RecordingMap {
        log: Log,
        points: HashSet<EntryId>,
    }

    impl MapWidget for RecordingMap {
        type Handle = EntryId;

        fn add_point(&mut self, _coordinate: Coordinate, style: StyleHint) -> EntryId {
            self.log.borrow_mut().push(Effect::Add(style.id));
            self.points.insert(style.id);
            style.id
        }

        fn remove_point(&mut self, handle: EntryId) {
            self.log.borrow_mut().push(Effect::Remove(handle));
            self.points.remove(&handle);
        }

        fn pan_zoom_to(&mut self, coordinate: Coordinate, zoom: u8) {
            self.log.borrow_mut().push(Effect::Pan(coordinate, zoom));
        }

        fn is_point_visible(&self, handle: &EntryId) -> bool {
            self.points.contains(handle)
        }
    }

    struct RecordingPanel {
        log: Log,
    }

    impl DetailPanel for RecordingPanel {
        fn show_entry(&mut self, entry: &Entry) {
            self.log.borrow_mut().push(Effect::Detail(entry.id));
        }

        fn show_intro(&mut self) {
            self.log.borrow_mut().push(Effect::Intro);
        }

        fn show_results(&mut self, _search: &str, entries: &[&Entry]) {
            let ids = entries.iter().map(|e| e.id).collect();
            self.log.borrow_mut().push(Effect::Results(ids));
        }

        fn show_no_results(&mut self, search: &str) {
            self.log.borrow_mut().push(Effect::NoResults(search.to_string()));
        }
    }

    fn atlas_with(store: DatasetStore) -> (Atlas<RecordingMap, RecordingPanel>, Log) {
        let log: Log = Rc::default();
        let map = RecordingMap {
            log: log.clone(),
            points: HashSet::new(),
        };
        let panel = RecordingPanel { log: log.clone() };
        let atlas = Atlas::new(store, map, panel, MapConfig::default());
        log.borrow_mut().clear();
        (atlas, log)
    }

    fn sample_atlas() -> (Atlas<RecordingMap, RecordingPanel>, Log) {
        atlas_with(DatasetStore::sample())
    }

    fn three_entry_store() -> DatasetStore {
        DatasetStore::load(
            r#"{"entries": [
            {"id": 1, "name": "Averroes", "region": "espana", "subcategory": "Edad Media",
             "location": [37.88, -4.77]},
            {"id": 2, "name": "Tomás de Aquino", "region": "italia", "subcategory": "Edad Media",
             "location": [41.4, 13.8]},
            {"id": 3, "name": "Giordano Bruno", "region": "italia", "subcategory": "Renacimiento",
             "location": [40.9, 14.3]}
        ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_places_every_point_and_shows_intro() {
        let log: Log = Rc::default();
        let map = RecordingMap {
            log: log.clone(),
            points: HashSet::new(),
        };
        let atlas = Atlas::new(
            DatasetStore::sample(),
            map,
            RecordingPanel { log: log.clone() },
            MapConfig::default(),
        );
        assert_eq!(
            *log.borrow(),
            vec![
                Effect::Pan(Coordinate::new(50.0, 15.0), 4),
                Effect::Add(EntryId(1)),
                Effect::Add(EntryId(2)),
                Effect::Intro,
            ]
        );
        assert_eq!(atlas.selection(), Selection::NoSelection);
        assert!(atlas.is_on_map(EntryId(1)));
    }

    #[test]
    fn test_region_scenario() {
        let (mut atlas, _) = sample_atlas();
        assert_eq!(atlas.set_region_tag("espana"), Some(Outcome::Listed));
        assert_eq!(atlas.visible_count(), 2);
        assert_eq!(atlas.set_region_tag("francia"), Some(Outcome::EmptyResultSet));
        assert_eq!(atlas.visible_count(), 0);
        assert!(!atlas.is_on_map(EntryId(1)));
    }

    #[test]
    fn test_unknown_region_tag_is_ignored() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_region_tag("espana");
        log.borrow_mut().clear();
        assert_eq!(atlas.set_region_tag("narnia"), None);
        assert_eq!(atlas.filter().region(), RegionFilter::Only(Region::Espana));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_single_search_match_auto_selects() {
        let (mut atlas, log) = sample_atlas();
        let outcome = atlas.set_search_text("Averroes");
        assert_eq!(outcome, Outcome::SingleMatch(EntryId(1)));
        assert_eq!(atlas.visible_count(), 1);
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(1)));
        assert_eq!(
            *log.borrow(),
            vec![
                Effect::Remove(EntryId(2)),
                Effect::Pan(Coordinate::new(37.8882, -4.7794), 7),
                Effect::Detail(EntryId(1)),
            ]
        );
    }

    #[test]
    fn test_search_without_matches_reports_empty_result_set() {
        let (mut atlas, log) = sample_atlas();
        assert_eq!(
            atlas.set_search_text("nonexistent-zzz"),
            Outcome::EmptyResultSet
        );
        assert_eq!(atlas.visible_count(), 0);
        assert_eq!(atlas.outcome(), Outcome::EmptyResultSet);
        assert_eq!(
            log.borrow().last(),
            Some(&Effect::NoResults("nonexistent-zzz".into()))
        );
    }

    #[test]
    fn test_search_with_several_matches_lists_them() {
        let (mut atlas, log) = sample_atlas();
        assert_eq!(atlas.set_search_text("aristóteles"), Outcome::Listed);
        assert_eq!(
            *log.borrow(),
            vec![Effect::Results(vec![EntryId(1), EntryId(2)])]
        );
    }

    #[test]
    fn test_selection_cleared_when_filtered_out() {
        let (mut atlas, log) = sample_atlas();
        assert_eq!(atlas.select(EntryId(1)), Selection::Selected(EntryId(1)));
        log.borrow_mut().clear();
        atlas.set_region_tag("francia");
        assert_eq!(atlas.selection(), Selection::NoSelection);
        assert!(atlas.selected_entry().is_none());
        assert_eq!(
            *log.borrow(),
            vec![
                Effect::Remove(EntryId(1)),
                Effect::Remove(EntryId(2)),
                Effect::Intro,
            ]
        );
    }

    #[test]
    fn test_selection_survives_when_still_visible() {
        let (mut atlas, _) = atlas_with(three_entry_store());
        atlas.select(EntryId(2));
        atlas.set_region_tag("italia");
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(2)));
        atlas.toggle_era_tag("Renacimiento");
        assert_eq!(atlas.selection(), Selection::NoSelection);
        assert_eq!(atlas.visible_ids(), &[EntryId(3)]);
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let (mut atlas, log) = sample_atlas();
        atlas.select(EntryId(2));
        log.borrow_mut().clear();
        assert_eq!(atlas.select(EntryId(42)), Selection::Selected(EntryId(2)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_select_hidden_entry_is_refused() {
        let (mut atlas, _) = atlas_with(three_entry_store());
        atlas.set_region_tag("italia");
        assert_eq!(atlas.select(EntryId(1)), Selection::NoSelection);
    }

    #[test]
    fn test_select_centers_before_detail() {
        let (mut atlas, log) = sample_atlas();
        atlas.select(EntryId(2));
        assert_eq!(
            *log.borrow(),
            vec![
                Effect::Pan(Coordinate::new(40.9429, -4.1088), 7),
                Effect::Detail(EntryId(2)),
            ]
        );
        assert_eq!(atlas.selected_entry().unwrap().name, "Domingo de Soto");
    }

    #[test]
    fn test_clear_selection_shows_intro() {
        let (mut atlas, log) = sample_atlas();
        atlas.select(EntryId(1));
        log.borrow_mut().clear();
        atlas.clear_selection();
        assert_eq!(atlas.selection(), Selection::NoSelection);
        assert_eq!(*log.borrow(), vec![Effect::Intro]);
    }

    #[test]
    fn test_era_toggle_round_trip() {
        let (mut atlas, _) = sample_atlas();
        let before_tags = atlas.filter().active_era_tags().clone();
        let before_visible = atlas.visible_ids().to_vec();
        atlas.toggle_era_tag("Edad Media");
        assert_eq!(atlas.visible_ids(), &[EntryId(1)]);
        atlas.toggle_era_tag("Edad Media");
        assert_eq!(atlas.filter().active_era_tags(), &before_tags);
        assert_eq!(atlas.visible_ids(), before_visible.as_slice());
    }

    #[test]
    fn test_markers_follow_visible_set() {
        let (mut atlas, _) = atlas_with(three_entry_store());
        atlas.toggle_era_tag("Edad Media");
        atlas.set_region_tag("italia");
        for id in [1, 2, 3].map(EntryId) {
            assert_eq!(atlas.is_on_map(id), atlas.visible_ids().contains(&id));
        }
        atlas.reset_filters();
        assert_eq!(atlas.map().points.len(), 3);
    }

    #[test]
    fn test_clear_search_restores_everything() {
        let (mut atlas, _) = sample_atlas();
        atlas.set_search_text("soto");
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(2)));
        assert_eq!(atlas.clear_search(), Outcome::Listed);
        assert_eq!(atlas.visible_count(), 2);
        // Clearing the search does not clear a still-visible selection
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(2)));
    }

    #[test]
    fn test_filter_change_keeps_selected_detail_under_same_search() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_search_text("aristóteles");
        atlas.select(EntryId(1));
        log.borrow_mut().clear();

        assert_eq!(atlas.set_region_tag("espana"), Some(Outcome::Listed));
        // Narrowing to the selected entry alone does not re-select it
        assert_eq!(atlas.toggle_era_tag("Edad Media"), Outcome::SingleMatch(EntryId(1)));
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(1)));
        assert_eq!(*log.borrow(), vec![Effect::Remove(EntryId(2))]);
    }

    #[test]
    fn test_new_search_relists_over_selection() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_search_text("aristóteles");
        atlas.select(EntryId(1));
        log.borrow_mut().clear();

        atlas.set_search_text("aristótele");
        assert_eq!(
            *log.borrow(),
            vec![Effect::Results(vec![EntryId(1), EntryId(2)])]
        );
        assert_eq!(atlas.selection(), Selection::Selected(EntryId(1)));
    }

    #[test]
    fn test_filter_change_relists_without_selection() {
        let (mut atlas, log) = atlas_with(three_entry_store());
        atlas.set_search_text("o");
        log.borrow_mut().clear();

        atlas.set_region_tag("italia");
        assert_eq!(
            *log.borrow(),
            vec![
                Effect::Remove(EntryId(1)),
                Effect::Results(vec![EntryId(2), EntryId(3)]),
            ]
        );
    }

    #[test]
    fn test_clearing_failed_search_shows_intro() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_search_text("zzz");
        log.borrow_mut().clear();

        assert_eq!(atlas.clear_search(), Outcome::Listed);
        assert_eq!(atlas.selection(), Selection::NoSelection);
        assert_eq!(
            *log.borrow(),
            vec![Effect::Add(EntryId(1)), Effect::Add(EntryId(2)), Effect::Intro]
        );
    }

    #[test]
    fn test_reset_after_result_list_shows_intro() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_search_text("aristóteles");
        log.borrow_mut().clear();
        atlas.reset_filters();
        assert_eq!(*log.borrow(), vec![Effect::Intro]);
    }

    #[test]
    fn test_clearing_search_keeps_selected_detail() {
        let (mut atlas, log) = sample_atlas();
        atlas.set_search_text("soto");
        log.borrow_mut().clear();
        atlas.clear_search();
        assert_eq!(*log.borrow(), vec![Effect::Add(EntryId(1))]);
    }

    #[test]
    fn test_focus() {
        let (mut atlas, log) = sample_atlas();
        assert!(atlas.focus(EntryId(1)));
        assert!(!atlas.focus(EntryId(9)));
        assert_eq!(
            *log.borrow(),
            vec![Effect::Pan(Coordinate::new(37.8882, -4.7794), 8)]
        );
        assert_eq!(atlas.selection(), Selection::NoSelection);
    }

    #[test]
    fn test_presentation_queries() {
        let (atlas, _) = sample_atlas();
        assert_eq!(atlas.region_counts()[&Region::Espana], 2);
        assert_eq!(atlas.era_tags().len(), 2);
        assert_eq!(atlas.stats().century_range, Some((12, 16)));
        assert_eq!(atlas.visible_entries().len(), 2);
        let legend = atlas.legend();
        assert_eq!(legend.len(), 1);
        assert_eq!((legend[0].region, legend[0].count), (Region::Espana, 2));
    }
}
