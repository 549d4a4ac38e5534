//! Capabilities the atlas needs from whatever draws it.
//!
//! The core never talks to a concrete map library or DOM. A frontend supplies
//! a [`MapWidget`] (points on a map) and a [`DetailPanel`] (the side panel).

use std::collections::BTreeMap;

use crate::entry::{Coordinate, Entry, EntryId};
use crate::region::Region;

/// How a point should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleHint {
    pub id: EntryId,
    pub label: String,
    pub color: String,
}

impl StyleHint {
    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            label: entry.display_name(),
            color: entry.marker_color().to_string(),
        }
    }
}

/// One colour swatch of the region legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub region: Region,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

/// Legend rows for the regions that have entries, ordered by wire tag.
pub fn legend(counts: &BTreeMap<Region, usize>) -> Vec<LegendItem> {
    let mut items: Vec<LegendItem> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(region, count)| LegendItem {
            region: *region,
            label: region.display_name(),
            color: region.color(),
            count: *count,
        })
        .collect();
    items.sort_by_key(|item| item.region.as_tag());
    items
}

pub trait MapWidget {
    /// Opaque token for a point on the map.
    type Handle;

    fn add_point(&mut self, coordinate: Coordinate, style: StyleHint) -> Self::Handle;
    fn remove_point(&mut self, handle: Self::Handle);
    fn pan_zoom_to(&mut self, coordinate: Coordinate, zoom: u8);
    fn is_point_visible(&self, handle: &Self::Handle) -> bool;
}

pub trait DetailPanel {
    fn show_entry(&mut self, entry: &Entry);
    /// Default content when nothing is selected.
    fn show_intro(&mut self);
    /// Several entries match the current search.
    fn show_results(&mut self, search: &str, entries: &[&Entry]);
    fn show_no_results(&mut self, search: &str);
}

/// Initial viewport and zoom levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub center: Coordinate,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// South-west and north-east corners
    pub bounds: (Coordinate, Coordinate),
    /// Zoom used when an entry is selected
    pub select_zoom: u8,
    /// Zoom used when focusing an entry without selecting it
    pub focus_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinate::new(50.0, 15.0),
            zoom: 4,
            min_zoom: 3,
            max_zoom: 10,
            bounds: (Coordinate::new(30.0, -25.0), Coordinate::new(72.0, 50.0)),
            select_zoom: 7,
            focus_zoom: 8,
        }
    }
}

impl MapConfig {
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
