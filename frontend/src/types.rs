// Re-export shared types from atlas_core
pub use atlas_core::{
    Atlas, Coordinate, DatasetStore, DetailPanel, Entry, EntryId, LegendItem, MapConfig,
    MapWidget, Outcome, RegionFilter, SHARE_PARAM, Selection, StyleHint, parse_share_param,
    share_link, share_text,
};

use crate::map::SvgMap;
use crate::panel::PanelState;

/// The atlas as wired into the web UI.
pub type WebAtlas = Atlas<SvgMap, PanelState>;
