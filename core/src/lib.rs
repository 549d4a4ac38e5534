//! Filtering, search and selection for an atlas of philosophers.
//!
//! [`DatasetStore`] holds the entries, [`FilterState`] decides which of them
//! are visible, and [`Atlas`] keeps the selection, the map points and the
//! detail panel consistent with that visible set.

pub mod atlas;
pub mod entry;
pub mod error;
pub mod filter;
pub mod region;
pub mod render;
pub mod share;
pub mod store;

pub use atlas::{Atlas, Selection};
pub use entry::{Coordinate, Entry, EntryId};
pub use error::{EntryError, MalformedDatasetError, NotFoundWarning};
pub use filter::{FilterState, Outcome, Refresh, RegionFilter};
pub use region::Region;
pub use render::{DetailPanel, LegendItem, MapConfig, MapWidget, StyleHint, legend};
pub use share::{parse_share_param, share_link, share_text, SHARE_PARAM};
pub use store::{DatasetStats, DatasetStore};
