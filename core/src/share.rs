//! Deep links to a single philosopher (`?philosopher=<id>`).

use crate::entry::{Entry, EntryId};

pub const SHARE_PARAM: &str = "philosopher";

/// `page` with any query or fragment replaced by `?philosopher=<id>`.
pub fn share_link(page: &str, id: EntryId) -> String {
    let base = page.split(['?', '#']).next().unwrap_or_default();
    format!("{base}?{SHARE_PARAM}={id}")
}

/// Text offered when sharing an entry.
pub fn share_text(entry: &Entry, link: &str) -> String {
    match entry.area.as_deref() {
        Some(area) => format!(
            "Conoce a {} en el Atlas Filosófico Europeo: {area}. {link}",
            entry.display_name()
        ),
        None => format!(
            "Conoce a {} en el Atlas Filosófico Europeo. {link}",
            entry.display_name()
        ),
    }
}

/// Parse the value of the `philosopher` query parameter.
pub fn parse_share_param(value: &str) -> Option<EntryId> {
    match value.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(EntryId(id)),
    }
}
