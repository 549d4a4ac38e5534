use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EntryError;
use crate::region::Region;

/// Standalone three- or four-digit numbers inside an era range are years.
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3,4})\b").expect("year regex"));

// ── Identity ───────────────────────────────────────────────────────

/// Stable identifier of an entry, assigned by the dataset and unique within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

// ── Wire format ────────────────────────────────────────────────────

/// One record as it appears in the dataset file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub region: String,
    #[serde(default, rename = "regionName")]
    pub region_name: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub concepts: Option<String>,
    #[serde(default)]
    pub works: Option<Vec<String>>,
    #[serde(alias = "coordinate")]
    pub location: [f64; 2],
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

// ── A validated philosopher record ─────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    /// Historical period label (`subcategory` in the dataset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era_tag: Option<String>,
    /// Free-text life span (`era` in the dataset), e.g. "1126 - 1198"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concepts: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub works: Vec<String>,
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Lower-cased copies of every searchable field
    #[serde(skip)]
    searchable: Vec<String>,
}

impl Entry {
    /// Validate a raw record. `index` is its position in the payload, used
    /// only for error messages when the id itself is unusable.
    pub fn from_raw(index: usize, raw: RawEntry) -> Result<Self, EntryError> {
        let id = u32::try_from(raw.id)
            .ok()
            .filter(|id| *id > 0)
            .map(EntryId)
            .ok_or(EntryError::InvalidId { index, id: raw.id })?;

        let region = Region::from_tag(&raw.region).ok_or_else(|| EntryError::UnknownRegion {
            id,
            region: raw.region.clone(),
        })?;

        let [lat, lng] = raw.location;
        let coordinate = Coordinate::new(lat, lng);
        if !coordinate.is_valid() {
            return Err(EntryError::InvalidCoordinate { id, lat, lng });
        }

        let mut entry = Entry {
            id,
            name: raw.name,
            region,
            region_name: raw.region_name,
            era_tag: raw.subcategory.filter(|s| !s.trim().is_empty()),
            era_range: raw.era,
            area: raw.area,
            concepts: raw.concepts,
            works: raw.works.unwrap_or_default(),
            coordinate,
            city: raw.city,
            color: raw.color,
            searchable: Vec::new(),
        };
        entry.compute_searchable();
        Ok(entry)
    }

    fn compute_searchable(&mut self) {
        let mut fields = vec![self.name.to_lowercase()];
        for field in [
            &self.area,
            &self.concepts,
            &self.era_tag,
            &self.era_range,
            &self.city,
            &self.region_name,
        ]
        .into_iter()
        .flatten()
        {
            fields.push(field.to_lowercase());
        }
        fields.extend(self.works.iter().map(|w| w.to_lowercase()));
        fields.retain(|f| !f.is_empty());
        self.searchable = fields;
    }

    /// The name to show in lists and tooltips.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("#{}", self.id)
        } else {
            self.name.clone()
        }
    }

    /// Display name of the region, preferring the entry's own override.
    pub fn region_label(&self) -> &str {
        self.region_name
            .as_deref()
            .unwrap_or_else(|| self.region.display_name())
    }

    /// Marker colour: the entry's own override, else its region's colour.
    pub fn marker_color(&self) -> &str {
        self.color.as_deref().unwrap_or_else(|| self.region.color())
    }

    /// True if the era tag embeds at least one of `tags`, or `tags` is empty.
    pub fn matches_era(&self, tags: &BTreeSet<String>) -> bool {
        if tags.is_empty() {
            return true;
        }
        match &self.era_tag {
            Some(era) => tags.iter().any(|t| era.contains(t.as_str())),
            None => false,
        }
    }

    /// `needle` must already be normalized (trimmed, lower-cased).
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty() || self.searchable.iter().any(|f| f.contains(needle))
    }

    /// Century of the mean of all years found in the era range.
    pub fn century(&self) -> Option<u32> {
        extract_century(self.era_range.as_deref()?)
    }
}

/// "1126 - 1198" → 12. Returns `None` when no year is present.
pub fn extract_century(era: &str) -> Option<u32> {
    let years: Vec<u32> = YEAR_RE
        .captures_iter(era)
        .filter_map(|c| c[1].parse().ok())
        .filter(|y| *y > 0)
        .collect();
    if years.is_empty() {
        return None;
    }
    let mean = years.iter().map(|y| *y as f64).sum::<f64>() / years.len() as f64;
    Some((mean / 100.0).ceil() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawEntry {
        serde_json::from_value(json).unwrap()
    }

    fn averroes() -> Entry {
        Entry::from_raw(
            0,
            raw(serde_json::json!({
                "id": 1,
                "name": "Averroes",
                "region": "espana",
                "subcategory": "Edad Media (Edad de Oro del Islam)",
                "era": "1126 - 1198",
                "works": ["Tahafut al-Tahafut"],
                "location": [37.8882, -4.7794],
                "city": "Córdoba"
            })),
        )
        .unwrap()
    }

    #[test]
    fn test_extract_century() {
        assert_eq!(extract_century("1126 - 1198"), Some(12));
        assert_eq!(extract_century("c. 480"), Some(5));
        assert_eq!(extract_century("1494 - 1560"), Some(16));
        assert_eq!(extract_century("siglo desconocido"), None);
        assert_eq!(extract_century(""), None);
    }

    #[test]
    fn test_extract_century_ignores_long_numbers() {
        assert_eq!(extract_century("ref 123456"), None);
    }

    #[test]
    fn test_from_raw_valid() {
        let e = averroes();
        assert_eq!(e.id, EntryId(1));
        assert_eq!(e.region, Region::Espana);
        assert_eq!(e.coordinate, Coordinate::new(37.8882, -4.7794));
        assert_eq!(e.century(), Some(12));
        assert_eq!(e.marker_color(), "#3498db");
        assert_eq!(e.region_label(), "España");
    }

    #[test]
    fn test_coordinate_alias() {
        let r = raw(serde_json::json!({"id": 3, "region": "italia", "coordinate": [41.9, 12.5]}));
        let e = Entry::from_raw(0, r).unwrap();
        assert_eq!(e.coordinate.lat, 41.9);
        assert_eq!(e.display_name(), "#3");
    }

    #[test]
    fn test_rejects_bad_records() {
        let r = raw(serde_json::json!({"id": 0, "region": "italia", "location": [41.9, 12.5]}));
        assert_eq!(
            Entry::from_raw(4, r).unwrap_err(),
            EntryError::InvalidId { index: 4, id: 0 }
        );

        let r = raw(serde_json::json!({"id": 5, "region": "atlantida", "location": [41.9, 12.5]}));
        assert!(matches!(
            Entry::from_raw(0, r),
            Err(EntryError::UnknownRegion { .. })
        ));

        let r = raw(serde_json::json!({"id": 5, "region": "italia", "location": [141.9, 12.5]}));
        assert!(matches!(
            Entry::from_raw(0, r),
            Err(EntryError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_blank_era_tag_is_absent() {
        let r = raw(serde_json::json!({
            "id": 9, "region": "grecia", "subcategory": "  ", "location": [38.0, 23.7]
        }));
        assert_eq!(Entry::from_raw(0, r).unwrap().era_tag, None);
    }

    #[test]
    fn test_matches_era_by_containment() {
        let tags = |ts: &[&str]| ts.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>();
        let e = averroes();
        assert!(e.matches_era(&tags(&[])));
        assert!(e.matches_era(&tags(&["Edad Media"])));
        assert!(e.matches_era(&tags(&["Renacimiento", "Edad Media"])));
        assert!(!e.matches_era(&tags(&["Renacimiento"])));
        // Containment is case-sensitive, like the era buttons' labels
        assert!(!e.matches_era(&tags(&["edad media"])));
    }

    #[test]
    fn test_matches_search_across_fields() {
        let e = averroes();
        assert!(e.matches_search(""));
        assert!(e.matches_search("averroes"));
        assert!(e.matches_search("córdoba"));
        assert!(e.matches_search("tahafut"));
        assert!(e.matches_search("1198"));
        assert!(!e.matches_search("kant"));
    }
}
