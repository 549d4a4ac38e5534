use std::io::Write;

use atlas_core::{Coordinate, DetailPanel, Entry, MapWidget, StyleHint};

// ═══════════════════════════════════════════════════════════════════════
//  TEXT MAP: keeps the point list and viewport in memory
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Point {
    pub coordinate: Coordinate,
    pub style: StyleHint,
}

/// A map with no pixels: points live in slots, the viewport is just a
/// coordinate and a zoom level.
#[derive(Debug, Default)]
pub struct TextMap {
    slots: Vec<Option<Point>>,
    pub viewport: Option<(Coordinate, u8)>,
}

impl TextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points currently on the map, in slot order.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.slots.iter().flatten()
    }
}

impl MapWidget for TextMap {
    type Handle = usize;

    fn add_point(&mut self, coordinate: Coordinate, style: StyleHint) -> usize {
        let point = Some(Point { coordinate, style });
        match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = point;
                free
            }
            None => {
                self.slots.push(point);
                self.slots.len() - 1
            }
        }
    }

    fn remove_point(&mut self, handle: usize) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = None;
        }
    }

    fn pan_zoom_to(&mut self, coordinate: Coordinate, zoom: u8) {
        tracing::debug!("viewport → ({}, {}) z{}", coordinate.lat, coordinate.lng, zoom);
        self.viewport = Some((coordinate, zoom));
    }

    fn is_point_visible(&self, handle: &usize) -> bool {
        matches!(self.slots.get(*handle), Some(Some(_)))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  TERMINAL PANEL: prints the detail view
// ═══════════════════════════════════════════════════════════════════════

pub struct TerminalPanel<W: Write> {
    out: W,
    /// Skip the intro text (one-shot commands)
    pub quiet_intro: bool,
}

impl<W: Write> TerminalPanel<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            quiet_intro: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::error!("cannot write to terminal: {e}");
        }
    }
}

pub const INTRO: &str = "\
Atlas filosófico europeo
Una selección de filósofos europeos más allá de las figuras canónicas.
Cada punto del mapa representa un pensador con obras documentadas.
Escribe `help` para ver los comandos.";

/// Multi-line detail card for one entry.
pub fn format_entry(entry: &Entry) -> String {
    let mut lines = vec![format!("[{}] {}", entry.id, entry.display_name())];
    lines.push(format!("  Región:    {}", entry.region_label()));
    if let Some(era) = &entry.era_tag {
        lines.push(format!("  Época:     {era}"));
    }
    if let Some(range) = &entry.era_range {
        lines.push(format!("  Vida:      {range}"));
    }
    if let Some(city) = &entry.city {
        lines.push(format!("  Ciudad:    {city}"));
    }
    if let Some(area) = &entry.area {
        lines.push(format!("  Área:      {area}"));
    }
    if let Some(concepts) = &entry.concepts {
        lines.push(format!("  Conceptos: {concepts}"));
    }
    if entry.works.is_empty() {
        lines.push("  Obras:     no especificadas".to_string());
    } else {
        lines.push("  Obras:".to_string());
        for work in &entry.works {
            lines.push(format!("    - {work}"));
        }
    }
    lines.push(format!(
        "  Ubicación: ({:.4}, {:.4})",
        entry.coordinate.lat, entry.coordinate.lng
    ));
    lines.join("\n")
}

/// One-line summary used in result lists.
pub fn format_row(entry: &Entry) -> String {
    format!(
        "{:>4}  {:<40}  {:<16}  {}",
        entry.id.to_string(),
        entry.display_name(),
        entry.region.display_name(),
        entry.era_range.as_deref().unwrap_or("")
    )
}

impl<W: Write> DetailPanel for TerminalPanel<W> {
    fn show_entry(&mut self, entry: &Entry) {
        let card = format_entry(entry);
        self.emit(&card);
    }

    fn show_intro(&mut self) {
        if !self.quiet_intro {
            self.emit(INTRO);
        }
    }

    fn show_results(&mut self, search: &str, entries: &[&Entry]) {
        self.emit(&format!("{} resultados para «{search}»:", entries.len()));
        for entry in entries {
            let row = format_row(entry);
            self.emit(&row);
        }
    }

    fn show_no_results(&mut self, search: &str) {
        self.emit(&format!(
            "No se encontraron resultados para «{search}». Prueba con otro nombre, obra o concepto."
        ));
    }
}
