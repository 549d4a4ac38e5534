use leptos::prelude::*;

use crate::types::{Coordinate, EntryId, MapConfig, MapWidget, StyleHint};

pub const WIDTH: f64 = 1000.0;
pub const HEIGHT: f64 = 700.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub key: u32,
    pub coordinate: Coordinate,
    pub style: StyleHint,
}

/// Equirectangular projection of `c` into the `WIDTH`×`HEIGHT` canvas
/// spanned by `bounds` (south-west, north-east).
pub fn project(c: Coordinate, bounds: (Coordinate, Coordinate)) -> (f64, f64) {
    let (sw, ne) = bounds;
    let x = (c.lng - sw.lng) / (ne.lng - sw.lng) * WIDTH;
    let y = (ne.lat - c.lat) / (ne.lat - sw.lat) * HEIGHT;
    (x, y)
}

/// SVG "map": the point list and the viewport are signals the view reads.
///
/// Owned by the atlas, which is the only writer; [`MapView`] gets read-only
/// halves of the signals.
#[derive(Debug)]
pub struct SvgMap {
    points: RwSignal<Vec<MapPoint>>,
    viewport: RwSignal<(Coordinate, u8)>,
    next_key: u32,
}

impl SvgMap {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            points: RwSignal::new(Vec::new()),
            viewport: RwSignal::new((config.center, config.zoom)),
            next_key: 0,
        }
    }

    pub fn points(&self) -> ReadSignal<Vec<MapPoint>> {
        self.points.read_only()
    }

    pub fn viewport(&self) -> ReadSignal<(Coordinate, u8)> {
        self.viewport.read_only()
    }
}

impl MapWidget for SvgMap {
    type Handle = u32;

    fn add_point(&mut self, coordinate: Coordinate, style: StyleHint) -> u32 {
        let key = self.next_key;
        self.next_key += 1;
        self.points.update(|pts| {
            pts.push(MapPoint {
                key,
                coordinate,
                style,
            })
        });
        key
    }

    fn remove_point(&mut self, handle: u32) {
        self.points.update(|pts| pts.retain(|p| p.key != handle));
    }

    fn pan_zoom_to(&mut self, coordinate: Coordinate, zoom: u8) {
        self.viewport.set((coordinate, zoom));
    }

    fn is_point_visible(&self, handle: &u32) -> bool {
        self.points
            .with_untracked(|pts| pts.iter().any(|p| p.key == *handle))
    }
}

#[component]
pub fn MapView(
    points: ReadSignal<Vec<MapPoint>>,
    viewport: ReadSignal<(Coordinate, u8)>,
    config: MapConfig,
    #[prop(into)] selected: Signal<Option<EntryId>>,
    on_select: Callback<EntryId>,
) -> impl IntoView {
    let transform = move || {
        let (center, zoom) = viewport.get();
        let scale = 2f64.powi(i32::from(zoom) - i32::from(config.zoom)).max(1.0);
        let (cx, cy) = project(center, config.bounds);
        format!(
            "translate({} {}) scale({scale}) translate({} {})",
            WIDTH / 2.0,
            HEIGHT / 2.0,
            -cx,
            -cy
        )
    };

    view! {
        <svg class="atlas-map" viewBox=format!("0 0 {WIDTH} {HEIGHT}")>
            <rect width=WIDTH height=HEIGHT fill="#eaf2f8"/>
            <g transform=transform>
                {move || points.get().into_iter().map(|p| {
                    let (x, y) = project(p.coordinate, config.bounds);
                    let id = p.style.id;
                    let is_selected = selected.get() == Some(id);
                    view! {
                        <circle
                            cx=x
                            cy=y
                            r=if is_selected { 9 } else { 6 }
                            fill=p.style.color.clone()
                            stroke=if is_selected { "#ffeb3b" } else { "white" }
                            stroke-width="2"
                            style="cursor:pointer"
                            on:click=move |_| on_select.run(id)
                        >
                            <title>{p.style.label.clone()}</title>
                        </circle>
                    }
                }).collect_view()}
            </g>
        </svg>
    }
}
