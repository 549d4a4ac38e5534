use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_query_map};

use crate::map::{MapView, SvgMap};
use crate::panel::{DetailModal, DetailView, PanelState};
use crate::types::{
    Atlas, DatasetStore, EntryId, LegendItem, MapConfig, Outcome, RegionFilter, SHARE_PARAM,
    Selection, WebAtlas, parse_share_param,
};

const DATA_URL: &str = "/data/filosofos.json";

async fn fetch_dataset() -> Result<serde_json::Value, String> {
    let resp = gloo_net::http::Request::get(DATA_URL)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<serde_json::Value>()
        .await
        .map_err(|e| e.to_string())
}

/// The real dataset if it can be fetched and validated, else the sample.
async fn load_store() -> DatasetStore {
    match fetch_dataset().await {
        Ok(value) => DatasetStore::from_value(value).unwrap_or_else(|e| {
            warn!("dataset rejected ({e}); using built-in sample");
            DatasetStore::sample()
        }),
        Err(e) => {
            warn!("cannot fetch {DATA_URL}: {e}; using built-in sample");
            DatasetStore::sample()
        }
    }
}

/// Apply what arrived before the dataset did: text typed into the search box
/// while loading, then the `?philosopher=` deep link.
fn replay_pending(atlas: &mut WebAtlas, typed: &str, deep_link: Option<EntryId>) {
    if !typed.trim().is_empty() {
        atlas.set_search_text(typed);
    }
    if let Some(id) = deep_link {
        if atlas.select(id) != Selection::Selected(id) {
            warn!("shared link points at entry {id}, which cannot be shown");
        }
    }
}

/// Shared access to the page's atlas, which exists only once the dataset
/// has loaded. `revision` is bumped after every mutation so reactive views
/// re-read the atlas.
#[derive(Clone, Copy)]
struct AtlasHandle {
    atlas: StoredValue<Option<WebAtlas>>,
    revision: RwSignal<u64>,
}

impl AtlasHandle {
    fn new() -> Self {
        Self {
            atlas: StoredValue::new(None),
            revision: RwSignal::new(0),
        }
    }

    fn install(self, mut atlas: WebAtlas, typed: &str, deep_link: Option<EntryId>) {
        replay_pending(&mut atlas, typed, deep_link);
        self.atlas.set_value(Some(atlas));
        self.revision.update(|r| *r += 1);
    }

    fn act(self, f: impl FnOnce(&mut WebAtlas)) {
        self.atlas.update_value(|a| {
            if let Some(a) = a {
                f(a);
            }
        });
        self.revision.update(|r| *r += 1);
    }

    /// Tracked read; `None` until the dataset has loaded.
    fn query<T>(self, f: impl FnOnce(&WebAtlas) -> T) -> Option<T> {
        self.revision.track();
        self.atlas.with_value(|a| a.as_ref().map(f))
    }
}

#[component]
pub fn AtlasPage() -> impl IntoView {
    let config = MapConfig::default();
    let map = SvgMap::new(&config);
    let (points, viewport) = (map.points(), map.viewport());
    let panel = PanelState::new();
    let handle = AtlasHandle::new();
    let search_input = RwSignal::new(String::new());

    let location = use_location();
    let page = Signal::derive(move || location.pathname.get());
    let deep_link = use_query_map()
        .with_untracked(|q| q.get(SHARE_PARAM))
        .and_then(|v| parse_share_param(&v));

    spawn_local(async move {
        let store = load_store().await;
        let atlas = Atlas::new(store, map, panel, config);
        handle.install(atlas, &search_input.get_untracked(), deep_link);
    });

    let selected = Signal::derive(move || handle.query(|a| a.selection().id()).flatten());
    let on_select = Callback::new(move |id: EntryId| {
        handle.act(|a| {
            if a.select(id) != Selection::Selected(id) {
                warn!("entry {id} is not selectable right now");
            }
        })
    });
    let on_focus = Callback::new(move |id: EntryId| {
        handle.act(|a| {
            a.focus(id);
        })
    });

    let region_buttons = move || {
        let (legend, total, active) = handle
            .query(|a| (a.legend(), a.store().len(), a.filter().region()))
            .unwrap_or_default();
        let mut buttons = vec![(RegionFilter::All, "Todos".to_string(), total, "#555".to_string())];
        buttons.extend(legend.into_iter().map(|item: LegendItem| {
            (
                RegionFilter::Only(item.region),
                item.label.to_string(),
                item.count,
                item.color.to_string(),
            )
        }));
        buttons
            .into_iter()
            .map(|(filter, label, count, color)| {
                let class = if filter == active { "region-btn active" } else { "region-btn" };
                view! {
                    <button
                        class=class
                        style=format!("border-color:{color};")
                        on:click=move |_| handle.act(|a| {
                            a.set_region(filter);
                        })
                    >
                        {label}
                        <span class="count">{count}</span>
                    </button>
                }
            })
            .collect_view()
    };

    let era_buttons = move || {
        let eras: Vec<(String, bool)> = handle
            .query(|a| {
                a.era_tags()
                    .into_iter()
                    .map(|t| (t.to_string(), a.filter().active_era_tags().contains(t)))
                    .collect()
            })
            .unwrap_or_default();
        eras.into_iter()
            .map(|(era, active)| {
                let tag = era.clone();
                view! {
                    <button
                        class=if active { "era-btn active" } else { "era-btn" }
                        title=format!("Filtrar por: {era}")
                        on:click=move |_| handle.act(|a| {
                            a.toggle_era_tag(&tag);
                        })
                    >
                        {era.clone()}
                    </button>
                }
            })
            .collect_view()
    };

    let legend = move || {
        handle
            .query(|a| a.legend())
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                view! {
                    <div class="legend-item">
                        <span class="legend-color" style=format!("background-color:{};", item.color)></span>
                        <span class="legend-text">{format!("{} ({})", item.label, item.count)}</span>
                    </div>
                }
            })
            .collect_view()
    };

    let summary = move || {
        handle.query(|a| {
            let stats = a.stats();
            let centuries = match stats.century_range {
                Some((lo, hi)) => format!("{lo} - {hi}"),
                None => "N/A".to_string(),
            };
            let shown = match a.outcome() {
                Outcome::EmptyResultSet => "ninguno".to_string(),
                _ => a.visible_count().to_string(),
            };
            format!(
                "{} filósofos · {} regiones · siglos {} · visibles: {}",
                stats.total, stats.regions, centuries, shown
            )
        })
    };

    view! {
        <div class="atlas">
            {move || match summary() {
                None => view! { <p class="loading">"Cargando datos…"</p> }.into_any(),
                Some(s) => view! { <p class="stats">{s}</p> }.into_any(),
            }}
            <div class="filters">
                <div id="region-filter">{region_buttons}</div>
                <div id="era-filter">{era_buttons}</div>
                <div class="search-row">
                    <input
                        type="text"
                        placeholder="Buscar filósofo, obra, concepto…"
                        prop:value=search_input
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            search_input.set(text.clone());
                            handle.act(|a| {
                                a.set_search_text(&text);
                            });
                        }
                    />
                    <button
                        type="button"
                        style="background:#aaa;"
                        on:click=move |_| {
                            search_input.set(String::new());
                            handle.act(|a| {
                                a.clear_search();
                            });
                        }
                    >
                        "Limpiar"
                    </button>
                </div>
            </div>
            <div class="atlas-body">
                <div class="map-column">
                    <MapView
                        points=points
                        viewport=viewport
                        config=config
                        selected=selected
                        on_select=on_select
                    />
                    <div id="legend">{legend}</div>
                </div>
                <aside id="philosopher-details">
                    <DetailView panel=panel on_select=on_select on_focus=on_focus/>
                </aside>
            </div>
            <DetailModal panel=panel on_focus=on_focus page=page/>
        </div>
    }
}
