use leptos::prelude::*;

use crate::types::{DetailPanel, Entry, EntryId, share_link, share_text};

/// A row in the search-results list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub id: EntryId,
    pub name: String,
    pub color: String,
    pub area: String,
}

#[derive(Debug, Clone)]
pub enum PanelView {
    Intro,
    Entry(Box<Entry>),
    Results { search: String, rows: Vec<ResultRow> },
    NoResults(String),
}

/// Side panel whose content is a signal the view renders, plus the
/// full-screen detail view opened from it.
#[derive(Debug, Clone, Copy)]
pub struct PanelState {
    pub view: RwSignal<PanelView>,
    /// Entry shown in the expanded detail view, if open
    pub expanded: RwSignal<Option<Box<Entry>>>,
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            view: RwSignal::new(PanelView::Intro),
            expanded: RwSignal::new(None),
        }
    }

    pub fn open_expanded(&self, entry: Entry) {
        self.expanded.set(Some(Box::new(entry)));
    }

    pub fn close_expanded(&self) {
        self.expanded.set(None);
    }
}

impl DetailPanel for PanelState {
    fn show_entry(&mut self, entry: &Entry) {
        self.view.set(PanelView::Entry(Box::new(entry.clone())));
    }

    fn show_intro(&mut self) {
        self.view.set(PanelView::Intro);
        self.close_expanded();
    }

    fn show_results(&mut self, search: &str, entries: &[&Entry]) {
        let rows = entries
            .iter()
            .map(|e| ResultRow {
                id: e.id,
                name: e.display_name(),
                color: e.marker_color().to_string(),
                area: e.area.clone().unwrap_or_default(),
            })
            .collect();
        self.view.set(PanelView::Results {
            search: search.to_string(),
            rows,
        });
    }

    fn show_no_results(&mut self, search: &str) {
        self.view.set(PanelView::NoResults(search.to_string()));
    }
}

#[component]
pub fn DetailView(
    panel: PanelState,
    on_select: Callback<EntryId>,
    on_focus: Callback<EntryId>,
) -> impl IntoView {
    move || match panel.view.get() {
        PanelView::Intro => view! {
            <div class="card intro">
                <h3>"Atlas filosófico europeo"</h3>
                <p>
                    "Este mapa interactivo presenta una selección rigurosa de filósofos europeos "
                    "más allá de las figuras canónicas más difundidas. Cada marcador representa "
                    "un pensador con contribuciones documentadas y verificadas."
                </p>
                <ul class="instructions">
                    <li>"Haz clic en cualquier marcador del mapa para ver detalles."</li>
                    <li>"Filtra por región o época usando los botones."</li>
                    <li>"Busca términos específicos en la barra de búsqueda."</li>
                    <li>"Haz clic en el nombre de un filósofo para centrar el mapa."</li>
                </ul>
            </div>
        }
        .into_any(),
        PanelView::NoResults(search) => view! {
            <div class="card">
                <p class="empty">"No se encontraron resultados para «" {search} "»."</p>
                <p style="color:#7a6e5f;font-size:0.9rem;">
                    "Prueba con un nombre, una obra, un concepto o una ciudad."
                </p>
            </div>
        }
        .into_any(),
        PanelView::Results { search, rows } => {
            let count = rows.len();
            view! {
                <div class="card">
                    <p style="color:#7a6e5f;font-size:0.88rem;">
                        <strong>{count}</strong> " resultados para «" {search} "»"
                    </p>
                    <ul class="result-list">
                        {rows.into_iter().map(|row| {
                            let id = row.id;
                            view! {
                                <li
                                    style=format!("border-left:4px solid {};cursor:pointer;", row.color)
                                    on:click=move |_| on_select.run(id)
                                >
                                    <strong>{row.name}</strong>
                                    <div class="result-area">{row.area}</div>
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                </div>
            }
            .into_any()
        }
        PanelView::Entry(entry) => entry_card(*entry, panel, on_focus).into_any(),
    }
}

fn works_or_placeholder(entry: &Entry) -> Vec<String> {
    if entry.works.is_empty() {
        vec!["Obras no especificadas".to_string()]
    } else {
        entry.works.clone()
    }
}

fn entry_card(entry: Entry, panel: PanelState, on_focus: Callback<EntryId>) -> impl IntoView {
    let id = entry.id;
    let color = entry.marker_color().to_string();
    let works = works_or_placeholder(&entry);
    let expand = entry.clone();
    view! {
        <div class="card philosopher">
            <h3
                class="philosopher-name"
                title="Centrar en mapa"
                style=format!("border-bottom:3px solid {color};cursor:pointer;")
                on:click=move |_| on_focus.run(id)
            >
                {entry.display_name()}
            </h3>
            <p class="region" style=format!("color:{color};")>{entry.region_label().to_string()}</p>
            {entry.era_tag.clone().map(|t| view! { <p><strong>"Época: "</strong>{t}</p> })}
            {entry.era_range.clone().map(|r| view! { <p><strong>"Vida: "</strong>{r}</p> })}
            {entry.city.clone().map(|c| view! { <p><strong>"Lugar: "</strong>{c}</p> })}
            {entry.area.clone().map(|a| view! { <p><strong>"Área: "</strong>{a}</p> })}
            {entry.concepts.clone().map(|c| view! { <p><strong>"Conceptos: "</strong>{c}</p> })}
            <h4>"Obras principales"</h4>
            <ul>
                {works.into_iter().map(|w| view! { <li>{w}</li> }).collect_view()}
            </ul>
            <button
                class="view-full-btn"
                on:click=move |_| panel.open_expanded(expand.clone())
            >
                "Ver vista detallada completa"
            </button>
        </div>
    }
}

/// Expanded view of one entry with map focus and a share link.
#[component]
pub fn DetailModal(
    panel: PanelState,
    on_focus: Callback<EntryId>,
    /// Path of the current page, the base of share links
    #[prop(into)]
    page: Signal<String>,
) -> impl IntoView {
    let sharing = RwSignal::new(false);
    move || {
        let Some(entry) = panel.expanded.get() else {
            sharing.set(false);
            return ().into_any();
        };
        let id = entry.id;
        let color = entry.marker_color().to_string();
        let works = works_or_placeholder(&entry);
        let context = format!(
            "{}. {}",
            entry.era_tag.as_deref().unwrap_or("Contexto no especificado"),
            entry.city.as_deref().unwrap_or_default()
        );
        let link = share_link(&page.get(), id);
        let text = share_text(&entry, &link);
        view! {
            <div class="modal-backdrop" on:click=move |_| panel.close_expanded()>
                <div class="modal detailed-view" on:click=|ev| ev.stop_propagation()>
                    <header style=format!("background:linear-gradient(135deg, {color}, {color}99);")>
                        <button class="close" title="Cerrar" on:click=move |_| panel.close_expanded()>
                            "×"
                        </button>
                        <h2>{entry.display_name()}</h2>
                        <p>{entry.era_range.clone().unwrap_or_else(|| "Época no especificada".to_string())}</p>
                        <span class="badge">{entry.region_label().to_string()}</span>
                        <span class="badge">
                            {entry.era_tag.clone().unwrap_or_else(|| "Categoría no especificada".to_string())}
                        </span>
                        <p>{entry.city.clone().unwrap_or_else(|| "Ubicación no especificada".to_string())}</p>
                    </header>
                    <section>
                        <h3>"Área de la filosofía"</h3>
                        <p>{entry.area.clone().unwrap_or_else(|| "No especificada".to_string())}</p>
                    </section>
                    <section>
                        <h3>"Conceptos centrales"</h3>
                        <p>{entry.concepts.clone().unwrap_or_else(|| "No especificados".to_string())}</p>
                    </section>
                    <section>
                        <h3>"Obras principales"</h3>
                        <ul>{works.into_iter().map(|w| view! { <li>{w}</li> }).collect_view()}</ul>
                    </section>
                    <section>
                        <h3>"Contexto histórico"</h3>
                        <p>{context}</p>
                    </section>
                    <div class="modal-actions">
                        <button
                            class="action-btn"
                            on:click=move |_| {
                                panel.close_expanded();
                                on_focus.run(id);
                            }
                        >
                            "Centrar en mapa"
                        </button>
                        <button class="action-btn" on:click=move |_| sharing.update(|s| *s = !*s)>
                            "Compartir"
                        </button>
                    </div>
                    <Show when=move || sharing.get()>
                        <div class="share-box">
                            <a href=link.clone()>{link.clone()}</a>
                            <textarea readonly=true rows="3">{text.clone()}</textarea>
                        </div>
                    </Show>
                </div>
            </div>
        }
        .into_any()
    }
}
