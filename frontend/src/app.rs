use leptos::prelude::*;
use leptos_router::{
    components::{A, Route, Router, Routes},
    path,
};

use crate::pages::{about::AboutPage, atlas::AtlasPage};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div id="app">
                <header>
                    <h1>"Atlas filosófico europeo"</h1>
                    <nav>
                        <A href="/">"Mapa"</A>
                        <A href="/about">"Fuentes y metodología"</A>
                    </nav>
                </header>
                <main>
                    <Routes fallback=|| {
                        view! { <p class="error">"Página no encontrada"</p> }
                    }>
                        <Route path=path!("/") view=AtlasPage/>
                        <Route path=path!("/about") view=AboutPage/>
                    </Routes>
                </main>
                <footer>
                    <p>"Filósofos europeos más allá del canon: regiones históricas, no naciones modernas"</p>
                </footer>
            </div>
        </Router>
    }
}
