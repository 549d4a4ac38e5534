use leptos::prelude::*;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="card">
            <h2>"Fuentes y metodología"</h2>
            <p>
                "Cada filósofo se sitúa en su región histórica (no en el concepto moderno de "
                "\"nación\") y en la ciudad con la que se le asocia con más fuerza."
            </p>
            <p>
                "Todos los filósofos incluidos cumplen el criterio de haber producido obras "
                "filosóficas significativas confirmadas por consenso académico."
            </p>
            <h3>"Cómo usar el atlas"</h3>
            <ul>
                <li>"Filtra por región con los botones superiores."</li>
                <li>"Activa una o varias épocas; basta con que coincida una."</li>
                <li>"Busca por nombre, obra, concepto o ciudad. Si sólo hay un resultado, se abre directamente."</li>
                <li>"Pulsa un punto del mapa para ver la ficha del filósofo."</li>
            </ul>
        </div>
    }
}
