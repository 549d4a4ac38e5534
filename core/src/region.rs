use serde::Serialize;

// ── Which region a philosopher belongs to ──────────────────────────

/// The closed set of regions the atlas knows how to colour and name.
///
/// The wire tag (`as_tag`) is what appears in the dataset's `region` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Region {
    #[serde(rename = "espana")]
    Espana,
    #[serde(rename = "portugal")]
    Portugal,
    #[serde(rename = "italia")]
    Italia,
    #[serde(rename = "francia")]
    Francia,
    #[serde(rename = "suiza")]
    Suiza,
    #[serde(rename = "belgica")]
    Belgica,
    #[serde(rename = "paises_bajos")]
    PaisesBajos,
    #[serde(rename = "alemania")]
    Alemania,
    #[serde(rename = "austria")]
    Austria,
    #[serde(rename = "república checa")]
    RepublicaCheca,
    #[serde(rename = "polonia")]
    Polonia,
    #[serde(rename = "estonia")]
    Estonia,
    #[serde(rename = "lituania")]
    Lituania,
    #[serde(rename = "rusia")]
    Rusia,
    #[serde(rename = "ucrania")]
    Ucrania,
    #[serde(rename = "rumania")]
    Rumania,
    #[serde(rename = "bielorrusia")]
    Bielorrusia,
    #[serde(rename = "moldavia")]
    Moldavia,
    #[serde(rename = "grecia")]
    Grecia,
    #[serde(rename = "islas_britanicas")]
    IslasBritanicas,
    #[serde(rename = "suecia")]
    Suecia,
    #[serde(rename = "dinamarca")]
    Dinamarca,
    #[serde(rename = "noruega")]
    Noruega,
    #[serde(rename = "finlandia")]
    Finlandia,
    #[serde(rename = "islandia")]
    Islandia,
}

impl Region {
    pub const ALL: [Region; 25] = [
        Self::Espana,
        Self::Portugal,
        Self::Italia,
        Self::Francia,
        Self::Suiza,
        Self::Belgica,
        Self::PaisesBajos,
        Self::Alemania,
        Self::Austria,
        Self::RepublicaCheca,
        Self::Polonia,
        Self::Estonia,
        Self::Lituania,
        Self::Rusia,
        Self::Ucrania,
        Self::Rumania,
        Self::Bielorrusia,
        Self::Moldavia,
        Self::Grecia,
        Self::IslasBritanicas,
        Self::Suecia,
        Self::Dinamarca,
        Self::Noruega,
        Self::Finlandia,
        Self::Islandia,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_tag() == tag)
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Espana => "espana",
            Self::Portugal => "portugal",
            Self::Italia => "italia",
            Self::Francia => "francia",
            Self::Suiza => "suiza",
            Self::Belgica => "belgica",
            Self::PaisesBajos => "paises_bajos",
            Self::Alemania => "alemania",
            Self::Austria => "austria",
            Self::RepublicaCheca => "república checa",
            Self::Polonia => "polonia",
            Self::Estonia => "estonia",
            Self::Lituania => "lituania",
            Self::Rusia => "rusia",
            Self::Ucrania => "ucrania",
            Self::Rumania => "rumania",
            Self::Bielorrusia => "bielorrusia",
            Self::Moldavia => "moldavia",
            Self::Grecia => "grecia",
            Self::IslasBritanicas => "islas_britanicas",
            Self::Suecia => "suecia",
            Self::Dinamarca => "dinamarca",
            Self::Noruega => "noruega",
            Self::Finlandia => "finlandia",
            Self::Islandia => "islandia",
        }
    }

    /// Spanish display name, as shown on filter buttons and in the legend.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Espana => "España",
            Self::Portugal => "Portugal",
            Self::Italia => "Italia",
            Self::Francia => "Francia",
            Self::Suiza => "Suiza",
            Self::Belgica => "Bélgica",
            Self::PaisesBajos => "Países Bajos",
            Self::Alemania => "Alemania",
            Self::Austria => "Austria",
            Self::RepublicaCheca => "República Checa",
            Self::Polonia => "Polonia",
            Self::Estonia => "Estonia",
            Self::Lituania => "Lituania",
            Self::Rusia => "Rusia",
            Self::Ucrania => "Ucrania",
            Self::Rumania => "Rumanía",
            Self::Bielorrusia => "Bielorrusia",
            Self::Moldavia => "Moldavia",
            Self::Grecia => "Grecia",
            Self::IslasBritanicas => "Islas Británicas",
            Self::Suecia => "Suecia",
            Self::Dinamarca => "Dinamarca",
            Self::Noruega => "Noruega",
            Self::Finlandia => "Finlandia",
            Self::Islandia => "Islandia",
        }
    }

    /// Marker colour. Several regions share a colour; markers are told apart
    /// by position, not hue.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Espana | Self::IslasBritanicas => "#3498db",
            Self::Portugal | Self::Noruega => "#2ecc71",
            Self::Italia | Self::Dinamarca => "#e74c3c",
            Self::Francia | Self::Suecia | Self::Islandia => "#9b59b6",
            Self::Suiza | Self::Ucrania => "#f1c40f",
            Self::Belgica | Self::Rumania => "#e67e22",
            Self::PaisesBajos | Self::Grecia => "#1abc9c",
            Self::Alemania => "#7f8c8d",
            Self::Austria => "#d35400",
            Self::RepublicaCheca => "#27ae60",
            Self::Polonia => "#c0392b",
            Self::Estonia => "#2980b9",
            Self::Lituania => "#8e44ad",
            Self::Rusia => "#16a085",
            Self::Bielorrusia => "#95a5a6",
            Self::Moldavia | Self::Finlandia => "#34495e",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}
