use std::io::{BufRead, Write};

use atlas_core::{Atlas, DetailPanel, EntryId, MapWidget, Outcome, Selection};

use crate::terminal::format_row;

/// One line typed into `browse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Help,
    Region(String),
    Era(String),
    Search(String),
    ClearSearch,
    Reset,
    Select(u32),
    Focus(u32),
    Unselect,
    List,
    Regions,
    Eras,
    Quit,
}

pub const HELP: &str = "\
Comandos:
  region <etiqueta|all>   filtrar por región
  era <etiqueta>          activar/desactivar una época
  search <texto>          buscar (vacío = sin búsqueda)
  clear                   borrar la búsqueda
  reset                   quitar todos los filtros
  select <id>             seleccionar un filósofo
  focus <id>              centrar el mapa sin seleccionar
  unselect                quitar la selección
  list                    listar los visibles
  regions | eras          ver regiones o épocas disponibles
  quit                    salir";

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let id = |rest: &str| {
            rest.parse::<u32>()
                .map_err(|_| format!("`{word}` necesita un id numérico, no {rest:?}"))
        };
        match word {
            "help" | "?" => Ok(Self::Help),
            "region" if !rest.is_empty() => Ok(Self::Region(rest.to_string())),
            "era" if !rest.is_empty() => Ok(Self::Era(rest.to_string())),
            "search" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::ClearSearch),
            "reset" => Ok(Self::Reset),
            "select" => id(rest).map(Self::Select),
            "focus" => id(rest).map(Self::Focus),
            "unselect" => Ok(Self::Unselect),
            "list" | "ls" => Ok(Self::List),
            "regions" => Ok(Self::Regions),
            "eras" => Ok(Self::Eras),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "region" | "era" => Err(format!("`{word}` necesita un argumento")),
            other => Err(format!("comando desconocido: {other:?} (prueba `help`)")),
        }
    }
}

fn describe(outcome: Outcome, visible: usize) -> String {
    match outcome {
        Outcome::EmptyResultSet => "Ningún filósofo coincide con los filtros.".to_string(),
        Outcome::SingleMatch(id) => format!("Un único resultado; seleccionado {id}."),
        Outcome::Listed => format!("{visible} filósofos visibles."),
    }
}

/// Read commands from `input` until EOF or `quit`, applying each to `atlas`.
pub fn run<M, P, R, W>(atlas: &mut Atlas<M, P>, input: R, out: &mut W) -> std::io::Result<()>
where
    M: MapWidget,
    P: DetailPanel,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match BrowseCommand::parse(&line) {
            Ok(c) => c,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };
        let outcome = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                writeln!(out, "{HELP}")?;
                None
            }
            BrowseCommand::Region(tag) => {
                let outcome = atlas.set_region_tag(&tag);
                if outcome.is_none() {
                    writeln!(out, "Región desconocida: {tag:?}")?;
                }
                outcome
            }
            BrowseCommand::Era(tag) => Some(atlas.toggle_era_tag(&tag)),
            BrowseCommand::Search(text) => Some(atlas.set_search_text(&text)),
            BrowseCommand::ClearSearch => Some(atlas.clear_search()),
            BrowseCommand::Reset => Some(atlas.reset_filters()),
            BrowseCommand::Select(id) => {
                if atlas.select(EntryId(id)) != Selection::Selected(EntryId(id)) {
                    writeln!(out, "No se puede seleccionar {id}.")?;
                }
                None
            }
            BrowseCommand::Focus(id) => {
                if !atlas.focus(EntryId(id)) {
                    writeln!(out, "No existe el filósofo {id}.")?;
                }
                None
            }
            BrowseCommand::Unselect => {
                atlas.clear_selection();
                None
            }
            BrowseCommand::List => {
                for entry in atlas.visible_entries() {
                    writeln!(out, "{}", format_row(entry))?;
                }
                None
            }
            BrowseCommand::Regions => {
                for item in atlas.legend() {
                    writeln!(out, "{:<18} {:>4}  ({})", item.label, item.count, item.region)?;
                }
                None
            }
            BrowseCommand::Eras => {
                for era in atlas.era_tags() {
                    writeln!(out, "{era}")?;
                }
                None
            }
        };
        if let Some(outcome) = outcome {
            writeln!(out, "{}", describe(outcome, atlas.visible_count()))?;
        }
    }
    Ok(())
}
