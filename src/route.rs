//! Extracción de origen y destino a partir del mensaje del usuario.
//!
//! Los patrones van del más específico ("flights from X to Y" seguido de un
//! precio, fecha o palabra de corte) al más permisivo ("X to Y"). El primero
//! que deja dos frases limpias de al menos 2 caracteres gana.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::lexicon;

/// Códigos resueltos; vacío si la ciudad no está en el léxico.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

const PLACE: &str = r"[a-z\s,.'’-]";
const TERMINATOR: &str = r"(?:\s+(?:for|under|less|below|max|on|in|\$|\d|july|june|may|april|march|february|january|aug|sep|oct|nov|dec))";

static ROUTE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let patterns = [
        format!(r"flights?\s+from\s+({PLACE}+?)\s+to\s+({PLACE}+?){TERMINATOR}"),
        format!(r"from\s+({PLACE}+?)\s+to\s+({PLACE}+?){TERMINATOR}"),
        format!(r"^({PLACE}+?)\s+to\s+({PLACE}+?){TERMINATOR}"),
        format!(r"flights?\s+from\s+({PLACE}{{2,}})\s+to\s+({PLACE}{{2,}})"),
        format!(r"from\s+({PLACE}{{2,}})\s+to\s+({PLACE}{{2,}})"),
        format!(r"^({PLACE}{{2,}})\s+to\s+({PLACE}{{2,}})"),
    ];
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("regex de ruta válida"))
        .collect()
});

static STOP_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(flights?|fly|get|go|travel|need|want|show|find|search|cheap|tickets?)\b")
        .expect("regex válida")
});

static TRAILING_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,.'’-]+$").expect("regex válida"));

/// Extrae y resuelve la ruta. Nunca falla: una ciudad desconocida produce un
/// código vacío que el llamador debe tratar.
pub fn extract_route(text: &str) -> Route {
    let lower = text.to_lowercase();

    let Some((origin, destination)) = find_places(&lower) else {
        debug!("No se encontró una ruta en: \"{text}\"");
        return Route::default();
    };

    debug!("Ruta encontrada: \"{origin}\" → \"{destination}\"");
    Route {
        origin: lexicon::lookup(&origin).to_string(),
        destination: lexicon::lookup(&destination).to_string(),
    }
}

/// Frases de origen y destino ya limpias, sin resolver.
pub fn find_places(lower: &str) -> Option<(String, String)> {
    ROUTE_REGEXES.iter().find_map(|re| {
        let caps = re.captures(lower)?;
        let origin = clean_place(caps.get(1)?.as_str());
        let destination = clean_place(caps.get(2)?.as_str());
        (origin.len() >= 2 && destination.len() >= 2).then_some((origin, destination))
    })
}

/// Quita palabras vacías y puntuación final, y colapsa espacios.
fn clean_place(raw: &str) -> String {
    let without_stop_words = STOP_WORDS.replace_all(raw, "");
    let collapsed = without_stop_words
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    TRAILING_PUNCTUATION
        .replace(&collapsed, "")
        .trim()
        .to_string()
}
