//! Extracción del presupuesto máximo ("under $400", "300 dollars max", ...).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Formulaciones en orden de prioridad; gana la primera que coincide.
const BUDGET_PATTERNS: &[&str] = &[
    r"under\s*\$?(\d+)",
    r"less\s*than\s*\$?(\d+)",
    r"below\s*\$?(\d+)",
    r"max\s*\$?(\d+)",
    r"maximum\s*\$?(\d+)",
    r"budget\s*\$?(\d+)",
    r"for\s*\$?(\d+)",
    r"\$(\d+)\s*or\s*less",
    r"\$(\d+)\s*max",
    r"(\d+)\s*dollars?\s*max",
    r"(\d+)\s*dollars?\s*or\s*less",
    r"under\s+(\d+)",
    r"for\s+under\s+(\d+)",
    r"within\s*\$?(\d+)",
    r"up\s*to\s*\$?(\d+)",
    r"no\s*more\s*than\s*\$?(\d+)",
    r"cheaper\s*than\s*\$?(\d+)",
];

static BUDGET_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    BUDGET_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("regex de presupuesto válida"))
        .collect()
});

/// Devuelve el importe capturado por el primer patrón que coincide, o `None`.
///
/// No se valida que el importe sea razonable; un número que no cabe en `u32`
/// se descarta y se sigue con el siguiente patrón.
pub fn extract_budget(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    BUDGET_REGEXES.iter().find_map(|re| {
        let amount = re.captures(&lower)?.get(1)?.as_str().parse::<u32>().ok()?;
        debug!("Presupuesto encontrado: ${amount} (patrón {})", re.as_str());
        Some(amount)
    })
}
