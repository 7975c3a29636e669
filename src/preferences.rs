//! Análisis de preferencias: precio, velocidad, confort y comodidad.
//!
//! Cada familia de palabras clave que aparece en el mensaje suma
//! [`FAMILY_INCREMENT`] a su contador. Una misma palabra puede pertenecer a
//! varias familias ("nonstop" cuenta para velocidad y para comodidad).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::PreferenceWeights;

pub const FAMILY_INCREMENT: u32 = 3;

static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(cheap|cheapest|cheaper|budget|affordable|inexpensive|lowest price|low cost|deals?|save)\b")
        .expect("regex válida")
});
static SPEED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(fast|fastest|quick|quickest|asap|as soon as possible|shortest|nonstop|non-stop|direct)\b")
        .expect("regex válida")
});
static COMFORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(comfort|comfortable|business class|first class|premium|luxury|legroom|best rated|top rated)\b")
        .expect("regex válida")
});
static CONVENIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(nonstop|non-stop|direct|convenient|easy|no layovers?|flexible)\b")
        .expect("regex válida")
});

/// Calcula los pesos de preferencia de un mensaje. Sin normalizar.
pub fn analyze(text: &str) -> PreferenceWeights {
    let lower = text.to_lowercase();
    let score = |family: &Regex| {
        if family.is_match(&lower) {
            FAMILY_INCREMENT
        } else {
            0
        }
    };

    PreferenceWeights {
        price: score(&PRICE),
        speed: score(&SPEED),
        comfort: score(&COMFORT),
        convenience: score(&CONVENIENCE),
    }
}
