//! Ordenación de vuelos según los pesos de preferencia del usuario.
//!
//! Cada vuelo recibe cuatro sub-puntuaciones en escala 0–100 relativas al
//! conjunto candidato (salvo confort, que es absoluto) y la puntuación final
//! es su suma ponderada. La ordenación es estable.

use crate::{
    models::{Flight, PreferenceWeights},
    preferences,
};

/// Los cuatro campos que el ranking necesita de un candidato.
pub trait Rankable {
    fn price(&self) -> f64;
    fn duration_minutes(&self) -> f64;
    fn stops(&self) -> u32;
    fn rating(&self) -> f64;
}

impl Rankable for Flight {
    fn price(&self) -> f64 {
        self.price
    }

    fn duration_minutes(&self) -> f64 {
        f64::from(self.duration_minutes)
    }

    fn stops(&self) -> u32 {
        self.stops
    }

    fn rating(&self) -> f64 {
        self.rating
    }
}

/// Ordena los vuelos según las preferencias expresadas en el mensaje.
pub fn rank_flights(flights: Vec<Flight>, utterance: &str) -> Vec<Flight> {
    rank(flights, &preferences::analyze(utterance))
}

/// Ordena de mayor a menor puntuación; los empates conservan el orden de entrada.
///
/// Se asume un conjunto no vacío y bien formado.
pub fn rank<T: Rankable>(items: Vec<T>, weights: &PreferenceWeights) -> Vec<T> {
    let scores = scores(&items, weights);
    let mut scored: Vec<(f64, T)> = scores.into_iter().zip(items).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Puntuación ponderada de cada candidato, en el orden de entrada.
pub fn scores<T: Rankable>(items: &[T], weights: &PreferenceWeights) -> Vec<f64> {
    let max_price = items.iter().map(Rankable::price).fold(0.0, f64::max);
    let max_duration = items.iter().map(Rankable::duration_minutes).fold(0.0, f64::max);
    let max_stops = items.iter().map(Rankable::stops).max().unwrap_or(0);

    items
        .iter()
        .map(|item| {
            let price = relative_score(item.price(), max_price);
            let speed = relative_score(item.duration_minutes(), max_duration);
            let comfort = item.rating() * 20.0;
            let convenience = if item.stops() == 0 || max_stops == 0 {
                100.0
            } else {
                relative_score(f64::from(item.stops()), f64::from(max_stops))
            };

            price * f64::from(weights.price)
                + speed * f64::from(weights.speed)
                + comfort * f64::from(weights.comfort)
                + convenience * f64::from(weights.convenience)
        })
        .collect()
}

/// `(max - value) / max * 100`, o 0 si el máximo es 0.
fn relative_score(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (max - value) / max * 100.0
    } else {
        0.0
    }
}
