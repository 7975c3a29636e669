//! Modelos de dominio (consulta interpretada, pesos de preferencia, vuelos y
//! aeropuertos) y los payloads intercambiados con el proveedor.

use serde::{Deserialize, Serialize};

/// Resultado del parser de lenguaje natural.
///
/// Los códigos vacíos indican que la ciudad no se pudo resolver; es el
/// llamador quien decide si rechaza la consulta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    pub origin_code: String,
    pub destination_code: String,
    /// Fecha ISO `YYYY-MM-DD`, siempre presente.
    pub departure_date: String,
    pub max_price: Option<u32>,
}

impl ParsedQuery {
    /// Ambos códigos tienen al menos 3 caracteres.
    pub fn has_route(&self) -> bool {
        self.origin_code.len() >= 3 && self.destination_code.len() >= 3
    }
}

/// Puntuaciones aditivas de intención extraídas de un mensaje.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    pub price: u32,
    pub speed: u32,
    pub comfort: u32,
    pub convenience: u32,
}

/// Vuelo ya transformado desde la oferta del proveedor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub airline_code: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_date: String,
    pub arrival_date: String,
    /// Duración legible, p. ej. `7h 10m`.
    pub duration: String,
    pub duration_minutes: u32,
    pub price: f64,
    pub currency: String,
    pub stops: u32,
    pub rating: f64,
    pub aircraft: String,
    pub booking_token: String,
    pub is_real_data: bool,
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

/// Aeropuerto o ciudad devuelto por la búsqueda de localizaciones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Parámetros de búsqueda enviados al proveedor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub origin_location_code: String,
    #[serde(default)]
    pub destination_location_code: String,
    #[serde(default)]
    pub departure_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
}

impl SearchRequest {
    /// Construye la petición a partir de una consulta interpretada.
    pub fn from_query(query: &ParsedQuery, max: u32) -> Self {
        Self {
            origin_location_code: query.origin_code.clone(),
            destination_location_code: query.destination_code.clone(),
            departure_date: query.departure_date.clone(),
            return_date: None,
            adults: Some(1),
            max: Some(max),
            max_price: query.max_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub flights: Vec<Flight>,
    pub total_found: usize,
    pub filtered_count: usize,
}
