//! Controlador del chat: interpreta el mensaje, busca vuelos, aplica el
//! presupuesto y ordena el resultado según las preferencias del usuario.
//!
//! Cada llamada es independiente; el contexto de búsqueda viaja en la
//! respuesta en lugar de guardarse entre peticiones.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    amadeus::{FlightProvider, ProviderError},
    config::AppConfig,
    flight_search::{self, SearchError},
    models::{Flight, ParsedQuery, PreferenceWeights, SearchRequest},
    preferences, query_parser, ranking,
};

const USAGE_HINT: &str =
    "Try: \"flights from Chicago to London under $400\" or \"New York to Paris July 28\"";

/// Contexto de la búsqueda asociada a un mensaje.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    #[serde(flatten)]
    pub request: SearchRequest,
    pub user_input: String,
    pub requested_budget: Option<u32>,
}

/// Respuesta del bot a un mensaje.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub id: Uuid,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
    pub flights: Vec<Flight>,
    pub query: ParsedQuery,
    pub preferences: PreferenceWeights,
    pub context: Option<SearchContext>,
}

#[derive(Debug, thiserror::Error)]
enum ChatError {
    #[error("Please specify both origin and destination cities.\n\nExample: \"flights from Chicago to London\"")]
    MissingRoute,
    #[error("Sorry, I do not recognize \"{origin}\" or \"{destination}\".\n\nTry major cities like: Chicago, New York, London, Paris, Tokyo")]
    UnknownCity { origin: String, destination: String },
    #[error("Search timed out. Please try again with a simpler query.")]
    Timeout,
    #[error("Failed to search flights with Amadeus API: {0}")]
    Provider(ProviderError),
    #[error("{0}")]
    InvalidSearch(SearchError),
    #[error("No flights available from {origin} to {destination} on {date}.\n\nTry different dates or cities.")]
    NoFlights {
        origin: String,
        destination: String,
        date: String,
    },
    #[error("No valid flights found in the results")]
    NoValidFlights,
}

impl From<SearchError> for ChatError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Timeout => Self::Timeout,
            SearchError::Provider(e) => Self::Provider(e),
            other => Self::InvalidSearch(other),
        }
    }
}

/// Atiende un mensaje del usuario y construye la respuesta del bot.
pub async fn handle_message(
    provider: &dyn FlightProvider,
    config: &AppConfig,
    utterance: &str,
) -> ChatReply {
    let query = query_parser::parse_query(utterance);
    let weights = preferences::analyze(utterance);
    info!(?query, ?weights, "Mensaje interpretado");

    let mut context = None;
    let (text, flights) = match respond(provider, config, utterance, &query, &mut context).await {
        Ok(answer) => answer,
        Err(err) => {
            error!("Error en la búsqueda: {err}");
            (format!("❌ {err}\n\n{USAGE_HINT}"), Vec::new())
        }
    };

    ChatReply {
        id: Uuid::new_v4(),
        text,
        is_bot: true,
        timestamp: Utc::now(),
        flights,
        query,
        preferences: weights,
        context,
    }
}

async fn respond(
    provider: &dyn FlightProvider,
    config: &AppConfig,
    utterance: &str,
    query: &ParsedQuery,
    context: &mut Option<SearchContext>,
) -> Result<(String, Vec<Flight>), ChatError> {
    if query.origin_code.is_empty() || query.destination_code.is_empty() {
        return Err(ChatError::MissingRoute);
    }
    if !query.has_route() {
        return Err(ChatError::UnknownCity {
            origin: or_placeholder(&query.origin_code, "[origin]"),
            destination: or_placeholder(&query.destination_code, "[destination]"),
        });
    }

    // El presupuesto se aplica aquí para poder informar del vuelo más barato
    // cuando ninguno cabe en él.
    let mut request = SearchRequest::from_query(query, config.max_results);
    request.max_price = None;
    *context = Some(SearchContext {
        request: request.clone(),
        user_input: utterance.to_string(),
        requested_budget: query.max_price,
    });

    let outcome =
        flight_search::search(provider, request, config.max_results, config.search_timeout).await?;

    if outcome.total_found == 0 {
        return Err(ChatError::NoFlights {
            origin: query.origin_code.clone(),
            destination: query.destination_code.clone(),
            date: query.departure_date.clone(),
        });
    }

    let valid: Vec<Flight> = outcome
        .flights
        .into_iter()
        .filter(|f| f.price.is_finite() && f.price > 0.0)
        .collect();
    if valid.is_empty() {
        return Err(ChatError::NoValidFlights);
    }

    let (origin, destination) = (&query.origin_code, &query.destination_code);
    let (text, flights) = match query.max_price {
        Some(budget) => {
            let within = flight_search::filter_by_budget(valid.clone(), budget);
            if within.is_empty() {
                let text = format!(
                    "💸 No flights found under ${budget} from {origin} to {destination}.\n\nCheapest available: ${}. Here are all {} options:",
                    format_price(min_price(&valid)),
                    valid.len()
                );
                (text, valid)
            } else {
                let text = format!(
                    "🎯 Perfect! Found {} flights under ${budget} from {origin} to {destination}!\n\nBest deal: ${}",
                    within.len(),
                    format_price(min_price(&within))
                );
                (text, within)
            }
        }
        None => {
            let text = format!(
                "✈️ Found {} flights from {origin} to {destination} on {}\n\nBest deal: ${}",
                valid.len(),
                query.departure_date,
                format_price(min_price(&valid))
            );
            (text, valid)
        }
    };

    Ok((text, ranking::rank_flights(flights, utterance)))
}

fn or_placeholder(code: &str, placeholder: &str) -> String {
    if code.is_empty() {
        placeholder.to_string()
    } else {
        code.to_string()
    }
}

fn min_price(flights: &[Flight]) -> f64 {
    flights.iter().map(|f| f.price).fold(f64::INFINITY, f64::min)
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
