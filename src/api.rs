use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    amadeus::ProviderError,
    app_state::AppState,
    chat::{self, ChatReply},
    flight_search::{self, SearchError},
    models::{Airport, ParsedQuery, PreferenceWeights, SearchRequest, SearchResponse},
    preferences, query_parser,
};

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct ChatPayload {
    message: String,
}

#[derive(Serialize)]
pub struct ParseResponse {
    query: ParsedQuery,
    preferences: PreferenceWeights,
}

#[derive(Deserialize)]
pub struct AirportSearchParams {
    keyword: Option<String>,
}

#[derive(Serialize)]
pub struct AirportSearchResponse {
    airports: Vec<Airport>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/parse", post(parse_handler))
        .route("/api/flights/search", post(search_flights_handler))
        .route("/api/airports/search", get(search_airports_handler))
        .route("/api/status", get(status_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatReply>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Message is required"})),
        ));
    }

    let reply = chat::handle_message(state.provider.as_ref(), &state.config, message).await;
    Ok(Json(reply))
}

#[axum::debug_handler]
async fn parse_handler(Json(payload): Json<ChatPayload>) -> Json<ParseResponse> {
    Json(ParseResponse {
        query: query_parser::parse_query(&payload.message),
        preferences: preferences::analyze(&payload.message),
    })
}

#[axum::debug_handler]
async fn search_flights_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let outcome = flight_search::search(
        state.provider.as_ref(),
        request,
        state.config.max_results,
        state.config.search_timeout,
    )
    .await
    .map_err(search_error_response)?;

    let message = (outcome.total_found == 0)
        .then(|| "No flights found for this route and date".to_string());

    Ok(Json(SearchResponse {
        message,
        flights: outcome.flights,
        total_found: outcome.total_found,
        filtered_count: outcome.filtered_count,
    }))
}

fn search_error_response(err: SearchError) -> ApiError {
    match err {
        SearchError::MissingParameters => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": err.to_string()})),
        ),
        SearchError::Timeout => (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({"message": "Request timeout", "flights": []})),
        ),
        SearchError::Provider(ProviderError::NotConfigured) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "Amadeus API credentials not configured",
                "error": "Please add AMADEUS_API_KEY and AMADEUS_API_SECRET to your .env file",
                "flights": []
            })),
        ),
        SearchError::Provider(e) => {
            error!("Error de Amadeus: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Failed to search flights with Amadeus API",
                    "error": e.to_string(),
                    "flights": []
                })),
            )
        }
    }
}

#[axum::debug_handler]
async fn search_airports_handler(
    State(state): State<AppState>,
    Query(params): Query<AirportSearchParams>,
) -> Result<Json<AirportSearchResponse>, ApiError> {
    let Some(keyword) = params.keyword.filter(|k| !k.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Keyword is required"})),
        ));
    };

    let lookup = state.provider.search_locations(keyword.trim());
    match tokio::time::timeout(state.config.search_timeout, lookup).await {
        Ok(Ok(airports)) => Ok(Json(AirportSearchResponse { airports })),
        Err(_) => {
            warn!("La búsqueda de aeropuertos superó el límite de {:?}", state.config.search_timeout);
            Err((
                StatusCode::REQUEST_TIMEOUT,
                Json(json!({"message": "Request timeout", "airports": []})),
            ))
        }
        Ok(Err(e)) => {
            error!("Error buscando aeropuertos: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Failed to search airports", "error": e.to_string()})),
            ))
        }
    }
}

#[axum::debug_handler]
async fn status_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "providerConfigured": state.provider.is_configured(),
    }))
}

// --- Handler de Apagado ---

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    let sender = match state.shutdown_sender.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(sender) = sender {
        let _ = sender.send(());
    }
    StatusCode::OK
}
