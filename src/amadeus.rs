//! Cliente del proveedor de vuelos (Amadeus Self-Service API) y transformación
//! de sus ofertas al modelo `Flight` que consume el frontend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    models::{Airport, Flight, SearchRequest},
};

/// Amadeus no publica valoraciones; todos los vuelos reciben este valor.
pub const DEFAULT_RATING: f64 = 4.0;

/// Margen para renovar el token antes de que caduque.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Amadeus API credentials not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Amadeus API error ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Unexpected Amadeus response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fuente de ofertas de vuelo y de aeropuertos.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search_offers(&self, request: &SearchRequest) -> Result<Vec<Flight>, ProviderError>;

    async fn search_locations(&self, keyword: &str) -> Result<Vec<Airport>, ProviderError>;

    fn is_configured(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Cliente HTTP de Amadeus con caché del token OAuth2.
#[derive(Clone)]
pub struct AmadeusClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl AmadeusClient {
    pub fn new(base_url: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        if !cfg.has_credentials() {
            warn!("Faltan AMADEUS_API_KEY / AMADEUS_API_SECRET: las búsquedas fallarán.");
        }
        Self::new(
            cfg.amadeus_base_url.as_str(),
            &cfg.amadeus_api_key,
            &cfg.amadeus_api_secret,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Devuelve un token válido, pidiendo uno nuevo si no hay o ha caducado.
    async fn access_token(&self) -> Result<String, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured);
        }

        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Otra tarea pudo renovarlo mientras esperábamos el lock.
        if let Some(token) = slot.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("Solicitando token OAuth2 a Amadeus");
        let response = self
            .client
            .post(self.url("v1/security/oauth2/token"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        *slot = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    async fn search_offers(&self, request: &SearchRequest) -> Result<Vec<Flight>, ProviderError> {
        let token = self.access_token().await?;

        let mut params = vec![
            ("originLocationCode", request.origin_location_code.clone()),
            ("destinationLocationCode", request.destination_location_code.clone()),
            ("departureDate", request.departure_date.clone()),
            ("adults", request.adults.unwrap_or(1).to_string()),
        ];
        if let Some(return_date) = &request.return_date {
            params.push(("returnDate", return_date.clone()));
        }
        if let Some(max) = request.max {
            params.push(("max", max.to_string()));
        }
        if let Some(max_price) = request.max_price {
            params.push(("maxPrice", max_price.to_string()));
        }

        info!(
            "Buscando vuelos en Amadeus: {} → {} el {}",
            request.origin_location_code, request.destination_location_code, request.departure_date
        );
        let response = self
            .client
            .get(self.url("v2/shopping/flight-offers"))
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;
        let offers: DataResponse<FlightOffer> = read_json(response).await?;

        let total = offers.data.len();
        let flights: Vec<Flight> = offers.data.into_iter().filter_map(reshape_offer).collect();
        if flights.len() < total {
            warn!("Se descartaron {} ofertas mal formadas", total - flights.len());
        }
        Ok(flights)
    }

    async fn search_locations(&self, keyword: &str) -> Result<Vec<Airport>, ProviderError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(self.url("v1/reference-data/locations"))
            .bearer_auth(token)
            .query(&[("keyword", keyword), ("subType", "AIRPORT,CITY")])
            .send()
            .await?;
        let locations: DataResponse<Location> = read_json(response).await?;

        Ok(locations
            .data
            .into_iter()
            .map(|location| Airport {
                iata_code: location.iata_code,
                name: location.name,
                city: location.address.as_ref().and_then(|a| a.city_name.clone()),
                country: location.address.and_then(|a| a.country_name),
            })
            .collect())
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!("Amadeus respondió {status}: {body}");
        return Err(ProviderError::Status { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

// --- Respuestas de Amadeus ---

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FlightOffer {
    id: String,
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    price: OfferPrice,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    #[serde(default)]
    currency: String,
    total: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    departure: SegmentEndpoint,
    arrival: SegmentEndpoint,
    carrier_code: String,
    #[serde(default)]
    number: String,
    aircraft: Option<Aircraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentEndpoint {
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct Aircraft {
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    iata_code: String,
    name: String,
    address: Option<LocationAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationAddress {
    city_name: Option<String>,
    country_name: Option<String>,
}

// --- Transformación ---

/// Convierte una oferta en `Flight`; `None` si falta precio o segmentos.
fn reshape_offer(offer: FlightOffer) -> Option<Flight> {
    let price: f64 = offer.price.total.trim().parse().ok()?;
    if !price.is_finite() {
        return None;
    }

    let itinerary = offer.itineraries.into_iter().next()?;
    let first: Segment = serde_json::from_value(itinerary.segments.first()?.clone()).ok()?;
    let last: Segment = serde_json::from_value(itinerary.segments.last()?.clone()).ok()?;

    let raw_duration = itinerary.duration.unwrap_or_else(|| "PT0H0M".to_string());
    let stops = u32::try_from(itinerary.segments.len() - 1).unwrap_or(u32::MAX);

    Some(Flight {
        airline: airline_name(&first.carrier_code).to_string(),
        flight_number: format!("{}{}", first.carrier_code, first.number),
        origin_airport: airport_name(&first.departure.iata_code).to_string(),
        destination_airport: airport_name(&last.arrival.iata_code).to_string(),
        departure_time: clock_time(&first.departure.at),
        arrival_time: clock_time(&last.arrival.at),
        departure_date: calendar_day(&first.departure.at),
        arrival_date: calendar_day(&last.arrival.at),
        duration: display_duration(&raw_duration),
        duration_minutes: duration_to_minutes(&raw_duration).unwrap_or(0),
        price,
        currency: offer.price.currency,
        stops,
        rating: DEFAULT_RATING,
        aircraft: first
            .aircraft
            .map(|a| a.code)
            .unwrap_or_else(|| "Unknown".to_string()),
        booking_token: offer.id.clone(),
        is_real_data: true,
        airline_code: first.carrier_code,
        origin: first.departure.iata_code,
        destination: last.arrival.iata_code,
        id: offer.id,
        segments: itinerary.segments,
    })
}

fn clock_time(at: &str) -> String {
    NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

fn calendar_day(at: &str) -> String {
    at.split('T').next().unwrap_or_default().to_string()
}

static DURATION_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*([dhm])").expect("regex válida"));

/// Minutos totales de una duración `PT7H10M` o `7h 10m`.
pub fn duration_to_minutes(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let mut total: Option<u32> = None;
    for caps in DURATION_PART.captures_iter(&lower) {
        let value: u32 = caps[1].parse().ok()?;
        let minutes = match &caps[2] {
            "d" => value.checked_mul(24 * 60)?,
            "h" => value.checked_mul(60)?,
            _ => value,
        };
        total = Some(total.unwrap_or(0).checked_add(minutes)?);
    }
    total
}

/// `PT7H10M` → `7h 10m`.
pub fn display_duration(iso: &str) -> String {
    let lower = iso.to_lowercase();
    DURATION_PART
        .captures_iter(&lower)
        .map(|caps| format!("{}{}", &caps[1], &caps[2]))
        .collect::<Vec<_>>()
        .join(" ")
}

const AIRLINES: &[(&str, &str)] = &[
    ("AA", "American Airlines"), ("DL", "Delta Air Lines"), ("UA", "United Airlines"),
    ("B6", "JetBlue Airways"), ("WN", "Southwest Airlines"), ("AS", "Alaska Airlines"),
    ("NK", "Spirit Airlines"), ("F9", "Frontier Airlines"),
    ("AF", "Air France"), ("BA", "British Airways"), ("LH", "Lufthansa"),
    ("KL", "KLM"), ("VS", "Virgin Atlantic"), ("EK", "Emirates"),
    ("QR", "Qatar Airways"), ("SQ", "Singapore Airlines"), ("JL", "Japan Airlines"),
    ("NH", "ANA"), ("TK", "Turkish Airlines"), ("IB", "Iberia"),
    ("TP", "TAP Air Portugal"), ("AZ", "ITA Airways"), ("LX", "Swiss International"),
    ("OS", "Austrian Airlines"), ("SN", "Brussels Airlines"), ("SK", "SAS"),
    ("AY", "Finnair"), ("AC", "Air Canada"), ("CM", "Copa Airlines"),
];

const AIRPORTS: &[(&str, &str)] = &[
    ("ORD", "Chicago O'Hare"), ("MDW", "Chicago Midway"),
    ("JFK", "New York JFK"), ("LGA", "New York LaGuardia"), ("EWR", "Newark"),
    ("LAX", "Los Angeles"), ("SFO", "San Francisco"), ("MIA", "Miami"),
    ("LAS", "Las Vegas"), ("SEA", "Seattle"), ("BOS", "Boston"),
    ("DEN", "Denver"), ("ATL", "Atlanta"), ("PHX", "Phoenix"),
    ("DFW", "Dallas/Fort Worth"), ("IAH", "Houston"), ("MCO", "Orlando"),
    ("TPA", "Tampa"), ("RSW", "Fort Myers"), ("JAX", "Jacksonville"),
    ("LHR", "London Heathrow"), ("LGW", "London Gatwick"),
    ("CDG", "Paris Charles de Gaulle"), ("NRT", "Tokyo Narita"),
    ("DXB", "Dubai"), ("AMS", "Amsterdam"), ("FCO", "Rome Fiumicino"),
];

/// Nombre de la aerolínea; un código desconocido se devuelve tal cual.
fn airline_name(code: &str) -> &str {
    AIRLINES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

fn airport_name(code: &str) -> &str {
    AIRPORTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TOKEN_BODY: &str = r#"{"type":"amadeusOAuth2Token","access_token":"tok-123","expires_in":1799}"#;

    const OFFERS_BODY: &str = r#"{
        "data": [
            {
                "id": "1",
                "itineraries": [{
                    "duration": "PT9H35M",
                    "segments": [
                        {
                            "departure": {"iataCode": "ORD", "at": "2025-07-28T18:05:00"},
                            "arrival": {"iataCode": "JFK", "at": "2025-07-28T21:10:00"},
                            "carrierCode": "AA", "number": "100", "aircraft": {"code": "321"}
                        },
                        {
                            "departure": {"iataCode": "JFK", "at": "2025-07-28T22:30:00"},
                            "arrival": {"iataCode": "LHR", "at": "2025-07-29T10:40:00"},
                            "carrierCode": "AA", "number": "106"
                        }
                    ]
                }],
                "price": {"currency": "USD", "total": "412.50"}
            },
            {
                "id": "2",
                "itineraries": [{"duration": "PT8H", "segments": []}],
                "price": {"currency": "USD", "total": "not-a-number"}
            }
        ]
    }"#;

    async fn mock_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/v1/security/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "key".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TOKEN_BODY)
            .expect(1)
            .create_async()
            .await
    }

    fn request() -> SearchRequest {
        SearchRequest {
            origin_location_code: "ORD".into(),
            destination_location_code: "LHR".into(),
            departure_date: "2025-07-28".into(),
            adults: Some(1),
            max: Some(20),
            max_price: Some(500),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn search_offers_reshapes_and_drops_malformed() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_token(&mut server).await;
        let offers = server
            .mock("GET", "/v2/shopping/flight-offers")
            .match_header("authorization", "Bearer tok-123")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("originLocationCode".into(), "ORD".into()),
                Matcher::UrlEncoded("destinationLocationCode".into(), "LHR".into()),
                Matcher::UrlEncoded("departureDate".into(), "2025-07-28".into()),
                Matcher::UrlEncoded("max".into(), "20".into()),
                Matcher::UrlEncoded("maxPrice".into(), "500".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(OFFERS_BODY)
            .create_async()
            .await;

        let client = AmadeusClient::new(&server.url(), "key", "secret");
        let flights = client.search_offers(&request()).await.unwrap();

        token.assert_async().await;
        offers.assert_async().await;
        assert_eq!(flights.len(), 1);

        let flight = &flights[0];
        assert_eq!(flight.id, "1");
        assert_eq!(flight.airline, "American Airlines");
        assert_eq!(flight.flight_number, "AA100");
        assert_eq!(flight.origin, "ORD");
        assert_eq!(flight.destination, "LHR");
        assert_eq!(flight.origin_airport, "Chicago O'Hare");
        assert_eq!(flight.destination_airport, "London Heathrow");
        assert_eq!(flight.departure_time, "18:05");
        assert_eq!(flight.arrival_time, "10:40");
        assert_eq!(flight.departure_date, "2025-07-28");
        assert_eq!(flight.arrival_date, "2025-07-29");
        assert_eq!(flight.duration, "9h 35m");
        assert_eq!(flight.duration_minutes, 575);
        assert_eq!(flight.price, 412.5);
        assert_eq!(flight.stops, 1);
        assert_eq!(flight.rating, DEFAULT_RATING);
        assert_eq!(flight.aircraft, "321");
        assert_eq!(flight.segments.len(), 2);
        assert!(flight.is_real_data);
    }

    #[tokio::test]
    async fn token_is_reused_between_calls() {
        let mut server = mockito::Server::new_async().await;
        let token = mock_token(&mut server).await;
        let _offers = server
            .mock("GET", "/v2/shopping/flight-offers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .expect(2)
            .create_async()
            .await;

        let client = AmadeusClient::new(&server.url(), "key", "secret");
        assert!(client.search_offers(&request()).await.unwrap().is_empty());
        assert!(client.search_offers(&request()).await.unwrap().is_empty());
        token.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _offers = server
            .mock("GET", "/v2/shopping/flight-offers")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"errors":[{"detail":"Invalid date"}]}"#)
            .create_async()
            .await;

        let client = AmadeusClient::new(&server.url(), "key", "secret");
        let err = client.search_offers(&request()).await.unwrap_err();
        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("Invalid date"));
            }
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network() {
        let client = AmadeusClient::new("http://127.0.0.1:9", "", "");
        assert!(!client.is_configured());
        assert!(matches!(
            client.search_offers(&request()).await,
            Err(ProviderError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn search_locations_maps_address() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _locations = server
            .mock("GET", "/v1/reference-data/locations")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keyword".into(), "LON".into()),
                Matcher::UrlEncoded("subType".into(), "AIRPORT,CITY".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data":[
                    {"iataCode":"LHR","name":"HEATHROW","address":{"cityName":"LONDON","countryName":"UNITED KINGDOM"}},
                    {"iataCode":"LON","name":"LONDON"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = AmadeusClient::new(&server.url(), "key", "secret");
        let airports = client.search_locations("LON").await.unwrap();
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[0].iata_code, "LHR");
        assert_eq!(airports[0].city.as_deref(), Some("LONDON"));
        assert_eq!(airports[0].country.as_deref(), Some("UNITED KINGDOM"));
        assert_eq!(airports[1].city, None);
    }

    #[test]
    fn durations() {
        assert_eq!(duration_to_minutes("PT7H10M"), Some(430));
        assert_eq!(duration_to_minutes("7h 10m"), Some(430));
        assert_eq!(duration_to_minutes("PT45M"), Some(45));
        assert_eq!(duration_to_minutes("P1DT2H"), Some(1560));
        assert_eq!(duration_to_minutes("soon"), None);
        assert_eq!(display_duration("PT7H10M"), "7h 10m");
        assert_eq!(display_duration("PT8H"), "8h");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(airline_name("ZZ"), "ZZ");
        assert_eq!(airline_name("BA"), "British Airways");
        assert_eq!(airport_name("XYZ"), "XYZ");
    }
}
