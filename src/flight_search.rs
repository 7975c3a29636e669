//! Búsqueda de vuelos: validación de parámetros, límite de tiempo sobre el
//! proveedor y filtrado por presupuesto.

use std::time::Duration;

use tracing::{info, warn};

use crate::{
    amadeus::{FlightProvider, ProviderError},
    models::{Flight, SearchRequest},
};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Missing required parameters: originLocationCode, destinationLocationCode, departureDate")]
    MissingParameters,
    #[error("Request timeout")]
    Timeout,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub flights: Vec<Flight>,
    /// Ofertas recibidas antes de filtrar por presupuesto.
    pub total_found: usize,
    pub filtered_count: usize,
}

/// Ejecuta una búsqueda completa contra el proveedor.
pub async fn search(
    provider: &dyn FlightProvider,
    mut request: SearchRequest,
    default_max: u32,
    timeout: Duration,
) -> Result<SearchOutcome, SearchError> {
    if request.origin_location_code.trim().is_empty()
        || request.destination_location_code.trim().is_empty()
        || request.departure_date.trim().is_empty()
    {
        return Err(SearchError::MissingParameters);
    }
    request.adults.get_or_insert(1);
    request.max.get_or_insert(default_max);

    let flights = match tokio::time::timeout(timeout, provider.search_offers(&request)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("La búsqueda superó el límite de {:?}", timeout);
            return Err(SearchError::Timeout);
        }
    };

    let total_found = flights.len();
    let flights = match request.max_price {
        Some(max_price) => filter_by_budget(flights, max_price),
        None => flights,
    };

    info!(
        "Encontrados {} vuelos que cumplen los criterios ({} en total)",
        flights.len(),
        total_found
    );
    Ok(SearchOutcome {
        filtered_count: flights.len(),
        total_found,
        flights,
    })
}

/// Vuelos con precio menor o igual al presupuesto.
pub fn filter_by_budget(flights: Vec<Flight>, max_price: u32) -> Vec<Flight> {
    flights
        .into_iter()
        .filter(|f| f.price <= f64::from(max_price))
        .collect()
}
