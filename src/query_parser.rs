//! Punto de entrada del parser: compone ruta, fecha y presupuesto en una
//! `ParsedQuery`. Es una función total y sin estado entre llamadas.

use chrono::NaiveDate;
use tracing::debug;

use crate::{budget, date_parser, models::ParsedQuery, route};

pub fn parse_query(utterance: &str) -> ParsedQuery {
    compose(utterance, date_parser::parse_date(utterance))
}

/// Igual que [`parse_query`] pero con el día de referencia explícito.
pub fn parse_query_on(utterance: &str, today: NaiveDate) -> ParsedQuery {
    compose(utterance, date_parser::parse_date_on(utterance, today))
}

fn compose(utterance: &str, departure_date: String) -> ParsedQuery {
    let route = route::extract_route(utterance);
    let max_price = budget::extract_budget(utterance);

    let query = ParsedQuery {
        origin_code: route.origin,
        destination_code: route.destination,
        departure_date,
        max_price,
    };
    debug!(?query, "Consulta interpretada");
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn cheapest_nyc_to_la() {
        let query = parse_query_on("cheapest flight from NYC to LA", today());
        assert_eq!(
            query,
            ParsedQuery {
                origin_code: "JFK".into(),
                destination_code: "LAX".into(),
                departure_date: "2025-07-08".into(),
                max_price: None,
            }
        );
        assert!(query.has_route());
    }

    #[test]
    fn route_date_and_budget_together() {
        let query = parse_query_on("flights from Chicago to London under $400 on july 28", today());
        assert_eq!(query.origin_code, "ORD");
        assert_eq!(query.destination_code, "LHR");
        assert_eq!(query.departure_date, "2025-07-28");
        assert_eq!(query.max_price, Some(400));
    }

    #[test]
    fn unresolved_route_is_reported_with_empty_codes() {
        let query = parse_query_on("take me somewhere warm", today());
        assert_eq!(query.origin_code, "");
        assert_eq!(query.destination_code, "");
        assert_eq!(query.departure_date, "2025-07-08");
        assert!(!query.has_route());
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "Show me flights under $400 from Chicago to Miami 2025-09-01";
        assert_eq!(parse_query(text), parse_query(text));
        assert_eq!(parse_query_on(text, today()), parse_query_on(text, today()));
    }
}
