//! Carga y gestión de configuración de la aplicación (servidor + Amadeus).

use std::{env, time::Duration};

use anyhow::{anyhow, Context, Result};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmadeusEnvironment {
    Test,
    Production,
}

impl AmadeusEnvironment {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("Entorno de Amadeus no soportado: {other}")),
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Self::Test => "https://test.api.amadeus.com",
            Self::Production => "https://api.amadeus.com",
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub open_browser: bool,

    pub amadeus_api_key: String,
    pub amadeus_api_secret: String,
    pub amadeus_base_url: Url,

    /// Tiempo máximo para una búsqueda en el proveedor.
    pub search_timeout: Duration,
    /// Número de ofertas pedidas por defecto.
    pub max_results: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:3148".to_string(),
            open_browser: true,
            amadeus_api_key: String::new(),
            amadeus_api_secret: String::new(),
            amadeus_base_url: Url::parse(AmadeusEnvironment::Test.base_url())
                .expect("URL base de Amadeus válida"),
            search_timeout: Duration::from_secs(12),
            max_results: 20,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una fuente de variables arbitraria.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_addr = var("SERVER_ADDR").unwrap_or(defaults.server_addr);
        let open_browser = match var("OPEN_BROWSER") {
            Some(v) => parse_bool(&v).with_context(|| format!("OPEN_BROWSER inválido: {v}"))?,
            None => defaults.open_browser,
        };

        let amadeus_api_key = var("AMADEUS_API_KEY").unwrap_or_default();
        let amadeus_api_secret = var("AMADEUS_API_SECRET").unwrap_or_default();

        let environment =
            AmadeusEnvironment::from_str(&var("AMADEUS_ENV").unwrap_or_else(|| "test".to_string()))?;
        let base_url_str =
            var("AMADEUS_BASE_URL").unwrap_or_else(|| environment.base_url().to_string());
        let amadeus_base_url = Url::parse(&base_url_str)
            .with_context(|| format!("AMADEUS_BASE_URL no es una URL válida: {base_url_str}"))?;

        let search_timeout = match var("SEARCH_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("SEARCH_TIMEOUT_SECS inválido: {v}"))?,
            ),
            None => defaults.search_timeout,
        };
        let max_results = match var("MAX_RESULTS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("MAX_RESULTS inválido: {v}"))?,
            None => defaults.max_results,
        };

        Ok(Self {
            server_addr,
            open_browser,
            amadeus_api_key,
            amadeus_api_secret,
            amadeus_base_url,
            search_timeout,
            max_results,
        })
    }

    /// Hay credenciales de Amadeus configuradas.
    pub fn has_credentials(&self) -> bool {
        !self.amadeus_api_key.is_empty() && !self.amadeus_api_secret.is_empty()
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("valor booleano no reconocido: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:3148");
        assert!(cfg.open_browser);
        assert_eq!(cfg.max_results, 20);
        assert_eq!(cfg.amadeus_base_url.as_str(), "https://test.api.amadeus.com/");
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            ("SERVER_ADDR", "0.0.0.0:8080"),
            ("OPEN_BROWSER", "false"),
            ("AMADEUS_API_KEY", "key"),
            ("AMADEUS_API_SECRET", "secret"),
            ("AMADEUS_ENV", "production"),
            ("SEARCH_TIMEOUT_SECS", "30"),
            ("MAX_RESULTS", "5"),
        ])
        .unwrap();

        assert_eq!(cfg.server_addr, "0.0.0.0:8080");
        assert!(!cfg.open_browser);
        assert!(cfg.has_credentials());
        assert_eq!(cfg.amadeus_base_url.as_str(), "https://api.amadeus.com/");
        assert_eq!(cfg.search_timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_results, 5);
    }

    #[test]
    fn explicit_base_url_wins_over_environment() {
        let cfg = load(&[
            ("AMADEUS_ENV", "prod"),
            ("AMADEUS_BASE_URL", "http://127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(cfg.amadeus_base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn invalid_values_abort_loading() {
        assert!(load(&[("SEARCH_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("SEARCH_TIMEOUT_SECS", "-1")]).is_err());
        assert!(load(&[("MAX_RESULTS", "many")]).is_err());
        assert!(load(&[("AMADEUS_ENV", "staging")]).is_err());
        assert!(load(&[("AMADEUS_BASE_URL", "not a url")]).is_err());
        assert!(load(&[("OPEN_BROWSER", "maybe")]).is_err());
    }

    #[test]
    fn environment_names() {
        assert_eq!(AmadeusEnvironment::from_str("TEST").unwrap(), AmadeusEnvironment::Test);
        assert_eq!(
            AmadeusEnvironment::from_str("prod").unwrap(),
            AmadeusEnvironment::Production
        );
        assert!(AmadeusEnvironment::from_str("staging").is_err());
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.max_results, 20);
        assert_eq!(cfg.search_timeout, Duration::from_secs(12));
        assert_eq!(cfg.amadeus_base_url.as_str(), "https://test.api.amadeus.com/");
        assert!(!cfg.has_credentials());
    }

    #[test]
    fn booleans() {
        assert!(parse_bool(" Yes ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
