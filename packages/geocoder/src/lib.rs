#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postal code geocoding.
//!
//! Converts a postal code to latitude/longitude coordinates through the
//! Nominatim / `OpenStreetMap` search API. The provider is described by
//! a TOML-deserializable [`GeocoderConfig`]; the default points at the
//! public Nominatim instance, which enforces a strict rate limit of
//! **1 request per second**.
//!
//! The network call is the only suspending operation in the whole
//! evaluation pipeline; the configured timeout applies per request and
//! failure is terminal for the request.

pub mod nominatim;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resolved coordinate pair (WGS84 degrees). Produced once per postal
/// code and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The service returned no match for the postal code.
    #[error("No coordinates found for postal code '{postal_code}'")]
    NotFound {
        /// The unresolvable postal code.
        postal_code: String,
    },

    /// The geocoder TOML configuration could not be parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of the configuration failure.
        message: String,
    },
}

/// Geocoding provider configuration, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Search endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// ISO country code filter for postal code lookups.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Minimum delay between requests in milliseconds. The caller is
    /// responsible for enforcing this between successive lookups.
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_country_code() -> String {
    "us".to_string()
}

const fn default_rate_limit_ms() -> u64 {
    1_000
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country_code: default_country_code(),
            rate_limit_ms: default_rate_limit_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GeocoderConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, GeocodeError> {
        toml::de::from_str(toml_str).map_err(|e| GeocodeError::Config {
            message: format!("{e}"),
        })
    }

    /// Builds an HTTP client honoring this configuration's timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the client cannot be built.
    pub fn http_client(&self) -> Result<reqwest::Client, GeocodeError> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .user_agent("window-scout")
            .build()?)
    }
}
