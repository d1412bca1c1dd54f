//! Nominatim / `OpenStreetMap` postal code lookup.
//!
//! Uses the structured search endpoint with a `postalcode` filter.
//! Nominatim has strict rate limits: **1 request per second** maximum
//! on the public instance; see `rate_limit_ms` in [`GeocoderConfig`].
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::{Coordinates, GeocodeError, GeocoderConfig};

/// Resolves a postal code to coordinates.
///
/// The caller is responsible for rate limiting between successive
/// lookups.
///
/// # Errors
///
/// Returns [`GeocodeError::NotFound`] if the service has no match for
/// the postal code, [`GeocodeError::RateLimited`] on HTTP 429, and
/// [`GeocodeError::Http`] / [`GeocodeError::Parse`] if the request or
/// response handling fails.
pub async fn resolve_postal_code(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    postal_code: &str,
) -> Result<Coordinates, GeocodeError> {
    let resp = client
        .get(&config.base_url)
        .query(&[
            ("postalcode", postal_code),
            ("countrycodes", config.country_code.as_str()),
            ("format", "jsonv2"),
            ("limit", "1"),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        log::warn!("Nominatim rate limit hit for postal code {postal_code}");
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    let coordinates = parse_response(&body)?.ok_or_else(|| GeocodeError::NotFound {
        postal_code: postal_code.to_string(),
    })?;

    log::debug!(
        "Resolved postal code {postal_code} to ({}, {})",
        coordinates.latitude,
        coordinates.longitude
    );
    Ok(coordinates)
}

/// Parses a Nominatim JSON response into coordinates.
///
/// Returns `Ok(None)` when the result array is empty (no match).
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let latitude = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let longitude = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}
