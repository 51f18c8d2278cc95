//! Country resolution: coordinate-first, name-based fallback.

use crate::country::CountryClient;
use crate::provider::OpenWeatherClient;
use crate::types::{Coordinates, LocationQuery, LookupError, ResolvedCountry};

/// Resolves a location to its country record.
///
/// When the location has coordinates they are reverse-geocoded and the
/// name-based path is never touched; otherwise the name is forward-geocoded
/// and the resolved coordinates are surfaced for map centering. Errors are
/// returned as-is; the caller decides the fallback (normally: render no
/// country section).
#[derive(Debug, Clone)]
pub struct GeoCountryResolver {
    provider: OpenWeatherClient,
    countries: CountryClient,
}

impl GeoCountryResolver {
    pub fn new(provider: OpenWeatherClient, countries: CountryClient) -> Self {
        Self {
            provider,
            countries,
        }
    }

    /// Resolve the country for a location. First success wins; only the
    /// first geocoding hit of a multi-hit response is used. No retries.
    pub async fn resolve_country(
        &self,
        query: &LocationQuery,
    ) -> Result<ResolvedCountry, LookupError> {
        match query {
            LocationQuery::Coords(coords) => self.from_coordinates(*coords).await,
            LocationQuery::Name(name) => self.from_name(name).await,
        }
    }

    async fn from_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<ResolvedCountry, LookupError> {
        let hits = self.provider.reverse_geocode(coords).await?;
        let hit = hits.into_iter().next().ok_or(LookupError::NotFound)?;

        let record = self.countries.country_by_code(&hit.country).await?;
        Ok(ResolvedCountry {
            record,
            map_center: None,
        })
    }

    async fn from_name(&self, name: &str) -> Result<ResolvedCountry, LookupError> {
        let hits = self.provider.forward_geocode(name).await?;
        let hit = hits.into_iter().next().ok_or(LookupError::NotFound)?;

        let record = self.countries.country_by_code(&hit.country).await?;
        Ok(ResolvedCountry {
            record,
            map_center: Some(Coordinates::new(hit.latitude, hit.longitude)),
        })
    }
}
