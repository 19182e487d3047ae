//! Address and route lookups used by the pricing flow.

use thiserror::Error;

use crate::domain::stop::Coordinates;

pub mod google;

pub use google::GoogleMapsResolver;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error {status}: {message}")]
    Api { status: String, message: String },
    #[error("no results for `{0}`")]
    NoResults(String),
    #[error("geo lookups are not configured: {0}")]
    NotConfigured(String),
}

/// Driving distance and time of a route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteMetrics {
    pub distance_miles: f64,
    pub duration_hours: f64,
}

/// Geocoding and driving-route lookups.
///
/// Implementations are blocking and keep no cache; callers skip the
/// contribution of a failed lookup instead of failing the whole calculation.
pub trait GeoResolver: Send + Sync {
    /// Resolve a single-line postal address.
    fn geocode(&self, address: &str) -> Result<Coordinates, GeoError>;

    /// Driving route visiting `waypoints` in order.
    fn route(&self, waypoints: &[Coordinates]) -> Result<RouteMetrics, GeoError>;

    /// Same lookups billed to another API key, when the backend has keys.
    fn with_api_key(&self, _api_key: &str) -> Option<Box<dyn GeoResolver>> {
        None
    }

    /// False when lookups would fail for lack of credentials.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Resolver used for one hub: the shared one, or a copy keyed with the
/// hub's own API key.
pub enum HubGeo<'a> {
    Shared(&'a dyn GeoResolver),
    Own(Box<dyn GeoResolver>),
}

impl<'a> HubGeo<'a> {
    /// `None` when no resolver can serve the hub.
    pub fn resolve(geo: Option<&'a dyn GeoResolver>, api_key: Option<&str>) -> Option<Self> {
        let geo = geo?;
        if let Some(own) = api_key.and_then(|key| geo.with_api_key(key)) {
            return Some(HubGeo::Own(own));
        }
        geo.is_configured().then_some(HubGeo::Shared(geo))
    }

    pub fn get(&self) -> &dyn GeoResolver {
        match self {
            HubGeo::Shared(geo) => *geo,
            HubGeo::Own(geo) => geo.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Keyed(Option<String>);

    impl GeoResolver for Keyed {
        fn geocode(&self, _address: &str) -> Result<Coordinates, GeoError> {
            match &self.0 {
                Some(key) => Ok(Coordinates::new(key.len() as f64, 0.0)),
                None => Err(GeoError::NotConfigured("no key".to_string())),
            }
        }

        fn route(&self, _waypoints: &[Coordinates]) -> Result<RouteMetrics, GeoError> {
            Ok(RouteMetrics::default())
        }

        fn with_api_key(&self, api_key: &str) -> Option<Box<dyn GeoResolver>> {
            Some(Box::new(Keyed(Some(api_key.to_string()))))
        }

        fn is_configured(&self) -> bool {
            self.0.is_some()
        }
    }

    #[test]
    fn hub_key_takes_precedence() {
        let shared = Keyed(Some("server".to_string()));
        let geo = HubGeo::resolve(Some(&shared), Some("hub-key-123")).unwrap();
        assert!(matches!(geo, HubGeo::Own(_)));
        assert_eq!(geo.get().geocode("x").unwrap().lat, 11.0);

        let geo = HubGeo::resolve(Some(&shared), None).unwrap();
        assert_eq!(geo.get().geocode("x").unwrap().lat, 6.0);
    }

    #[test]
    fn unkeyed_resolver_serves_only_hubs_with_a_key() {
        let shared = Keyed(None);
        assert!(HubGeo::resolve(Some(&shared), None).is_none());
        assert!(HubGeo::resolve(Some(&shared), Some("hub")).is_some());
        assert!(HubGeo::resolve(None, Some("hub")).is_none());
    }
}
