//! Blocking client for the Google Maps geocoding and directions APIs.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::stop::Coordinates;
use crate::geo::{GeoError, GeoResolver, RouteMetrics};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
pub const METERS_PER_MILE: f64 = 1609.34;
const USER_AGENT: &str = concat!("pushkind-moving/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GoogleMapsResolver {
    http: Client,
    base_url: Url,
    /// Server-wide key; hubs may bring their own through `with_api_key`.
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Measure,
    duration: Measure,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

impl GoogleMapsResolver {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeoError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base: &str) -> Result<Self, GeoError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeoError::NotConfigured("empty API key".to_string()));
        }
        let mut resolver = Self::unkeyed(base)?;
        resolver.api_key = Some(api_key);
        Ok(resolver)
    }

    /// Client without a server-wide key. It only answers for hubs that
    /// configured their own key.
    pub fn unkeyed(base: &str) -> Result<Self, GeoError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, GeoError> {
        Ok(self.base_url.join(path)?)
    }

    fn key(&self) -> Result<&str, GeoError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GeoError::NotConfigured("no API key".to_string()))
    }
}

fn api_error(status: String, message: Option<String>) -> GeoError {
    GeoError::Api {
        status,
        message: message.unwrap_or_else(|| "no details".to_string()),
    }
}

fn waypoint(coordinates: &Coordinates) -> String {
    format!("{},{}", coordinates.lat, coordinates.lng)
}

impl GeoResolver for GoogleMapsResolver {
    fn geocode(&self, address: &str) -> Result<Coordinates, GeoError> {
        let key = self.key()?;
        let url = self.url("geocode/json")?;
        let response: GeocodeResponse = self
            .http
            .get(url)
            .query(&[
                ("address", address),
                ("region", "us"),
                ("key", key),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeoError::NoResults(address.to_string())),
            _ => return Err(api_error(response.status, response.error_message)),
        }

        let location = response
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| GeoError::NoResults(address.to_string()))?;

        Ok(Coordinates::new(location.lat, location.lng))
    }

    fn route(&self, waypoints: &[Coordinates]) -> Result<RouteMetrics, GeoError> {
        let key = self.key()?;
        let (Some(origin), Some(destination)) = (waypoints.first(), waypoints.last()) else {
            return Err(GeoError::NoResults("empty route".to_string()));
        };

        let origin = waypoint(origin);
        let destination = waypoint(destination);
        let via = if waypoints.len() > 2 {
            waypoints[1..waypoints.len() - 1]
                .iter()
                .map(waypoint)
                .collect::<Vec<_>>()
                .join("|")
        } else {
            String::new()
        };

        let mut params = vec![
            ("origin", origin.as_str()),
            ("destination", destination.as_str()),
            ("mode", "driving"),
            ("key", key),
        ];
        if !via.is_empty() {
            params.push(("waypoints", via.as_str()));
        }

        let url = self.url("directions/json")?;
        let response: DirectionsResponse = self
            .http
            .get(url)
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;

        if response.status != "OK" {
            return Err(api_error(response.status, response.error_message));
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NoResults(format!("{origin} -> {destination}")))?;

        let (meters, seconds) = route
            .legs
            .iter()
            .fold((0.0, 0.0), |(meters, seconds), leg| {
                (meters + leg.distance.value, seconds + leg.duration.value)
            });

        Ok(RouteMetrics {
            distance_miles: meters / METERS_PER_MILE,
            duration_hours: seconds / 3600.0,
        })
    }

    fn with_api_key(&self, api_key: &str) -> Option<Box<dyn GeoResolver>> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Box::new(Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: Some(api_key.to_string()),
        }))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn resolver(server: &mockito::Server) -> GoogleMapsResolver {
        GoogleMapsResolver::with_base_url("test-key", &format!("{}/", server.url())).unwrap()
    }

    #[test]
    fn geocode_returns_first_location() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "1 Main St, Austin, TX 78701".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"OK","results":[{"geometry":{"location":{"lat":30.27,"lng":-97.74}}}]}"#,
            )
            .create();

        let coordinates = resolver(&server)
            .geocode("1 Main St, Austin, TX 78701")
            .unwrap();

        mock.assert();
        assert_eq!(coordinates, Coordinates::new(30.27, -97.74));
    }

    #[test]
    fn geocode_maps_zero_results() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ZERO_RESULTS","results":[]}"#)
            .create();

        let result = resolver(&server).geocode("nowhere");
        assert!(matches!(result, Err(GeoError::NoResults(address)) if address == "nowhere"));
    }

    #[test]
    fn geocode_reports_api_errors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"REQUEST_DENIED","error_message":"bad key"}"#)
            .create();

        let result = resolver(&server).geocode("1 Main St");
        assert!(matches!(
            result,
            Err(GeoError::Api { status, message }) if status == "REQUEST_DENIED" && message == "bad key"
        ));
    }

    #[test]
    fn route_sums_all_legs() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/directions/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("origin".into(), "1,2".into()),
                Matcher::UrlEncoded("destination".into(), "5,6".into()),
                Matcher::UrlEncoded("waypoints".into(), "3,4".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","routes":[{"legs":[
                    {"distance":{"value":16093.4},"duration":{"value":1800}},
                    {"distance":{"value":16093.4},"duration":{"value":1800}}
                ]}]}"#,
            )
            .create();

        let metrics = resolver(&server)
            .route(&[
                Coordinates::new(1.0, 2.0),
                Coordinates::new(3.0, 4.0),
                Coordinates::new(5.0, 6.0),
            ])
            .unwrap();

        mock.assert();
        assert!((metrics.distance_miles - 20.0).abs() < 1e-9);
        assert!((metrics.duration_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn http_failure_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/directions/json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let result = resolver(&server).route(&[Coordinates::new(1.0, 2.0), Coordinates::new(3.0, 4.0)]);
        assert!(matches!(result, Err(GeoError::Http(_))));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            GoogleMapsResolver::new("  "),
            Err(GeoError::NotConfigured(_))
        ));
    }

    #[test]
    fn hub_key_replaces_missing_server_key() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::UrlEncoded("key".into(), "hub-key".into()))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","results":[{"geometry":{"location":{"lat":30.0,"lng":-97.0}}}]}"#,
            )
            .create();

        let unkeyed = GoogleMapsResolver::unkeyed(&format!("{}/", server.url())).unwrap();
        assert!(!unkeyed.is_configured());
        assert!(matches!(
            unkeyed.geocode("1 Main St"),
            Err(GeoError::NotConfigured(_))
        ));
        assert!(unkeyed.with_api_key(" ").is_none());

        let keyed = unkeyed.with_api_key("hub-key").unwrap();
        assert!(keyed.is_configured());
        assert_eq!(
            keyed.geocode("1 Main St").unwrap(),
            Coordinates::new(30.0, -97.0)
        );
        mock.assert();
    }
}
