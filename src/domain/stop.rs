use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::UnknownVariant;

/// Role of a stop within the route.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// First stop of a route with at least two stops.
    Origin,
    /// Any stop between the origin and the destination.
    #[default]
    Stop,
    /// Last stop of a route with at least two stops.
    Destination,
}

impl StopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Stop => "stop",
            Self::Destination => "destination",
        }
    }
}

impl FromStr for StopKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "origin" => Ok(Self::Origin),
            "stop" => Ok(Self::Stop),
            "destination" => Ok(Self::Destination),
            other => Err(UnknownVariant::new("stop type", other)),
        }
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Render a postal address in the single-line form accepted by geocoders.
pub fn format_address(
    address: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    zip: &str,
) -> String {
    format!(
        "{}, {}, {} {}",
        address.unwrap_or_default(),
        city.unwrap_or_default(),
        state.unwrap_or_default(),
        zip
    )
}

/// Domain representation of a stop on an estimate route.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Stop {
    /// Unique identifier of the stop. Zero for a stop that is not stored yet.
    pub id: i32,
    /// Estimate the stop belongs to.
    pub estimate_id: i32,
    /// One-based position on the route.
    pub sequence: i32,
    /// Role derived from the position.
    #[serde(rename = "stop_type")]
    pub kind: StopKind,
    /// Street line.
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Postal code, the only mandatory part of the address.
    pub zip: String,
    /// Latitude when the address was geocoded.
    pub lat: Option<f64>,
    /// Longitude when the address was geocoded.
    pub lng: Option<f64>,
    /// Floor of the pickup or drop-off unit.
    pub floor: Option<i32>,
    pub elevator: bool,
    pub stairs: bool,
    pub long_walk: bool,
}

impl Stop {
    /// Build an unsaved stop from a payload.
    pub fn pending(estimate_id: i32, stop: &NewStop) -> Self {
        Self {
            id: 0,
            estimate_id,
            sequence: 0,
            kind: StopKind::Stop,
            address: stop.address.clone(),
            city: stop.city.clone(),
            state: stop.state.clone(),
            zip: stop.zip.clone(),
            lat: stop.coordinates.map(|c| c.lat),
            lng: stop.coordinates.map(|c| c.lng),
            floor: stop.floor,
            elevator: stop.elevator,
            stairs: stop.stairs,
            long_walk: stop.long_walk,
        }
    }

    /// Coordinates are only usable when both parts are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.lat = coordinates.map(|c| c.lat);
        self.lng = coordinates.map(|c| c.lng);
    }

    pub fn full_address(&self) -> String {
        format_address(
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            &self.zip,
        )
    }
}

/// Payload required to add a stop to an estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStop {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: String,
    pub floor: Option<i32>,
    pub elevator: bool,
    pub stairs: bool,
    pub long_walk: bool,
    /// Resolved position, filled in by geocoding before the stop is stored.
    pub coordinates: Option<Coordinates>,
}

impl NewStop {
    /// Build a stop payload with only the postal code set.
    pub fn new(zip: impl Into<String>) -> Self {
        Self {
            address: None,
            city: None,
            state: None,
            zip: zip.into().trim().to_string(),
            floor: None,
            elevator: false,
            stairs: false,
            long_walk: false,
            coordinates: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Set the access flags of the stop.
    pub fn with_access(mut self, elevator: bool, stairs: bool, long_walk: bool) -> Self {
        self.elevator = elevator;
        self.stairs = stairs;
        self.long_walk = long_walk;
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn full_address(&self) -> String {
        format_address(
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            &self.zip,
        )
    }
}

/// Patch data applied when editing a stop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStop {
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip: Option<String>,
    pub floor: Option<Option<i32>>,
    pub elevator: Option<bool>,
    pub stairs: Option<bool>,
    pub long_walk: Option<bool>,
    /// New position; set when the address changes.
    pub coordinates: Option<Option<Coordinates>>,
}

impl UpdateStop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: Option<impl Into<String>>) -> Self {
        self.address = Some(address.map(Into::into));
        self
    }

    pub fn city(mut self, city: Option<impl Into<String>>) -> Self {
        self.city = Some(city.map(Into::into));
        self
    }

    pub fn state(mut self, state: Option<impl Into<String>>) -> Self {
        self.state = Some(state.map(Into::into));
        self
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into().trim().to_string());
        self
    }

    pub fn floor(mut self, floor: Option<i32>) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn access(mut self, elevator: bool, stairs: bool, long_walk: bool) -> Self {
        self.elevator = Some(elevator);
        self.stairs = Some(stairs);
        self.long_walk = Some(long_walk);
        self
    }

    /// Whether the patch alters any part of the postal address.
    pub fn changes_address(&self) -> bool {
        self.address.is_some() || self.city.is_some() || self.state.is_some() || self.zip.is_some()
    }

    /// Apply the patch to `stop`. An address change drops stale coordinates
    /// unless the patch carries fresh ones.
    pub fn apply_to(&self, stop: &mut Stop) {
        if let Some(address) = &self.address {
            stop.address = address.clone();
        }
        if let Some(city) = &self.city {
            stop.city = city.clone();
        }
        if let Some(state) = &self.state {
            stop.state = state.clone();
        }
        if let Some(zip) = &self.zip {
            stop.zip = zip.clone();
        }
        if let Some(floor) = self.floor {
            stop.floor = floor;
        }
        if let Some(elevator) = self.elevator {
            stop.elevator = elevator;
        }
        if let Some(stairs) = self.stairs {
            stop.stairs = stairs;
        }
        if let Some(long_walk) = self.long_walk {
            stop.long_walk = long_walk;
        }
        match self.coordinates {
            Some(coordinates) => stop.set_coordinates(coordinates),
            None if self.changes_address() => stop.set_coordinates(None),
            None => {}
        }
    }
}

/// Structural edit to the stops of an estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum StopChange {
    /// Insert a stop before the current destination.
    Add(NewStop),
    /// Edit address or access details of a stop.
    Update { stop_id: i32, updates: UpdateStop },
    /// Remove a stop and close the gap.
    Delete { stop_id: i32 },
    /// Replace the order with the given permutation of stop ids.
    Reorder { stop_ids: Vec<i32> },
}

/// Freshly resolved position of a stored stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCoordinates {
    pub stop_id: i32,
    pub coordinates: Coordinates,
}
