//! Destination types
//!
//! A destination is a named, geolocated point of interest the user saved for
//! later navigation. It is the only entity Savespot persists.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned identifier of a destination.
///
/// Random 128-bit value, rendered as hyphenated lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(Uuid);

impl DestinationId {
    /// Generate a fresh id. Only the store calls this.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id previously handed out by the store
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }

    pub fn to_id_string(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl FromStr for DestinationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DestinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A latitude/longitude pair in degrees. No range validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A persisted destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Primary key, assigned by the store and never changed
    pub id: DestinationId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Wall-clock time of the write that created the record
    pub created_at: DateTime<Utc>,
}

impl Destination {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// The caller-supplied fields of a destination that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDestination {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewDestination {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Refuse NaN and infinite coordinates; SQLite cannot store them as REAL
    pub fn validate(&self) -> Result<()> {
        check_finite("latitude", self.latitude)?;
        check_finite("longitude", self.longitude)
    }
}

/// A partial update. Only fields set to `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DestinationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    pub fn with_coordinate(self, coordinate: Coordinate) -> Self {
        self.with_latitude(coordinate.latitude)
            .with_longitude(coordinate.longitude)
    }

    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    /// Names of the supplied fields, for logging
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.address.is_some() {
            fields.push("address");
        }
        if self.latitude.is_some() {
            fields.push("latitude");
        }
        if self.longitude.is_some() {
            fields.push("longitude");
        }
        fields
    }

    /// Refuse supplied coordinates that are NaN or infinite
    pub fn validate(&self) -> Result<()> {
        if let Some(latitude) = self.latitude {
            check_finite("latitude", latitude)?;
        }
        if let Some(longitude) = self.longitude {
            check_finite("longitude", longitude)?;
        }
        Ok(())
    }

    /// Apply the supplied fields to `destination` in place
    pub fn apply_to(&self, destination: &mut Destination) {
        if let Some(name) = &self.name {
            destination.name = name.clone();
        }
        if let Some(address) = &self.address {
            destination.address = address.clone();
        }
        if let Some(latitude) = self.latitude {
            destination.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            destination.longitude = longitude;
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_parse_roundtrip() {
        let id = DestinationId::generate();
        let parsed: DestinationId = id.to_id_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        let err = DestinationId::parse("not-an-id").unwrap_err();
        assert!(matches!(err, Error::InvalidId(s) if s == "not-an-id"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DestinationId::generate();
        let b = DestinationId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut destination = Destination {
            id: DestinationId::generate(),
            name: "Dollar Tree".into(),
            address: "123 Main St, Boston, MA".into(),
            latitude: 42.3601,
            longitude: -71.0589,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let before = destination.clone();

        DestinationPatch::new().with_name("Dollar General").apply_to(&mut destination);

        assert_eq!(destination.name, "Dollar General");
        assert_eq!(destination.address, before.address);
        assert_eq!(destination.latitude, before.latitude);
        assert_eq!(destination.longitude, before.longitude);
        assert_eq!(destination.created_at, before.created_at);
        assert_eq!(destination.id, before.id);
    }

    #[test]
    fn test_patch_field_names() {
        let patch = DestinationPatch::new().with_coordinate(Coordinate::new(1.0, 2.0));
        assert_eq!(patch.field_names(), vec!["latitude", "longitude"]);
        assert!(!patch.is_empty());
        assert!(DestinationPatch::new().is_empty());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(NewDestination::new("a", "b", 90.0, -180.0).validate().is_ok());
        assert!(matches!(
            NewDestination::new("a", "b", f64::NAN, 0.0).validate(),
            Err(Error::InvalidCoordinate { field: "latitude", .. })
        ));
        assert!(matches!(
            DestinationPatch::new().with_longitude(f64::NEG_INFINITY).validate(),
            Err(Error::InvalidCoordinate { field: "longitude", .. })
        ));
        assert!(DestinationPatch::new().with_name("only a name").validate().is_ok());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(42.3656, -71.0096).to_string(), "42.3656,-71.0096");
    }
}
