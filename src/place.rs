//! Place-search results
//!
//! The autocomplete collaborator hands back a prediction description plus,
//! when details were fetched, a place name, a formatted address and a
//! geometry. Only results with a geometry can become destinations.

use crate::destination::{Coordinate, NewDestination};
use serde::{Deserialize, Serialize};

/// What the place-search collaborator returns for a picked result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    /// Free-text description of the prediction the user tapped
    pub description: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub location: Option<Coordinate>,
}

impl PlaceDetails {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_formatted_address(mut self, address: impl Into<String>) -> Self {
        self.formatted_address = Some(address.into());
        self
    }

    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }

    /// Turn the selection into an unsaved destination.
    ///
    /// `None` when the result has no geometry. Blank names and addresses fall
    /// back to the prediction description.
    pub fn into_new_destination(self) -> Option<NewDestination> {
        let location = self.location?;
        let name = non_blank(self.name).unwrap_or_else(|| self.description.clone());
        let address = non_blank(self.formatted_address).unwrap_or(self.description);

        Some(NewDestination::new(
            name,
            address,
            location.latitude,
            location.longitude,
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
