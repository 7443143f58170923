//! Add-destination workflow
//!
//! Linear flow behind the "Add Destination" screen: the user picks a place,
//! the map recenters on it, a confirmation is shown, and confirming saves the
//! destination. Cancelling drops the selection.

use crate::destination::{Coordinate, Destination, NewDestination};
use crate::place::PlaceDetails;
use crate::storage::DestinationStore;
use crate::Result;

/// Map viewport: a center plus the visible span in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// Where the map starts before anything is selected
    pub const INITIAL: Region = Region {
        center: Coordinate {
            latitude: 37.78825,
            longitude: -122.4324,
        },
        latitude_delta: 0.0922,
        longitude_delta: 0.0421,
    };

    /// Street-level zoom around a selected place
    pub fn focused_on(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: 0.01,
            longitude_delta: 0.01,
        }
    }
}

/// The map-rendering collaborator
pub trait MapView {
    fn animate_to(&mut self, region: Region);
}

/// Where the flow currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Searching; nothing pending
    Browsing,
    /// A place is selected and awaits confirmation
    Confirming(NewDestination),
}

pub struct AddDestinationFlow<M: MapView> {
    map: M,
    state: FlowState,
}

impl<M: MapView> AddDestinationFlow<M> {
    pub fn new(mut map: M) -> Self {
        map.animate_to(Region::INITIAL);
        Self {
            map,
            state: FlowState::Browsing,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// The selection awaiting confirmation, if any
    pub fn pending(&self) -> Option<&NewDestination> {
        match &self.state {
            FlowState::Confirming(new) => Some(new),
            FlowState::Browsing => None,
        }
    }

    /// Handle a picked search result.
    ///
    /// Results without geometry are ignored and leave the state unchanged.
    /// Returns whether a confirmation is now pending for this place.
    pub fn select_place(&mut self, place: PlaceDetails) -> bool {
        let Some(new) = place.into_new_destination() else {
            tracing::debug!("ignoring place selection without geometry");
            return false;
        };

        self.map.animate_to(Region::focused_on(new.coordinate()));
        self.state = FlowState::Confirming(new);
        true
    }

    /// Dismiss the confirmation without saving
    pub fn cancel(&mut self) {
        self.state = FlowState::Browsing;
    }

    /// Save the pending selection.
    ///
    /// `Ok(None)` when nothing was pending. On failure the selection stays
    /// pending so the user can retry.
    pub async fn confirm(&mut self, store: &DestinationStore) -> Result<Option<Destination>> {
        let FlowState::Confirming(new) = &self.state else {
            return Ok(None);
        };

        let saved = store.create(new.clone()).await?;
        tracing::info!(id = %saved.id, name = %saved.name, "destination saved");
        self.state = FlowState::Browsing;
        Ok(Some(saved))
    }
}
