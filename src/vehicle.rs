// Copyright (C) 2025 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Simulation state of the vehicles of a fleet.
//!
//! A fleet is a plain `Vec<VehicleUnit>` created for one generation and
//! dropped once the trips are built.

use crate::configuration::GenerationConfig;

/// Where a vehicle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// At the first node of the outbound path
    Origin,
    /// At the last node of the outbound path
    Destination,
    /// Running a trip
    InTransit,
}

/// Direction of the trip a vehicle is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TravelDirection {
    /// From the origin to the destination
    Outbound,
    /// From the destination back to the origin
    Inbound,
}

/// One vehicle of the fleet
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleUnit {
    /// From 1 to the fleet size
    pub id: u32,
    /// Total capacity copied on its trips
    pub total_capacity: u32,
    /// Seated capacity copied on its trips
    pub seated_capacity: u32,
    /// Current terminus, or in transit
    pub location: Location,
    /// Direction of the running trip, `None` when the vehicle is idle
    pub direction: Option<TravelDirection>,
    /// Arrival time of the running trip (or time from which the vehicle is available)
    pub expected_arrival_time: u32,
    /// End time of the last completed trip, `None` if the vehicle never ran
    pub last_trip_end_time: Option<u32>,
    /// Seconds elapsed in the cycle (fixed cycle simulation only)
    pub time_in_cycle: u32,
}

impl VehicleUnit {
    fn new(id: u32, available_at: u32, config: &GenerationConfig) -> Self {
        VehicleUnit {
            id,
            total_capacity: config.default_total_capacity,
            seated_capacity: config.default_seated_capacity,
            location: Location::Origin,
            direction: None,
            expected_arrival_time: available_at,
            last_trip_end_time: None,
            time_in_cycle: 0,
        }
    }

    /// Put back the vehicle at `location`, idle and never used
    pub fn reset(&mut self, location: Location, available_at: u32) {
        self.location = location;
        self.direction = None;
        self.expected_arrival_time = available_at;
        self.last_trip_end_time = None;
    }

    /// Update the location of the vehicle at `time`.
    ///
    /// A vehicle which arrived completes its trip at the terminus. Without
    /// inbound path, a vehicle standing at the destination goes back to the
    /// origin without running a trip.
    pub fn update_availability(&mut self, time: u32, has_inbound_path: bool) {
        if self.expected_arrival_time > time {
            return;
        }
        if !has_inbound_path && self.location == Location::Destination {
            self.location = Location::Origin;
            self.direction = None;
            self.last_trip_end_time = Some(time);
            return;
        }
        match self.direction {
            Some(TravelDirection::Outbound) => self.complete_trip(Location::Destination, time),
            Some(TravelDirection::Inbound) => self.complete_trip(Location::Origin, time),
            None => {}
        }
    }

    /// Whether the vehicle can start a trip in `direction` at `time`
    pub fn is_available_for(&self, direction: TravelDirection, time: u32) -> bool {
        let expected_location = match direction {
            TravelDirection::Outbound => Location::Origin,
            TravelDirection::Inbound => Location::Destination,
        };
        self.location == expected_location
            && self.direction.is_none()
            && self.last_trip_end_time.map_or(true, |end| end <= time)
    }

    /// Start a trip in `direction` lasting `duration` seconds
    pub fn depart(&mut self, direction: TravelDirection, time: u32, duration: u32) {
        self.direction = Some(direction);
        self.location = Location::InTransit;
        self.expected_arrival_time = time + duration;
    }

    fn complete_trip(&mut self, location: Location, time: u32) {
        self.location = location;
        self.direction = None;
        self.last_trip_end_time = Some(time);
    }
}

/// Create `count` vehicles at the origin, available from `available_at`
pub fn create_fleet(count: u32, available_at: u32, config: &GenerationConfig) -> Vec<VehicleUnit> {
    (1..=count)
        .map(|id| VehicleUnit::new(id, available_at, config))
        .collect()
}
