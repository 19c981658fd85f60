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

//! The different objects contained in the schedule model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use typed_index_collection::Id;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: u32 = 3600;

/// A time of the day, in seconds since midnight.
///
/// Hours can go beyond 23 for services running after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(u32);

impl Time {
    /// Create a `Time` from hours, minutes and seconds.
    pub fn new(h: u32, m: u32, s: u32) -> Time {
        Time(h * SECONDS_PER_HOUR + m * 60 + s)
    }
    /// Hours part of the time
    pub fn hours(self) -> u32 {
        self.0 / SECONDS_PER_HOUR
    }
    /// Minutes part of the time
    pub fn minutes(self) -> u32 {
        self.0 / 60 % 60
    }
    /// Seconds part of the time
    pub fn seconds(self) -> u32 {
        self.0 % 60
    }
    /// Number of seconds since midnight
    pub fn total_seconds(self) -> u32 {
        self.0
    }
}

impl From<u32> for Time {
    fn from(seconds: u32) -> Self {
        Time(seconds)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

/// Error while parsing a [`Time`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    /// Not of the form `HH:MM` or `HH:MM:SS`
    #[error("wrong time format, expected HH:MM or HH:MM:SS")]
    WrongFormat,
    /// Minutes or seconds greater than 59
    #[error("wrong time value")]
    WrongValue,
}

impl FromStr for Time {
    type Err = TimeError;
    fn from_str(time: &str) -> Result<Self, Self::Err> {
        let parts = time
            .trim()
            .split(':')
            .map(|part| part.parse::<u32>().map_err(|_| TimeError::WrongFormat))
            .collect::<Result<Vec<_>, _>>()?;
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m] => (*h, *m, 0),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(TimeError::WrongFormat),
        };
        if minutes > 59 || seconds > 59 {
            return Err(TimeError::WrongValue);
        }
        hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|total| total.checked_add(minutes * 60 + seconds))
            .map(Time)
            .ok_or(TimeError::WrongValue)
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let time = String::deserialize(deserializer)?;
        time.parse().map_err(serde::de::Error::custom)
    }
}

/// A transit line, as known by the routing subsystem.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Identifier of the line
    pub id: String,
    /// Short name displayed to the users (for example "12")
    pub shortname: String,
    /// Long name of the line
    #[serde(default)]
    pub name: Option<String>,
}

impl Id<Line> for Line {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Direction of a path within its line
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PathDirection {
    #[default]
    /// From the first terminus to the second one
    Outbound,
    /// From the second terminus back to the first one
    Inbound,
    /// The path comes back to its first node
    Loop,
    /// Partial or exceptional service
    Other,
}

/// A segment between two consecutive nodes of a path
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PathSegment {
    /// Travel time from the node to the next one
    pub travel_time_seconds: u32,
    /// Length of the segment
    #[serde(default)]
    pub distance_meters: Option<u32>,
}

/// Travel and dwell time profile of a path, computed by the routing.
///
/// For `n` nodes, a valid profile has `n - 1` segments and at least `n - 1`
/// dwell times (the dwell time at the last node is never used).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PathProfile {
    /// Identifier of the path
    pub id: String,
    /// Line of the path
    pub line_id: String,
    /// Direction of the path
    #[serde(default)]
    pub direction: PathDirection,
    /// Ordered identifiers of the nodes served by the path
    pub nodes: Vec<String>,
    /// Segments between consecutive nodes
    #[serde(default)]
    pub segments: Vec<PathSegment>,
    /// Time spent at each node before departing
    #[serde(default)]
    pub dwell_time_seconds: Vec<u32>,
    /// Total time of a trip on this path, including the layover at the terminus
    #[serde(default)]
    pub operating_time_with_layover_time_seconds: Option<u32>,
}

impl PathProfile {
    /// Total one-way time used by the schedule calculations (0 when the
    /// routing did not provide it).
    pub fn total_time_seconds(&self) -> u32 {
        self.operating_time_with_layover_time_seconds.unwrap_or(0)
    }

    /// Whether this path can be used as an outbound path
    pub fn is_outbound_like(&self) -> bool {
        matches!(
            self.direction,
            PathDirection::Outbound | PathDirection::Loop | PathDirection::Other
        )
    }
}

impl Id<PathProfile> for PathProfile {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Selects the resource allocation and trip generation strategy of a period.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    /// Each direction has its own interval, vehicles are reused at each terminus
    Asymmetric,
    /// A single interval and a fixed cycle for every vehicle
    #[default]
    Basic,
}

/// A trip generated for a period.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    /// Identifier of the trip
    pub id: String,
    /// Path followed by the trip
    pub path_id: String,
    /// Unit (driver or vehicle) assigned to the trip, never set by the generation
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Identifier grouping the trips run in sequence by the same vehicle
    #[serde(default)]
    pub block_id: Option<String>,
    /// Departure time at the first node, in seconds since midnight
    pub departure_time_seconds: u32,
    /// Arrival time at the last node, in seconds since midnight
    pub arrival_time_seconds: u32,
    /// Total capacity of the vehicle running the trip
    pub total_capacity: Option<u32>,
    /// Seated capacity of the vehicle running the trip
    pub seated_capacity: Option<u32>,
    /// Arrival time at each node, `None` at the first node
    pub node_arrival_times_seconds: Vec<Option<u32>>,
    /// Departure time from each node, `None` at the last node
    pub node_departure_times_seconds: Vec<Option<u32>>,
    /// Whether passengers can board at each node
    pub nodes_can_board: Vec<bool>,
    /// Whether passengers can alight at each node
    pub nodes_can_unboard: Vec<bool>,
}

/// A time window of a schedule with its own configuration and trips.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SchedulePeriod {
    /// Identifier of the period, unique within its schedule
    pub period_shortname: String,
    /// Strategy used to generate the trips, `Basic` when unset
    #[serde(default)]
    pub calculation_mode: Option<CalculationMode>,
    /// Path used by the outbound trips
    #[serde(default)]
    pub outbound_path_id: Option<String>,
    /// Path used by the inbound trips
    #[serde(default)]
    pub inbound_path_id: Option<String>,
    /// Configured interval between outbound departures
    #[serde(default)]
    pub interval_seconds: Option<u32>,
    /// Configured interval between inbound departures
    #[serde(default)]
    pub inbound_interval_seconds: Option<u32>,
    /// Configured fleet size
    #[serde(default)]
    pub number_of_units: Option<u32>,
    /// Interval computed by the last generation
    #[serde(default)]
    pub calculated_interval_seconds: Option<u32>,
    /// Fleet size computed by the last generation, may be fractional
    #[serde(default)]
    pub calculated_number_of_units: Option<f64>,
    /// Start of the period, in hours since midnight
    pub start_at_hour: f64,
    /// End of the period, in hours since midnight
    pub end_at_hour: f64,
    /// Start time overriding `start_at_hour` (`HH:MM` or `HH:MM:SS`)
    #[serde(default)]
    pub custom_start_at_str: Option<String>,
    /// End time overriding `end_at_hour` (`HH:MM` or `HH:MM:SS`)
    #[serde(default)]
    pub custom_end_at_str: Option<String>,
    /// Trips of the last successful generation
    #[serde(default)]
    pub trips: Vec<Trip>,
}
