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

//! The `transit_schedule` crate generates the trips of a transit line from
//! the configuration of its service periods.
//!
//! For each period of a [`Schedule`], a headway (interval between two
//! departures) or a fleet size (number of vehicles) is configured. Given the
//! travel and dwell times of the outbound path (and optionally of the inbound
//! path), the engine allocates a fleet of vehicles and simulates their
//! departures to build every [`objects::Trip`] with its times at each node.
//!
//! Two calculation modes are available, see [`objects::CalculationMode`]:
//! - `Basic`: a fixed cycle shared by every vehicle, one headway for both
//!   directions;
//! - `Asymmetric`: an event-driven simulation where each direction can have
//!   its own headway and vehicles are reused at each terminus.

#![deny(missing_docs)]

pub mod configuration;
pub mod error;
pub mod model;
#[doc(hidden)]
pub mod model_builder;
pub mod objects;
pub mod period;
pub mod read_utils;
pub mod report;
pub mod schedule;
pub mod strategy;
#[doc(hidden)]
pub mod test_utils;
pub mod trip_builder;
pub mod vehicle;
mod version_utils;
pub mod write;

pub use version_utils::{binary_full_version, GIT_VERSION};

/// The error type used by the crate for I/O operations.
pub type Error = anyhow::Error;

/// The corresponding result type used by the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use crate::configuration::GenerationConfig;
pub use crate::error::{ConfigurationError, GenerationError, ValidationError};
pub use crate::model::{Collections, ReferenceData};
pub use crate::schedule::Schedule;
