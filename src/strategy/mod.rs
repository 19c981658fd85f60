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

//! Resource allocation and trip scheduling strategies.
//!
//! A strategy first computes the fleet and the intervals needed by a period
//! ([`ScheduleStrategy::calculate_resource_requirements`]), then simulates
//! the departures of this fleet ([`ScheduleStrategy::generate_trips`]).

mod asymmetric;
mod basic;

pub use asymmetric::AsymmetricStrategy;
pub use basic::BasicStrategy;

use crate::configuration::GenerationConfig;
use crate::error::{ConfigurationError, GenerationError};
use crate::objects::{CalculationMode, PathProfile, SchedulePeriod, Trip};
use crate::vehicle::VehicleUnit;

/// Everything a simulation needs to know about the period being generated.
#[derive(Debug, Clone)]
pub struct SimulationContext<'a> {
    /// Start of the period, in seconds since midnight
    pub start_seconds: u32,
    /// End of the period (excluded), in seconds since midnight
    pub end_seconds: u32,
    /// Path of the outbound trips
    pub outbound_path: &'a PathProfile,
    /// Path of the inbound trips, outbound trips only when `None`
    pub inbound_path: Option<&'a PathProfile>,
    /// Intervals are rounded up to the minute unless set
    pub allow_seconds_based_schedules: bool,
    /// When set, the trips of a vehicle get the block id `<prefix>:<vehicle id>`
    pub block_prefix: Option<&'a str>,
}

impl<'a> SimulationContext<'a> {
    /// Total time of an outbound trip, layover included
    pub fn outbound_total_seconds(&self) -> u32 {
        self.outbound_path.total_time_seconds()
    }

    /// 0 without inbound path
    pub fn inbound_total_seconds(&self) -> u32 {
        self.inbound_path
            .map(PathProfile::total_time_seconds)
            .unwrap_or(0)
    }

    /// Time for a vehicle to run an outbound and an inbound trip
    pub fn cycle_seconds(&self) -> u32 {
        self.outbound_total_seconds() + self.inbound_total_seconds()
    }

    /// Length of the period, 0 if it ends before its start
    pub fn duration_seconds(&self) -> u32 {
        self.end_seconds.saturating_sub(self.start_seconds)
    }

    /// Block id of the trips run by vehicle `vehicle_id`
    pub fn block_id(&self, vehicle_id: u32) -> Option<String> {
        self.block_prefix
            .map(|prefix| format!("{}:{}", prefix, vehicle_id))
    }

    /// Round an interval up to the minute, unless seconds are allowed
    pub fn round_interval(&self, interval_seconds: u32) -> u32 {
        if self.allow_seconds_based_schedules {
            interval_seconds
        } else {
            div_ceil(interval_seconds, 60) * 60
        }
    }
}

/// Fleet and intervals computed for a period
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequirements {
    /// Fresh vehicles at the origin, available at the period start
    pub fleet: Vec<VehicleUnit>,
    /// Interval between two outbound departures
    pub outbound_interval_seconds: u32,
    /// Interval between two inbound departures, 0 to use the outbound one
    pub inbound_interval_seconds: u32,
    /// Fleet size to display, may be fractional
    pub calculated_number_of_units: f64,
}

/// Result of a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTrips {
    /// Trips in departure order
    pub trips: Vec<Trip>,
    /// Number of vehicles reported for the period
    pub realized_fleet_size: f64,
    /// Departures skipped because no vehicle was available
    pub dropped_departures: u32,
}

/// A resource allocator paired with its trip scheduler.
pub trait ScheduleStrategy {
    /// Compute the fleet and the intervals of `period`
    fn calculate_resource_requirements(
        &self,
        period: &SchedulePeriod,
        context: &SimulationContext<'_>,
        config: &GenerationConfig,
    ) -> Result<ResourceRequirements, ConfigurationError>;

    /// Simulate the departures of the fleet and build the trips
    fn generate_trips(
        &self,
        requirements: ResourceRequirements,
        context: &SimulationContext<'_>,
    ) -> Result<GeneratedTrips, GenerationError>;
}

/// The strategy implementing a calculation mode
pub fn strategy_for(mode: CalculationMode) -> &'static dyn ScheduleStrategy {
    match mode {
        CalculationMode::Asymmetric => &AsymmetricStrategy,
        CalculationMode::Basic => &BasicStrategy,
    }
}

pub(crate) fn div_ceil(numerator: u32, denominator: u32) -> u32 {
    (numerator + denominator - 1) / denominator
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Collections;
    use crate::model::ReferenceData;
    use crate::model_builder::ModelBuilder;
    use pretty_assertions::assert_eq;

    /// Outbound and inbound paths of 3 nodes with the given total times
    pub(crate) fn round_trip_model(outbound_total: u32, inbound_total: u32) -> Collections {
        ModelBuilder::default()
            .path("outbound", |p| {
                p.uniform(&["A", "B", "C"], 100, 10)
                    .operating_time(outbound_total);
            })
            .path("inbound", |p| {
                p.direction(crate::objects::PathDirection::Inbound)
                    .uniform(&["C", "B", "A"], 100, 10)
                    .operating_time(inbound_total);
            })
            .build()
    }

    pub(crate) fn context<'a>(
        collections: &'a Collections,
        start_seconds: u32,
        end_seconds: u32,
        with_inbound: bool,
    ) -> SimulationContext<'a> {
        SimulationContext {
            start_seconds,
            end_seconds,
            outbound_path: collections.path("outbound").unwrap(),
            inbound_path: if with_inbound {
                Some(collections.path("inbound").unwrap())
            } else {
                None
            },
            allow_seconds_based_schedules: false,
            block_prefix: None,
        }
    }

    #[test]
    fn cycle_without_inbound_path() {
        let collections = round_trip_model(1200, 1000);
        let context = context(&collections, 0, 3600, false);
        assert_eq!(1200, context.cycle_seconds());
        let context = SimulationContext {
            inbound_path: Some(collections.path("inbound").unwrap()),
            ..context
        };
        assert_eq!(2200, context.cycle_seconds());
    }

    #[test]
    fn interval_rounding() {
        let collections = round_trip_model(1200, 1000);
        let mut context = context(&collections, 0, 3600, true);
        assert_eq!(780, context.round_interval(734));
        assert_eq!(720, context.round_interval(720));
        context.allow_seconds_based_schedules = true;
        assert_eq!(734, context.round_interval(734));
    }

    #[test]
    fn block_ids() {
        let collections = round_trip_model(1200, 1000);
        let mut context = context(&collections, 0, 3600, true);
        assert_eq!(None, context.block_id(1));
        context.block_prefix = Some("am_peak");
        assert_eq!(Some("am_peak:3".to_string()), context.block_id(3));
    }

    #[test]
    fn ceil_division() {
        assert_eq!(2, div_ceil(3600, 1800));
        assert_eq!(3, div_ceil(3601, 1800));
        assert_eq!(0, div_ceil(0, 1800));
    }
}
