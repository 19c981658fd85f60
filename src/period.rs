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

//! Generation of the trips of one period.
//!
//! [`generate_period`] never modifies the period: its result is committed
//! with [`SchedulePeriod::apply_generation`].

use crate::configuration::GenerationConfig;
use crate::error::{ConfigurationError, GenerationError};
use crate::model::ReferenceData;
use crate::objects::{SchedulePeriod, Time, Trip, SECONDS_PER_HOUR};
use crate::strategy::{strategy_for, SimulationContext};
use tracing::info;

/// Outcome of the generation of a period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodGeneration {
    /// Trips in departure order
    pub trips: Vec<Trip>,
    /// Interval between outbound departures actually used
    pub calculated_interval_seconds: u32,
    /// Number of vehicles of the period, may be fractional in `Basic` mode
    pub calculated_number_of_units: f64,
    /// Departures skipped because no vehicle was available
    pub dropped_departures: u32,
}

fn hour_to_seconds(hour: f64) -> Result<u32, ConfigurationError> {
    let seconds = (hour * f64::from(SECONDS_PER_HOUR)).round();
    if seconds.is_finite() && seconds >= 0.0 && seconds <= f64::from(u32::MAX) {
        Ok(seconds as u32)
    } else {
        Err(ConfigurationError::InvalidHour(hour.to_string()))
    }
}

fn parse_time(time: &str) -> Result<u32, ConfigurationError> {
    time.parse::<Time>()
        .map(Time::total_seconds)
        .map_err(|_| ConfigurationError::InvalidTime(time.to_string()))
}

impl SchedulePeriod {
    /// Start and end of the period in seconds since midnight, the custom
    /// times taking precedence over the hours
    pub fn bounds(&self) -> Result<(u32, u32), ConfigurationError> {
        let start = match &self.custom_start_at_str {
            Some(time) => parse_time(time)?,
            None => hour_to_seconds(self.start_at_hour)?,
        };
        let end = match &self.custom_end_at_str {
            Some(time) => parse_time(time)?,
            None => hour_to_seconds(self.end_at_hour)?,
        };
        Ok((start, end))
    }

    /// Replace the trips and the calculated values by the ones of `generation`
    pub fn apply_generation(&mut self, generation: PeriodGeneration) -> &[Trip] {
        self.calculated_interval_seconds = Some(generation.calculated_interval_seconds);
        self.calculated_number_of_units = Some(generation.calculated_number_of_units);
        self.trips = generation.trips;
        &self.trips
    }
}

/// Generate the trips of `period` with the strategy of its calculation mode.
///
/// The configuration is checked before any simulation, in this order:
/// reference collections loaded, interval or number of units set, outbound
/// path set, paths found, custom times valid.
pub fn generate_period<R>(
    period: &SchedulePeriod,
    allow_seconds_based_schedules: bool,
    data: &R,
    config: &GenerationConfig,
) -> Result<PeriodGeneration, GenerationError>
where
    R: ReferenceData + ?Sized,
{
    if !data.is_loaded() {
        return Err(ConfigurationError::MissingCollections.into());
    }
    if period.interval_seconds.is_none() && period.number_of_units.is_none() {
        return Err(ConfigurationError::MissingIntervalOrUnits.into());
    }
    let outbound_path_id = period
        .outbound_path_id
        .as_deref()
        .ok_or(ConfigurationError::MissingOutboundPath)?;
    let outbound_path = data.path(outbound_path_id)?;
    let inbound_path = period
        .inbound_path_id
        .as_deref()
        .map(|path_id| data.path(path_id))
        .transpose()?;
    let (start_seconds, end_seconds) = period.bounds()?;

    let context = SimulationContext {
        start_seconds,
        end_seconds,
        outbound_path,
        inbound_path,
        allow_seconds_based_schedules,
        block_prefix: if config.assign_block_ids {
            Some(period.period_shortname.as_str())
        } else {
            None
        },
    };
    let calculation_mode = period.calculation_mode.unwrap_or_default();
    let strategy = strategy_for(calculation_mode);
    let requirements = strategy.calculate_resource_requirements(period, &context, config)?;
    let calculated_interval_seconds = requirements.outbound_interval_seconds;
    let generated = strategy.generate_trips(requirements, &context)?;

    info!(
        "{:?} generation of period {} from {} to {}: {} trip(s), {} vehicle(s), {} departure(s) dropped",
        calculation_mode,
        period.period_shortname,
        Time::from(start_seconds),
        Time::from(end_seconds),
        generated.trips.len(),
        generated.realized_fleet_size,
        generated.dropped_departures
    );
    Ok(PeriodGeneration {
        trips: generated.trips,
        calculated_interval_seconds,
        calculated_number_of_units: generated.realized_fleet_size,
        dropped_departures: generated.dropped_departures,
    })
}
