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

//! Each direction has its own interval. Departures of both directions are
//! merged in time order and served by the vehicle waiting at the right
//! terminus for the longest time.

use super::{
    div_ceil, GeneratedTrips, ResourceRequirements, ScheduleStrategy, SimulationContext,
};
use crate::configuration::GenerationConfig;
use crate::error::{ConfigurationError, GenerationError};
use crate::objects::{PathProfile, SchedulePeriod, Trip};
use crate::trip_builder::build_trip;
use crate::vehicle::{create_fleet, Location, TravelDirection, VehicleUnit};
use std::collections::BTreeSet;
use tracing::debug;

/// Strategy of [`crate::objects::CalculationMode::Asymmetric`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AsymmetricStrategy;

fn departure_times(first: u32, end: u32, interval: u32) -> Vec<u32> {
    (first..end).step_by(interval as usize).collect()
}

// Among the idle vehicles at the right terminus, the used one which arrived
// first, else the first unused one.
fn find_best_vehicle(
    fleet: &[VehicleUnit],
    direction: TravelDirection,
    time: u32,
) -> Option<usize> {
    let available = || {
        fleet
            .iter()
            .enumerate()
            .filter(move |(_, vehicle)| vehicle.is_available_for(direction, time))
    };
    available()
        .filter_map(|(index, vehicle)| vehicle.last_trip_end_time.map(|end| (end, index)))
        .min()
        .map(|(_, index)| index)
        .or_else(|| {
            available()
                .find(|(_, vehicle)| vehicle.last_trip_end_time.is_none())
                .map(|(index, _)| index)
        })
}

struct Simulation<'a, 'c> {
    context: &'c SimulationContext<'a>,
    fleet: Vec<VehicleUnit>,
    trips: Vec<Trip>,
    used_vehicles: BTreeSet<u32>,
    dropped_departures: u32,
}

impl<'a, 'c> Simulation<'a, 'c> {
    fn update_availability(&mut self, time: u32) {
        let has_inbound_path = self.context.inbound_path.is_some();
        for vehicle in &mut self.fleet {
            vehicle.update_availability(time, has_inbound_path);
        }
    }

    fn process_departure(
        &mut self,
        time: u32,
        direction: TravelDirection,
        path: &PathProfile,
    ) -> Result<(), GenerationError> {
        let index = match find_best_vehicle(&self.fleet, direction, time) {
            Some(index) => index,
            None => {
                debug!(
                    "no vehicle available for the {:?} departure at {}",
                    direction, time
                );
                self.dropped_departures += 1;
                return Ok(());
            }
        };
        let vehicle = &mut self.fleet[index];
        let block_id = self.context.block_id(vehicle.id);
        self.trips.push(build_trip(time, vehicle, path, block_id)?);
        vehicle.depart(direction, time, path.total_time_seconds());
        self.used_vehicles.insert(vehicle.id);
        Ok(())
    }
}

impl ScheduleStrategy for AsymmetricStrategy {
    fn calculate_resource_requirements(
        &self,
        period: &SchedulePeriod,
        context: &SimulationContext<'_>,
        config: &GenerationConfig,
    ) -> Result<ResourceRequirements, ConfigurationError> {
        let cycle_seconds = context.cycle_seconds();
        let (nb_units, outbound_interval_seconds, inbound_interval_seconds) =
            match (period.number_of_units, period.interval_seconds) {
                (Some(0), _) => return Err(ConfigurationError::NullNumberOfUnits),
                (Some(nb_units), _) => {
                    let interval = context.round_interval(div_ceil(cycle_seconds, nb_units));
                    (nb_units, interval, 0)
                }
                (None, Some(0)) => return Err(ConfigurationError::NullInterval),
                (None, Some(outbound_interval)) => {
                    let inbound_interval = period
                        .inbound_interval_seconds
                        .unwrap_or(config.return_interval_seconds);
                    let duration = context.duration_seconds();
                    let outbound_units = div_ceil(duration, outbound_interval);
                    let inbound_units = if inbound_interval == 0 {
                        0
                    } else {
                        div_ceil(duration, inbound_interval)
                    };
                    (
                        outbound_units.max(inbound_units),
                        outbound_interval,
                        inbound_interval,
                    )
                }
                (None, None) => return Err(ConfigurationError::MissingIntervalOrUnits),
            };
        if outbound_interval_seconds == 0 {
            return Err(ConfigurationError::NullInterval);
        }
        debug!(
            "{} vehicle(s), outbound interval {}s, inbound interval {}s",
            nb_units, outbound_interval_seconds, inbound_interval_seconds
        );
        Ok(ResourceRequirements {
            fleet: create_fleet(nb_units, context.start_seconds, config),
            outbound_interval_seconds,
            inbound_interval_seconds,
            calculated_number_of_units: f64::from(nb_units),
        })
    }

    fn generate_trips(
        &self,
        requirements: ResourceRequirements,
        context: &SimulationContext<'_>,
    ) -> Result<GeneratedTrips, GenerationError> {
        let outbound_interval = requirements.outbound_interval_seconds;
        let inbound_interval = match requirements.inbound_interval_seconds {
            0 => outbound_interval,
            interval => interval,
        };
        let start = context.start_seconds;
        let end = context.end_seconds;
        let start_from_destination =
            context.inbound_path.is_some() && inbound_interval < outbound_interval;

        let (outbound_departures, inbound_departures) = match context.inbound_path {
            Some(_) if start_from_destination => (
                departure_times(start + context.inbound_total_seconds(), end, outbound_interval),
                departure_times(start, end, inbound_interval),
            ),
            Some(_) => (
                departure_times(start, end, outbound_interval),
                departure_times(start + context.outbound_total_seconds(), end, inbound_interval),
            ),
            None => (departure_times(start, end, outbound_interval), vec![]),
        };

        let mut fleet = requirements.fleet;
        let starting_location = if start_from_destination {
            Location::Destination
        } else {
            Location::Origin
        };
        for vehicle in &mut fleet {
            vehicle.reset(starting_location, start);
        }

        let mut simulation = Simulation {
            context,
            fleet,
            trips: Vec::with_capacity(outbound_departures.len() + inbound_departures.len()),
            used_vehicles: BTreeSet::new(),
            dropped_departures: 0,
        };
        let mut outbound = outbound_departures.into_iter().peekable();
        let mut inbound = inbound_departures.into_iter().peekable();
        loop {
            let time = match (outbound.peek(), inbound.peek()) {
                (Some(&o), Some(&i)) => o.min(i),
                (Some(&o), None) => o,
                (None, Some(&i)) => i,
                (None, None) => break,
            };
            simulation.update_availability(time);
            if outbound.peek() == Some(&time) {
                outbound.next();
                simulation.process_departure(time, TravelDirection::Outbound, context.outbound_path)?;
            }
            if inbound.peek() == Some(&time) {
                inbound.next();
                if let Some(inbound_path) = context.inbound_path {
                    simulation.process_departure(time, TravelDirection::Inbound, inbound_path)?;
                }
            }
        }

        Ok(GeneratedTrips {
            realized_fleet_size: simulation.used_vehicles.len() as f64,
            trips: simulation.trips,
            dropped_departures: simulation.dropped_departures,
        })
    }
}
