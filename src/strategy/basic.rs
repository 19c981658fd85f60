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

//! A single interval for both directions and a fixed cycle.
//!
//! Every vehicle runs the same cycle (outbound trip then inbound trip), the
//! vehicle `i` of `n` starting at the offset `ceil(i * cycle / n)` of its
//! cycle. A vehicle at the end of its cycle waits for the next second aligned
//! on the interval (counted from the start of the period) to start a new
//! outbound trip.
//!
//! Instead of advancing a clock second by second for each vehicle, which
//! costs `duration x fleet` iterations, each vehicle jumps from one trip
//! to the next one. The resulting trips are the same.

use super::{
    div_ceil, GeneratedTrips, ResourceRequirements, ScheduleStrategy, SimulationContext,
};
use crate::configuration::GenerationConfig;
use crate::error::{ConfigurationError, GenerationError};
use crate::objects::SchedulePeriod;
use crate::trip_builder::build_trip;
use crate::vehicle::{create_fleet, TravelDirection};
use tracing::debug;

/// Strategy of [`crate::objects::CalculationMode::Basic`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

/// A departure of the fixed cycle simulation: time, index of the vehicle
/// in the fleet and direction.
type Departure = (u32, usize, TravelDirection);

fn initial_time_in_cycle(index: usize, cycle_seconds: u32, nb_units: usize) -> u32 {
    let numerator = index as u64 * u64::from(cycle_seconds);
    let nb_units = nb_units as u64;
    ((numerator + nb_units - 1) / nb_units) as u32
}

struct FixedCycle {
    start: u32,
    end: u32,
    interval: u32,
    cycle: u32,
    outbound_total: u32,
    has_inbound_path: bool,
}

impl FixedCycle {
    /// Departures of one vehicle, `time_in_cycle` being its offset at the
    /// start of the period
    fn vehicle_departures(
        &self,
        index: usize,
        mut time_in_cycle: u32,
        departures: &mut Vec<Departure>,
    ) {
        let mut time = self.start;
        while time < self.end {
            if time_in_cycle >= self.cycle && (time - self.start) % self.interval == 0 {
                time_in_cycle = 0;
            }
            if time_in_cycle == 0 {
                departures.push((time, index, TravelDirection::Outbound));
            } else if self.has_inbound_path && time_in_cycle == self.outbound_total {
                departures.push((time, index, TravelDirection::Inbound));
            }
            let step = self.next_step(time, time_in_cycle);
            time = time.saturating_add(step);
            time_in_cycle = time_in_cycle.saturating_add(step);
        }
    }

    // Seconds until the vehicle reaches the inbound departure or can restart
    // its cycle, whichever comes first
    fn next_step(&self, time: u32, time_in_cycle: u32) -> u32 {
        let until_aligned_restart = {
            let min_step = self.cycle.saturating_sub(time_in_cycle).max(1);
            let elapsed = time - self.start + min_step;
            min_step + (self.interval - elapsed % self.interval) % self.interval
        };
        if self.has_inbound_path && time_in_cycle < self.outbound_total {
            until_aligned_restart.min(self.outbound_total - time_in_cycle)
        } else {
            until_aligned_restart
        }
    }
}

impl ScheduleStrategy for BasicStrategy {
    fn calculate_resource_requirements(
        &self,
        period: &SchedulePeriod,
        context: &SimulationContext<'_>,
        config: &GenerationConfig,
    ) -> Result<ResourceRequirements, ConfigurationError> {
        let cycle_seconds = context.cycle_seconds();
        let (nb_units, interval_seconds, calculated_number_of_units) =
            match (period.interval_seconds, period.number_of_units) {
                (Some(0), _) => return Err(ConfigurationError::NullInterval),
                // the number of units is ignored when an interval is set
                (Some(interval), _) => (
                    div_ceil(cycle_seconds, interval),
                    interval,
                    f64::from(cycle_seconds) / f64::from(interval),
                ),
                (None, Some(0)) => return Err(ConfigurationError::NullNumberOfUnits),
                (None, Some(nb_units)) => {
                    let interval = context.round_interval(div_ceil(cycle_seconds, nb_units));
                    (nb_units, interval, f64::from(nb_units))
                }
                (None, None) => return Err(ConfigurationError::MissingIntervalOrUnits),
            };
        if interval_seconds == 0 {
            return Err(ConfigurationError::NullInterval);
        }
        debug!(
            "{} vehicle(s) ({:.2}), interval {}s, cycle {}s",
            nb_units, calculated_number_of_units, interval_seconds, cycle_seconds
        );
        Ok(ResourceRequirements {
            fleet: create_fleet(nb_units, context.start_seconds, config),
            outbound_interval_seconds: interval_seconds,
            inbound_interval_seconds: 0,
            calculated_number_of_units,
        })
    }

    fn generate_trips(
        &self,
        requirements: ResourceRequirements,
        context: &SimulationContext<'_>,
    ) -> Result<GeneratedTrips, GenerationError> {
        let fixed_cycle = FixedCycle {
            start: context.start_seconds,
            end: context.end_seconds,
            interval: requirements.outbound_interval_seconds,
            cycle: context.cycle_seconds(),
            outbound_total: context.outbound_total_seconds(),
            has_inbound_path: context.inbound_path.is_some(),
        };
        let mut fleet = requirements.fleet;
        let nb_units = fleet.len();
        let mut departures = Vec::new();
        for (index, vehicle) in fleet.iter_mut().enumerate() {
            vehicle.time_in_cycle = initial_time_in_cycle(index, fixed_cycle.cycle, nb_units);
            fixed_cycle.vehicle_departures(index, vehicle.time_in_cycle, &mut departures);
        }
        departures.sort_unstable();

        let trips = departures
            .into_iter()
            .map(|(time, index, direction)| {
                let path = match (direction, context.inbound_path) {
                    (TravelDirection::Inbound, Some(inbound_path)) => inbound_path,
                    _ => context.outbound_path,
                };
                let vehicle = &fleet[index];
                build_trip(time, vehicle, path, context.block_id(vehicle.id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GeneratedTrips {
            trips,
            realized_fleet_size: requirements.calculated_number_of_units,
            dropped_departures: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Trip;
    use crate::strategy::tests::{context, round_trip_model};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn period(interval: Option<u32>, units: Option<u32>) -> SchedulePeriod {
        SchedulePeriod {
            period_shortname: "am_peak".to_string(),
            interval_seconds: interval,
            number_of_units: units,
            ..Default::default()
        }
    }

    fn departures(trips: &[Trip], path_id: &str) -> Vec<u32> {
        trips
            .iter()
            .filter(|trip| trip.path_id == path_id)
            .map(|trip| trip.departure_time_seconds)
            .collect()
    }

    // Second by second simulation, the reference of the fixed cycle
    fn reference_departures(fixed_cycle: &FixedCycle, nb_units: usize) -> Vec<Departure> {
        let mut time_in_cycle: Vec<u32> = (0..nb_units)
            .map(|index| initial_time_in_cycle(index, fixed_cycle.cycle, nb_units))
            .collect();
        let mut departures = vec![];
        for time in fixed_cycle.start..fixed_cycle.end {
            for (index, phase) in time_in_cycle.iter_mut().enumerate() {
                if *phase >= fixed_cycle.cycle
                    && (time - fixed_cycle.start) % fixed_cycle.interval == 0
                {
                    *phase = 0;
                }
                if *phase == 0 {
                    departures.push((time, index, TravelDirection::Outbound));
                } else if fixed_cycle.has_inbound_path && *phase == fixed_cycle.outbound_total {
                    departures.push((time, index, TravelDirection::Inbound));
                }
                *phase += 1;
            }
        }
        departures
    }

    fn event_driven_departures(fixed_cycle: &FixedCycle, nb_units: usize) -> Vec<Departure> {
        let mut departures = vec![];
        for index in 0..nb_units {
            let time_in_cycle = initial_time_in_cycle(index, fixed_cycle.cycle, nb_units);
            fixed_cycle.vehicle_departures(index, time_in_cycle, &mut departures);
        }
        departures.sort_unstable();
        departures
    }

    #[test]
    fn same_departures_as_second_by_second_simulation() {
        let cases = [
            // start, end, interval, outbound, inbound, with inbound path, units
            (0, 3600, 600, 1200, 0, false, 2),
            (25200, 32400, 600, 1800, 1500, true, 6),
            (25200, 32400, 720, 1800, 1500, true, 5),
            (21600, 36000, 420, 1234, 987, true, 6),
            (21600, 36000, 300, 1234, 987, true, 4),
            (0, 7200, 60, 0, 0, true, 1),
            (1000, 9000, 900, 2000, 0, true, 3),
            (1000, 9000, 1000, 1000, 1000, true, 2),
            (0, 5000, 7, 100, 33, true, 19),
        ];
        for (start, end, interval, outbound_total, inbound_total, has_inbound_path, nb_units) in
            cases.iter().copied()
        {
            let fixed_cycle = FixedCycle {
                start,
                end,
                interval,
                cycle: outbound_total + inbound_total,
                outbound_total,
                has_inbound_path,
            };
            assert_eq!(
                reference_departures(&fixed_cycle, nb_units),
                event_driven_departures(&fixed_cycle, nb_units),
                "interval {}, cycle {}+{}, {} units",
                interval,
                outbound_total,
                inbound_total,
                nb_units
            );
        }
    }

    #[test]
    fn number_of_units_from_interval() {
        let collections = round_trip_model(1200, 1000);
        let context = context(&collections, 0, 3600, true);
        let requirements = BasicStrategy
            .calculate_resource_requirements(
                &period(Some(600), Some(10)),
                &context,
                &GenerationConfig::default(),
            )
            .unwrap();
        assert_eq!(4, requirements.fleet.len());
        assert_eq!(600, requirements.outbound_interval_seconds);
        assert_eq!(0, requirements.inbound_interval_seconds);
        assert_relative_eq!(2200.0 / 600.0, requirements.calculated_number_of_units);
    }

    #[test]
    fn interval_from_number_of_units() {
        let collections = round_trip_model(1200, 1000);
        let mut context = context(&collections, 0, 3600, true);
        let config = GenerationConfig::default();
        let requirements = BasicStrategy
            .calculate_resource_requirements(&period(None, Some(3)), &context, &config)
            .unwrap();
        assert_eq!(3, requirements.fleet.len());
        assert_eq!(780, requirements.outbound_interval_seconds);
        assert_relative_eq!(3.0, requirements.calculated_number_of_units);

        context.allow_seconds_based_schedules = true;
        let requirements = BasicStrategy
            .calculate_resource_requirements(&period(None, Some(3)), &context, &config)
            .unwrap();
        assert_eq!(734, requirements.outbound_interval_seconds);
    }

    #[test]
    fn invalid_resources() {
        let collections = round_trip_model(1200, 1000);
        let context = context(&collections, 0, 3600, true);
        let config = GenerationConfig::default();
        assert_eq!(
            Err(ConfigurationError::MissingIntervalOrUnits),
            BasicStrategy.calculate_resource_requirements(&period(None, None), &context, &config)
        );
        assert_eq!(
            Err(ConfigurationError::NullInterval),
            BasicStrategy.calculate_resource_requirements(&period(Some(0), None), &context, &config)
        );
        assert_eq!(
            Err(ConfigurationError::NullNumberOfUnits),
            BasicStrategy.calculate_resource_requirements(&period(None, Some(0)), &context, &config)
        );
    }

    #[test]
    fn outbound_only_vehicles_staggered_by_their_offset() {
        let collections = round_trip_model(1200, 1000);
        let context = context(&collections, 0, 3600, false);
        let requirements = BasicStrategy
            .calculate_resource_requirements(
                &period(Some(600), None),
                &context,
                &GenerationConfig::default(),
            )
            .unwrap();
        assert_eq!(2, requirements.fleet.len());
        let generated = BasicStrategy.generate_trips(requirements, &context).unwrap();
        assert_eq!(
            vec![0, 600, 1200, 1800, 2400, 3000],
            departures(&generated.trips, "outbound")
        );
        assert!(departures(&generated.trips, "inbound").is_empty());
        assert_relative_eq!(2.0, generated.realized_fleet_size);
        assert_eq!(0, generated.dropped_departures);
    }

    #[test]
    fn round_trips_with_fractional_fleet() {
        let collections = round_trip_model(1200, 1000);
        let context = context(&collections, 0, 3600, true);
        let requirements = BasicStrategy
            .calculate_resource_requirements(
                &period(Some(600), None),
                &context,
                &GenerationConfig::default(),
            )
            .unwrap();
        let generated = BasicStrategy.generate_trips(requirements, &context).unwrap();
        // offsets 0, 550, 1100 and 1650 in a cycle of 2200 seconds
        assert_eq!(
            vec![0, 600, 1200, 1800, 2400, 3000],
            departures(&generated.trips, "outbound")
        );
        assert_eq!(
            vec![100, 650, 1200, 1800, 2400, 3000],
            departures(&generated.trips, "inbound")
        );
        assert_relative_eq!(2200.0 / 600.0, generated.realized_fleet_size);
        assert!(generated
            .trips
            .windows(2)
            .all(|trips| trips[0].departure_time_seconds <= trips[1].departure_time_seconds));
    }
}
