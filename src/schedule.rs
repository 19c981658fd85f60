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

//! The schedule of a line for a service, and the generation of its periods.

use crate::configuration::GenerationConfig;
use crate::error::{GenerationError, ValidationError};
use crate::model::{default_paths, ReferenceData};
use crate::objects::{SchedulePeriod, Trip};
use crate::period::generate_period;
use crate::report::{GenerationReport, GenerationReportCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

/// The periods of a line for one service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    /// Line of the schedule
    pub line_id: String,
    /// Service (days of operation) of the schedule
    pub service_id: String,
    /// Group of periods the periods belong to (for example "weekday")
    #[serde(default)]
    pub periods_group_shortname: Option<String>,
    /// Allow intervals which are not a whole number of minutes
    #[serde(default)]
    pub allow_seconds_based_schedules: bool,
    /// Periods in chronological order
    #[serde(default)]
    pub periods: Vec<SchedulePeriod>,
}

impl Schedule {
    /// Find a period by its shortname
    pub fn period(&self, period_shortname: &str) -> Option<&SchedulePeriod> {
        self.periods
            .iter()
            .find(|period| period.period_shortname == period_shortname)
    }

    /// Find a period by its shortname
    pub fn period_mut(&mut self, period_shortname: &str) -> Option<&mut SchedulePeriod> {
        self.periods
            .iter_mut()
            .find(|period| period.period_shortname == period_shortname)
    }

    /// Number of trips of all the periods
    pub fn trips_count(&self) -> usize {
        self.periods.iter().map(|period| period.trips.len()).sum()
    }

    /// Paths referenced by the periods or followed by their trips
    pub fn associated_path_ids(&self) -> BTreeSet<&str> {
        self.periods
            .iter()
            .flat_map(|period| {
                period
                    .outbound_path_id
                    .iter()
                    .chain(period.inbound_path_id.iter())
                    .map(String::as_str)
                    .chain(period.trips.iter().map(|trip| trip.path_id.as_str()))
            })
            .collect()
    }

    /// Check the consistency of the schedule
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.service_id.is_empty() {
            return Err(ValidationError::MissingServiceId(self.line_id.clone()));
        }
        if self
            .periods_group_shortname
            .as_deref()
            .map_or(true, str::is_empty)
        {
            return Err(ValidationError::MissingPeriodsGroup(self.line_id.clone()));
        }
        let mut shortnames = HashSet::new();
        for period in &self.periods {
            if period.interval_seconds.is_some() && period.number_of_units.is_some() {
                return Err(ValidationError::IntervalAndNumberOfUnits(
                    period.period_shortname.clone(),
                ));
            }
            if !shortnames.insert(period.period_shortname.as_str()) {
                return Err(ValidationError::DuplicatedPeriod(
                    period.period_shortname.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Set the default outbound and inbound paths of the line on a period.
    ///
    /// See [`crate::model::default_paths`]. A path id is left unchanged when
    /// the line has no candidate path.
    pub fn assign_default_paths<R>(
        &mut self,
        period_shortname: &str,
        data: &R,
    ) -> Result<(), GenerationError>
    where
        R: ReferenceData + ?Sized,
    {
        let (outbound_path, inbound_path) = default_paths(data, &self.line_id);
        let period = self
            .period_mut(period_shortname)
            .ok_or_else(|| GenerationError::UnknownPeriod(period_shortname.to_string()))?;
        if let Some(outbound_path) = outbound_path {
            period.outbound_path_id = Some(outbound_path.id.clone());
        }
        if let Some(inbound_path) = inbound_path {
            period.inbound_path_id = Some(inbound_path.id.clone());
        }
        Ok(())
    }

    fn period_index(&self, period_shortname: &str) -> Result<usize, GenerationError> {
        self.periods
            .iter()
            .position(|period| period.period_shortname == period_shortname)
            .ok_or_else(|| GenerationError::UnknownPeriod(period_shortname.to_string()))
    }

    // Returns the number of dropped departures
    fn generate_at<R>(
        &mut self,
        index: usize,
        data: &R,
        config: &GenerationConfig,
    ) -> Result<u32, GenerationError>
    where
        R: ReferenceData + ?Sized,
    {
        let generation = generate_period(
            &self.periods[index],
            self.allow_seconds_based_schedules,
            data,
            config,
        )?;
        let dropped_departures = generation.dropped_departures;
        self.periods[index].apply_generation(generation);
        Ok(dropped_departures)
    }

    /// Generate the trips of a period, replacing its previous trips.
    ///
    /// On error, the period is left untouched.
    pub fn generate_for_period<R>(
        &mut self,
        period_shortname: &str,
        data: &R,
        config: &GenerationConfig,
    ) -> Result<&[Trip], GenerationError>
    where
        R: ReferenceData + ?Sized,
    {
        let index = self.period_index(period_shortname)?;
        self.generate_at(index, data, config)?;
        Ok(&self.periods[index].trips)
    }

    /// Generate the trips of every period, each one independently.
    ///
    /// A period which cannot be generated keeps its previous trips, the
    /// error is only logged.
    pub fn update_for_all_periods<R>(&mut self, data: &R, config: &GenerationConfig)
    where
        R: ReferenceData + ?Sized,
    {
        for index in 0..self.periods.len() {
            if let Err(error) = self.generate_at(index, data, config) {
                warn!(
                    "line {}: generation of period {} failed: {}",
                    data.line_shortname(&self.line_id),
                    self.periods[index].period_shortname,
                    error
                );
            }
        }
    }
}

fn generate_with_report<R>(
    schedule: &mut Schedule,
    period_shortname: &str,
    data: &R,
    config: &GenerationConfig,
    report: &mut GenerationReport,
) where
    R: ReferenceData + ?Sized,
{
    let line = data.line_shortname(&schedule.line_id);
    let generation = schedule
        .period_index(period_shortname)
        .and_then(|index| schedule.generate_at(index, data, config));
    match generation {
        Ok(0) => {}
        Ok(dropped_departures) => {
            let message = format!(
                "line {} (service {}), period {}: {} departure(s) without vehicle",
                line, schedule.service_id, period_shortname, dropped_departures
            );
            warn!("{}", message);
            report.add_warning(message, GenerationReportCategory::DroppedDepartures);
        }
        Err(error) => {
            let message = format!(
                "line {} (service {}), period {}: {}",
                line, schedule.service_id, period_shortname, error
            );
            warn!("{}", message);
            report.add_error(message, GenerationReportCategory::from(&error));
        }
    }
}

/// Generate a period of several schedules, or all their periods when
/// `period_shortname` is `None`.
///
/// The outcome of each generation is recorded in the returned report.
pub fn generate_batch<R>(
    schedules: &mut [Schedule],
    period_shortname: Option<&str>,
    data: &R,
    config: &GenerationConfig,
) -> GenerationReport
where
    R: ReferenceData + ?Sized,
{
    let mut report = GenerationReport::default();
    for schedule in schedules.iter_mut() {
        if let Err(error) = schedule.validate() {
            warn!("{}", error);
            report.add_error(error.to_string(), GenerationReportCategory::InvalidSchedule);
            continue;
        }
        match period_shortname {
            Some(period_shortname) => {
                generate_with_report(schedule, period_shortname, data, config, &mut report)
            }
            None => {
                let shortnames: Vec<String> = schedule
                    .periods
                    .iter()
                    .map(|period| period.period_shortname.clone())
                    .collect();
                for shortname in shortnames {
                    generate_with_report(schedule, &shortname, data, config, &mut report);
                }
            }
        }
    }
    info!(
        "{} schedule(s) generated, {} error(s), {} warning(s)",
        schedules.len(),
        report.errors_count(),
        report.warnings_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::model::Collections;
    use crate::model_builder::ModelBuilder;
    use crate::objects::{CalculationMode, PathDirection};
    use pretty_assertions::assert_eq;

    fn collections() -> Collections {
        ModelBuilder::default()
            .path("outbound", |p| {
                p.uniform(&["A", "B", "C"], 800, 100);
            })
            .path("inbound", |p| {
                p.direction(PathDirection::Inbound)
                    .uniform(&["C", "B", "A"], 800, 100);
            })
            .build()
    }

    fn period(shortname: &str, start_at_hour: f64, end_at_hour: f64) -> SchedulePeriod {
        SchedulePeriod {
            period_shortname: shortname.to_string(),
            calculation_mode: Some(CalculationMode::Asymmetric),
            outbound_path_id: Some("outbound".to_string()),
            inbound_path_id: Some("inbound".to_string()),
            number_of_units: Some(2),
            start_at_hour,
            end_at_hour,
            ..Default::default()
        }
    }

    fn schedule() -> Schedule {
        Schedule {
            line_id: "L1".to_string(),
            service_id: "week".to_string(),
            periods_group_shortname: Some("default".to_string()),
            allow_seconds_based_schedules: false,
            periods: vec![period("am_peak", 7.0, 9.0), period("midday", 9.0, 15.0)],
        }
    }

    #[test]
    fn generate_one_period() {
        let mut schedule = schedule();
        let trips = schedule
            .generate_for_period("am_peak", &collections(), &GenerationConfig::default())
            .unwrap();
        assert_eq!(7, trips.len());
        assert_eq!(7, schedule.trips_count());
        assert!(schedule.period("midday").unwrap().trips.is_empty());
        assert_eq!(
            Some(1800),
            schedule.period("am_peak").unwrap().calculated_interval_seconds
        );
    }

    #[test]
    fn unknown_period() {
        let mut schedule = schedule();
        assert_eq!(
            Err(GenerationError::UnknownPeriod("pm_peak".to_string())),
            schedule.generate_for_period("pm_peak", &collections(), &GenerationConfig::default())
        );
    }

    #[test]
    fn failed_generation_keeps_previous_trips() {
        let mut schedule = schedule();
        let collections = collections();
        let config = GenerationConfig::default();
        schedule
            .generate_for_period("am_peak", &collections, &config)
            .unwrap();
        let previous = schedule.period("am_peak").unwrap().clone();

        let period = schedule.period_mut("am_peak").unwrap();
        period.number_of_units = None;
        period.interval_seconds = None;
        assert_eq!(
            Err(GenerationError::Configuration(
                ConfigurationError::MissingIntervalOrUnits
            )),
            schedule.generate_for_period("am_peak", &collections, &config)
        );
        let period = schedule.period("am_peak").unwrap();
        assert_eq!(previous.trips, period.trips);
        assert_eq!(previous.calculated_interval_seconds, period.calculated_interval_seconds);
    }

    #[test]
    fn update_all_periods_despite_errors() {
        testing_logger::setup();
        let mut schedule = schedule();
        schedule.periods.insert(
            1,
            SchedulePeriod {
                outbound_path_id: Some("unknown".to_string()),
                ..period("broken", 9.0, 10.0)
            },
        );
        schedule.update_for_all_periods(&collections(), &GenerationConfig::default());

        assert_eq!(7, schedule.period("am_peak").unwrap().trips.len());
        assert!(schedule.period("broken").unwrap().trips.is_empty());
        assert!(!schedule.period("midday").unwrap().trips.is_empty());
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|captured_log| captured_log.level == log::Level::Warn)
                .collect();
            assert_eq!(1, warnings.len());
            assert!(warnings[0]
                .body
                .contains("line L1: generation of period broken failed: path unknown not found"));
        });
    }

    #[test]
    fn schedule_validation() {
        assert_eq!(Ok(()), schedule().validate());

        let mut invalid = schedule();
        invalid.service_id = String::new();
        assert_eq!(
            Err(ValidationError::MissingServiceId("L1".to_string())),
            invalid.validate()
        );

        let mut invalid = schedule();
        invalid.periods_group_shortname = None;
        assert_eq!(
            Err(ValidationError::MissingPeriodsGroup("L1".to_string())),
            invalid.validate()
        );

        let mut invalid = schedule();
        invalid.periods[1].interval_seconds = Some(600);
        assert_eq!(
            Err(ValidationError::IntervalAndNumberOfUnits("midday".to_string())),
            invalid.validate()
        );

        let mut invalid = schedule();
        invalid.periods[1].period_shortname = "am_peak".to_string();
        assert_eq!(
            Err(ValidationError::DuplicatedPeriod("am_peak".to_string())),
            invalid.validate()
        );
    }

    #[test]
    fn associated_paths() {
        let mut schedule = schedule();
        schedule.periods[1].inbound_path_id = None;
        let path_ids: Vec<_> = schedule.associated_path_ids().into_iter().collect();
        assert_eq!(vec!["inbound", "outbound"], path_ids);
    }

    #[test]
    fn default_paths_of_the_line() {
        let mut schedule = schedule();
        let period = schedule.period_mut("midday").unwrap();
        period.outbound_path_id = None;
        period.inbound_path_id = None;
        schedule
            .assign_default_paths("midday", &collections())
            .unwrap();
        let period = schedule.period("midday").unwrap();
        assert_eq!(Some("outbound"), period.outbound_path_id.as_deref());
        assert_eq!(Some("inbound"), period.inbound_path_id.as_deref());
        assert!(schedule
            .assign_default_paths("night", &collections())
            .is_err());
    }

    #[test]
    fn batch_report() {
        let collections = collections();
        let mut invalid = schedule();
        invalid.service_id = String::new();
        let mut other_line = schedule();
        other_line.line_id = "L2".to_string();
        other_line.service_id = "sunday".to_string();
        other_line.periods[0].number_of_units = None;
        other_line.periods[0].interval_seconds = Some(600);
        other_line.periods[0].inbound_interval_seconds = Some(1800);
        let mut schedules = vec![schedule(), invalid, other_line];

        let report = generate_batch(
            &mut schedules,
            Some("am_peak"),
            &collections,
            &GenerationConfig::default(),
        );
        assert_eq!(1, report.errors_count());
        assert_eq!(0, report.warnings_count());
        assert_eq!(7, schedules[0].trips_count());
        assert_eq!(0, schedules[1].trips_count());
        assert!(schedules[2].trips_count() > 0);

        let report = generate_batch(
            &mut schedules,
            Some("pm_peak"),
            &collections,
            &GenerationConfig::default(),
        );
        assert_eq!(3, report.errors_count());
    }
}
