// Copyright (C) 2017 Hove and/or its affiliates.
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

//! Writers of the generated trips (CSV), of the schedules and of the report
//! (JSON).

use crate::model::ReferenceData;
use crate::objects::Time;
use crate::report::{Report, ReportCategory};
use crate::schedule::Schedule;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path;
use tracing::info;

#[derive(Serialize)]
struct TripRow<'a> {
    trip_id: &'a str,
    line_id: &'a str,
    service_id: &'a str,
    period_shortname: &'a str,
    path_id: &'a str,
    block_id: Option<&'a str>,
    departure_time: Time,
    arrival_time: Time,
    total_capacity: Option<u32>,
    seated_capacity: Option<u32>,
}

#[derive(Serialize)]
struct StopTimeRow<'a> {
    trip_id: &'a str,
    node_id: &'a str,
    stop_sequence: usize,
    arrival_time: Option<Time>,
    departure_time: Option<Time>,
    can_board: u8,
    can_unboard: u8,
}

/// Write `trips.csv` and `stop_times.csv` in `path` with the trips of every
/// period of `schedules`.
///
/// The nodes of the stop times are the ones of the path of each trip.
pub fn write_trips_and_stop_times<R>(
    path: &path::Path,
    schedules: &[Schedule],
    data: &R,
) -> Result<()>
where
    R: ReferenceData + ?Sized,
{
    info!("Writing trips.csv and stop_times.csv");
    let trip_path = path.join("trips.csv");
    let stop_times_path = path.join("stop_times.csv");
    let mut trip_wtr = csv::Writer::from_path(&trip_path)
        .with_context(|| format!("Error reading {:?}", trip_path))?;
    let mut st_wtr = csv::Writer::from_path(&stop_times_path)
        .with_context(|| format!("Error reading {:?}", stop_times_path))?;
    for schedule in schedules {
        for period in &schedule.periods {
            for trip in &period.trips {
                trip_wtr
                    .serialize(TripRow {
                        trip_id: &trip.id,
                        line_id: &schedule.line_id,
                        service_id: &schedule.service_id,
                        period_shortname: &period.period_shortname,
                        path_id: &trip.path_id,
                        block_id: trip.block_id.as_deref(),
                        departure_time: Time::from(trip.departure_time_seconds),
                        arrival_time: Time::from(trip.arrival_time_seconds),
                        total_capacity: trip.total_capacity,
                        seated_capacity: trip.seated_capacity,
                    })
                    .with_context(|| format!("Error reading {:?}", trip_path))?;

                let trip_path_profile = data
                    .path(&trip.path_id)
                    .with_context(|| format!("Unable to write the stop times of trip {}", trip.id))?;
                for (sequence, node_id) in trip_path_profile.nodes.iter().enumerate() {
                    let time_at = |times: &[Option<u32>]| {
                        times.get(sequence).copied().flatten().map(Time::from)
                    };
                    let flag_at = |flags: &[bool]| flags.get(sequence).copied().unwrap_or(false) as u8;
                    st_wtr
                        .serialize(StopTimeRow {
                            trip_id: &trip.id,
                            node_id,
                            stop_sequence: sequence,
                            arrival_time: time_at(&trip.node_arrival_times_seconds),
                            departure_time: time_at(&trip.node_departure_times_seconds),
                            can_board: flag_at(&trip.nodes_can_board),
                            can_unboard: flag_at(&trip.nodes_can_unboard),
                        })
                        .with_context(|| format!("Error reading {:?}", stop_times_path))?;
                }
            }
        }
    }
    st_wtr
        .flush()
        .with_context(|| format!("Error reading {:?}", stop_times_path))?;
    trip_wtr
        .flush()
        .with_context(|| format!("Error reading {:?}", trip_path))?;

    Ok(())
}

/// Write the schedules, with their generated trips, as a JSON array
pub fn write_schedules(path: &path::Path, schedules: &[Schedule]) -> Result<()> {
    let schedules_path = path.join("schedules.json");
    info!("Writing {:?}", schedules_path);
    let file = File::create(&schedules_path)
        .with_context(|| format!("Error reading {:?}", schedules_path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), schedules)
        .with_context(|| format!("Error reading {:?}", schedules_path))?;
    Ok(())
}

/// Write a report as pretty JSON
pub fn write_report<R: ReportCategory>(report_path: &path::Path, report: &Report<R>) -> Result<()> {
    info!("Writing report {:?}", report_path);
    let serialized_report = serde_json::to_string_pretty(report)?;
    fs::write(report_path, serialized_report)
        .with_context(|| format!("Error reading {:?}", report_path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::GenerationConfig;
    use crate::model_builder::ModelBuilder;
    use crate::objects::SchedulePeriod;
    use crate::report::{GenerationReport, GenerationReportCategory};
    use crate::test_utils::*;
    use pretty_assertions::assert_eq;

    fn generated_schedule(data: &crate::model::Collections, interval_seconds: u32) -> Schedule {
        let mut schedule = Schedule {
            line_id: "L1".to_string(),
            service_id: "week".to_string(),
            periods_group_shortname: Some("default".to_string()),
            periods: vec![SchedulePeriod {
                period_shortname: "early".to_string(),
                outbound_path_id: Some("p1".to_string()),
                interval_seconds: Some(interval_seconds),
                start_at_hour: 6.0,
                end_at_hour: 6.5,
                ..Default::default()
            }],
            ..Default::default()
        };
        schedule
            .generate_for_period("early", data, &GenerationConfig::default())
            .unwrap();
        schedule
    }

    #[test]
    fn write_trips_as_csv() {
        let collections = ModelBuilder::default()
            .path("p1", |p| {
                p.node("A", 20)
                    .segment(300)
                    .node("B", 30)
                    .segment(240)
                    .node("C", 0)
                    .operating_time(600);
            })
            .build();
        let schedule = generated_schedule(&collections, 1800);
        let trip_id = schedule.periods[0].trips[0].id.clone();
        test_in_tmp_dir(|path| {
            write_trips_and_stop_times(path, &[schedule], &collections).unwrap();
            assert_eq!(
                vec![
                    "trip_id,line_id,service_id,period_shortname,path_id,block_id,departure_time,arrival_time,total_capacity,seated_capacity".to_string(),
                    format!("{},L1,week,early,p1,,06:00:00,06:09:50,50,20", trip_id),
                ],
                get_lines_content(path.join("trips.csv"))
            );
            assert_eq!(
                vec![
                    "trip_id,node_id,stop_sequence,arrival_time,departure_time,can_board,can_unboard".to_string(),
                    format!("{},A,0,,06:00:20,1,0", trip_id),
                    format!("{},B,1,06:05:20,06:05:50,1,1", trip_id),
                    format!("{},C,2,06:09:50,,0,1", trip_id),
                ],
                get_lines_content(path.join("stop_times.csv"))
            );
        });
    }

    #[test]
    fn write_schedules_as_json() {
        let collections = ModelBuilder::default()
            .path("p1", |p| {
                p.uniform(&["A", "B"], 300, 0);
            })
            .build();
        let schedule = generated_schedule(&collections, 300);
        assert_eq!(6, schedule.trips_count());
        test_in_tmp_dir(|path| {
            write_schedules(path, &[schedule.clone()]).unwrap();
            let written: Vec<Schedule> =
                serde_json::from_str(&get_file_content(path.join("schedules.json"))).unwrap();
            assert_eq!(vec![schedule], written);
        });
    }

    #[test]
    fn write_report_as_json() {
        let mut report = GenerationReport::default();
        report.add_error("period pm".to_string(), GenerationReportCategory::UnknownPeriod);
        test_in_tmp_dir(|path| {
            let report_path = path.join("report.json");
            write_report(&report_path, &report).unwrap();
            let content = get_file_content(report_path);
            assert!(content.contains(r#""category": "UnknownPeriod""#));
            assert!(content.contains(r#""message": "period pm""#));
        });
    }
}
