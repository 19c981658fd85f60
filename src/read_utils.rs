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

//! Readers of the JSON inputs: reference collections and schedules.

use crate::model::{Collections, ReferenceData};
use crate::schedule::Schedule;
use crate::Result;
use anyhow::Context;
use skip_error::SkipError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

fn open_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Error reading {:?}", path))?;
    Ok(BufReader::new(file))
}

/// Read the lines and paths computed by the routing.
///
/// The file is a JSON object with a `lines` and a `paths` array; a missing
/// array leaves the corresponding collection unloaded.
pub fn read_collections<P: AsRef<Path>>(path: P) -> Result<Collections> {
    let path = path.as_ref();
    info!("Reading lines and paths from {:?}", path);
    let collections: Collections = serde_json::from_reader(open_file(path)?)
        .with_context(|| format!("Error reading {:?}", path))?;
    if !collections.is_loaded() {
        warn!("{:?} does not contain both lines and paths", path);
    }
    Ok(collections)
}

/// Read a JSON array of schedules.
///
/// A schedule which cannot be deserialized or which is not valid is skipped
/// with a warning.
pub fn read_schedules<P: AsRef<Path>>(path: P) -> Result<Vec<Schedule>> {
    let path = path.as_ref();
    info!("Reading schedules from {:?}", path);
    let values: Vec<serde_json::Value> = serde_json::from_reader(open_file(path)?)
        .with_context(|| format!("Error reading {:?}", path))?;
    let schedules = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| -> Result<Schedule> {
            let schedule: Schedule = serde_json::from_value(value)
                .with_context(|| format!("Error reading schedule #{} of {:?}", index, path))?;
            schedule
                .validate()
                .with_context(|| format!("Invalid schedule #{} of {:?}", index, path))?;
            Ok(schedule)
        })
        .skip_error_and_warn()
        .collect();
    Ok(schedules)
}
