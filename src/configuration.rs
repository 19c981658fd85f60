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
//! Defaults used when generating the trips of a schedule.

use crate::Result;
use anyhow::Context;
use derivative::Derivative;
use serde::Deserialize;
use std::fs::File;
use std::path;
use tracing::info;

/// Interval between inbound departures used when a period does not define one
pub const DEFAULT_RETURN_INTERVAL_SECONDS: u32 = 720;
/// Total capacity of a vehicle when none is configured
pub const DEFAULT_TOTAL_CAPACITY: u32 = 50;
/// Seated capacity of a vehicle when none is configured
pub const DEFAULT_SEATED_CAPACITY: u32 = 20;

/// Schedule defaults applied by the generation.
#[derive(Derivative, Deserialize, Debug, Clone, PartialEq)]
#[derivative(Default)]
#[serde(default)]
pub struct GenerationConfig {
    /// Interval between inbound departures when the period does not define one
    #[derivative(Default(value = "DEFAULT_RETURN_INTERVAL_SECONDS"))]
    pub return_interval_seconds: u32,
    /// Total capacity copied on every generated trip
    #[derivative(Default(value = "DEFAULT_TOTAL_CAPACITY"))]
    pub default_total_capacity: u32,
    /// Seated capacity copied on every generated trip
    #[derivative(Default(value = "DEFAULT_SEATED_CAPACITY"))]
    pub default_seated_capacity: u32,
    /// Set a block id `<period_shortname>:<unit>` on the trips of each vehicle
    pub assign_block_ids: bool,
}

/// Read a JSON configuration file, every missing field keeps its default
/// value. Without a file, the defaults are returned.
///
/// Below is an example of this file
/// ```text
/// {
///     "return_interval_seconds": 600,
///     "default_total_capacity": 80,
///     "default_seated_capacity": 30,
///     "assign_block_ids": true
/// }
/// ```
pub fn read_config<P: AsRef<path::Path>>(config_path: Option<P>) -> Result<GenerationConfig> {
    match config_path {
        Some(config_path) => {
            let config_path = config_path.as_ref();
            info!("Reading generation configuration from {:?}", config_path);
            let json_config_file = File::open(config_path)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            let config = serde_json::from_reader(json_config_file)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            Ok(config)
        }
        None => Ok(GenerationConfig::default()),
    }
}
