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

//! Errors returned by the generation of a period.
//!
//! None of these errors is fatal for the process: each one is local to a
//! single period generation, and the period keeps its previous trips.
//! A departure that cannot be served because no vehicle is available is not
//! an error, see [`crate::period::PeriodGeneration::dropped_departures`].

use thiserror::Error;

/// Missing or inconsistent configuration detected before any simulation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigurationError {
    /// The lines or paths collections are not loaded.
    #[error("missing lines and/or paths collections")]
    MissingCollections,
    /// Neither an interval nor a number of units is configured.
    #[error("missing intervals or number of units")]
    MissingIntervalOrUnits,
    /// The period has no outbound path.
    #[error("missing outbound path id")]
    MissingOutboundPath,
    /// A referenced path is not in the paths collection.
    #[error("path {0} not found")]
    PathNotFound(String),
    /// A custom start or end time cannot be parsed.
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    /// A start or end hour is negative, not a number or too large.
    #[error("invalid hour {0}")]
    InvalidHour(String),
    /// An interval of 0 second would never advance the simulation.
    #[error("the interval between departures must be strictly positive")]
    NullInterval,
    /// A fleet of 0 vehicle cannot run any trip.
    #[error("the number of units must be strictly positive")]
    NullNumberOfUnits,
}

/// Failure of the generation of one period.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GenerationError {
    /// No period has this shortname in the schedule.
    #[error("period {0} does not exist")]
    UnknownPeriod(String),
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Node, segment and dwell time lists of a path are inconsistent.
    #[error("the path {path_id} for line {line_id} is not valid ({reason}), please recalculate routing for this path")]
    PathInvalid {
        /// Identifier of the invalid path
        path_id: String,
        /// Line of the invalid path
        line_id: String,
        /// What is inconsistent in the path
        reason: String,
    },
}

/// Inconsistency of a schedule detected before any generation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// The schedule has an empty service id.
    #[error("the schedule of line {0} has no service")]
    MissingServiceId(String),
    /// The schedule has no periods group shortname.
    #[error("the schedule of line {0} has no periods group")]
    MissingPeriodsGroup(String),
    /// Both an interval and a number of units are set on a period.
    #[error("period {0}: the interval and the number of units cannot be both set")]
    IntervalAndNumberOfUnits(String),
    /// Two periods have the same shortname.
    #[error("period {0} is defined more than once")]
    DuplicatedPeriod(String),
}
