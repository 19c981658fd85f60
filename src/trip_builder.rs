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

//! Materialization of a trip along a path.

use crate::error::GenerationError;
use crate::objects::{PathProfile, Trip};
use crate::vehicle::VehicleUnit;
use uuid::Uuid;

fn invalid_path(path: &PathProfile, reason: String) -> GenerationError {
    GenerationError::PathInvalid {
        path_id: path.id.clone(),
        line_id: path.line_id.clone(),
        reason,
    }
}

fn check_path(path: &PathProfile) -> Result<(), GenerationError> {
    let nb_nodes = path.nodes.len();
    if nb_nodes < 2 {
        return Err(invalid_path(path, format!("{} node(s)", nb_nodes)));
    }
    if path.segments.len() < nb_nodes - 1 {
        return Err(invalid_path(
            path,
            format!("{} segments for {} nodes", path.segments.len(), nb_nodes),
        ));
    }
    if path.dwell_time_seconds.len() < nb_nodes - 1 {
        return Err(invalid_path(
            path,
            format!(
                "{} dwell times for {} nodes",
                path.dwell_time_seconds.len(),
                nb_nodes
            ),
        ));
    }
    Ok(())
}

fn add_seconds(path: &PathProfile, elapsed: u32, seconds: u32) -> Result<u32, GenerationError> {
    elapsed
        .checked_add(seconds)
        .ok_or_else(|| invalid_path(path, "times beyond the representable range".to_string()))
}

/// Build the trip of `vehicle` leaving the first node of `path` at
/// `departure_time_seconds`.
///
/// The vehicle waits the dwell time of each node (the last one excepted)
/// before leaving it. Nobody can alight at the first node and nobody can
/// board at the last one.
pub fn build_trip(
    departure_time_seconds: u32,
    vehicle: &VehicleUnit,
    path: &PathProfile,
    block_id: Option<String>,
) -> Result<Trip, GenerationError> {
    check_path(path)?;
    let nb_nodes = path.nodes.len();
    let last = nb_nodes - 1;

    let mut node_arrival_times_seconds = Vec::with_capacity(nb_nodes);
    let mut node_departure_times_seconds = Vec::with_capacity(nb_nodes);
    let mut nodes_can_board = Vec::with_capacity(nb_nodes);
    let mut nodes_can_unboard = Vec::with_capacity(nb_nodes);

    let mut elapsed = departure_time_seconds;
    for index in 0..nb_nodes {
        if index == 0 {
            node_arrival_times_seconds.push(None);
            nodes_can_unboard.push(false);
        } else {
            node_arrival_times_seconds.push(Some(elapsed));
            nodes_can_unboard.push(true);
        }
        if index == last {
            node_departure_times_seconds.push(None);
            nodes_can_board.push(false);
        } else {
            elapsed = add_seconds(path, elapsed, path.dwell_time_seconds[index])?;
            node_departure_times_seconds.push(Some(elapsed));
            nodes_can_board.push(true);
            elapsed = add_seconds(path, elapsed, path.segments[index].travel_time_seconds)?;
        }
    }

    Ok(Trip {
        id: Uuid::new_v4().to_string(),
        path_id: path.id.clone(),
        unit_id: None,
        block_id,
        departure_time_seconds,
        arrival_time_seconds: elapsed,
        total_capacity: Some(vehicle.total_capacity),
        seated_capacity: Some(vehicle.seated_capacity),
        node_arrival_times_seconds,
        node_departure_times_seconds,
        nodes_can_board,
        nodes_can_unboard,
    })
}
