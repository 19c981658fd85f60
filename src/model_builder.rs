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

//! Provides an easy way to create a `crate::Collections`
//!
//! ```
//! # use transit_schedule::model_builder::ModelBuilder;
//! let collections = ModelBuilder::default()
//!     .path("outbound", |path| {
//!         path.line("L1")
//!             .node("A", 30)
//!             .segment(300)
//!             .node("B", 30)
//!             .segment(240)
//!             .node("C", 0)
//!             .operating_time(900);
//!     })
//!     .path("inbound", |path| {
//!         path.line("L1").uniform(&["C", "B", "A"], 300, 30);
//!     })
//!     .build();
//! ```

use crate::model::Collections;
use crate::objects::{Line, PathDirection, PathProfile, PathSegment};
use typed_index_collection::CollectionWithId;

/// Line used by the paths which do not define one
pub const DEFAULT_LINE_ID: &str = "L1";

/// Builder used to easily create a `Collections`
#[derive(Default)]
pub struct ModelBuilder {
    lines: Vec<Line>,
    paths: Vec<PathProfile>,
}

/// Builder used to create and modify a new PathProfile
pub struct PathBuilder<'a> {
    path: &'a mut PathProfile,
}

impl ModelBuilder {
    /// Add a new line
    pub fn line(mut self, id: &str) -> Self {
        self.find_or_create_line(id);
        self
    }

    /// Add a new path, its line is created if needed
    pub fn path<F>(mut self, id: &str, mut path_initer: F) -> Self
    where
        F: FnMut(PathBuilder),
    {
        let mut new_path = PathProfile {
            id: id.to_string(),
            line_id: DEFAULT_LINE_ID.to_string(),
            ..Default::default()
        };
        path_initer(PathBuilder {
            path: &mut new_path,
        });
        self.find_or_create_line(&new_path.line_id.clone());
        self.paths.push(new_path);
        self
    }

    /// Build the collections, both lines and paths are loaded
    pub fn build(self) -> Collections {
        Collections {
            lines: Some(CollectionWithId::new(self.lines).expect("lines must be unique")),
            paths: Some(CollectionWithId::new(self.paths).expect("paths must be unique")),
        }
    }

    fn find_or_create_line(&mut self, id: &str) {
        if !self.lines.iter().any(|line| line.id == id) {
            self.lines.push(Line {
                id: id.to_string(),
                shortname: id.to_string(),
                name: None,
            });
        }
    }
}

impl<'a> PathBuilder<'a> {
    /// Set the line of the path
    pub fn line(mut self, line_id: &str) -> Self {
        self.path.line_id = line_id.to_string();
        self
    }

    /// Set the direction of the path
    pub fn direction(mut self, direction: PathDirection) -> Self {
        self.path.direction = direction;
        self
    }

    /// Append a node with its dwell time
    pub fn node(mut self, node_id: &str, dwell_time_seconds: u32) -> Self {
        self.path.nodes.push(node_id.to_string());
        self.path.dwell_time_seconds.push(dwell_time_seconds);
        self
    }

    /// Append a segment, going to the next node
    pub fn segment(mut self, travel_time_seconds: u32) -> Self {
        self.path.segments.push(PathSegment {
            travel_time_seconds,
            distance_meters: None,
        });
        self
    }

    /// Set the total time of the path, layover included
    pub fn operating_time(mut self, seconds: u32) -> Self {
        self.path.operating_time_with_layover_time_seconds = Some(seconds);
        self
    }

    /// Replace the dwell times
    pub fn dwell_times(mut self, dwell_time_seconds: Vec<u32>) -> Self {
        self.path.dwell_time_seconds = dwell_time_seconds;
        self
    }

    /// Nodes separated by the same travel time and with the same dwell time.
    ///
    /// The operating time is the sum of the dwell and travel times, unless
    /// already set.
    pub fn uniform(self, nodes: &[&str], travel_time_seconds: u32, dwell_time_seconds: u32) -> Self {
        let mut builder = self;
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                builder = builder.segment(travel_time_seconds);
            }
            builder = builder.node(node, dwell_time_seconds);
        }
        if builder.path.operating_time_with_layover_time_seconds.is_none() {
            let legs = nodes.len().saturating_sub(1) as u32;
            builder.path.operating_time_with_layover_time_seconds =
                Some(legs * (travel_time_seconds + dwell_time_seconds));
        }
        builder
    }
}
