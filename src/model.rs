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

//! Definition of the reference data (lines and paths) used by the generation.

use crate::error::ConfigurationError;
use crate::objects::{Line, PathDirection, PathProfile};
use serde::{Deserialize, Serialize};
use typed_index_collection::CollectionWithId;

/// Access to the lines and paths computed by the routing subsystem.
///
/// A collection returning `None` is not loaded yet; the generation of a
/// period is refused until both collections are available.
pub trait ReferenceData {
    /// All the known lines
    fn lines(&self) -> Option<&CollectionWithId<Line>>;
    /// All the known paths
    fn paths(&self) -> Option<&CollectionWithId<PathProfile>>;

    /// Whether both collections are loaded
    fn is_loaded(&self) -> bool {
        self.lines().is_some() && self.paths().is_some()
    }

    /// Find a path by its identifier
    fn path(&self, path_id: &str) -> Result<&PathProfile, ConfigurationError> {
        self.paths()
            .ok_or(ConfigurationError::MissingCollections)?
            .get(path_id)
            .ok_or_else(|| ConfigurationError::PathNotFound(path_id.to_string()))
    }

    /// Short name of a line, its identifier when the line is unknown
    fn line_shortname(&self, line_id: &str) -> String {
        self.lines()
            .and_then(|lines| lines.get(line_id))
            .map(|line| line.shortname.clone())
            .unwrap_or_else(|| line_id.to_string())
    }
}

/// The in-memory set of reference collections.
#[derive(Serialize, Deserialize, Debug, Default)]
#[allow(missing_docs)]
pub struct Collections {
    #[serde(default)]
    pub lines: Option<CollectionWithId<Line>>,
    #[serde(default)]
    pub paths: Option<CollectionWithId<PathProfile>>,
}

impl ReferenceData for Collections {
    fn lines(&self) -> Option<&CollectionWithId<Line>> {
        self.lines.as_ref()
    }
    fn paths(&self) -> Option<&CollectionWithId<PathProfile>> {
        self.paths.as_ref()
    }
}

/// Default outbound and inbound paths of a line.
///
/// The outbound path is the outbound, loop or other path serving the most
/// nodes, the inbound path is the inbound path serving the most nodes. On
/// equality, the first path of the collection is kept.
pub fn default_paths<'a, R>(
    data: &'a R,
    line_id: &str,
) -> (Option<&'a PathProfile>, Option<&'a PathProfile>)
where
    R: ReferenceData + ?Sized,
{
    fn longest<'a>(paths: impl Iterator<Item = &'a PathProfile>) -> Option<&'a PathProfile> {
        paths.fold(None, |best: Option<&PathProfile>, path| match best {
            Some(best) if best.nodes.len() >= path.nodes.len() => Some(best),
            _ => Some(path),
        })
    }
    let line_paths = || {
        data.paths()
            .into_iter()
            .flat_map(|paths| paths.values())
            .filter(move |path| path.line_id == line_id)
    };
    let outbound = longest(line_paths().filter(|path| path.is_outbound_like()));
    let inbound = longest(line_paths().filter(|path| path.direction == PathDirection::Inbound));
    (outbound, inbound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_builder::ModelBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn unloaded_collections() {
        let collections = Collections::default();
        assert!(!collections.is_loaded());
        assert_eq!(
            Err(ConfigurationError::MissingCollections),
            collections.path("p1")
        );
    }

    #[test]
    fn unknown_path() {
        let collections = ModelBuilder::default().line("L1").build();
        assert!(collections.is_loaded());
        assert_eq!(
            Err(ConfigurationError::PathNotFound("p1".to_string())),
            collections.path("p1")
        );
    }

    #[test]
    fn line_shortname_fallback_on_id() {
        let collections = ModelBuilder::default().line("L1").build();
        assert_eq!("L1", collections.line_shortname("L1"));
        assert_eq!("unknown", collections.line_shortname("unknown"));
    }

    #[test]
    fn default_paths_with_most_nodes() {
        let collections = ModelBuilder::default()
            .path("short_out", |p| {
                p.line("L1").uniform(&["A", "B"], 60, 0);
            })
            .path("long_loop", |p| {
                p.line("L1")
                    .direction(PathDirection::Loop)
                    .uniform(&["A", "B", "C", "A"], 60, 0);
            })
            .path("long_in", |p| {
                p.line("L1")
                    .direction(PathDirection::Inbound)
                    .uniform(&["C", "B", "A"], 60, 0);
            })
            .path("other_line", |p| {
                p.line("L2").uniform(&["A", "B", "C", "D", "E"], 60, 0);
            })
            .build();
        let (outbound, inbound) = default_paths(&collections, "L1");
        assert_eq!("long_loop", outbound.unwrap().id);
        assert_eq!("long_in", inbound.unwrap().id);
    }

    #[test]
    fn default_paths_keep_first_on_equality() {
        let collections = ModelBuilder::default()
            .path("first", |p| {
                p.line("L1").uniform(&["A", "B"], 60, 0);
            })
            .path("second", |p| {
                p.line("L1").uniform(&["B", "A"], 60, 0);
            })
            .build();
        let (outbound, inbound) = default_paths(&collections, "L1");
        assert_eq!("first", outbound.unwrap().id);
        assert!(inbound.is_none());
    }
}
