// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface finishes and style resolution

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Concrete surface properties applied to wall faces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finish {
    pub name: String,
    /// RGBA, 0.0 - 1.0
    pub color: [f32; 4],
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

fn default_roughness() -> f32 {
    0.9
}

impl Finish {
    pub fn new(name: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            color,
            roughness: default_roughness(),
        }
    }
}

impl Default for Finish {
    fn default() -> Self {
        Self::new("default", [0.9, 0.9, 0.88, 1.0])
    }
}

/// Maps a room's style name to a concrete finish
///
/// Shared read-only across floors rendered in parallel.
pub trait FinishResolver: Send + Sync {
    fn resolve(&self, style: Option<&str>) -> Finish;
}

/// Named finishes with a fallback for unstyled rooms and unknown names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleTable {
    #[serde(default)]
    pub fallback: Finish,
    #[serde(default)]
    pub styles: FxHashMap<String, Finish>,
}

impl StyleTable {
    pub fn insert(&mut self, name: impl Into<String>, finish: Finish) {
        self.styles.insert(name.into(), finish);
    }

    pub fn with_style(mut self, name: impl Into<String>, finish: Finish) -> Self {
        self.insert(name, finish);
        self
    }
}

impl FinishResolver for StyleTable {
    fn resolve(&self, style: Option<&str>) -> Finish {
        style
            .and_then(|name| self.styles.get(name))
            .unwrap_or(&self.fallback)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        let tiles = Finish::new("tiles", [0.2, 0.4, 0.8, 1.0]);
        let table = StyleTable::default().with_style("tiles", tiles.clone());

        assert_eq!(table.resolve(Some("tiles")), tiles);
        assert_eq!(table.resolve(Some("marble")), Finish::default());
        assert_eq!(table.resolve(None), Finish::default());
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleTable>();
    }
}
