// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

/// Process-level engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Use the CSG backend when it is compiled in.
    pub csg_enabled: bool,
    /// Extra cutter thickness beyond the wall face, on each side of a hole.
    pub cutter_margin: f64,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            csg_enabled: std::env::var("FLOORPLAN_CSG")
                .map(|v| parse_switch(&v))
                .unwrap_or(true),
            cutter_margin: std::env::var("FLOORPLAN_CUTTER_MARGIN")
                .unwrap_or_else(|_| "0.05".into())
                .parse()
                .ok()
                .filter(|m: &f64| m.is_finite() && *m >= 0.0)
                .unwrap_or(0.05),
        }
    }

    pub fn with_csg(mut self, enabled: bool) -> Self {
        self.csg_enabled = enabled;
        self
    }

    pub fn with_cutter_margin(mut self, margin: f64) -> Self {
        self.cutter_margin = margin;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "0" | "false" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("on"));
        assert!(parse_switch("1"));
        assert!(parse_switch(""));
        assert!(!parse_switch("off"));
        assert!(!parse_switch(" FALSE "));
        assert!(!parse_switch("0"));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::from_env().with_csg(false).with_cutter_margin(0.1);
        assert!(!config.csg_enabled);
        assert_eq!(config.cutter_margin, 0.1);
    }
}
