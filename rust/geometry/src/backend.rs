// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall geometry backends
//!
//! A backend turns a segment solid and the hole cutters crossing it into the
//! final segment mesh. [`CsgBackend`] removes the material; [`OverlayBackend`]
//! keeps the solid whole, and the assembler draws opening overlays instead.
//! The process-wide backend is chosen once, on first use.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::mesh::Mesh;
use nalgebra::Point3;
use std::sync::{Arc, OnceLock};
use tracing::info;

#[cfg(feature = "csg")]
use crate::csg::CsgProcessor;
#[cfg(feature = "csg")]
use crate::error::Error;
#[cfg(feature = "csg")]
use tracing::warn;

/// World-space box as (min, max) corners
pub type CutterBox = (Point3<f64>, Point3<f64>);

/// Geometry backend trait
/// Shared read-only across floors rendered in parallel
pub trait WallBackend: Send + Sync {
    /// Short name for logs and summaries
    fn name(&self) -> &'static str;

    /// True if `cut` actually removes hole material
    fn removes_material(&self) -> bool;

    /// Apply `cutters` to a closed segment solid
    fn cut(&self, solid: &Mesh, cutters: &[CutterBox]) -> Result<Mesh>;
}

/// Keeps every solid intact
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayBackend;

impl WallBackend for OverlayBackend {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn removes_material(&self) -> bool {
        false
    }

    fn cut(&self, solid: &Mesh, _cutters: &[CutterBox]) -> Result<Mesh> {
        Ok(solid.clone())
    }
}

/// Boolean subtraction through csgrs
#[cfg(feature = "csg")]
#[derive(Default)]
pub struct CsgBackend {
    processor: CsgProcessor,
}

#[cfg(feature = "csg")]
impl CsgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subtract a small box from a unit box and check the result
    pub fn self_test(&self) -> Result<()> {
        let host = crate::csg::aabb_to_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let cutter = (Point3::new(0.25, -0.5, 0.25), Point3::new(0.75, 1.5, 0.75));
        let result = self.cut(&host, &[cutter])?;
        if result.triangle_count() <= host.triangle_count() {
            return Err(Error::Subtraction("test subtraction left the host unchanged".into()));
        }
        Ok(())
    }
}

#[cfg(feature = "csg")]
impl WallBackend for CsgBackend {
    fn name(&self) -> &'static str {
        "csg"
    }

    fn removes_material(&self) -> bool {
        true
    }

    fn cut(&self, solid: &Mesh, cutters: &[CutterBox]) -> Result<Mesh> {
        // The BSP can panic on degenerate input; treat that like any failed cut
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.processor.subtract_boxes(solid, cutters)
        }))
        .unwrap_or_else(|_| Err(Error::Subtraction("csg subtraction panicked".into())))
    }
}

/// Pick a backend for `config`
///
/// The CSG backend is used only when compiled in, enabled and passing a
/// self-test subtraction.
pub fn select_backend(config: &EngineConfig) -> Arc<dyn WallBackend> {
    #[cfg(feature = "csg")]
    {
        if config.csg_enabled {
            let csg = CsgBackend::new();
            match csg.self_test() {
                Ok(()) => {
                    info!(backend = "csg", "Selected wall geometry backend");
                    return Arc::new(csg);
                }
                Err(e) => warn!(error = %e, "CSG self-test failed, using overlay backend"),
            }
        } else {
            info!("CSG backend disabled by configuration");
        }
    }
    #[cfg(not(feature = "csg"))]
    {
        if config.csg_enabled {
            info!("CSG backend not compiled in");
        }
    }

    info!(backend = "overlay", "Selected wall geometry backend");
    Arc::new(OverlayBackend)
}

/// Process-wide backend, selected from the environment on first call
pub fn default_backend() -> Arc<dyn WallBackend> {
    static BACKEND: OnceLock<Arc<dyn WallBackend>> = OnceLock::new();
    BACKEND
        .get_or_init(|| select_backend(&EngineConfig::from_env()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::aabb_to_mesh;

    #[test]
    fn test_overlay_keeps_solid() {
        let solid = aabb_to_mesh(Point3::origin(), Point3::new(4.0, 3.0, 0.2));
        let cutter = (Point3::new(1.0, -0.1, -0.1), Point3::new(2.0, 2.0, 0.3));
        let result = OverlayBackend.cut(&solid, &[cutter]).unwrap();
        assert_eq!(result, solid);
        assert!(!OverlayBackend.removes_material());
    }

    #[test]
    fn test_disabled_config_selects_overlay() {
        let config = EngineConfig::from_env().with_csg(false);
        let backend = select_backend(&config);
        assert_eq!(backend.name(), "overlay");
    }

    #[test]
    fn test_default_backend_is_stable() {
        let a = default_backend();
        let b = default_backend();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[cfg(feature = "csg")]
    #[test]
    fn test_csg_self_test_and_selection() {
        assert!(CsgBackend::new().self_test().is_ok());
        let backend = select_backend(&EngineConfig::from_env().with_csg(true));
        assert_eq!(backend.name(), "csg");
        assert!(backend.removes_material());
    }
}
