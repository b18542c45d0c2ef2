// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Core
//!
//! Input model for the wall and opening geometry engine.
//!
//! - **Rooms**: axis-aligned rectangles with one [`WallSpec`] per side
//! - **Connections**: doors, windows and passages joining two room walls
//! - **Finishes**: style names resolved to surface properties through a [`FinishResolver`]
//! - **Defaults**: floor-level wall and opening dimensions
//!
//! The model is produced upstream (parser, position resolver) with every
//! dimension already in one base unit. It is not re-validated here.

pub mod defaults;
pub mod error;
pub mod finish;
pub mod model;
pub mod plan;

pub use defaults::FloorDefaults;
pub use error::{Error, Result};
pub use finish::{Finish, FinishResolver, StyleTable};
pub use model::{
    Bounds, Connection, OpeningPosition, OpeningType, Room, SwingSide, WallDirection, WallKind,
    WallOrientation, WallRef, WallSpec, WallType,
};
pub use plan::{Floor, FloorPlan};
