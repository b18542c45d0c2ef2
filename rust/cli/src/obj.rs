// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export
//!
//! Floor geometry is already Y-up, so positions and normals are written as is.

use floorplan_geometry::{FinishRole, FloorGeometry, Mesh};
use std::io::{self, Write};

/// Writes objects into one OBJ stream, tracking the running vertex offset
pub struct ObjWriter<W: Write> {
    out: W,
    vertex_offset: u32,
    objects: usize,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(mut out: W, floors: usize) -> io::Result<Self> {
        writeln!(out, "# Generated by floorplan-walls")?;
        writeln!(out, "# Floors: {}", floors)?;
        writeln!(out, "# Coordinate system: Y-up (OBJ convention)")?;
        writeln!(out)?;
        Ok(Self {
            out,
            vertex_offset: 0,
            objects: 0,
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects
    }

    pub fn write_mesh(&mut self, name: &str, material: Option<&str>, mesh: &Mesh) -> io::Result<()> {
        if mesh.is_empty() {
            return Ok(());
        }

        writeln!(self.out, "o {}", name)?;
        if let Some(material) = material {
            writeln!(self.out, "usemtl {}", material)?;
        }

        for p in mesh.positions.chunks_exact(3) {
            writeln!(self.out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(self.out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let i0 = tri[0] + self.vertex_offset + 1;
            let i1 = tri[1] + self.vertex_offset + 1;
            let i2 = tri[2] + self.vertex_offset + 1;
            writeln!(self.out, "f {}//{} {}//{} {}//{}", i0, i0, i1, i1, i2, i2)?;
        }

        self.vertex_offset += mesh.vertex_count() as u32;
        self.objects += 1;
        writeln!(self.out)
    }

    /// Every wall surface part and every overlay of one floor
    pub fn write_floor(&mut self, floor: &FloorGeometry) -> io::Result<()> {
        writeln!(self.out, "# Floor: {} ({} backend)", floor.floor, floor.backend)?;

        for wall in &floor.walls {
            for segment in &wall.segments {
                for part in &segment.solid.parts {
                    let role = match part.role {
                        FinishRole::Own => "own",
                        FinishRole::Neighbor => "neighbor",
                    };
                    let name = format!(
                        "{}/{}/{}/segment_{}/{}",
                        floor.floor, wall.room, wall.direction, segment.index, role
                    );
                    self.write_mesh(&name, Some(&part.finish.name), &part.mesh)?;
                }
            }
        }

        for (i, opening) in floor.openings.iter().enumerate() {
            if let Some(overlay) = &opening.overlay {
                let name = format!(
                    "{}/{}/{}/opening_{}/{}",
                    floor.floor,
                    opening.room,
                    opening.direction,
                    i,
                    opening.hole.kind.as_str()
                );
                self.write_mesh(&name, None, overlay)?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
