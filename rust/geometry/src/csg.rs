// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! csgrs kernel adapter
//!
//! Flattens a csgrs solid into [`MeshBuffers`] so it can feed the
//! [`SolidModel`](crate::export::SolidModel) export path. Faces are fan
//! triangulated; vertices carry 6 property channels (position + normal);
//! the whole solid is attributed to a single provenance run. Solids from
//! several operations combine via [`MeshBuffers::merge`], which keeps one
//! run per source.

use crate::error::Result;
use crate::mesh::MeshBuffers;
use nalgebra::Vector3;

/// Property channels emitted per vertex: x, y, z, nx, ny, nz
pub const SOLID_PROPERTY_COUNT: usize = 6;

/// Flatten a csgrs solid into mesh buffers under one origin identifier
pub fn solid_to_buffers(solid: &csgrs::mesh::Mesh<()>, origin_id: u32) -> Result<MeshBuffers> {
    let vertex_estimate: usize = solid.polygons.iter().map(|p| p.vertices.len()).sum();
    let triangle_estimate = vertex_estimate.saturating_sub(2 * solid.polygons.len());

    let mut mesh =
        MeshBuffers::with_capacity(SOLID_PROPERTY_COUNT, vertex_estimate, triangle_estimate)?;
    mesh.start_run(origin_id);

    for polygon in &solid.polygons {
        let vertices = &polygon.vertices;
        if vertices.len() < 3 {
            continue;
        }

        // Face normal from the first corner; skip degenerate faces rather
        // than let NaN reach the buffers.
        let edge1 = vertices[1].pos - vertices[0].pos;
        let edge2 = vertices[2].pos - vertices[0].pos;
        let face_normal = match edge1.cross(&edge2).try_normalize(1e-10) {
            Some(n) => n,
            None => continue,
        };

        let mut indices = Vec::with_capacity(vertices.len());
        for v in vertices {
            let normal: Vector3<f64> = match v.normal.try_normalize(1e-10) {
                Some(n) if n.x.is_finite() && n.y.is_finite() && n.z.is_finite() => n,
                _ => face_normal,
            };
            let row = [v.pos.x, v.pos.y, v.pos.z, normal.x, normal.y, normal.z];
            indices.push(mesh.add_vertex(&row)?);
        }

        // Fan triangulation around the first vertex
        for i in 1..indices.len() - 1 {
            mesh.add_triangle(indices[0], indices[i], indices[i + 1]);
        }
    }

    if mesh.triangle_count() == 0 {
        mesh.run_index.clear();
        mesh.run_original_id.clear();
    }

    Ok(mesh)
}
