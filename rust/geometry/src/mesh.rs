// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flattened mesh buffers with provenance runs
//!
//! [`MeshBuffers`] is the concrete owned form of a solid model's numeric
//! data: a row-major vertex property matrix (channels 0-2 are position),
//! a triangle index buffer, and a run table attributing contiguous triangle
//! ranges to the originating solid.

use crate::error::{Error, Result};

/// Minimum number of property channels; 0-2 hold the vertex position
pub const MIN_PROPERTY_COUNT: usize = 3;

/// Flattened triangle mesh with per-run provenance
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    /// Vertex properties, row-major, `vertex_count * num_prop` values
    pub vert_properties: Vec<f64>,
    /// Property channels per vertex, at least [`MIN_PROPERTY_COUNT`]
    pub num_prop: usize,
    /// Triangle indices, `triangle_count * 3` values
    pub tri_verts: Vec<u64>,
    /// Ascending run-start triangle indices
    pub run_index: Vec<u64>,
    /// One origin identifier per run
    pub run_original_id: Vec<u32>,
}

impl MeshBuffers {
    /// Create empty buffers with `num_prop` property channels
    pub fn new(num_prop: usize) -> Result<Self> {
        if num_prop < MIN_PROPERTY_COUNT {
            return Err(Error::MeshExport(format!(
                "property count {} is below the positional minimum {}",
                num_prop, MIN_PROPERTY_COUNT
            )));
        }
        Ok(Self {
            vert_properties: Vec::new(),
            num_prop,
            tri_verts: Vec::new(),
            run_index: Vec::new(),
            run_original_id: Vec::new(),
        })
    }

    /// Create empty buffers with reserved space
    pub fn with_capacity(num_prop: usize, vertex_count: usize, triangle_count: usize) -> Result<Self> {
        let mut buffers = Self::new(num_prop)?;
        buffers.vert_properties.reserve(vertex_count * num_prop);
        buffers.tri_verts.reserve(triangle_count * 3);
        Ok(buffers)
    }

    /// Append one vertex row and return its index
    pub fn add_vertex(&mut self, properties: &[f64]) -> Result<u64> {
        if properties.len() != self.num_prop {
            return Err(Error::MeshExport(format!(
                "vertex row has {} values, expected {}",
                properties.len(),
                self.num_prop
            )));
        }
        let index = self.vertex_count() as u64;
        self.vert_properties.extend_from_slice(properties);
        Ok(index)
    }

    /// Append one triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u64, i1: u64, i2: u64) {
        self.tri_verts.push(i0);
        self.tri_verts.push(i1);
        self.tri_verts.push(i2);
    }

    /// Open a provenance run at the current triangle position
    ///
    /// Triangles added afterwards belong to `origin_id` until the next run
    /// opens. Re-opening at the same position replaces the empty run.
    pub fn start_run(&mut self, origin_id: u32) {
        let start = self.triangle_count() as u64;
        if self.run_index.last() == Some(&start) {
            if let Some(last_id) = self.run_original_id.last_mut() {
                *last_id = origin_id;
            }
            return;
        }
        self.run_index.push(start);
        self.run_original_id.push(origin_id);
    }

    /// Merge another mesh into this one, keeping its provenance runs
    pub fn merge(&mut self, other: &MeshBuffers) -> Result<()> {
        if other.num_prop != self.num_prop {
            return Err(Error::MeshExport(format!(
                "cannot merge meshes with {} and {} property channels",
                self.num_prop, other.num_prop
            )));
        }
        if other.is_empty() {
            return Ok(());
        }

        let vertex_offset = self.vertex_count() as u64;
        let triangle_offset = self.triangle_count() as u64;

        self.vert_properties.reserve(other.vert_properties.len());
        self.tri_verts.reserve(other.tri_verts.len());

        self.vert_properties.extend_from_slice(&other.vert_properties);
        self.tri_verts
            .extend(other.tri_verts.iter().map(|&i| i + vertex_offset));

        for (&start, &id) in other.run_index.iter().zip(&other.run_original_id) {
            let shifted = start + triangle_offset;
            if self.run_index.last() == Some(&shifted) {
                if let Some(last_id) = self.run_original_id.last_mut() {
                    *last_id = id;
                }
            } else {
                self.run_index.push(shifted);
                self.run_original_id.push(id);
            }
        }

        Ok(())
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vert_properties.len() / self.num_prop
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.tri_verts.len() / 3
    }

    /// Number of provenance runs
    #[inline]
    pub fn run_count(&self) -> usize {
        self.run_index.len()
    }

    /// Check if the mesh has no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vert_properties.is_empty()
    }

    /// Verify the structural invariants of all three buffers
    pub fn validate(&self) -> Result<()> {
        if self.vert_properties.len() % self.num_prop != 0 {
            return Err(Error::MeshExport(format!(
                "property buffer length {} is not a multiple of {}",
                self.vert_properties.len(),
                self.num_prop
            )));
        }
        if self.tri_verts.len() % 3 != 0 {
            return Err(Error::MeshExport(format!(
                "triangle buffer length {} is not a multiple of 3",
                self.tri_verts.len()
            )));
        }

        let vertex_count = self.vertex_count() as u64;
        if let Some(&bad) = self.tri_verts.iter().find(|&&i| i >= vertex_count) {
            return Err(Error::MeshExport(format!(
                "triangle index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        if self.run_index.len() != self.run_original_id.len() {
            return Err(Error::MeshExport(format!(
                "{} run starts but {} origin identifiers",
                self.run_index.len(),
                self.run_original_id.len()
            )));
        }
        let triangle_count = self.triangle_count() as u64;
        let ascending = self
            .run_index
            .windows(2)
            .all(|w| w[0] < w[1]);
        if !ascending || self.run_index.last().is_some_and(|&s| s > triangle_count) {
            return Err(Error::MeshExport(
                "run starts must be strictly ascending and bounded by the triangle count"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
