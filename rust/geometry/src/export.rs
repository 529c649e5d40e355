// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh buffer export
//!
//! Projects an already-built solid model into up to three flattened buffer
//! views, each handed to a caller-supplied one-shot sink. The views borrow
//! from the model and are only valid inside the sink; callers copy whatever
//! they need to retain. Channels are independent: a channel without a sink
//! performs no extraction work at all.

use crate::error::Result;
use crate::mesh::MeshBuffers;

/// Row-major vertex property matrix, `vertex_count * property_count` values,
/// channels 0-2 holding the vertex position
#[derive(Debug, Clone, Copy)]
pub struct VertexPropertyView<'a> {
    pub values: &'a [f64],
    pub vertex_count: usize,
    pub property_count: usize,
}

/// Triangle connectivity, `triangle_count * 3` vertex indices
#[derive(Debug, Clone, Copy)]
pub struct TriangleView<'a> {
    pub values: &'a [u64],
    pub triangle_count: usize,
}

/// Provenance run table: ascending run-start triangle indices with one
/// origin identifier per run; the final run extends to the triangle count
#[derive(Debug, Clone, Copy)]
pub struct ProvenanceView<'a> {
    pub run_index: &'a [u64],
    pub run_original_ids: &'a [u32],
}

/// Narrow read-only interface over whatever solid-modeling kernel is linked
/// in; each accessor is an independent snapshot of one buffer
pub trait SolidModel {
    /// Vertex property buffer
    fn vertex_properties(&self) -> Result<VertexPropertyView<'_>>;
    /// Triangle index buffer
    fn triangles(&self) -> Result<TriangleView<'_>>;
    /// Provenance run table
    fn provenance(&self) -> Result<ProvenanceView<'_>>;
}

impl SolidModel for MeshBuffers {
    fn vertex_properties(&self) -> Result<VertexPropertyView<'_>> {
        self.validate()?;
        Ok(VertexPropertyView {
            values: &self.vert_properties,
            vertex_count: self.vertex_count(),
            property_count: self.num_prop,
        })
    }

    fn triangles(&self) -> Result<TriangleView<'_>> {
        self.validate()?;
        Ok(TriangleView {
            values: &self.tri_verts,
            triangle_count: self.triangle_count(),
        })
    }

    fn provenance(&self) -> Result<ProvenanceView<'_>> {
        self.validate()?;
        Ok(ProvenanceView {
            run_index: &self.run_index,
            run_original_ids: &self.run_original_id,
        })
    }
}

/// One-shot, per-channel export of a solid model's buffers
///
/// Each sink fires at most once, synchronously, inside [`export`]. An empty
/// model still fires its requested sinks with zero-length views.
///
/// [`export`]: MeshBufferExporter::export
///
/// # Example
/// ```
/// use solid_lite_geometry::{MeshBuffers, MeshBufferExporter};
///
/// let mesh = MeshBuffers::new(3)?;
/// let mut triangles = Vec::new();
/// MeshBufferExporter::new()
///     .with_triangles(|view| triangles.extend_from_slice(view.values))
///     .export(&mesh)?;
/// # Ok::<(), solid_lite_geometry::Error>(())
/// ```
#[derive(Default)]
pub struct MeshBufferExporter<'s> {
    property_sink: Option<Box<dyn FnOnce(VertexPropertyView<'_>) + 's>>,
    triangle_sink: Option<Box<dyn FnOnce(TriangleView<'_>) + 's>>,
    provenance_sink: Option<Box<dyn FnOnce(ProvenanceView<'_>) + 's>>,
}

impl<'s> MeshBufferExporter<'s> {
    /// Create an exporter with no channels requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the vertex property channel
    pub fn with_properties(mut self, sink: impl FnOnce(VertexPropertyView<'_>) + 's) -> Self {
        self.property_sink = Some(Box::new(sink));
        self
    }

    /// Request the triangle channel
    pub fn with_triangles(mut self, sink: impl FnOnce(TriangleView<'_>) + 's) -> Self {
        self.triangle_sink = Some(Box::new(sink));
        self
    }

    /// Request the provenance channel
    pub fn with_provenance(mut self, sink: impl FnOnce(ProvenanceView<'_>) + 's) -> Self {
        self.provenance_sink = Some(Box::new(sink));
        self
    }

    /// Extract every requested channel from `model` and deliver it
    ///
    /// A failing channel delivers nothing for that channel and aborts the
    /// remaining ones; there are no retries.
    pub fn export(self, model: &impl SolidModel) -> Result<()> {
        if let Some(sink) = self.property_sink {
            sink(model.vertex_properties()?);
        }
        if let Some(sink) = self.triangle_sink {
            sink(model.triangles()?);
        }
        if let Some(sink) = self.provenance_sink {
            sink(model.provenance()?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangle_mesh() -> MeshBuffers {
        let mut mesh = MeshBuffers::new(3).unwrap();
        mesh.start_run(42);
        for row in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ] {
            mesh.add_vertex(&row).unwrap();
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    #[test]
    fn zero_sinks_issue_zero_callbacks() {
        let mesh = two_triangle_mesh();
        MeshBufferExporter::new().export(&mesh).unwrap();
    }

    #[test]
    fn unrequested_channels_stay_silent() {
        let mesh = two_triangle_mesh();
        let mut runs = Vec::new();

        MeshBufferExporter::new()
            .with_provenance(|view| runs.extend_from_slice(view.run_index))
            .export(&mesh)
            .unwrap();

        assert_eq!(runs, vec![0]);
    }

    #[test]
    fn all_channels_deliver_once() {
        let mesh = two_triangle_mesh();
        let mut property_calls = 0;
        let mut triangle_calls = 0;
        let mut provenance_calls = 0;

        MeshBufferExporter::new()
            .with_properties(|view| {
                property_calls += 1;
                assert_eq!(view.vertex_count, 4);
                assert_eq!(view.property_count, 3);
                assert_eq!(view.values.len(), 12);
            })
            .with_triangles(|view| {
                triangle_calls += 1;
                assert_eq!(view.triangle_count, 2);
                assert_eq!(view.values.len(), 6);
                assert!(view.values.iter().all(|&i| i < 4));
            })
            .with_provenance(|view| {
                provenance_calls += 1;
                assert_eq!(view.run_index.len(), view.run_original_ids.len());
                assert_eq!(view.run_original_ids, &[42]);
            })
            .export(&mesh)
            .unwrap();

        assert_eq!(property_calls, 1);
        assert_eq!(triangle_calls, 1);
        assert_eq!(provenance_calls, 1);
    }

    #[test]
    fn empty_model_delivers_zero_length_views() {
        let mesh = MeshBuffers::new(4).unwrap();
        let mut seen = false;

        MeshBufferExporter::new()
            .with_properties(|view| {
                seen = true;
                assert_eq!(view.vertex_count, 0);
                assert_eq!(view.property_count, 4);
                assert!(view.values.is_empty());
            })
            .export(&mesh)
            .unwrap();

        assert!(seen);
    }

    #[test]
    fn invalid_model_fails_without_delivery() {
        let mut mesh = two_triangle_mesh();
        mesh.add_triangle(0, 1, 99);

        let mut delivered = false;
        let result = MeshBufferExporter::new()
            .with_triangles(|_| delivered = true)
            .export(&mesh);

        assert!(result.is_err());
        assert!(!delivered);
    }
}
