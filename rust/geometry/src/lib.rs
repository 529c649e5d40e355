//! Solid-Lite Geometry
//!
//! Polygon forest reconstruction and mesh buffer export on top of the
//! i_overlay clip engine and the csgrs solid-modeling kernel.
//!
//! Two independent, synchronous transforms:
//! - [`build_forest`] unions a flat set of 2D polygons and rebuilds the
//!   result as an owned tree of nested boundaries and holes.
//! - [`MeshBufferExporter`] projects a solid model into flattened vertex,
//!   triangle and provenance buffers through one-shot sinks.

pub mod contour;
pub mod csg;
pub mod error;
pub mod export;
pub mod forest;
pub mod mesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use csg::solid_to_buffers;
pub use error::{Error, Result};
pub use export::{
    MeshBufferExporter, ProvenanceView, SolidModel, TriangleView, VertexPropertyView,
};
pub use forest::{build_forest, PolygonNode};
pub use mesh::MeshBuffers;
