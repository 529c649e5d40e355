// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CsgMesh};
use nalgebra::{Point3, Vector3};
use solid_lite_geometry::{solid_to_buffers, MeshBufferExporter, MeshBuffers};

fn quad_solid() -> CsgMesh<()> {
    let normal = Vector3::z();
    let quad = Polygon::new(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), normal),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), normal),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), normal),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), normal),
        ],
        None,
    );
    CsgMesh::from_polygons(&[quad], None)
}

#[test]
fn four_vertices_two_triangles_export_with_expected_lengths() {
    // Position-only model: 4 vertices, 2 triangles, 3 properties
    let mut mesh = MeshBuffers::new(3).unwrap();
    mesh.start_run(11);
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

    let mut property_len = 0;
    let mut triangle_values = Vec::new();

    MeshBufferExporter::new()
        .with_properties(|view| {
            property_len = view.values.len();
            assert_eq!(view.vertex_count, 4);
            assert_eq!(view.property_count, 3);
        })
        .with_triangles(|view| {
            triangle_values.extend_from_slice(view.values);
            assert_eq!(view.triangle_count, 2);
        })
        .export(&mesh)
        .unwrap();

    assert_eq!(property_len, 12);
    assert_eq!(triangle_values.len(), 6);
    assert!(triangle_values.iter().all(|&i| i < 4));
}

#[test]
fn provenance_only_export_skips_other_channels() {
    let mut combined = solid_to_buffers(&quad_solid(), 100).unwrap();
    combined.merge(&solid_to_buffers(&quad_solid(), 200).unwrap()).unwrap();

    let mut provenance_calls = 0;
    let mut starts = Vec::new();
    let mut ids = Vec::new();

    MeshBufferExporter::new()
        .with_provenance(|view| {
            provenance_calls += 1;
            starts.extend_from_slice(view.run_index);
            ids.extend_from_slice(view.run_original_ids);
        })
        .export(&combined)
        .unwrap();

    assert_eq!(provenance_calls, 1);
    // One run per distinct origin, starts strictly ascending and bounded
    assert_eq!(starts, vec![0, 2]);
    assert_eq!(ids, vec![100, 200]);
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
    assert!(*starts.last().unwrap() < combined.triangle_count() as u64);
}

#[test]
fn zero_sinks_perform_no_extraction() {
    let mesh = solid_to_buffers(&quad_solid(), 1).unwrap();
    MeshBufferExporter::new().export(&mesh).unwrap();
}

#[test]
fn empty_model_still_fires_requested_sinks() {
    let mesh = MeshBuffers::new(3).unwrap();
    let calls = std::cell::Cell::new(0);

    MeshBufferExporter::new()
        .with_properties(|view| {
            calls.set(calls.get() + 1);
            assert!(view.values.is_empty());
            assert_eq!(view.vertex_count, 0);
        })
        .with_triangles(|view| {
            calls.set(calls.get() + 1);
            assert!(view.values.is_empty());
            assert_eq!(view.triangle_count, 0);
        })
        .with_provenance(|view| {
            calls.set(calls.get() + 1);
            assert!(view.run_index.is_empty());
            assert!(view.run_original_ids.is_empty());
        })
        .export(&mesh)
        .unwrap();

    assert_eq!(calls.get(), 3);
}

#[test]
fn csgrs_solid_round_trips_through_all_channels() {
    let mesh = solid_to_buffers(&quad_solid(), 9).unwrap();

    let mut vertex_count = 0;
    let mut triangle_count = 0;
    let mut run_ids = Vec::new();

    MeshBufferExporter::new()
        .with_properties(|view| {
            vertex_count = view.vertex_count;
            assert_eq!(view.property_count, 6);
            assert_eq!(view.values.len(), view.vertex_count * 6);
        })
        .with_triangles(|view| {
            triangle_count = view.triangle_count;
            assert!(view.values.iter().all(|&i| (i as usize) < 4));
        })
        .with_provenance(|view| run_ids.extend_from_slice(view.run_original_ids))
        .export(&mesh)
        .unwrap();

    assert_eq!(vertex_count, 4);
    assert_eq!(triangle_count, 2);
    assert_eq!(run_ids, vec![9]);
}
