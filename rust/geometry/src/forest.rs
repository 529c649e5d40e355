// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon forest reconstruction
//!
//! Takes a flat, possibly-overlapping collection of 2D polygons, delegates
//! the boolean union to the i_overlay clip engine (positive fill rule), and
//! rebuilds the result into an owned tree of [`PolygonNode`]s: depth 0 nodes
//! are filled outer boundaries, odd depths are holes, even depths are islands
//! inside holes, and so on.
//!
//! The clip engine reports each filled region as an outer loop plus its
//! direct holes; islands that sit inside a hole come back as separate
//! top-level regions. The nesting pass here re-attaches each such region
//! under the smallest hole that contains it, restoring the full
//! parity-alternating hierarchy.

use crate::contour::{
    bounds_contain, contour_bounds, is_finite_contour, point_in_contour, signed_area,
};
use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use rustc_hash::FxHashMap;

/// Working precision of the union: coordinates are snapped to this many
/// decimal digits before clipping
const CLIP_PRECISION_DIGITS: u32 = 8;

/// One boundary loop in a reconstructed polygon forest
///
/// Owns its entire descendant subtree; dropping a node releases every
/// descendant. Never mutated after construction.
#[derive(Debug, Default)]
pub struct PolygonNode {
    /// Closed loop, no closing duplicate point
    pub polygon: Vec<Point2<f64>>,
    /// Directly nested loops, each of opposite fill polarity
    pub children: Vec<PolygonNode>,
}

impl PolygonNode {
    /// Create a leaf node from one loop
    pub fn new(polygon: Vec<Point2<f64>>) -> Self {
        Self {
            polygon,
            children: Vec::new(),
        }
    }

    /// Signed area of this node's own loop (engine winding, not parity)
    pub fn area(&self) -> f64 {
        signed_area(&self.polygon)
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl Drop for PolygonNode {
    fn drop(&mut self) {
        // Drain descendants iteratively; the default recursive drop would
        // overflow the stack on very deep hole/island chains.
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Compute the union of `polygons` and reconstruct it as a polygon forest
///
/// Input polygons may overlap, self-intersect, be degenerate, or be wound in
/// either direction. Degenerate and zero-area input vanishes in the union;
/// empty input yields an empty forest. Non-finite coordinates are rejected
/// up front with [`Error::InvalidGeometry`] rather than handed to the clip
/// engine.
pub fn build_forest(polygons: &[Vec<Point2<f64>>]) -> Result<Vec<PolygonNode>> {
    for polygon in polygons {
        if !is_finite_contour(polygon) {
            return Err(Error::InvalidGeometry(
                "input polygon contains a non-finite coordinate".to_string(),
            ));
        }
    }

    let subject: Vec<Vec<[f64; 2]>> = polygons
        .iter()
        .filter(|p| p.len() >= 3)
        .map(|p| p.iter().map(|pt| [snap(pt.x), snap(pt.y)]).collect())
        .collect();

    if subject.is_empty() {
        return Ok(Vec::new());
    }

    // Union against an empty clip operand resolves the subject's own
    // overlaps and windings under the positive fill rule. i_overlay defines
    // winding with the opposite sign to the shoelace convention used here,
    // so its `Negative` variant is the positive rule in our orientation.
    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::Negative);

    assemble_forest(shapes)
}

/// Snap a coordinate to the fixed working precision
fn snap(v: f64) -> f64 {
    let scale = 10f64.powi(CLIP_PRECISION_DIGITS as i32);
    (v * scale).round() / scale
}

/// One filled region as reported by the clip engine: an outer boundary plus
/// its direct holes
struct RegionLoops {
    outer: Vec<Point2<f64>>,
    holes: Vec<Vec<Point2<f64>>>,
}

/// Nest the engine's flat region list into an owned forest
fn assemble_forest(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Result<Vec<PolygonNode>> {
    let mut regions = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let mut loops = shape.into_iter().map(|contour| {
            contour
                .into_iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect::<Vec<_>>()
        });

        let outer = loops.next().ok_or_else(|| {
            Error::ClipEngine("union result contains a region with no outer boundary".to_string())
        })?;

        regions.push(RegionLoops {
            outer,
            holes: loops.collect(),
        });
    }

    // Every hole, keyed by (region, hole) index, with its bounds and area.
    let mut holes = Vec::new();
    for (r, region) in regions.iter().enumerate() {
        for (h, hole) in region.holes.iter().enumerate() {
            if let Some(bounds) = contour_bounds(hole) {
                holes.push(((r, h), bounds, signed_area(hole).abs()));
            }
        }
    }

    // Attach each region to the smallest hole of another region that
    // contains it; regions contained by no hole are forest roots.
    let mut children_of_hole: FxHashMap<(usize, usize), Vec<usize>> = FxHashMap::default();
    let mut roots = Vec::new();

    for (r, region) in regions.iter().enumerate() {
        let Some((r_min, r_max)) = contour_bounds(&region.outer) else {
            roots.push(r);
            continue;
        };
        let mut parent: Option<((usize, usize), f64)> = None;

        for ((hr, hh), (h_min, h_max), h_area) in &holes {
            if *hr == r {
                continue;
            }
            if !bounds_contain(h_min, h_max, &r_min, &r_max) {
                continue;
            }
            if !mostly_inside(&region.outer, &regions[*hr].holes[*hh]) {
                continue;
            }
            match parent {
                Some((_, best_area)) if best_area <= *h_area => {}
                _ => parent = Some(((*hr, *hh), *h_area)),
            }
        }

        match parent {
            Some((hole_key, _)) => children_of_hole.entry(hole_key).or_default().push(r),
            None => roots.push(r),
        }
    }

    let mut slots: Vec<Option<RegionLoops>> = regions.into_iter().map(Some).collect();
    roots
        .into_iter()
        .map(|r| assemble_region(r, &mut slots, &children_of_hole))
        .collect()
}

/// Build the owned node for one region, recursing into islands attached to
/// its holes
fn assemble_region(
    region_idx: usize,
    slots: &mut [Option<RegionLoops>],
    children_of_hole: &FxHashMap<(usize, usize), Vec<usize>>,
) -> Result<PolygonNode> {
    let region = slots[region_idx].take().ok_or_else(|| {
        Error::ClipEngine("union result nests a region inside itself".to_string())
    })?;

    let mut node = PolygonNode::new(region.outer);
    for (h, hole) in region.holes.into_iter().enumerate() {
        let mut hole_node = PolygonNode::new(hole);
        if let Some(islands) = children_of_hole.get(&(region_idx, h)) {
            for &island in islands {
                hole_node
                    .children
                    .push(assemble_region(island, slots, children_of_hole)?);
            }
        }
        node.children.push(hole_node);
    }

    Ok(node)
}

/// Majority-vote containment: loops in a union result may share isolated
/// vertices with the hole that surrounds them, so requiring every vertex to
/// test strictly inside is too strict and a single vertex is too fragile.
fn mostly_inside(inner: &[Point2<f64>], hole: &[Point2<f64>]) -> bool {
    if inner.is_empty() {
        return false;
    }
    let inside = inner.iter().filter(|p| point_in_contour(p, hole)).count();
    inside * 2 > inner.len()
}
