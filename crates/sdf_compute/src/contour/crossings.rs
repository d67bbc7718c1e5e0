//! Edge zero-crossings of a single cell.
//!
//! The 12 edges are visited as 3 groups of 4, one group per axis, holding
//! the other two corner coordinates at {0, 1}:
//!
//! ```text
//! group  axis  varying corners (x,y,z)
//! ─────  ────  ───────────────────────────────────────────────
//!   0     Z    (0,0,*) (0,1,*) (1,0,*) (1,1,*)
//!   1     Y    (0,*,0) (0,*,1) (1,*,0) (1,*,1)
//!   2     X    (*,0,0) (*,0,1) (*,1,0) (*,1,1)
//! ```
//!
//! A crossing's position is the cell origin plus the low corner offset plus
//! `t` along the edge axis, all in grid space.

use glam::{UVec3, Vec3};
use smallvec::SmallVec;

use crate::constants::{corner_index, CORNER_OFFSETS, MAX_CELL_CROSSINGS};

/// One axis-aligned cell edge between two corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellEdge {
  pub axis: usize,
  /// Corner at the low end of the edge.
  pub from: usize,
  /// Corner at the high end of the edge.
  pub to: usize,
}

const fn edge(axis: usize, from: usize, to: usize) -> CellEdge {
  CellEdge { axis, from, to }
}

/// Cell edges in visiting order.
pub const CELL_EDGES: [CellEdge; 12] = [
  edge(2, corner_index(0, 0, 0), corner_index(0, 0, 1)),
  edge(2, corner_index(0, 1, 0), corner_index(0, 1, 1)),
  edge(2, corner_index(1, 0, 0), corner_index(1, 0, 1)),
  edge(2, corner_index(1, 1, 0), corner_index(1, 1, 1)),
  edge(1, corner_index(0, 0, 0), corner_index(0, 1, 0)),
  edge(1, corner_index(0, 0, 1), corner_index(0, 1, 1)),
  edge(1, corner_index(1, 0, 0), corner_index(1, 1, 0)),
  edge(1, corner_index(1, 0, 1), corner_index(1, 1, 1)),
  edge(0, corner_index(0, 0, 0), corner_index(1, 0, 0)),
  edge(0, corner_index(0, 0, 1), corner_index(1, 0, 1)),
  edge(0, corner_index(0, 1, 0), corner_index(1, 1, 0)),
  edge(0, corner_index(0, 1, 1), corner_index(1, 1, 1)),
];

/// Surface crossing on one cell edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCrossing {
  pub axis: usize,
  /// Interpolation parameter from the low corner, in `[0, 1]`.
  pub t: f32,
  /// Grid-space position of the crossing.
  pub position: Vec3,
}

/// Per-cell crossing scratch, never spills for a single cell.
pub type Crossings = SmallVec<[EdgeCrossing; MAX_CELL_CROSSINGS]>;

/// Sign test shared by extraction, stitching and ray marching.
#[inline(always)]
pub fn is_positive(value: f32) -> bool {
  value > 0.0
}

/// Zero-crossing parameter between two samples, if their signs differ.
#[inline]
pub fn crossing_t(a: f32, b: f32) -> Option<f32> {
  if is_positive(a) == is_positive(b) {
    return None;
  }
  Some((0.0 - a) / (b - a))
}

/// True when the 8 corners do not all share a sign.
#[inline]
pub fn has_sign_change(corners: &[f32; 8]) -> bool {
  let first = is_positive(corners[0]);
  corners[1..].iter().any(|&v| is_positive(v) != first)
}

/// Collect every edge crossing of the cell at grid coordinate `origin`.
pub fn crossings(origin: UVec3, corners: &[f32; 8]) -> Crossings {
  let mut found = Crossings::new();
  if !has_sign_change(corners) {
    return found;
  }

  let base = origin.as_vec3();
  for e in &CELL_EDGES {
    if let Some(t) = crossing_t(corners[e.from], corners[e.to]) {
      let start = base + UVec3::from_array(CORNER_OFFSETS[e.from]).as_vec3();
      found.push(EdgeCrossing {
        axis: e.axis,
        t,
        position: start + Vec3::AXES[e.axis] * t,
      });
    }
  }
  found
}

/// Arithmetic mean of the crossing positions (unweighted).
#[inline]
pub fn mean_position(crossings: &[EdgeCrossing]) -> Option<Vec3> {
  if crossings.is_empty() {
    return None;
  }
  let sum: Vec3 = crossings.iter().map(|c| c.position).sum();
  Some(sum / crossings.len() as f32)
}

#[cfg(test)]
#[path = "crossings_test.rs"]
mod crossings_test;
