//! Quad stitching: connect the 4 cells around every crossed grid edge.
//!
//! For a sample coordinate `p` and an edge axis `a`, with `u = (a+1) % 3`
//! and `v = (a+2) % 3`, the edge `p → p + e_a` is shared by four cells:
//!
//! ```text
//!         v
//!         ▲
//!   c3 ───┼─── c2          c0 = p - e_u - e_v
//!   │     │     │          c1 = p - e_v
//!   ──────p──────▶ u       c2 = p
//!   │     │     │          c3 = p - e_u
//!   c0 ───┼─── c1
//! ```
//!
//! `c0 → c1 → c2 → c3` winds counter-clockwise around `+a`. When the far
//! endpoint `p + e_a` is positive the quad is emitted forward
//! `(c0, c1, c2), (c2, c3, c0)`, otherwise reversed
//! `(c3, c2, c1), (c1, c0, c3)`. Either way the front face looks toward the
//! positive side of the field.
//!
//! The split diagonal is always `c0`–`c2`. For y edges `(u, v) = (z, x)`, so
//! the quad is cut between cells `p - e_z - e_x` and `p`. Ordering that axis
//! as `(x, z)` instead would cut along the other diagonal with the same
//! winding.
//!
//! Stitching reads the index lookup written by extraction, so it must only
//! start after extraction has returned.

use glam::{UVec3, Vec3};
use rayon::prelude::*;
use smallvec::SmallVec;

use super::append::{AppendBuffer, IndexVolume, VertexBuffer};
use super::crossings::is_positive;
use super::normal::{normalize_or, quad_face};
use crate::constants::QUAD_INDEX_STRIDE;
use crate::field::ScalarField;
use crate::grid::GridDims;
use crate::types::NormalMode;

/// Four cell vertex indices around one crossed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
  /// Indices for `c0..c3`, in counter-clockwise order around the edge axis.
  pub vertices: [u32; 4],
  /// True when the far endpoint of the edge is positive.
  pub forward: bool,
}

impl Quad {
  /// Corner order as emitted: `c0..c3` forward, `c3..c0` reversed.
  #[inline]
  pub fn oriented(&self) -> [u32; 4] {
    let [i0, i1, i2, i3] = self.vertices;
    if self.forward {
      [i0, i1, i2, i3]
    } else {
      [i3, i2, i1, i0]
    }
  }

  /// Two triangles splitting the quad along the `q0`–`q2` diagonal.
  #[inline]
  pub fn triangles(&self) -> [u32; QUAD_INDEX_STRIDE] {
    let [q0, q1, q2, q3] = self.oriented();
    [q0, q1, q2, q2, q3, q0]
  }
}

/// Quads produced at sample coordinate `p`, at most one per axis.
///
/// Axes whose neighbour cells would fall below the grid (`p[u] == 0` or
/// `p[v] == 0`) are skipped, as are quads where any of the 4 cells has no
/// vertex.
pub fn stitch_cell<F: ScalarField + ?Sized>(
  field: &F,
  lookup: &IndexVolume,
  p: UVec3,
) -> SmallVec<[Quad; 3]> {
  let mut quads = SmallVec::new();
  let dims = field.dims().0;
  let near = field.sample(p.as_vec3());

  for axis in 0..3 {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    if p[u] == 0 || p[v] == 0 || p[axis] + 1 >= dims[axis] {
      continue;
    }

    let far = field.sample((p + UVec3::AXES[axis]).as_vec3());
    if is_positive(near) == is_positive(far) {
      continue;
    }

    let eu = UVec3::AXES[u];
    let ev = UVec3::AXES[v];
    let cells = [p - eu - ev, p - ev, p, p - eu];

    let mut vertices = [0u32; 4];
    let mut complete = true;
    for (slot, cell) in vertices.iter_mut().zip(cells) {
      match lookup.load(cell) {
        Some(index) => *slot = index,
        None => {
          complete = false;
          break;
        }
      }
    }

    if complete {
      quads.push(Quad {
        vertices,
        forward: is_positive(far),
      });
    }
  }

  quads
}

/// Sample coordinates visited by the stitcher: `[skip, dims - 1)` per axis.
fn stitch_range(dims: GridDims, boundary_skip: u32) -> (UVec3, GridDims) {
  let lo = UVec3::splat(boundary_skip);
  let hi = dims.cell_dims();
  let extent = hi.saturating_sub(lo);
  (lo, GridDims(extent))
}

/// Visit every stitch coordinate in parallel.
fn for_each_quad<F, Op>(field: &F, lookup: &IndexVolume, boundary_skip: u32, op: Op)
where
  F: ScalarField + ?Sized,
  Op: Fn(Quad) + Send + Sync,
{
  let (lo, range) = stitch_range(field.dims(), boundary_skip);

  (0..range.sample_count()).into_par_iter().for_each(|i| {
    let p = lo + range.coord(i);
    for quad in stitch_cell(field, lookup, p) {
      op(quad);
    }
  });
}

/// Stitching phase, shared-index variant: 6 indices per quad.
#[tracing::instrument(skip_all, name = "contour::stitch_quads")]
pub fn stitch_quads<F: ScalarField + ?Sized>(
  field: &F,
  lookup: &IndexVolume,
  boundary_skip: u32,
  indices: &AppendBuffer<u32>,
) {
  for_each_quad(field, lookup, boundary_skip, |quad| {
    if let Some(start) = indices.reserve(QUAD_INDEX_STRIDE) {
      for (i, index) in quad.triangles().into_iter().enumerate() {
        indices.write(start + i, index);
      }
    }
  });

  tracing::debug!(
    quads = indices.len() / QUAD_INDEX_STRIDE,
    dropped = indices.dropped(),
    "stitching complete"
  );
}

/// Stitching phase, duplicated-vertex variant: 6 (position, normal) pairs
/// per quad, no index buffer.
///
/// With [`NormalMode::Geometry`] every vertex of a quad gets the quad's flat
/// normal; otherwise (or when the quad has no area) each keeps its cell normal.
#[tracing::instrument(skip_all, name = "contour::stitch_quads_duplicated")]
pub fn stitch_quads_duplicated<F: ScalarField + ?Sized>(
  field: &F,
  lookup: &IndexVolume,
  cell_vertices: &VertexBuffer,
  boundary_skip: u32,
  normal_mode: NormalMode,
  out: &VertexBuffer,
) {
  for_each_quad(field, lookup, boundary_skip, |quad| {
    let mut corners = [(Vec3::ZERO, Vec3::Y); 4];
    for (corner, index) in corners.iter_mut().zip(quad.oriented()) {
      match cell_vertices.vertex(index) {
        Some(v) => *corner = v,
        None => return,
      }
    }

    if normal_mode == NormalMode::Geometry {
      // Collapsed quads keep their cell normals
      let face = quad_face(corners.map(|(position, _)| position));
      for corner in &mut corners {
        corner.1 = normalize_or(face, corner.1);
      }
    }

    let [q0, q1, q2, q3] = corners;
    out.push_run(&[q0, q1, q2, q2, q3, q0]);
  });

  tracing::debug!(
    quads = out.len() / 6,
    dropped = out.dropped(),
    "stitching complete"
  );
}

#[cfg(test)]
#[path = "stitch_test.rs"]
mod stitch_test;
