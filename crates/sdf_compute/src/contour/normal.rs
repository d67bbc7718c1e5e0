//! Surface normals: field gradients and triangle geometry.
//!
//! Gradient normals are taken in grid space, mapped to world space through
//! the field transform, then normalized. A cell normal blends two stages:
//!
//! ```text
//! n_edges  = mean(normalize(grad(crossing_i)))
//! n_vertex = normalize(grad(vertex))
//! n_cell   = normalize((n_edges + n_vertex) / 2)
//! ```

use glam::{Vec3, Vec3A};

use super::crossings::EdgeCrossing;
use crate::field::ScalarField;
use crate::types::MeshOutput;

/// Normalize, falling back to `fallback` for degenerate vectors.
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
  let len_sq = v.length_squared();
  if len_sq < 1e-8 || !len_sq.is_finite() {
    return fallback;
  }
  v * len_sq.sqrt().recip()
}

/// Normalize, falling back to +Y for degenerate vectors.
#[inline]
pub fn normalize_or_up(v: Vec3) -> Vec3 {
  normalize_or(v, Vec3::Y)
}

/// World-space unit normal from a central difference at a grid position.
#[inline]
pub fn sample_normal<F: ScalarField + ?Sized>(field: &F, grid_pos: Vec3, delta: f32) -> Vec3 {
  let grid_gradient = field.gradient(grid_pos, delta);
  normalize_or_up(field.transform().gradient_to_world(grid_gradient))
}

/// Two-stage cell normal: crossing normals averaged, then blended with the
/// normal at the vertex itself.
pub fn blend_cell_normal<F: ScalarField + ?Sized>(
  field: &F,
  crossings: &[EdgeCrossing],
  vertex: Vec3,
  delta: f32,
) -> Vec3 {
  let at_vertex = sample_normal(field, vertex, delta);
  if crossings.is_empty() {
    return at_vertex;
  }

  let sum: Vec3 = crossings
    .iter()
    .map(|c| sample_normal(field, c.position, delta))
    .sum();
  let edge_mean = sum / crossings.len() as f32;

  normalize_or_up((edge_mean + at_vertex) * 0.5)
}

/// Unnormalized face direction of a quad `q0 → q1 → q2 → q3`, from its
/// diagonals. Zero when the quad has collapsed.
#[inline]
pub fn quad_face(q: [Vec3; 4]) -> Vec3 {
  (q[2] - q[0]).cross(q[3] - q[1])
}

/// Unit normal of a planar-ish quad `q0 → q1 → q2 → q3`.
///
/// Matches the winding of the triangles `(q0, q1, q2), (q2, q3, q0)`.
#[inline]
pub fn quad_normal(q: [Vec3; 4]) -> Vec3 {
  normalize_or_up(quad_face(q))
}

// =============================================================================
// Geometry-based normal recalculation
// =============================================================================

/// Recalculate normals from triangle geometry using angle-weighted averaging.
///
/// Each face contributes its unit normal to each of its corners, weighted by
/// the interior angle at that corner. Degenerate faces are skipped. A vertex
/// with no usable face keeps its current normal (+Y if that is degenerate).
pub fn recalculate_from_geometry(output: &mut MeshOutput) {
  let mut accum = vec![Vec3A::ZERO; output.vertices.len()];
  let vertices = &output.vertices;

  for tri in output.indices.chunks_exact(3) {
    let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
      continue;
    }

    let p0 = Vec3A::from_array(vertices[i0].position);
    let p1 = Vec3A::from_array(vertices[i1].position);
    let p2 = Vec3A::from_array(vertices[i2].position);

    let e01 = p1 - p0;
    let e02 = p2 - p0;
    let e12 = p2 - p1;

    let face = e01.cross(e02);
    let face_len_sq = face.length_squared();
    if face_len_sq < 1e-12 {
      continue;
    }
    let face_unit = face * face_len_sq.sqrt().recip();

    accum[i0] += face_unit * vertex_angle(e01, e02);
    accum[i1] += face_unit * vertex_angle(-e01, e12);
    accum[i2] += face_unit * vertex_angle(-e02, -e12);
  }

  for (vertex, n) in output.vertices.iter_mut().zip(accum) {
    let current = normalize_or_up(Vec3::from_array(vertex.normal));
    vertex.normal = normalize_or(n.into(), current).to_array();
  }
}

/// Interior angle between two edge vectors leaving the same vertex.
#[inline]
fn vertex_angle(e1: Vec3A, e2: Vec3A) -> f32 {
  let len1_sq = e1.length_squared();
  let len2_sq = e2.length_squared();

  if len1_sq < 1e-12 || len2_sq < 1e-12 {
    return 0.0;
  }

  let cos_angle = e1.dot(e2) / (len1_sq.sqrt() * len2_sq.sqrt());
  cos_angle.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
#[path = "normal_test.rs"]
mod normal_test;
