//! Quadratic error minimization for dual contouring vertices.
//!
//! Each crossing contributes a plane `(p_i, n_i)`. The vertex minimizes
//!
//! ```text
//! E(x) = Σ (n_i · (x - p_i))²
//! ```
//!
//! Solved around the mass point `m = mean(p_i)` as
//! `(AᵀA + λI) (x - m) = Aᵀb`, where the small `λ` keeps flat and edge-like
//! cells (rank-deficient `AᵀA`) anchored to `m` along their free directions.
//! Everything here runs in grid space.

use glam::{Mat3, UVec3, Vec3};
use smallvec::SmallVec;

use super::crossings::EdgeCrossing;
use super::normal::normalize_or_up;
use crate::constants::{
  MAX_CELL_CROSSINGS, QEF_CELL_TOLERANCE, QEF_NORMAL_DELTA, QEF_REGULARIZATION,
};
use crate::field::ScalarField;

/// Minimizer of the plane error and its residual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QefSolution {
  pub position: Vec3,
  /// `E(position)`, zero when every plane passes through it.
  pub error: f32,
}

/// Solve for the point closest to all planes `(point, unit normal)`.
///
/// `None` for an empty set or a numerically singular system.
pub fn solve(planes: &[(Vec3, Vec3)]) -> Option<QefSolution> {
  if planes.is_empty() {
    return None;
  }

  let mass = planes.iter().map(|(p, _)| *p).sum::<Vec3>() / planes.len() as f32;

  let mut ata = Mat3::IDENTITY * QEF_REGULARIZATION;
  let mut atb = Vec3::ZERO;
  for &(point, normal) in planes {
    ata += Mat3::from_cols(normal * normal.x, normal * normal.y, normal * normal.z);
    atb += normal * normal.dot(point - mass);
  }

  if ata.determinant().abs() < 1e-12 {
    return None;
  }
  let offset = ata.inverse() * atb;
  if !offset.is_finite() {
    return None;
  }

  let position = mass + offset;
  let error = planes
    .iter()
    .map(|&(point, normal)| {
      let d = normal.dot(position - point);
      d * d
    })
    .sum();

  Some(QefSolution { position, error })
}

/// True when `p` lies within the cell, grown by the QEF tolerance.
#[inline]
pub fn within_cell(cell: UVec3, p: Vec3) -> bool {
  let lo = cell.as_vec3() - Vec3::splat(QEF_CELL_TOLERANCE);
  let hi = cell.as_vec3() + Vec3::splat(1.0 + QEF_CELL_TOLERANCE);
  p.cmpge(lo).all() && p.cmple(hi).all()
}

/// Pick the vertex from solved planes, falling back to `mean` when the
/// system is singular or the solution escapes the cell.
#[inline]
pub fn place(cell: UVec3, planes: &[(Vec3, Vec3)], mean: Vec3) -> Vec3 {
  match solve(planes) {
    Some(solution) if within_cell(cell, solution.position) => solution.position,
    _ => mean,
  }
}

/// Dual contouring vertex for `cell` in grid space.
///
/// Crossing normals are sampled at a finer step than cell normals so the
/// planes follow the surface on each side of a crease.
pub fn dual_contour_vertex<F: ScalarField + ?Sized>(
  field: &F,
  cell: UVec3,
  crossings: &[EdgeCrossing],
  mean: Vec3,
) -> Vec3 {
  let planes: SmallVec<[(Vec3, Vec3); MAX_CELL_CROSSINGS]> = crossings
    .iter()
    .map(|c| (c.position, normalize_or_up(field.gradient(c.position, QEF_NORMAL_DELTA))))
    .collect();
  place(cell, &planes, mean)
}

#[cfg(test)]
#[path = "qef_test.rs"]
mod qef_test;
