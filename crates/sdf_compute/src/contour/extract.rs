//! Vertex extraction: one representative vertex per surface cell.
//!
//! Each cell is an independent invocation. It reads its 8 corners (plus
//! gradient taps that may reach into neighbours), and if any edge crosses
//! the surface it appends one vertex and records the index under its own
//! cell coordinate. Empty cells keep [`NO_VERTEX`](crate::constants::NO_VERTEX).

use glam::{UVec3, Vec3};
use rayon::prelude::*;

use super::append::{IndexVolume, VertexBuffer};
use super::crossings::{crossings, mean_position};
use super::normal::blend_cell_normal;
use super::qef::dual_contour_vertex;
use crate::constants::CORNER_OFFSETS;
use crate::field::ScalarField;
use crate::grid::GridDims;
use crate::types::{ContourConfig, MeshMode};

/// A cell's surface vertex in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellVertex {
  pub position: Vec3,
  pub normal: Vec3,
  /// Edge crossings that contributed to the vertex.
  pub crossings: usize,
}

/// The 8 corner samples of `cell`, indexed by corner bits.
#[inline]
pub fn corner_samples<F: ScalarField + ?Sized>(field: &F, cell: UVec3) -> [f32; 8] {
  std::array::from_fn(|i| field.sample((cell + UVec3::from_array(CORNER_OFFSETS[i])).as_vec3()))
}

/// Compute the vertex for one cell, `None` when no edge crosses the surface.
///
/// The normal is always the gradient blend. [`NormalMode::Geometry`](crate::types::NormalMode::Geometry)
/// replaces it after stitching, except where the vertex has no usable face.
pub fn extract_cell<F: ScalarField + ?Sized>(
  field: &F,
  cell: UVec3,
  config: &ContourConfig,
) -> Option<CellVertex> {
  let corners = corner_samples(field, cell);
  let found = crossings(cell, &corners);
  let mean = mean_position(&found)?;

  let grid_vertex = match config.mode {
    MeshMode::SurfaceNet => mean,
    MeshMode::Blocky => cell.as_vec3() + Vec3::splat(0.5),
    MeshMode::DualContour => dual_contour_vertex(field, cell, &found, mean),
  };

  let normal = blend_cell_normal(field, &found, grid_vertex, config.normal_sample_delta);

  Some(CellVertex {
    position: field.transform().grid_to_world(grid_vertex),
    normal,
    crossings: found.len(),
  })
}

/// Extraction phase: run [`extract_cell`] for every cell in parallel.
///
/// Appends to `vertices` and fills `lookup`. When the vertex buffer is full
/// the cell is dropped (counted by the buffer) and keeps the sentinel, so
/// quads around it are skipped rather than pointing at garbage.
#[tracing::instrument(skip_all, name = "contour::extract_vertices", fields(cells = field.dims().cell_count()))]
pub fn extract_vertices<F: ScalarField + ?Sized>(
  field: &F,
  config: &ContourConfig,
  vertices: &VertexBuffer,
  lookup: &IndexVolume,
) {
  let cells = GridDims(field.dims().cell_dims());

  (0..cells.sample_count()).into_par_iter().for_each(|i| {
    let cell = cells.coord(i);
    if let Some(v) = extract_cell(field, cell, config) {
      if let Some(index) = vertices.push(v.position, v.normal) {
        lookup.store(cell, index);
      }
    }
  });

  tracing::debug!(
    vertices = vertices.len(),
    dropped = vertices.dropped(),
    "extraction complete"
  );
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
