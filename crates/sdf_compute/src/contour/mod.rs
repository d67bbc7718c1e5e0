//! Dual contouring isosurface extraction.
//!
//! One vertex per cell that contains the surface, placed at the mean of the
//! cell's edge crossings, then one quad per crossed grid edge connecting the
//! four cells that share it.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  field: &impl ScalarField  - grid-space sampler + transform     │
//! │  config: ContourConfig     - mode, normals, skip, capacities    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              PHASE 1: Vertex Extraction (parallel per cell)     │
//! │    Sample 8 corners, collect up to 12 edge crossings            │
//! │    Vertex = mean of crossings, cell centre, or QEF minimizer    │
//! │    Normal = blend of crossing gradients and vertex gradient     │
//! │    reserve(2) in VertexBuffer, store index in IndexVolume       │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                    ═══════ phase barrier ═══════
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              PHASE 2: Quad Stitching (parallel per sample)      │
//! │    For each axis edge through p with a sign change:             │
//! │      look up the 4 surrounding cell vertices                    │
//! │      winding from the sign of the far endpoint                  │
//! │      reserve(6) indices  |  reserve(12) duplicated vertices     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              PHASE 3: Finish                                    │
//! │    Geometry normals, occlusion rays (if requested), bounds,     │
//! │    overflow report                                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output buffers are fixed-capacity append buffers. Running out of space
//! drops whole elements and is reported in [`MeshOutput::overflow`].

pub mod append;
pub mod crossings;
pub mod extract;
pub mod normal;
pub mod qef;
pub mod stitch;

pub use append::{AppendBuffer, IndexVolume, VertexBuffer};
pub use crossings::{crossing_t, crossings, EdgeCrossing};
pub use extract::{extract_cell, extract_vertices, CellVertex};
pub use qef::{dual_contour_vertex, QefSolution};
pub use stitch::{stitch_cell, stitch_quads, stitch_quads_duplicated, Quad};

use crate::constants::{QUAD_INDEX_STRIDE, QUAD_VERTEX_STRIDE, VERTEX_STRIDE};
use crate::error::Result;
use crate::field::{FieldSdf, ScalarField};
use crate::occlusion::compute_occlusion;
use crate::types::{ContourConfig, MeshOutput, MinMaxAABB, NormalMode, Overflow};

/// Worst-case quad count for a field: 3 edges per stitched sample.
#[inline]
pub fn max_quads(cell_count: usize) -> usize {
  3 * cell_count
}

/// Extract the isosurface of `field` as a triangle mesh.
///
/// Runs extraction, waits for it to finish, then stitches. The mesh is in
/// world space with triangles facing the positive side of the field.
#[tracing::instrument(skip_all, name = "contour::generate", fields(dims = ?field.dims().0))]
pub fn generate<F: ScalarField + ?Sized>(field: &F, config: &ContourConfig) -> Result<MeshOutput> {
  config.validate()?;
  let dims = field.dims();
  dims.validate()?;
  field.transform().validate()?;

  let cell_count = dims.cell_count();
  let vertex_capacity = config.vertex_capacity.unwrap_or(cell_count);
  let quad_capacity = config.quad_capacity.unwrap_or_else(|| max_quads(cell_count));

  let cell_vertices = VertexBuffer::with_capacity(vertex_capacity);
  let lookup = IndexVolume::new(dims);

  extract_vertices(field, config, &cell_vertices, &lookup);
  // extract_vertices has returned: every vertex and lookup write is visible.

  let mut output = if config.duplicate_vertices {
    let out = VertexBuffer::with_capacity(quad_capacity * QUAD_VERTEX_STRIDE / VERTEX_STRIDE);
    stitch_quads_duplicated(
      field,
      &lookup,
      &cell_vertices,
      config.boundary_skip,
      config.normal_mode,
      &out,
    );
    let overflow = Overflow {
      vertices: cell_vertices.dropped(),
      quads: out.dropped(),
    };
    MeshOutput {
      vertices: out.into_vertices(),
      indices: Vec::new(),
      bounds: MinMaxAABB::empty(),
      overflow,
      occlusion: Vec::new(),
    }
  } else {
    let indices = AppendBuffer::with_capacity(quad_capacity * QUAD_INDEX_STRIDE);
    stitch_quads(field, &lookup, config.boundary_skip, &indices);
    let overflow = Overflow {
      vertices: cell_vertices.dropped(),
      quads: indices.dropped(),
    };
    let mut output = MeshOutput {
      vertices: cell_vertices.into_vertices(),
      indices: indices.into_vec(),
      bounds: MinMaxAABB::empty(),
      overflow,
      occlusion: Vec::new(),
    };
    if config.normal_mode == NormalMode::Geometry {
      normal::recalculate_from_geometry(&mut output);
    }
    output
  };

  if let Some(occlusion) = &config.occlusion {
    let escape = field.transform().cell_size.max_element();
    output.occlusion = compute_occlusion(&FieldSdf(field), &output.vertices, escape, occlusion);
  }

  for v in &output.vertices {
    output.bounds.encapsulate(v.position);
  }

  if !output.overflow.is_empty() {
    tracing::warn!(
      dropped_vertices = output.overflow.vertices,
      dropped_quads = output.overflow.quads,
      vertex_capacity,
      quad_capacity,
      "output buffers exhausted, mesh is incomplete"
    );
  }

  tracing::debug!(
    vertices = output.vertices.len(),
    triangles = output.triangle_count(),
    "contour complete"
  );

  Ok(output)
}
