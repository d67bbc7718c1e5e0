//! Stage 2: Meshing
//!
//! Thin wrapper around [`contour::generate`] that:
//! - Processes inputs in parallel via rayon
//! - Tracks timing per chunk
//! - Preserves chunk ids and input order
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ Meshing Stage                                                           │
//! │                                                                         │
//! │  MeshInput { id, field, config }     PresampleOutput { id, volume }     │
//! │           │                                   │ (None → empty mesh)     │
//! │           ▼                                   ▼                         │
//! │  ┌─────────────────────────────────────────────────────────┐            │
//! │  │ contour::generate(&field, &config)                      │            │
//! │  │ → MeshOutput { vertices, indices, bounds, occlusion }   │            │
//! │  └─────────────────────────────────────────────────────────┘            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  MeshResult { id, output, timing }                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rayon::prelude::*;
use web_time::Instant;

use super::presample::presample_chunk;
use super::types::{BatchSummary, ChunkSpec, MeshInput, MeshResult, PresampleOutput, StageTiming};
use crate::contour;
use crate::error::Result;
use crate::field::ScalarField;
use crate::sdf::Sdf;
use crate::types::{ContourConfig, MeshOutput};

/// Mesh a single chunk.
pub fn mesh_chunk<F: ScalarField>(input: MeshInput<F>) -> Result<MeshResult> {
  let start = Instant::now();
  let output = contour::generate(&input.field, &input.config)?;
  let mesh_us = start.elapsed().as_micros() as u64;

  Ok(MeshResult {
    id: input.id,
    output,
    timing: StageTiming {
      sample_us: 0,
      mesh_us,
    },
  })
}

/// Mesh multiple chunks in parallel using rayon.
///
/// Results maintain the same order as inputs. The first invalid input fails
/// the whole batch.
#[tracing::instrument(skip_all, name = "pipeline::mesh_batch", fields(chunks = inputs.len()))]
pub fn mesh_batch<F: ScalarField>(inputs: Vec<MeshInput<F>>) -> Result<Vec<MeshResult>> {
  if inputs.is_empty() {
    return Ok(Vec::new());
  }

  let results: Vec<MeshResult> = inputs.into_par_iter().map(mesh_chunk).collect::<Result<_>>()?;
  log_summary(&results);
  Ok(results)
}

/// Mesh a presampled chunk. Homogeneous chunks yield an empty mesh.
pub fn mesh_presampled(presampled: PresampleOutput, config: &ContourConfig) -> Result<MeshResult> {
  let sample_us = presampled.timing_us;

  let (output, mesh_us) = match presampled.volume {
    Some(volume) => {
      let start = Instant::now();
      let output = contour::generate(&volume, config)?;
      (output, start.elapsed().as_micros() as u64)
    }
    None => (MeshOutput::new(), 0),
  };

  Ok(MeshResult {
    id: presampled.id,
    output,
    timing: StageTiming { sample_us, mesh_us },
  })
}

/// Sample then mesh every chunk of an SDF in parallel, preserving order.
#[tracing::instrument(skip_all, name = "pipeline::sample_and_mesh", fields(chunks = chunks.len()))]
pub fn sample_and_mesh<S: Sdf + ?Sized>(
  sdf: &S,
  chunks: &[ChunkSpec],
  config: &ContourConfig,
) -> Result<Vec<MeshResult>> {
  config.validate()?;
  if chunks.is_empty() {
    return Ok(Vec::new());
  }

  let results: Vec<MeshResult> = chunks
    .par_iter()
    .map(|chunk| mesh_presampled(presample_chunk(sdf, chunk)?, config))
    .collect::<Result<_>>()?;
  log_summary(&results);
  Ok(results)
}

fn log_summary(results: &[MeshResult]) {
  let summary = BatchSummary::from_results(results);
  if summary.overflowed_chunks > 0 {
    tracing::warn!(
      overflowed = summary.overflowed_chunks,
      chunks = summary.chunks,
      "chunks exceeded their output capacity"
    );
  }
  tracing::debug!(
    chunks = summary.chunks,
    empty = summary.empty_chunks,
    vertices = summary.vertices,
    triangles = summary.triangles,
    total_us = summary.total_us,
    "batch meshed"
  );
}

#[cfg(test)]
#[path = "meshing_test.rs"]
mod meshing_test;
