//! Pipeline I/O types.

use std::fmt;

use crate::field::ScalarVolume;
use crate::grid::{GridDims, GridTransform};
use crate::types::{ContourConfig, MeshOutput};

/// Caller-chosen chunk identifier, carried through every stage.
pub type ChunkId = u64;

// =============================================================================
// Stage 1: Presample Types
// =============================================================================

/// A grid-aligned region of an SDF to sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkSpec {
  pub id: ChunkId,
  pub dims: GridDims,
  pub transform: GridTransform,
}

impl ChunkSpec {
  pub fn new(id: ChunkId, dims: GridDims, transform: GridTransform) -> Self {
    Self {
      id,
      dims,
      transform,
    }
  }
}

/// Output from presampling a single chunk.
pub struct PresampleOutput {
  pub id: ChunkId,

  /// Sampled volume if the surface may cross it, `None` if every sample has
  /// the same sign.
  pub volume: Option<ScalarVolume>,

  /// Time taken to sample, in microseconds.
  pub timing_us: u64,
}

impl fmt::Debug for PresampleOutput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PresampleOutput")
      .field("id", &self.id)
      .field("volume", &self.volume.as_ref().map(|v| v.samples().len()))
      .field("timing_us", &self.timing_us)
      .finish()
  }
}

// =============================================================================
// Stage 2: Meshing Types
// =============================================================================

/// Input for meshing a single chunk.
pub struct MeshInput<F> {
  pub id: ChunkId,

  /// Field to contour (volume, analytic SDF, boxed trait object).
  pub field: F,

  pub config: ContourConfig,
}

impl<F> MeshInput<F> {
  pub fn new(id: ChunkId, field: F, config: ContourConfig) -> Self {
    Self { id, field, config }
  }
}

/// Per-stage timings for one chunk, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTiming {
  pub sample_us: u64,
  pub mesh_us: u64,
}

impl StageTiming {
  pub fn total_us(&self) -> u64 {
    self.sample_us + self.mesh_us
  }
}

/// Result of meshing a single chunk.
#[derive(Clone, Debug)]
pub struct MeshResult {
  pub id: ChunkId,

  /// Generated mesh (empty when the chunk holds no surface).
  pub output: MeshOutput,

  pub timing: StageTiming,
}

/// Aggregate statistics over a batch of results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
  pub chunks: usize,
  pub empty_chunks: usize,
  pub vertices: usize,
  pub triangles: usize,
  /// Chunks whose output buffers ran out of space.
  pub overflowed_chunks: usize,
  pub total_us: u64,
}

impl BatchSummary {
  pub fn from_results(results: &[MeshResult]) -> Self {
    results.iter().fold(Self::default(), |mut acc, r| {
      acc.chunks += 1;
      acc.empty_chunks += r.output.is_empty() as usize;
      acc.vertices += r.output.vertices.len();
      acc.triangles += r.output.triangle_count();
      acc.overflowed_chunks += !r.output.overflow.is_empty() as usize;
      acc.total_us += r.timing.total_us();
      acc
    })
  }
}
