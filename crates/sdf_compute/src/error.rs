//! Error types for dispatch-level contract checks.
//!
//! Per-invocation work (one cell, one ray) never fails: degenerate input
//! yields empty or sentinel output. What can fail is setting a dispatch up
//! with dimensions, transforms or ray ranges that would index out of bounds.

use thiserror::Error;

/// Invalid grid or transform parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("grid dimensions {dims:?} must be at least 2 on every axis")]
  GridTooSmall { dims: [u32; 3] },

  #[error("cell size {cell_size:?} must be finite and positive on every axis")]
  InvalidCellSize { cell_size: [f32; 3] },

  #[error("normal sample delta {0} must be finite and positive")]
  InvalidNormalDelta(f32),

  #[error("step bounds [{min}, {max}] must satisfy 0 < min <= max")]
  InvalidStepBounds { min: f32, max: f32 },

  #[error("hit epsilon {0} must be finite and non-negative")]
  InvalidHitEpsilon(f32),

  #[error("max iterations must be non-zero")]
  ZeroIterations,

  #[error("occlusion needs at least one ray per vertex")]
  ZeroOcclusionRays,

  #[error("occlusion ray length {0} must be finite and positive")]
  InvalidOcclusionLength(f32),

  #[error("occlusion surface offset {0} must be finite and non-negative")]
  InvalidSurfaceOffset(f32),

  #[error("volume holds {actual} samples, dimensions {dims:?} need {expected}")]
  SampleCountMismatch {
    dims: [u32; 3],
    expected: usize,
    actual: usize,
  },
}

/// Invalid ray batch layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RayBatchError {
  #[error("ray data length {0} is not a multiple of 6 floats (start xyz, end xyz)")]
  RaggedRayData(usize),

  #[error("ray range {offset}..{end} exceeds {available} addressable rays")]
  RangeOutOfBounds {
    offset: usize,
    end: usize,
    available: usize,
  },

  #[error("ray index {index} at slot {slot} exceeds {ray_count} rays")]
  IndexOutOfBounds {
    slot: usize,
    index: u32,
    ray_count: usize,
  },

  #[error("result buffer holds {actual} entries, batch needs {required}")]
  ResultBufferTooSmall { required: usize, actual: usize },
}

/// Top-level error for pipeline entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  RayBatch(#[from] RayBatchError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
