//! Stage 1: Presample
//!
//! Evaluates an SDF over each chunk's grid and detects homogeneous chunks.
//! Homogeneous chunks (every sample on the same side) skip meshing entirely.

use rayon::prelude::*;
use web_time::Instant;

use super::types::{ChunkSpec, PresampleOutput};
use crate::contour::crossings::is_positive;
use crate::error::Result;
use crate::field::ScalarVolume;
use crate::sdf::Sdf;

/// Check if every sample has the same sign.
#[inline]
pub fn is_homogeneous(samples: &[f32]) -> bool {
  match samples.first() {
    Some(&first) => {
      let sign = is_positive(first);
      samples.iter().all(|&v| is_positive(v) == sign)
    }
    None => true,
  }
}

/// Sample one chunk; the volume is dropped if it cannot contain surface.
pub fn presample_chunk<S: Sdf + ?Sized>(sdf: &S, chunk: &ChunkSpec) -> Result<PresampleOutput> {
  let start = Instant::now();
  let volume = ScalarVolume::from_sdf(sdf, chunk.dims, chunk.transform)?;
  let timing_us = start.elapsed().as_micros() as u64;

  let volume = if is_homogeneous(volume.samples()) {
    None
  } else {
    Some(volume)
  };

  Ok(PresampleOutput {
    id: chunk.id,
    volume,
    timing_us,
  })
}

/// Presample multiple chunks in parallel, preserving order.
pub fn presample_batch<S: Sdf + ?Sized>(sdf: &S, chunks: &[ChunkSpec]) -> Result<Vec<PresampleOutput>> {
  if chunks.is_empty() {
    return Ok(Vec::new());
  }

  chunks
    .par_iter()
    .map(|chunk| presample_chunk(sdf, chunk))
    .collect()
}

#[cfg(test)]
#[path = "presample_test.rs"]
mod presample_test;
