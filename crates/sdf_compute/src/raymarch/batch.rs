//! Batched ray marching over a flat ray buffer.
//!
//! ```text
//! data:    [sx sy sz ex ey ez][sx sy sz ex ey ez] ...   6 floats per ray
//! indices: [ 7, 2, 9, ... ]                              optional indirection
//!            ▲
//!            └── slots offset..offset+count are marched
//!
//! results[ray_index] = march(ray(ray_index))
//! ```
//!
//! Without `indices`, slot `s` is ray `s` directly.

use rayon::prelude::*;

use super::{march, Ray, RayHitResult, RayMarchConfig};
use crate::error::{RayBatchError, Result};
use crate::sdf::Sdf;

const FLOATS_PER_RAY: usize = 6;

/// A validated view of a ray buffer and the sub-range to march.
#[derive(Clone, Copy, Debug)]
pub struct RayBatch<'a> {
  data: &'a [f32],
  indices: Option<&'a [u32]>,
  offset: usize,
  count: usize,
}

impl<'a> RayBatch<'a> {
  /// Check that every slot in `offset..offset + count` resolves to a ray.
  pub fn new(
    data: &'a [f32],
    indices: Option<&'a [u32]>,
    offset: usize,
    count: usize,
  ) -> Result<Self, RayBatchError> {
    if data.len() % FLOATS_PER_RAY != 0 {
      return Err(RayBatchError::RaggedRayData(data.len()));
    }
    let ray_count = data.len() / FLOATS_PER_RAY;
    let available = indices.map_or(ray_count, <[u32]>::len);

    let end = offset.saturating_add(count);
    if end > available {
      return Err(RayBatchError::RangeOutOfBounds {
        offset,
        end,
        available,
      });
    }

    if let Some(indices) = indices {
      for (slot, &index) in indices.iter().enumerate().take(end).skip(offset) {
        if index as usize >= ray_count {
          return Err(RayBatchError::IndexOutOfBounds {
            slot,
            index,
            ray_count,
          });
        }
      }
    }

    Ok(Self {
      data,
      indices,
      offset,
      count,
    })
  }

  /// Every ray in `data`, marched in order.
  pub fn all(data: &'a [f32]) -> Result<Self, RayBatchError> {
    Self::new(data, None, 0, data.len() / FLOATS_PER_RAY)
  }

  /// Rays stored in `data`.
  pub fn ray_count(&self) -> usize {
    self.data.len() / FLOATS_PER_RAY
  }

  /// Rays this batch marches.
  pub fn len(&self) -> usize {
    self.count
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Ray index for batch slot `i` (`0..len()`).
  #[inline]
  pub fn ray_index(&self, i: usize) -> usize {
    let slot = self.offset + i;
    match self.indices {
      Some(indices) => indices[slot] as usize,
      None => slot,
    }
  }

  #[inline]
  pub fn ray(&self, ray_index: usize) -> Ray {
    let base = ray_index * FLOATS_PER_RAY;
    let mut s = [0.0; FLOATS_PER_RAY];
    s.copy_from_slice(&self.data[base..base + FLOATS_PER_RAY]);
    Ray::from_slice(&s)
  }
}

/// March every ray in the batch, writing each result at its ray index.
///
/// `results` must hold at least [`RayBatch::ray_count`] entries. Slots not
/// covered by the batch are left untouched.
#[tracing::instrument(skip_all, name = "raymarch::march_batch", fields(rays = batch.len()))]
pub fn march_batch<S: Sdf + ?Sized>(
  sdf: &S,
  batch: &RayBatch<'_>,
  config: &RayMarchConfig,
  results: &mut [RayHitResult],
) -> Result<()> {
  config.validate()?;
  if results.len() < batch.ray_count() {
    return Err(
      RayBatchError::ResultBufferTooSmall {
        required: batch.ray_count(),
        actual: results.len(),
      }
      .into(),
    );
  }

  match batch.indices {
    None => {
      let range = batch.offset..batch.offset + batch.count;
      results[range]
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, result)| {
          *result = march(sdf, &batch.ray(batch.offset + i), config);
        });
    }
    Some(_) => {
      // Indices may repeat, so march in parallel and scatter afterwards.
      let marched: Vec<(usize, RayHitResult)> = (0..batch.count)
        .into_par_iter()
        .map(|i| {
          let index = batch.ray_index(i);
          (index, march(sdf, &batch.ray(index), config))
        })
        .collect();
      for (index, result) in marched {
        results[index] = result;
      }
    }
  }

  Ok(())
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
