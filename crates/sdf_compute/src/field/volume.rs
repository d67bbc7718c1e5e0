//! Sampled 3D scalar volume with trilinear lookup.

use glam::{UVec3, Vec3};
use rayon::prelude::*;

use super::ScalarField;
use crate::error::ConfigError;
use crate::grid::{GridDims, GridTransform};
use crate::sdf::Sdf;

/// Lookup filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
  /// Nearest sample (round to closest integer coordinate).
  Nearest,
  /// Trilinear interpolation of the 8 surrounding samples.
  #[default]
  Linear,
}

/// Behaviour for coordinates outside `[0, dims - 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AddressMode {
  /// Reuse the closest edge sample.
  #[default]
  ClampToEdge,
  /// Wrap around (tiling volume).
  Repeat,
  /// Return a constant.
  Border(f32),
}

/// Dense grid of scalar samples, X-minor layout (see [`GridDims::index`]).
#[derive(Clone, Debug)]
pub struct ScalarVolume {
  dims: GridDims,
  transform: GridTransform,
  samples: Vec<f32>,
  filter: Filter,
  address_mode: AddressMode,
}

impl ScalarVolume {
  /// Wrap existing samples. The sample count must match `dims`.
  pub fn new(
    dims: GridDims,
    transform: GridTransform,
    samples: Vec<f32>,
  ) -> Result<Self, ConfigError> {
    dims.validate()?;
    transform.validate()?;
    if samples.len() != dims.sample_count() {
      return Err(ConfigError::SampleCountMismatch {
        dims: dims.0.to_array(),
        expected: dims.sample_count(),
        actual: samples.len(),
      });
    }
    Ok(Self {
      dims,
      transform,
      samples,
      filter: Filter::default(),
      address_mode: AddressMode::default(),
    })
  }

  /// Volume with every sample set to `value`.
  pub fn filled(dims: GridDims, transform: GridTransform, value: f32) -> Result<Self, ConfigError> {
    Self::new(dims, transform, vec![value; dims.sample_count()])
  }

  /// Evaluate `sdf` at `world_offset + cell_size * p` for every sample `p`.
  ///
  /// Z-slices are filled in parallel; the volume is complete (and safe to
  /// extract from) once this returns.
  #[tracing::instrument(skip_all, name = "field::write_volume", fields(dims = ?dims.0))]
  pub fn from_sdf<S: Sdf + ?Sized>(
    sdf: &S,
    dims: GridDims,
    transform: GridTransform,
  ) -> Result<Self, ConfigError> {
    dims.validate()?;
    transform.validate()?;

    let slice_len = dims.0.x as usize * dims.0.y as usize;
    let mut samples = vec![0.0f32; dims.sample_count()];

    samples
      .par_chunks_mut(slice_len)
      .enumerate()
      .for_each(|(z, slice)| {
        for (i, value) in slice.iter_mut().enumerate() {
          let x = (i % dims.0.x as usize) as f32;
          let y = (i / dims.0.x as usize) as f32;
          let world = transform.grid_to_world(Vec3::new(x, y, z as f32));
          *value = sdf.evaluate(world);
        }
      });

    Self::new(dims, transform, samples)
  }

  pub fn with_filter(mut self, filter: Filter) -> Self {
    self.filter = filter;
    self
  }

  pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
    self.address_mode = mode;
    self
  }

  pub fn samples(&self) -> &[f32] {
    &self.samples
  }

  /// Exact sample at an in-range coordinate.
  #[inline]
  pub fn value_at(&self, p: UVec3) -> f32 {
    self.samples[self.dims.index(p)]
  }

  /// Overwrite a single sample.
  pub fn set(&mut self, p: UVec3, value: f32) {
    let idx = self.dims.index(p);
    self.samples[idx] = value;
  }

  /// Sample at an integer coordinate after applying the address mode.
  #[inline]
  fn fetch(&self, x: i64, y: i64, z: i64) -> f32 {
    let size = self.dims.0.as_i64vec3();
    let (x, y, z) = match self.address_mode {
      AddressMode::ClampToEdge => (
        x.clamp(0, size.x - 1),
        y.clamp(0, size.y - 1),
        z.clamp(0, size.z - 1),
      ),
      AddressMode::Repeat => (
        x.rem_euclid(size.x),
        y.rem_euclid(size.y),
        z.rem_euclid(size.z),
      ),
      AddressMode::Border(value) => {
        if x < 0 || y < 0 || z < 0 || x >= size.x || y >= size.y || z >= size.z {
          return value;
        }
        (x, y, z)
      }
    };
    self.value_at(UVec3::new(x as u32, y as u32, z as u32))
  }

  #[inline]
  fn trilinear(&self, p: Vec3) -> f32 {
    let base = p.floor();
    let f = p - base;
    let (x, y, z) = (base.x as i64, base.y as i64, base.z as i64);

    let c000 = self.fetch(x, y, z);
    let c100 = self.fetch(x + 1, y, z);
    let c010 = self.fetch(x, y + 1, z);
    let c110 = self.fetch(x + 1, y + 1, z);
    let c001 = self.fetch(x, y, z + 1);
    let c101 = self.fetch(x + 1, y, z + 1);
    let c011 = self.fetch(x, y + 1, z + 1);
    let c111 = self.fetch(x + 1, y + 1, z + 1);

    let c00 = c000 + (c100 - c000) * f.x;
    let c10 = c010 + (c110 - c010) * f.x;
    let c01 = c001 + (c101 - c001) * f.x;
    let c11 = c011 + (c111 - c011) * f.x;

    let c0 = c00 + (c10 - c00) * f.y;
    let c1 = c01 + (c11 - c01) * f.y;

    c0 + (c1 - c0) * f.z
  }
}

impl ScalarField for ScalarVolume {
  #[inline]
  fn sample(&self, grid_pos: Vec3) -> f32 {
    match self.filter {
      Filter::Nearest => {
        let r = grid_pos.round();
        self.fetch(r.x as i64, r.y as i64, r.z as i64)
      }
      Filter::Linear => self.trilinear(grid_pos),
    }
  }

  fn dims(&self) -> GridDims {
    self.dims
  }

  fn transform(&self) -> GridTransform {
    self.transform
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
