//! Grid addressing and the world ↔ grid transform.
//!
//! # Memory Layout
//!
//! ```text
//! index = x + y * dims.x + z * dims.x * dims.y
//!
//! X is the minor axis (stride 1), Z the major axis.
//! ```
//!
//! A grid of `dims` samples has `dims - 1` cells per axis. Cell `(x, y, z)`
//! spans samples `(x..=x+1, y..=y+1, z..=z+1)`.

use glam::{UVec3, Vec3};

use crate::error::ConfigError;

/// Sample counts per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims(pub UVec3);

impl GridDims {
  pub const fn new(x: u32, y: u32, z: u32) -> Self {
    Self(UVec3::new(x, y, z))
  }

  pub const fn cube(n: u32) -> Self {
    Self::new(n, n, n)
  }

  /// Reject grids without at least one cell per axis.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.0.cmplt(UVec3::splat(2)).any() {
      return Err(ConfigError::GridTooSmall {
        dims: self.0.to_array(),
      });
    }
    Ok(())
  }

  /// Total number of samples.
  #[inline]
  pub fn sample_count(&self) -> usize {
    self.0.x as usize * self.0.y as usize * self.0.z as usize
  }

  /// Cells per axis (`dims - 1`).
  #[inline]
  pub fn cell_dims(&self) -> UVec3 {
    self.0.saturating_sub(UVec3::ONE)
  }

  /// Total number of cells.
  #[inline]
  pub fn cell_count(&self) -> usize {
    let c = self.cell_dims();
    c.x as usize * c.y as usize * c.z as usize
  }

  /// Linear index of a sample (or cell) coordinate.
  #[inline(always)]
  pub fn index(&self, p: UVec3) -> usize {
    p.x as usize + self.0.x as usize * (p.y as usize + self.0.y as usize * p.z as usize)
  }

  /// Inverse of [`GridDims::index`].
  #[inline(always)]
  pub fn coord(&self, index: usize) -> UVec3 {
    let sx = self.0.x as usize;
    let sy = self.0.y as usize;
    UVec3::new(
      (index % sx) as u32,
      ((index / sx) % sy) as u32,
      (index / (sx * sy)) as u32,
    )
  }

  #[inline]
  pub fn contains(&self, p: UVec3) -> bool {
    p.cmplt(self.0).all()
  }

  /// Iterate every cell coordinate, X fastest.
  pub fn cells(&self) -> impl Iterator<Item = UVec3> {
    let c = self.cell_dims();
    (0..c.z).flat_map(move |z| (0..c.y).flat_map(move |y| (0..c.x).map(move |x| UVec3::new(x, y, z))))
  }
}

impl From<[u32; 3]> for GridDims {
  fn from(dims: [u32; 3]) -> Self {
    Self(UVec3::from_array(dims))
  }
}

/// Affine map between grid space and world space.
///
/// `grid = (world - world_offset) / cell_size`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
  /// World position of sample (0, 0, 0).
  pub world_offset: Vec3,
  /// World-space spacing between adjacent samples, per axis.
  pub cell_size: Vec3,
}

impl Default for GridTransform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

impl GridTransform {
  pub const IDENTITY: Self = Self {
    world_offset: Vec3::ZERO,
    cell_size: Vec3::ONE,
  };

  pub fn new(world_offset: Vec3, cell_size: Vec3) -> Self {
    Self {
      world_offset,
      cell_size,
    }
  }

  /// Uniform spacing on all axes.
  pub fn uniform(world_offset: Vec3, cell_size: f32) -> Self {
    Self::new(world_offset, Vec3::splat(cell_size))
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.cell_size.is_finite() || self.cell_size.cmple(Vec3::ZERO).any() {
      return Err(ConfigError::InvalidCellSize {
        cell_size: self.cell_size.to_array(),
      });
    }
    Ok(())
  }

  #[inline(always)]
  pub fn world_to_grid(&self, world: Vec3) -> Vec3 {
    (world - self.world_offset) / self.cell_size
  }

  #[inline(always)]
  pub fn grid_to_world(&self, grid: Vec3) -> Vec3 {
    self.world_offset + grid * self.cell_size
  }

  /// Convert a gradient taken with respect to grid coordinates into a
  /// world-space gradient (chain rule through the per-axis scale).
  #[inline(always)]
  pub fn gradient_to_world(&self, grid_gradient: Vec3) -> Vec3 {
    grid_gradient / self.cell_size
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
