//! Scalar field sampling in grid space.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │ AnalyticField<S: Sdf>│        │ ScalarVolume             │
//! │  grid → world → S    │        │  trilinear / nearest     │
//! └──────────┬───────────┘        │  clamp / repeat / border │
//!            │                    └────────────┬─────────────┘
//!            └────────────┬────────────────────┘
//!                         ▼
//!                   ScalarField::sample(grid_pos)
//!                         │
//!           ┌─────────────┼──────────────┐
//!           ▼             ▼              ▼
//!      extraction      stitching     normals
//! ```
//!
//! Extraction and stitching read integer grid positions (cell corners),
//! normal estimation reads fractional ones. The field is immutable for the
//! duration of a pass, so concurrent reads need no synchronization.

mod volume;

pub use volume::{AddressMode, Filter, ScalarVolume};

use glam::Vec3;

use crate::grid::{GridDims, GridTransform};
use crate::sdf::Sdf;

/// A scalar field addressed in grid space.
pub trait ScalarField: Send + Sync {
  /// Field value at a (possibly fractional) grid position.
  fn sample(&self, grid_pos: Vec3) -> f32;

  /// Samples per axis of the extraction grid.
  fn dims(&self) -> GridDims;

  /// Mapping from this field's grid space to world space.
  fn transform(&self) -> GridTransform;

  /// World-space convenience lookup.
  #[inline]
  fn sample_world(&self, world_pos: Vec3) -> f32 {
    self.sample(self.transform().world_to_grid(world_pos))
  }

  /// Unnormalized central-difference gradient in grid space.
  ///
  /// `axis = (sample(p + delta) - sample(p - delta)) / (2 * delta)`
  #[inline]
  fn gradient(&self, grid_pos: Vec3, delta: f32) -> Vec3 {
    let s = [
      self.sample(grid_pos + Vec3::new(delta, 0.0, 0.0)),
      self.sample(grid_pos + Vec3::new(-delta, 0.0, 0.0)),
      self.sample(grid_pos + Vec3::new(0.0, delta, 0.0)),
      self.sample(grid_pos + Vec3::new(0.0, -delta, 0.0)),
      self.sample(grid_pos + Vec3::new(0.0, 0.0, delta)),
      self.sample(grid_pos + Vec3::new(0.0, 0.0, -delta)),
    ];
    Vec3::new(s[0] - s[1], s[2] - s[3], s[4] - s[5]) / (2.0 * delta)
  }
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
  #[inline]
  fn sample(&self, grid_pos: Vec3) -> f32 {
    (**self).sample(grid_pos)
  }

  fn dims(&self) -> GridDims {
    (**self).dims()
  }

  fn transform(&self) -> GridTransform {
    (**self).transform()
  }
}

impl<T: ScalarField + ?Sized> ScalarField for Box<T> {
  #[inline]
  fn sample(&self, grid_pos: Vec3) -> f32 {
    (**self).sample(grid_pos)
  }

  fn dims(&self) -> GridDims {
    (**self).dims()
  }

  fn transform(&self) -> GridTransform {
    (**self).transform()
  }
}

/// An [`Sdf`] evaluated on demand at grid positions.
///
/// No samples are cached: every corner and gradient read evaluates the
/// function at `world_offset + cell_size * grid_pos`.
#[derive(Clone, Debug)]
pub struct AnalyticField<S> {
  pub sdf: S,
  pub dims: GridDims,
  pub transform: GridTransform,
}

impl<S: Sdf> AnalyticField<S> {
  pub fn new(sdf: S, dims: GridDims, transform: GridTransform) -> Self {
    Self {
      sdf,
      dims,
      transform,
    }
  }
}

impl<S: Sdf> ScalarField for AnalyticField<S> {
  #[inline]
  fn sample(&self, grid_pos: Vec3) -> f32 {
    self.sdf.evaluate(self.transform.grid_to_world(grid_pos))
  }

  fn dims(&self) -> GridDims {
    self.dims
  }

  fn transform(&self) -> GridTransform {
    self.transform
  }
}

/// World-space view of a field, so it can be ray-marched like any [`Sdf`].
///
/// Positions outside the grid follow the field's own addressing.
#[derive(Clone, Copy)]
pub struct FieldSdf<'a, F: ?Sized>(pub &'a F);

impl<F: ScalarField + ?Sized> Sdf for FieldSdf<'_, F> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    self.0.sample_world(p)
  }
}
