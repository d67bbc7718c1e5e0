//! Per-vertex ambient occlusion by ray marching the hemisphere above each
//! vertex.
//!
//! ```text
//!            ╲  │  ╱          rays: fixed spiral over the cone around n,
//!         ╲   ╲ │ ╱   ╱       each `ray_length` long
//!          ───  ●  ───        origin = vertex + n * surface_offset
//!  ▓▓▓▓▓▓▓▓▓▓▓▓▓┼▓▓▓▓▓▓▓▓▓▓▓   (pushed out along n first if it starts inside)
//!
//!  occlusion = rays that hit / rays fired
//! ```
//!
//! Directions are deterministic, so the same mesh always gets the same
//! occlusion.

use glam::Vec3;
use rayon::prelude::*;

use crate::constants::{
  BURIED_OCCLUSION, DEFAULT_OCCLUSION_RAYS, DEFAULT_OCCLUSION_RAY_LENGTH,
  DEFAULT_OCCLUSION_SURFACE_OFFSET, OCCLUSION_MAX_CONE_ANGLE,
};
use crate::contour::crossings::is_positive;
use crate::error::ConfigError;
use crate::raymarch::{march, Ray, RayMarchConfig};
use crate::sdf::Sdf;
use crate::types::Vertex;

/// Occlusion pass parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionConfig {
  /// Rays per vertex.
  pub rays: u32,
  /// Ray length, in world units.
  pub ray_length: f32,
  /// Distance along the normal between a vertex and its ray origin.
  pub surface_offset: f32,
  /// Marching parameters for every occlusion ray.
  pub march: RayMarchConfig,
}

impl Default for OcclusionConfig {
  fn default() -> Self {
    Self {
      rays: DEFAULT_OCCLUSION_RAYS,
      ray_length: DEFAULT_OCCLUSION_RAY_LENGTH,
      surface_offset: DEFAULT_OCCLUSION_SURFACE_OFFSET,
      // Only hit or miss matters here, coarse steps are fine
      march: RayMarchConfig::default().with_step_bounds(0.01, 1.0),
    }
  }
}

impl OcclusionConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_rays(mut self, rays: u32) -> Self {
    self.rays = rays;
    self
  }

  pub fn with_ray_length(mut self, length: f32) -> Self {
    self.ray_length = length;
    self
  }

  pub fn with_surface_offset(mut self, offset: f32) -> Self {
    self.surface_offset = offset;
    self
  }

  pub fn with_march(mut self, march: RayMarchConfig) -> Self {
    self.march = march;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.rays == 0 {
      return Err(ConfigError::ZeroOcclusionRays);
    }
    if !self.ray_length.is_finite() || self.ray_length <= 0.0 {
      return Err(ConfigError::InvalidOcclusionLength(self.ray_length));
    }
    if !self.surface_offset.is_finite() || self.surface_offset < 0.0 {
      return Err(ConfigError::InvalidSurfaceOffset(self.surface_offset));
    }
    self.march.validate()
  }
}

/// `count` unit directions spiralling over the cone around +Z, spread evenly
/// by solid angle (golden-angle spiral).
pub fn cone_directions(count: u32) -> Vec<Vec3> {
  let golden_angle = std::f32::consts::PI * (3.0 - 5f32.sqrt());
  let min_z = OCCLUSION_MAX_CONE_ANGLE.cos();

  (0..count)
    .map(|i| {
      let z = 1.0 - (i as f32 + 0.5) / count as f32 * (1.0 - min_z);
      let r = (1.0 - z * z).max(0.0).sqrt();
      let (sin_phi, cos_phi) = (i as f32 * golden_angle).sin_cos();
      Vec3::new(r * cos_phi, r * sin_phi, z)
    })
    .collect()
}

/// Occlusion for one vertex. `escape` bounds how far the origin may be pushed
/// out along the normal when it starts inside the solid.
pub fn vertex_occlusion<S: Sdf + ?Sized>(
  sdf: &S,
  position: Vec3,
  normal: Vec3,
  directions: &[Vec3],
  escape: f32,
  config: &OcclusionConfig,
) -> f32 {
  if directions.is_empty() {
    return 0.0;
  }

  let mut origin = position + normal * config.surface_offset;
  if !is_positive(sdf.evaluate(origin)) {
    let out = Ray::new(origin, origin + normal * escape);
    let exit = march(sdf, &out, &config.march);
    if exit.is_hit() {
      origin = out.at((exit.t * 1.01).min(1.0));
    }
    if !is_positive(sdf.evaluate(origin)) {
      return BURIED_OCCLUSION;
    }
  }

  let (tangent, bitangent) = normal.any_orthonormal_pair();
  let hits = directions
    .iter()
    .filter(|d| {
      let world = tangent * d.x + bitangent * d.y + normal * d.z;
      let ray = Ray::new(origin, origin + world * config.ray_length);
      march(sdf, &ray, &config.march).is_hit()
    })
    .count();

  hits as f32 / directions.len() as f32
}

/// Occlusion for every vertex, in parallel, in vertex order.
#[tracing::instrument(skip_all, name = "occlusion::compute", fields(vertices = vertices.len()))]
pub fn compute_occlusion<S: Sdf + ?Sized>(
  sdf: &S,
  vertices: &[Vertex],
  escape: f32,
  config: &OcclusionConfig,
) -> Vec<f32> {
  let directions = cone_directions(config.rays);

  let occlusion: Vec<f32> = vertices
    .par_iter()
    .map(|v| {
      vertex_occlusion(
        sdf,
        Vec3::from_array(v.position),
        Vec3::from_array(v.normal),
        &directions,
        escape,
        config,
      )
    })
    .collect();

  tracing::debug!(rays_per_vertex = directions.len(), "occlusion complete");

  occlusion
}

#[cfg(test)]
#[path = "occlusion_test.rs"]
mod occlusion_test;
