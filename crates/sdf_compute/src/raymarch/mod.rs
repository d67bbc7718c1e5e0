//! Adaptive-step ray marching against an [`Sdf`].
//!
//! ```text
//!  start ●──step──●──step──●─step─●─●●  hit (sign flip or |d| < eps)
//!        d0                        │
//!        sign0 = d0 > 0            └─ normal = normalize(grad(v))
//!
//!  step = clamp(|d|, min_step, max_step)
//!  t    = |v - start| / |end - start|      (miss once t > 1)
//! ```
//!
//! Rays are finite segments. There is no bisection refinement, so a hit is
//! accurate to about one `min_step` past the surface.

mod batch;

pub use batch::{march_batch, RayBatch};

use glam::Vec3;

use crate::constants::{
  DEFAULT_HIT_EPSILON, DEFAULT_HIT_NORMAL_DELTA, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_STEP,
  DEFAULT_MIN_STEP, MISS_NORMAL, MISS_T, NO_ENTITY,
};
use crate::contour::crossings::is_positive;
use crate::contour::normal::normalize_or_up;
use crate::error::ConfigError;
use crate::sdf::{gradient, Sdf};

/// Ray-march parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct RayMarchConfig {
  /// Smallest advance per iteration, in world units.
  pub min_step: f32,
  /// Largest advance per iteration, in world units.
  pub max_step: f32,
  /// `|d|` below this counts as a hit.
  pub hit_epsilon: f32,
  /// Central-difference step for the hit normal.
  pub normal_delta: f32,
  /// Lower bound on iterations before a ray gives up and reports a miss.
  /// Raised per ray to the number of `min_step` steps spanning the segment.
  pub max_iterations: u32,
}

impl Default for RayMarchConfig {
  fn default() -> Self {
    Self {
      min_step: DEFAULT_MIN_STEP,
      max_step: DEFAULT_MAX_STEP,
      hit_epsilon: DEFAULT_HIT_EPSILON,
      normal_delta: DEFAULT_HIT_NORMAL_DELTA,
      max_iterations: DEFAULT_MAX_ITERATIONS,
    }
  }
}

impl RayMarchConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_step_bounds(mut self, min_step: f32, max_step: f32) -> Self {
    self.min_step = min_step;
    self.max_step = max_step;
    self
  }

  pub fn with_hit_epsilon(mut self, epsilon: f32) -> Self {
    self.hit_epsilon = epsilon;
    self
  }

  pub fn with_normal_delta(mut self, delta: f32) -> Self {
    self.normal_delta = delta;
    self
  }

  pub fn with_max_iterations(mut self, iterations: u32) -> Self {
    self.max_iterations = iterations;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let steps_ok = self.min_step.is_finite()
      && self.max_step.is_finite()
      && self.min_step > 0.0
      && self.min_step <= self.max_step;
    if !steps_ok {
      return Err(ConfigError::InvalidStepBounds {
        min: self.min_step,
        max: self.max_step,
      });
    }
    if !self.hit_epsilon.is_finite() || self.hit_epsilon < 0.0 {
      return Err(ConfigError::InvalidHitEpsilon(self.hit_epsilon));
    }
    if !self.normal_delta.is_finite() || self.normal_delta <= 0.0 {
      return Err(ConfigError::InvalidNormalDelta(self.normal_delta));
    }
    if self.max_iterations == 0 {
      return Err(ConfigError::ZeroIterations);
    }
    Ok(())
  }
}

/// A finite segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  pub start: Vec3,
  pub end: Vec3,
}

impl Ray {
  pub fn new(start: Vec3, end: Vec3) -> Self {
    Self { start, end }
  }

  /// Unpack `[start.xyz, end.xyz]`.
  pub fn from_slice(s: &[f32; 6]) -> Self {
    Self::new(Vec3::new(s[0], s[1], s[2]), Vec3::new(s[3], s[4], s[5]))
  }

  #[inline]
  pub fn length(&self) -> f32 {
    (self.end - self.start).length()
  }

  /// Unit direction. Undefined for zero-length rays.
  #[inline]
  pub fn direction(&self) -> Vec3 {
    (self.end - self.start) / self.length()
  }

  /// Point at normalized parameter `t` along the segment.
  #[inline]
  pub fn at(&self, t: f32) -> Vec3 {
    self.start + (self.end - self.start) * t
  }
}

/// Per-ray result, laid out as `(normal.xyz, t)`, entity id, padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHitResult {
  pub normal: [f32; 3],
  /// Hit parameter in `[0, 1]`, [`MISS_T`] on a miss.
  pub t: f32,
  /// Tag of the surface hit, [`NO_ENTITY`] on a miss.
  pub entity_id: u32,
  _padding: [u32; 3],
}

impl Default for RayHitResult {
  fn default() -> Self {
    Self::MISS
  }
}

impl RayHitResult {
  pub const MISS: Self = Self {
    normal: MISS_NORMAL,
    t: MISS_T,
    entity_id: NO_ENTITY,
    _padding: [0; 3],
  };

  pub fn hit(normal: Vec3, t: f32, entity_id: u32) -> Self {
    Self {
      normal: normal.to_array(),
      t,
      entity_id,
      _padding: [0; 3],
    }
  }

  #[inline]
  pub fn is_hit(&self) -> bool {
    (0.0..=1.0).contains(&self.t)
  }

  /// World-space hit position, `None` on a miss.
  pub fn hit_point(&self, ray: &Ray) -> Option<Vec3> {
    self.is_hit().then(|| ray.at(self.t))
  }
}

/// Iterations allowed for a segment of `length`.
///
/// Every step advances at least `min_step`, so `ceil(length / min_step) + 1`
/// steps always leave the segment. `max_iterations` only ends marches that
/// stop making progress (non-finite distances).
#[inline]
pub fn iteration_budget(length: f32, config: &RayMarchConfig) -> u32 {
  let steps = (length / config.min_step).ceil();
  // `as` saturates, NaN maps to 0
  let steps = (steps as u32).saturating_add(1);
  steps.max(config.max_iterations)
}

/// March one ray. Never fails: anything that is not a hit is [`RayHitResult::MISS`].
///
/// Rays must have non-zero length.
pub fn march<S: Sdf + ?Sized>(sdf: &S, ray: &Ray, config: &RayMarchConfig) -> RayHitResult {
  let length = ray.length();
  debug_assert!(length > 0.0, "zero-length ray {:?}", ray);
  let direction = (ray.end - ray.start) / length;

  let mut d = sdf.evaluate(ray.start);
  let sign0 = is_positive(d);
  let mut v = ray.start;

  for _ in 0..iteration_budget(length, config) {
    let step = d.abs().clamp(config.min_step, config.max_step);
    v += direction * step;

    let t = (v - ray.start).length() / length;
    if t > 1.0 {
      return RayHitResult::MISS;
    }

    let (distance, entity) = sdf.evaluate_tagged(v);
    d = distance;
    if is_positive(d) != sign0 || d.abs() < config.hit_epsilon {
      let normal = normalize_or_up(gradient(sdf, v, config.normal_delta));
      return RayHitResult::hit(normal, t, entity);
    }
  }

  RayHitResult::MISS
}
