//! Signed distance functions as swappable sampling strategies.
//!
//! Everything that walks a field (volume generation, analytic extraction,
//! ray marching) is generic over [`Sdf`], so the traversal code is written
//! once. Negative = inside, positive = outside.
//!
//! An SDF can also report a tag for the surface that produced the distance
//! (material or entity id). Combinators forward the tag of the operand that
//! wins.

use std::sync::Arc;

use glam::{Vec2, Vec3};

/// A scalar function over world space.
pub trait Sdf: Send + Sync {
  /// Signed distance at a world position.
  fn evaluate(&self, p: Vec3) -> f32;

  /// Signed distance plus the tag of the nearest surface.
  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (self.evaluate(p), 0)
  }
}

impl<T: Sdf + ?Sized> Sdf for &T {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (**self).evaluate(p)
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (**self).evaluate_tagged(p)
  }
}

impl<T: Sdf + ?Sized> Sdf for Box<T> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (**self).evaluate(p)
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (**self).evaluate_tagged(p)
  }
}

impl<T: Sdf + ?Sized> Sdf for Arc<T> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (**self).evaluate(p)
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (**self).evaluate_tagged(p)
  }
}

/// Adapter turning a closure into an [`Sdf`].
#[derive(Clone, Copy)]
pub struct FnSdf<F>(pub F);

/// Wrap a closure `Fn(Vec3) -> f32` as an SDF.
pub fn from_fn<F>(f: F) -> FnSdf<F>
where
  F: Fn(Vec3) -> f32 + Send + Sync,
{
  FnSdf(f)
}

impl<F> Sdf for FnSdf<F>
where
  F: Fn(Vec3) -> f32 + Send + Sync,
{
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (self.0)(p)
  }
}

// =============================================================================
// Primitives
// =============================================================================

/// Sphere SDF.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
  pub center: Vec3,
  pub radius: f32,
  pub tag: u32,
}

impl Sphere {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self {
      center,
      radius,
      tag: 0,
    }
  }

  pub fn with_tag(mut self, tag: u32) -> Self {
    self.tag = tag;
    self
  }
}

impl Sdf for Sphere {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (p - self.center).length() - self.radius
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (self.evaluate(p), self.tag)
  }
}

/// Infinite plane: `dot(p, normal) + offset`.
///
/// `normal` should be unit length for the result to be a true distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub offset: f32,
  pub tag: u32,
}

impl Plane {
  pub fn new(normal: Vec3, offset: f32) -> Self {
    Self {
      normal,
      offset,
      tag: 0,
    }
  }

  /// Horizontal plane at `y = height`, solid below.
  pub fn horizontal(height: f32) -> Self {
    Self::new(Vec3::Y, -height)
  }

  pub fn with_tag(mut self, tag: u32) -> Self {
    self.tag = tag;
    self
  }
}

impl Sdf for Plane {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    p.dot(self.normal) + self.offset
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (self.evaluate(p), self.tag)
  }
}

/// Plane tilted around the Z axis.
///
/// SDF: `(y - height) * cos(angle) - x * sin(angle)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltedPlane {
  pub height: f32,
  /// Tilt angle in radians.
  pub angle: f32,
}

impl Default for TiltedPlane {
  fn default() -> Self {
    Self {
      height: 0.0,
      angle: std::f32::consts::FRAC_PI_4,
    }
  }
}

impl TiltedPlane {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_height(mut self, height: f32) -> Self {
    self.height = height;
    self
  }

  pub fn with_angle_degrees(mut self, degrees: f32) -> Self {
    self.angle = degrees.to_radians();
    self
  }
}

impl Sdf for TiltedPlane {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    let (sin_a, cos_a) = self.angle.sin_cos();
    (p.y - self.height) * cos_a - p.x * sin_a
  }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSdf {
  pub center: Vec3,
  pub half_extents: Vec3,
  pub tag: u32,
}

impl BoxSdf {
  pub fn new(center: Vec3, half_extents: Vec3) -> Self {
    Self {
      center,
      half_extents,
      tag: 0,
    }
  }

  pub fn with_tag(mut self, tag: u32) -> Self {
    self.tag = tag;
    self
  }
}

impl Sdf for BoxSdf {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    let q = (p - self.center).abs() - self.half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
  }

  #[inline]
  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    (self.evaluate(p), self.tag)
  }
}

/// Height field: `y - height(x, -z) * max_height`.
///
/// Heights are normalized `[0, 1]` texels, one per world unit, bilinearly
/// filtered and clamped at the edges. Not a true distance away from flat
/// ground, but sign-correct.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
  width: usize,
  depth: usize,
  heights: Vec<f32>,
  pub max_height: f32,
}

impl Heightmap {
  /// `heights` is row-major, `width` texels per row. Returns `None` when the
  /// texel count does not match or the map is empty.
  pub fn new(width: usize, depth: usize, heights: Vec<f32>, max_height: f32) -> Option<Self> {
    if width == 0 || depth == 0 || heights.len() != width * depth {
      return None;
    }
    Some(Self {
      width,
      depth,
      heights,
      max_height,
    })
  }

  #[inline]
  fn texel(&self, x: isize, y: isize) -> f32 {
    let x = x.clamp(0, self.width as isize - 1) as usize;
    let y = y.clamp(0, self.depth as isize - 1) as usize;
    self.heights[y * self.width + x]
  }

  /// Bilinear height lookup in texel space.
  pub fn height_at(&self, uv: Vec2) -> f32 {
    let base = uv.floor();
    let f = uv - base;
    let (x, y) = (base.x as isize, base.y as isize);
    let h00 = self.texel(x, y);
    let h10 = self.texel(x + 1, y);
    let h01 = self.texel(x, y + 1);
    let h11 = self.texel(x + 1, y + 1);
    let h0 = h00 + (h10 - h00) * f.x;
    let h1 = h01 + (h11 - h01) * f.x;
    h0 + (h1 - h0) * f.y
  }
}

impl Sdf for Heightmap {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    p.y - self.height_at(Vec2::new(p.x, -p.z)) * self.max_height
  }
}

// =============================================================================
// Combinators
// =============================================================================

/// Hard union: `min(a, b)`.
#[derive(Clone, Copy, Debug)]
pub struct Union<A, B>(pub A, pub B);

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    self.0.evaluate(p).min(self.1.evaluate(p))
  }

  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    let a = self.0.evaluate_tagged(p);
    let b = self.1.evaluate_tagged(p);
    if a.0 <= b.0 {
      a
    } else {
      b
    }
  }
}

/// Subtract the first operand from the second: `max(-a, b)`.
#[derive(Clone, Copy, Debug)]
pub struct Subtract<A, B>(pub A, pub B);

impl<A: Sdf, B: Sdf> Sdf for Subtract<A, B> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    (-self.0.evaluate(p)).max(self.1.evaluate(p))
  }

  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    let (a, tag_a) = self.0.evaluate_tagged(p);
    let (b, tag_b) = self.1.evaluate_tagged(p);
    if -a > b {
      (-a, tag_a)
    } else {
      (b, tag_b)
    }
  }
}

/// Polynomial smooth union with blend radius `k`.
#[derive(Clone, Copy, Debug)]
pub struct SmoothUnion<A, B> {
  pub a: A,
  pub b: B,
  pub k: f32,
}

impl<A, B> SmoothUnion<A, B> {
  pub fn new(a: A, b: B, k: f32) -> Self {
    Self { a, b, k }
  }
}

/// `mix(d2, d1, h) - k * h * (1 - h)` with `h = clamp(0.5 + 0.5 * (d2 - d1) / k)`.
///
/// A non-positive (or NaN) `k` is a hard `min`.
#[inline]
pub fn smooth_min(d1: f32, d2: f32, k: f32) -> f32 {
  if k.is_nan() || k <= 0.0 {
    return d1.min(d2);
  }
  let h = (0.5 + 0.5 * (d2 - d1) / k).clamp(0.0, 1.0);
  d2 + (d1 - d2) * h - k * h * (1.0 - h)
}

impl<A: Sdf, B: Sdf> Sdf for SmoothUnion<A, B> {
  #[inline]
  fn evaluate(&self, p: Vec3) -> f32 {
    smooth_min(self.a.evaluate(p), self.b.evaluate(p), self.k)
  }

  fn evaluate_tagged(&self, p: Vec3) -> (f32, u32) {
    let (a, tag_a) = self.a.evaluate_tagged(p);
    let (b, tag_b) = self.b.evaluate_tagged(p);
    let tag = if a <= b { tag_a } else { tag_b };
    (smooth_min(a, b, self.k), tag)
  }
}

/// Central-difference gradient of an SDF at a world position (unnormalized).
#[inline]
pub fn gradient<S: Sdf + ?Sized>(sdf: &S, p: Vec3, delta: f32) -> Vec3 {
  let dx = Vec3::new(delta, 0.0, 0.0);
  let dy = Vec3::new(0.0, delta, 0.0);
  let dz = Vec3::new(0.0, 0.0, delta);
  Vec3::new(
    sdf.evaluate(p + dx) - sdf.evaluate(p - dx),
    sdf.evaluate(p + dy) - sdf.evaluate(p - dy),
    sdf.evaluate(p + dz) - sdf.evaluate(p - dz),
  ) / (2.0 * delta)
}

#[cfg(test)]
#[path = "sdf_test.rs"]
mod sdf_test;
