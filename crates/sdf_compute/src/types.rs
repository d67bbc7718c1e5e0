//! Core data types for isosurface extraction.

use crate::constants::{DEFAULT_BOUNDARY_SKIP, DEFAULT_NORMAL_SAMPLE_DELTA};
use crate::error::ConfigError;
use crate::occlusion::OcclusionConfig;

/// Vertex placement strategy for cells containing the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeshMode {
  /// Arithmetic mean of the cell's edge crossings.
  #[default]
  SurfaceNet,

  /// Cell centre whenever any edge crosses the surface.
  Blocky,

  /// Minimizer of the crossing planes' quadratic error (keeps sharp
  /// features). Falls back to the surface-net mean when the solution
  /// leaves the cell.
  DualContour,
}

/// Normal computation mode for mesh generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMode {
  /// Central-difference gradient of the field, averaged over the crossings
  /// and blended with the gradient at the vertex itself.
  #[default]
  Gradient,

  /// Normals from triangle geometry. Angle-weighted per vertex for shared
  /// indices, flat per quad for duplicated vertices.
  Geometry,
}

/// Output vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// World-space position.
  pub position: [f32; 3],

  /// Surface normal (unit vector, points toward positive field values).
  pub normal: [f32; 3],
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: [0.0; 3],
      normal: [0.0, 1.0, 0.0],
    }
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Elements a dispatch could not store because its output buffer was full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overflow {
  /// Cell vertices dropped during extraction.
  pub vertices: u32,
  /// Quads dropped during stitching.
  pub quads: u32,
}

impl Overflow {
  pub fn is_empty(&self) -> bool {
    self.vertices == 0 && self.quads == 0
  }
}

/// Mesh generation result.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  /// Output vertices with positions and normals.
  pub vertices: Vec<Vertex>,

  /// Triangle indices (3 per triangle). Empty for the duplicated-vertex
  /// variant, where every 3 consecutive vertices form a triangle.
  pub indices: Vec<u32>,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,

  /// Elements dropped on buffer exhaustion.
  pub overflow: Overflow,

  /// Per-vertex ambient occlusion in `[0, 1]` (1 = fully occluded), parallel
  /// to `vertices`. Empty unless occlusion was requested.
  pub occlusion: Vec<f32>,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.occlusion.clear();
    self.bounds = MinMaxAABB::empty();
    self.overflow = Overflow::default();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// True when triangles are implicit in the vertex order.
  pub fn is_unindexed(&self) -> bool {
    self.indices.is_empty() && !self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    if self.is_unindexed() {
      self.vertices.len() / 3
    } else {
      self.indices.len() / 3
    }
  }
}

/// Per-dispatch configuration for extraction and stitching.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourConfig {
  /// Vertex placement.
  pub mode: MeshMode,

  /// Normal computation mode.
  pub normal_mode: NormalMode,

  /// Central-difference step for gradient normals, in grid units.
  pub normal_sample_delta: f32,

  /// Low-side layers the stitcher skips on every axis.
  pub boundary_skip: u32,

  /// Emit 6 (position, normal) pairs per quad instead of indices.
  pub duplicate_vertices: bool,

  /// Vertex capacity override. `None` sizes for the worst case.
  pub vertex_capacity: Option<usize>,

  /// Quad capacity override. `None` sizes for the worst case.
  pub quad_capacity: Option<usize>,

  /// Ambient occlusion pass run on the finished mesh. `None` skips it.
  pub occlusion: Option<OcclusionConfig>,
}

impl Default for ContourConfig {
  fn default() -> Self {
    Self {
      mode: MeshMode::default(),
      normal_mode: NormalMode::default(),
      normal_sample_delta: DEFAULT_NORMAL_SAMPLE_DELTA,
      boundary_skip: DEFAULT_BOUNDARY_SKIP,
      duplicate_vertices: false,
      vertex_capacity: None,
      quad_capacity: None,
      occlusion: None,
    }
  }
}

impl ContourConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_mode(mut self, mode: MeshMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn with_normal_mode(mut self, mode: NormalMode) -> Self {
    self.normal_mode = mode;
    self
  }

  pub fn with_normal_sample_delta(mut self, delta: f32) -> Self {
    self.normal_sample_delta = delta;
    self
  }

  pub fn with_boundary_skip(mut self, layers: u32) -> Self {
    self.boundary_skip = layers;
    self
  }

  pub fn with_duplicate_vertices(mut self, duplicate: bool) -> Self {
    self.duplicate_vertices = duplicate;
    self
  }

  pub fn with_vertex_capacity(mut self, capacity: usize) -> Self {
    self.vertex_capacity = Some(capacity);
    self
  }

  pub fn with_quad_capacity(mut self, capacity: usize) -> Self {
    self.quad_capacity = Some(capacity);
    self
  }

  pub fn with_occlusion(mut self, occlusion: OcclusionConfig) -> Self {
    self.occlusion = Some(occlusion);
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.normal_sample_delta.is_finite() || self.normal_sample_delta <= 0.0 {
      return Err(ConfigError::InvalidNormalDelta(self.normal_sample_delta));
    }
    if let Some(occlusion) = &self.occlusion {
      occlusion.validate()?;
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
