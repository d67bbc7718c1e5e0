//! Shared constants: buffer strides, sentinels and per-dispatch defaults.
//!
//! # Output Buffer Layout
//!
//! ```text
//! Vertex buffer (shared-index variant), stride 2:
//!   slot:   0          1          2          3        ...
//!           [position] [normal]   [position] [normal]  ...
//!           └──── vertex 0 ────┘  └──── vertex 1 ────┘
//!   vertex index = start_slot / VERTEX_STRIDE
//!
//! Index buffer, stride 6 (one quad = two triangles):
//!   [i0 i1 i2 | i2 i3 i0]
//!
//! Vertex buffer (duplicated-vertex variant), stride 12:
//!   6 × [position, normal] per quad, no index buffer
//! ```
//!
//! # Cell corner indices (binary: ZYX)
//!
//! ```text
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

/// Slots reserved per emitted cell vertex (position + normal).
pub const VERTEX_STRIDE: usize = 2;

/// Index entries reserved per quad in the shared-index variant.
pub const QUAD_INDEX_STRIDE: usize = 6;

/// Vertex-buffer slots reserved per quad in the duplicated-vertex variant.
pub const QUAD_VERTEX_STRIDE: usize = 12;

/// Lookup-volume value for cells that produced no vertex.
///
/// Index 0 is a valid vertex, so the empty marker is the top of the range.
pub const NO_VERTEX: u32 = u32::MAX;

/// Entity tag written for rays that hit nothing.
pub const NO_ENTITY: u32 = u32::MAX;

/// Hit parameter written for rays that hit nothing (outside `[0, 1]`).
pub const MISS_T: f32 = -1.0;

/// Normal written for rays that hit nothing.
pub const MISS_NORMAL: [f32; 3] = [-1.0, -1.0, -1.0];

/// Maximum edge crossings in one cell (3 axes × 4 edges).
pub const MAX_CELL_CROSSINGS: usize = 12;

/// Low-side layers skipped by the quad stitcher to avoid filtering artifacts.
pub const DEFAULT_BOUNDARY_SKIP: u32 = 2;

/// Central-difference step for cell normals, in grid units.
pub const DEFAULT_NORMAL_SAMPLE_DELTA: f32 = 1.0;

/// Ray-march step clamp, in world units.
pub const DEFAULT_MIN_STEP: f32 = 0.001;
pub const DEFAULT_MAX_STEP: f32 = 0.5;

/// Ray-march hit threshold on `|d|`.
pub const DEFAULT_HIT_EPSILON: f32 = 1e-5;

/// Central-difference step for hit normals, in world units.
pub const DEFAULT_HIT_NORMAL_DELTA: f32 = 1e-4;

/// Minimum iteration budget for a single ray.
pub const DEFAULT_MAX_ITERATIONS: u32 = 4096;

/// Central-difference step for crossing normals in the QEF solve, in grid
/// units. Kept well below a cell so sharp features stay sharp.
pub const QEF_NORMAL_DELTA: f32 = 0.1;

/// Diagonal bias added to the QEF normal matrix. Pulls under-determined
/// directions toward the mass point.
pub const QEF_REGULARIZATION: f32 = 0.01;

/// How far (in cells) a QEF vertex may leave its cell before the mean of
/// the crossings is used instead.
pub const QEF_CELL_TOLERANCE: f32 = 0.25;

/// Hemisphere rays per vertex for ambient occlusion.
pub const DEFAULT_OCCLUSION_RAYS: u32 = 32;

/// Length of each occlusion ray, in world units.
pub const DEFAULT_OCCLUSION_RAY_LENGTH: f32 = 32.0;

/// Distance along the normal between a vertex and its occlusion ray origin.
pub const DEFAULT_OCCLUSION_SURFACE_OFFSET: f32 = 0.05;

/// Largest angle between an occlusion ray and the vertex normal (just under
/// 90 degrees, so no ray runs along the surface).
pub const OCCLUSION_MAX_CONE_ANGLE: f32 = std::f32::consts::PI * 0.49;

/// Occlusion written for vertices whose ray origin stays inside the solid.
pub const BURIED_OCCLUSION: f32 = 0.5;

/// Offsets of the 8 cube corners, indexed by corner bits (x=bit0, y=bit1,
/// z=bit2).
pub const CORNER_OFFSETS: [[u32; 3]; 8] = [
  [0, 0, 0], // 0b000
  [1, 0, 0], // 0b001
  [0, 1, 0], // 0b010
  [1, 1, 0], // 0b011
  [0, 0, 1], // 0b100
  [1, 0, 1], // 0b101
  [0, 1, 1], // 0b110
  [1, 1, 1], // 0b111
];

/// Corner index for a corner offset.
#[inline(always)]
pub const fn corner_index(dx: usize, dy: usize, dz: usize) -> usize {
  dx | (dy << 1) | (dz << 2)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
