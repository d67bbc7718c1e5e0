//! sdf_compute - Dual contouring and SDF ray marching on the CPU
//!
//! This crate extracts isosurfaces from scalar fields and ray-marches signed
//! distance functions. Data-parallel phases run on rayon; the only shared
//! mutable state inside a phase is an atomic append counter.
//!
//! # Features
//!
//! - **Dual contouring**: one vertex per surface cell at the mean of its
//!   edge crossings, quads stitched across every crossed grid edge with
//!   winding facing the positive side
//! - **Lock-free output**: fixed-capacity append buffers with clamped
//!   reservations; overflow drops whole elements and is reported
//! - **Vertex placement**: surface-net mean, blocky cell centres, or QEF
//!   dual contouring that keeps sharp edges
//! - **Ray marching**: adaptive-step root finding along finite segments,
//!   batched with optional index indirection
//! - **Ambient occlusion**: optional per-vertex hemisphere rays, marched
//!   against the same field
//! - **Pluggable fields**: sampled volumes (nearest/trilinear, clamp/repeat/
//!   border) or analytic SDFs evaluated on demand
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use sdf_compute::{contour, AnalyticField, ContourConfig, GridDims, GridTransform, Sphere};
//!
//! let field = AnalyticField::new(
//!   Sphere::new(Vec3::splat(16.0), 10.0),
//!   GridDims::cube(32),
//!   GridTransform::IDENTITY,
//! );
//! let output = contour::generate(&field, &ContourConfig::default())?;
//!
//! println!("Generated {} vertices, {} triangles",
//!     output.vertices.len(), output.triangle_count());
//! ```

pub mod constants;
pub mod error;
pub mod grid;
pub mod sdf;
pub mod types;

// Re-export commonly used items
pub use constants::{NO_ENTITY, NO_VERTEX};
pub use error::{ConfigError, Error, RayBatchError, Result};
pub use grid::{GridDims, GridTransform};
pub use sdf::{
  from_fn, BoxSdf, FnSdf, Heightmap, Plane, Sdf, SmoothUnion, Sphere, Subtract, TiltedPlane, Union,
};
pub use types::{ContourConfig, MeshMode, MeshOutput, MinMaxAABB, NormalMode, Overflow, Vertex};

// Scalar field sampling
pub mod field;
pub use field::{AddressMode, AnalyticField, FieldSdf, Filter, ScalarField, ScalarVolume};

// Isosurface extraction
pub mod contour;

// Ray marching
pub mod raymarch;
pub use raymarch::{march, march_batch, Ray, RayBatch, RayHitResult, RayMarchConfig};

// Per-vertex ambient occlusion
pub mod occlusion;
pub use occlusion::{compute_occlusion, OcclusionConfig};

// Multi-chunk orchestration
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_utils;
