//! Host-side orchestration of the contouring stages over many chunks.
//!
//! ```text
//! ┌───────────┐     ┌─────────┐
//! │ Presample ├────►│ Meshing ├────► Vec<MeshResult> (input order)
//! └───────────┘     └─────────┘
//!       │                │
//!  PresampleOutput   MeshResult
//!  (volume | skip)   (mesh + timing)
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Presample**: Evaluates an SDF over each chunk grid, skips chunks whose
//!    samples all share a sign
//! 2. **Meshing**: Runs [`contour::generate`](crate::contour::generate) per
//!    chunk (parallel via rayon, each chunk itself runs parallel phases)
//!
//! Chunks are independent; each one's extraction/stitching barrier is local
//! to its own `generate` call.

pub mod meshing;
pub mod presample;
pub mod types;

pub use meshing::{mesh_batch, mesh_chunk, mesh_presampled, sample_and_mesh};
pub use presample::{is_homogeneous, presample_batch, presample_chunk};
pub use types::{
  BatchSummary, ChunkId, ChunkSpec, MeshInput, MeshResult, PresampleOutput, StageTiming,
};
