//! Shared fixtures for unit tests.

use glam::Vec3;

use crate::field::ScalarVolume;
use crate::grid::{GridDims, GridTransform};
use crate::sdf::{Plane, Sphere};
use crate::types::MeshOutput;

/// Volume holding `y - height` on the identity transform.
pub fn plane_volume(dims: GridDims, height: f32) -> ScalarVolume {
  ScalarVolume::from_sdf(&Plane::horizontal(height), dims, GridTransform::IDENTITY)
    .expect("valid plane volume")
}

/// Sphere centred in a cube grid of `size` samples.
pub fn sphere_volume(size: u32, radius: f32) -> ScalarVolume {
  let center = Vec3::splat((size - 1) as f32 * 0.5);
  ScalarVolume::from_sdf(
    &Sphere::new(center, radius),
    GridDims::cube(size),
    GridTransform::IDENTITY,
  )
  .expect("valid sphere volume")
}

/// Every index refers to an existing vertex and triangles are complete.
pub fn assert_valid_indices(output: &MeshOutput) {
  assert_eq!(output.indices.len() % 3, 0, "partial triangle");
  for &i in &output.indices {
    assert!(
      (i as usize) < output.vertices.len(),
      "index {} out of range ({} vertices)",
      i,
      output.vertices.len()
    );
  }
}

/// Every normal is unit length.
pub fn assert_normals_unit(output: &MeshOutput) {
  for (i, v) in output.vertices.iter().enumerate() {
    let len = Vec3::from_array(v.normal).length();
    assert!((len - 1.0).abs() < 1e-4, "vertex {i} normal length {len}");
  }
}
