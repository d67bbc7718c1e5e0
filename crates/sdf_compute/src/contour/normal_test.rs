use glam::Vec3;

use super::*;
use crate::contour::crossings::crossings;
use crate::contour::extract::corner_samples;
use crate::field::AnalyticField;
use crate::grid::{GridDims, GridTransform};
use crate::sdf::{Plane, Sphere};
use crate::types::{MeshOutput, Vertex};

#[test]
fn test_normalize_or_up_fallback() {
  assert_eq!(normalize_or_up(Vec3::ZERO), Vec3::Y);
  assert_eq!(normalize_or_up(Vec3::splat(f32::NAN)), Vec3::Y);
  assert!((normalize_or_up(Vec3::new(3.0, 0.0, 4.0)) - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
}

#[test]
fn test_sample_normal_points_to_positive_side() {
  let field = AnalyticField::new(Plane::horizontal(1.5), GridDims::cube(4), GridTransform::IDENTITY);
  let n = sample_normal(&field, Vec3::new(1.0, 1.5, 1.0), 1.0);
  assert!((n - Vec3::Y).length() < 1e-6);

  // Flipped field: positive below the plane
  let flipped = AnalyticField::new(
    crate::sdf::from_fn(|p: Vec3| 1.5 - p.y),
    GridDims::cube(4),
    GridTransform::IDENTITY,
  );
  let n = sample_normal(&flipped, Vec3::new(1.0, 1.5, 1.0), 1.0);
  assert!((n + Vec3::Y).length() < 1e-6);
}

#[test]
fn test_sample_normal_accounts_for_anisotropic_cells() {
  // World plane x + y = 0 sampled on cells stretched 4x along x.
  // In grid space the gradient is (4, 1, 0); in world space (1, 1, 0).
  let transform = GridTransform::new(Vec3::ZERO, Vec3::new(4.0, 1.0, 1.0));
  let field = AnalyticField::new(
    crate::sdf::from_fn(|p: Vec3| p.x + p.y),
    GridDims::cube(8),
    transform,
  );
  let n = sample_normal(&field, Vec3::new(2.0, 2.0, 2.0), 0.5);
  let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
  assert!((n - expected).length() < 1e-5, "got {n:?}");
}

#[test]
fn test_blend_cell_normal_on_plane() {
  let field = AnalyticField::new(Plane::horizontal(1.25), GridDims::cube(4), GridTransform::IDENTITY);
  let cell = glam::UVec3::new(1, 1, 1);
  let found = crossings(cell, &corner_samples(&field, cell));
  assert_eq!(found.len(), 4);

  let n = blend_cell_normal(&field, &found, Vec3::new(1.5, 1.25, 1.5), 1.0);
  assert!((n - Vec3::Y).length() < 1e-6);
}

#[test]
fn test_blend_cell_normal_on_sphere_is_radial() {
  let center = Vec3::splat(8.0);
  let field = AnalyticField::new(Sphere::new(center, 5.0), GridDims::cube(17), GridTransform::IDENTITY);
  // Cell straddling the +X pole
  let cell = glam::UVec3::new(12, 8, 8);
  let found = crossings(cell, &corner_samples(&field, cell));
  assert!(!found.is_empty());
  let vertex = crate::contour::crossings::mean_position(&found).unwrap();

  let n = blend_cell_normal(&field, &found, vertex, 0.5);
  let radial = (vertex - center).normalize();
  assert!(n.dot(radial) > 0.99, "normal {n:?} not radial {radial:?}");
}

#[test]
fn test_quad_normal_matches_forward_winding() {
  let q = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  ];
  assert!((quad_normal(q) - Vec3::Z).length() < 1e-6);

  let reversed = [q[3], q[2], q[1], q[0]];
  assert!((quad_normal(reversed) + Vec3::Z).length() < 1e-6);
}

fn vertex(p: [f32; 3]) -> Vertex {
  Vertex {
    position: p,
    normal: [0.0, 0.0, 0.0],
  }
}

#[test]
fn test_recalculate_flat_quad() {
  let mut output = MeshOutput {
    vertices: vec![
      vertex([0.0, 0.0, 0.0]),
      vertex([1.0, 0.0, 0.0]),
      vertex([1.0, 0.0, -1.0]),
      vertex([0.0, 0.0, -1.0]),
    ],
    indices: vec![0, 1, 2, 2, 3, 0],
    ..Default::default()
  };

  recalculate_from_geometry(&mut output);

  for v in &output.vertices {
    let n = Vec3::from_array(v.normal);
    assert!((n - Vec3::Y).length() < 1e-6, "got {n:?}");
  }
}

#[test]
fn test_recalculate_unreferenced_vertex_falls_back() {
  let mut output = MeshOutput {
    vertices: vec![
      vertex([0.0, 0.0, 0.0]),
      vertex([0.0, 0.0, 1.0]),
      vertex([1.0, 0.0, 0.0]),
      vertex([5.0, 5.0, 5.0]),
    ],
    indices: vec![0, 1, 2],
    ..Default::default()
  };

  recalculate_from_geometry(&mut output);

  assert!((Vec3::from_array(output.vertices[0].normal) - Vec3::Y).length() < 1e-6);
  assert_eq!(output.vertices[3].normal, [0.0, 1.0, 0.0]);
}

#[test]
fn test_recalculate_skips_degenerate_triangle() {
  let mut output = MeshOutput {
    vertices: vec![
      vertex([0.0, 0.0, 0.0]),
      vertex([1.0, 0.0, 0.0]),
      vertex([2.0, 0.0, 0.0]),
    ],
    indices: vec![0, 1, 2],
    ..Default::default()
  };

  recalculate_from_geometry(&mut output);

  for v in &output.vertices {
    assert_eq!(v.normal, [0.0, 1.0, 0.0]);
  }
}

#[test]
fn test_recalculate_keeps_existing_normal_without_faces() {
  // Vertices 0..3 collapse onto one point, vertex 4 is unreferenced
  let at = [16.0, 16.0, 7.0];
  let mut output = MeshOutput {
    vertices: vec![
      Vertex { position: at, normal: [0.0, 0.0, -1.0] },
      Vertex { position: at, normal: [0.0, 0.0, -1.0] },
      Vertex { position: at, normal: [0.0, 0.0, -1.0] },
      Vertex { position: [1.0, 2.0, 3.0], normal: [2.0, 0.0, 0.0] },
    ],
    indices: vec![0, 1, 2, 2, 1, 0],
    ..Default::default()
  };

  recalculate_from_geometry(&mut output);

  for v in &output.vertices[..3] {
    assert_eq!(v.normal, [0.0, 0.0, -1.0]);
  }
  assert_eq!(output.vertices[3].normal, [1.0, 0.0, 0.0]);
}

#[test]
fn test_quad_face_of_collapsed_quad_is_zero() {
  let p = Vec3::new(1.0, 2.0, 3.0);
  assert_eq!(quad_face([p; 4]), Vec3::ZERO);
  assert_eq!(normalize_or(quad_face([p; 4]), Vec3::NEG_Z), Vec3::NEG_Z);
}
