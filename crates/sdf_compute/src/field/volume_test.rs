use glam::{UVec3, Vec3};

use super::*;
use crate::grid::{GridDims, GridTransform};
use crate::sdf::{from_fn, Plane};

fn ramp_x(dims: GridDims) -> ScalarVolume {
  // value = x
  ScalarVolume::from_sdf(&from_fn(|p: Vec3| p.x), dims, GridTransform::IDENTITY).unwrap()
}

#[test]
fn test_sample_count_mismatch_rejected() {
  let err = ScalarVolume::new(GridDims::cube(4), GridTransform::IDENTITY, vec![0.0; 10]);
  assert!(err.is_err());
}

#[test]
fn test_from_sdf_uses_world_offset_and_cell_size() {
  let transform = GridTransform::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
  let volume = ScalarVolume::from_sdf(&from_fn(|p: Vec3| p.x), GridDims::cube(4), transform)
    .unwrap();

  assert_eq!(volume.value_at(UVec3::new(0, 0, 0)), 10.0);
  assert_eq!(volume.value_at(UVec3::new(3, 2, 1)), 16.0);
}

#[test]
fn test_from_sdf_fills_every_slice() {
  let volume = ScalarVolume::from_sdf(
    &Plane::horizontal(1.5),
    GridDims::new(3, 4, 5),
    GridTransform::IDENTITY,
  )
  .unwrap();

  for z in 0..5 {
    for y in 0..4 {
      for x in 0..3 {
        assert_eq!(volume.value_at(UVec3::new(x, y, z)), y as f32 - 1.5);
      }
    }
  }
}

#[test]
fn test_trilinear_exact_at_integer_coords() {
  let volume = ramp_x(GridDims::cube(4));
  for x in 0..4 {
    assert_eq!(volume.sample(Vec3::new(x as f32, 1.0, 2.0)), x as f32);
  }
}

#[test]
fn test_trilinear_interpolates_between_samples() {
  let volume = ramp_x(GridDims::cube(4));
  assert!((volume.sample(Vec3::new(1.25, 0.5, 0.5)) - 1.25).abs() < 1e-6);
}

#[test]
fn test_clamp_to_edge() {
  let volume = ramp_x(GridDims::cube(4));
  assert_eq!(volume.sample(Vec3::new(-5.0, 0.0, 0.0)), 0.0);
  assert_eq!(volume.sample(Vec3::new(9.0, 0.0, 0.0)), 3.0);
}

#[test]
fn test_repeat_wraps() {
  let volume = ramp_x(GridDims::cube(4)).with_address_mode(AddressMode::Repeat);
  assert_eq!(volume.sample(Vec3::new(5.0, 0.0, 0.0)), 1.0);
  assert_eq!(volume.sample(Vec3::new(-1.0, 0.0, 0.0)), 3.0);
}

#[test]
fn test_border_constant() {
  let volume = ramp_x(GridDims::cube(4)).with_address_mode(AddressMode::Border(42.0));
  assert_eq!(volume.sample(Vec3::new(-1.0, 0.0, 0.0)), 42.0);
  assert_eq!(volume.sample(Vec3::new(2.0, 0.0, 0.0)), 2.0);
}

#[test]
fn test_nearest_filter_rounds() {
  let volume = ramp_x(GridDims::cube(4)).with_filter(Filter::Nearest);
  assert_eq!(volume.sample(Vec3::new(1.4, 0.0, 0.0)), 1.0);
  assert_eq!(volume.sample(Vec3::new(1.6, 0.0, 0.0)), 2.0);
}

#[test]
fn test_sample_world_applies_transform() {
  let transform = GridTransform::uniform(Vec3::splat(-2.0), 0.5);
  let volume = ScalarVolume::from_sdf(&from_fn(|p: Vec3| p.y), GridDims::cube(9), transform)
    .unwrap();
  assert!((volume.sample_world(Vec3::new(0.0, 0.3, 0.0)) - 0.3).abs() < 1e-5);
}

#[test]
fn test_set_overwrites_sample() {
  let mut volume = ScalarVolume::filled(GridDims::cube(2), GridTransform::IDENTITY, 1.0).unwrap();
  volume.set(UVec3::new(1, 1, 1), -1.0);
  assert_eq!(volume.value_at(UVec3::new(1, 1, 1)), -1.0);
  assert_eq!(volume.samples().iter().filter(|&&v| v < 0.0).count(), 1);
}
