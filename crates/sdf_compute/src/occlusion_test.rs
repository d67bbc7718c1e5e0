use glam::Vec3;

use super::*;
use crate::sdf::{from_fn, BoxSdf, Plane, Union};

fn occlusion_at<S: Sdf>(sdf: &S, position: Vec3, normal: Vec3) -> f32 {
  let config = OcclusionConfig::default();
  let directions = cone_directions(config.rays);
  vertex_occlusion(sdf, position, normal, &directions, 1.0, &config)
}

#[test]
fn test_cone_directions_cover_the_cone() {
  let directions = cone_directions(64);
  let min_z = OCCLUSION_MAX_CONE_ANGLE.cos();

  assert_eq!(directions.len(), 64);
  for d in &directions {
    assert!((d.length() - 1.0).abs() < 1e-5);
    assert!(d.z >= min_z - 1e-6 && d.z <= 1.0);
  }
  // Spread around the axis, not bunched on one side
  let mean: Vec3 = directions.iter().copied().sum::<Vec3>() / 64.0;
  assert!(mean.x.abs() < 0.1 && mean.y.abs() < 0.1);
}

#[test]
fn test_open_floor_is_unoccluded() {
  let floor = Plane::horizontal(0.0);
  assert_eq!(occlusion_at(&floor, Vec3::ZERO, Vec3::Y), 0.0);
}

#[test]
fn test_wall_occludes_about_half() {
  // Floor at y = 0 and a tall wall occupying x in [1, 3]
  let scene = Union(
    Plane::horizontal(0.0),
    BoxSdf::new(Vec3::new(2.0, 25.0, 0.0), Vec3::new(1.0, 25.0, 100.0)),
  );
  let occlusion = occlusion_at(&scene, Vec3::ZERO, Vec3::Y);
  assert!((0.3..0.7).contains(&occlusion), "occlusion {occlusion}");
}

#[test]
fn test_closed_cavity_is_fully_occluded() {
  // Air inside radius 5, solid outside; vertex on the cavity floor
  let cavity = from_fn(|p: Vec3| 5.0 - p.length());
  assert_eq!(occlusion_at(&cavity, Vec3::new(0.0, -5.0, 0.0), Vec3::Y), 1.0);
}

#[test]
fn test_vertex_below_surface_is_pushed_out() {
  let floor = Plane::horizontal(0.0);
  assert_eq!(occlusion_at(&floor, Vec3::new(0.0, -0.3, 0.0), Vec3::Y), 0.0);
}

#[test]
fn test_buried_vertex() {
  let floor = Plane::horizontal(0.0);
  assert_eq!(
    occlusion_at(&floor, Vec3::new(0.0, -10.0, 0.0), Vec3::Y),
    BURIED_OCCLUSION
  );
}

#[test]
fn test_compute_occlusion_keeps_vertex_order() {
  let cavity = from_fn(|p: Vec3| 5.0 - p.length());
  let vertices = [
    Vertex {
      position: [0.0, -5.0, 0.0],
      normal: [0.0, 1.0, 0.0],
    },
    Vertex {
      position: [0.0, -20.0, 0.0],
      normal: [0.0, 1.0, 0.0],
    },
  ];
  let occlusion = compute_occlusion(&cavity, &vertices, 1.0, &OcclusionConfig::default());
  assert_eq!(occlusion, vec![1.0, BURIED_OCCLUSION]);
}

#[test]
fn test_config_validation() {
  assert!(OcclusionConfig::default().validate().is_ok());
  assert_eq!(
    OcclusionConfig::default().with_rays(0).validate(),
    Err(ConfigError::ZeroOcclusionRays)
  );
  assert!(OcclusionConfig::default().with_ray_length(0.0).validate().is_err());
  assert!(OcclusionConfig::default().with_surface_offset(-0.1).validate().is_err());
  assert!(OcclusionConfig::default()
    .with_march(RayMarchConfig::default().with_max_iterations(0))
    .validate()
    .is_err());
}
