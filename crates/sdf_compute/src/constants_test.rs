use super::*;

#[test]
fn test_corner_index_matches_offsets() {
  for (i, offset) in CORNER_OFFSETS.iter().enumerate() {
    let [dx, dy, dz] = *offset;
    assert_eq!(
      corner_index(dx as usize, dy as usize, dz as usize),
      i,
      "corner {} offset {:?}",
      i,
      offset
    );
  }
}

#[test]
fn test_strides() {
  assert_eq!(VERTEX_STRIDE, 2);
  assert_eq!(QUAD_INDEX_STRIDE, 6);
  assert_eq!(QUAD_VERTEX_STRIDE, 6 * VERTEX_STRIDE);
}

#[test]
fn test_miss_t_outside_unit_range() {
  assert!(!(0.0..=1.0).contains(&MISS_T));
}

#[test]
fn test_step_defaults_ordered() {
  assert!(DEFAULT_MIN_STEP > 0.0);
  assert!(DEFAULT_MIN_STEP < DEFAULT_MAX_STEP);
  assert!(DEFAULT_HIT_EPSILON < DEFAULT_MIN_STEP);
}

#[test]
fn test_occlusion_cone_stays_off_the_surface() {
  assert!(OCCLUSION_MAX_CONE_ANGLE < std::f32::consts::FRAC_PI_2);
  assert!(OCCLUSION_MAX_CONE_ANGLE.cos() > 0.0);
  assert!((0.0..=1.0).contains(&BURIED_OCCLUSION));
}
