use std::collections::HashSet;

use glam::{UVec3, Vec3};
use rayon::prelude::*;

use super::*;
use crate::constants::{NO_VERTEX, QUAD_INDEX_STRIDE};
use crate::grid::GridDims;

#[test]
fn test_reserve_is_contiguous() {
  let buffer = AppendBuffer::<u32>::with_capacity(12);
  assert_eq!(buffer.reserve(6), Some(0));
  assert_eq!(buffer.reserve(6), Some(6));
  assert_eq!(buffer.len(), 12);
}

#[test]
fn test_reserve_clamps_at_capacity() {
  let buffer = AppendBuffer::<u32>::with_capacity(10);
  assert_eq!(buffer.reserve(6), Some(0));
  // 6..12 would straddle the end: rejected whole, counter untouched
  assert_eq!(buffer.reserve(6), None);
  assert_eq!(buffer.len(), 6);
  assert_eq!(buffer.dropped(), 1);
  // A smaller reservation still fits
  assert_eq!(buffer.reserve(4), Some(6));
  assert_eq!(buffer.len(), 10);
}

#[test]
fn test_into_vec_returns_committed_prefix() {
  let buffer = AppendBuffer::with_capacity(8);
  let start = buffer.reserve(3).unwrap();
  for i in 0..3 {
    buffer.write(start + i, i as u32 * 10);
  }
  assert_eq!(buffer.get(1), Some(&10));
  assert_eq!(buffer.get(5), None);
  assert_eq!(buffer.into_vec(), vec![0, 10, 20]);
}

#[test]
fn test_vertex_buffer_index_is_half_slot() {
  let vertices = VertexBuffer::with_capacity(4);
  let a = vertices.push(Vec3::X, Vec3::Y).unwrap();
  let b = vertices.push(Vec3::Z, Vec3::Y).unwrap();
  assert_eq!((a, b), (0, 1));
  assert_eq!(vertices.vertex(1), Some((Vec3::Z, Vec3::Y)));
  assert_eq!(vertices.len(), 2);

  let out = vertices.into_vertices();
  assert_eq!(out[0].position, [1.0, 0.0, 0.0]);
  assert_eq!(out[1].normal, [0.0, 1.0, 0.0]);
}

#[test]
fn test_vertex_buffer_overflow_drops() {
  let vertices = VertexBuffer::with_capacity(1);
  assert!(vertices.push(Vec3::ZERO, Vec3::Y).is_some());
  assert!(vertices.push(Vec3::ONE, Vec3::Y).is_none());
  assert_eq!(vertices.dropped(), 1);
  assert_eq!(vertices.into_vertices().len(), 1);
}

#[test]
fn test_push_run_is_all_or_nothing() {
  let vertices = VertexBuffer::with_capacity(8);
  let run = [(Vec3::ZERO, Vec3::Y); 6];
  assert_eq!(vertices.push_run(&run), Some(0));
  // Only 2 vertices left, a run of 6 does not fit
  assert_eq!(vertices.push_run(&run), None);
  assert_eq!(vertices.len(), 6);
  assert_eq!(vertices.push(Vec3::X, Vec3::Y), Some(6));
}

#[test]
fn test_index_volume_sentinel() {
  let lookup = IndexVolume::new(GridDims::cube(3));
  assert_eq!(lookup.load(UVec3::new(1, 1, 1)), None);
  assert_eq!(lookup.load_raw(UVec3::new(1, 1, 1)), NO_VERTEX);

  lookup.store(UVec3::new(1, 1, 1), 0);
  assert_eq!(lookup.load(UVec3::new(1, 1, 1)), Some(0));
  assert_eq!(lookup.occupied(), 1);

  // Out of range reads as empty
  assert_eq!(lookup.load(UVec3::new(3, 0, 0)), None);
}

// =============================================================================
// Concurrent allocation
// =============================================================================

#[test]
fn test_concurrent_threads_get_unique_ranges() {
  const THREADS: usize = 8;
  const PER_THREAD: usize = 2000;
  let buffer = AppendBuffer::<u32>::with_capacity(THREADS * PER_THREAD * QUAD_INDEX_STRIDE);

  let starts: Vec<usize> = std::thread::scope(|scope| {
    let handles: Vec<_> = (0..THREADS)
      .map(|_| {
        scope.spawn(|| {
          (0..PER_THREAD)
            .map(|_| buffer.reserve(QUAD_INDEX_STRIDE).unwrap())
            .collect::<Vec<_>>()
        })
      })
      .collect();
    handles
      .into_iter()
      .flat_map(|h| h.join().unwrap())
      .collect()
  });

  let unique: HashSet<_> = starts.iter().copied().collect();
  assert_eq!(unique.len(), THREADS * PER_THREAD);
  assert!(starts.iter().all(|s| s % QUAD_INDEX_STRIDE == 0));
  assert_eq!(buffer.len(), THREADS * PER_THREAD * QUAD_INDEX_STRIDE);
  assert_eq!(buffer.dropped(), 0);
}

#[test]
fn test_concurrent_vertex_indices_dense() {
  const N: usize = 10_000;
  let vertices = VertexBuffer::with_capacity(N);

  let indices: Vec<u32> = (0..N)
    .into_par_iter()
    .map(|i| vertices.push(Vec3::splat(i as f32), Vec3::Y).unwrap())
    .collect();

  let mut sorted = indices.clone();
  sorted.sort_unstable();
  let expected: Vec<u32> = (0..N as u32).collect();
  assert_eq!(sorted, expected, "indices must be unique and contiguous");

  // Each index resolves to the position written by its own invocation
  for (i, &index) in indices.iter().enumerate() {
    let (position, _) = vertices.vertex(index).unwrap();
    assert_eq!(position, Vec3::splat(i as f32));
  }
}

#[test]
fn test_concurrent_overflow_never_exceeds_capacity() {
  let buffer = AppendBuffer::<u32>::with_capacity(600);

  let claimed = (0..1000)
    .into_par_iter()
    .filter_map(|_| buffer.reserve(QUAD_INDEX_STRIDE))
    .count();

  assert_eq!(claimed, 100);
  assert_eq!(buffer.len(), 600);
  assert_eq!(buffer.dropped(), 900);
}
