//! Lock-free output buffers shared by parallel extraction and stitching.
//!
//! ```text
//! AppendBuffer<T>
//! ┌───────┬──────────────────────────────────────────────┐
//! │ count │ slot 0 │ slot 1 │ ... │ slot count-1 │ ...   │
//! └───┬───┴──────────────────────────────────────────────┘
//!     │ compare-and-swap by `stride`, never past capacity
//!     ▼
//!   reserve(stride) -> Some(start) | None (dropped, counted)
//! ```
//!
//! A reservation either claims the full contiguous range `start..start +
//! stride` or nothing, so the committed prefix is always dense. Each slot is
//! written exactly once by the invocation that reserved it and only read
//! after the phase has returned.
//!
//! [`IndexVolume`] maps cell coordinates to vertex indices. Every cell is
//! owned by a single invocation during extraction, so plain atomic stores are
//! enough; stitching reads it after the phase barrier.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;

use glam::{UVec3, Vec3, Vec4};

use crate::constants::{NO_VERTEX, VERTEX_STRIDE};
use crate::grid::GridDims;
use crate::types::Vertex;

/// Fixed-capacity, append-only buffer with a monotonic atomic counter.
pub struct AppendBuffer<T> {
  count: AtomicUsize,
  dropped: AtomicU32,
  slots: Box<[OnceLock<T>]>,
}

impl<T> AppendBuffer<T> {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      count: AtomicUsize::new(0),
      dropped: AtomicU32::new(0),
      slots: (0..capacity).map(|_| OnceLock::new()).collect(),
    }
  }

  /// Claim `stride` consecutive slots, returning the first one.
  ///
  /// Returns `None` and records a drop when the range would exceed capacity.
  #[inline]
  pub fn reserve(&self, stride: usize) -> Option<usize> {
    let capacity = self.slots.len();
    let claimed = self
      .count
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
        count.checked_add(stride).filter(|&end| end <= capacity)
      });

    match claimed {
      Ok(start) => Some(start),
      Err(_) => {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        None
      }
    }
  }

  /// Write a reserved slot. Each slot accepts one write.
  #[inline]
  pub fn write(&self, slot: usize, value: T) {
    let stored = self.slots[slot].set(value).is_ok();
    debug_assert!(stored, "slot {} written twice", slot);
  }

  /// Read a slot written earlier in the same phase or a previous one.
  #[inline]
  pub fn get(&self, slot: usize) -> Option<&T> {
    self.slots.get(slot).and_then(OnceLock::get)
  }

  /// Committed slot count.
  #[inline]
  pub fn len(&self) -> usize {
    self.count.load(Ordering::Acquire)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Reservations rejected for lack of space.
  pub fn dropped(&self) -> u32 {
    self.dropped.load(Ordering::Relaxed)
  }

  /// Take the committed prefix once all writers have finished.
  pub fn into_vec(self) -> Vec<T> {
    let len = self.len();
    let values: Vec<T> = self
      .slots
      .into_vec()
      .into_iter()
      .take(len)
      .filter_map(OnceLock::into_inner)
      .collect();
    debug_assert_eq!(values.len(), len, "reserved slots left unwritten");
    values
  }
}

/// Vertex buffer of (position, normal) slot pairs.
///
/// Vertex `i` occupies slots `2i` (position, w = 1) and `2i + 1` (normal,
/// w = 0).
pub struct VertexBuffer(AppendBuffer<Vec4>);

impl VertexBuffer {
  pub fn with_capacity(vertices: usize) -> Self {
    Self(AppendBuffer::with_capacity(vertices * VERTEX_STRIDE))
  }

  /// Append a vertex, returning its index (`start_slot / 2`).
  #[inline]
  pub fn push(&self, position: Vec3, normal: Vec3) -> Option<u32> {
    let start = self.0.reserve(VERTEX_STRIDE)?;
    self.0.write(start, position.extend(1.0));
    self.0.write(start + 1, normal.extend(0.0));
    Some((start / VERTEX_STRIDE) as u32)
  }

  /// Append a run of vertices as one contiguous reservation, returning the
  /// index of the first. The run is stored whole or not at all.
  pub fn push_run(&self, run: &[(Vec3, Vec3)]) -> Option<u32> {
    let start = self.0.reserve(run.len() * VERTEX_STRIDE)?;
    for (i, &(position, normal)) in run.iter().enumerate() {
      let slot = start + i * VERTEX_STRIDE;
      self.0.write(slot, position.extend(1.0));
      self.0.write(slot + 1, normal.extend(0.0));
    }
    Some((start / VERTEX_STRIDE) as u32)
  }

  /// Position and normal of a committed vertex.
  #[inline]
  pub fn vertex(&self, index: u32) -> Option<(Vec3, Vec3)> {
    let slot = index as usize * VERTEX_STRIDE;
    let position = self.0.get(slot)?;
    let normal = self.0.get(slot + 1)?;
    Some((position.truncate(), normal.truncate()))
  }

  pub fn len(&self) -> usize {
    self.0.len() / VERTEX_STRIDE
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.0.capacity() / VERTEX_STRIDE
  }

  pub fn dropped(&self) -> u32 {
    self.0.dropped()
  }

  pub fn into_vertices(self) -> Vec<Vertex> {
    self
      .0
      .into_vec()
      .chunks_exact(VERTEX_STRIDE)
      .map(|pair| Vertex {
        position: pair[0].truncate().to_array(),
        normal: pair[1].truncate().to_array(),
      })
      .collect()
  }
}

/// Cell coordinate → vertex index lookup, [`NO_VERTEX`] for empty cells.
pub struct IndexVolume {
  dims: GridDims,
  slots: Box<[AtomicU32]>,
}

impl IndexVolume {
  /// One slot per sample coordinate; only cell coordinates are written.
  pub fn new(dims: GridDims) -> Self {
    Self {
      dims,
      slots: (0..dims.sample_count())
        .map(|_| AtomicU32::new(NO_VERTEX))
        .collect(),
    }
  }

  pub fn dims(&self) -> GridDims {
    self.dims
  }

  #[inline]
  pub fn store(&self, cell: UVec3, index: u32) {
    self.slots[self.dims.index(cell)].store(index, Ordering::Relaxed);
  }

  /// Raw slot value, [`NO_VERTEX`] for empty or out-of-range cells.
  #[inline]
  pub fn load_raw(&self, cell: UVec3) -> u32 {
    if !self.dims.contains(cell) {
      return NO_VERTEX;
    }
    self.slots[self.dims.index(cell)].load(Ordering::Relaxed)
  }

  #[inline]
  pub fn load(&self, cell: UVec3) -> Option<u32> {
    match self.load_raw(cell) {
      NO_VERTEX => None,
      index => Some(index),
    }
  }

  /// Cells holding a vertex.
  pub fn occupied(&self) -> usize {
    self
      .slots
      .iter()
      .filter(|slot| slot.load(Ordering::Relaxed) != NO_VERTEX)
      .count()
  }
}

#[cfg(test)]
#[path = "append_test.rs"]
mod append_test;
