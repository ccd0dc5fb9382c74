//! Non-validating aligned-allocation primitives.
//!
//! A primitive trusts its caller: the alignment handed to
//! [`RawMemalign::memalign`] has already been checked by
//! [`AlignedAllocator`](crate::AlignedAllocator). The only failure a
//! primitive reports is a null pointer.

use std::{alloc, cell::Cell, ptr, ptr::NonNull};

use log::trace;

use crate::{
  align,
  align::is_aligned,
  block::Block,
  error::{AllocError, Result},
};

/// A `memalign`-style allocation facility.
pub trait RawMemalign {
  /// Allocates `size` bytes whose address is a multiple of `alignment`.
  ///
  /// Returns null if the request cannot be satisfied.
  ///
  /// # Safety
  ///
  /// `alignment` must be a power of two and a multiple of the pointer width.
  unsafe fn memalign(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8;

  /// Releases memory obtained from [`RawMemalign::memalign`] on the same instance.
  ///
  /// # Safety
  ///
  /// `ptr` must come from this primitive, called with the same `alignment`
  /// and `size`, and must not be used or released again afterwards.
  unsafe fn free(
    &self,
    ptr: *mut u8,
    alignment: usize,
    size: usize,
  );
}

/// The host C library's allocator. Blocks are released with `free()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcMemalign;

impl RawMemalign for LibcMemalign {
  #[cfg(any(target_os = "linux", target_os = "android"))]
  unsafe fn memalign(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8 {
    unsafe { libc::memalign(alignment, size) as *mut u8 }
  }

  #[cfg(not(any(target_os = "linux", target_os = "android")))]
  unsafe fn memalign(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8 {
    let mut out: *mut libc::c_void = ptr::null_mut();

    match unsafe { libc::posix_memalign(&mut out, alignment, size) } {
      0 => out as *mut u8,
      _ => ptr::null_mut(),
    }
  }

  unsafe fn free(
    &self,
    ptr: *mut u8,
    _alignment: usize,
    _size: usize,
  ) {
    unsafe { libc::free(ptr as *mut libc::c_void) }
  }
}

/// Alignment of the region backing an [`ArenaMemalign`].
const ARENA_ALIGN: usize = 4096;

/// A fixed-capacity bump arena, the shape of a small microcontroller heap.
///
/// Every allocation is preceded by a [`Block`] header and the headers form a
/// singly linked list in address order. Freed blocks are reused when a later
/// request fits them; freeing trailing blocks moves the bump cursor back.
/// Once the cursor reaches the capacity, requests that do not fit a freed
/// block fail with null.
///
/// Single-threaded: the arena is neither `Send` nor `Sync`.
pub struct ArenaMemalign {
  base: NonNull<u8>,
  capacity: usize,
  cursor: Cell<usize>,
  first: Cell<*mut Block>,
  last: Cell<*mut Block>,
}

impl ArenaMemalign {
  pub fn with_capacity(capacity: usize) -> Result<Self> {
    let layout = Self::layout(capacity)?;
    let base = NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(AllocError::OutOfMemory {
      alignment: ARENA_ALIGN,
      size: capacity,
    })?;

    Ok(Self {
      base,
      capacity,
      cursor: Cell::new(0),
      first: Cell::new(ptr::null_mut()),
      last: Cell::new(ptr::null_mut()),
    })
  }

  fn layout(capacity: usize) -> Result<alloc::Layout> {
    alloc::Layout::from_size_align(capacity.max(1), ARENA_ALIGN).map_err(|_| AllocError::OutOfMemory {
      alignment: ARENA_ALIGN,
      size: capacity,
    })
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Bytes between the start of the arena and the bump cursor.
  pub fn used(&self) -> usize {
    self.cursor.get()
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.cursor.get()
  }

  unsafe fn find_free_block(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut Block {
    unsafe {
      let mut current: *mut Block = self.first.get();

      while !current.is_null() {
        if (*current).is_free && (*current).size >= size && is_aligned(Block::data(current) as usize, alignment) {
          return current;
        }
        current = (*current).next;
      }

      ptr::null_mut()
    }
  }

  /// Offset of the user pointer for a fresh block starting at `start`, and
  /// the cursor once it is placed. `None` when it does not fit.
  fn place(
    &self,
    start: usize,
    alignment: usize,
    size: usize,
  ) -> Option<(usize, usize)> {
    let base = self.base.as_ptr() as usize;
    let data = base
      .checked_add(start)?
      .checked_add(Block::HEADER)?
      .checked_add(alignment - 1)?
      & !(alignment - 1);
    let data_offset = data - base;
    let end = data_offset.checked_add(size)?;

    if end > self.capacity {
      return None;
    }

    Some((data_offset, align!(end).min(self.capacity)))
  }

  /// Pops free blocks off the tail and returns their space to the cursor.
  unsafe fn trim(&self) {
    unsafe {
      loop {
        let last = self.last.get();

        if last.is_null() || !(*last).is_free {
          return;
        }

        if self.first.get() == last {
          self.first.set(ptr::null_mut());
          self.last.set(ptr::null_mut());
        } else {
          let mut current: *mut Block = self.first.get();
          while !(*current).next.is_null() && (*current).next != last {
            current = (*current).next;
          }
          (*current).next = ptr::null_mut();
          self.last.set(current);
        }

        self.cursor.set((*last).start);
      }
    }
  }
}

impl RawMemalign for ArenaMemalign {
  unsafe fn memalign(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8 {
    unsafe {
      let free_block = self.find_free_block(alignment, size);

      if !free_block.is_null() {
        (*free_block).is_free = false;
        trace!("arena: reusing block at {:?} for {} bytes", free_block, size);

        return Block::data(free_block);
      }

      let start = self.cursor.get();
      let Some((data_offset, cursor)) = self.place(start, alignment, size) else {
        return ptr::null_mut();
      };

      let data = self.base.as_ptr().add(data_offset);
      let block = Block::from_data(data);
      block.write(Block::new(size, start, ptr::null_mut()));

      let last = self.last.get();
      if last.is_null() {
        self.first.set(block);
      } else {
        (*last).next = block;
      }
      self.last.set(block);
      self.cursor.set(cursor);

      data
    }
  }

  unsafe fn free(
    &self,
    ptr: *mut u8,
    _alignment: usize,
    _size: usize,
  ) {
    unsafe {
      if ptr.is_null() {
        return;
      }

      let block = Block::from_data(ptr);
      (*block).is_free = true;

      self.trim();
    }
  }
}

impl Drop for ArenaMemalign {
  fn drop(&mut self) {
    if let Ok(layout) = Self::layout(self.capacity) {
      unsafe { alloc::dealloc(self.base.as_ptr(), layout) }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_libc_memalign() {
    let host = LibcMemalign;

    unsafe {
      let addr = host.memalign(64, 100);
      assert!(!addr.is_null());
      assert_eq!(addr as usize % 64, 0);

      ptr::write_bytes(addr, 0xAB, 100);
      assert_eq!(*addr.add(99), 0xAB);

      host.free(addr, 64, 100);
    }
  }

  #[test]
  fn test_arena_alignment() {
    let arena = ArenaMemalign::with_capacity(8192).unwrap();

    unsafe {
      for alignment in [8usize, 16, 32, 64, 128, 256] {
        let addr = arena.memalign(alignment, 24);
        assert!(!addr.is_null());
        assert_eq!(addr as usize % alignment, 0);
      }
    }
  }

  #[test]
  fn test_arena_reuses_freed_block() {
    let arena = ArenaMemalign::with_capacity(4096).unwrap();

    unsafe {
      let first_addr = arena.memalign(16, 64);
      let second_addr = arena.memalign(16, 64);

      *(second_addr as *mut u64) = 7;

      arena.free(first_addr, 16, 64);

      let third_addr = arena.memalign(16, 32);
      assert_eq!(first_addr, third_addr);
      assert_eq!(*(second_addr as *mut u64), 7);
    }
  }

  #[test]
  fn test_arena_rolls_back_last_block() {
    let arena = ArenaMemalign::with_capacity(4096).unwrap();

    unsafe {
      let first_addr = arena.memalign(8, 32);
      let used = arena.used();

      let second_addr = arena.memalign(8, 32);
      assert!(arena.used() > used);

      arena.free(second_addr, 8, 32);
      assert_eq!(arena.used(), used);

      arena.free(first_addr, 8, 32);
      assert_eq!(arena.used(), 0);
    }
  }

  #[test]
  fn test_arena_trims_trailing_free_blocks() {
    let arena = ArenaMemalign::with_capacity(4096).unwrap();

    unsafe {
      let first_addr = arena.memalign(8, 32);
      let second_addr = arena.memalign(8, 32);

      arena.free(first_addr, 8, 32);
      assert!(arena.used() > 0);

      arena.free(second_addr, 8, 32);
      assert_eq!(arena.used(), 0);
      assert_eq!(arena.remaining(), arena.capacity());
    }
  }

  #[test]
  fn test_arena_exhaustion_returns_null() {
    let arena = ArenaMemalign::with_capacity(256).unwrap();

    unsafe {
      assert!(arena.memalign(8, 1024).is_null());
      assert_eq!(arena.used(), 0);

      assert!(!arena.memalign(8, 64).is_null());
      assert!(arena.memalign(8, 256).is_null());
    }
  }

  #[test]
  fn test_arena_zero_size_blocks_are_distinct() {
    let arena = ArenaMemalign::with_capacity(256).unwrap();

    unsafe {
      let first_addr = arena.memalign(8, 0);
      let second_addr = arena.memalign(8, 0);

      assert!(!first_addr.is_null());
      assert!(!second_addr.is_null());
      assert_ne!(first_addr, second_addr);
    }
  }
}
