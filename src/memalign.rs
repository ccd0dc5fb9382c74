use std::{fmt, ptr::NonNull};

use log::{debug, trace, warn};

use crate::{
  align::is_valid_alignment,
  error::{AllocError, Result},
  primitive::{LibcMemalign, RawMemalign},
};

/// A memory region returned by [`AlignedAllocator::allocate_aligned`].
///
/// The block is owned by the caller and must be handed back through
/// [`AlignedAllocator::release`] on the allocator that produced it. It is
/// not `Clone`, so releasing the same block twice does not type-check.
/// Dropping it without releasing leaks the memory.
#[derive(Debug)]
#[must_use = "an aligned block leaks unless it is released"]
pub struct AlignedBlock {
  ptr: NonNull<u8>,
  alignment: usize,
  size: usize,
}

impl AlignedBlock {
  /// Rebuilds a block from the parts returned by [`AlignedBlock::into_raw`].
  ///
  /// # Safety
  ///
  /// `ptr` must have come from `into_raw` on a block with the same
  /// `alignment` and `size`, and must not have been released since.
  pub unsafe fn from_raw_parts(
    ptr: NonNull<u8>,
    alignment: usize,
    size: usize,
  ) -> Self {
    Self { ptr, alignment, size }
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  pub fn addr(&self) -> usize {
    self.ptr.as_ptr() as usize
  }

  pub fn alignment(&self) -> usize {
    self.alignment
  }

  /// Requested size in bytes. The region may be larger.
  pub fn size(&self) -> usize {
    self.size
  }

  /// Gives up ownership. The caller becomes responsible for releasing the
  /// pointer exactly once.
  pub fn into_raw(self) -> *mut u8 {
    self.ptr.as_ptr()
  }
}

impl fmt::Display for AlignedBlock {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{} bytes at {:?} (alignment {}, addr % alignment = {})",
      self.size,
      self.ptr,
      self.alignment,
      self.addr() % self.alignment
    )
  }
}

/// `posix_memalign` semantics on top of a non-validating primitive.
///
/// The allocator holds no state besides the primitive; every call is
/// independent and as thread-safe as the primitive is.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlignedAllocator<P: RawMemalign = LibcMemalign> {
  primitive: P,
}

impl AlignedAllocator<LibcMemalign> {
  /// An allocator backed by the host C library.
  pub const fn host() -> Self {
    Self::new(LibcMemalign)
  }
}

impl<P: RawMemalign> AlignedAllocator<P> {
  pub const fn new(primitive: P) -> Self {
    Self { primitive }
  }

  pub fn primitive(&self) -> &P {
    &self.primitive
  }

  /// Allocates `size` bytes on an `alignment` boundary.
  ///
  /// The alignment is checked before the primitive is touched: anything that
  /// is not a power of two and a multiple of the pointer width fails with
  /// [`AllocError::InvalidArgument`] and nothing is allocated. A null result
  /// from the primitive becomes [`AllocError::OutOfMemory`]. There is no
  /// retry. A `size` of zero is passed through unchanged.
  pub fn allocate_aligned(
    &self,
    alignment: usize,
    size: usize,
  ) -> Result<AlignedBlock> {
    trace!("allocate_aligned: alignment = {}, size = {}", alignment, size);

    if !is_valid_alignment(alignment) {
      debug!("allocate_aligned: rejected alignment {}", alignment);
      return Err(AllocError::InvalidArgument { alignment });
    }

    let addr = unsafe { self.primitive.memalign(alignment, size) };

    match NonNull::new(addr) {
      Some(ptr) => Ok(AlignedBlock { ptr, alignment, size }),
      None => {
        warn!("allocate_aligned: primitive exhausted ({} bytes, alignment {})", size, alignment);
        Err(AllocError::OutOfMemory { alignment, size })
      }
    }
  }

  /// Returns `block` to the primitive.
  ///
  /// # Safety
  ///
  /// `block` must have been allocated by this allocator (or one sharing the
  /// same primitive) and nothing may still point into it.
  pub unsafe fn release(
    &self,
    block: AlignedBlock,
  ) {
    debug!("release: {}", block);

    unsafe { self.primitive.free(block.as_ptr(), block.alignment, block.size) }
  }
}
