use std::mem;

/// Width of a native pointer in bytes. Every accepted alignment is a multiple of it.
pub const POINTER_WIDTH: usize = mem::size_of::<*const ()>();

/// Rounds `value` up to the machine word size.
///
/// # Examples
///
/// ```rust
/// use std::mem;
/// use picobridge::align;
///
/// match mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align_to!($value, ::std::mem::size_of::<usize>())
  };
}

/// Rounds `value` up to the next multiple of `alignment`, which must be a power of two.
///
/// ```rust
/// use picobridge::align_to;
///
/// assert_eq!(align_to!(10, 4), 12);
/// assert_eq!(align_to!(64, 64), 64);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + $alignment - 1) & !($alignment - 1)
  };
}

/// Returns `true` when `alignment` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(alignment: usize) -> bool {
  alignment != 0 && (alignment & (alignment - 1)) == 0
}

/// Returns `true` when `alignment` is acceptable to `posix_memalign`:
/// a power of two and a multiple of [`POINTER_WIDTH`].
#[inline]
pub const fn is_valid_alignment(alignment: usize) -> bool {
  alignment % POINTER_WIDTH == 0 && is_power_of_two(alignment)
}

/// Returns `true` when `addr` sits on an `alignment` boundary.
#[inline]
pub fn is_aligned(
  addr: usize,
  alignment: usize,
) -> bool {
  addr & (alignment - 1) == 0
}
