use libc::c_int;

/// Failure modes of an aligned allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
  /// The alignment is not a power of two or not a multiple of the pointer width.
  /// Nothing was allocated.
  #[error("invalid alignment {alignment}: must be a power of two and a multiple of the pointer width")]
  InvalidArgument { alignment: usize },
  /// The underlying primitive could not satisfy the request.
  #[error("out of memory allocating {size} bytes aligned to {alignment}")]
  OutOfMemory { alignment: usize, size: usize },
}

impl AllocError {
  /// The `errno` value `posix_memalign` reports for this error.
  pub fn errno(&self) -> c_int {
    match self {
      AllocError::InvalidArgument { .. } => libc::EINVAL,
      AllocError::OutOfMemory { .. } => libc::ENOMEM,
    }
  }
}

pub type Result<T> = std::result::Result<T, AllocError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_errno_codes() {
    assert_eq!(AllocError::InvalidArgument { alignment: 3 }.errno(), libc::EINVAL);
    assert_eq!(
      AllocError::OutOfMemory { alignment: 16, size: 1 }.errno(),
      libc::ENOMEM
    );
  }

  #[test]
  fn test_display() {
    let err = AllocError::OutOfMemory { alignment: 64, size: 128 };
    assert_eq!(err.to_string(), "out of memory allocating 128 bytes aligned to 64");

    let err = AllocError::InvalidArgument { alignment: 24 };
    assert!(err.to_string().starts_with("invalid alignment 24"));
  }
}
