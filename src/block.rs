/// Header written in front of every arena allocation.
///
/// ```text
///   start          header              user pointer (aligned)
///     │   padding   │ size/is_free/next  │   size bytes ...
///     ▼             ▼                    ▼
///     ┌─────────────┬────────────────────┬──────────────────┐
///     └─────────────┴────────────────────┴──────────────────┘
/// ```
pub struct Block {
  pub size: usize,
  pub is_free: bool,
  /// Arena offset where this block's padding begins; the bump cursor
  /// returns here when the block is the last one and gets freed.
  pub start: usize,
  pub next: *mut Block,
}

impl Block {
  pub const HEADER: usize = std::mem::size_of::<Block>();

  pub fn new(
    size: usize,
    start: usize,
    next: *mut Block,
  ) -> Self {
    Self {
      size,
      is_free: false,
      start,
      next,
    }
  }

  /// Address handed to the caller for this block.
  pub unsafe fn data(block: *mut Block) -> *mut u8 {
    unsafe { (block as *mut u8).add(Self::HEADER) }
  }

  /// Header belonging to a pointer previously returned by [`Block::data`].
  pub unsafe fn from_data(data: *mut u8) -> *mut Block {
    unsafe { data.sub(Self::HEADER) as *mut Block }
  }
}
