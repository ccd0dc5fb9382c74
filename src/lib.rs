//! # picobridge - Bridging helpers for the Pico SDK
//!
//! This crate provides the small pieces a foreign-language caller needs when
//! it cannot reach the SDK directly: a **`posix_memalign` shim** built on a
//! simpler `memalign`-style primitive, and accessors for the chip's fixed
//! **peripheral instances** (UART, SPI, I2C, PIO).
//!
//! ## Overview
//!
//! ```text
//!   posix_memalign(memptr, alignment, size):
//!
//!   ┌────────────────────────┐   no    ┌─────────────────────┐
//!   │ alignment % ptr == 0 ? ├────────►│ EINVAL, *memptr     │
//!   │ alignment pow2 ?       │         │ untouched           │
//!   └──────────┬─────────────┘         └─────────────────────┘
//!              │ yes
//!              ▼
//!   ┌────────────────────────┐  null   ┌─────────────────────┐
//!   │ memalign(alignment,    ├────────►│ ENOMEM, *memptr     │
//!   │          size)         │         │ untouched           │
//!   └──────────┬─────────────┘         └─────────────────────┘
//!              │ ptr
//!              ▼
//!        *memptr = ptr, 0
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   picobridge
//!   ├── align       - Alignment macros (align!, align_to!) and checks
//!   ├── block       - Arena block header (internal)
//!   ├── config      - Target chip and board defaults
//!   ├── error       - AllocError and its errno mapping
//!   ├── ffi         - C ABI: posix_memalign, get_uart0 .. get_pio2
//!   ├── memalign    - AlignedAllocator and AlignedBlock
//!   ├── peripheral  - Peripheral registry
//!   └── primitive   - RawMemalign, LibcMemalign, ArenaMemalign
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use picobridge::{AlignedAllocator, AllocError};
//!
//! let allocator = AlignedAllocator::host();
//!
//! let block = allocator.allocate_aligned(64, 256).unwrap();
//! assert_eq!(block.addr() % 64, 0);
//! unsafe { allocator.release(block) };
//!
//! assert_eq!(
//!     allocator.allocate_aligned(24, 256).unwrap_err(),
//!     AllocError::InvalidArgument { alignment: 24 },
//! );
//! ```
//!
//! ## Arena primitive
//!
//! [`ArenaMemalign`] models a heap with a hard ceiling, the way a
//! microcontroller heap behaves:
//!
//! ```text
//!   ┌─────────┬────────┬──────────┬─────────┬────────┬──────────┬──────────┐
//!   │ padding │ header │ block A  │ padding │ header │ block B  │  free    │
//!   └─────────┴────────┴──────────┴─────────┴────────┴──────────┴──────────┘
//!                      ▲                             ▲          ▲
//!                      └─ aligned                    └─ aligned └─ cursor
//! ```
//!
//! ## Features
//!
//! - `rp2040` (default) / `rp2350`: chip whose peripheral table is used
//! - `export-symbols`: export the C ABI under unmangled names
//!
//! ## Safety
//!
//! Releasing a block and reading through a peripheral handle are `unsafe`;
//! the allocator and the registry themselves never dereference anything.

pub mod align;
mod block;
pub mod config;
pub mod error;
pub mod ffi;
pub mod memalign;
pub mod peripheral;
pub mod primitive;

pub use error::AllocError;
pub use memalign::{AlignedAllocator, AlignedBlock};
pub use peripheral::{Chip, Peripheral, PeripheralFamily, PeripheralHandle};
pub use primitive::{ArenaMemalign, LibcMemalign, RawMemalign};
