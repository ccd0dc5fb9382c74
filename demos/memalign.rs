use std::{io::Read, ptr};

use picobridge::{AlignedAllocator, ArenaMemalign, Peripheral, config};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap` or `gdb`.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  let host = AlignedAllocator::host();

  // --------------------------------------------------------------------
  // 1) A valid request: 16-byte alignment, 256 bytes.
  // --------------------------------------------------------------------
  let first_block = host.allocate_aligned(16, 256).unwrap();
  println!("[1] Allocate 256 bytes aligned to 16");
  println!("[1] {}", first_block);

  unsafe {
    ptr::write_bytes(first_block.as_ptr(), 0xAB, first_block.size());
  }
  println!("[1] Initialized block with 0xAB");

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Invalid alignments never reach the allocator.
  // --------------------------------------------------------------------
  for alignment in [3usize, 24, 12] {
    match host.allocate_aligned(alignment, 64) {
      Ok(block) => unsafe { host.release(block) },
      Err(err) => println!("\n[2] alignment {:>2}: {} (errno {})", alignment, err, err.errno()),
    }
  }

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) A small arena runs out, and the failure is reported as ENOMEM.
  // --------------------------------------------------------------------
  let arena = AlignedAllocator::new(ArenaMemalign::with_capacity(1024).unwrap());
  let mut blocks = Vec::new();

  loop {
    match arena.allocate_aligned(64, 100) {
      Ok(block) => {
        println!("\n[3] {}, used = {}", block, arena.primitive().used());
        blocks.push(block);
      }
      Err(err) => {
        println!("\n[3] {} (errno {})", err, err.errno());
        break;
      }
    }
  }

  for block in blocks.drain(..).rev() {
    unsafe { arena.release(block) };
  }
  println!("[3] Released everything, used = {}", arena.primitive().used());

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Peripheral instances of the configured chip.
  // --------------------------------------------------------------------
  println!("\n[4] Peripherals on {:?}, default LED pin {}", config::TARGET_CHIP, config::DEFAULT_LED_PIN);
  for peripheral in Peripheral::ALL {
    match config::TARGET_CHIP.base_address(peripheral) {
      Some(addr) => println!("[4] {:<5} {:#010x}", peripheral.to_string(), addr),
      None => println!("[4] {:<5} (not present)", peripheral.to_string()),
    }
  }

  unsafe { host.release(first_block) };
  println!("\n[5] End of example.");
}
