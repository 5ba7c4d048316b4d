//! Interactive walkthrough of [`freelist32::Allocator`]: init, a few
//! allocations, a free that triggers coalescing, and the query surface.
//!
//! Run with `RUST_LOG=debug cargo run --example heap_demo` to see the
//! allocator's own diagnostic log lines alongside the narration below.

use freelist32::Allocator;

fn main() {
    env_logger::init();

    const REGION_SIZE: usize = 4096;
    let mut region = vec![0u8; REGION_SIZE];
    let start = region.as_mut_ptr() as usize;
    let end = start + REGION_SIZE;

    let mut heap = Allocator::new();

    println!("initialising a {REGION_SIZE}-byte region, 8-byte alignment");
    let ok = unsafe { heap.init(start, end, 8) };
    assert!(ok, "init should succeed for a region this size");
    println!(
        "  available() = {}, largest_available() = {}",
        heap.available(),
        heap.largest_available()
    );

    println!("\nallocating three blocks: 64, 128 and 256 bytes");
    let a = unsafe { heap.allocate(64) };
    let b = unsafe { heap.allocate(128) };
    let c = unsafe { heap.allocate(256) };
    assert!(!a.is_null() && !b.is_null() && !c.is_null());
    println!(
        "  available() = {}, largest_available() = {}",
        heap.available(),
        heap.largest_available()
    );

    println!("\nwriting through the returned pointers");
    unsafe {
        (a as *mut u64).write(0x1111_1111_1111_1111);
        (b as *mut u64).write(0x2222_2222_2222_2222);
        (c as *mut u64).write(0x3333_3333_3333_3333);
        println!("  a -> {:#x}", (a as *mut u64).read());
        println!("  b -> {:#x}", (b as *mut u64).read());
        println!("  c -> {:#x}", (c as *mut u64).read());
    }

    println!("\nfreeing a and c, leaving b allocated (no coalescing yet: b sits between them)");
    unsafe {
        heap.free(a);
        heap.free(c);
    }
    println!("  available() = {}", heap.available());

    println!("\nfreeing b: its free neighbours on both sides should merge into one block");
    unsafe { heap.free(b) };
    println!(
        "  available() = {}, largest_available() = {}",
        heap.available(),
        heap.largest_available()
    );
    println!(
        "  min_free_bytes_ever() = {} (the low-water mark while allocations were live)",
        heap.min_free_bytes_ever()
    );

    println!("\nfreeing a null pointer and a stale pointer are both silent no-ops:");
    unsafe {
        heap.free(std::ptr::null_mut());
        heap.free(a); // a was already freed above
    }
    println!("  available() unchanged at {}", heap.available());
}
