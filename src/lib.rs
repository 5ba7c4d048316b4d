//! # freelist32 - A First-Fit, Coalescing Free-List Allocator
//!
//! This crate provides a **first-fit, coalescing heap allocator** that
//! manages a single, contiguous, caller-supplied byte range. Unlike a bump
//! allocator that only ever grows, this allocator splits free blocks to
//! satisfy requests and merges them back together on release, so memory is
//! actually reclaimed and reused rather than only ever consumed.
//!
//! ## Overview
//!
//! ```text
//!   Managed region:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         MANAGED REGION                              │
//!   │                                                                      │
//!   │   ┌─────┬─────┬──────────────────┬─────┬──────────────────────────┐  │
//!   │   │ A1  │ A2  │    free block    │ A3  │        free block        │  │
//!   │   └─────┴─────┴──────────────────┴─────┴──────────────────────────┘  │
//!   │                                                                      │
//!   │   Every block (allocated or free) starts with a header; the free    │
//!   │   list and allocated list are two disjoint intrusive linked lists   │
//!   │   threaded through those headers.                                   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   freelist32
//!   ├── align      - alignment helpers (align_up, align_down)
//!   ├── block      - the per-block header and the Owner tag (internal)
//!   ├── list       - the intrusive doubly-linked list primitive (internal)
//!   └── allocator  - Allocator: init / allocate / free / query surface
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use freelist32::Allocator;
//!
//! let mut region = vec![0u8; 4096];
//! let start = region.as_mut_ptr() as usize;
//! let end = start + region.len();
//!
//! let mut heap = Allocator::new();
//! unsafe {
//!     assert!(heap.init(start, end, 8));
//!
//!     let p = heap.allocate(64);
//!     assert!(!p.is_null());
//!
//!     (p as *mut u64).write(0xDEADBEEF);
//!     assert_eq!((p as *mut u64).read(), 0xDEADBEEF);
//!
//!     heap.free(p);
//! }
//! ```
//!
//! ## How It Works
//!
//! Every block — free or allocated — is prefixed by a fixed-size header
//! recording its total size (header included), its links into whichever
//! list currently owns it, and a tag recording which list that is. `allocate`
//! walks the free list head-to-tail and takes the first block large enough
//! (first-fit), splitting off the unused remainder when it is worth keeping
//! as its own free block. `free` validates that the pointer's header really
//! does claim the allocated list as its owner, then walks the free list
//! twice to merge any block immediately to the left and/or right of the one
//! being released, keeping the free list free of adjacent neighbours.
//!
//! ## Features
//!
//! - **First-fit allocation** with a split threshold that avoids leaving
//!   unusably small free blocks behind.
//! - **Bidirectional coalescing on free**, so fragmentation from allocation
//!   order does not accumulate indefinitely.
//! - **Caller-chosen alignment**, validated (and enforced) to be a power of
//!   two at initialisation time.
//! - **O(1) `available`**, O(free-list length) `largest_available` and
//!   `free`/`allocate`.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; external
//!   mutual exclusion is required to share an allocator across threads.
//! - **No size classes or slabs**: every request goes through the same
//!   first-fit search.
//! - **No reallocation**: only `allocate` and `free`, no `realloc`.
//!
//! ## Safety
//!
//! This crate manages raw, caller-supplied memory directly: `init`,
//! `allocate` and `free` are all `unsafe`, and callers must uphold the
//! contracts documented on each.

pub mod align;
mod allocator;
mod block;
mod list;

pub use allocator::Allocator;
