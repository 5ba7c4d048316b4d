//! Allocator state (C3), the allocation engine (C4) and the deallocation
//! engine (C5): the first-fit, coalescing heap manager itself.
//!
//! ## Memory Layout
//!
//! ```text
//!   Managed region, after init:
//!
//!   start_aligned                                              end_aligned
//!        │                                                           │
//!        ▼                                                           ▼
//!        ┌────────────────┬──────────────────────────────┬───────────┐
//!        │ Header (H)     │        Free payload           │  unused   │
//!        │ size: N - H    │      (N - H - H bytes)         │  H bytes  │
//!        └────────────────┴──────────────────────────────┴───────────┘
//!
//!   The single initial free block spans [start_aligned, start_aligned + N - H),
//!   where N = end_aligned - start_aligned. One header's worth of bytes at the
//!   tail of the region is never tiled by any block (see SPEC_FULL.md §9).
//! ```
//!
//! ## Allocation (first-fit + split)
//!
//! ```text
//!   free_list before:  [ 64 ][ 512 ][ 128 ]   (insertion order, not address order)
//!
//!   allocate(need=96) walks head -> tail, picks first block with size >= 96:
//!   skip 64, match 512.
//!
//!   leftover = 512 - 96 = 416 > 2H -> split:
//!     B.size = 96              (returned to caller, moved to alloc_list)
//!     new free block, size 416 (pushed to free_list tail)
//!
//!   free_list after:   [ 64 ][ 128 ][ 416 ]
//!   alloc_list after:  [ 96 ]
//! ```
//!
//! ## Deallocation (bidirectional coalescing)
//!
//! ```text
//!   free_list before:  [ L ][ ... ][ R ]     B is being freed, sits between L and R
//!
//!   L + L.size == B  -> merge B into L, working pointer becomes L
//!   B + B.size == R  -> merge R into (merged) B
//!
//!   free_list after:   [ ... ][ L+B+R ]
//! ```

use std::ptr;

use crate::align::align_up;
use crate::block::{Header, Owner};
use crate::list::List;

/// A first-fit, coalescing heap allocator over a caller-supplied byte range.
///
/// An `Allocator` is single-owner: nothing here is `Send`/`Sync`, and every
/// public operation must be externally serialised if shared across threads
/// (see SPEC_FULL.md §5).
pub struct Allocator {
    free_list: List,
    alloc_list: List,
    alignment: usize,
    header_size: usize,
    free_bytes: usize,
    min_free_bytes_ever: usize,
}

impl Allocator {
    /// Creates an un-initialised allocator. Every operation other than
    /// [`init`](Allocator::init) is a no-op / returns a failure sentinel
    /// until `init` succeeds.
    pub const fn new() -> Self {
        Allocator {
            free_list: List::new(Owner::Free),
            alloc_list: List::new(Owner::Allocated),
            alignment: 0,
            header_size: 0,
            free_bytes: 0,
            min_free_bytes_ever: 0,
        }
    }

    /// Initialises the allocator over `[start, end)`, respecting `alignment`.
    ///
    /// Returns `false`, leaving the allocator un-initialised, if `end <=
    /// start`, if `alignment` is not a power of two, or if the aligned
    /// region is too small to hold even a single header.
    ///
    /// # Safety
    ///
    /// `[start, end)` must be a valid, exclusively-owned byte range for the
    /// entire lifetime of this allocator: no other code may read or write
    /// any byte in that range except through pointers this allocator
    /// returns from [`allocate`](Allocator::allocate).
    pub unsafe fn init(&mut self, start: usize, end: usize, alignment: usize) -> bool {
        if end <= start || !alignment.is_power_of_two() {
            log::warn!(
                "init rejected: start={start:#x} end={end:#x} alignment={alignment} (bad bounds or non-power-of-two alignment)"
            );
            return false;
        }

        let start_aligned = align_up(start, alignment);
        let end_aligned = crate::align::align_down(end, alignment);
        let header_size = Header::aligned_size(alignment);

        if end_aligned <= start_aligned || end_aligned - start_aligned <= header_size {
            log::warn!(
                "init rejected: aligned region [{start_aligned:#x}, {end_aligned:#x}) too small for header_size={header_size}"
            );
            return false;
        }

        let region_size = end_aligned - start_aligned;
        let initial_size = region_size - header_size;

        self.free_list = List::new(Owner::Free);
        self.alloc_list = List::new(Owner::Allocated);
        self.alignment = alignment;
        self.header_size = header_size;

        let block = unsafe { Header::write(start_aligned, initial_size) };
        unsafe { self.free_list.push_tail(block) };

        self.free_bytes = initial_size;
        self.min_free_bytes_ever = initial_size;

        log::debug!(
            "init ok: region=[{start_aligned:#x}, {end_aligned:#x}) alignment={alignment} header_size={header_size} free_bytes={initial_size}"
        );
        true
    }

    /// Allocates a payload of at least `want` bytes, aligned to the
    /// allocator's alignment. Returns null on failure (zero-sized request,
    /// or no free block large enough).
    ///
    /// # Safety
    ///
    /// The allocator must have been successfully [`init`](Allocator::init)'d
    /// and not subsequently moved or otherwise invalidated.
    pub unsafe fn allocate(&mut self, want: usize) -> *mut u8 {
        if want == 0 {
            log::debug!("allocate(0) rejected: zero-sized request");
            return ptr::null_mut();
        }

        // want can arrive as anything up to usize::MAX; want + header_size (and
        // align_up's own rounding add) must not silently wrap, or a
        // pathologically large request could wrap down to a tiny `need` and
        // pass the free_bytes check below instead of being rejected.
        let Some(need) = want
            .checked_add(self.header_size)
            .and_then(|raw| raw.checked_add(self.alignment - 1))
            .map(|rounded| rounded & !(self.alignment - 1))
        else {
            log::debug!("allocate({want}) failed: requested size overflows block accounting");
            return ptr::null_mut();
        };
        if need > self.free_bytes {
            log::debug!("allocate({want}) failed: need={need} > free_bytes={}", self.free_bytes);
            return ptr::null_mut();
        }

        let chosen = unsafe {
            self.free_list
                .iter()
                .find(|&block| unsafe { (*block).size } >= need)
        };

        let Some(block) = chosen else {
            log::debug!("allocate({want}) failed: no free block >= {need} bytes");
            return ptr::null_mut();
        };

        unsafe {
            self.free_list.unlink(block);

            let leftover = (*block).size - need;
            if leftover > 2 * self.header_size {
                (*block).size = need;
                let remainder_addr = Header::end_addr(block);
                let remainder = Header::write(remainder_addr, leftover);
                self.free_list.push_tail(remainder);
            }

            self.alloc_list.push_tail(block);

            self.free_bytes -= (*block).size;
            if self.free_bytes < self.min_free_bytes_ever {
                self.min_free_bytes_ever = self.free_bytes;
            }

            let payload = Header::payload(block, self.header_size);
            log::trace!("allocate({want}) ok: block_size={} payload={payload:p}", (*block).size);
            payload
        }
    }

    /// Releases a payload pointer previously returned by
    /// [`allocate`](Allocator::allocate) on this allocator. Null is a no-op.
    /// A pointer whose header does not claim the allocated list as its
    /// owner is silently ignored.
    ///
    /// # Safety
    ///
    /// If `p` is non-null, it must either be null or have been returned by a
    /// prior call to [`allocate`](Allocator::allocate) on this same
    /// allocator and not already freed.
    pub unsafe fn free(&mut self, p: *mut u8) {
        if p.is_null() {
            return;
        }

        let mut block = unsafe { Header::from_payload(p, self.header_size) };

        if !unsafe { self.alloc_list.unlink(block) } {
            log::warn!("free({p:p}) rejected: pointer is not a live allocation on this allocator");
            return;
        }

        unsafe {
            self.free_bytes += (*block).size;

            // Coalesce left: a free block L with L + L.size == block.
            let left = self
                .free_list
                .iter()
                .find(|&candidate| unsafe { Header::end_addr(candidate) } == block as usize);
            if let Some(left) = left {
                self.free_list.unlink(left);
                (*left).size += (*block).size;
                block = left;
            }

            // Coalesce right: a free block R with block + block.size == R.
            let right = self
                .free_list
                .iter()
                .find(|&candidate| unsafe { Header::end_addr(block) } == candidate as usize);
            if let Some(right) = right {
                self.free_list.unlink(right);
                (*block).size += (*right).size;
            }

            self.free_list.push_tail(block);
            log::trace!("free({p:p}) ok: merged_block_size={}", (*block).size);
        }
    }

    /// Total free bytes, header-inclusive, across every block on the free
    /// list. O(1). This is an upper bound on what a single `allocate` call
    /// can satisfy, not a prediction of it (see
    /// [`largest_available`](Allocator::largest_available)).
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_bytes
    }

    /// The largest payload a single `allocate` call could currently
    /// satisfy: the size of the largest free block, minus its header.
    /// Zero if the free list is empty.
    #[must_use]
    pub fn largest_available(&self) -> usize {
        let largest = unsafe {
            self.free_list
                .iter()
                .map(|block| unsafe { (*block).size })
                .max()
                .unwrap_or(0)
        };
        largest.saturating_sub(self.header_size)
    }

    /// The lifetime-minimum of [`available`](Allocator::available) observed
    /// so far. Monotonically non-increasing; the sole longitudinal signal
    /// this allocator keeps beyond the two live counters (SPEC_FULL.md §7).
    #[must_use]
    pub fn min_free_bytes_ever(&self) -> usize {
        self.min_free_bytes_ever
    }

    /// The aligned header size (`H`) this allocator was initialised with.
    /// Exposed for tests and callers that want to reason about split
    /// thresholds without hard-coding the header layout.
    #[must_use]
    pub fn header_size(&self) -> usize {
        self.header_size
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}
