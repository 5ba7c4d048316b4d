//! Block header (C1): the per-block metadata embedded directly in the
//! managed region, immediately before every block's payload.

use std::mem;
use std::ptr;

use crate::align::align_up;

/// Which list currently owns a block, or [`Owner::Unlinked`] if the block is
/// detached from both.
///
/// The source design used the owning list's own address as a sentinel
/// (null meaning unlinked, a list pointer meaning "linked here"). This is the
/// tagged replacement the design notes call for: identity is now a plain tag
/// comparison instead of a raw pointer comparison against `&pxFree` /
/// `&pxAlloc`, but it plays exactly the same role — it is the validity token
/// `free` checks before trusting a pointer.
///
/// [`Header::owner_tag`] stores this as a bare `u8`, not as `Owner` itself:
/// `free`'s validity check (`List::unlink`) must be able to inspect the
/// owner byte of a corrupted or foreign header — one that may hold any bit
/// pattern, not just `0..=2` — without ever materialising an `Owner` value
/// out of untrusted memory. A typed `#[repr(u8)] enum` load of an
/// out-of-range discriminant is immediate undefined behaviour, which would
/// make the documented "silently ignore a corrupted header" contract
/// impossible to honour; a `u8` tag compared by value has no invalid bit
/// patterns to worry about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Owner {
    Unlinked = 0,
    Free = 1,
    Allocated = 2,
}

impl Owner {
    /// The raw byte stored in a header's `owner_tag` field for this owner.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// Per-block header. Lives at the start of every block, `next`/`prev` link it
/// into whichever list `owner_tag` names, and `size` is the *total* block
/// size — header and payload together.
///
/// Headers are never constructed as ordinary Rust values; they are written
/// directly into caller-supplied memory via [`Header::write`] and accessed
/// thereafter through raw pointers, since they live inside a region this
/// allocator does not own in the borrow-checker sense.
#[repr(C)]
pub struct Header {
    pub next: *mut Header,
    pub prev: *mut Header,
    pub size: usize,
    pub owner_tag: u8,
}

impl Header {
    /// The header size for a given alignment: `sizeof(Header)` rounded up to
    /// `alignment`. This is `H` throughout the allocator.
    #[must_use]
    pub fn aligned_size(alignment: usize) -> usize {
        align_up(mem::size_of::<Header>(), alignment)
    }

    /// Writes a fresh, unlinked header of the given `size` at `addr` and
    /// returns a pointer to it.
    ///
    /// # Safety
    ///
    /// `addr` must be valid for writes of at least `mem::size_of::<Header>()`
    /// bytes and suitably aligned for `Header`.
    pub unsafe fn write(addr: usize, size: usize) -> *mut Header {
        let block = addr as *mut Header;
        unsafe {
            ptr::write(
                block,
                Header {
                    next: ptr::null_mut(),
                    prev: ptr::null_mut(),
                    size,
                    owner_tag: Owner::Unlinked.tag(),
                },
            );
        }
        block
    }

    /// The address one past the end of this block (`B + B.size`).
    ///
    /// # Safety
    ///
    /// `block` must be a live, dereferenceable header.
    pub unsafe fn end_addr(block: *mut Header) -> usize {
        unsafe { block as usize + (*block).size }
    }

    /// The payload pointer for this block: `H` bytes past its own start.
    ///
    /// # Safety
    ///
    /// `block` must be a live, dereferenceable header.
    pub unsafe fn payload(block: *mut Header, header_size: usize) -> *mut u8 {
        unsafe { (block as usize + header_size) as *mut u8 }
    }

    /// Recovers the header pointer for a payload pointer previously produced
    /// by [`Header::payload`].
    ///
    /// # Safety
    ///
    /// `payload` must have been returned by a prior call to
    /// [`Header::payload`] with the same `header_size`, and the underlying
    /// memory must still be live.
    pub unsafe fn from_payload(payload: *mut u8, header_size: usize) -> *mut Header {
        (payload as usize - header_size) as *mut Header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_size_is_a_multiple_of_alignment() {
        for align in [8usize, 16, 32, 64] {
            let h = Header::aligned_size(align);
            assert_eq!(h % align, 0);
            assert!(h >= mem::size_of::<Header>());
        }
    }

    #[test]
    fn write_then_read_round_trips_fields() {
        let mut buf = vec![0u8; 256];
        let addr = buf.as_mut_ptr() as usize;
        unsafe {
            let block = Header::write(addr, 128);
            assert_eq!((*block).size, 128);
            assert_eq!((*block).owner_tag, Owner::Unlinked.tag());
            assert!((*block).next.is_null());
            assert!((*block).prev.is_null());
        }
    }

    #[test]
    fn payload_and_from_payload_are_inverse() {
        let mut buf = vec![0u8; 256];
        let addr = buf.as_mut_ptr() as usize;
        let header_size = Header::aligned_size(8);
        unsafe {
            let block = Header::write(addr, 128);
            let payload = Header::payload(block, header_size);
            let recovered = Header::from_payload(payload, header_size);
            assert_eq!(recovered, block);
        }
    }

    #[test]
    fn end_addr_accounts_for_whole_block_size() {
        let mut buf = vec![0u8; 256];
        let addr = buf.as_mut_ptr() as usize;
        unsafe {
            let block = Header::write(addr, 100);
            assert_eq!(Header::end_addr(block), addr + 100);
        }
    }
}
