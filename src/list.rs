//! Intrusive doubly-linked list (C2) shared by the free list and the
//! allocated list.
//!
//! Order is insertion order, never address order — first-fit search and
//! coalescing both walk from `head`, and it is the allocation/deallocation
//! engines, not the list itself, that decide what "a match" means.

use std::ptr;

use crate::block::{Header, Owner};

/// A doubly-linked list of blocks, all tagged with the same [`Owner`].
pub struct List {
    kind: Owner,
    head: *mut Header,
    tail: *mut Header,
}

impl List {
    /// Creates an empty list that will tag every block pushed onto it with
    /// `kind`.
    pub const fn new(kind: Owner) -> Self {
        List {
            kind,
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    /// Appends `block` at the tail, setting its `owner` to this list's kind.
    ///
    /// # Safety
    ///
    /// `block` must be a live, dereferenceable, currently-unlinked header.
    pub unsafe fn push_tail(&mut self, block: *mut Header) {
        unsafe {
            (*block).next = ptr::null_mut();
            (*block).prev = self.tail;
            if self.tail.is_null() {
                self.head = block;
            } else {
                (*self.tail).next = block;
            }
            self.tail = block;
            (*block).owner_tag = self.kind.tag();
        }
    }

    /// Removes `block` from this list, restoring neighbours and head/tail as
    /// required, then clears its links and owner.
    ///
    /// Returns `false` without modifying anything if `block`'s owner tag does
    /// not match this list — the sole validity check
    /// [`free`](crate::Allocator::free) relies on to reject foreign, corrupted
    /// or already-freed pointers. The comparison is a plain `u8` read, never a
    /// typed `Owner` load, so it stays well-defined even when `block` points
    /// at memory this allocator never wrote (see [`Owner`]'s doc comment).
    ///
    /// # Safety
    ///
    /// `block` must be a live, dereferenceable header.
    pub unsafe fn unlink(&mut self, block: *mut Header) -> bool {
        unsafe {
            if (*block).owner_tag != self.kind.tag() {
                return false;
            }

            if (*block).prev.is_null() {
                self.head = (*block).next;
            } else {
                (*(*block).prev).next = (*block).next;
            }

            if (*block).next.is_null() {
                self.tail = (*block).prev;
            } else {
                (*(*block).next).prev = (*block).prev;
            }

            (*block).next = ptr::null_mut();
            (*block).prev = ptr::null_mut();
            (*block).owner_tag = Owner::Unlinked.tag();
            true
        }
    }

    /// Walks the list from head to tail. Callers must not mutate the list
    /// while iterating.
    ///
    /// # Safety
    ///
    /// Every block reachable from `head` must be live and dereferenceable
    /// for the duration of the iteration.
    pub unsafe fn iter(&self) -> Iter {
        Iter { current: self.head }
    }
}

pub struct Iter {
    current: *mut Header,
}

impl Iterator for Iter {
    type Item = *mut Header;

    fn next(&mut self) -> Option<*mut Header> {
        if self.current.is_null() {
            return None;
        }
        let block = self.current;
        self.current = unsafe { (*block).next };
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn make_block(addr: usize, size: usize) -> *mut Header {
        unsafe { Header::write(addr, size) }
    }

    #[test]
    fn push_tail_links_single_block_as_head_and_tail() {
        let mut buf = vec![0u8; 128];
        let mut list = List::new(Owner::Free);
        unsafe {
            let block = make_block(buf.as_mut_ptr() as usize, 128);
            list.push_tail(block);
            assert!(!list.is_empty());
            assert_eq!((*block).owner_tag, Owner::Free.tag());
            let collected: Vec<_> = list.iter().collect();
            assert_eq!(collected, vec![block]);
        }
    }

    #[test]
    fn push_tail_preserves_insertion_order() {
        let mut a = vec![0u8; 64];
        let mut b = vec![0u8; 64];
        let mut c = vec![0u8; 64];
        let mut list = List::new(Owner::Free);
        unsafe {
            let ba = make_block(a.as_mut_ptr() as usize, 64);
            let bb = make_block(b.as_mut_ptr() as usize, 64);
            let bc = make_block(c.as_mut_ptr() as usize, 64);
            list.push_tail(ba);
            list.push_tail(bb);
            list.push_tail(bc);
            let collected: Vec<_> = list.iter().collect();
            assert_eq!(collected, vec![ba, bb, bc]);
        }
    }

    #[test]
    fn unlink_middle_block_rejoins_neighbours() {
        let mut a = vec![0u8; 64];
        let mut b = vec![0u8; 64];
        let mut c = vec![0u8; 64];
        let mut list = List::new(Owner::Free);
        unsafe {
            let ba = make_block(a.as_mut_ptr() as usize, 64);
            let bb = make_block(b.as_mut_ptr() as usize, 64);
            let bc = make_block(c.as_mut_ptr() as usize, 64);
            list.push_tail(ba);
            list.push_tail(bb);
            list.push_tail(bc);

            assert!(list.unlink(bb));
            assert_eq!((*bb).owner_tag, Owner::Unlinked.tag());
            assert!((*bb).next.is_null());
            assert!((*bb).prev.is_null());

            let collected: Vec<_> = list.iter().collect();
            assert_eq!(collected, vec![ba, bc]);
        }
    }

    #[test]
    fn unlink_rejects_block_with_wrong_owner() {
        let mut buf = vec![0u8; 64];
        let mut free_list = List::new(Owner::Free);
        let alloc_list = List::new(Owner::Allocated);
        unsafe {
            let block = make_block(buf.as_mut_ptr() as usize, 64);
            free_list.push_tail(block);
            // Attempting to unlink from the wrong list must fail and leave
            // the block untouched.
            let mut alloc_list = alloc_list;
            assert!(!alloc_list.unlink(block));
            assert_eq!((*block).owner_tag, Owner::Free.tag());
        }
    }

    #[test]
    fn unlink_last_remaining_block_empties_the_list() {
        let mut buf = vec![0u8; 64];
        let mut list = List::new(Owner::Free);
        unsafe {
            let block = make_block(buf.as_mut_ptr() as usize, 64);
            list.push_tail(block);
            assert!(list.unlink(block));
            assert!(list.is_empty());
        }
    }
}
