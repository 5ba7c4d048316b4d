//! Alignment helpers shared by the block header and the allocation engine.
//!
//! Unlike a bump allocator tied to the host's word size, this allocator's
//! alignment is a runtime parameter chosen at [`init`](crate::Allocator::init)
//! time, so alignment here is a pair of functions operating on an arbitrary
//! power-of-two `align`, rather than a macro baked to `mem::size_of::<usize>()`.

/// Rounds `value` up to the next multiple of `align`.
///
/// # Examples
///
/// ```
/// use freelist32::align::align_up;
///
/// assert_eq!(align_up(13, 8), 16);
/// assert_eq!(align_up(16, 8), 16);
/// assert_eq!(align_up(0, 8), 0);
/// ```
///
/// # Panics / undefined results
///
/// `align` must be a power of two; the caller is responsible for validating
/// this (see [`Allocator::init`](crate::Allocator::init)), since a non-power-of-two
/// `align` makes the mask computation below produce a nonsense result rather
/// than panicking.
#[must_use]
pub const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Rounds `value` down to the previous multiple of `align`.
///
/// # Examples
///
/// ```
/// use freelist32::align::align_down;
///
/// assert_eq!(align_down(13, 8), 8);
/// assert_eq!(align_down(16, 8), 16);
/// ```
#[must_use]
pub const fn align_down(value: usize, align: usize) -> usize {
    value & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_next_multiple() {
        for align in [1usize, 2, 4, 8, 16, 32, 64] {
            for value in 0..(align * 4) {
                let rounded = align_up(value, align);
                assert!(rounded >= value);
                assert_eq!(rounded % align, 0);
                assert!(rounded - value < align);
            }
        }
    }

    #[test]
    fn align_down_rounds_to_previous_multiple() {
        for align in [1usize, 2, 4, 8, 16, 32, 64] {
            for value in 0..(align * 4) {
                let rounded = align_down(value, align);
                assert!(rounded <= value);
                assert_eq!(rounded % align, 0);
                assert!(value - rounded < align);
            }
        }
    }

    #[test]
    fn already_aligned_values_are_unchanged() {
        assert_eq!(align_up(64, 32), 64);
        assert_eq!(align_down(64, 32), 64);
    }
}
