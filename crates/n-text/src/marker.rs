//! Tracked ranges: char-offset spans that follow buffer edits.
//!
//! A [`TrackedRange`] is a `[start, end)` span plus a [`Gravity`] that decides
//! what happens when text lands exactly on one of its edges. Ranges never
//! hold a reference to the buffer. They live in a [`MarkerSet`] arena owned by
//! the [`Buffer`](crate::buffer::Buffer), addressed by [`MarkerId`], and every
//! mutating buffer operation runs an adjustment pass over the arena before it
//! returns. The buffer is therefore the only mutation entry point; ranges
//! observe.
//!
//! # Insert rule
//!
//! For an insertion of `len` chars at `offset`:
//!
//! | Edge    | Shifts right when                                   |
//! |---------|-----------------------------------------------------|
//! | `start` | `offset < start`, or `offset == start && !left`     |
//! | `end`   | `offset < end`, or `offset == end && right`         |
//!
//! So `left == true` keeps the start put and the range absorbs the new text;
//! `right == true` pushes the end out and the range absorbs it too. A start
//! pushed past its end drags the end along (empty ranges stay well-formed).
//!
//! # Delete rule
//!
//! Offsets inside the deleted region collapse to its start; offsets after it
//! shift left by its length. A range fully inside the deletion ends up empty.

use std::fmt;

use crate::span::Span;

// ---------------------------------------------------------------------------
// Gravity
// ---------------------------------------------------------------------------

/// Per-edge policy for text inserted exactly at a range boundary.
///
/// `true` on an edge means the range absorbs text inserted there.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gravity {
    pub left: bool,
    pub right: bool,
}

impl Gravity {
    /// Neither edge absorbs: insertions at `start` push the whole range,
    /// insertions at `end` land outside it.
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    /// Both edges absorb.
    pub const BOTH: Self = Self {
        left: true,
        right: true,
    };

    /// Create a gravity from its two edge flags.
    #[inline]
    #[must_use]
    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// Gravity for two ranges that are about to exchange their text.
    ///
    /// Returns `(gravity_for_a, gravity_for_b)`. Whichever range starts first
    /// absorbs at its start but not at its end; the later one absorbs at both
    /// edges. Text inserted on the boundary the two ranges share then belongs
    /// to the later range only.
    #[must_use]
    pub const fn for_pair(a_start: usize, b_start: usize) -> (Self, Self) {
        let leading = Self::new(true, false);
        let trailing = Self::BOTH;
        if a_start < b_start {
            (leading, trailing)
        } else {
            (trailing, leading)
        }
    }
}

impl fmt::Debug for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = |absorbs: bool| if absorbs { '+' } else { '-' };
        write!(f, "Gravity({}{})", edge(self.left), edge(self.right))
    }
}

// ---------------------------------------------------------------------------
// TrackedRange
// ---------------------------------------------------------------------------

/// A span that adjusts itself as the owning buffer is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedRange {
    pub span: Span,
    pub gravity: Gravity,
}

impl TrackedRange {
    /// Create a tracked range over `span`.
    #[inline]
    #[must_use]
    pub const fn new(span: Span, gravity: Gravity) -> Self {
        Self { span, gravity }
    }

    /// Current start offset.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.span.start
    }

    /// Current end offset.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.span.end
    }

    /// Apply an insertion of `len` chars at `offset`.
    pub const fn on_insert(&mut self, offset: usize, len: usize) {
        let Span { mut start, mut end } = self.span;

        if offset < start || (offset == start && !self.gravity.left) {
            start += len;
        }
        if offset < end || (offset == end && self.gravity.right) {
            end += len;
        }
        if start > end {
            end = start;
        }

        self.span = Span { start, end };
    }

    /// Apply a deletion of `[del_start, del_end)`.
    pub const fn on_delete(&mut self, del_start: usize, del_end: usize) {
        self.span = Span {
            start: shift_for_delete(self.span.start, del_start, del_end),
            end: shift_for_delete(self.span.end, del_start, del_end),
        };
    }
}

/// Where `offset` ends up after `[del_start, del_end)` is removed.
const fn shift_for_delete(offset: usize, del_start: usize, del_end: usize) -> usize {
    if offset <= del_start {
        offset
    } else if offset >= del_end {
        offset - (del_end - del_start)
    } else {
        del_start
    }
}

// ---------------------------------------------------------------------------
// MarkerSet
// ---------------------------------------------------------------------------

/// Handle to a tracked range inside a [`MarkerSet`].
///
/// Ids are never reused within one set, so a stale id simply resolves to
/// `None` after [`MarkerSet::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

/// Arena of tracked ranges for one buffer.
///
/// Expected to hold a handful of entries at a time (the two ranges of a swap
/// plus the caret and selection), so a flat `Vec` with linear lookup wins
/// over anything cleverer.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    entries: Vec<(MarkerId, TrackedRange)>,
    next_id: u64,
}

impl MarkerSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Start tracking `span` and return its id.
    pub fn insert(&mut self, span: Span, gravity: Gravity) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, TrackedRange::new(span, gravity)));
        id
    }

    /// Stop tracking `id`. Returns the range's final bounds if it existed.
    pub fn remove(&mut self, id: MarkerId) -> Option<TrackedRange> {
        let idx = self.entries.iter().position(|(k, _)| *k == id)?;
        Some(self.entries.swap_remove(idx).1)
    }

    /// Look up a tracked range.
    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<TrackedRange> {
        self.entries
            .iter()
            .find(|(k, _)| *k == id)
            .map(|(_, range)| *range)
    }

    /// Change the gravity of a tracked range. Returns `false` if `id` is
    /// unknown.
    pub fn set_gravity(&mut self, id: MarkerId, gravity: Gravity) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, range)) => {
                range.gravity = gravity;
                true
            }
            None => false,
        }
    }

    /// Number of live tracked ranges.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is being tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adjustment pass for an insertion of `len` chars at `offset`.
    pub fn on_insert(&mut self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        for (_, range) in &mut self.entries {
            range.on_insert(offset, len);
        }
    }

    /// Adjustment pass for a deletion of `[start, end)`.
    pub fn on_delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        for (_, range) in &mut self.entries {
            range.on_delete(start, end);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(start: usize, end: usize, left: bool, right: bool) -> TrackedRange {
        TrackedRange::new(Span::new(start, end), Gravity::new(left, right))
    }

    // -- Insert -------------------------------------------------------------

    #[test]
    fn insert_before_shifts_both_edges() {
        let mut r = tracked(5, 8, false, false);
        r.on_insert(2, 3);
        assert_eq!(r.span, Span::new(8, 11));
    }

    #[test]
    fn insert_after_leaves_range_alone() {
        let mut r = tracked(5, 8, true, true);
        r.on_insert(9, 3);
        assert_eq!(r.span, Span::new(5, 8));
    }

    #[test]
    fn insert_inside_grows_range() {
        let mut r = tracked(5, 8, false, false);
        r.on_insert(6, 2);
        assert_eq!(r.span, Span::new(5, 10));
    }

    #[test]
    fn insert_at_start_with_left_gravity_absorbs() {
        let mut r = tracked(5, 8, true, false);
        r.on_insert(5, 4);
        assert_eq!(r.span, Span::new(5, 12));
    }

    #[test]
    fn insert_at_start_without_left_gravity_pushes() {
        let mut r = tracked(5, 8, false, false);
        r.on_insert(5, 4);
        assert_eq!(r.span, Span::new(9, 12));
    }

    #[test]
    fn insert_at_end_with_right_gravity_absorbs() {
        let mut r = tracked(5, 8, false, true);
        r.on_insert(8, 2);
        assert_eq!(r.span, Span::new(5, 10));
    }

    #[test]
    fn insert_at_end_without_right_gravity_stays_outside() {
        let mut r = tracked(5, 8, true, false);
        r.on_insert(8, 2);
        assert_eq!(r.span, Span::new(5, 8));
    }

    #[test]
    fn empty_range_without_gravity_moves_as_a_point() {
        let mut r = tracked(4, 4, false, false);
        r.on_insert(4, 3);
        assert_eq!(r.span, Span::new(7, 7));
    }

    #[test]
    fn empty_range_with_left_gravity_stays_put() {
        let mut r = tracked(4, 4, true, false);
        r.on_insert(4, 3);
        assert_eq!(r.span, Span::new(4, 4));
    }

    #[test]
    fn empty_range_with_right_gravity_grows() {
        let mut r = tracked(4, 4, true, true);
        r.on_insert(4, 3);
        assert_eq!(r.span, Span::new(4, 7));
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn delete_before_shifts_left() {
        let mut r = tracked(10, 14, false, false);
        r.on_delete(2, 5);
        assert_eq!(r.span, Span::new(7, 11));
    }

    #[test]
    fn delete_inside_shrinks() {
        let mut r = tracked(10, 20, false, false);
        r.on_delete(12, 15);
        assert_eq!(r.span, Span::new(10, 17));
    }

    #[test]
    fn delete_overlapping_start_clamps() {
        let mut r = tracked(10, 20, false, false);
        r.on_delete(8, 12);
        assert_eq!(r.span, Span::new(8, 16));
    }

    #[test]
    fn delete_overlapping_end_clamps() {
        let mut r = tracked(10, 20, false, false);
        r.on_delete(18, 25);
        assert_eq!(r.span, Span::new(10, 18));
    }

    #[test]
    fn delete_covering_range_collapses_it() {
        let mut r = tracked(10, 20, true, true);
        r.on_delete(5, 25);
        assert_eq!(r.span, Span::new(5, 5));
    }

    #[test]
    fn delete_after_leaves_range_alone() {
        let mut r = tracked(10, 20, true, true);
        r.on_delete(20, 25);
        assert_eq!(r.span, Span::new(10, 20));
    }

    // -- Gravity pairing ----------------------------------------------------

    #[test]
    fn pair_gravity_when_a_leads() {
        let (a, b) = Gravity::for_pair(2, 6);
        assert_eq!(a, Gravity::new(true, false));
        assert_eq!(b, Gravity::BOTH);
    }

    #[test]
    fn pair_gravity_when_b_leads() {
        let (a, b) = Gravity::for_pair(6, 2);
        assert_eq!(a, Gravity::BOTH);
        assert_eq!(b, Gravity::new(true, false));
    }

    #[test]
    fn pair_gravity_shared_boundary_goes_to_later_range() {
        let (ga, gb) = Gravity::for_pair(0, 4);
        let mut a = TrackedRange::new(Span::new(0, 4), ga);
        let mut b = TrackedRange::new(Span::new(4, 8), gb);
        a.on_insert(4, 3);
        b.on_insert(4, 3);
        assert_eq!(a.span, Span::new(0, 4));
        assert_eq!(b.span, Span::new(4, 11));
    }

    #[test]
    fn gravity_debug_format() {
        assert_eq!(format!("{:?}", Gravity::new(true, false)), "Gravity(+-)");
        assert_eq!(format!("{:?}", Gravity::NONE), "Gravity(--)");
    }

    // -- MarkerSet ----------------------------------------------------------

    #[test]
    fn set_insert_get_remove() {
        let mut set = MarkerSet::new();
        let id = set.insert(Span::new(1, 3), Gravity::NONE);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(id).map(|r| r.span), Some(Span::new(1, 3)));

        let removed = set.remove(id).unwrap();
        assert_eq!(removed.span, Span::new(1, 3));
        assert!(set.is_empty());
        assert!(set.get(id).is_none());
        assert!(set.remove(id).is_none());
    }

    #[test]
    fn set_ids_are_not_reused() {
        let mut set = MarkerSet::new();
        let a = set.insert(Span::new(0, 1), Gravity::NONE);
        set.remove(a);
        let b = set.insert(Span::new(0, 1), Gravity::NONE);
        assert_ne!(a, b);
        assert!(set.get(a).is_none());
    }

    #[test]
    fn set_adjusts_every_entry() {
        let mut set = MarkerSet::new();
        let a = set.insert(Span::new(0, 2), Gravity::NONE);
        let b = set.insert(Span::new(5, 9), Gravity::NONE);
        set.on_insert(3, 2);
        assert_eq!(set.get(a).unwrap().span, Span::new(0, 2));
        assert_eq!(set.get(b).unwrap().span, Span::new(7, 11));
        set.on_delete(0, 1);
        assert_eq!(set.get(a).unwrap().span, Span::new(0, 1));
        assert_eq!(set.get(b).unwrap().span, Span::new(6, 10));
    }

    #[test]
    fn set_gravity_updates_and_reports_missing() {
        let mut set = MarkerSet::new();
        let id = set.insert(Span::new(2, 4), Gravity::NONE);
        assert!(set.set_gravity(id, Gravity::BOTH));
        assert_eq!(set.get(id).unwrap().gravity, Gravity::BOTH);
        set.remove(id);
        assert!(!set.set_gravity(id, Gravity::NONE));
    }

    #[test]
    fn zero_length_edits_are_ignored() {
        let mut set = MarkerSet::new();
        let id = set.insert(Span::new(2, 4), Gravity::BOTH);
        set.on_insert(2, 0);
        set.on_delete(3, 3);
        assert_eq!(set.get(id).unwrap().span, Span::new(2, 4));
    }
}
