// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot elements and bounds-checked resolution.
//!
//! ## Resolution
//!
//! [`resolve`] is the only way to obtain a [`SlotElement`]. It checks the index
//! against the container's *current* size on every call, because the host may
//! resize or tear down a container between two hook firings. Anything out of
//! range yields the [sentinel](SlotElement::sentinel) instead of failing.
//!
//! Elements are values, not handles: they copy the live stack at resolution
//! time and are meant to be dropped at the end of the hook that resolved them.

use kurbo::{Point, Rect};

use crate::container::Container;
use crate::types::{ContainerId, ItemStack};

/// One addressable cell of a container, as seen at resolution time.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotElement<S> {
    container: Option<ContainerId>,
    index: i32,
    stack: S,
    bounds: Rect,
}

impl<S: ItemStack> SlotElement<S> {
    /// The empty sentinel: no owning container, empty stack, zero bounds.
    ///
    /// `index` records what was asked for so diagnostics can report it.
    pub fn sentinel(index: i32) -> Self {
        Self {
            container: None,
            index,
            stack: S::empty(),
            bounds: Rect::ZERO,
        }
    }

    /// Whether this is the sentinel for an unresolvable slot.
    pub fn is_sentinel(&self) -> bool {
        self.container.is_none()
    }

    /// Owning container, or `None` for the sentinel.
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Index within the owning container.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Stack held by the slot when it was resolved.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Consume the element, returning its stack.
    pub fn into_stack(self) -> S {
        self.stack
    }

    /// Screen-space bounds of the slot.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether `pt` falls inside the slot. Always false for the sentinel.
    pub fn contains_point(&self, pt: Point) -> bool {
        !self.is_sentinel() && self.bounds.contains(pt)
    }
}

/// Resolve the slot at `index` in `container`.
///
/// Returns the sentinel when `index` is negative or `>= container.size()`.
pub fn resolve<C>(container: &C, index: i32) -> SlotElement<C::Stack>
where
    C: Container + ?Sized,
{
    match usize::try_from(index) {
        Ok(i) if i < container.size() => SlotElement {
            container: Some(container.id()),
            index,
            stack: container.stack(i),
            bounds: container.bounds(i),
        },
        _ => SlotElement::sentinel(index),
    }
}

/// Resolve against an optional container; a missing container yields the sentinel.
pub fn resolve_in<C>(container: Option<&C>, index: i32) -> SlotElement<C::Stack>
where
    C: Container + ?Sized,
{
    match container {
        Some(c) => resolve(c, index),
        None => SlotElement::sentinel(index),
    }
}

/// Index of the first slot, in index order, whose bounds contain `pt`.
pub fn slot_at<C>(container: &C, pt: Point) -> Option<usize>
where
    C: Container + ?Sized,
{
    (0..container.size()).find(|&i| container.bounds(i).contains(pt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::GridContainer;

    fn chest() -> GridContainer<Option<&'static str>> {
        let mut c = GridContainer::new(ContainerId(4), 9, 9);
        c.set(2, Some("stone"));
        c
    }

    #[test]
    fn resolve_in_range_reads_live_contents() {
        let mut c = chest();
        let e = resolve(&c, 2);
        assert_eq!(e.container(), Some(ContainerId(4)));
        assert_eq!(e.stack(), &Some("stone"));

        // No caching: a later resolution sees the mutation.
        c.set(2, Some("dirt"));
        assert_eq!(resolve(&c, 2).stack(), &Some("dirt"));
        // The earlier element kept its own copy.
        assert_eq!(e.stack(), &Some("stone"));
    }

    #[test]
    fn resolve_out_of_range_is_sentinel() {
        let c = chest();
        for i in [-999, -1, 9, 10, i32::MAX, i32::MIN] {
            let e = resolve(&c, i);
            assert!(e.is_sentinel(), "index {i} should be the sentinel");
            assert!(e.stack().is_none());
            assert_eq!(e.index(), i);
        }
    }

    #[test]
    fn resolve_after_shrink_is_sentinel() {
        let mut c = chest();
        assert!(!resolve(&c, 8).is_sentinel());
        c.resize(4);
        assert!(resolve(&c, 8).is_sentinel());
    }

    #[test]
    fn resolve_missing_container() {
        let e = resolve_in::<GridContainer<Option<u8>>>(None, 0);
        assert!(e.is_sentinel());
    }

    #[test]
    fn contains_point_and_hit_test() {
        let c = chest();
        let e = resolve(&c, 1);
        assert!(e.contains_point(Point::new(20.0, 4.0)));
        assert!(!e.contains_point(Point::new(17.0, 4.0)));
        assert_eq!(slot_at(&c, Point::new(20.0, 4.0)), Some(1));
        // The gap between two slots hits nothing.
        assert_eq!(slot_at(&c, Point::new(17.0, 4.0)), None);
        assert!(!SlotElement::<Option<u8>>::sentinel(0).contains_point(Point::ZERO));
    }
}
