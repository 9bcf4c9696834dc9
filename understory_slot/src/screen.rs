// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cycle snapshot of the enclosing screen.

use kurbo::Point;

use crate::container::Container;
use crate::element::{SlotElement, resolve, slot_at};
use crate::types::ItemStack;

/// Read-only view of the screen hosting a container, valid for one render/input cycle.
///
/// The borrow of the active container ties a context to the cycle that built it;
/// build a fresh one per hook firing rather than storing it.
pub struct ScreenContext<'a, S> {
    /// Screen title as displayed.
    pub title: &'a str,
    /// Stack currently held by the cursor (empty when nothing is held).
    pub cursor: S,
    /// Active container handler.
    pub container: &'a dyn Container<Stack = S>,
    /// Pointer position in screen space.
    pub pointer: Point,
}

impl<'a, S: ItemStack> ScreenContext<'a, S> {
    /// Build a context with an empty cursor and the pointer at the origin.
    pub fn new(title: &'a str, container: &'a dyn Container<Stack = S>) -> Self {
        Self {
            title,
            cursor: S::empty(),
            container,
            pointer: Point::ZERO,
        }
    }

    /// Set the cursor-held stack.
    pub fn with_cursor(mut self, cursor: S) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set the pointer position.
    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    /// Resolve a slot of the active container.
    pub fn resolve(&self, index: i32) -> SlotElement<S> {
        resolve(self.container, index)
    }

    /// Resolve the slot under the pointer, if any.
    pub fn hovered(&self) -> Option<SlotElement<S>> {
        let index = slot_at(self.container, self.pointer)?;
        let index = i32::try_from(index).ok()?;
        Some(self.resolve(index))
    }
}

impl<S: core::fmt::Debug + ItemStack> core::fmt::Debug for ScreenContext<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScreenContext")
            .field("title", &self.title)
            .field("cursor", &self.cursor)
            .field("container", &self.container.id())
            .field("pointer", &self.pointer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::GridContainer;
    use crate::types::ContainerId;

    #[test]
    fn hovered_follows_pointer() {
        let mut c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 9, 9);
        c.set(3, Some(7));
        let ctx: ScreenContext<'_, Option<u8>> =
            ScreenContext::new("Chest", &c).with_pointer(Point::new(60.0, 8.0));
        let hovered = ctx.hovered().unwrap();
        assert_eq!(hovered.index(), 3);
        assert_eq!(hovered.stack(), &Some(7));

        let outside: ScreenContext<'_, Option<u8>> =
            ScreenContext::new("Chest", &c).with_pointer(Point::new(-5.0, -5.0));
        assert!(outside.hovered().is_none());
    }

    #[test]
    fn cursor_defaults_to_empty() {
        let c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 9, 9);
        let ctx: ScreenContext<'_, Option<u8>> = ScreenContext::new("Chest", &c);
        assert!(ctx.cursor.is_none());
        assert_eq!(ctx.with_cursor(Some(2)).cursor, Some(2));
    }

    #[test]
    fn debug_names_the_container() {
        let c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(4), 9, 9);
        let ctx: ScreenContext<'_, Option<u8>> = ScreenContext::new("Chest", &c);
        let text = alloc::format!("{ctx:?}");
        assert!(text.contains("Chest"));
        assert!(text.contains("ContainerId(4)"));
    }
}
