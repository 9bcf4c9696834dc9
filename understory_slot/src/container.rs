// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container accessor trait and a reference grid container.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::{ContainerId, ItemStack};

/// Host accessor for a grid container.
///
/// This is the only view the model has of host state. Implementations read
/// live host data on every call; the model never caches what they return.
///
/// The trait is object safe so that a [`ScreenContext`](crate::ScreenContext)
/// can borrow the active container as `&dyn Container<Stack = S>`.
pub trait Container {
    /// Stack type held by each slot.
    type Stack: ItemStack;

    /// Identity of this container.
    fn id(&self) -> ContainerId;

    /// Current number of slots.
    fn size(&self) -> usize;

    /// Live contents of the slot at `index`.
    ///
    /// Only called with `index < self.size()`.
    fn stack(&self, index: usize) -> Self::Stack;

    /// Screen-space bounds of the slot at `index`.
    ///
    /// Only called with `index < self.size()`.
    fn bounds(&self, index: usize) -> Rect;
}

/// A `Vec`-backed container laid out as a row-major grid.
///
/// Slot `i` sits at column `i % columns`, row `i / columns`. Its top-left
/// corner is `origin + (column * pitch.x, row * pitch.y)` and its extent is
/// `slot_size`. The default layout uses an 18px pitch with 16px slots.
#[derive(Clone, Debug)]
pub struct GridContainer<S> {
    id: ContainerId,
    columns: usize,
    origin: Point,
    pitch: Vec2,
    slot_size: Size,
    stacks: Vec<S>,
}

impl<S: ItemStack> GridContainer<S> {
    /// Create a container of `len` empty slots arranged in `columns` columns.
    ///
    /// A `columns` value of zero is treated as one.
    pub fn new(id: ContainerId, columns: usize, len: usize) -> Self {
        let mut stacks = Vec::with_capacity(len);
        stacks.resize_with(len, S::empty);
        Self {
            id,
            columns: columns.max(1),
            origin: Point::ZERO,
            pitch: Vec2::new(18.0, 18.0),
            slot_size: Size::new(16.0, 16.0),
            stacks,
        }
    }

    /// Replace the grid layout.
    pub fn with_layout(mut self, origin: Point, pitch: Vec2, slot_size: Size) -> Self {
        self.origin = origin;
        self.pitch = pitch;
        self.slot_size = slot_size;
        self
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Whether the container has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Borrow the stack at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&S> {
        self.stacks.get(index)
    }

    /// Store `stack` at `index` and return the previous contents.
    ///
    /// Returns `None` and leaves the container untouched when `index` is out of range.
    pub fn set(&mut self, index: usize, stack: S) -> Option<S> {
        let slot = self.stacks.get_mut(index)?;
        Some(core::mem::replace(slot, stack))
    }

    /// Remove and return the stack at `index`, leaving the slot empty.
    pub fn take(&mut self, index: usize) -> Option<S> {
        self.set(index, S::empty())
    }

    /// Grow (with empty slots) or shrink the container to `len` slots.
    pub fn resize(&mut self, len: usize) {
        self.stacks.resize_with(len, S::empty);
    }
}

impl<S: ItemStack> Container for GridContainer<S> {
    type Stack = S;

    fn id(&self) -> ContainerId {
        self.id
    }

    fn size(&self) -> usize {
        self.stacks.len()
    }

    fn stack(&self, index: usize) -> S {
        self.stacks[index].clone()
    }

    fn bounds(&self, index: usize) -> Rect {
        let column = (index % self.columns) as f64;
        let row = (index / self.columns) as f64;
        let corner = self.origin + Vec2::new(column * self.pitch.x, row * self.pitch.y);
        Rect::from_origin_size(corner, self.slot_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_container_is_all_empty() {
        let c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 9, 27);
        assert_eq!(c.size(), 27);
        assert!((0..27).all(|i| c.stack(i).is_none()));
    }

    #[test]
    fn set_take_and_out_of_range() {
        let mut c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 3, 3);
        assert_eq!(c.set(1, Some(5)), Some(None));
        assert_eq!(c.get(1), Some(&Some(5)));
        assert_eq!(c.take(1), Some(Some(5)));
        assert_eq!(c.get(1), Some(&None));
        assert_eq!(c.set(3, Some(9)), None);
        assert_eq!(c.size(), 3);
    }

    #[test]
    fn grid_bounds_are_row_major() {
        let c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 9, 18)
            .with_layout(Point::new(8.0, 18.0), Vec2::new(18.0, 18.0), Size::new(16.0, 16.0));
        assert_eq!(c.bounds(0), Rect::new(8.0, 18.0, 24.0, 34.0));
        assert_eq!(c.bounds(8), Rect::new(152.0, 18.0, 168.0, 34.0));
        // First slot of the second row.
        assert_eq!(c.bounds(9), Rect::new(8.0, 36.0, 24.0, 52.0));
    }

    #[test]
    fn zero_columns_is_one_column() {
        let c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 0, 2);
        assert_eq!(c.columns(), 1);
        assert_eq!(c.bounds(1).origin(), Point::new(0.0, 18.0));
    }

    #[test]
    fn resize_shrinks_and_grows() {
        let mut c: GridContainer<Option<u8>> = GridContainer::new(ContainerId(1), 3, 3);
        c.set(2, Some(1));
        c.resize(2);
        assert_eq!(c.size(), 2);
        c.resize(4);
        assert_eq!(c.size(), 4);
        assert_eq!(c.get(2), Some(&None));
    }
}
