// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip composition: let subscribers edit a tooltip the host already built.
//!
//! Subscribers receive the hovered stack and the host's line list and edit the
//! list in place: append, insert, or replace it wholesale with `*lines = ..`.
//! Line order is whatever the host produced unless a subscriber reorders it.
//!
//! Nothing runs when the host produced no tooltip (absent or empty list) or
//! when the stack is empty. A subscriber that fails has its edits rolled back,
//! so later subscribers and the host see the list as it was before it ran.

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_slot::ItemStack;

use crate::bus::{PublishReport, Registry};
use crate::error::SubscriberError;
use crate::guard;
use crate::types::SubscriptionId;

/// Boxed tooltip handler.
pub type TooltipHandler<S, L> = Box<dyn FnMut(&S, &mut Vec<L>) -> Result<(), SubscriberError>>;

/// Ordered tooltip subscribers.
pub struct TooltipHooks<S, L> {
    registry: Registry<TooltipHandler<S, L>>,
}

impl<S, L> Default for TooltipHooks<S, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, L> core::fmt::Debug for TooltipHooks<S, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TooltipHooks")
            .field("subscribers", &self.registry)
            .finish()
    }
}

impl<S, L> TooltipHooks<S, L> {
    /// Create with no subscribers.
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
        }
    }

    /// Subscribe `handler` under `name`; idempotent by name.
    pub fn subscribe<F>(&mut self, name: &'static str, handler: F) -> SubscriptionId
    where
        F: FnMut(&S, &mut Vec<L>) -> Result<(), SubscriberError> + 'static,
    {
        self.registry.insert(name, Box::new(handler))
    }

    /// Remove a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.registry.remove(id)
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Subscription names in call order.
    pub fn subscribers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }
}

impl<S: ItemStack, L: Clone> TooltipHooks<S, L> {
    /// Run every subscriber over `lines`, in order.
    ///
    /// Returns an empty report without calling anyone when `lines` is absent or
    /// empty, or `stack` is empty.
    pub fn compose(&mut self, stack: &S, lines: Option<&mut Vec<L>>) -> PublishReport {
        let Some(lines) = lines else {
            return PublishReport::default();
        };
        if lines.is_empty() || stack.is_empty() {
            return PublishReport::default();
        }
        self.registry.dispatch("tooltip", |handler| {
            let before = lines.clone();
            let result = guard::call(|| handler(stack, lines));
            if result.is_err() {
                *lines = before;
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::Cell;

    type Hooks = TooltipHooks<Option<&'static str>, String>;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn append_preserves_original_order() {
        let mut hooks = Hooks::new();
        hooks.subscribe("price", |_, lines| {
            lines.push(String::from("Price: 12"));
            Ok(())
        });
        let mut tip = lines(&["Diamond Sword", "Sharpness V"]);
        let report = hooks.compose(&Some("sword"), Some(&mut tip));
        assert_eq!(report.delivered, 1);
        assert_eq!(tip, lines(&["Diamond Sword", "Sharpness V", "Price: 12"]));
    }

    #[test]
    fn absent_or_empty_never_invokes() {
        let calls = Rc::new(Cell::new(0));
        let mut hooks = Hooks::new();
        let c = calls.clone();
        hooks.subscribe("count", move |_, _| {
            c.set(c.get() + 1);
            Ok(())
        });
        assert_eq!(hooks.compose(&Some("sword"), None).invoked(), 0);
        let mut empty = Vec::new();
        assert_eq!(hooks.compose(&Some("sword"), Some(&mut empty)).invoked(), 0);
        assert!(empty.is_empty());
        let mut tip = lines(&["Air"]);
        assert_eq!(hooks.compose(&None, Some(&mut tip)).invoked(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn failed_subscriber_edits_are_rolled_back() {
        let mut hooks = Hooks::new();
        hooks.subscribe("half-done", |_, lines| {
            lines.push(String::from("partial"));
            lines.swap(0, 1);
            Err(SubscriberError::new("lookup failed"))
        });
        hooks.subscribe("owner", |_, lines| {
            lines.push(String::from("Owner: Steve"));
            Ok(())
        });
        let mut tip = lines(&["Pet", "Level 3"]);
        let report = hooks.compose(&Some("pet"), Some(&mut tip));
        assert_eq!((report.delivered, report.failed), (1, 1));
        assert_eq!(tip, lines(&["Pet", "Level 3", "Owner: Steve"]));
    }

    #[test]
    fn subscriber_may_replace_the_list() {
        let mut hooks = Hooks::new();
        hooks.subscribe("redact", |_, lines| {
            *lines = vec![String::from("???")];
            Ok(())
        });
        let mut tip = lines(&["Secret", "More secret"]);
        hooks.compose(&Some("secret"), Some(&mut tip));
        assert_eq!(tip, lines(&["???"]));
    }

    #[test]
    fn registration_is_idempotent() {
        let mut hooks = Hooks::new();
        let a = hooks.subscribe("a", |_, _| Ok(()));
        assert_eq!(hooks.subscribe("a", |_, _| Ok(())), a);
        assert_eq!(hooks.len(), 1);
        assert!(hooks.unsubscribe(a));
        assert!(hooks.is_empty());
    }
}
