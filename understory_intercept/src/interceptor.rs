// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing hook surface.
//!
//! ## Overview
//!
//! [`Interceptor`] owns one [`PolicyEngine`], one [`ActionTracker`], the render
//! and post-click buses and the tooltip hooks. A host adapter calls one method
//! per host callback; each method resolves the element afresh, asks the policy
//! and tells the adapter whether to cancel, substitute or continue.
//!
//! ## Render
//!
//! Per element per frame, in index order:
//! 1. [`render_head`](Interceptor::render_head): `Skip` when the policy hides the element.
//! 2. [`resolve_stack`](Interceptor::resolve_stack): the stack to draw (a
//!    replacement, or the live stack) and one [`RenderEvent`].
//!
//! Hosts that reach the render path from two call sites in one frame still see
//! a single render event per element.
//!
//! ## Click
//!
//! 1. [`click_head`](Interceptor::click_head) asks the block query before
//!    anything else happens. A blocked click takes no snapshot and never
//!    publishes; otherwise the slot is snapshotted and a key issued.
//! 2. [`capture`](Interceptor::capture) serves a secondary entry point that has
//!    no veto; it adopts the click-head's snapshot when there is one.
//! 3. [`click_commit`](Interceptor::click_commit) runs past the point of no
//!    return and publishes a [`PostClickEvent`] carrying the pre-action stack.
//!
//! [`end_cycle`](Interceptor::end_cycle) closes the render/input cycle and
//! expires every snapshot that never reached its commit.
//!
//! ## Minimal example
//!
//! ```
//! use understory_intercept::interceptor::Interceptor;
//! use understory_intercept::policy::SlotPolicy;
//! use understory_intercept::types::{ActionKind, ClickHead, RenderHead};
//! use understory_intercept::error::PolicyError;
//! use understory_slot::{ContainerId, GridContainer, ScreenContext, SlotElement};
//!
//! struct HideFour;
//! impl SlotPolicy<Option<u32>> for HideFour {
//!     fn should_hide(&self, e: &SlotElement<Option<u32>>) -> Result<bool, PolicyError> {
//!         Ok(e.index() == 4)
//!     }
//! }
//!
//! let mut chest: GridContainer<Option<u32>> = GridContainer::new(ContainerId(1), 9, 9);
//! chest.set(2, Some(64));
//! let mut icpt: Interceptor<Option<u32>, HideFour> = Interceptor::new(HideFour);
//!
//! assert_eq!(icpt.render_head(&chest, 4), RenderHead::Skip);
//! assert_eq!(icpt.render_slot(&chest, 2), Some(Some(64)));
//!
//! let screen: ScreenContext<'_, Option<u32>> = ScreenContext::new("Chest", &chest);
//! let ClickHead::Proceed(key) = icpt.click_head(&screen, 2, 0, ActionKind::Pickup) else {
//!     unreachable!()
//! };
//! chest.take(2);
//! let screen: ScreenContext<'_, Option<u32>> = ScreenContext::new("Chest", &chest);
//! assert!(icpt.click_commit(key, &screen).published());
//! icpt.end_cycle();
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use understory_slot::{Container, ContainerId, ItemStack, ScreenContext, SlotElement, resolve};

use crate::bus::{EventBus, PublishReport};
use crate::error::SubscriberError;
use crate::events::{PostClickEvent, RenderEvent};
use crate::lifecycle::{ActionState, ActionTracker, Correlation, Snapshot};
use crate::policy::{PolicyEngine, SlotPolicy};
use crate::tooltip::TooltipHooks;
use crate::types::{
    ActionKey, ActionKind, ClickHead, CommitOutcome, RenderHead, SubscriptionId, TooltipHead,
};

/// Interception layer for one screen or one host integration.
///
/// `S` is the host's stack type, `P` the application policy and `L` the
/// tooltip line type.
pub struct Interceptor<S, P, L = String> {
    engine: PolicyEngine<P>,
    tracker: ActionTracker<S>,
    render_bus: EventBus<RenderEvent<S>>,
    click_bus: EventBus<PostClickEvent<S>>,
    tooltips: TooltipHooks<S, L>,
    // Elements already announced this frame.
    rendered: BTreeSet<(ContainerId, i32)>,
}

impl<S, P: core::fmt::Debug, L> core::fmt::Debug for Interceptor<S, P, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interceptor")
            .field("engine", &self.engine)
            .field("render_bus", &self.render_bus)
            .field("click_bus", &self.click_bus)
            .field("tooltips", &self.tooltips)
            .field("rendered", &self.rendered.len())
            .finish_non_exhaustive()
    }
}

impl<S: ItemStack, P: SlotPolicy<S>, L> Interceptor<S, P, L> {
    /// Create an interceptor around `policy` with no subscribers.
    pub fn new(policy: P) -> Self {
        Self {
            engine: PolicyEngine::new(policy),
            tracker: ActionTracker::new(),
            render_bus: EventBus::new(),
            click_bus: EventBus::new(),
            tooltips: TooltipHooks::new(),
            rendered: BTreeSet::new(),
        }
    }

    /// The fail-open policy wrapper.
    pub fn engine(&self) -> &PolicyEngine<P> {
        &self.engine
    }

    /// Borrow the application policy.
    pub fn policy(&self) -> &P {
        self.engine.policy()
    }

    /// Mutably borrow the application policy.
    pub fn policy_mut(&mut self) -> &mut P {
        self.engine.policy_mut()
    }

    /// Current render/input cycle.
    pub fn frame(&self) -> u64 {
        self.tracker.frame()
    }

    /// The action tracker (read-only).
    pub fn tracker(&self) -> &ActionTracker<S> {
        &self.tracker
    }

    /// Render-head: whether the host should skip this element this frame.
    ///
    /// Indices that do not resolve are never hidden.
    pub fn render_head(&self, container: &dyn Container<Stack = S>, index: i32) -> RenderHead {
        let element = resolve(container, index);
        if element.is_sentinel() {
            return RenderHead::Proceed;
        }
        if self.engine.should_hide(&element) {
            tracing::trace!(
                target: "understory_intercept::interceptor",
                container = ?container.id(),
                index,
                "hiding element"
            );
            RenderHead::Skip
        } else {
            RenderHead::Proceed
        }
    }

    /// Stack resolution: the stack the host should draw for this element.
    ///
    /// Publishes a [`RenderEvent`] the first time an element is resolved in a
    /// frame. Unresolvable indices yield the empty stack and publish nothing.
    pub fn resolve_stack(&mut self, container: &dyn Container<Stack = S>, index: i32) -> S {
        let element = resolve(container, index);
        if element.is_sentinel() {
            return S::empty();
        }
        let replacement = self.engine.replacement_stack(&element);
        let replaced = replacement.is_some();
        let displayed = replacement.unwrap_or_else(|| element.stack().clone());
        if self.rendered.insert((container.id(), index)) {
            let event = RenderEvent {
                element,
                displayed: displayed.clone(),
                replaced,
                frame: self.tracker.frame(),
            };
            self.render_bus.publish(&event);
        }
        displayed
    }

    /// Render-head and stack resolution for hosts with a single call site.
    ///
    /// `None` means skip the element.
    pub fn render_slot(&mut self, container: &dyn Container<Stack = S>, index: i32) -> Option<S> {
        match self.render_head(container, index) {
            RenderHead::Skip => None,
            RenderHead::Proceed => Some(self.resolve_stack(container, index)),
        }
    }

    /// Tooltip-head: whether to cancel the tooltip of the hovered element.
    ///
    /// Proceeds when nothing resolvable is under the pointer.
    pub fn tooltip_head(&self, screen: &ScreenContext<'_, S>) -> TooltipHead {
        match screen.hovered() {
            Some(element) if self.engine.should_suppress_tooltip(&element) => TooltipHead::Suppress,
            _ => TooltipHead::Proceed,
        }
    }

    /// Click-head: veto the click or capture its snapshot.
    ///
    /// Out-of-range indices (clicks outside the grid) are still offered to the
    /// block query; their snapshot is the empty stack.
    pub fn click_head(
        &mut self,
        screen: &ScreenContext<'_, S>,
        index: i32,
        button: i32,
        kind: ActionKind,
    ) -> ClickHead {
        let element = screen.resolve(index);
        if self
            .engine
            .should_block_action(&element, button, kind, screen)
        {
            let dropped = self
                .tracker
                .discard_unvetted(screen.container.id(), index, button, kind);
            tracing::debug!(
                target: "understory_intercept::interceptor",
                container = ?screen.container.id(),
                index,
                button,
                ?kind,
                dropped,
                "click blocked"
            );
            return ClickHead::Blocked;
        }
        let key = self
            .tracker
            .capture(screen.container, index, button, kind, Some(screen.title));
        ClickHead::Proceed(key)
    }

    /// Secondary capture point for hosts with a second click entry.
    ///
    /// Adopts the key issued by a matching [`click_head`](Self::click_head) in
    /// this cycle, so the snapshot is taken once per gesture. A snapshot taken
    /// here first stays unvetted until a click-head proceeds for the gesture;
    /// a click-head that blocks it drops it unread.
    pub fn capture(
        &mut self,
        container: &dyn Container<Stack = S>,
        index: i32,
        button: i32,
        kind: ActionKind,
    ) -> ActionKey {
        self.tracker
            .capture_or_adopt(container, index, button, kind)
    }

    /// Click-commit: publish the post-click event for `key`.
    ///
    /// `screen` is the screen as it stands at the commit; the event carries
    /// its cursor stack, and its title when the capture did not record one.
    pub fn click_commit(&mut self, key: ActionKey, screen: &ScreenContext<'_, S>) -> CommitOutcome {
        match self.tracker.state(&key) {
            ActionState::Fired => {
                tracing::debug!(
                    target: "understory_intercept::interceptor",
                    ?key,
                    "commit for a key that already fired"
                );
                return CommitOutcome::Duplicate;
            }
            ActionState::Dropped => return CommitOutcome::Dropped,
            ActionState::Idle | ActionState::Captured => {}
        }
        let container = screen.container;
        if key.container != container.id() {
            self.tracker.discard(&key);
            tracing::warn!(
                target: "understory_intercept::interceptor",
                ?key,
                container = ?container.id(),
                "commit for a different container; dropping the action"
            );
            return CommitOutcome::ContainerMismatch;
        }
        let element = resolve(container, key.slot);
        if element.is_sentinel() {
            self.tracker.discard(&key);
            tracing::debug!(
                target: "understory_intercept::interceptor",
                ?key,
                size = container.size(),
                "commit outside the container; nothing to publish"
            );
            return CommitOutcome::OutOfRange;
        }
        let (snapshot, synthesized) = match self.tracker.fire(&key) {
            Correlation::Matched(snapshot) => (snapshot, false),
            Correlation::Synthesized(snapshot) => (snapshot, true),
            Correlation::AlreadyFired => return CommitOutcome::Duplicate,
            Correlation::Dropped => return CommitOutcome::Dropped,
        };
        let report = self.publish_click(key, element, snapshot, screen, synthesized);
        if synthesized {
            CommitOutcome::Synthesized(report)
        } else {
            CommitOutcome::Published(report)
        }
    }

    fn publish_click(
        &mut self,
        key: ActionKey,
        element: SlotElement<S>,
        snapshot: Snapshot<S>,
        screen: &ScreenContext<'_, S>,
        synthesized: bool,
    ) -> PublishReport {
        let (pre, title) = snapshot.into_parts();
        let event = PostClickEvent {
            key,
            element,
            pre,
            button: key.button,
            kind: key.kind,
            cursor: screen.cursor.clone(),
            title: title.unwrap_or_else(|| String::from(screen.title)),
            synthesized,
        };
        self.click_bus.publish(&event)
    }

    /// Drop the snapshot of an action the host abandoned.
    pub fn abort(&mut self, key: &ActionKey) -> bool {
        self.tracker.discard(key)
    }

    /// Close the render/input cycle.
    ///
    /// Expires uncommitted snapshots and resets per-frame render dedupe.
    /// Returns how many snapshots expired.
    pub fn end_cycle(&mut self) -> usize {
        self.rendered.clear();
        self.tracker.end_cycle()
    }

    /// Subscribe to render events.
    pub fn register_render_subscriber<F>(
        &mut self,
        name: &'static str,
        handler: F,
    ) -> SubscriptionId
    where
        F: FnMut(&RenderEvent<S>) -> Result<(), SubscriberError> + 'static,
    {
        self.render_bus.subscribe(name, handler)
    }

    /// Remove a render subscriber.
    pub fn unregister_render_subscriber(&mut self, id: SubscriptionId) -> bool {
        self.render_bus.unsubscribe(id)
    }

    /// Subscribe to post-click events.
    pub fn register_post_click_subscriber<F>(
        &mut self,
        name: &'static str,
        handler: F,
    ) -> SubscriptionId
    where
        F: FnMut(&PostClickEvent<S>) -> Result<(), SubscriberError> + 'static,
    {
        self.click_bus.subscribe(name, handler)
    }

    /// Remove a post-click subscriber.
    pub fn unregister_post_click_subscriber(&mut self, id: SubscriptionId) -> bool {
        self.click_bus.unsubscribe(id)
    }

    /// Subscribe to tooltip composition.
    pub fn register_tooltip_subscriber<F>(
        &mut self,
        name: &'static str,
        handler: F,
    ) -> SubscriptionId
    where
        F: FnMut(&S, &mut Vec<L>) -> Result<(), SubscriberError> + 'static,
    {
        self.tooltips.subscribe(name, handler)
    }

    /// Remove a tooltip subscriber.
    pub fn unregister_tooltip_subscriber(&mut self, id: SubscriptionId) -> bool {
        self.tooltips.unsubscribe(id)
    }
}

impl<S: ItemStack, P: SlotPolicy<S>, L: Clone> Interceptor<S, P, L> {
    /// Tooltip composition over the host's computed lines.
    ///
    /// Subscribers are not called when `lines` is absent or empty.
    pub fn on_tooltip_render(&mut self, stack: &S, lines: Option<&mut Vec<L>>) -> PublishReport {
        self.tooltips.compose(stack, lines)
    }
}
