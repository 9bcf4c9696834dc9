// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronous, ordered publish/subscribe.
//!
//! ## Delivery
//!
//! [`EventBus::publish`] calls every current subscriber once, in subscription
//! order, on the calling thread, and returns when the last one has run. There is
//! no queue and no cross-thread hand-off: the bus runs inside host render and
//! input callbacks.
//!
//! ## Failure isolation
//!
//! A subscriber that returns an error (or panics, with the `std` feature) is
//! logged under its subscription name and skipped; the remaining subscribers
//! still receive the event and nothing propagates back to the publisher.
//!
//! ## Registration
//!
//! Subscriptions are named. Subscribing a name that is already registered is a
//! no-op that returns the existing [`SubscriptionId`], so repeated feature
//! initialization cannot double-deliver.
//!
//! ```
//! use understory_intercept::bus::EventBus;
//!
//! let mut bus: EventBus<u32> = EventBus::new();
//! let first = bus.subscribe("audit", |n| { assert!(*n > 0); Ok(()) });
//! let again = bus.subscribe("audit", |_| Ok(()));
//! assert_eq!(first, again);
//!
//! let report = bus.publish(&7);
//! assert_eq!((report.delivered, report.failed), (1, 0));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::SubscriberError;
use crate::guard::{self, Failure};
use crate::types::SubscriptionId;

/// Counts from one publish.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PublishReport {
    /// Subscribers that handled the event successfully.
    pub delivered: usize,
    /// Subscribers that failed; each failure was logged.
    pub failed: usize,
}

impl PublishReport {
    /// Total subscribers invoked.
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Boxed event handler.
pub type Handler<E> = Box<dyn FnMut(&E) -> Result<(), SubscriberError>>;

pub(crate) struct Subscription<H> {
    id: SubscriptionId,
    name: &'static str,
    handler: H,
}

/// Ordered, name-keyed subscriber list shared by the event bus and the tooltip hooks.
pub(crate) struct Registry<H> {
    entries: Vec<Subscription<H>>,
    next_id: u32,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<H> core::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|s| s.name))
            .finish()
    }
}

impl<H> Registry<H> {
    pub(crate) fn insert(&mut self, name: &'static str, handler: H) -> SubscriptionId {
        if let Some(existing) = self.entries.iter().find(|s| s.name == name) {
            tracing::debug!(
                target: "understory_intercept::bus",
                subscriber = name,
                "already subscribed; keeping the existing handler"
            );
            return existing.id;
        }
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Subscription { id, name, handler });
        tracing::debug!(target: "understory_intercept::bus", subscriber = name, "subscribed");
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let Some(pos) = self.entries.iter().position(|s| s.id == id) else {
            return false;
        };
        let removed = self.entries.remove(pos);
        tracing::debug!(
            target: "understory_intercept::bus",
            subscriber = removed.name,
            "unsubscribed"
        );
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|s| s.name)
    }

    /// Hand each handler, in order, to `deliver`, logging failures and continuing.
    pub(crate) fn dispatch(
        &mut self,
        event: &'static str,
        mut deliver: impl FnMut(&mut H) -> Result<(), Failure<SubscriberError>>,
    ) -> PublishReport {
        let mut report = PublishReport::default();
        for sub in &mut self.entries {
            match deliver(&mut sub.handler) {
                Ok(()) => report.delivered += 1,
                Err(failure) => {
                    report.failed += 1;
                    tracing::error!(
                        target: "understory_intercept::bus",
                        event,
                        subscriber = sub.name,
                        error = %failure,
                        "subscriber failed; continuing with the rest"
                    );
                }
            }
        }
        report
    }
}

/// Ordered publish/subscribe channel for one event type.
pub struct EventBus<E> {
    registry: Registry<Handler<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.registry)
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
        }
    }

    /// Subscribe `handler` under `name`.
    ///
    /// Delivery order is subscription order. If `name` is already subscribed,
    /// `handler` is dropped and the existing id is returned.
    pub fn subscribe<F>(&mut self, name: &'static str, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) -> Result<(), SubscriberError> + 'static,
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

    /// Subscription names in delivery order.
    pub fn subscribers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }

    /// Deliver `event` to every subscriber in order.
    pub fn publish(&mut self, event: &E) -> PublishReport {
        self.registry
            .dispatch(core::any::type_name::<E>(), |handler| {
                guard::call(|| handler(event))
            })
    }
}
