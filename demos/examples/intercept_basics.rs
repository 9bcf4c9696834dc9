// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interceptor basics.
//!
//! Hide one slot, disguise another, and watch the render events of two frames.
//!
//! Run:
//! - `cargo run -p understory_demos --example intercept_basics`
//! - `RUST_LOG=understory_intercept=trace cargo run -p understory_demos --example intercept_basics`

use tracing_subscriber::EnvFilter;
use understory_intercept::{Interceptor, PolicyError, RenderHead, SlotPolicy};
use understory_slot::{ContainerId, GridContainer, SlotElement};

type Stack = Option<&'static str>;

struct Showcase;

impl SlotPolicy<Stack> for Showcase {
    fn should_hide(&self, element: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Ok(element.index() == 4)
    }

    fn replacement_stack(
        &self,
        element: &SlotElement<Stack>,
    ) -> Result<Option<Stack>, PolicyError> {
        // Draw a placeholder over anything named "secret".
        Ok((*element.stack() == Some("secret")).then_some(Some("barrier")))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut chest: GridContainer<Stack> = GridContainer::new(ContainerId(1), 9, 9);
    chest.set(0, Some("apple"));
    chest.set(2, Some("secret"));
    chest.set(4, Some("hidden gem"));

    let mut icpt: Interceptor<Stack, Showcase> = Interceptor::new(Showcase);
    icpt.register_render_subscriber("print", |e| {
        println!(
            "  frame {} slot {}: drew {:?}{}",
            e.frame,
            e.element.index(),
            e.displayed,
            if e.replaced { " (replaced)" } else { "" }
        );
        Ok(())
    });

    for frame in 0..2 {
        println!("Frame {frame}:");
        for i in 0..9 {
            if icpt.render_head(&chest, i) == RenderHead::Skip {
                println!("  slot {i}: skipped");
                continue;
            }
            // Hosts with two render call sites resolve twice; the event is published once.
            let _ = icpt.resolve_stack(&chest, i);
            let _ = icpt.resolve_stack(&chest, i);
        }
        icpt.end_cycle();
        chest.set(0, Some("golden apple"));
    }

    // Out-of-range lookups are harmless.
    println!("slot 99 resolves to {:?}", icpt.render_slot(&chest, 99));
}
