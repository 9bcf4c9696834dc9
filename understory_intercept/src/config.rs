// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature flags consumed by policies and by the single-condition toggles.
//!
//! ## Overview
//!
//! The interceptor does not load configuration. It reads flags through a
//! [`FlagSource`] on *every* query so that a settings change applies on the next
//! frame without any invalidation step. Each flag maps to one of the simple
//! toggles that live outside the core (particle suppression, status overlay,
//! cursor motion); those call [`enabled`] at their own hook point.
//!
//! [`FeatureConfig`] is the serializable form, for hosts that keep flags in a
//! TOML or JSON file.
//!
//! ```
//! use understory_intercept::config::{FeatureConfig, FeatureFlags, enabled};
//!
//! let config = FeatureConfig { hide_status_overlay: true, ..Default::default() };
//! assert!(enabled(&config, FeatureFlags::HIDE_STATUS_OVERLAY));
//! assert!(!enabled(&config, FeatureFlags::SUPPRESS_CURSOR_MOVEMENT));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

bitflags! {
    /// Boolean feature switches, one per simple toggle.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FeatureFlags: u8 {
        /// Hide block particles with broken textures.
        const HIDE_BROKEN_PARTICLES    = 0b0000_0001;
        /// Hide the status-effect overlay.
        const HIDE_STATUS_OVERLAY      = 0b0000_0010;
        /// Ignore cursor motion while the toggle's condition holds.
        const SUPPRESS_CURSOR_MOVEMENT = 0b0000_0100;
    }
}

/// Where feature flags come from.
///
/// Implementations read their backing store on every call; callers must not
/// cache the result across queries.
pub trait FlagSource {
    /// Current flags.
    fn flags(&self) -> Result<FeatureFlags, PolicyError>;
}

impl FlagSource for FeatureFlags {
    fn flags(&self) -> Result<FeatureFlags, PolicyError> {
        Ok(*self)
    }
}

impl<T: FlagSource + ?Sized> FlagSource for &T {
    fn flags(&self) -> Result<FeatureFlags, PolicyError> {
        (**self).flags()
    }
}

/// A [`FlagSource`] backed by a closure. See [`flags_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FlagsFn<F>(F);

/// Wrap a closure as a [`FlagSource`].
pub fn flags_fn<F>(f: F) -> FlagsFn<F>
where
    F: Fn() -> Result<FeatureFlags, PolicyError>,
{
    FlagsFn(f)
}

impl<F> FlagSource for FlagsFn<F>
where
    F: Fn() -> Result<FeatureFlags, PolicyError>,
{
    fn flags(&self) -> Result<FeatureFlags, PolicyError> {
        (self.0)()
    }
}

/// Serializable flag set. Missing keys read as `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// See [`FeatureFlags::HIDE_BROKEN_PARTICLES`].
    pub hide_broken_particles: bool,
    /// See [`FeatureFlags::HIDE_STATUS_OVERLAY`].
    pub hide_status_overlay: bool,
    /// See [`FeatureFlags::SUPPRESS_CURSOR_MOVEMENT`].
    pub suppress_cursor_movement: bool,
}

impl From<FeatureConfig> for FeatureFlags {
    fn from(config: FeatureConfig) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::HIDE_BROKEN_PARTICLES, config.hide_broken_particles);
        flags.set(Self::HIDE_STATUS_OVERLAY, config.hide_status_overlay);
        flags.set(
            Self::SUPPRESS_CURSOR_MOVEMENT,
            config.suppress_cursor_movement,
        );
        flags
    }
}

impl FlagSource for FeatureConfig {
    fn flags(&self) -> Result<FeatureFlags, PolicyError> {
        Ok((*self).into())
    }
}

/// Whether every bit of `flag` is set in `source`.
///
/// Fails open: an unreadable source reads as "disabled", so the host keeps its
/// normal behavior.
pub fn enabled<F: FlagSource + ?Sized>(source: &F, flag: FeatureFlags) -> bool {
    match source.flags() {
        Ok(flags) => flags.contains(flag),
        Err(error) => {
            tracing::warn!(
                target: "understory_intercept::config",
                flag = ?flag,
                %error,
                "feature flags unavailable; treating as disabled"
            );
            false
        }
    }
}
