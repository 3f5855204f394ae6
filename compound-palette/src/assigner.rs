use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::{AssignerConfig, ConfigError};
use crate::palette::{Palette, Rgb};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("all palette colors are currently assigned ({capacity} in use)")]
    ExhaustedPalette { capacity: usize },
    #[error("expiry timeout must be greater than zero")]
    InvalidTimeout,
}

/// One row of a rendered legend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub hex: String,
}

#[derive(Clone, Copy, Debug)]
struct Lease {
    slot: usize,
    last_used: Instant,
}

/// Hands out palette colors to compound labels and takes them back once a
/// label has gone unused for longer than the timeout.
///
/// Expiry is lazy: every public operation first sweeps stale leases as of
/// the clock's current reading, so no background work is needed. Free slots
/// are always handed out lowest index first.
#[derive(Clone, Debug)]
pub struct ColorAssigner<C: Clock = SystemClock> {
    palette: Palette,
    timeout: Duration,
    clock: C,
    leases: IndexMap<String, Lease>,
    available: Vec<bool>,
}

impl ColorAssigner<SystemClock> {
    pub fn new(palette: Palette, timeout: Duration) -> Result<Self, AssignError> {
        Self::with_clock(palette, timeout, SystemClock)
    }

    pub fn from_config(config: &AssignerConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<C: Clock> ColorAssigner<C> {
    pub fn with_clock(palette: Palette, timeout: Duration, clock: C) -> Result<Self, AssignError> {
        if timeout.is_zero() {
            return Err(AssignError::InvalidTimeout);
        }

        let available = vec![true; palette.len()];
        Ok(Self {
            palette,
            timeout,
            clock,
            leases: IndexMap::new(),
            available,
        })
    }

    pub fn from_config_with_clock(config: &AssignerConfig, clock: C) -> Result<Self, ConfigError> {
        let (palette, timeout) = config.validate()?;
        Ok(Self::with_clock(palette, timeout, clock)?)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the color for `label`, assigning the lowest free palette slot
    /// if the label has no live lease. A live lease is refreshed.
    ///
    /// Fails with [`AssignError::ExhaustedPalette`] when every slot is held
    /// by a live label; apart from the expiry sweep nothing is changed.
    pub fn color_for(&mut self, label: &str) -> Result<Rgb, AssignError> {
        let now = self.clock.now();
        self.expire_stale(now);

        if let Some(lease) = self.leases.get_mut(label) {
            lease.last_used = now;
            let slot = lease.slot;
            trace!(label, slot, "refreshed compound color");
            return Ok(self.color_at(slot));
        }

        let Some(slot) = self.available.iter().position(|free| *free) else {
            let capacity = self.palette.len();
            debug!(label, capacity, "no palette color available");
            return Err(AssignError::ExhaustedPalette { capacity });
        };

        self.available[slot] = false;
        self.leases.insert(
            label.to_string(),
            Lease {
                slot,
                last_used: now,
            },
        );
        debug!(label, slot, "assigned compound color");
        Ok(self.color_at(slot))
    }

    /// Snapshot of every live assignment, in the order the labels were
    /// assigned. Stale leases are reclaimed first.
    pub fn current_assignments(&mut self) -> IndexMap<String, Rgb> {
        let now = self.clock.now();
        self.expire_stale(now);

        self.leases
            .iter()
            .map(|(label, lease)| (label.clone(), self.color_at(lease.slot)))
            .collect()
    }

    pub fn legend(&mut self) -> Vec<LegendEntry> {
        self.current_assignments()
            .into_iter()
            .map(|(label, color)| LegendEntry {
                label,
                hex: color.to_hex(),
                color,
            })
            .collect()
    }

    /// Whether `label` holds a live lease. Does not refresh it.
    pub fn is_assigned(&mut self, label: &str) -> bool {
        let now = self.clock.now();
        self.expire_stale(now);
        self.leases.contains_key(label)
    }

    pub fn live_count(&mut self) -> usize {
        let now = self.clock.now();
        self.expire_stale(now);
        self.leases.len()
    }

    fn color_at(&self, slot: usize) -> Rgb {
        self.palette.colors()[slot]
    }

    fn expire_stale(&mut self, now: Instant) {
        let timeout = self.timeout;
        let available = &mut self.available;

        self.leases.retain(|label, lease| {
            let idle = now.saturating_duration_since(lease.last_used);
            if idle <= timeout {
                return true;
            }

            available[lease.slot] = true;
            debug!(
                label = label.as_str(),
                slot = lease.slot,
                idle_ms = idle.as_millis() as u64,
                "compound color expired"
            );
            false
        });
    }
}
