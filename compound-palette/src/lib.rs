//! Stable color assignment for compound labels.
//!
//! A [`ColorAssigner`] maps each label it is asked about onto a slot of a
//! small fixed [`Palette`] and reclaims slots from labels that have not been
//! looked up within the expiry timeout.

pub mod assigner;
pub mod clock;
pub mod config;
pub mod palette;

pub use assigner::{AssignError, ColorAssigner, LegendEntry};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AssignerConfig, ConfigError};
pub use palette::{Palette, PaletteError, Rgb, DEFAULT_PALETTE};
