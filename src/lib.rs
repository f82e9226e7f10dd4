//! Keyboard backlight control for HP OMEN laptops
//!
//! Lighting is driven through vendor BIOS commands: [`transport`] submits
//! command envelopes over a [`PlatformCall`] and checks return codes,
//! [`layout`] knows the byte layout of the firmware buffers, and
//! [`KeyboardLighting`] puts the two together.
//!
//! ```no_run
//! use lomen::{platform, Color, KeyboardLighting, ZoneColors};
//!
//! let mut lighting = KeyboardLighting::new(platform::connect()?);
//! lighting.set_colors(&ZoneColors {
//!     game: Some(Color::new(0xFF, 0x00, 0x00)),
//!     ..Default::default()
//! })?;
//! # Ok::<(), lomen::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod lighting;
pub mod platform;
pub mod protocol;
pub mod transport;
pub mod worker;

pub use color::{Color, Zone, ZoneColors};
pub use error::{Error, Result};
pub use layout::KeyboardType;
pub use lighting::{KeyboardLighting, LightingStatus};
pub use transport::{PlatformCall, Transport};
pub use worker::LightingWorker;
