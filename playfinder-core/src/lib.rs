//! Playfinder Core Library
//!
//! Location privacy for the playground finder. This crate decides how
//! precisely the app may know where the user is: it stores the user's privacy
//! preferences and degrades device positions to the configured accuracy floor
//! before anything else sees them.
//!
//! ```text
//! PlayfinderCore
//!     ├── PreferenceStore (persisted options, change notification)
//!     └── PositionGuard (refresh-interval cache, accuracy-floor obfuscation)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod config;
pub mod location;
pub mod preferences;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::PlayfinderCore;
pub use config::CoreConfig;
