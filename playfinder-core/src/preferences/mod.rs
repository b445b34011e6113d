//! User privacy preferences.
//!
//! The preference store owns the set of options that decide how much the
//! app may learn about the user's position:
//!
//! | Option        | Type | Default | Meaning                              |
//! |---------------|------|---------|--------------------------------------|
//! | `playgrounds` | bool | `true`  | location may drive playground search |
//! | `navigation`  | bool | `false` | location may drive walking directions|
//! | `addresses`   | bool | `false` | location may be reverse-geocoded     |
//! | `accuracy`    | m    | `0`     | accuracy floor (`0` = none)          |
//! | `interval`    | s    | `0`     | minimum refresh interval (`0` = none)|
//!
//! The whole set is replaced on every edit and persisted as a flat JSON list
//! of `{kind, value}` pairs.

mod error;
pub mod rating;
mod store;
pub mod types;

pub use error::{PreferenceError, Result};
pub use rating::{Level, Rating};
pub use store::{PreferenceHandler, PreferenceStore, SubscriptionId};
pub use types::{OptionDataType, OptionGroup, OptionKind, PreferenceSet, PrivacyOption, UseCase};
