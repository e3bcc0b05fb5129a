#![no_std]
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod feedback;
pub mod keymap;
pub mod layer;
pub mod planck;
pub mod report;
pub mod store;
pub mod tap_hold;

#[cfg(any(test, feature = "test-utils"))]
pub mod flash_test_stub;

#[macro_use]
mod macros;

pub use config::{Capabilities, Config, ConfigError};
pub use dispatcher::{Dispatcher, Outcome};
pub use event::{KeyEvent, KeyId, Misuse};
pub use layerlock_common::{LayerId, LayerSet};
pub use tap_hold::{GestureResult, Resolver, TapHoldConfig};
