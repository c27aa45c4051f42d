/*
 * The platform layer hosts the window: it executes `PlatformCommand`s and
 * reports user interaction as `AppEvent`s. On Windows this is a native Win32
 * window; elsewhere a line-oriented console host stands in with the same
 * command and event vocabulary.
 */
pub mod error;
pub mod layout;
pub mod message_box;
pub mod types;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub(crate) mod command_executor;
#[cfg(windows)]
pub(crate) mod controls;
#[cfg(windows)]
pub(crate) mod window_common;

#[cfg(not(windows))]
pub mod console;

#[cfg(windows)]
pub use app::PlatformInterface;
#[cfg(not(windows))]
pub use console::PlatformInterface;

pub use error::{PlatformError, Result as PlatformResult};
pub use message_box::{DialogOutcome, MessageBoxButtons, MessageBoxIcon, MessageBoxRequest};
pub use types::{
    AppEvent, ControlId, FormSnapshot, MessageSeverity, PlatformCommand, PlatformEventHandler,
    WindowConfig, WindowId,
};
