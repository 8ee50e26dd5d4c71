//! Host platform detection and terminal progress helpers.

pub mod platform;
pub mod progress;

pub use platform::Platform;
pub use progress::Spinner;
