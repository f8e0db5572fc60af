//! Terra globe viewer application.
//!
//! Provides the window, the frame driver, orbit controls and platform
//! directory handling.

pub mod controls;
pub mod error;
pub mod frame_clock;
pub mod platform;
pub mod pointer;
pub mod window;

pub use controls::{OrbitControls, Spherical};
pub use error::AppError;
pub use frame_clock::{FrameClock, LoopState};
pub use platform::{PlatformDirs, PlatformError};
pub use pointer::PointerState;
pub use window::{AppState, run_with_config, window_attributes_from_config};
