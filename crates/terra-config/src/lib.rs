//! Configuration for the Terra globe viewer.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and are reloadable. Colors are written as CSS-style strings
//! so the file stays hand-editable.

mod cli;
mod color;
mod config;
mod error;

pub use cli::CliArgs;
pub use color::SrgbColor;
pub use config::{
    CameraConfig, Config, ControlsConfig, DebugConfig, GlobeConfig, RenderConfig, WindowConfig,
};
pub use error::ConfigError;
