use terra_config::ConfigError;
use terra_render::{RenderContextError, TextureError};
use winit::error::EventLoopError;

use crate::platform::PlatformError;

/// Failures that end the application before or during the event loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("scene initialization failed: {0}")]
    Texture(#[from] TextureError),
}
