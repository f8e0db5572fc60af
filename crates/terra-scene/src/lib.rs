//! The globe scene: day/night earth, atmosphere shell and city pins.
//!
//! Per-frame animation is a pure function of elapsed time
//! ([`Animator::tick`]); the renderers only consume its output.

pub mod animator;
pub mod atmosphere;
pub mod earth;
pub mod pins;
pub mod scene;
pub mod settings;
pub mod shading;
pub mod sphere;

pub use animator::{Animator, DEFAULT_ROTATION_RATE, RenderCommand};
pub use atmosphere::{AtmosphereRenderer, AtmosphereUniform};
pub use earth::{EarthRenderer, EarthTextures, EarthUniform};
pub use pins::{PinInstance, PinRenderer, PinUniform};
pub use scene::GlobeScene;
pub use settings::{AtmospherePalette, GlobeSettings};
pub use sphere::UvSphere;
