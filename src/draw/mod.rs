//! Rendering primitives and the retained scene they are drawn into.
//!
//! This module defines the drawing types used by the annotation layer:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Primitive`] and [`Attrs`]: what a graphic is and how it looks
//! - [`Renderer`]: the retained-mode engine annotations draw through
//! - [`Scene`]: an in-memory [`Renderer`] with hit testing and snapshots
//! - Cairo-based painting of a scene (feature `cairo`)

pub mod color;
pub mod primitive;
#[cfg(feature = "cairo")]
pub mod render;
pub mod renderer;
pub mod scene;

// Re-export commonly used types at module level
pub use color::Color;
pub use primitive::{Attrs, GraphicId, PathCommand, Primitive};
pub use renderer::Renderer;
pub use scene::{NodeSnapshot, Scene};

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};

#[cfg(feature = "cairo")]
pub use render::{render_scene, render_to_surface};
