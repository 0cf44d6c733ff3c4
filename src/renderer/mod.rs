//! Rendering
//!
//! Scenes turn game state into a [`DrawList`]; the wgpu pipeline
//! tessellates and draws it. Text goes to the DOM HUD.

pub mod draw;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw::{Color, DrawCmd, DrawList, Layer};
pub use pipeline::RenderState;
