//! WebGPU rendering module
//!
//! The scene is a flat list of coloured rectangles drawn as triangles.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{build_scene, screen_to_world, world_to_ndc};
pub use vertex::Vertex;
