pub mod color;
pub mod constants;
pub mod field;
pub mod scheduler;
pub mod state;

// Shader bundled as a string constant
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use color::*;
pub use constants::*;
pub use field::*;
pub use scheduler::*;
pub use state::*;
