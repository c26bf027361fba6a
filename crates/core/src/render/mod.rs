//! OpenGL ES 3.0 / WebGL2 warp pass.
//!
//! Only available when the `render` feature is enabled. Provides shader
//! compilation with readable error formatting, R8/RGBA8 texture helpers,
//! a read-back render target, and [`GlWarp`], the GPU implementation of
//! the warp seam.
//!
//! # Module overview
//!
//! - [`shader`] -- Shader compilation, linking, and error formatting.
//! - [`texture`] -- Texture configuration and upload helpers.
//! - [`target`] -- FBO + texture render target with CPU read-back.
//! - [`gl_warp`] -- The GPU `WarpBackend`.

pub mod gl_warp;
pub mod shader;
pub mod target;
pub mod texture;

pub use gl_warp::GlWarp;
pub use shader::{compile_program, format_shader_source, ShaderError};
pub use target::ReadbackTarget;
pub use texture::{create_texture, TextureConfig};
