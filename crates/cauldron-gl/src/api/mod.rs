//! The consumed surface of the native graphics API.
//!
//! This module is responsible for:
//! - declaring [`GlApi`], the narrow set of native calls the wrappers issue
//! - mapping that surface onto a real `glow::Context`
//! - providing [`RecordingApi`], a headless implementation whose fabricated
//!   handles and call log make binding behavior checkable in tests

mod glow;
mod recording;

pub use recording::{Call, RecordingApi};

use std::fmt::Debug;
use std::hash::Hash;

/// Buffer binding target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data (`GL_ARRAY_BUFFER`).
    VertexAttributes,
    /// Element indices (`GL_ELEMENT_ARRAY_BUFFER`).
    ElementIndices,
}

/// Buffer usage hint handed to the driver at upload time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    StaticDraw,
    /// Re-uploaded now and then; the wrapper default.
    DynamicDraw,
    /// Re-uploaded nearly every frame.
    StreamDraw,
}

/// Primitive assembly mode for draw calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Texture sampling filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// The narrow surface of the native graphics API that cauldron consumes.
///
/// Object generation, binds, uploads, attribute layout, texture parameters,
/// uniform stores, and draw calls; nothing else. The production
/// implementation wraps a `glow::Context`. [`RecordingApi`] implements the
/// same surface headless so the binding and upload contracts can be verified
/// without a graphics device.
///
/// Allocation calls return `Err` with the driver's reason on exhaustion.
/// Everything else is fire-and-forget, matching the native API.
pub trait GlApi {
    type VertexArrayId: Copy + Eq + Hash + Debug;
    type BufferId: Copy + Eq + Hash + Debug;
    type TextureId: Copy + Eq + Hash + Debug;
    type ProgramId: Copy + Eq + Hash + Debug;
    type ShaderId: Copy + Eq + Hash + Debug;

    // Vertex arrays.
    fn create_vertex_array(&self) -> Result<Self::VertexArrayId, String>;
    fn bind_vertex_array(&self, array: Option<Self::VertexArrayId>);
    fn delete_vertex_array(&self, array: Self::VertexArrayId);

    // Buffers.
    fn create_buffer(&self) -> Result<Self::BufferId, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::BufferId>);
    /// Replaces the entire contents of the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, bytes: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: Self::BufferId);

    // Attribute layout (applies to the bound array + bound buffer).
    fn enable_vertex_attrib_array(&self, location: u32);
    /// Declares `size` consecutive floats per vertex, tightly packed,
    /// starting at offset 0 of the bound buffer.
    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32, normalized: bool);

    // Draw.
    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);

    // Textures.
    fn create_texture(&self) -> Result<Self::TextureId, String>;
    fn bind_texture_2d(&self, texture: Option<Self::TextureId>);
    fn active_texture_unit(&self, unit: u32);
    /// Full-image upload of tightly packed RGB float texels into the bound
    /// 2D texture, using a non-clamping float internal format.
    fn tex_image_2d_rgb32f(&self, width: i32, height: i32, pixels: &[u8]);
    fn set_texture_min_filter(&self, filter: TextureFilter);
    fn set_texture_mag_filter(&self, filter: TextureFilter);
    fn delete_texture(&self, texture: Self::TextureId);

    // Shaders and programs.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::ShaderId, String>;
    fn shader_source(&self, shader: Self::ShaderId, source: &str);
    fn compile_shader(&self, shader: Self::ShaderId);
    fn shader_compile_status(&self, shader: Self::ShaderId) -> bool;
    fn shader_info_log(&self, shader: Self::ShaderId) -> String;
    fn create_program(&self) -> Result<Self::ProgramId, String>;
    fn attach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId);
    fn link_program(&self, program: Self::ProgramId);
    fn program_link_status(&self, program: Self::ProgramId) -> bool;
    fn program_info_log(&self, program: Self::ProgramId) -> String;
    fn detach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId);
    fn delete_shader(&self, shader: Self::ShaderId);
    fn delete_program(&self, program: Self::ProgramId);
    fn use_program(&self, program: Option<Self::ProgramId>);

    // Program introspection. Locations are the integers the shader declared
    // or the linker assigned; sampler uniforms reuse theirs as a texture
    // unit number.
    fn attribute_location(&self, program: Self::ProgramId, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::ProgramId, name: &str) -> Option<u32>;
    fn set_uniform_i32(&self, location: u32, value: i32);
    fn set_uniform_f32(&self, location: u32, value: f32);
    fn set_uniform_vec2(&self, location: u32, value: [f32; 2]);
}
