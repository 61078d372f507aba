//! [`GlApi`] implemented over a real `glow::Context`.
//!
//! Every raw (unsafe) graphics call in the crate lives here. The caller must
//! hold a current OpenGL context on the calling thread, which is the same
//! contract `glow` itself imposes.

use glow::HasContext;

use super::{BufferTarget, BufferUsage, GlApi, PrimitiveMode, ShaderStage, TextureFilter};

fn target_to_gl(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::VertexAttributes => glow::ARRAY_BUFFER,
        BufferTarget::ElementIndices => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

fn mode_to_gl(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Points => glow::POINTS,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::LineLoop => glow::LINE_LOOP,
        PrimitiveMode::LineStrip => glow::LINE_STRIP,
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn filter_to_gl(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Linear => glow::LINEAR as i32,
        TextureFilter::Nearest => glow::NEAREST as i32,
    }
}

fn stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl GlApi for glow::Context {
    type VertexArrayId = <glow::Context as HasContext>::VertexArray;
    type BufferId = <glow::Context as HasContext>::Buffer;
    type TextureId = <glow::Context as HasContext>::Texture;
    type ProgramId = <glow::Context as HasContext>::Program;
    type ShaderId = <glow::Context as HasContext>::Shader;

    fn create_vertex_array(&self) -> Result<Self::VertexArrayId, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, array: Option<Self::VertexArrayId>) {
        unsafe { HasContext::bind_vertex_array(self, array) }
    }

    fn delete_vertex_array(&self, array: Self::VertexArrayId) {
        unsafe { HasContext::delete_vertex_array(self, array) }
    }

    fn create_buffer(&self) -> Result<Self::BufferId, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::BufferId>) {
        unsafe { HasContext::bind_buffer(self, target_to_gl(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, bytes: &[u8], usage: BufferUsage) {
        unsafe {
            HasContext::buffer_data_u8_slice(self, target_to_gl(target), bytes, usage_to_gl(usage))
        }
    }

    fn delete_buffer(&self, buffer: Self::BufferId) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, location) }
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32, normalized: bool) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(self, location, size, glow::FLOAT, normalized, 0, 0)
        }
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode_to_gl(mode), first, count) }
    }

    fn create_texture(&self) -> Result<Self::TextureId, String> {
        unsafe { HasContext::create_texture(self) }
    }

    fn bind_texture_2d(&self, texture: Option<Self::TextureId>) {
        unsafe { HasContext::bind_texture(self, glow::TEXTURE_2D, texture) }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn tex_image_2d_rgb32f(&self, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                glow::TEXTURE_2D,
                0,
                glow::RGB32F as i32,
                width,
                height,
                0,
                glow::RGB,
                glow::FLOAT,
                Some(pixels),
            )
        }
    }

    fn set_texture_min_filter(&self, filter: TextureFilter) {
        unsafe {
            HasContext::tex_parameter_i32(
                self,
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter_to_gl(filter),
            )
        }
    }

    fn set_texture_mag_filter(&self, filter: TextureFilter) {
        unsafe {
            HasContext::tex_parameter_i32(
                self,
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter_to_gl(filter),
            )
        }
    }

    fn delete_texture(&self, texture: Self::TextureId) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::ShaderId, String> {
        unsafe { HasContext::create_shader(self, stage_to_gl(stage)) }
    }

    fn shader_source(&self, shader: Self::ShaderId, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::ShaderId) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::ShaderId) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::ShaderId) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn create_program(&self) -> Result<Self::ProgramId, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::ProgramId) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::ProgramId) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::ProgramId) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn detach_shader(&self, program: Self::ProgramId, shader: Self::ShaderId) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn delete_shader(&self, shader: Self::ShaderId) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn delete_program(&self, program: Self::ProgramId) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::ProgramId>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn attribute_location(&self, program: Self::ProgramId, name: &str) -> Option<u32> {
        unsafe { HasContext::get_attrib_location(self, program, name) }
    }

    fn uniform_location(&self, program: Self::ProgramId, name: &str) -> Option<u32> {
        unsafe { HasContext::get_uniform_location(self, program, name).map(|loc| loc.0) }
    }

    fn set_uniform_i32(&self, location: u32, value: i32) {
        unsafe {
            HasContext::uniform_1_i32(self, Some(&glow::NativeUniformLocation(location)), value)
        }
    }

    fn set_uniform_f32(&self, location: u32, value: f32) {
        unsafe {
            HasContext::uniform_1_f32(self, Some(&glow::NativeUniformLocation(location)), value)
        }
    }

    fn set_uniform_vec2(&self, location: u32, value: [f32; 2]) {
        unsafe {
            HasContext::uniform_2_f32(
                self,
                Some(&glow::NativeUniformLocation(location)),
                value[0],
                value[1],
            )
        }
    }
}
