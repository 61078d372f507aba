//! Headless [`GlApi`] implementation for tests and call-stream inspection.
//!
//! Handles are fabricated integers; every call is appended to an internal
//! log. Allocation and shader failures can be injected so error paths are
//! exercisable without a graphics device.

use std::cell::{Cell, RefCell};

use super::{BufferTarget, BufferUsage, GlApi, PrimitiveMode, ShaderStage, TextureFilter};

/// One recorded native call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData {
        target: BufferTarget,
        bytes: Vec<u8>,
        usage: BufferUsage,
    },
    DeleteBuffer(u32),
    EnableVertexAttribArray(u32),
    VertexAttribPointer {
        location: u32,
        size: i32,
        normalized: bool,
    },
    DrawArrays {
        mode: PrimitiveMode,
        first: i32,
        count: i32,
    },
    CreateTexture(u32),
    BindTexture(Option<u32>),
    ActiveTextureUnit(u32),
    TexImage2dRgb32f {
        width: i32,
        height: i32,
        bytes: Vec<u8>,
    },
    SetTextureMinFilter(TextureFilter),
    SetTextureMagFilter(TextureFilter),
    DeleteTexture(u32),
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    DetachShader { program: u32, shader: u32 },
    DeleteShader(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    SetUniformI32 { location: u32, value: i32 },
    SetUniformF32 { location: u32, value: f32 },
    SetUniformVec2 { location: u32, value: [f32; 2] },
}

/// [`GlApi`] implementation that fabricates handles and records every call.
///
/// Program introspection is scripted: declare the names a fake program
/// exposes with [`define_attribute`] and [`define_uniform`] before looking
/// them up.
///
/// [`define_attribute`]: RecordingApi::define_attribute
/// [`define_uniform`]: RecordingApi::define_uniform
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    fail_next_allocation: Cell<bool>,
    fail_next_compile: Cell<bool>,
    fail_next_link: Cell<bool>,
    attributes: RefCell<Vec<(String, u32)>>,
    uniforms: RefCell<Vec<(String, u32)>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    /// Returns a copy of the recorded calls without draining them.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Makes the next object allocation fail.
    pub fn fail_next_allocation(&self) {
        self.fail_next_allocation.set(true);
    }

    /// Makes the next shader compilation report failure.
    pub fn fail_next_compile(&self) {
        self.fail_next_compile.set(true);
    }

    /// Makes the next program link report failure.
    pub fn fail_next_link(&self) {
        self.fail_next_link.set(true);
    }

    /// Declares an attribute name a fake program resolves.
    pub fn define_attribute(&self, name: &str, location: u32) {
        self.attributes.borrow_mut().push((name.to_string(), location));
    }

    /// Declares a uniform name a fake program resolves.
    pub fn define_uniform(&self, name: &str, location: u32) {
        self.uniforms.borrow_mut().push((name.to_string(), location));
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self, kind: &str) -> Result<u32, String> {
        if self.fail_next_allocation.take() {
            return Err(format!("scripted {kind} allocation failure"));
        }
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        Ok(handle)
    }
}

impl GlApi for RecordingApi {
    type VertexArrayId = u32;
    type BufferId = u32;
    type TextureId = u32;
    type ProgramId = u32;
    type ShaderId = u32;

    fn create_vertex_array(&self) -> Result<u32, String> {
        let handle = self.allocate("vertex array")?;
        self.record(Call::CreateVertexArray(handle));
        Ok(handle)
    }

    fn bind_vertex_array(&self, array: Option<u32>) {
        self.record(Call::BindVertexArray(array));
    }

    fn delete_vertex_array(&self, array: u32) {
        self.record(Call::DeleteVertexArray(array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let handle = self.allocate("buffer")?;
        self.record(Call::CreateBuffer(handle));
        Ok(handle)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, bytes: &[u8], usage: BufferUsage) {
        self.record(Call::BufferData {
            target,
            bytes: bytes.to_vec(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableVertexAttribArray(location));
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32, normalized: bool) {
        self.record(Call::VertexAttribPointer {
            location,
            size,
            normalized,
        });
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }

    fn create_texture(&self) -> Result<u32, String> {
        let handle = self.allocate("texture")?;
        self.record(Call::CreateTexture(handle));
        Ok(handle)
    }

    fn bind_texture_2d(&self, texture: Option<u32>) {
        self.record(Call::BindTexture(texture));
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(Call::ActiveTextureUnit(unit));
    }

    fn tex_image_2d_rgb32f(&self, width: i32, height: i32, pixels: &[u8]) {
        self.record(Call::TexImage2dRgb32f {
            width,
            height,
            bytes: pixels.to_vec(),
        });
    }

    fn set_texture_min_filter(&self, filter: TextureFilter) {
        self.record(Call::SetTextureMinFilter(filter));
    }

    fn set_texture_mag_filter(&self, filter: TextureFilter) {
        self.record(Call::SetTextureMagFilter(filter));
    }

    fn delete_texture(&self, texture: u32) {
        self.record(Call::DeleteTexture(texture));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let handle = self.allocate("shader")?;
        self.record(Call::CreateShader(stage, handle));
        Ok(handle)
    }

    fn shader_source(&self, _shader: u32, _source: &str) {}

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, _shader: u32) -> bool {
        !self.fail_next_compile.take()
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "scripted compile failure".to_string()
    }

    fn create_program(&self) -> Result<u32, String> {
        let handle = self.allocate("program")?;
        self.record(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader { program, shader });
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        !self.fail_next_link.take()
    }

    fn program_info_log(&self, _program: u32) -> String {
        "scripted link failure".to_string()
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader { program, shader });
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn attribute_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniforms
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    fn set_uniform_i32(&self, location: u32, value: i32) {
        self.record(Call::SetUniformI32 { location, value });
    }

    fn set_uniform_f32(&self, location: u32, value: f32) {
        self.record(Call::SetUniformF32 { location, value });
    }

    fn set_uniform_vec2(&self, location: u32, value: [f32; 2]) {
        self.record(Call::SetUniformVec2 { location, value });
    }
}
