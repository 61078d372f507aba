//! Shader program wrapper: compile, link, and named input lookup.
//!
//! The crate ships no shader text; callers supply vertex and fragment
//! sources and get back the typed locations the other wrappers consume.

use crate::api::{GlApi, ShaderStage};
use crate::context::Context;
use crate::error::{Error, Result};

/// Location of a per-vertex input slot in a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeLocation(u32);

impl AttributeLocation {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl From<u32> for AttributeLocation {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Location of a uniform in a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(u32);

impl UniformLocation {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl From<u32> for UniformLocation {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// A sampler uniform. Its location doubles as the number of the texture
/// unit that serves it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SamplerUniform {
    location: UniformLocation,
}

impl SamplerUniform {
    #[inline]
    pub const fn new(location: UniformLocation) -> Self {
        Self { location }
    }

    #[inline]
    pub fn location(self) -> UniformLocation {
        self.location
    }

    /// The texture unit this sampler is served by.
    #[inline]
    pub fn unit(self) -> u32 {
        self.location.index()
    }
}

/// A linked shader program.
///
/// Uniform stores apply to the program currently in use, so the setters and
/// texture connection require [`bind`] to have been called first.
///
/// [`bind`]: ShaderProgram::bind
#[derive(Debug)]
pub struct ShaderProgram<G: GlApi> {
    raw: G::ProgramId,
    freed: bool,
}

impl<G: GlApi> ShaderProgram<G> {
    /// Compiles both stages from source and links them. Stage objects are
    /// detached and deleted once the program is linked; on failure the
    /// driver's info log is carried in the error.
    pub fn from_sources(
        ctx: &Context<G>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let api = ctx.api();
        let program = api
            .create_program()
            .map_err(|reason| Error::ResourceAllocation {
                kind: "shader program",
                reason,
            })?;

        let stages = [
            (ShaderStage::Vertex, vertex_source),
            (ShaderStage::Fragment, fragment_source),
        ];
        let mut attached: Vec<G::ShaderId> = Vec::with_capacity(stages.len());
        for (stage, source) in stages {
            let shader = match api.create_shader(stage) {
                Ok(shader) => shader,
                Err(reason) => {
                    discard(api, program, &attached);
                    return Err(Error::ResourceAllocation {
                        kind: "shader stage",
                        reason,
                    });
                }
            };
            api.shader_source(shader, source);
            api.compile_shader(shader);
            if !api.shader_compile_status(shader) {
                let log = api.shader_info_log(shader);
                api.delete_shader(shader);
                discard(api, program, &attached);
                return Err(Error::ShaderCompile {
                    stage: stage.name(),
                    log,
                });
            }
            api.attach_shader(program, shader);
            attached.push(shader);
        }

        api.link_program(program);
        let linked = api.program_link_status(program);
        for &shader in &attached {
            api.detach_shader(program, shader);
            api.delete_shader(shader);
        }
        if !linked {
            let log = api.program_info_log(program);
            api.delete_program(program);
            return Err(Error::ShaderLink { log });
        }

        log::debug!("linked shader program {program:?}");
        Ok(Self {
            raw: program,
            freed: false,
        })
    }

    /// Makes this the program in use.
    pub fn bind(&self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        ctx.set_active_program(Some(self.raw));
        Ok(())
    }

    /// Releases the "in use" status. Refused if a different program (or
    /// none) is in use.
    pub fn unbind(&self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        if ctx.active_program() != Some(self.raw) {
            return Err(Error::ProgramNotActive);
        }
        ctx.set_active_program(None);
        Ok(())
    }

    /// Resolves a named per-vertex attribute.
    pub fn attribute_location(&self, ctx: &Context<G>, name: &str) -> Result<AttributeLocation> {
        self.ensure_live()?;
        ctx.api()
            .attribute_location(self.raw, name)
            .map(AttributeLocation::new)
            .ok_or_else(|| Error::UnknownShaderInput {
                name: name.to_string(),
            })
    }

    /// Resolves a named uniform.
    pub fn uniform_location(&self, ctx: &Context<G>, name: &str) -> Result<UniformLocation> {
        self.ensure_live()?;
        ctx.api()
            .uniform_location(self.raw, name)
            .map(UniformLocation::new)
            .ok_or_else(|| Error::UnknownShaderInput {
                name: name.to_string(),
            })
    }

    /// Resolves a named sampler uniform for texture connection.
    pub fn sampler_uniform(&self, ctx: &Context<G>, name: &str) -> Result<SamplerUniform> {
        Ok(SamplerUniform::new(self.uniform_location(ctx, name)?))
    }

    pub fn set_i32(&self, ctx: &Context<G>, location: UniformLocation, value: i32) -> Result<()> {
        self.ensure_in_use(ctx)?;
        ctx.api().set_uniform_i32(location.index(), value);
        Ok(())
    }

    pub fn set_f32(&self, ctx: &Context<G>, location: UniformLocation, value: f32) -> Result<()> {
        self.ensure_in_use(ctx)?;
        ctx.api().set_uniform_f32(location.index(), value);
        Ok(())
    }

    pub fn set_vec2(
        &self,
        ctx: &Context<G>,
        location: UniformLocation,
        value: [f32; 2],
    ) -> Result<()> {
        self.ensure_in_use(ctx)?;
        ctx.api().set_uniform_vec2(location.index(), value);
        Ok(())
    }

    /// Releases the native handle. Refused while this program is in use;
    /// afterwards every operation fails with a use-after-free error.
    pub fn free(&mut self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        if ctx.active_program() == Some(self.raw) {
            return Err(Error::StillConnected {
                kind: "shader program",
            });
        }
        ctx.api().delete_program(self.raw);
        self.freed = true;
        log::debug!("freed shader program {:?}", self.raw);
        Ok(())
    }

    fn ensure_in_use(&self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        if ctx.active_program() != Some(self.raw) {
            return Err(Error::ProgramNotActive);
        }
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.freed {
            Err(Error::UseAfterFree {
                kind: "shader program",
            })
        } else {
            Ok(())
        }
    }
}

fn discard<G: GlApi>(api: &G, program: G::ProgramId, attached: &[G::ShaderId]) {
    for &shader in attached {
        api.detach_shader(program, shader);
        api.delete_shader(shader);
    }
    api.delete_program(program);
}
