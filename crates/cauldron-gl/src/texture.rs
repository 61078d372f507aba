//! 2D texture wrapper for float RGB image data.

use crate::api::{GlApi, TextureFilter};
use crate::context::Context;
use crate::data::{ImageData, Scalar};
use crate::error::{Error, Result};
use crate::shader::SamplerUniform;

/// A 2D texture of float RGB texels.
///
/// Uploads use a non-clamping float internal format, so channel values
/// outside [0, 1] survive and the shader can apply contrast or brightness
/// adjustments. Minification samples linearly, magnification picks the
/// nearest texel; no mipmaps are generated.
///
/// # Unit liveness
///
/// A connection made with [`connect_to_shader`] claims the texture unit
/// matching the sampler's uniform location and stays live until
/// [`disconnect`] or [`free`]. Nothing persists implicitly: a draw that
/// samples this texture must be preceded by its `connect_to_shader`, and
/// the set of live units is always available from
/// [`Context::bound_texture_units`].
///
/// [`connect_to_shader`]: Texture::connect_to_shader
/// [`disconnect`]: Texture::disconnect
/// [`free`]: Texture::free
pub struct Texture<G: GlApi> {
    raw: G::TextureId,
    width: usize,
    height: usize,
    freed: bool,
}

impl<G: GlApi> Texture<G> {
    pub fn new(ctx: &Context<G>) -> Result<Self> {
        let raw = ctx
            .api()
            .create_texture()
            .map_err(|reason| Error::ResourceAllocation {
                kind: "texture",
                reason,
            })?;
        log::debug!("created texture {raw:?}");
        Ok(Self {
            raw,
            width: 0,
            height: 0,
            freed: false,
        })
    }

    /// Creates a texture and uploads `data` immediately.
    pub fn with_data<S: Scalar>(ctx: &Context<G>, data: impl Into<ImageData<S>>) -> Result<Self> {
        let mut texture = Self::new(ctx)?;
        texture.set_data(ctx, data)?;
        Ok(texture)
    }

    /// Replaces the entire image. May be called arbitrarily often, e.g.
    /// once per frame for animated content.
    ///
    /// The upload runs inside a scoped bind on the currently active unit;
    /// the unit's previous live binding is restored afterwards.
    pub fn set_data<S: Scalar>(
        &mut self,
        ctx: &Context<G>,
        data: impl Into<ImageData<S>>,
    ) -> Result<()> {
        self.ensure_live()?;
        let pixels = data.into().flatten()?;
        let bytes: &[u8] = bytemuck::cast_slice(pixels.floats());
        {
            let _bound = ctx.bind_texture_for_upload(self.raw)?;
            ctx.api()
                .tex_image_2d_rgb32f(pixels.width() as i32, pixels.height() as i32, bytes);
            ctx.api().set_texture_min_filter(TextureFilter::Linear);
            ctx.api().set_texture_mag_filter(TextureFilter::Nearest);
        }
        self.width = pixels.width();
        self.height = pixels.height();
        Ok(())
    }

    /// Texels per row of the last upload; 0 before any data is set.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows of the last upload; 0 before any data is set.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Binds this texture to the unit derived from the sampler's uniform
    /// location and points the sampler at that unit.
    ///
    /// A shader program must be in use; the uniform store goes to it.
    pub fn connect_to_shader(&mut self, ctx: &Context<G>, sampler: SamplerUniform) -> Result<()> {
        self.ensure_live()?;
        if ctx.active_program().is_none() {
            return Err(Error::ProgramNotActive);
        }
        let unit = sampler.unit();
        ctx.connect_texture_unit(unit, self.raw);
        ctx.api().set_uniform_i32(sampler.location().index(), unit as i32);
        Ok(())
    }

    /// Re-activates this texture's assigned unit and binds the null
    /// texture, so no later draw samples a stale binding from it. Only this
    /// texture's unit is touched.
    pub fn disconnect(&mut self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        let unit = ctx
            .unit_of_texture(self.raw)
            .ok_or(Error::NotConnected { kind: "texture" })?;
        ctx.disconnect_texture_unit(unit);
        Ok(())
    }

    /// Releases the native handle. Refused while the texture is still
    /// connected to a unit; afterwards every operation fails with a
    /// use-after-free error.
    pub fn free(&mut self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        if ctx.unit_of_texture(self.raw).is_some() {
            return Err(Error::StillConnected { kind: "texture" });
        }
        ctx.api().delete_texture(self.raw);
        self.freed = true;
        log::debug!("freed texture {:?}", self.raw);
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.freed {
            Err(Error::UseAfterFree { kind: "texture" })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{Call, RecordingApi, TextureFilter};
    use crate::context::Context;
    use crate::data::ImageData;
    use crate::error::Error;
    use crate::shader::{SamplerUniform, UniformLocation};

    use super::Texture;

    fn ctx() -> Context<RecordingApi> {
        Context::new(RecordingApi::new())
    }

    fn checker() -> Vec<Vec<[f32; 3]>> {
        vec![
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.5, 0.5, 0.0], [1.0, 1.0, 0.0]],
        ]
    }

    fn sampler(location: u32) -> SamplerUniform {
        SamplerUniform::new(UniformLocation::new(location))
    }

    // ── uploads ───────────────────────────────────────────────────────────

    #[test]
    fn upload_reports_dimensions() {
        let gl = ctx();
        let texture = Texture::with_data(&gl, checker()).unwrap();
        assert_eq!(texture.width(), 2);
        assert_eq!(texture.height(), 2);
    }

    #[test]
    fn reupload_updates_dimensions() {
        let gl = ctx();
        let mut texture = Texture::with_data(&gl, checker()).unwrap();
        texture
            .set_data(
                &gl,
                ImageData::Grid {
                    channels: vec![0.5f32; 20 * 20 * 3],
                    width: 20,
                    height: 20,
                },
            )
            .unwrap();
        assert_eq!(texture.width(), 20);
        assert_eq!(texture.height(), 20);
    }

    #[test]
    fn upload_sets_format_and_filters_inside_a_scope() {
        let gl = ctx();
        let _texture = Texture::with_data(&gl, checker()).unwrap();
        let calls = gl.api().take_calls();
        assert!(matches!(calls[0], Call::CreateTexture(_)));
        assert!(matches!(calls[1], Call::BindTexture(Some(_))));
        assert!(matches!(
            calls[2],
            Call::TexImage2dRgb32f {
                width: 2,
                height: 2,
                ..
            }
        ));
        assert_eq!(calls[3], Call::SetTextureMinFilter(TextureFilter::Linear));
        assert_eq!(calls[4], Call::SetTextureMagFilter(TextureFilter::Nearest));
        assert_eq!(calls[5], Call::BindTexture(None));
    }

    #[test]
    fn ragged_image_fails_before_touching_the_device() {
        let gl = ctx();
        let mut texture = Texture::new(&gl).unwrap();
        gl.api().take_calls();

        let err = texture
            .set_data(
                &gl,
                ImageData::Rows(vec![
                    vec![[0.0f32, 0.0, 0.0], [0.0, 0.0, 0.0]],
                    vec![[0.0, 0.0, 0.0]],
                ]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::RaggedData { row: 1, .. }));
        assert!(gl.api().take_calls().is_empty());
    }

    // ── shader connection ─────────────────────────────────────────────────

    #[test]
    fn connect_claims_the_samplers_unit() {
        let gl = ctx();
        let mut texture = Texture::with_data(&gl, checker()).unwrap();
        gl.set_active_program(Some(9));
        gl.api().take_calls();

        texture.connect_to_shader(&gl, sampler(1)).unwrap();
        let calls = gl.api().take_calls();
        assert_eq!(calls[0], Call::ActiveTextureUnit(1));
        assert!(matches!(calls[1], Call::BindTexture(Some(_))));
        assert_eq!(
            calls[2],
            Call::SetUniformI32 {
                location: 1,
                value: 1,
            }
        );
        assert_eq!(gl.bound_texture_units(), vec![1]);
    }

    #[test]
    fn connect_requires_a_program_in_use() {
        let gl = ctx();
        let mut texture = Texture::with_data(&gl, checker()).unwrap();
        assert_eq!(
            texture.connect_to_shader(&gl, sampler(0)).unwrap_err(),
            Error::ProgramNotActive
        );
    }

    #[test]
    fn disconnect_clears_only_this_textures_unit() {
        let gl = ctx();
        gl.set_active_program(Some(9));
        let mut first = Texture::with_data(&gl, checker()).unwrap();
        let mut second = Texture::with_data(&gl, checker()).unwrap();
        first.connect_to_shader(&gl, sampler(0)).unwrap();
        second.connect_to_shader(&gl, sampler(1)).unwrap();
        assert_eq!(gl.bound_texture_units(), vec![0, 1]);

        first.disconnect(&gl).unwrap();
        assert_eq!(gl.bound_texture_units(), vec![1]);

        assert_eq!(
            first.disconnect(&gl).unwrap_err(),
            Error::NotConnected { kind: "texture" }
        );
    }

    #[test]
    fn reupload_while_another_texture_is_connected_preserves_it() {
        let gl = ctx();
        gl.set_active_program(Some(9));
        let mut shown = Texture::with_data(&gl, checker()).unwrap();
        let mut animated = Texture::with_data(&gl, checker()).unwrap();
        shown.connect_to_shader(&gl, sampler(0)).unwrap();

        // Per-frame reload of the other texture, as animated content does.
        animated
            .set_data(
                &gl,
                ImageData::Grid {
                    channels: vec![0.1f32; 4 * 4 * 3],
                    width: 4,
                    height: 4,
                },
            )
            .unwrap();
        assert_eq!(gl.bound_texture_units(), vec![0]);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn free_refuses_while_connected() {
        let gl = ctx();
        gl.set_active_program(Some(9));
        let mut texture = Texture::with_data(&gl, checker()).unwrap();
        texture.connect_to_shader(&gl, sampler(0)).unwrap();

        assert_eq!(
            texture.free(&gl).unwrap_err(),
            Error::StillConnected { kind: "texture" }
        );

        texture.disconnect(&gl).unwrap();
        texture.free(&gl).unwrap();
        assert_eq!(
            texture.set_data(&gl, checker()).unwrap_err(),
            Error::UseAfterFree { kind: "texture" }
        );
    }
}
