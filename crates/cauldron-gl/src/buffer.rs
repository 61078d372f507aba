//! Vertex buffer wrapper and its upload path.

use crate::api::{BufferTarget, BufferUsage, GlApi};
use crate::context::Context;
use crate::data::{FlatVertexData, Scalar, VertexData};
use crate::error::{Error, Result};
use crate::shader::AttributeLocation;

/// Initialization parameters for a buffer attached to a vertex array.
///
/// Keep this structure stable and minimal; the defaults match the common
/// case of mutable per-vertex attribute data.
#[derive(Debug, Clone)]
pub struct BufferInit<S: Scalar = f32> {
    /// Binding target the buffer uploads through.
    pub target: BufferTarget,
    /// Usage hint handed to the driver.
    pub usage: BufferUsage,
    /// Data to upload immediately on attachment.
    pub data: Option<VertexData<S>>,
}

impl<S: Scalar> Default for BufferInit<S> {
    fn default() -> Self {
        Self {
            target: BufferTarget::VertexAttributes,
            usage: BufferUsage::DynamicDraw,
            data: None,
        }
    }
}

impl BufferInit<f32> {
    /// An empty attribute buffer with default target and usage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Scalar> BufferInit<S> {
    /// Default target and usage with initial data.
    pub fn with_data(data: impl Into<VertexData<S>>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }
}

/// Per-vertex attribute buffer owned by a [`VertexArray`].
///
/// Element width and count are re-inferred on every upload. A connection
/// made with [`connect_to_shader`] declares the current width to the shader;
/// it stays valid across same-shape re-uploads and must be re-established
/// after an upload that changes the width.
///
/// [`VertexArray`]: crate::VertexArray
/// [`connect_to_shader`]: VertexBuffer::connect_to_shader
pub struct VertexBuffer<G: GlApi> {
    raw: G::BufferId,
    /// The owning array's handle; connecting an attribute needs the owner
    /// bound first, this buffer second.
    owner: G::VertexArrayId,
    target: BufferTarget,
    usage: BufferUsage,
    element_width: usize,
    element_count: usize,
    connected: Vec<u32>,
    freed: bool,
}

impl<G: GlApi> VertexBuffer<G> {
    /// Allocates a buffer scoped to `owner`. Initial data is validated
    /// before the native handle is allocated, so a shape error leaks
    /// nothing.
    pub(crate) fn new<S: Scalar>(
        ctx: &Context<G>,
        owner: G::VertexArrayId,
        init: BufferInit<S>,
    ) -> Result<Self> {
        let flat = init.data.map(VertexData::flatten).transpose()?;
        let raw = ctx
            .api()
            .create_buffer()
            .map_err(|reason| Error::ResourceAllocation {
                kind: "buffer",
                reason,
            })?;
        log::debug!("created buffer {raw:?} for vertex array {owner:?}");

        let mut buffer = Self {
            raw,
            owner,
            target: init.target,
            usage: init.usage,
            element_width: 0,
            element_count: 0,
            connected: Vec::new(),
            freed: false,
        };
        if let Some(flat) = flat {
            buffer.upload(ctx, flat, init.target, init.usage)?;
        }
        Ok(buffer)
    }

    /// Replaces the entire buffer contents, re-inferring element width and
    /// count from the input shape.
    pub fn set_data<S: Scalar>(
        &mut self,
        ctx: &Context<G>,
        data: impl Into<VertexData<S>>,
    ) -> Result<()> {
        self.set_data_with(ctx, data, None, None)
    }

    /// [`set_data`] with per-call target/usage overrides. The overrides
    /// apply to this upload only; the buffer's defaults are unchanged.
    ///
    /// [`set_data`]: VertexBuffer::set_data
    pub fn set_data_with<S: Scalar>(
        &mut self,
        ctx: &Context<G>,
        data: impl Into<VertexData<S>>,
        target: Option<BufferTarget>,
        usage: Option<BufferUsage>,
    ) -> Result<()> {
        self.ensure_live()?;
        let flat = data.into().flatten()?;
        self.upload(
            ctx,
            flat,
            target.unwrap_or(self.target),
            usage.unwrap_or(self.usage),
        )
    }

    fn upload(
        &mut self,
        ctx: &Context<G>,
        flat: FlatVertexData,
        target: BufferTarget,
        usage: BufferUsage,
    ) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(flat.floats());
        {
            let _bound = ctx.bind_buffer(target, self.raw)?;
            ctx.api().buffer_data(target, bytes, usage);
        }

        if self.element_width != 0
            && self.element_width != flat.element_width()
            && !self.connected.is_empty()
        {
            log::warn!(
                "buffer {:?}: element width changed from {} to {}; attribute connections at {:?} must be re-established",
                self.raw,
                self.element_width,
                flat.element_width(),
                self.connected,
            );
            self.connected.clear();
        }
        self.element_width = flat.element_width();
        self.element_count = flat.element_count();
        Ok(())
    }

    /// Enables `location` and declares this buffer's layout to the shader:
    /// `element_width` consecutive floats per vertex, tightly packed,
    /// starting at offset 0.
    ///
    /// The owning array is bound first and this buffer second, and both
    /// bindings are released before returning.
    pub fn connect_to_shader(
        &mut self,
        ctx: &Context<G>,
        location: AttributeLocation,
        normalized: bool,
    ) -> Result<()> {
        self.ensure_live()?;
        if self.element_width == 0 {
            return Err(Error::EmptyData {
                what: "vertex buffer",
            });
        }

        let _array = ctx.bind_vertex_array(self.owner)?;
        let _buffer = ctx.bind_buffer(self.target, self.raw)?;
        ctx.api().enable_vertex_attrib_array(location.index());
        ctx.api()
            .vertex_attrib_pointer_f32(location.index(), self.element_width as i32, normalized);
        if !self.connected.contains(&location.index()) {
            self.connected.push(location.index());
        }
        Ok(())
    }

    /// Floats per vertex of the last upload; 0 before any data is set.
    #[inline]
    pub fn element_width(&self) -> usize {
        self.element_width
    }

    /// Vertices in the last upload; 0 before any data is set.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[inline]
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Attribute locations connected against the current element width.
    #[inline]
    pub fn connected_attributes(&self) -> &[u32] {
        &self.connected
    }

    pub(crate) fn release(&mut self, ctx: &Context<G>) {
        if !self.freed {
            ctx.api().delete_buffer(self.raw);
            self.freed = true;
            log::debug!("freed buffer {:?}", self.raw);
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.freed {
            Err(Error::UseAfterFree {
                kind: "vertex buffer",
            })
        } else {
            Ok(())
        }
    }
}
