//! Vertex array wrapper: one drawable shape and its attribute buffers.

use crate::api::{GlApi, PrimitiveMode};
use crate::buffer::{BufferInit, VertexBuffer};
use crate::context::Context;
use crate::data::Scalar;
use crate::error::{Error, Result};

/// Stable index of a buffer attached to a [`VertexArray`].
///
/// Slots are handed out by [`create_buffer`] in attachment order and are
/// only meaningful for the array that returned them.
///
/// [`create_buffer`]: VertexArray::create_buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferSlot(usize);

/// Groups a set of attribute buffers and their layout for one drawable
/// shape.
///
/// The array owns its buffers; a buffer belongs to exactly one array for
/// its whole life. Draw calls without an explicit count take the vertex
/// count of the first attached buffer.
pub struct VertexArray<G: GlApi> {
    raw: G::VertexArrayId,
    buffers: Vec<VertexBuffer<G>>,
    freed: bool,
}

impl<G: GlApi> VertexArray<G> {
    pub fn new(ctx: &Context<G>) -> Result<Self> {
        let raw = ctx
            .api()
            .create_vertex_array()
            .map_err(|reason| Error::ResourceAllocation {
                kind: "vertex array",
                reason,
            })?;
        log::debug!("created vertex array {raw:?}");
        Ok(Self {
            raw,
            buffers: Vec::new(),
            freed: false,
        })
    }

    /// Attaches a new buffer while this array is the active binding and
    /// returns its slot. Initial data in `init` is uploaded immediately.
    pub fn create_buffer<S: Scalar>(
        &mut self,
        ctx: &Context<G>,
        init: BufferInit<S>,
    ) -> Result<BufferSlot> {
        self.ensure_live()?;
        let buffer = {
            let _bound = ctx.bind_vertex_array(self.raw)?;
            VertexBuffer::new(ctx, self.raw, init)?
        };
        self.buffers.push(buffer);
        Ok(BufferSlot(self.buffers.len() - 1))
    }

    /// # Panics
    /// Panics if `slot` did not come from this array.
    #[inline]
    pub fn buffer(&self, slot: BufferSlot) -> &VertexBuffer<G> {
        &self.buffers[slot.0]
    }

    /// # Panics
    /// Panics if `slot` did not come from this array.
    #[inline]
    pub fn buffer_mut(&mut self, slot: BufferSlot) -> &mut VertexBuffer<G> {
        &mut self.buffers[slot.0]
    }

    /// Attached buffers in attachment order.
    #[inline]
    pub fn buffers(&self) -> &[VertexBuffer<G>] {
        &self.buffers
    }

    /// Draws the full range: vertex 0 through the element count of the
    /// first attached buffer.
    pub fn draw(&self, ctx: &Context<G>, mode: PrimitiveMode) -> Result<()> {
        self.ensure_live()?;
        let count = self
            .buffers
            .first()
            .ok_or(Error::NoAttachedBuffers)?
            .element_count();
        self.draw_range(ctx, mode, 0, count as i32)
    }

    /// Draws `count` vertices starting at `first`, while this array is the
    /// active binding.
    pub fn draw_range(
        &self,
        ctx: &Context<G>,
        mode: PrimitiveMode,
        first: i32,
        count: i32,
    ) -> Result<()> {
        self.ensure_live()?;
        let _bound = ctx.bind_vertex_array(self.raw)?;
        ctx.api().draw_arrays(mode, first, count);
        Ok(())
    }

    /// Releases this array's native handle and every attached buffer's.
    /// All later operations fail with a use-after-free error.
    pub fn free(&mut self, ctx: &Context<G>) -> Result<()> {
        self.ensure_live()?;
        for buffer in &mut self.buffers {
            buffer.release(ctx);
        }
        ctx.api().delete_vertex_array(self.raw);
        self.freed = true;
        log::debug!("freed vertex array {:?}", self.raw);
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.freed {
            Err(Error::UseAfterFree {
                kind: "vertex array",
            })
        } else {
            Ok(())
        }
    }
}
