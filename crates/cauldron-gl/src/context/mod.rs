//! Explicit tracking of the native API's implicit current-binding state.
//!
//! This module is responsible for:
//! - owning the [`GlApi`] value every wrapper operates through
//! - mirroring the "currently active object" state the native API keeps
//!   globally (bound vertex array, bound buffer, active texture unit, live
//!   unit bindings, program in use)
//! - handing out RAII guards that pair every scoped bind with an unbind on
//!   all exit paths, and refusing a second simultaneous binding of the same
//!   kind
//!
//! The mirror makes activation-order invariants checkable in tests against
//! [`RecordingApi`](crate::api::RecordingApi) instead of only at runtime
//! against a real device.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::api::{BufferTarget, GlApi};
use crate::error::{Error, Result};

struct Bindings<G: GlApi> {
    vertex_array: Option<G::VertexArrayId>,
    buffer: Option<G::BufferId>,
    scoped_texture: Option<G::TextureId>,
    /// Unit selected by the most recent active-unit call. Unit 0 is the
    /// native default.
    active_unit: u32,
    /// Units that currently hold a live (connected) texture.
    texture_units: HashMap<u32, G::TextureId>,
    program: Option<G::ProgramId>,
}

/// Owns the native API and the explicit current-binding state.
///
/// All wrapper operations take `&Context`; nothing in this crate is global.
/// The interior mutability keeps the tracker in step with the calls issued
/// to the native API, and also makes the type `!Sync`, matching the
/// single-threaded ownership model of the underlying context.
pub struct Context<G: GlApi> {
    api: G,
    bindings: RefCell<Bindings<G>>,
}

impl<G: GlApi> Context<G> {
    pub fn new(api: G) -> Self {
        Self {
            api,
            bindings: RefCell::new(Bindings {
                vertex_array: None,
                buffer: None,
                scoped_texture: None,
                active_unit: 0,
                texture_units: HashMap::new(),
                program: None,
            }),
        }
    }

    #[inline]
    pub fn api(&self) -> &G {
        &self.api
    }

    /// Consumes the context and returns the native API value.
    pub fn into_api(self) -> G {
        self.api
    }

    /// The vertex array currently inside a bind scope, if any.
    pub fn active_vertex_array(&self) -> Option<G::VertexArrayId> {
        self.bindings.borrow().vertex_array
    }

    /// The buffer currently inside a bind scope, if any.
    pub fn active_buffer(&self) -> Option<G::BufferId> {
        self.bindings.borrow().buffer
    }

    /// The texture unit most recently activated.
    pub fn active_texture_unit(&self) -> u32 {
        self.bindings.borrow().active_unit
    }

    /// Units that currently hold a live texture connection, ascending.
    ///
    /// This is the authoritative answer to "which units are live after this
    /// draw": a unit appears here from `connect_to_shader` until the
    /// texture's `disconnect` or `free`; nothing persists implicitly.
    pub fn bound_texture_units(&self) -> Vec<u32> {
        let mut units: Vec<u32> = self.bindings.borrow().texture_units.keys().copied().collect();
        units.sort_unstable();
        units
    }

    /// The program currently in use, if any.
    pub fn active_program(&self) -> Option<G::ProgramId> {
        self.bindings.borrow().program
    }

    pub(crate) fn bind_vertex_array(&self, array: G::VertexArrayId) -> Result<VertexArrayScope<'_, G>> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if bindings.vertex_array.is_some() {
                return Err(Error::BindingClash {
                    kind: "vertex array",
                });
            }
            bindings.vertex_array = Some(array);
        }
        self.api.bind_vertex_array(Some(array));
        Ok(VertexArrayScope { ctx: self })
    }

    pub(crate) fn bind_buffer(
        &self,
        target: BufferTarget,
        buffer: G::BufferId,
    ) -> Result<BufferScope<'_, G>> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if bindings.buffer.is_some() {
                return Err(Error::BindingClash { kind: "buffer" });
            }
            bindings.buffer = Some(buffer);
        }
        self.api.bind_buffer(target, Some(buffer));
        Ok(BufferScope { ctx: self, target })
    }

    /// Scoped 2D-texture bind on the currently active unit, for uploads.
    ///
    /// On exit the unit's previous live binding is restored (not nulled), so
    /// re-uploading one texture cannot sever another texture's connection on
    /// the same unit.
    pub(crate) fn bind_texture_for_upload(
        &self,
        texture: G::TextureId,
    ) -> Result<TextureScope<'_, G>> {
        let previous = {
            let mut bindings = self.bindings.borrow_mut();
            if bindings.scoped_texture.is_some() {
                return Err(Error::BindingClash { kind: "texture" });
            }
            bindings.scoped_texture = Some(texture);
            let unit = bindings.active_unit;
            bindings.texture_units.get(&unit).copied()
        };
        self.api.bind_texture_2d(Some(texture));
        Ok(TextureScope {
            ctx: self,
            previous,
        })
    }

    /// Persistent bind of `texture` on `unit`, recorded in the unit map.
    pub(crate) fn connect_texture_unit(&self, unit: u32, texture: G::TextureId) {
        self.api.active_texture_unit(unit);
        self.api.bind_texture_2d(Some(texture));
        let mut bindings = self.bindings.borrow_mut();
        bindings.active_unit = unit;
        bindings.texture_units.insert(unit, texture);
    }

    /// Clears `unit` back to the null texture and drops it from the unit map.
    pub(crate) fn disconnect_texture_unit(&self, unit: u32) {
        self.api.active_texture_unit(unit);
        self.api.bind_texture_2d(None);
        let mut bindings = self.bindings.borrow_mut();
        bindings.active_unit = unit;
        bindings.texture_units.remove(&unit);
    }

    /// The unit `texture` is currently connected on, if any.
    pub(crate) fn unit_of_texture(&self, texture: G::TextureId) -> Option<u32> {
        self.bindings
            .borrow()
            .texture_units
            .iter()
            .find(|(_, bound)| **bound == texture)
            .map(|(unit, _)| *unit)
    }

    pub(crate) fn set_active_program(&self, program: Option<G::ProgramId>) {
        self.api.use_program(program);
        self.bindings.borrow_mut().program = program;
    }
}

/// While alive, the vertex array is the active binding; dropping it releases
/// the binding on every exit path, normal or error.
pub(crate) struct VertexArrayScope<'a, G: GlApi> {
    ctx: &'a Context<G>,
}

impl<G: GlApi> std::fmt::Debug for VertexArrayScope<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexArrayScope").finish_non_exhaustive()
    }
}

impl<G: GlApi> Drop for VertexArrayScope<'_, G> {
    fn drop(&mut self) {
        self.ctx.api.bind_vertex_array(None);
        self.ctx.bindings.borrow_mut().vertex_array = None;
    }
}

/// Scoped buffer binding; releases on drop.
pub(crate) struct BufferScope<'a, G: GlApi> {
    ctx: &'a Context<G>,
    target: BufferTarget,
}

impl<G: GlApi> Drop for BufferScope<'_, G> {
    fn drop(&mut self) {
        self.ctx.api.bind_buffer(self.target, None);
        self.ctx.bindings.borrow_mut().buffer = None;
    }
}

/// Scoped texture binding for uploads; restores the unit's previous live
/// binding on drop.
pub(crate) struct TextureScope<'a, G: GlApi> {
    ctx: &'a Context<G>,
    previous: Option<G::TextureId>,
}

impl<G: GlApi> Drop for TextureScope<'_, G> {
    fn drop(&mut self) {
        self.ctx.api.bind_texture_2d(self.previous);
        self.ctx.bindings.borrow_mut().scoped_texture = None;
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use crate::api::{Call, RecordingApi};
    use crate::error::{Error, Result};

    use super::Context;

    fn ctx() -> Context<RecordingApi> {
        Context::new(RecordingApi::new())
    }

    // ── guard pairing ─────────────────────────────────────────────────────

    #[test]
    fn array_scope_pairs_bind_with_unbind() {
        let gl = ctx();
        {
            let _scope = gl.bind_vertex_array(7).unwrap();
            assert_eq!(gl.active_vertex_array(), Some(7));
        }
        assert_eq!(gl.active_vertex_array(), None);
        assert_eq!(
            gl.api().take_calls(),
            vec![Call::BindVertexArray(Some(7)), Call::BindVertexArray(None)]
        );
    }

    #[test]
    fn second_simultaneous_array_binding_is_refused() {
        let gl = ctx();
        let _first = gl.bind_vertex_array(1).unwrap();
        let err = gl.bind_vertex_array(2).unwrap_err();
        assert_eq!(
            err,
            Error::BindingClash {
                kind: "vertex array"
            }
        );
        // The refused bind must not have reached the native API.
        assert_eq!(gl.api().calls(), vec![Call::BindVertexArray(Some(1))]);
    }

    #[test]
    fn error_exit_restores_the_binding_state() {
        let gl = ctx();

        fn fails_inside_scope(gl: &Context<RecordingApi>) -> Result<()> {
            let _scope = gl.bind_vertex_array(3)?;
            gl.bind_vertex_array(4)?; // clash, propagates out through `?`
            Ok(())
        }

        assert!(fails_inside_scope(&gl).is_err());
        assert_eq!(gl.active_vertex_array(), None);
        let calls = gl.api().take_calls();
        assert_eq!(calls.last(), Some(&Call::BindVertexArray(None)));
    }

    #[test]
    fn panic_exit_restores_the_binding_state() {
        let gl = ctx();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _scope = gl.bind_vertex_array(5).unwrap();
            panic!("mid-scope failure");
        }));
        assert!(result.is_err());
        assert_eq!(gl.active_vertex_array(), None);
        assert_eq!(gl.api().take_calls().last(), Some(&Call::BindVertexArray(None)));
    }

    #[test]
    fn buffer_scope_unbinds_its_own_target() {
        use crate::api::BufferTarget;

        let gl = ctx();
        {
            let _scope = gl.bind_buffer(BufferTarget::VertexAttributes, 9).unwrap();
            assert_eq!(gl.active_buffer(), Some(9));
        }
        assert_eq!(gl.active_buffer(), None);
        assert_eq!(
            gl.api().take_calls(),
            vec![
                Call::BindBuffer(BufferTarget::VertexAttributes, Some(9)),
                Call::BindBuffer(BufferTarget::VertexAttributes, None),
            ]
        );
    }

    #[test]
    fn array_and_buffer_scopes_nest() {
        use crate::api::BufferTarget;

        let gl = ctx();
        let _array = gl.bind_vertex_array(1).unwrap();
        let _buffer = gl.bind_buffer(BufferTarget::VertexAttributes, 2).unwrap();
        assert_eq!(gl.active_vertex_array(), Some(1));
        assert_eq!(gl.active_buffer(), Some(2));
    }

    // ── texture unit bookkeeping ──────────────────────────────────────────

    #[test]
    fn connect_and_disconnect_track_live_units() {
        let gl = ctx();
        gl.connect_texture_unit(0, 11);
        gl.connect_texture_unit(1, 12);
        assert_eq!(gl.bound_texture_units(), vec![0, 1]);
        assert_eq!(gl.unit_of_texture(12), Some(1));

        gl.disconnect_texture_unit(0);
        assert_eq!(gl.bound_texture_units(), vec![1]);
        assert_eq!(gl.unit_of_texture(11), None);
    }

    #[test]
    fn upload_scope_restores_the_units_previous_binding() {
        let gl = ctx();
        gl.connect_texture_unit(2, 20);
        gl.api().take_calls();

        {
            let _scope = gl.bind_texture_for_upload(21).unwrap();
        }
        // Texture 20 is still the unit's live binding afterwards.
        assert_eq!(
            gl.api().take_calls(),
            vec![Call::BindTexture(Some(21)), Call::BindTexture(Some(20))]
        );
        assert_eq!(gl.unit_of_texture(20), Some(2));
    }

    #[test]
    fn upload_scope_on_an_empty_unit_restores_null() {
        let gl = ctx();
        {
            let _scope = gl.bind_texture_for_upload(21).unwrap();
        }
        assert_eq!(
            gl.api().take_calls(),
            vec![Call::BindTexture(Some(21)), Call::BindTexture(None)]
        );
    }
}
