//! Safe scoped wrappers for OpenGL vertex, buffer, texture, and shader
//! program objects.
//!
//! OpenGL keeps one process-wide "currently active" object per kind and
//! leaves data layout to convention. This crate wraps that surface so the
//! sharp edges stay inside:
//!
//! - every bind is paired with its unbind by an RAII scope, on success and
//!   error paths alike, and two objects of the same kind can never be the
//!   active binding at once
//! - caller data (flat sequences, nested rows, typed grids) is validated
//!   and flattened to device floats once, at the call boundary, with
//!   element width and count inferred from the shape
//! - the implicit global binding state is mirrored by [`Context`], so the
//!   activation-order invariants are checkable in tests against
//!   [`api::RecordingApi`] instead of only against a real device
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`api`] | `GlApi` trait, the `glow` backend, `RecordingApi` |
//! | [`context`] | `Context`, the explicit binding tracker |
//! | [`data`] | `VertexData`, `ImageData`, flattening + validation |
//! | [`error`] | `Error`, `Result` |
//! | [`logging`] | `env_logger` wiring for embedding programs |
//!
//! # Quick start
//!
//! ```
//! use cauldron_gl::api::RecordingApi;
//! use cauldron_gl::{BufferInit, Context, PrimitiveMode, VertexArray};
//!
//! let gl = Context::new(RecordingApi::new());
//! let mut quad = VertexArray::new(&gl).unwrap();
//!
//! let corners = quad
//!     .create_buffer(
//!         &gl,
//!         BufferInit::with_data(vec![
//!             [-0.6f32, -0.5, 0.1],
//!             [0.6, -0.5, 0.1],
//!             [0.6, 0.5, 0.1],
//!             [-0.6, 0.5, 0.1],
//!         ]),
//!     )
//!     .unwrap();
//!
//! quad.buffer_mut(corners)
//!     .connect_to_shader(&gl, 0.into(), false)
//!     .unwrap();
//! quad.draw(&gl, PrimitiveMode::TriangleFan).unwrap();
//! ```
//!
//! Against a real device, build the context from a `glow::Context` instead;
//! the wrappers are identical.

pub mod api;
pub mod context;
pub mod data;
pub mod error;
pub mod logging;

mod buffer;
mod shader;
mod texture;
mod vertex_array;

pub use api::{BufferTarget, BufferUsage, PrimitiveMode};
pub use buffer::{BufferInit, VertexBuffer};
pub use context::Context;
pub use data::{ImageData, Scalar, VertexData};
pub use error::{Error, Result};
pub use logging::{LoggingConfig, init_logging};
pub use shader::{AttributeLocation, SamplerUniform, ShaderProgram, UniformLocation};
pub use texture::Texture;
pub use vertex_array::{BufferSlot, VertexArray};

#[cfg(test)]
mod flow_tests {
    use crate::api::{Call, RecordingApi};
    use crate::{BufferInit, Context, ImageData, PrimitiveMode, ShaderProgram, Texture, VertexArray};

    // The full life of a textured quad: program, attribute buffers, texture,
    // one frame of drawing, then a per-frame image reload and a vertex drag.
    #[test]
    fn textured_quad_setup_and_redraw() {
        let gl = Context::new(RecordingApi::new());
        gl.api().define_attribute("position", 0);
        gl.api().define_attribute("tex_coord", 1);
        gl.api().define_uniform("texture", 0);

        let program =
            ShaderProgram::from_sources(&gl, "void main() {}", "void main() {}").unwrap();
        program.bind(&gl).unwrap();

        let mut quad = VertexArray::new(&gl).unwrap();
        let position = quad
            .create_buffer(
                &gl,
                BufferInit::with_data(vec![
                    [-0.6f32, -0.5, 0.1],
                    [0.6, -0.5, 0.1],
                    [0.6, 0.5, 0.1],
                    [-0.6, 0.5, 0.1],
                ]),
            )
            .unwrap();
        let tex_coord = quad
            .create_buffer(
                &gl,
                BufferInit::with_data(vec![[0.0f32, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            )
            .unwrap();

        let position_loc = program.attribute_location(&gl, "position").unwrap();
        let tex_coord_loc = program.attribute_location(&gl, "tex_coord").unwrap();
        quad.buffer_mut(position)
            .connect_to_shader(&gl, position_loc, false)
            .unwrap();
        quad.buffer_mut(tex_coord)
            .connect_to_shader(&gl, tex_coord_loc, false)
            .unwrap();

        let sampler = program.sampler_uniform(&gl, "texture").unwrap();
        let mut image = Texture::with_data(
            &gl,
            vec![
                vec![[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]],
                vec![[0.5, 0.5, 0.0], [1.0, 1.0, 0.0]],
            ],
        )
        .unwrap();

        // One frame: connect, draw, disconnect.
        image.connect_to_shader(&gl, sampler).unwrap();
        quad.draw(&gl, PrimitiveMode::TriangleFan).unwrap();
        image.disconnect(&gl).unwrap();
        assert!(gl.bound_texture_units().is_empty());

        // Animated content reloads between frames.
        image
            .set_data(
                &gl,
                ImageData::Grid {
                    channels: vec![0.2f32; 20 * 20 * 3],
                    width: 20,
                    height: 20,
                },
            )
            .unwrap();
        assert_eq!((image.width(), image.height()), (20, 20));

        // A pointer drag re-uploads positions with the same shape; the
        // attribute connection stays valid.
        quad.buffer_mut(position)
            .set_data(
                &gl,
                vec![
                    [-0.4f32, -0.3, 0.1],
                    [0.8, -0.3, 0.1],
                    [0.8, 0.7, 0.1],
                    [-0.4, 0.7, 0.1],
                ],
            )
            .unwrap();
        assert_eq!(quad.buffer(position).connected_attributes(), &[0]);

        // Nothing is left bound once the frame work is done.
        assert_eq!(gl.active_vertex_array(), None);
        assert_eq!(gl.active_buffer(), None);
        assert!(gl.api().take_calls().contains(&Call::DrawArrays {
            mode: PrimitiveMode::TriangleFan,
            first: 0,
            count: 4,
        }));
    }
}
