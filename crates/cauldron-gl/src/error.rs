use std::fmt;

/// An error from a cauldron wrapper operation.
///
/// Data-shape errors name the offending dimension so malformed input fails
/// fast instead of silently mis-inferring a layout. Lifecycle errors name the
/// object kind involved.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A nested row did not match the element width established by the
    /// first row.
    RaggedData {
        what: &'static str,
        /// 0-based index of the offending row.
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Input with no elements cannot establish an element width.
    EmptyData { what: &'static str },
    /// Element width outside the 1..=4 components a shader attribute accepts.
    InvalidElementWidth { width: usize },
    /// A flat vertex grid whose length is not a multiple of its width.
    GridShape { len: usize, width: usize },
    /// A flat image grid whose length does not equal width * height * 3.
    ImageShape {
        len: usize,
        width: usize,
        height: usize,
    },
    /// The native API failed to allocate an object handle. Fatal; these are
    /// one-shot setup operations with no retry policy.
    ResourceAllocation { kind: &'static str, reason: String },
    /// A scoped bind was requested while another object of the same kind was
    /// already the active binding.
    BindingClash { kind: &'static str },
    /// Draw without an explicit count and no attached buffers to take a
    /// vertex count from.
    NoAttachedBuffers,
    /// Operation on an object whose native handle was already released.
    UseAfterFree { kind: &'static str },
    /// `free` on an object that is still connected to the pipeline.
    StillConnected { kind: &'static str },
    /// `disconnect` on an object that was never connected.
    NotConnected { kind: &'static str },
    /// A uniform store was attempted while the program was not in use.
    ProgramNotActive,
    /// Stage compilation failed; carries the driver's info log.
    ShaderCompile { stage: &'static str, log: String },
    /// Program linking failed; carries the driver's info log.
    ShaderLink { log: String },
    /// The linked program has no attribute or uniform with this name.
    UnknownShaderInput { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RaggedData {
                what,
                row,
                expected,
                actual,
            } => write!(
                f,
                "ragged {what}: row {row} has {actual} values, expected {expected}"
            ),
            Error::EmptyData { what } => {
                write!(f, "{what} contains no data to establish an element width")
            }
            Error::InvalidElementWidth { width } => write!(
                f,
                "element width {width} is outside the 1..=4 components an attribute accepts"
            ),
            Error::GridShape { len, width } => write!(
                f,
                "flat grid of {len} values cannot be split into elements of width {width}"
            ),
            Error::ImageShape { len, width, height } => write!(
                f,
                "image grid of {len} channel values does not match {width}x{height} RGB texels ({} expected)",
                width * height * 3
            ),
            Error::ResourceAllocation { kind, reason } => {
                write!(f, "failed to allocate {kind}: {reason}")
            }
            Error::BindingClash { kind } => {
                write!(f, "another {kind} is already the active binding")
            }
            Error::NoAttachedBuffers => {
                write!(f, "draw needs an explicit count when no buffers are attached")
            }
            Error::UseAfterFree { kind } => write!(f, "{kind} was already freed"),
            Error::StillConnected { kind } => {
                write!(f, "cannot free {kind} while it is still connected")
            }
            Error::NotConnected { kind } => write!(f, "{kind} is not connected"),
            Error::ProgramNotActive => {
                write!(f, "no shader program is in use for this operation")
            }
            Error::ShaderCompile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {log}")
            }
            Error::ShaderLink { log } => write!(f, "shader program failed to link: {log}"),
            Error::UnknownShaderInput { name } => {
                write!(f, "shader program has no input named `{name}`")
            }
        }
    }
}

impl std::error::Error for Error {}
