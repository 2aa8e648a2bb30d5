//! Rendering bridge contracts.
//!
//! The dialog drives GPU resources it does not own through this minimal,
//! host-agnostic surface: create a texture from raw pixel bytes, upload
//! interleaved vertex/index data, and issue scissored indexed draws. The host
//! implements these with its own graphics context; the dialog never sees the
//! host's graphics-API types. The fourth contract of the bridge, reporting
//! the terminal path, is the one-shot continuation passed to
//! [`crate::FileDialogs::open`] rather than a trait method.
//!
//! Any method failing is fatal to the current dialog session: the lifecycle
//! controller does not retry, it tears down and reports absence.

use anyhow::Result;

use crate::input::FrameInput;

/// Opaque handle to a host-owned GPU texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// GPU clipping rectangle in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The three GPU operations of the rendering bridge, implemented by the host
/// on its own graphics context.
pub trait RenderHost {
    /// Upload a flat RGBA8 pixel buffer into a GPU texture and return an
    /// opaque handle. Called once per dialog session, at open.
    fn create_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<TextureHandle>;

    /// Ensure the host's dynamic vertex/index buffers are at least the given
    /// sizes (growing, never shrinking, to amortize reallocation), then copy
    /// the bytes in.
    ///
    /// Vertex layout is fixed at 20 bytes: 2D position (8), packed RGBA8
    /// color (4), 2D texture coordinate (8), in that order. Indices are
    /// `u16`. See [`crate::render::DialogVertex`].
    fn upload_buffers(&mut self, vertices: &[u8], indices: &[u8]) -> Result<()>;

    /// Set the GPU scissor rectangle, bind the previously uploaded buffers,
    /// and issue one indexed triangle-list draw of `element_count / 3`
    /// triangles.
    fn draw_indexed(
        &mut self,
        scissor: ScissorRect,
        vertex_offset: u32,
        vertex_count: u32,
        index_offset: u32,
        element_count: u32,
    ) -> Result<()>;
}

/// Frame-loop extension for hosts with no per-frame hook of their own,
/// consumed by [`crate::FileDialogs::open_sync`]. The controller blocks the
/// calling thread, repeating begin frame / update / draw / end frame until a
/// terminal path is produced.
pub trait FrameLoopHost: RenderHost {
    /// Clear the screen, poll input, and return this frame's input snapshot.
    fn begin_frame(&mut self) -> Result<FrameInput>;

    /// Present the finished frame.
    fn end_frame(&mut self) -> Result<()>;
}
