//! Frame geometry batching.
//!
//! The dialog batches all of its chrome, icons, and text for one frame into a
//! single interleaved vertex stream, a `u16` index stream, and an ordered
//! list of draw commands, each carrying its own scissor rectangle. The
//! streams go to the host verbatim through
//! [`RenderHost::upload_buffers`](crate::RenderHost::upload_buffers); the
//! commands replay as one scissored indexed draw each.

use bytemuck::{Pod, Zeroable};

use crate::atlas::SkinRect;
use crate::font::GlyphSheet;
use crate::host::ScissorRect;

/// One dialog vertex: 2D position, packed RGBA8 color, 2D texture
/// coordinate. 20 bytes, matching the fixed layout of the bridge contract.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DialogVertex {
    pub pos: [f32; 2],
    pub color: u32,
    pub uv: [f32; 2],
}

/// Bytes per vertex.
pub const VERTEX_STRIDE: usize = core::mem::size_of::<DialogVertex>();

/// Pack an RGBA8 color, little-endian byte order (R in the low byte).
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Untinted white.
pub const WHITE: u32 = pack_rgba(255, 255, 255, 255);

/// One scissored indexed draw into the shared buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub scissor: ScissorRect,
    /// Always zero: every command indexes into the single shared stream.
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub index_offset: u32,
    pub element_count: u32,
}

/// Interleaved geometry batch for one frame.
pub struct RenderBatch {
    atlas_width: f32,
    atlas_height: f32,
    vertices: Vec<DialogVertex>,
    indices: Vec<u16>,
    commands: Vec<DrawCommand>,
    current_scissor: Option<ScissorRect>,
    command_start: usize,
}

impl RenderBatch {
    /// Create a batch emitting texture coordinates normalized over an atlas
    /// of the given pixel dimensions.
    pub fn new(atlas_width: u32, atlas_height: u32) -> Self {
        Self {
            atlas_width: atlas_width.max(1) as f32,
            atlas_height: atlas_height.max(1) as f32,
            vertices: Vec::new(),
            indices: Vec::new(),
            commands: Vec::new(),
            current_scissor: None,
            command_start: 0,
        }
    }

    /// Discard all geometry and commands, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
        self.current_scissor = None;
        self.command_start = 0;
    }

    /// Set the scissor for subsequent geometry. Changing the scissor closes
    /// the current draw command and opens a new one.
    pub fn set_scissor(&mut self, scissor: ScissorRect) {
        if self.current_scissor == Some(scissor) {
            return;
        }
        self.flush_command();
        self.current_scissor = Some(scissor);
    }

    /// Close the last draw command. Call once after all geometry is emitted.
    pub fn finish(&mut self) {
        self.flush_command();
    }

    fn flush_command(&mut self) {
        let emitted = self.indices.len() - self.command_start;
        if emitted > 0 {
            // A batch always opens with set_scissor before geometry.
            let scissor = self
                .current_scissor
                .unwrap_or(ScissorRect::new(0, 0, u32::MAX, u32::MAX));
            self.commands.push(DrawCommand {
                scissor,
                vertex_offset: 0,
                vertex_count: self.vertices.len() as u32,
                index_offset: self.command_start as u32,
                element_count: emitted as u32,
            });
        }
        self.command_start = self.indices.len();
    }

    /// Emit a textured quad.
    pub fn quad(&mut self, x: f32, y: f32, w: f32, h: f32, src: SkinRect, color: u32) {
        let [u0, v0, u1, v1] = self.uv(src);
        self.quad_corners(
            x,
            y,
            w,
            h,
            [[u0, v0], [u1, v0], [u1, v1], [u0, v1]],
            color,
        );
    }

    /// Emit a textured quad with mirrored texture coordinates.
    pub fn quad_flipped(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        src: SkinRect,
        flip_x: bool,
        flip_y: bool,
        color: u32,
    ) {
        let [mut u0, mut v0, mut u1, mut v1] = self.uv(src);
        if flip_x {
            core::mem::swap(&mut u0, &mut u1);
        }
        if flip_y {
            core::mem::swap(&mut v0, &mut v1);
        }
        self.quad_corners(
            x,
            y,
            w,
            h,
            [[u0, v0], [u1, v0], [u1, v1], [u0, v1]],
            color,
        );
    }

    /// Emit text as one quad per glyph, monospace.
    pub fn text(&mut self, x: f32, y: f32, text: &str, color: u32, glyphs: &GlyphSheet) {
        let step = glyphs.cell_width as f32;
        let height = glyphs.cell_height as f32;
        let mut pen = x;
        for ch in text.chars() {
            if ch != ' ' {
                self.quad(pen, y, step, height, glyphs.glyph_rect(ch), color);
            }
            pen += step;
        }
    }

    /// Emit a nine-patch panel: four mirrored corners, four stretched edges,
    /// a stretched center fill.
    ///
    /// The corner sprite is authored for the top-left; the edge sprite for
    /// the top side. The other corners mirror by UV flip, the side edges
    /// rotate by UV permutation.
    pub fn nine_patch(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        corner: SkinRect,
        edge: SkinRect,
        background: SkinRect,
        color: u32,
    ) {
        let cw = (corner.width as f32).min(w / 2.0);
        let ch = (corner.height as f32).min(h / 2.0);

        // Center fill.
        self.quad(x + cw, y + ch, w - 2.0 * cw, h - 2.0 * ch, background, color);

        // Edges.
        let [u0, v0, u1, v1] = self.uv(edge);
        let top = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];
        let bottom = [[u0, v1], [u1, v1], [u1, v0], [u0, v0]];
        let left = [[u1, v0], [u1, v1], [u0, v1], [u0, v0]];
        let right = [[u0, v1], [u0, v0], [u1, v0], [u1, v1]];
        self.quad_corners(x + cw, y, w - 2.0 * cw, ch, top, color);
        self.quad_corners(x + cw, y + h - ch, w - 2.0 * cw, ch, bottom, color);
        self.quad_corners(x, y + ch, cw, h - 2.0 * ch, left, color);
        self.quad_corners(x + w - cw, y + ch, cw, h - 2.0 * ch, right, color);

        // Corners.
        self.quad_flipped(x, y, cw, ch, corner, false, false, color);
        self.quad_flipped(x + w - cw, y, cw, ch, corner, true, false, color);
        self.quad_flipped(x, y + h - ch, cw, ch, corner, false, true, color);
        self.quad_flipped(x + w - cw, y + h - ch, cw, ch, corner, true, true, color);
    }

    /// Emit a quad with explicit per-corner texture coordinates, in
    /// destination order top-left, top-right, bottom-right, bottom-left.
    fn quad_corners(&mut self, x: f32, y: f32, w: f32, h: f32, uvs: [[f32; 2]; 4], color: u32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        debug_assert!(self.vertices.len() + 4 <= u16::MAX as usize);
        let base = self.vertices.len() as u16;
        let corners = [[x, y], [x + w, y], [x + w, y + h], [x, y + h]];
        for (pos, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(DialogVertex { pos, color, uv });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn uv(&self, src: SkinRect) -> [f32; 4] {
        [
            src.x as f32 / self.atlas_width,
            src.y as f32 / self.atlas_height,
            (src.x + src.width) as f32 / self.atlas_width,
            (src.y + src.height) as f32 / self.atlas_height,
        ]
    }

    /// Vertex stream as raw bytes, ready for the bridge.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index stream as raw bytes, ready for the bridge.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Finished draw commands, in emission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Whether the batch holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: SkinRect = SkinRect {
        x: 0,
        y: 0,
        width: 16,
        height: 16,
    };

    #[test]
    fn test_vertex_layout_is_20_bytes() {
        assert_eq!(VERTEX_STRIDE, 20);
        assert_eq!(core::mem::offset_of!(DialogVertex, pos), 0);
        assert_eq!(core::mem::offset_of!(DialogVertex, color), 8);
        assert_eq!(core::mem::offset_of!(DialogVertex, uv), 12);
    }

    #[test]
    fn test_pack_rgba_little_endian() {
        assert_eq!(pack_rgba(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
    }

    #[test]
    fn test_quad_emits_two_triangles() {
        let mut batch = RenderBatch::new(64, 64);
        batch.set_scissor(ScissorRect::new(0, 0, 100, 100));
        batch.quad(0.0, 0.0, 10.0, 10.0, SRC, WHITE);
        batch.finish();

        assert_eq!(batch.vertex_bytes().len(), 4 * VERTEX_STRIDE);
        assert_eq!(batch.index_bytes().len(), 6 * 2);
        assert_eq!(batch.commands().len(), 1);
        assert_eq!(batch.commands()[0].element_count, 6);
    }

    #[test]
    fn test_scissor_change_splits_commands() {
        let mut batch = RenderBatch::new(64, 64);
        batch.set_scissor(ScissorRect::new(0, 0, 100, 100));
        batch.quad(0.0, 0.0, 10.0, 10.0, SRC, WHITE);
        batch.set_scissor(ScissorRect::new(10, 10, 50, 50));
        batch.quad(10.0, 10.0, 10.0, 10.0, SRC, WHITE);
        batch.finish();

        let commands = batch.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].index_offset, 0);
        assert_eq!(commands[1].index_offset, 6);
        assert_eq!(commands[1].scissor, ScissorRect::new(10, 10, 50, 50));
    }

    #[test]
    fn test_redundant_scissor_does_not_split() {
        let mut batch = RenderBatch::new(64, 64);
        let scissor = ScissorRect::new(0, 0, 100, 100);
        batch.set_scissor(scissor);
        batch.quad(0.0, 0.0, 10.0, 10.0, SRC, WHITE);
        batch.set_scissor(scissor);
        batch.quad(10.0, 0.0, 10.0, 10.0, SRC, WHITE);
        batch.finish();
        assert_eq!(batch.commands().len(), 1);
    }

    #[test]
    fn test_text_skips_spaces() {
        let glyphs = GlyphSheet::from_dimensions(128, 48, 64);
        let mut batch = RenderBatch::new(128, 112);
        batch.set_scissor(ScissorRect::new(0, 0, 100, 100));
        batch.text(0.0, 0.0, "a b", WHITE, &glyphs);
        batch.finish();
        assert_eq!(batch.vertex_bytes().len() / VERTEX_STRIDE, 8);
    }

    #[test]
    fn test_nine_patch_is_nine_quads() {
        let mut batch = RenderBatch::new(64, 64);
        batch.set_scissor(ScissorRect::new(0, 0, 200, 200));
        batch.nine_patch(0.0, 0.0, 100.0, 100.0, SRC, SRC, SRC, WHITE);
        batch.finish();
        assert_eq!(batch.vertex_bytes().len() / VERTEX_STRIDE, 9 * 4);
    }

    #[test]
    fn test_degenerate_quads_dropped() {
        let mut batch = RenderBatch::new(64, 64);
        batch.set_scissor(ScissorRect::new(0, 0, 100, 100));
        batch.quad(0.0, 0.0, 0.0, 10.0, SRC, WHITE);
        batch.finish();
        assert!(batch.is_empty());
        assert!(batch.commands().is_empty());
    }

    #[test]
    fn test_clear_resets_streams() {
        let mut batch = RenderBatch::new(64, 64);
        batch.set_scissor(ScissorRect::new(0, 0, 100, 100));
        batch.quad(0.0, 0.0, 10.0, 10.0, SRC, WHITE);
        batch.finish();
        batch.clear();
        assert!(batch.is_empty());
        assert!(batch.commands().is_empty());
        assert!(batch.vertex_bytes().is_empty());
    }
}
