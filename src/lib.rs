//! Embeddable modal file-selection widget for real-time frame loops.
//!
//! `framepick` runs a skinned file dialog inside an already-running graphics
//! application without taking over the process or opening a native window.
//! The host keeps its GPU context and frame loop; the dialog batches its
//! chrome, icons, and text into one interleaved vertex/index stream per frame
//! and drives the host's GPU through four narrow contracts: create a texture
//! from raw pixels, upload buffer bytes, issue a scissored indexed draw, and
//! report the terminal path.
//!
//! # Components
//!
//! - [`atlas`]: skin bundle loading: sprite-sheet, glyph grid, and the
//!   `name:x,y,width,height` region manifest, composed into one atlas.
//! - [`directory`]: the directory model: fresh enumeration per navigation,
//!   directories first, no sorting added.
//! - [`host`] / [`render`]: the rendering bridge: the host-implemented
//!   [`RenderHost`] trait and the frame geometry batch feeding it.
//! - [`dialog`]: the lifecycle controller: single-session ownership,
//!   per-frame update/draw, exactly-once result delivery.
//!
//! # Integration sketch
//!
//! ```rust,ignore
//! use framepick::{AtlasOptions, FileDialogs, FrameInput};
//!
//! // Host startup.
//! let dialogs = FileDialogs::load_skin(skin_dir, AtlasOptions::default())?;
//!
//! // On user gesture.
//! let mut dialog = dialogs.open(&save_dir, &mut my_host, |path| match path {
//!     Some(path) => load_game(&path),
//!     None => {} // cancelled
//! })?;
//!
//! // In the host's frame loop, until the dialog reports Closed.
//! dialog.frame(&my_input_snapshot, &mut my_host)?;
//! ```
//!
//! Hosts without a per-frame hook use [`FileDialogs::open_sync`], which
//! blocks inside its own loop over a [`FrameLoopHost`] until the user picks
//! a file or cancels.

pub mod atlas;
pub mod dialog;
pub mod directory;
pub mod font;
pub mod host;
pub mod input;
pub mod render;

#[cfg(feature = "gpu")]
pub mod wgpu_host;

pub use atlas::{
    parse_manifest, AtlasError, AtlasOptions, AtlasTable, Skin, SkinRect, SkinRegion, FONT_FILE,
    MANIFEST_FILE, TEXTURE_FILE,
};
pub use dialog::{ContractViolation, DialogError, DialogStatus, FileDialog, FileDialogs};
pub use directory::{DirectoryState, NavigationError};
pub use font::GlyphSheet;
pub use host::{FrameLoopHost, RenderHost, ScissorRect, TextureHandle};
pub use input::{FrameInput, Key};
pub use render::{pack_rgba, DialogVertex, DrawCommand, RenderBatch, VERTEX_STRIDE, WHITE};

#[cfg(feature = "gpu")]
pub use wgpu_host::WgpuHost;
