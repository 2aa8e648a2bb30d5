//! Dialog lifecycle controller.
//!
//! Owns the one active dialog session at a time and drives it through the
//! state machine `Closed -> Opening -> Active -> Closing -> Closed`. Each
//! frame the controller consumes a host input snapshot, mutates the
//! directory model, and emits one frame of draw calls through the rendering
//! bridge. On a terminal selection it fires the result continuation exactly
//! once and releases the session.
//!
//! The "only one dialog at a time" rule is enforced by the owned
//! [`FileDialog`] handle returned by [`FileDialogs::open`], backed by an
//! RAII session guard rather than a hidden global slot. Dropping a live
//! handle counts as cancellation.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::atlas::{AtlasError, AtlasOptions, Skin, SkinRegion};
use crate::directory::{DirectoryState, NavigationError};
use crate::font::GlyphSheet;
use crate::host::{FrameLoopHost, RenderHost, ScissorRect, TextureHandle};
use crate::input::{FrameInput, Key};
use crate::render::{pack_rgba, RenderBatch, WHITE};

// ============================================================================
// Layout constants
// ============================================================================

const MIN_DIALOG_WIDTH: i32 = 320;
const MIN_DIALOG_HEIGHT: i32 = 240;
const ROW_HEIGHT: i32 = 22;
const PADDING: i32 = 8;
const ICON_SIZE: i32 = 16;
const BUTTON_SIZE: i32 = 24;
const HEADER_HEIGHT: i32 = 28;
const FOOTER_HEIGHT: i32 = 36;
const WHEEL_ROWS: i32 = 3;

const COLOR_TEXT: u32 = pack_rgba(230, 230, 230, 255);
const COLOR_TEXT_DIM: u32 = pack_rgba(150, 150, 150, 255);
const COLOR_ERROR: u32 = pack_rgba(235, 110, 100, 255);
const COLOR_SELECTED: u32 = pack_rgba(110, 150, 220, 255);
const COLOR_HOVER: u32 = pack_rgba(175, 185, 205, 255);

// ============================================================================
// Errors and status
// ============================================================================

/// Programmer error in the host integration. The open attempt (or unload) is
/// refused with no state change; nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("a dialog is already open")]
    DialogAlreadyOpen,

    #[error("start directory must not be empty")]
    EmptyStartDirectory,

    #[error("cannot unload the skin while a dialog is open")]
    SkinInUse,
}

/// Failure opening or driving a dialog session.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error("failed to open start directory: {0}")]
    Navigation(#[from] NavigationError),

    #[error("render host failure: {0}")]
    Host(anyhow::Error),
}

/// What a frame left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogStatus {
    /// The dialog is still on screen; keep feeding it frames.
    Active,
    /// The session ended; the continuation has fired.
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DialogState {
    Opening,
    Active,
    Closing,
    Closed,
}

// ============================================================================
// Geometry
// ============================================================================

/// Pixel rectangle used for layout and hit-testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Rect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + self.width as i32
            && py < self.y + self.height as i32
    }

    fn scissor(&self) -> ScissorRect {
        ScissorRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Per-frame layout derived from the viewport and the current path.
///
/// The dialog is a centered outer panel: a header row (home icon plus
/// clickable path segments), a scrollable listing under its own scissor, and
/// cancel/select buttons in the footer.
struct Layout {
    outer: Rect,
    header: Rect,
    listing: Rect,
    home: Rect,
    cancel: Rect,
    select: Rect,
    segments: Vec<Rect>,
    rows_visible: usize,
}

impl Layout {
    fn compute(viewport: (u32, u32), segments: &[String], glyphs: &GlyphSheet) -> Self {
        let vw = viewport.0 as i32;
        let vh = viewport.1 as i32;

        let width = (vw * 7 / 10).clamp(MIN_DIALOG_WIDTH, (vw - 2 * PADDING).max(MIN_DIALOG_WIDTH));
        let height =
            (vh * 7 / 10).clamp(MIN_DIALOG_HEIGHT, (vh - 2 * PADDING).max(MIN_DIALOG_HEIGHT));
        let outer = Rect::new(
            (vw - width) / 2,
            (vh - height) / 2,
            width as u32,
            height as u32,
        );

        let inner_x = outer.x + PADDING;
        let inner_width = (width - 2 * PADDING).max(0) as u32;
        let header = Rect::new(inner_x, outer.y + PADDING, inner_width, HEADER_HEIGHT as u32);
        let home = Rect::new(
            header.x,
            header.y + (HEADER_HEIGHT - ICON_SIZE) / 2,
            ICON_SIZE as u32,
            ICON_SIZE as u32,
        );

        let mut segment_rects = Vec::with_capacity(segments.len());
        let mut pen = home.x + ICON_SIZE + PADDING;
        for segment in segments {
            let label_width = glyphs.measure(segment_label(segment)).max(1);
            segment_rects.push(Rect::new(pen, header.y, label_width, header.height));
            pen += label_width as i32 + glyphs.cell_width as i32;
        }

        let footer_y = outer.y + height - FOOTER_HEIGHT;
        let button_y = footer_y + (FOOTER_HEIGHT - BUTTON_SIZE) / 2;
        let select = Rect::new(
            outer.x + width - PADDING - BUTTON_SIZE,
            button_y,
            BUTTON_SIZE as u32,
            BUTTON_SIZE as u32,
        );
        let cancel = Rect::new(
            select.x - PADDING - BUTTON_SIZE,
            button_y,
            BUTTON_SIZE as u32,
            BUTTON_SIZE as u32,
        );

        let listing_y = header.y + HEADER_HEIGHT;
        let listing_height = (footer_y - listing_y).max(ROW_HEIGHT) as u32;
        let listing = Rect::new(inner_x, listing_y, inner_width, listing_height);

        Self {
            outer,
            header,
            listing,
            home,
            cancel,
            select,
            segments: segment_rects,
            rows_visible: (listing_height as i32 / ROW_HEIGHT).max(1) as usize,
        }
    }
}

/// Header label for a path segment; the root's empty segment shows as `/`.
fn segment_label(segment: &str) -> &str {
    if segment.is_empty() {
        "/"
    } else {
        segment
    }
}

// ============================================================================
// Subsystem
// ============================================================================

/// The dialog subsystem: the shared skin, the remembered directory, and the
/// single-session guard. Load once at host startup, unload at shutdown.
pub struct FileDialogs {
    skin: Arc<Skin>,
    last_directory: Arc<Mutex<Option<PathBuf>>>,
    session_active: Arc<AtomicBool>,
}

impl FileDialogs {
    /// Load the skin bundle under `base_path` and start the subsystem.
    pub fn load_skin(base_path: &Path, options: AtlasOptions) -> Result<Self, AtlasError> {
        let skin = Skin::load(base_path, options)?;
        Ok(Self {
            skin: Arc::new(skin),
            last_directory: Arc::new(Mutex::new(None)),
            session_active: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The shared skin.
    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    /// Whether a dialog session is currently live.
    pub fn dialog_active(&self) -> bool {
        self.session_active.load(Ordering::SeqCst)
    }

    /// Directory of the last successful selection, if any. Cancelled
    /// sessions never update this. Hosts typically pass it back as the next
    /// open's start directory.
    pub fn last_directory(&self) -> Option<PathBuf> {
        self.last_directory.lock().clone()
    }

    /// Release the skin. Refused while a dialog session is live; the
    /// subsystem is handed back untouched.
    pub fn unload_skin(self) -> Result<(), (FileDialogs, ContractViolation)> {
        if self.dialog_active() {
            return Err((self, ContractViolation::SkinInUse));
        }
        log::info!("dialog skin unloaded");
        Ok(())
    }

    /// Open a dialog at `start_directory`. Returns the owned session handle;
    /// drive it with [`FileDialog::frame`] from the host's loop.
    ///
    /// `on_result` is the one-shot terminal-path continuation: it fires
    /// exactly once per session, with the selected absolute path or `None`
    /// on cancellation. If the open itself fails no session existed and the
    /// continuation is dropped uninvoked.
    pub fn open<F>(
        &self,
        start_directory: &Path,
        host: &mut dyn RenderHost,
        on_result: F,
    ) -> Result<FileDialog, DialogError>
    where
        F: FnOnce(Option<PathBuf>) + 'static,
    {
        if start_directory.as_os_str().is_empty() {
            return Err(ContractViolation::EmptyStartDirectory.into());
        }
        if self
            .session_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ContractViolation::DialogAlreadyOpen.into());
        }

        let mut dialog = FileDialog {
            skin: self.skin.clone(),
            state: DialogState::Opening,
            dir: DirectoryState {
                current_path: PathBuf::new(),
                child_directories: Vec::new(),
                child_files: Vec::new(),
                path_segments: Vec::new(),
            },
            start_directory: start_directory.to_path_buf(),
            texture: TextureHandle(0),
            selection: None,
            pending_file: None,
            error_text: None,
            scroll: 0,
            hover_row: None,
            viewport: (0, 0),
            revision: 1,
            uploaded_revision: 0,
            batch: RenderBatch::new(self.skin.width, self.skin.height),
            outcome: None,
            on_result: Some(Box::new(on_result)),
            session_active: self.session_active.clone(),
            last_directory: self.last_directory.clone(),
        };

        // Opening -> Active: first enumeration, then the session's one
        // texture upload. Either failing aborts the open with no session.
        dialog.dir = match DirectoryState::read(start_directory) {
            Ok(dir) => dir,
            Err(err) => {
                dialog.abort_open();
                return Err(DialogError::Navigation(err));
            }
        };
        dialog.texture = match host.create_texture(&self.skin.pixels, self.skin.width, self.skin.height)
        {
            Ok(texture) => texture,
            Err(err) => {
                dialog.abort_open();
                return Err(DialogError::Host(err));
            }
        };

        dialog.state = DialogState::Active;
        log::info!("file dialog opened at {}", start_directory.display());
        Ok(dialog)
    }

    /// Blocking variant for hosts with no per-frame hook: drives its own
    /// begin frame / update / draw / end frame loop until a terminal path or
    /// cancellation is produced.
    pub fn open_sync<H>(
        &self,
        start_directory: &Path,
        host: &mut H,
    ) -> Result<Option<PathBuf>, DialogError>
    where
        H: FrameLoopHost,
    {
        let result: Rc<std::cell::Cell<Option<Option<PathBuf>>>> = Rc::new(std::cell::Cell::new(None));
        let slot = result.clone();
        let mut dialog = self.open(start_directory, host, move |path| slot.set(Some(path)))?;

        loop {
            let input = host.begin_frame().map_err(DialogError::Host)?;
            if dialog.frame(&input, host)? == DialogStatus::Closed {
                break;
            }
            host.end_frame().map_err(DialogError::Host)?;
        }

        Ok(result.take().flatten())
    }
}

// ============================================================================
// Dialog session
// ============================================================================

/// One open dialog session. Exclusive ownership of this handle is the
/// single-instance guarantee; dropping it without a terminal selection
/// counts as cancellation.
pub struct FileDialog {
    skin: Arc<Skin>,
    state: DialogState,
    dir: DirectoryState,
    start_directory: PathBuf,
    texture: TextureHandle,
    /// Keyboard/pointer selection as a row index: directories first, then
    /// files.
    selection: Option<usize>,
    /// File name armed for confirmation. Confirm is a no-op without one.
    pending_file: Option<String>,
    error_text: Option<String>,
    scroll: usize,
    hover_row: Option<usize>,
    viewport: (u32, u32),
    /// Bumped by every visible state change; geometry is rebuilt and
    /// re-uploaded only when it moved.
    revision: u64,
    uploaded_revision: u64,
    batch: RenderBatch,
    outcome: Option<Option<PathBuf>>,
    on_result: Option<Box<dyn FnOnce(Option<PathBuf>)>>,
    session_active: Arc<AtomicBool>,
    last_directory: Arc<Mutex<Option<PathBuf>>>,
}

impl std::fmt::Debug for FileDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDialog")
            .field("state", &self.state)
            .field("start_directory", &self.start_directory)
            .field("selection", &self.selection)
            .field("pending_file", &self.pending_file)
            .field("error_text", &self.error_text)
            .finish_non_exhaustive()
    }
}

impl FileDialog {
    /// Current directory snapshot.
    pub fn directory(&self) -> &DirectoryState {
        &self.dir
    }

    /// File name armed for confirmation, if any.
    pub fn pending_file(&self) -> Option<&str> {
        self.pending_file.as_deref()
    }

    /// Recoverable in-dialog error line, if set.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// The session's skin texture handle.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Whether the session is still live.
    pub fn status(&self) -> DialogStatus {
        if self.state == DialogState::Closed {
            DialogStatus::Closed
        } else {
            DialogStatus::Active
        }
    }

    /// Drive one frame: consume input, update state, emit draw calls.
    ///
    /// Bridge calls per session arrive in a fixed order: the one texture
    /// creation at open, then per frame a buffer upload (only when geometry
    /// changed) followed by the draws, and the terminal report last.
    ///
    /// A host callback failure is fatal to the session: it closes, the
    /// continuation fires with `None`, and the error is returned.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        host: &mut dyn RenderHost,
    ) -> Result<DialogStatus, DialogError> {
        if self.state == DialogState::Closed {
            return Ok(DialogStatus::Closed);
        }

        let viewport = (input.viewport_width, input.viewport_height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.revision += 1;
        }

        let layout = Layout::compute(self.viewport, &self.dir.path_segments, &self.skin.glyphs);
        self.handle_input(input, &layout);

        if self.state == DialogState::Closing {
            let outcome = self.outcome.take().unwrap_or(None);
            self.finish(outcome);
            return Ok(DialogStatus::Closed);
        }

        if let Err(err) = self.draw(&layout, host) {
            log::error!("render host failure, closing dialog: {err:#}");
            self.finish(None);
            return Err(DialogError::Host(err));
        }

        Ok(DialogStatus::Active)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn handle_input(&mut self, input: &FrameInput, layout: &Layout) {
        if input.key(Key::Escape) {
            self.begin_close(None);
            return;
        }

        if input.key(Key::Backspace) {
            if let Some(parent) = self.dir.current_path.parent() {
                if !parent.as_os_str().is_empty() {
                    self.navigate(parent.to_path_buf());
                }
            }
        }

        if input.key(Key::Up) {
            self.move_selection(-1, layout.rows_visible);
        }
        if input.key(Key::Down) {
            self.move_selection(1, layout.rows_visible);
        }
        if input.key(Key::PageUp) {
            self.move_selection(-(layout.rows_visible as isize), layout.rows_visible);
        }
        if input.key(Key::PageDown) {
            self.move_selection(layout.rows_visible as isize, layout.rows_visible);
        }

        if input.key(Key::Enter) {
            self.activate_selection();
            if self.state != DialogState::Active {
                return;
            }
        }

        if input.wheel != 0 {
            self.scroll_by(-input.wheel * WHEEL_ROWS, layout.rows_visible);
        }

        let hover = if layout.listing.contains(input.pointer_x, input.pointer_y) {
            let row = (input.pointer_y - layout.listing.y) / ROW_HEIGHT;
            let index = self.scroll + row as usize;
            (index < self.row_count()).then_some(index)
        } else {
            None
        };
        if hover != self.hover_row {
            self.hover_row = hover;
            self.revision += 1;
        }

        if input.clicked {
            self.handle_click(input.pointer_x, input.pointer_y, layout);
        }
    }

    fn handle_click(&mut self, px: i32, py: i32, layout: &Layout) {
        if layout.cancel.contains(px, py) {
            self.begin_close(None);
            return;
        }
        if layout.select.contains(px, py) {
            self.confirm_selection();
            return;
        }
        if layout.home.contains(px, py) {
            let start = self.start_directory.clone();
            self.navigate(start);
            return;
        }
        for (index, segment) in layout.segments.iter().enumerate() {
            if segment.contains(px, py) {
                let target = self.dir.prefix_path(index);
                if target != self.dir.current_path {
                    self.navigate(target);
                }
                return;
            }
        }
        if let Some(row) = self.hover_row {
            if self.row_is_dir(row) {
                let target = self.dir.current_path.join(self.row_name(row));
                self.navigate(target);
            } else {
                self.set_selection(Some(row), layout.rows_visible);
            }
        }
    }

    fn move_selection(&mut self, delta: isize, rows_visible: usize) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        let current = self.selection.map(|s| s as isize).unwrap_or(-1);
        let next = (current + delta).clamp(0, rows as isize - 1) as usize;
        if Some(next) != self.selection {
            self.set_selection(Some(next), rows_visible);
        }
    }

    fn set_selection(&mut self, selection: Option<usize>, rows_visible: usize) {
        let pending = selection.and_then(|row| {
            if self.row_is_dir(row) {
                None
            } else {
                Some(self.row_name(row).to_string())
            }
        });
        self.selection = selection;
        self.pending_file = pending;
        if let Some(row) = selection {
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + rows_visible {
                self.scroll = row + 1 - rows_visible;
            }
        }
        self.revision += 1;
    }

    fn activate_selection(&mut self) {
        let Some(row) = self.selection else {
            return;
        };
        if self.row_is_dir(row) {
            let target = self.dir.current_path.join(self.row_name(row));
            self.navigate(target);
        } else {
            self.confirm_selection();
        }
    }

    fn confirm_selection(&mut self) {
        if let Some(name) = &self.pending_file {
            let path = self.dir.current_path.join(name);
            self.begin_close(Some(path));
        }
    }

    fn scroll_by(&mut self, delta: i32, rows_visible: usize) {
        let max = self.row_count().saturating_sub(rows_visible);
        let next = (self.scroll as i64 + delta as i64).clamp(0, max as i64) as usize;
        if next != self.scroll {
            self.scroll = next;
            self.revision += 1;
        }
    }

    /// Re-enumerate `target`. On failure the previous listing and path stay
    /// intact and an error line is shown instead of closing the dialog.
    fn navigate(&mut self, target: PathBuf) {
        match DirectoryState::read(&target) {
            Ok(dir) => {
                log::debug!("navigated to {}", dir.current_path.display());
                self.dir = dir;
                self.selection = None;
                self.pending_file = None;
                self.scroll = 0;
                self.hover_row = None;
                self.error_text = None;
            }
            Err(err) => {
                log::warn!("navigation failed: {err}");
                self.error_text = Some(err.to_string());
            }
        }
        self.revision += 1;
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    fn row_count(&self) -> usize {
        self.dir.child_directories.len() + self.dir.child_files.len()
    }

    fn row_is_dir(&self, row: usize) -> bool {
        row < self.dir.child_directories.len()
    }

    fn row_name(&self, row: usize) -> &str {
        let dirs = self.dir.child_directories.len();
        if row < dirs {
            &self.dir.child_directories[row]
        } else {
            &self.dir.child_files[row - dirs]
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn draw(&mut self, layout: &Layout, host: &mut dyn RenderHost) -> anyhow::Result<()> {
        if self.revision != self.uploaded_revision {
            self.build_batch(layout);
            host.upload_buffers(self.batch.vertex_bytes(), self.batch.index_bytes())?;
            self.uploaded_revision = self.revision;
        }
        for command in self.batch.commands() {
            host.draw_indexed(
                command.scissor,
                command.vertex_offset,
                command.vertex_count,
                command.index_offset,
                command.element_count,
            )?;
        }
        Ok(())
    }

    fn build_batch(&mut self, layout: &Layout) {
        let batch = &mut self.batch;
        let atlas = &self.skin.atlas;
        let glyphs = &self.skin.glyphs;
        let dirs = &self.dir.child_directories;
        let files = &self.dir.child_files;
        let row_total = dirs.len() + files.len();
        batch.clear();

        // Chrome: outer panel, then the listing panel.
        batch.set_scissor(layout.outer.scissor());
        batch.nine_patch(
            layout.outer.x as f32,
            layout.outer.y as f32,
            layout.outer.width as f32,
            layout.outer.height as f32,
            atlas.get(SkinRegion::OuterBorderCorner),
            atlas.get(SkinRegion::OuterBorderEdge),
            atlas.get(SkinRegion::OuterBackground),
            WHITE,
        );
        batch.nine_patch(
            layout.listing.x as f32,
            layout.listing.y as f32,
            layout.listing.width as f32,
            layout.listing.height as f32,
            atlas.get(SkinRegion::InnerBorderCorner),
            atlas.get(SkinRegion::InnerBorderEdge),
            atlas.get(SkinRegion::InnerBackground),
            WHITE,
        );

        // Header: home icon and the path segments.
        batch.quad(
            layout.home.x as f32,
            layout.home.y as f32,
            layout.home.width as f32,
            layout.home.height as f32,
            atlas.get(SkinRegion::HomeIcon),
            WHITE,
        );
        let text_y = |rect: &Rect| {
            rect.y as f32 + (rect.height as f32 - glyphs.cell_height as f32) / 2.0
        };
        let last = layout.segments.len().saturating_sub(1);
        for (index, (rect, segment)) in layout
            .segments
            .iter()
            .zip(&self.dir.path_segments)
            .enumerate()
        {
            let color = if index == last { COLOR_TEXT } else { COLOR_TEXT_DIM };
            batch.text(rect.x as f32, text_y(rect), segment_label(segment), color, glyphs);
            if index != last {
                batch.text(
                    (rect.x + rect.width as i32) as f32,
                    text_y(rect),
                    "/",
                    COLOR_TEXT_DIM,
                    glyphs,
                );
            }
        }

        // Listing, clipped to its own scissor.
        batch.set_scissor(layout.listing.scissor());
        let first = self.scroll.min(row_total);
        let visible_end = (self.scroll + layout.rows_visible + 1).min(row_total);
        for row in first..visible_end {
            let y = layout.listing.y + (row - self.scroll) as i32 * ROW_HEIGHT;
            let row_rect = Rect::new(layout.listing.x, y, layout.listing.width, ROW_HEIGHT as u32);

            if Some(row) == self.selection {
                batch.quad(
                    row_rect.x as f32,
                    row_rect.y as f32,
                    row_rect.width as f32,
                    row_rect.height as f32,
                    atlas.get(SkinRegion::InnerBackground),
                    COLOR_SELECTED,
                );
            } else if Some(row) == self.hover_row {
                batch.quad(
                    row_rect.x as f32,
                    row_rect.y as f32,
                    row_rect.width as f32,
                    row_rect.height as f32,
                    atlas.get(SkinRegion::InnerBackground),
                    COLOR_HOVER,
                );
            }

            let is_dir = row < dirs.len();
            let icon = if is_dir {
                atlas.get(SkinRegion::FolderIcon)
            } else {
                atlas.get(SkinRegion::FileIcon)
            };
            batch.quad(
                (row_rect.x + PADDING / 2) as f32,
                (y + (ROW_HEIGHT - ICON_SIZE) / 2) as f32,
                ICON_SIZE as f32,
                ICON_SIZE as f32,
                icon,
                WHITE,
            );

            let name = if is_dir {
                &dirs[row]
            } else {
                &files[row - dirs.len()]
            };
            batch.text(
                (row_rect.x + PADDING / 2 + ICON_SIZE + PADDING / 2) as f32,
                y as f32 + (ROW_HEIGHT as f32 - glyphs.cell_height as f32) / 2.0,
                name,
                COLOR_TEXT,
                glyphs,
            );
        }

        if let Some(error) = &self.error_text {
            let y = layout.listing.y + layout.listing.height as i32 - ROW_HEIGHT;
            batch.text(
                (layout.listing.x + PADDING / 2) as f32,
                y as f32 + (ROW_HEIGHT as f32 - glyphs.cell_height as f32) / 2.0,
                error,
                COLOR_ERROR,
                glyphs,
            );
        }

        // Footer buttons.
        batch.set_scissor(layout.outer.scissor());
        batch.quad(
            layout.cancel.x as f32,
            layout.cancel.y as f32,
            layout.cancel.width as f32,
            layout.cancel.height as f32,
            atlas.get(SkinRegion::CancelIcon),
            WHITE,
        );
        let select_color = if self.pending_file.is_some() {
            WHITE
        } else {
            COLOR_TEXT_DIM
        };
        batch.quad(
            layout.select.x as f32,
            layout.select.y as f32,
            layout.select.width as f32,
            layout.select.height as f32,
            atlas.get(SkinRegion::SelectIcon),
            select_color,
        );

        batch.finish();
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    fn begin_close(&mut self, outcome: Option<PathBuf>) {
        self.state = DialogState::Closing;
        self.outcome = Some(outcome);
    }

    /// Closing -> Closed: fire the continuation exactly once, record the
    /// remembered directory on success, release the session slot.
    fn finish(&mut self, outcome: Option<PathBuf>) {
        if self.state == DialogState::Closed {
            return;
        }
        self.state = DialogState::Closed;
        if let Some(on_result) = self.on_result.take() {
            match &outcome {
                Some(path) => {
                    log::info!("file dialog selected {}", path.display());
                    *self.last_directory.lock() = Some(self.dir.current_path.clone());
                }
                None => log::info!("file dialog cancelled"),
            }
            on_result(outcome);
        }
        self.session_active.store(false, Ordering::SeqCst);
    }

    /// Open failed before a session existed: free the slot and make sure the
    /// untriggered continuation is dropped without firing.
    fn abort_open(&mut self) {
        self.state = DialogState::Closed;
        self.on_result = None;
        self.session_active.store(false, Ordering::SeqCst);
    }
}

impl Drop for FileDialog {
    fn drop(&mut self) {
        if self.state != DialogState::Closed {
            log::warn!("file dialog dropped while open; treating as cancel");
            self.finish(None);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs() -> GlyphSheet {
        GlyphSheet::from_dimensions(128, 48, 64)
    }

    fn segments(path: &str) -> Vec<String> {
        path.split('/').map(str::to_string).collect()
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains(10, 10));
        assert!(rect.contains(29, 29));
        assert!(!rect.contains(30, 10));
        assert!(!rect.contains(9, 15));
    }

    #[test]
    fn test_layout_fits_viewport() {
        let layout = Layout::compute((800, 600), &segments("/home/user"), &glyphs());
        assert!(layout.outer.x >= 0);
        assert!(layout.outer.width <= 800);
        assert!(layout.rows_visible > 0);
        assert!(layout.listing.y > layout.header.y);
        assert!(layout.cancel.x < layout.select.x);
        assert_eq!(layout.segments.len(), 3);
    }

    #[test]
    fn test_layout_clamps_tiny_viewport() {
        let layout = Layout::compute((100, 80), &segments("/"), &glyphs());
        assert_eq!(layout.outer.width, MIN_DIALOG_WIDTH as u32);
        assert_eq!(layout.outer.height, MIN_DIALOG_HEIGHT as u32);
        assert!(layout.rows_visible >= 1);
    }

    #[test]
    fn test_segment_label() {
        assert_eq!(segment_label(""), "/");
        assert_eq!(segment_label("saves"), "saves");
    }
}
