//! End-to-end dialog scenarios against a recording bridge host.

use std::cell::RefCell;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use framepick::{
    AtlasOptions, ContractViolation, DialogError, DialogStatus, FileDialogs, FrameInput,
    FrameLoopHost, Key, RenderHost, ScissorRect, SkinRegion, TextureHandle,
};

// ============================================================================
// Recording host
// ============================================================================

#[derive(Debug)]
enum Call {
    CreateTexture { width: u32, height: u32 },
    Upload { vertex_len: usize, index_len: usize },
    Draw { element_count: u32 },
}

#[derive(Default)]
struct RecordingHost {
    calls: Vec<Call>,
    vertex_capacity: usize,
    index_capacity: usize,
    fail_next_upload: bool,
    next_texture: u64,
}

impl RecordingHost {
    fn uploads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .count()
    }

    fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Draw { .. }))
            .count()
    }

    fn textures(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::CreateTexture { .. }))
            .count()
    }
}

impl RenderHost for RecordingHost {
    fn create_texture(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> anyhow::Result<TextureHandle> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.calls.push(Call::CreateTexture { width, height });
        self.next_texture += 1;
        Ok(TextureHandle(self.next_texture))
    }

    fn upload_buffers(&mut self, vertices: &[u8], indices: &[u8]) -> anyhow::Result<()> {
        if self.fail_next_upload {
            self.fail_next_upload = false;
            anyhow::bail!("simulated device loss");
        }
        // Grow, never shrink.
        self.vertex_capacity = self.vertex_capacity.max(vertices.len());
        self.index_capacity = self.index_capacity.max(indices.len());
        self.calls.push(Call::Upload {
            vertex_len: vertices.len(),
            index_len: indices.len(),
        });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        _scissor: ScissorRect,
        _vertex_offset: u32,
        _vertex_count: u32,
        _index_offset: u32,
        element_count: u32,
    ) -> anyhow::Result<()> {
        assert_eq!(element_count % 3, 0, "triangle lists only");
        self.calls.push(Call::Draw { element_count });
        Ok(())
    }
}

/// Blocking-mode host: replays a scripted input sequence, then keeps
/// pressing escape so a runaway loop still terminates.
#[derive(Default)]
struct ScriptedLoopHost {
    inner: RecordingHost,
    frames: Vec<FrameInput>,
    cursor: usize,
}

impl RenderHost for ScriptedLoopHost {
    fn create_texture(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> anyhow::Result<TextureHandle> {
        self.inner.create_texture(pixels, width, height)
    }

    fn upload_buffers(&mut self, vertices: &[u8], indices: &[u8]) -> anyhow::Result<()> {
        self.inner.upload_buffers(vertices, indices)
    }

    fn draw_indexed(
        &mut self,
        scissor: ScissorRect,
        vertex_offset: u32,
        vertex_count: u32,
        index_offset: u32,
        element_count: u32,
    ) -> anyhow::Result<()> {
        self.inner.draw_indexed(
            scissor,
            vertex_offset,
            vertex_count,
            index_offset,
            element_count,
        )
    }
}

impl FrameLoopHost for ScriptedLoopHost {
    fn begin_frame(&mut self) -> anyhow::Result<FrameInput> {
        let input = self
            .frames
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| input_with(&[Key::Escape]));
        self.cursor += 1;
        Ok(input)
    }

    fn end_frame(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn write_skin_bundle(dir: &Path) {
    let skin = image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]));
    skin.save(dir.join("FileDialogTexture.png")).unwrap();
    let font = image::RgbaImage::from_pixel(128, 48, image::Rgba([255, 255, 255, 255]));
    font.save(dir.join("FileDialogFont.png")).unwrap();
    fs::write(dir.join("FileDialogSprites.txt"), manifest()).unwrap();
}

fn manifest() -> String {
    SkinRegion::ALL
        .iter()
        .enumerate()
        .map(|(i, region)| {
            format!(
                "{}:{},{},16,16\n",
                region.manifest_name(),
                (i % 4) * 16,
                (i / 4) * 16
            )
        })
        .collect()
}

fn load_dialogs(skin_dir: &Path) -> FileDialogs {
    write_skin_bundle(skin_dir);
    FileDialogs::load_skin(skin_dir, AtlasOptions::default()).unwrap()
}

/// Start directory with one subdirectory and one save file, matching the
/// classic save/load scenario.
fn saves_dir(root: &Path) -> PathBuf {
    let saves = root.join("saves");
    fs::create_dir(&saves).unwrap();
    fs::create_dir(saves.join("backups")).unwrap();
    File::create(saves.join("save1.dat")).unwrap();
    saves
}

/// Start directory with more files than fit on one listing page.
fn crowded_dir(root: &Path) -> PathBuf {
    let dir = root.join("archive");
    fs::create_dir(&dir).unwrap();
    for i in 0..40 {
        File::create(dir.join(format!("save{i:02}.dat"))).unwrap();
    }
    dir
}

fn input_with(keys: &[Key]) -> FrameInput {
    FrameInput {
        viewport_width: 800,
        viewport_height: 600,
        keys: keys.to_vec(),
        ..Default::default()
    }
}

fn pointer_at(x: i32, y: i32) -> FrameInput {
    FrameInput {
        viewport_width: 800,
        viewport_height: 600,
        pointer_x: x,
        pointer_y: y,
        ..Default::default()
    }
}

fn click_at(x: i32, y: i32) -> FrameInput {
    FrameInput {
        clicked: true,
        ..pointer_at(x, y)
    }
}

fn wheel_input(delta: i32) -> FrameInput {
    FrameInput {
        viewport_width: 800,
        viewport_height: 600,
        wheel: delta,
        ..Default::default()
    }
}

type Results = Rc<RefCell<Vec<Option<PathBuf>>>>;

fn collector() -> (Results, impl FnOnce(Option<PathBuf>)) {
    let results: Results = Rc::new(RefCell::new(Vec::new()));
    let slot = results.clone();
    (results, move |path| slot.borrow_mut().push(path))
}

// ============================================================================
// Skin lifecycle
// ============================================================================

#[test]
fn test_skin_load_reports_all_regions() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());

    let skin = dialogs.skin();
    // 64x64 skin over a 128x48 font sheet.
    assert_eq!((skin.width, skin.height), (128, 112));
    for region in SkinRegion::ALL {
        assert_eq!(skin.atlas.get(region).width, 16);
    }
    assert!(dialogs.unload_skin().is_ok());
}

#[test]
fn test_malformed_manifest_fails_load() {
    let tmp = tempfile::tempdir().unwrap();
    write_skin_bundle(tmp.path());

    for bad in ["home_icon:1,2,3\n", "home_icon:1,2,x,4\n", "home_icon\n"] {
        fs::write(tmp.path().join("FileDialogSprites.txt"), format!("{}{bad}", manifest()))
            .unwrap();
        // Duplicate home_icon or malformed line; either way the load fails
        // and no subsystem starts.
        assert!(FileDialogs::load_skin(tmp.path(), AtlasOptions::default()).is_err());
    }
}

#[test]
fn test_unload_refused_while_dialog_open() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    let (dialogs, violation) = dialogs.unload_skin().unwrap_err();
    assert_eq!(violation, ContractViolation::SkinInUse);

    drop(dialog);
    assert_eq!(results.borrow().len(), 1);
    assert!(dialogs.unload_skin().is_ok());
}

// ============================================================================
// Open contract
// ============================================================================

#[test]
fn test_double_open_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (first_results, on_first) = collector();
    let mut first = dialogs.open(&saves, &mut host, on_first).unwrap();

    let (second_results, on_second) = collector();
    let err = dialogs.open(&saves, &mut host, on_second).unwrap_err();
    assert!(matches!(
        err,
        DialogError::Contract(ContractViolation::DialogAlreadyOpen)
    ));
    // The rejected continuation is dropped uninvoked.
    assert!(second_results.borrow().is_empty());

    // The live instance is untouched and still drives frames.
    let status = first.frame(&input_with(&[]), &mut host).unwrap();
    assert_eq!(status, DialogStatus::Active);
    assert!(first_results.borrow().is_empty());
}

#[test]
fn test_empty_start_directory_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let err = dialogs.open(Path::new(""), &mut host, on_result).unwrap_err();
    assert!(matches!(
        err,
        DialogError::Contract(ContractViolation::EmptyStartDirectory)
    ));
    assert!(results.borrow().is_empty());
    assert!(!dialogs.dialog_active());
}

#[test]
fn test_unreadable_start_directory_aborts_open() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let err = dialogs
        .open(&tmp.path().join("nope"), &mut host, on_result)
        .unwrap_err();
    assert!(matches!(err, DialogError::Navigation(_)));
    assert!(results.borrow().is_empty());
    // The slot is free again.
    let (_, on_result) = collector();
    let saves = saves_dir(tmp.path());
    assert!(dialogs.open(&saves, &mut host, on_result).is_ok());
}

// ============================================================================
// Selection and cancellation
// ============================================================================

#[test]
fn test_select_flow_reports_path_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    let state = dialog.directory();
    assert_eq!(state.child_directories, vec!["backups"]);
    assert_eq!(state.child_files, vec!["save1.dat"]);
    let expected_segments: Vec<String> = saves
        .to_string_lossy()
        .split('/')
        .map(str::to_string)
        .collect();
    assert_eq!(state.path_segments, expected_segments);

    // Down selects the directory row; no file is armed yet, so a confirm
    // would be a no-op.
    dialog.frame(&input_with(&[Key::Down]), &mut host).unwrap();
    assert_eq!(dialog.pending_file(), None);
    dialog.frame(&input_with(&[Key::Enter]), &mut host).unwrap();

    // Enter on the directory navigated into backups; go back up and walk to
    // the file row.
    assert!(dialog.directory().current_path.ends_with("backups"));
    dialog
        .frame(&input_with(&[Key::Backspace]), &mut host)
        .unwrap();
    dialog.frame(&input_with(&[Key::Down]), &mut host).unwrap();
    dialog.frame(&input_with(&[Key::Down]), &mut host).unwrap();
    assert_eq!(dialog.pending_file(), Some("save1.dat"));

    let status = dialog.frame(&input_with(&[Key::Enter]), &mut host).unwrap();
    assert_eq!(status, DialogStatus::Closed);

    let results = results.borrow();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], Some(saves.join("save1.dat")));
    assert_eq!(dialogs.last_directory(), Some(saves.clone()));
    assert!(!dialogs.dialog_active());
}

#[test]
fn test_cancel_flow_reports_absence_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();
    dialog.frame(&input_with(&[]), &mut host).unwrap();

    let status = dialog
        .frame(&input_with(&[Key::Escape]), &mut host)
        .unwrap();
    assert_eq!(status, DialogStatus::Closed);

    // Frames after close are inert.
    let status = dialog.frame(&input_with(&[]), &mut host).unwrap();
    assert_eq!(status, DialogStatus::Closed);

    assert_eq!(*results.borrow(), vec![None]);
    // A cancelled session leaves the remembered directory untouched.
    assert_eq!(dialogs.last_directory(), None);
}

#[test]
fn test_drop_counts_as_cancel() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let dialog = dialogs.open(&saves, &mut host, on_result).unwrap();
    drop(dialog);

    assert_eq!(*results.borrow(), vec![None]);
    assert!(!dialogs.dialog_active());
    let (_, on_result) = collector();
    assert!(dialogs.open(&saves, &mut host, on_result).is_ok());
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_navigation_error_keeps_dialog_open() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    // The listing was enumerated at open; pull the directory out from under
    // the dialog and try to enter it.
    fs::remove_dir(saves.join("backups")).unwrap();
    dialog.frame(&input_with(&[Key::Down]), &mut host).unwrap();
    let status = dialog.frame(&input_with(&[Key::Enter]), &mut host).unwrap();

    assert_eq!(status, DialogStatus::Active);
    assert!(dialog.error_text().is_some());
    // Previous listing and path stay intact.
    assert_eq!(dialog.directory().current_path, saves);
    assert_eq!(dialog.directory().child_directories, vec!["backups"]);
    assert!(results.borrow().is_empty());

    // The next successful navigation clears the error.
    dialog
        .frame(&input_with(&[Key::Backspace]), &mut host)
        .unwrap();
    assert!(dialog.error_text().is_none());
    assert_eq!(dialog.directory().current_path, tmp.path());
}

#[test]
fn test_directory_read_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let saves = saves_dir(tmp.path());

    let first = framepick::DirectoryState::read(&saves).unwrap();
    let second = framepick::DirectoryState::read(&saves).unwrap();
    assert_eq!(first.child_directories, second.child_directories);
    assert_eq!(first.child_files, second.child_files);
}

// ============================================================================
// Bridge discipline
// ============================================================================

#[test]
fn test_bridge_call_order_and_upload_elision() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();
    dialog.frame(&input_with(&[]), &mut host).unwrap();
    dialog.frame(&input_with(&[]), &mut host).unwrap();

    // Texture creation happens exactly once, at open, before anything else.
    assert_eq!(host.textures(), 1);
    assert!(matches!(host.calls[0], Call::CreateTexture { width: 128, height: 112 }));

    // Geometry did not change between the two frames: one upload, draws
    // re-issued every frame.
    assert_eq!(host.uploads(), 1);
    assert!(host.draws() >= 2);
    let first_upload = host
        .calls
        .iter()
        .position(|c| matches!(c, Call::Upload { .. }))
        .unwrap();
    let first_draw = host
        .calls
        .iter()
        .position(|c| matches!(c, Call::Draw { .. }))
        .unwrap();
    assert!(first_upload < first_draw);

    // A state change re-uploads.
    dialog.frame(&input_with(&[Key::Down]), &mut host).unwrap();
    assert_eq!(host.uploads(), 2);
}

#[test]
fn test_host_buffers_grow_and_never_shrink() {
    let mut host = RecordingHost::default();
    host.upload_buffers(&[0u8; 100], &[0u8; 24]).unwrap();
    assert!(host.vertex_capacity >= 100);
    host.upload_buffers(&[0u8; 40], &[0u8; 12]).unwrap();
    assert!(host.vertex_capacity >= 100);
    assert!(host.index_capacity >= 24);
}

#[test]
fn test_host_failure_closes_session_with_absence() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    host.fail_next_upload = true;
    let err = dialog.frame(&input_with(&[]), &mut host).unwrap_err();
    assert!(matches!(err, DialogError::Host(_)));

    assert_eq!(*results.borrow(), vec![None]);
    assert_eq!(dialog.status(), DialogStatus::Closed);
    assert_eq!(dialogs.last_directory(), None);
    assert!(!dialogs.dialog_active());
}

// ============================================================================
// Pointer model
// ============================================================================
//
// Dialog geometry at 800x600: outer panel at (120,90) sized 560x420, header
// band y 98..126 with the home icon at (128,104) and path segments from
// x 152, listing at (128,126) with 22 px rows, cancel/select icons at
// (616,480) and (648,480).

#[test]
fn test_click_file_row_then_select_icon() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    // Row 1 (y 148..170) is save1.dat; clicking it arms the selection.
    dialog.frame(&click_at(200, 150), &mut host).unwrap();
    assert_eq!(dialog.pending_file(), Some("save1.dat"));

    let status = dialog.frame(&click_at(655, 490), &mut host).unwrap();
    assert_eq!(status, DialogStatus::Closed);
    assert_eq!(*results.borrow(), vec![Some(saves.join("save1.dat"))]);
    assert_eq!(dialogs.last_directory(), Some(saves));
}

#[test]
fn test_click_directory_row_navigates() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    // Row 0 (y 126..148) is the backups directory.
    dialog.frame(&click_at(200, 130), &mut host).unwrap();
    assert!(dialog.directory().current_path.ends_with("backups"));
    assert_eq!(dialog.pending_file(), None);
}

#[test]
fn test_click_cancel_icon() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (results, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    let status = dialog.frame(&click_at(620, 490), &mut host).unwrap();
    assert_eq!(status, DialogStatus::Closed);
    assert_eq!(*results.borrow(), vec![None]);
    assert_eq!(dialogs.last_directory(), None);
}

#[test]
fn test_click_home_icon_returns_to_start() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    dialog.frame(&click_at(200, 130), &mut host).unwrap();
    assert!(dialog.directory().current_path.ends_with("backups"));

    dialog.frame(&click_at(132, 110), &mut host).unwrap();
    assert_eq!(dialog.directory().current_path, saves);
}

#[test]
fn test_click_root_segment_navigates() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    // The first header segment is the filesystem root.
    dialog.frame(&click_at(154, 104), &mut host).unwrap();
    assert_eq!(dialog.directory().current_path, Path::new("/"));
}

#[test]
fn test_hover_rebuilds_geometry() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&saves, &mut host, on_result).unwrap();

    dialog.frame(&input_with(&[]), &mut host).unwrap();
    assert_eq!(host.uploads(), 1);

    // Hovering a row highlights it, so the geometry re-uploads once; holding
    // the pointer still does not.
    dialog.frame(&pointer_at(200, 150), &mut host).unwrap();
    assert_eq!(host.uploads(), 2);
    dialog.frame(&pointer_at(200, 150), &mut host).unwrap();
    assert_eq!(host.uploads(), 2);
}

#[test]
fn test_wheel_scroll_clamps_to_content() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let archive = crowded_dir(tmp.path());
    let mut host = RecordingHost::default();

    let (_, on_result) = collector();
    let mut dialog = dialogs.open(&archive, &mut host, on_result).unwrap();
    dialog.frame(&input_with(&[]), &mut host).unwrap();
    assert_eq!(host.uploads(), 1);

    // Scrolling moves the listing and re-uploads; a clamped scroll at either
    // end changes nothing, so no upload happens.
    dialog.frame(&wheel_input(-1), &mut host).unwrap();
    assert_eq!(host.uploads(), 2);
    dialog.frame(&wheel_input(-100), &mut host).unwrap();
    assert_eq!(host.uploads(), 3);
    dialog.frame(&wheel_input(-1), &mut host).unwrap();
    assert_eq!(host.uploads(), 3);
    dialog.frame(&wheel_input(100), &mut host).unwrap();
    assert_eq!(host.uploads(), 4);
    dialog.frame(&wheel_input(1), &mut host).unwrap();
    assert_eq!(host.uploads(), 4);
}

// ============================================================================
// Synchronous mode
// ============================================================================

#[test]
fn test_open_sync_select() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());

    let mut host = ScriptedLoopHost {
        frames: vec![
            input_with(&[Key::Down]),
            input_with(&[Key::Down]),
            input_with(&[Key::Enter]),
        ],
        ..Default::default()
    };

    let result = dialogs.open_sync(&saves, &mut host).unwrap();
    assert_eq!(result, Some(saves.join("save1.dat")));
    assert_eq!(dialogs.last_directory(), Some(saves));
    assert!(!dialogs.dialog_active());
}

#[test]
fn test_open_sync_cancel() {
    let tmp = tempfile::tempdir().unwrap();
    let dialogs = load_dialogs(tmp.path());
    let saves = saves_dir(tmp.path());

    let mut host = ScriptedLoopHost {
        frames: vec![input_with(&[]), input_with(&[Key::Escape])],
        ..Default::default()
    };

    let result = dialogs.open_sync(&saves, &mut host).unwrap();
    assert_eq!(result, None);
    assert_eq!(dialogs.last_directory(), None);
}
