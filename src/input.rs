//! Per-frame input snapshot.
//!
//! The dialog never polls input devices: the host translates its own input
//! events into a [`FrameInput`] and hands it to the dialog once per frame.
//! Click and key fields are edges, true only on the frame the press
//! happened.

/// Keys the dialog responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move the selection up one row.
    Up,
    /// Move the selection down one row.
    Down,
    /// Move the selection up one page.
    PageUp,
    /// Move the selection down one page.
    PageDown,
    /// Activate the selection: navigate into a directory, or confirm a file.
    Enter,
    /// Navigate to the parent directory.
    Backspace,
    /// Confirm cancel.
    Escape,
}

/// One frame's worth of host input.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Pointer x position in viewport pixels.
    pub pointer_x: i32,
    /// Pointer y position in viewport pixels.
    pub pointer_y: i32,
    /// Primary button was pressed this frame.
    pub clicked: bool,
    /// Wheel steps this frame; positive scrolls toward the top.
    pub wheel: i32,
    /// Keys pressed this frame.
    pub keys: Vec<Key>,
}

impl FrameInput {
    /// Whether `key` was pressed this frame.
    pub fn key(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}
