use gpui::ScrollHandle;

/// Keeps the message pane pinned to the newest message.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    pending_scroll_to_bottom: bool,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            pending_scroll_to_bottom: false,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn is_pending(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    /// Issues the pending scroll, if any. Returns whether a scroll was issued.
    ///
    /// Called from render; the handle resolves the bottom offset at the next
    /// layout, after new rows are measured.
    pub fn apply_pending_scroll(&mut self) -> bool {
        if !self.pending_scroll_to_bottom {
            return false;
        }

        self.scroll_handle.scroll_to_bottom();
        self.pending_scroll_to_bottom = false;
        true
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}
