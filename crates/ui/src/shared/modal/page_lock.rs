/// Page state captured when the first modal mounts and handed back once the
/// last one has left.
///
/// Stacked modals share one capture, so the value returned on release is
/// always what the page had before any modal opened.
#[derive(Debug)]
pub struct PageLock<S> {
    held: Option<S>,
}

impl<S> PageLock<S> {
    pub fn new() -> Self {
        Self { held: None }
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Follow the layer: capture on the first mount, release when empty.
    ///
    /// `capture` only runs when nothing is held yet. Returns the captured
    /// state when the layer has emptied.
    pub fn sync(&mut self, any_mounted: bool, capture: impl FnOnce() -> S) -> Option<S> {
        if any_mounted {
            if self.held.is_none() {
                self.held = Some(capture());
            }
            None
        } else {
            self.held.take()
        }
    }
}

impl<S> Default for PageLock<S> {
    fn default() -> Self {
        Self::new()
    }
}
