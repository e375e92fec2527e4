//! Tab cycling inside an open modal.

/// CSS selector for elements that take part in the trap.
pub const FOCUSABLE_SELECTOR: &str = "button:not([disabled]), [href], input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Focus trap over `len` focusable elements in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    len: usize,
}

impl FocusTrap {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Element to focus when the modal opens.
    pub fn initial(&self) -> Option<usize> {
        (self.len > 0).then_some(0)
    }

    /// Where Tab (or Shift+Tab when `backwards`) must move focus, given the
    /// index of the focused element. `None` leaves the browser's default
    /// move alone.
    pub fn on_tab(&self, current: Option<usize>, backwards: bool) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let last = self.len - 1;
        match (current, backwards) {
            (Some(0), true) => Some(last),
            (Some(i), false) if i == last => Some(0),
            // Focus escaped the panel: pull it back in.
            (None, true) => Some(last),
            (None, false) => Some(0),
            _ => None,
        }
    }
}
