use super::timer::CancelableTimer;

/// How long a driven pane ignores its own scroll events.
///
/// Roughly four frames at 60Hz.
pub const SCROLL_SYNC_WINDOW_MS: u64 = 66;

/// One of the two scrollable panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }
}

/// Instruction to move `target` to `offset`, produced by [`ScrollLink::on_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollDrive {
    pub target: Pane,
    pub offset: usize,
}

#[derive(Debug, Clone)]
struct Listener {
    attached: bool,
    reattach: CancelableTimer,
}

impl Listener {
    const fn new(window_ms: u64) -> Self {
        Self {
            attached: true,
            reattach: CancelableTimer::new(window_ms),
        }
    }
}

/// Keeps the editor and preview scroll offsets equal.
///
/// Exists only while both panes are on screen; dropping it is the
/// teardown. When one pane's scroll event drives the other, the driven
/// pane's listener is detached until the window elapses, so the
/// programmatic scroll it receives does not bounce back.
#[derive(Debug, Clone)]
pub struct ScrollLink {
    editor: Listener,
    preview: Listener,
}

impl ScrollLink {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            editor: Listener::new(window_ms),
            preview: Listener::new(window_ms),
        }
    }

    const fn listener(&self, pane: Pane) -> &Listener {
        match pane {
            Pane::Editor => &self.editor,
            Pane::Preview => &self.preview,
        }
    }

    const fn listener_mut(&mut self, pane: Pane) -> &mut Listener {
        match pane {
            Pane::Editor => &mut self.editor,
            Pane::Preview => &mut self.preview,
        }
    }

    /// Whether scroll events from `pane` are currently acted on.
    pub const fn is_listening(&self, pane: Pane) -> bool {
        self.listener(pane).attached
    }

    /// Handle a scroll event from `source`, now at `offset`.
    ///
    /// Returns the drive for the other pane, or `None` when `source` is
    /// itself suppressed.
    pub fn on_scroll(&mut self, source: Pane, offset: usize, now_ms: u64) -> Option<ScrollDrive> {
        if !self.is_listening(source) {
            tracing::trace!(?source, offset, "scroll event suppressed");
            return None;
        }
        let target = source.other();
        let listener = self.listener_mut(target);
        listener.attached = false;
        listener.reattach.start(now_ms);
        Some(ScrollDrive { target, offset })
    }

    /// Reattach listeners whose window has elapsed. Returns `true` if any
    /// listener changed state.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let mut changed = false;
        for pane in [Pane::Editor, Pane::Preview] {
            let listener = self.listener_mut(pane);
            if listener.reattach.take_ready(now_ms) {
                listener.attached = true;
                changed = true;
            }
        }
        changed
    }

    /// Earliest pending reattach deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        [self.editor.reattach.deadline(), self.preview.reattach.deadline()]
            .into_iter()
            .flatten()
            .min()
    }
}

impl Default for ScrollLink {
    fn default() -> Self {
        Self::new(SCROLL_SYNC_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_listens_to_both_panes() {
        let link = ScrollLink::default();
        assert!(link.is_listening(Pane::Editor));
        assert!(link.is_listening(Pane::Preview));
        assert_eq!(link.next_deadline(), None);
    }

    #[test]
    fn test_editor_scroll_drives_preview_and_mutes_it() {
        let mut link = ScrollLink::default();
        let drive = link.on_scroll(Pane::Editor, 42, 0);
        assert_eq!(
            drive,
            Some(ScrollDrive {
                target: Pane::Preview,
                offset: 42
            })
        );
        assert!(!link.is_listening(Pane::Preview));
        assert!(link.is_listening(Pane::Editor));
    }

    #[test]
    fn test_driven_pane_echo_is_suppressed() {
        let mut link = ScrollLink::default();
        link.on_scroll(Pane::Preview, 10, 0);
        assert_eq!(link.on_scroll(Pane::Editor, 10, 1), None);
    }

    #[test]
    fn test_listener_reattaches_after_window() {
        let mut link = ScrollLink::new(66);
        link.on_scroll(Pane::Editor, 5, 100);
        assert!(!link.poll(165));
        assert!(!link.is_listening(Pane::Preview));
        assert!(link.poll(166));
        assert!(link.is_listening(Pane::Preview));
        assert_eq!(link.next_deadline(), None);
    }

    #[test]
    fn test_repeated_source_events_debounce_reattach() {
        let mut link = ScrollLink::new(66);
        link.on_scroll(Pane::Editor, 1, 0);
        link.on_scroll(Pane::Editor, 2, 50);
        link.poll(70);
        assert!(!link.is_listening(Pane::Preview));
        link.poll(116);
        assert!(link.is_listening(Pane::Preview));
    }

    #[test]
    fn test_timers_are_independent_per_pane() {
        let mut link = ScrollLink::new(66);
        link.on_scroll(Pane::Editor, 1, 0);
        // Preview is muted; its event must not touch the editor's timer.
        assert_eq!(link.on_scroll(Pane::Preview, 1, 10), None);
        assert_eq!(link.next_deadline(), Some(66));
        link.poll(66);
        // Now the user scrolls the preview; the editor is muted in turn.
        assert!(link.on_scroll(Pane::Preview, 9, 70).is_some());
        assert!(!link.is_listening(Pane::Editor));
        link.poll(136);
        assert!(link.is_listening(Pane::Editor));
        assert!(link.is_listening(Pane::Preview));
    }

    #[test]
    fn test_rapid_alternation_never_leaves_a_pane_muted() {
        let mut link = ScrollLink::new(66);
        let mut now = 0;
        for i in 0..20 {
            let source = if i % 2 == 0 { Pane::Editor } else { Pane::Preview };
            link.on_scroll(source, i, now);
            link.poll(now);
            now += 20;
        }
        let last = link.next_deadline().unwrap_or(now);
        link.poll(last);
        assert!(link.is_listening(Pane::Editor));
        assert!(link.is_listening(Pane::Preview));
    }
}
