//! Scroll state for one pane.

use std::ops::Range;

/// The visible window over a pane's lines.
///
/// Every mutator clamps the offset to `0..=max_offset()` and reports
/// whether it actually moved, which is what counts as a scroll event.
///
/// ```
/// use splitmark::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 100);
/// assert!(vp.set_offset(500));
/// assert_eq!(vp.offset(), 80);
/// assert!(!vp.set_offset(80));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Largest offset that still fills the pane.
    pub const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.offset..(self.offset + self.height as usize).min(self.total_lines)
    }

    /// Position through the content, 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        let percent = self.offset.saturating_mul(100) / max;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    /// Move to `offset`, clamped. Returns `true` if the offset changed.
    pub fn set_offset(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.max_offset());
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    pub fn scroll_by(&mut self, delta: isize) -> bool {
        self.set_offset(self.offset.saturating_add_signed(delta))
    }

    pub const fn page(&self) -> usize {
        let h = self.height as usize;
        if h > 1 { h - 1 } else { 1 }
    }

    /// Scroll the minimum needed for `line` to be on screen.
    pub fn reveal(&mut self, line: usize) -> bool {
        if line < self.offset {
            self.set_offset(line)
        } else if self.height > 0 && line >= self.offset + self.height as usize {
            self.set_offset(line + 1 - self.height as usize)
        } else {
            false
        }
    }

    /// Returns `true` if the resize moved the offset.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        self.width = width;
        self.height = height;
        self.set_offset(self.offset)
    }

    /// Returns `true` if the new length moved the offset.
    pub fn set_total_lines(&mut self, total: usize) -> bool {
        self.total_lines = total;
        self.set_offset(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_tracks_offset() {
        let mut vp = Viewport::new(40, 10, 30);
        assert_eq!(vp.visible_range(), 0..10);
        vp.set_offset(15);
        assert_eq!(vp.visible_range(), 15..25);
        vp.set_offset(100);
        assert_eq!(vp.visible_range(), 20..30);
    }

    #[test]
    fn test_short_content_cannot_scroll() {
        let mut vp = Viewport::new(40, 10, 4);
        assert_eq!(vp.max_offset(), 0);
        assert!(!vp.scroll_by(3));
        assert_eq!(vp.visible_range(), 0..4);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_by_reports_change() {
        let mut vp = Viewport::new(40, 10, 30);
        assert!(vp.scroll_by(5));
        assert!(vp.scroll_by(-2));
        assert_eq!(vp.offset(), 3);
        assert!(vp.scroll_by(-10));
        assert!(!vp.scroll_by(-1));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_reveal_scrolls_minimally() {
        let mut vp = Viewport::new(40, 10, 50);
        assert!(!vp.reveal(9));
        assert!(vp.reveal(10));
        assert_eq!(vp.offset(), 1);
        assert!(vp.reveal(0));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = Viewport::new(40, 10, 50);
        vp.set_offset(40);
        assert!(vp.set_total_lines(20));
        assert_eq!(vp.offset(), 10);
        assert!(vp.resize(40, 20));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = Viewport::new(40, 10, 110);
        assert_eq!(vp.scroll_percent(), 0);
        vp.set_offset(50);
        assert_eq!(vp.scroll_percent(), 50);
        vp.set_offset(100);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_page_leaves_one_line_of_context() {
        assert_eq!(Viewport::new(40, 10, 0).page(), 9);
        assert_eq!(Viewport::new(40, 1, 0).page(), 1);
    }
}
