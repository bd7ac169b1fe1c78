//! Shared scroll state for the gutter, highlighted overlay and edit region.
//!
//! The three regions never keep their own offsets: they all render from one
//! [`Viewport`], so they cannot drift apart.

use std::ops::Range;

/// The visible window over the buffer, in lines and display columns.
///
/// # Example
///
/// ```
/// use pseudopad::editor::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    top: usize,
    left: usize,
    total_lines: usize,
    content_width: usize,
}

impl Viewport {
    /// Create a viewport of `width` x `height` cells over `total_lines` lines.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            top: 0,
            left: 0,
            total_lines,
            content_width: 0,
        }
    }

    /// First visible line.
    pub const fn top(&self) -> usize {
        self.top
    }

    /// First visible display column.
    pub const fn left(&self) -> usize {
        self.left
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

    /// Range of buffer lines currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.top.min(self.total_lines);
        let end = (self.top + self.height as usize).min(self.total_lines);
        start..end
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.top > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.top < self.max_top()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.top = self.top.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.top = (self.top + n).min(self.max_top());
    }

    pub const fn scroll_left(&mut self, n: usize) {
        self.left = self.left.saturating_sub(n);
    }

    pub fn scroll_right(&mut self, n: usize) {
        self.left = (self.left + n).min(self.content_width);
    }

    /// Resize the viewport, keeping the offsets valid.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.top = self.top.min(self.max_top());
    }

    /// Update the buffer extent after an edit.
    pub fn set_extent(&mut self, total_lines: usize, content_width: usize) {
        self.total_lines = total_lines;
        self.content_width = content_width;
        self.top = self.top.min(self.max_top());
        self.left = self.left.min(content_width);
    }

    /// Scroll the minimum amount so `(line, col)` is on screen, where `col`
    /// is a display column and `text_width` the columns available for text.
    pub fn ensure_visible(&mut self, line: usize, col: usize, text_width: usize) {
        let height = self.height as usize;
        if height > 0 {
            if line < self.top {
                self.top = line;
            } else if line >= self.top + height {
                self.top = line + 1 - height;
            }
        }

        let text_width = text_width.max(1);
        if col < self.left {
            self.left = col;
        } else if col >= self.left + text_width {
            self.left = col + 1 - text_width;
        }
    }

    const fn max_top(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_origin() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.top(), 0);
        assert_eq!(vp.left(), 0);
    }

    #[test]
    fn test_visible_range_with_short_buffer() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.top(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.top(), 0);
    }

    #[test]
    fn test_scroll_right_clamps_to_content_width() {
        let mut vp = Viewport::new(20, 5, 3);
        vp.set_extent(3, 30);
        vp.scroll_right(100);
        assert_eq!(vp.left(), 30);
        vp.scroll_left(12);
        assert_eq!(vp.left(), 18);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(15, 0, 70);
        assert_eq!(vp.top(), 6);
        assert_eq!(vp.visible_range(), 6..16);
    }

    #[test]
    fn test_ensure_visible_scrolls_up_to_line() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(50);
        vp.ensure_visible(20, 0, 70);
        assert_eq!(vp.top(), 20);
    }

    #[test]
    fn test_ensure_visible_scrolls_horizontally() {
        let mut vp = Viewport::new(40, 10, 5);
        vp.set_extent(5, 200);
        vp.ensure_visible(0, 50, 30);
        assert_eq!(vp.left(), 21);
        vp.ensure_visible(0, 3, 30);
        assert_eq!(vp.left(), 3);
    }

    #[test]
    fn test_set_extent_clamps_offsets_after_shrink() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(80);
        vp.set_extent(50, 0);
        assert_eq!(vp.top(), 26);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.top(), 40);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn visible_range_within_bounds(
                total_lines in 0..10000usize,
                height in 1..100u16,
                offset in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(offset);

                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
            }

            #[test]
            fn ensure_visible_puts_line_on_screen(
                total_lines in 1..5000usize,
                height in 1..100u16,
                start in 0..5000usize,
                target in 0..5000usize,
            ) {
                let target = target % total_lines;
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(start);
                vp.ensure_visible(target, 0, 70);
                prop_assert!(vp.visible_range().contains(&target));
            }
        }
    }
}
