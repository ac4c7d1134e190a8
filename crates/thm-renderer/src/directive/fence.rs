//! Code fence tracking.
//!
//! Statement and reference syntax inside fenced code blocks must pass
//! through untouched, so both passes feed every line through this
//! tracker before looking for directives.

/// Tracks fenced-code-block state during line-by-line processing.
///
/// Fences use three or more backticks or tildes; the closing fence
/// must use the same character and be at least as long as the opener.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the current line is inside a fenced code block.
    ///
    /// Call after [`update`](Self::update); fence marker lines
    /// themselves count as inside.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Advance the tracker by one line.
    ///
    /// Returns `true` if the line opens or closes a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(open_char) = self.fence_char {
            if closes_fence(trimmed, open_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = opens_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }
}

fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn closes_fence(trimmed: &str, open_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == open_char).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());
        assert!(!tracker.update(":::theorem"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_does_not_close() {
        let mut tracker = FenceTracker::new();
        tracker.update("````");
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("`````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_mismatched_char_does_not_close() {
        let mut tracker = FenceTracker::new();
        tracker.update("```");
        assert!(!tracker.update("~~~"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_two_backticks_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("  ```"));
        assert!(tracker.in_fence());
    }
}
