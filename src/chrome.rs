//! Page chrome: scroll-driven cosmetics as pure functions.
//!
//! The host page wires these to its scroll and visibility events. None of them
//! hold state between calls except `RevealTracker`, which only remembers which
//! elements have already been revealed.

use std::collections::HashSet;

/// Scroll offset (px) past which the header switches to its compact style.
pub const HEADER_SCROLL_THRESHOLD: f64 = 100.0;
/// A section becomes active once the page is within this many px of its top.
pub const ACTIVE_SECTION_OFFSET: f64 = 200.0;
/// Fraction of an element that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Whether the header should carry its `scrolled` class.
pub fn header_is_scrolled(scroll_y: f64) -> bool {
    scroll_y > HEADER_SCROLL_THRESHOLD
}

/// Scroll position that puts a section's top just below the fixed header.
pub fn scroll_target(section_top: f64, header_height: f64) -> f64 {
    (section_top - header_height).max(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds<'a> {
    pub id: &'a str,
    pub top: f64,
}

/// Id of the section whose nav link should be marked active.
///
/// Sections are given in document order; the last one whose top is within
/// `ACTIVE_SECTION_OFFSET` of the scroll position wins.
pub fn active_section<'a>(sections: &[SectionBounds<'a>], page_offset: f64) -> Option<&'a str> {
    sections
        .iter()
        .filter(|s| page_offset >= s.top - ACTIVE_SECTION_OFFSET)
        .last()
        .map(|s| s.id)
}

/// Nav link href that matches the active section, e.g. `#rates`.
pub fn nav_href(section_id: &str) -> String {
    format!("#{section_id}")
}

/// One-shot entrance animation tracking.
#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed: HashSet<String>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a visibility change. Returns `true` only the first time the
    /// element crosses the threshold.
    pub fn observe(&mut self, element_id: &str, visible_ratio: f64) -> bool {
        if visible_ratio < REVEAL_THRESHOLD || self.revealed.contains(element_id) {
            return false;
        }
        self.revealed.insert(element_id.to_string());
        true
    }

    pub fn is_revealed(&self, element_id: &str) -> bool {
        self.revealed.contains(element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_threshold_is_exclusive() {
        assert!(!header_is_scrolled(0.0));
        assert!(!header_is_scrolled(100.0));
        assert!(header_is_scrolled(100.5));
    }

    #[test]
    fn scroll_target_subtracts_header_and_clamps() {
        assert_eq!(scroll_target(900.0, 80.0), 820.0);
        assert_eq!(scroll_target(40.0, 80.0), 0.0);
    }

    #[test]
    fn active_section_picks_last_reached() {
        let sections = [
            SectionBounds { id: "home", top: 0.0 },
            SectionBounds { id: "rates", top: 800.0 },
            SectionBounds { id: "contact", top: 1600.0 },
        ];
        assert_eq!(active_section(&sections, 0.0), Some("home"));
        assert_eq!(active_section(&sections, 599.0), Some("home"));
        assert_eq!(active_section(&sections, 600.0), Some("rates"));
        assert_eq!(active_section(&sections, 5000.0), Some("contact"));
        assert_eq!(active_section(&sections[1..], 100.0), None);
        assert_eq!(nav_href("rates"), "#rates");
    }

    #[test]
    fn reveal_is_one_shot() {
        let mut tracker = RevealTracker::new();
        assert!(!tracker.observe("card-1", 0.05));
        assert!(tracker.observe("card-1", 0.2));
        assert!(!tracker.observe("card-1", 1.0));
        assert!(tracker.is_revealed("card-1"));
        assert!(!tracker.is_revealed("card-2"));
    }
}
