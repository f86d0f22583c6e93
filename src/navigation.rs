//! Scroll-synchronized navigation state.
//!
//! [`Navigator`] owns the active section, the per-group expansion flags and the
//! narrow-layout menu visibility. Two things write to it: the per-frame scroll
//! tracker ([`Navigator::track`]) and user navigation
//! ([`Navigator::apply`] / [`Navigator::scroll_to`]). Positions are in content
//! coordinates, i.e. measured from the top of the scrolled document.

use std::collections::{HashMap, HashSet};

use crate::registry::{Registry, Section};

/// Margin added to the scroll offset so a section turns active slightly before
/// its anchor reaches the top of the viewport
pub const LOOKAHEAD: f32 = 100.0;

/// Height of the fixed header; navigation targets land this far above the anchor
pub const HEADER_OFFSET: f32 = 80.0;

/// Resolves a section id to the top of its anchor
pub trait AnchorLookup {
    fn anchor_top(&self, id: &str) -> Option<f32>;
}

/// Anchor tops recorded while laying out the document
#[derive(Default, Debug)]
pub struct Anchors {
    tops: HashMap<String, f32>,
}

impl Anchors {
    pub fn clear(&mut self) {
        self.tops.clear();
    }

    pub fn record(&mut self, id: &str, top: f32) {
        self.tops.insert(id.to_owned(), top);
    }

    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }
}

impl AnchorLookup for Anchors {
    fn anchor_top(&self, id: &str) -> Option<f32> {
        self.tops.get(id).copied()
    }
}

/// An animated scroll the view should start, in content coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub offset: f32,
}

/// A click in the navigation panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Top-level row; toggles the row's group if it has one
    Section(String),
    /// Row inside an expanded group
    Subsection(String),
}

pub struct Navigator {
    active: Option<String>,
    expanded: HashSet<String>,
    menu_open: bool,
}

impl Navigator {
    pub fn new(registry: &Registry) -> Self {
        Self {
            active: Some(registry.first_id().to_owned()),
            expanded: HashSet::new(),
            menu_open: false,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_expanded(&self, group: &str) -> bool {
        self.expanded.contains(group)
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Overlay click
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn toggle_group(&mut self, group: &str) {
        if !self.expanded.remove(group) {
            self.expanded.insert(group.to_owned());
        }
    }

    /// Recompute the active entry for the given scroll offset.
    ///
    /// Picks the last entry in document order whose anchor top is at or above
    /// `scroll_offset + LOOKAHEAD`. Entries without a laid-out anchor are skipped.
    /// If nothing qualifies the active entry is left alone. Landing on a
    /// subsection expands its group; this path never collapses one.
    ///
    /// Returns true if the active entry changed.
    pub fn track(
        &mut self,
        registry: &Registry,
        anchors: &impl AnchorLookup,
        scroll_offset: f32,
    ) -> bool {
        let effective = scroll_offset + LOOKAHEAD;

        let Some(entry) = registry.flatten().rev().find(|entry| {
            anchors
                .anchor_top(entry.id)
                .is_some_and(|top| top <= effective)
        }) else {
            return false;
        };

        if let Some(group) = entry.group {
            if !self.expanded.contains(group) {
                self.expanded.insert(group.to_owned());
            }
        }

        if self.active.as_deref() == Some(entry.id) {
            return false;
        }
        log::debug!("Active section: {} (offset {:.0})", entry.id, scroll_offset);
        self.active = Some(entry.id.to_owned());
        true
    }

    /// Navigate to `id`: returns where to scroll, and optimistically marks `id`
    /// active and closes the menu. A missing anchor makes this a no-op.
    pub fn scroll_to(&mut self, id: &str, anchors: &impl AnchorLookup) -> Option<ScrollRequest> {
        let Some(top) = anchors.anchor_top(id) else {
            log::debug!("No anchor for '{}', ignoring navigation", id);
            return None;
        };

        log::info!("Navigating to section: {}", id);
        self.active = Some(id.to_owned());
        self.menu_open = false;
        Some(ScrollRequest {
            offset: top - HEADER_OFFSET,
        })
    }

    /// Apply a navigation panel click
    pub fn apply(
        &mut self,
        action: &NavAction,
        registry: &Registry,
        anchors: &impl AnchorLookup,
    ) -> Option<ScrollRequest> {
        match action {
            NavAction::Section(id) => {
                let request = self.scroll_to(id, anchors);
                let owns_group = registry
                    .sections()
                    .iter()
                    .any(|section| section.id == *id && section.has_group());
                if owns_group {
                    self.toggle_group(id);
                }
                request
            }
            NavAction::Subsection(id) => self.scroll_to(id, anchors),
        }
    }

    /// Highlight rule for a top-level row: its own id, or any of its subsections
    pub fn is_section_active(&self, section: &Section) -> bool {
        match self.active.as_deref() {
            Some(active) => section.id == active || section.owns(active),
            None => false,
        }
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new(vec![
            Section::new("intro", "Introduction"),
            Section::new("structure", "Project Structure"),
            Section::new("redis", "Redis Rate Limiting")
                .with_subsection("redis-overview", "Overview")
                .with_subsection("redis-tips", "Pro Tips"),
        ])
        .unwrap()
    }

    fn anchors() -> Anchors {
        let mut anchors = Anchors::default();
        anchors.record("intro", 200.0);
        anchors.record("structure", 800.0);
        anchors.record("redis", 1500.0);
        anchors.record("redis-overview", 1700.0);
        anchors.record("redis-tips", 2600.0);
        anchors
    }

    #[test]
    fn test_starts_on_first_section() {
        let registry = registry();
        let nav = Navigator::new(&registry);
        assert_eq!(nav.active(), Some("intro"));
        assert!(!nav.is_menu_open());
        assert!(!nav.is_expanded("redis"));
    }

    #[test]
    fn test_track_picks_last_qualifying_entry() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        for (offset, expected) in [
            (100.0, "intro"),
            (699.0, "intro"),
            (700.0, "structure"),
            (1450.0, "redis"),
            (5000.0, "redis-tips"),
        ] {
            nav.track(&registry, &anchors, offset);
            assert_eq!(nav.active(), Some(expected), "offset {}", offset);
        }
    }

    #[test]
    fn test_track_leaves_active_alone_above_first_anchor() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        nav.track(&registry, &anchors, 750.0);
        assert_eq!(nav.active(), Some("structure"));

        // 0 + LOOKAHEAD is still above the intro anchor at 200
        assert!(!nav.track(&registry, &anchors, 0.0));
        assert_eq!(nav.active(), Some("structure"));
    }

    #[test]
    fn test_track_skips_missing_anchors() {
        let registry = registry();
        let mut anchors = Anchors::default();
        anchors.record("intro", 0.0);
        anchors.record("redis", 1500.0);
        let mut nav = Navigator::new(&registry);

        // structure is not laid out; the walk falls through to intro
        nav.track(&registry, &anchors, 900.0);
        assert_eq!(nav.active(), Some("intro"));

        nav.track(&registry, &anchors, 3000.0);
        assert_eq!(nav.active(), Some("redis"));
    }

    #[test]
    fn test_track_walks_document_order_not_position_order() {
        let registry = registry();
        let mut anchors = anchors();
        // out of order layout: the later entry wins even though its anchor is higher
        anchors.record("structure", 50.0);
        let mut nav = Navigator::new(&registry);

        nav.track(&registry, &anchors, 200.0);
        assert_eq!(nav.active(), Some("structure"));
    }

    #[test]
    fn test_scrolling_into_subsection_expands_group_and_keeps_it_open() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        // redis-overview at 1700 <= 1650 + 100, redis-tips at 2600 is beyond
        assert!(nav.track(&registry, &anchors, 1650.0));
        assert_eq!(nav.active(), Some("redis-overview"));
        assert!(nav.is_expanded("redis"));
        assert!(nav.is_section_active(&registry.sections()[2]));
        assert!(nav.is_active("redis-overview"));
        assert!(!nav.is_active("redis-tips"));

        nav.track(&registry, &anchors, 0.0);
        nav.track(&registry, &anchors, 750.0);
        assert_eq!(nav.active(), Some("structure"));
        assert!(nav.is_expanded("redis"));
        assert!(!nav.is_section_active(&registry.sections()[2]));
    }

    #[test]
    fn test_click_sets_active_immediately_and_closes_menu() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        nav.track(&registry, &anchors, 2600.0);
        assert_eq!(nav.active(), Some("redis-tips"));
        nav.toggle_menu();
        assert!(nav.is_menu_open());

        let request = nav.apply(
            &NavAction::Section("structure".into()),
            &registry,
            &anchors,
        );
        assert_eq!(request, Some(ScrollRequest { offset: 800.0 - HEADER_OFFSET }));
        assert_eq!(nav.active(), Some("structure"));
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn test_click_on_missing_anchor_is_noop() {
        let registry = registry();
        let mut anchors = Anchors::default();
        anchors.record("intro", 0.0);
        let mut nav = Navigator::new(&registry);
        nav.toggle_menu();

        let request = nav.apply(
            &NavAction::Subsection("redis-tips".into()),
            &registry,
            &anchors,
        );
        assert!(request.is_none());
        assert_eq!(nav.active(), Some("intro"));
        assert!(nav.is_menu_open());
    }

    #[test]
    fn test_group_click_toggles_once_per_click() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);
        let click = NavAction::Section("redis".into());

        nav.apply(&click, &registry, &anchors);
        assert!(nav.is_expanded("redis"));
        assert_eq!(nav.active(), Some("redis"));

        // Already active: still toggles
        nav.apply(&click, &registry, &anchors);
        assert!(!nav.is_expanded("redis"));
        nav.apply(&click, &registry, &anchors);
        assert!(nav.is_expanded("redis"));
    }

    #[test]
    fn test_plain_section_and_subsection_clicks_do_not_toggle() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        nav.apply(&NavAction::Section("structure".into()), &registry, &anchors);
        assert!(!nav.is_expanded("structure"));

        nav.toggle_group("redis");
        nav.apply(&NavAction::Subsection("redis-tips".into()), &registry, &anchors);
        assert!(nav.is_expanded("redis"));
        assert_eq!(nav.active(), Some("redis-tips"));
    }

    #[test]
    fn test_tracker_may_overwrite_optimistic_click() {
        let registry = registry();
        let anchors = anchors();
        let mut nav = Navigator::new(&registry);

        nav.apply(&NavAction::Section("intro".into()), &registry, &anchors);
        assert_eq!(nav.active(), Some("intro"));

        // A frame mid-animation recomputes from the current offset
        nav.track(&registry, &anchors, 1600.0);
        assert_eq!(nav.active(), Some("redis-overview"));
    }

    #[test]
    fn test_menu_toggle_and_overlay_close() {
        let registry = registry();
        let mut nav = Navigator::new(&registry);
        nav.toggle_menu();
        assert!(nav.is_menu_open());
        nav.toggle_menu();
        assert!(!nav.is_menu_open());
        nav.toggle_menu();
        nav.close_menu();
        assert!(!nav.is_menu_open());
    }
}
