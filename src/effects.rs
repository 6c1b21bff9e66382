//! Scroll-driven page effects and the mobile menu.

use std::rc::Rc;

use crate::dom::{set_shown, Page};
use crate::state::Session;

pub const SCROLLED_THRESHOLD: f64 = 50.0;
/// How far above the viewport bottom an element's top must be to reveal.
pub const REVEAL_OFFSET: f64 = 100.0;
/// Probe distance below the scroll position used to pick the active section.
pub const NAV_PROBE_OFFSET: f64 = 150.0;
/// Room left above an anchor target for the fixed header.
pub const HEADER_OFFSET: f64 = 100.0;

pub const REVEAL_SELECTOR: &str =
    ".scroll-reveal, .scroll-reveal-left, .scroll-reveal-right, .scroll-reveal-scale";
const MENU_BUTTON: &str = ".mobile-menu-btn";
const MOBILE_NAV: &str = ".mobile-nav";

pub fn is_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLLED_THRESHOLD
}

pub fn should_reveal(top: f64, viewport_height: f64) -> bool {
    top < viewport_height - REVEAL_OFFSET
}

/// Index of the section whose `[top, top + height)` span holds the probe
/// point; later sections win when spans overlap.
pub fn active_section(spans: &[(f64, f64)], scroll_y: f64) -> Option<usize> {
    let probe = scroll_y + NAV_PROBE_OFFSET;
    spans
        .iter()
        .rposition(|&(top, height)| probe >= top && probe < top + height)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Placeholder link: only the default jump is cancelled.
    Suppress,
    ScrollTo(String),
}

/// Classifies an in-page link. `None` for anything that is not a fragment.
pub fn anchor_action(href: &str) -> Option<AnchorAction> {
    match href {
        "#" | "#!" => Some(AnchorAction::Suppress),
        _ => href
            .strip_prefix('#')
            .map(|id| AnchorAction::ScrollTo(id.to_string())),
    }
}

pub struct Effects<P: Page> {
    page: Rc<P>,
    session: Rc<Session>,
}

impl<P: Page> Effects<P> {
    pub fn new(page: Rc<P>, session: Rc<Session>) -> Self {
        Self { page, session }
    }

    fn first(&self, selector: &str) -> Option<P::Node> {
        self.page.query_all(selector).into_iter().next()
    }

    fn set_menu(&self, open: bool) {
        let (Some(button), Some(nav)) = (self.first(MENU_BUTTON), self.first(MOBILE_NAV)) else {
            log::debug!("menu: no mobile menu in markup");
            return;
        };
        self.session.set_menu_open(open);
        self.page
            .set_attribute(&button, "aria-expanded", if open { "true" } else { "false" });
        set_shown(&*self.page, &nav, open);
        self.page.lock_scroll(open);
    }

    pub fn toggle_menu(&self) {
        self.set_menu(!self.session.menu_open());
    }

    pub fn close_menu(&self) {
        self.set_menu(false);
    }

    pub fn update_header(&self) {
        let Some(header) = self.first("header") else {
            return;
        };
        if is_scrolled(self.page.scroll_y()) {
            self.page.add_class(&header, "scrolled");
        } else {
            self.page.remove_class(&header, "scrolled");
        }
    }

    /// Reveals tagged elements that have come into view. Never un-reveals.
    pub fn reveal_visible(&self) -> usize {
        let height = self.page.viewport_height();
        let mut revealed = 0;
        for node in self.page.query_all(REVEAL_SELECTOR) {
            if !self.page.has_class(&node, "revealed")
                && should_reveal(self.page.viewport_top(&node), height)
            {
                self.page.add_class(&node, "revealed");
                revealed += 1;
            }
        }
        revealed
    }

    pub fn reveal_all(&self) {
        for node in self.page.query_all(REVEAL_SELECTOR) {
            self.page.add_class(&node, "revealed");
        }
    }

    /// Marks the nav links pointing at the section under the probe point.
    pub fn highlight_nav(&self) {
        let sections = self.page.query_all("section[id]");
        let spans: Vec<_> = sections.iter().map(|s| self.page.document_span(s)).collect();
        let Some(active) = active_section(&spans, self.page.scroll_y()) else {
            return;
        };
        let Some(id) = self.page.attribute(&sections[active], "id") else {
            return;
        };
        for link in self.page.query_all(".nav-link") {
            self.page.remove_class(&link, "active");
        }
        for link in self.page.query_all(&format!("a[href=\"#{}\"]", id)) {
            self.page.add_class(&link, "active");
        }
    }

    /// Document offset to scroll to for a fragment target, if it exists.
    pub fn anchor_scroll_top(&self, id: &str) -> Option<f64> {
        let target = self.page.element_by_id(id)?;
        Some(self.page.viewport_top(&target) + self.page.scroll_y() - HEADER_OFFSET)
    }
}
