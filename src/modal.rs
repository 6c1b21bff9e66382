use std::rc::Rc;

use crate::content::Project;
use crate::dom::{set_shown, Page};
use crate::error::UiError;
use crate::markup::{escape_html, list_markup, media_markup, MediaSlot};
use crate::state::{ModalState, Session};

pub const MODAL_ID: &str = "projectModal";
pub const CLOSE_ID: &str = "modalClose";
pub const PREV_ID: &str = "modalPrevBtn";
pub const NEXT_ID: &str = "modalNextBtn";
pub const OVERLAY_SELECTOR: &str = ".modal-overlay";

/// Resolved once per `open` so nothing is written until every target exists.
struct DetailView<N> {
    modal: N,
    category: N,
    title: N,
    media: N,
    description: N,
    features: N,
    technologies: N,
    live_link: N,
    source_link: N,
}

pub struct DetailModal<P: Page> {
    page: Rc<P>,
    session: Rc<Session>,
    catalog: &'static [Project],
    placeholder: &'static str,
}

impl<P: Page> DetailModal<P> {
    pub fn new(
        page: Rc<P>,
        session: Rc<Session>,
        catalog: &'static [Project],
        placeholder: &'static str,
    ) -> Self {
        Self {
            page,
            session,
            catalog,
            placeholder,
        }
    }

    pub fn state(&self) -> ModalState {
        self.session.modal()
    }

    fn view(&self) -> Result<DetailView<P::Node>, UiError> {
        let find = |id: &str| self.page.element_by_id(id).ok_or_else(|| UiError::missing(id));
        Ok(DetailView {
            modal: find(MODAL_ID)?,
            category: find("modalCategory")?,
            title: find("modalTitle")?,
            media: find("modalImage")?,
            description: find("modalDescription")?,
            features: find("modalFeatures")?,
            technologies: find("modalTech")?,
            live_link: find("modalLiveLink")?,
            source_link: find("modalGithubLink")?,
        })
    }

    /// Shows project `index`. On error neither the view nor the state changes.
    pub fn open(&self, index: usize) -> Result<(), UiError> {
        let project = self.catalog.get(index).ok_or(UiError::NoSuchProject {
            index,
            len: self.catalog.len(),
        })?;
        let view = self.view()?;
        let page = &*self.page;

        page.set_inner_html(&view.category, &escape_html(project.category));
        page.set_inner_html(&view.title, &escape_html(project.title));
        page.set_inner_html(&view.media, &media_markup(project, MediaSlot::Detail, self.placeholder));
        page.set_inner_html(&view.description, &escape_html(project.description));
        page.set_inner_html(&view.features, &list_markup(project.features));
        page.set_inner_html(&view.technologies, &list_markup(project.technologies));
        page.set_attribute(&view.live_link, "href", project.live_url);
        page.set_attribute(&view.source_link, "href", project.source_url);

        set_shown(page, &view.modal, true);
        page.set_attribute(&view.modal, "aria-hidden", "false");
        page.lock_scroll(true);
        self.session.set_modal(ModalState::Open(index));

        // Navigation wraps, so both directions are always available.
        for id in [PREV_ID, NEXT_ID] {
            if let Some(button) = page.element_by_id(id) {
                page.set_disabled(&button, false);
            }
        }
        if let Some(close) = page.element_by_id(CLOSE_ID) {
            page.focus(&close);
        }
        log::debug!("modal: open {} ({})", index, project.title);
        Ok(())
    }

    pub fn close(&self) {
        if !self.session.modal().is_open() {
            return;
        }
        if let Some(modal) = self.page.element_by_id(MODAL_ID) {
            set_shown(&*self.page, &modal, false);
            self.page.set_attribute(&modal, "aria-hidden", "true");
        }
        self.page.lock_scroll(false);
        self.session.set_modal(ModalState::Closed);
    }

    /// Steps `delta` projects away from the open one, wrapping at both ends.
    pub fn navigate(&self, delta: isize) -> Result<(), UiError> {
        let index = self.session.modal().index().ok_or(UiError::ModalClosed)?;
        if self.catalog.is_empty() {
            return Err(UiError::NoSuchProject { index, len: 0 });
        }
        let len = self.catalog.len() as isize;
        let next = (index as isize + delta).rem_euclid(len) as usize;
        self.open(next)
    }

    /// Keyboard shortcuts while open. Returns whether the key was consumed,
    /// in which case the browser default should be suppressed.
    pub fn handle_key(&self, key: &str) -> bool {
        if !self.session.modal().is_open() {
            return false;
        }
        let result = match key {
            "Escape" => {
                self.close();
                Ok(())
            }
            "ArrowLeft" => self.navigate(-1),
            "ArrowRight" => self.navigate(1),
            _ => return false,
        };
        if let Err(e) = result {
            log::error!("modal: {}: {}", key, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryPage, NodeId};

    static CATALOG: &[Project] = &[
        Project {
            id: 1,
            title: "Rig <One>",
            category: "Animation • Featured",
            media_url: "https://imgur.com/uZVZq0R",
            short_description: "s",
            description: "Bones & \"joints\"",
            features: &["IK", "<b>FK</b>"],
            technologies: &["Blender"],
            live_url: "https://live.test/one",
            source_url: "https://git.test/one",
        },
        Project {
            id: 2,
            title: "Two",
            category: "Web Apps",
            media_url: "two.png",
            short_description: "s",
            description: "d",
            features: &[],
            technologies: &["Rust"],
            live_url: "#",
            source_url: "#",
        },
        Project {
            id: 3,
            title: "Three",
            category: "VFX",
            media_url: "",
            short_description: "s",
            description: "d",
            features: &[],
            technologies: &[],
            live_url: "#",
            source_url: "#",
        },
    ];

    const DETAIL_IDS: [&str; 8] = [
        "modalCategory",
        "modalTitle",
        "modalImage",
        "modalDescription",
        "modalFeatures",
        "modalTech",
        "modalLiveLink",
        "modalGithubLink",
    ];

    fn page_with_modal() -> (Rc<MemoryPage>, NodeId) {
        let page = Rc::new(MemoryPage::new());
        let modal = page.add(page.body(), "div#projectModal.modal[hidden]");
        page.add(modal, "div.modal-overlay");
        page.add(modal, "button#modalClose");
        page.add(modal, "button#modalPrevBtn");
        page.add(modal, "button#modalNextBtn");
        for id in DETAIL_IDS {
            page.add(modal, &format!("div#{}", id));
        }
        (page, modal)
    }

    fn modal(page: &Rc<MemoryPage>) -> DetailModal<MemoryPage> {
        DetailModal::new(page.clone(), Rc::new(Session::new()), CATALOG, "placeholder.svg")
    }

    fn html(page: &MemoryPage, id: &str) -> String {
        page.inner_html(page.element_by_id(id).expect(id))
    }

    #[test]
    fn open_fills_every_field_escaped() {
        let (page, root) = page_with_modal();
        let modal = modal(&page);
        modal.open(0).expect("open");

        assert_eq!(html(&page, "modalCategory"), "Animation • Featured");
        assert_eq!(html(&page, "modalTitle"), "Rig &lt;One&gt;");
        assert_eq!(html(&page, "modalDescription"), "Bones &amp; &quot;joints&quot;");
        assert_eq!(html(&page, "modalFeatures"), "<li>IK</li><li>&lt;b&gt;FK&lt;/b&gt;</li>");
        assert_eq!(html(&page, "modalTech"), "<li>Blender</li>");
        assert!(html(&page, "modalImage").contains(r#"src="https://i.imgur.com/uZVZq0R.mp4""#));
        let live = page.element_by_id("modalLiveLink").expect("live");
        assert_eq!(page.attribute(&live, "href").as_deref(), Some("https://live.test/one"));

        assert_eq!(modal.state(), ModalState::Open(0));
        assert_eq!(page.attribute(&root, "hidden"), None);
        assert_eq!(page.style(root, "display").as_deref(), Some("block"));
        assert!(page.is_scroll_locked());
        assert_eq!(page.focused(), page.element_by_id(CLOSE_ID));
    }

    #[test]
    fn out_of_range_open_changes_nothing() {
        let (page, _) = page_with_modal();
        let modal = modal(&page);
        modal.open(1).expect("open");
        let err = modal.open(3).expect_err("out of range");
        assert_eq!(err, UiError::NoSuchProject { index: 3, len: 3 });
        assert_eq!(modal.state(), ModalState::Open(1));
        assert_eq!(html(&page, "modalTitle"), "Two");
    }

    #[test]
    fn missing_target_prevents_partial_update() {
        let page = Rc::new(MemoryPage::new());
        page.add(page.body(), "div#projectModal");
        page.add(page.body(), "div#modalTitle");
        let modal = modal(&page);
        assert_eq!(modal.open(0), Err(UiError::missing("modalCategory")));
        assert_eq!(html(&page, "modalTitle"), "");
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!page.is_scroll_locked());
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let (page, _) = page_with_modal();
        let modal = modal(&page);
        modal.open(2).expect("open");
        modal.navigate(1).expect("next");
        assert_eq!(modal.state(), ModalState::Open(0));
        modal.navigate(-1).expect("prev");
        assert_eq!(modal.state(), ModalState::Open(2));
        for delta in [5, -7, 1, -1, 300] {
            modal.navigate(delta).expect("navigate");
            let index = modal.state().index().expect("open");
            assert!(index < CATALOG.len());
        }
    }

    #[test]
    fn navigate_requires_open_modal() {
        let (page, _) = page_with_modal();
        assert_eq!(modal(&page).navigate(1), Err(UiError::ModalClosed));
    }

    #[test]
    fn keys_only_act_while_open() {
        let (page, root) = page_with_modal();
        let modal = modal(&page);
        assert!(!modal.handle_key("Escape"));
        modal.open(0).expect("open");
        assert!(modal.handle_key("ArrowLeft"));
        assert_eq!(modal.state(), ModalState::Open(2));
        assert!(modal.handle_key("ArrowRight"));
        assert_eq!(modal.state(), ModalState::Open(0));
        assert!(!modal.handle_key("Enter"));
        assert!(modal.handle_key("Escape"));
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!page.is_scroll_locked());
        assert_eq!(page.attribute(&root, "hidden").as_deref(), Some(""));
    }

    #[test]
    fn close_is_idempotent() {
        let (page, _) = page_with_modal();
        let modal = modal(&page);
        modal.close();
        page.lock_scroll(true);
        modal.close();
        assert!(page.is_scroll_locked(), "closing a closed modal leaves scroll alone");
    }
}
