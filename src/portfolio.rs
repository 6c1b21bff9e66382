use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::SiteConfig;
use crate::contact::{ContactForm, Transport};
use crate::content::Project;
use crate::dom::Page;
use crate::effects::Effects;
use crate::error::{report, UiError};
use crate::gallery::Gallery;
use crate::modal::DetailModal;
use crate::state::Session;
use crate::timing::{Throttle, ThrottleDecision};

/// Owns the session and every page controller. Built once per load.
pub struct Portfolio<P: Page, T> {
    page: Rc<P>,
    session: Rc<Session>,
    config: &'static SiteConfig,
    gallery: Gallery<P>,
    modal: DetailModal<P>,
    contact: Option<ContactForm<P, T>>,
    effects: Effects<P>,
    scroll_throttle: RefCell<Throttle>,
}

impl<P: Page + 'static, T: Transport + 'static> Portfolio<P, T> {
    /// Renders the gallery first so the other controllers can find its cards,
    /// then brings up the rest. A failing controller is logged and skipped.
    pub fn start(page: Rc<P>, catalog: &'static [Project], config: &'static SiteConfig, transport: T) -> Rc<Self> {
        let session = Rc::new(Session::new());
        let placeholder = config.projects.placeholder_media;

        let gallery = Gallery::new(page.clone(), session.clone(), catalog, placeholder);
        if let Some(count) = report("render_projects", gallery.render()) {
            log::info!("loaded {} project{}", count, if count == 1 { "" } else { "s" });
        }

        let modal = DetailModal::new(page.clone(), session.clone(), catalog, placeholder);
        let contact = if config.features.contact_form.enabled {
            report(
                "contact_form",
                ContactForm::attach(page.clone(), transport, &config.features.contact_form),
            )
        } else {
            None
        };
        let effects = Effects::new(page.clone(), session.clone());

        let portfolio = Rc::new(Self {
            page,
            session,
            config,
            gallery,
            modal,
            contact,
            effects,
            scroll_throttle: RefCell::new(Throttle::new(config.performance.scroll_throttle_ms)),
        });

        if config.features.enable_animations {
            portfolio.effects.reveal_visible();
        } else {
            portfolio.effects.reveal_all();
        }
        portfolio.effects.highlight_nav();
        portfolio
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gallery(&self) -> &Gallery<P> {
        &self.gallery
    }

    pub fn modal(&self) -> &DetailModal<P> {
        &self.modal
    }

    pub fn contact(&self) -> Option<&ContactForm<P, T>> {
        self.contact.as_ref()
    }

    pub fn effects(&self) -> &Effects<P> {
        &self.effects
    }

    /// Nearest enclosing project card, starting at `node` itself.
    fn card_of(&self, node: &P::Node) -> Option<P::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.page.has_class(&candidate, "project-card") {
                return Some(candidate);
            }
            current = self.page.parent(&candidate);
        }
        None
    }

    /// Opens the detail view for the card containing `node`, which may be the
    /// card itself or its "view" control.
    pub fn open_project_at(&self, node: &P::Node) {
        let result = self
            .card_of(node)
            .ok_or_else(|| UiError::missing(".project-card"))
            .and_then(|card| self.gallery.index_for_card(&card))
            .and_then(|index| self.modal.open(index));
        report("open_modal", result);
    }

    pub fn select_filter(&self, token: &str) {
        self.gallery.select_filter(token);
    }

    /// Back to every project. The caller scrolls to the gallery.
    pub fn view_all(&self) {
        self.gallery.select_filter("all");
    }

    pub fn handle_key(&self, key: &str) -> bool {
        self.modal.handle_key(key)
    }

    /// Rate-limited scroll entry point; `now_ms` is the event time.
    pub fn on_scroll(self: &Rc<Self>, now_ms: u64) {
        let decision = self.scroll_throttle.borrow_mut().call(now_ms);
        match decision {
            ThrottleDecision::FireNow => self.scroll_effects(),
            ThrottleDecision::Schedule(wait) => {
                let due = now_ms + u64::from(wait);
                let weak: Weak<Self> = Rc::downgrade(self);
                self.page.set_timeout(
                    wait,
                    Box::new(move || {
                        if let Some(portfolio) = weak.upgrade() {
                            portfolio.scroll_throttle.borrow_mut().trailing_ran(due);
                            portfolio.scroll_effects();
                        }
                    }),
                );
            }
            ThrottleDecision::Skip => {}
        }
    }

    fn scroll_effects(&self) {
        self.effects.update_header();
        if self.config.features.enable_animations {
            self.effects.reveal_visible();
        }
        self.effects.highlight_nav();
    }
}
