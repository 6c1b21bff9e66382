use std::rc::Rc;

use futures::executor::block_on;
use portfolio_site::config::{ContactFormConfig, Features, SiteConfig, DEFAULT_CONFIG, SITE_CONFIG};
use portfolio_site::contact::{ContactMessage, SubmitError, SubmitOutcome, Transport};
use portfolio_site::content::{Project, PROJECTS};
use portfolio_site::dom::Page;
use portfolio_site::filter::Filter;
use portfolio_site::memory::{MemoryPage, NodeId};
use portfolio_site::portfolio::Portfolio;
use portfolio_site::state::ModalState;

/// Accepts everything at once.
struct Outbox;

impl Transport for Outbox {
    async fn send(&self, message: &ContactMessage) -> Result<(), SubmitError> {
        assert!(!message.email.is_empty());
        Ok(())
    }
}

static TWO_PROJECTS: &[Project] = &[
    Project {
        id: 7,
        title: "Rig",
        category: "Animation",
        media_url: "https://cdn.test/rig.png",
        short_description: "Rig",
        description: "Rig",
        features: &[],
        technologies: &[],
        live_url: "#",
        source_url: "#",
    },
    Project {
        id: 9,
        title: "Store",
        category: "Web Apps",
        media_url: "https://cdn.test/store.png",
        short_description: "Store",
        description: "Store",
        features: &[],
        technologies: &[],
        live_url: "#",
        source_url: "#",
    },
];

/// The markup the page ships with, minus styling.
fn page_markup(with_form: bool) -> Rc<MemoryPage> {
    let page = Rc::new(MemoryPage::new());
    let body = page.body();

    let header = page.add(body, "header");
    page.add(header, "button.mobile-menu-btn[aria-expanded=false]");
    let nav = page.add(header, "nav.mobile-nav[hidden]");
    page.add(nav, "a.nav-link[href=#home]");
    page.add(nav, "a.nav-link[href=#projects]");

    let home = page.add(body, "section#home");
    page.set_document_span(home, 0.0, 600.0);

    let projects = page.add(body, "section#projects");
    page.set_document_span(projects, 600.0, 1200.0);
    for token in ["all", "featured", "Animation", "Web Apps"] {
        page.add(projects, &format!("button.filter-btn[data-filter={}]", token));
    }
    page.add(projects, "button#viewAllBtn");
    page.add(projects, "div.projects-grid");

    let modal = page.add(body, "div#projectModal[hidden]");
    page.add(modal, "div.modal-overlay");
    for id in [
        "modalClose",
        "modalPrevBtn",
        "modalNextBtn",
        "modalCategory",
        "modalTitle",
        "modalImage",
        "modalDescription",
        "modalFeatures",
        "modalTech",
        "modalLiveLink",
        "modalGithubLink",
    ] {
        page.add(modal, &format!("div#{}", id));
    }

    if with_form {
        let form = page.add(body, "form#contactForm");
        for (id, tag) in [("name", "input"), ("email", "input"), ("subject", "input"), ("message", "textarea")] {
            let group = page.add(form, "div.form-group");
            page.add(group, &format!("{}#{}", tag, id));
            page.add(group, "span.error-message");
        }
        page.add(form, "button.btn-submit");
    }
    page
}

static STILL: SiteConfig = SiteConfig {
    features: Features {
        enable_animations: false,
        ..DEFAULT_CONFIG.features
    },
    ..DEFAULT_CONFIG
};

static NO_CONTACT: SiteConfig = SiteConfig {
    features: Features {
        contact_form: ContactFormConfig {
            enabled: false,
            ..DEFAULT_CONFIG.features.contact_form
        },
        ..DEFAULT_CONFIG.features
    },
    ..DEFAULT_CONFIG
};

fn start(page: &Rc<MemoryPage>, catalog: &'static [Project]) -> Rc<Portfolio<MemoryPage, Outbox>> {
    start_with(page, catalog, &SITE_CONFIG)
}

fn start_with(
    page: &Rc<MemoryPage>,
    catalog: &'static [Project],
    config: &'static SiteConfig,
) -> Rc<Portfolio<MemoryPage, Outbox>> {
    Portfolio::start(page.clone(), catalog, config, Outbox)
}

fn by_id(page: &MemoryPage, id: &str) -> NodeId {
    page.element_by_id(id).expect(id)
}

#[test]
fn single_project_round_trip_through_modal() {
    let page = page_markup(true);
    let site = start(&page, PROJECTS);

    let cards = site.gallery().cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(page.attribute(&cards[0], "data-project").as_deref(), Some("1"));

    site.open_project_at(&cards[0]);
    assert_eq!(site.modal().state(), ModalState::Open(0));
    assert!(page.is_scroll_locked());
    assert_eq!(page.inner_html(by_id(&page, "modalTitle")), "Kaioken Animation");
    assert_eq!(page.focused(), page.element_by_id("modalClose"));

    assert!(site.handle_key("ArrowRight"));
    assert_eq!(site.modal().state(), ModalState::Open(0));
    assert!(site.handle_key("ArrowLeft"));
    assert_eq!(site.modal().state(), ModalState::Open(0));

    assert!(site.handle_key("Escape"));
    assert_eq!(site.modal().state(), ModalState::Closed);
    assert!(!page.is_scroll_locked());
    let modal = by_id(&page, "projectModal");
    assert_eq!(page.attribute(&modal, "aria-hidden").as_deref(), Some("true"));
    assert!(!site.handle_key("Escape"));
}

#[test]
fn view_button_and_card_open_the_same_project() {
    let page = page_markup(true);
    let site = start(&page, TWO_PROJECTS);

    let second = site.gallery().cards()[1];
    let body = page.add(second, "div.project-body");
    let button = page.add(body, "button.btn.view-project-btn");

    site.open_project_at(&button);
    assert_eq!(site.modal().state(), ModalState::Open(1));
    site.modal().close();

    site.open_project_at(&second);
    assert_eq!(site.modal().state(), ModalState::Open(1));

    assert!(site.handle_key("ArrowRight"));
    assert_eq!(site.modal().state(), ModalState::Open(0));
}

#[test]
fn stray_click_leaves_modal_closed() {
    let page = page_markup(true);
    let site = start(&page, TWO_PROJECTS);
    let outside = by_id(&page, "viewAllBtn");
    site.open_project_at(&outside);
    assert_eq!(site.modal().state(), ModalState::Closed);
}

#[test]
fn category_filter_then_view_all() {
    let page = page_markup(true);
    let site = start(&page, TWO_PROJECTS);
    let cards = site.gallery().cards();

    site.select_filter("Web Apps");
    page.advance(300);
    assert_eq!(page.style(cards[0], "display").as_deref(), Some("none"));
    assert_eq!(page.style(cards[1], "display").as_deref(), Some("block"));
    assert_eq!(site.session().active_filter(), Filter::Category("web apps".into()));

    site.view_all();
    page.advance(300);
    for card in &cards {
        assert_eq!(page.style(*card, "display").as_deref(), Some("block"));
        assert_eq!(page.style(*card, "opacity").as_deref(), Some("1"));
    }
    let all = page.query_all(".filter-btn[data-filter=all]")[0];
    assert!(page.has_class(&all, "active"));
    assert_eq!(page.attribute(&all, "aria-pressed").as_deref(), Some("true"));
}

#[test]
fn contact_form_submits_through_transport() {
    let page = page_markup(true);
    let site = start(&page, PROJECTS);
    let form = site.contact().expect("contact form attached");

    assert_eq!(block_on(form.submit()), SubmitOutcome::Invalid);

    for (id, value) in [
        ("name", "Sam"),
        ("email", "sam@example.com"),
        ("subject", "Work"),
        ("message", "Hello"),
    ] {
        page.set_value(&by_id(&page, id), value);
    }
    assert_eq!(block_on(form.submit()), SubmitOutcome::Sent);
    let status = page.query_all(".form-status")[0];
    assert!(page.inner_html(status).starts_with("Thank you, Sam!"));
}

#[test]
fn missing_form_does_not_block_the_rest() {
    let page = page_markup(false);
    let site = start(&page, PROJECTS);
    assert!(site.contact().is_none());
    assert_eq!(site.gallery().cards().len(), 1);
    assert!(page.query_all(".form-status").is_empty());
}

#[test]
fn startup_reveals_cards_in_view() {
    let page = page_markup(true);
    let site = start(&page, TWO_PROJECTS);
    for card in site.gallery().cards() {
        assert!(page.has_class(&card, "revealed"));
    }
}

#[test]
fn content_below_the_fold_waits_for_scroll() {
    let page = page_markup(true);
    let deep = page.add(page.body(), "div.scroll-reveal");
    page.set_viewport_top(deep, 5_000.0);
    start(&page, PROJECTS);
    assert!(!page.has_class(&deep, "revealed"));
}

#[test]
fn animations_off_reveals_everything_at_start() {
    let page = page_markup(true);
    let deep = page.add(page.body(), "div.scroll-reveal");
    page.set_viewport_top(deep, 5_000.0);
    let site = start_with(&page, TWO_PROJECTS, &STILL);
    assert!(page.has_class(&deep, "revealed"));
    for card in site.gallery().cards() {
        assert!(page.has_class(&card, "revealed"));
    }

    // Scrolling still drives the header but no longer reveals.
    let late = page.add(page.body(), "div.scroll-reveal-left");
    page.set_scroll_y(80.0);
    site.on_scroll(page.now_ms());
    assert!(page.has_class(&page.query_all("header")[0], "scrolled"));
    assert!(!page.has_class(&late, "revealed"));
}

#[test]
fn disabled_contact_form_is_left_alone() {
    let page = page_markup(true);
    let site = start_with(&page, PROJECTS, &NO_CONTACT);
    assert!(site.contact().is_none());
    assert!(page.query_all(".form-status").is_empty());
    assert_eq!(site.gallery().cards().len(), 1);
}

#[test]
fn menu_toggles_and_nav_link_closes_it() {
    let page = page_markup(true);
    let site = start(&page, PROJECTS);
    let button = page.query_all(".mobile-menu-btn")[0];

    site.effects().toggle_menu();
    assert!(site.session().menu_open());
    assert_eq!(page.attribute(&button, "aria-expanded").as_deref(), Some("true"));
    assert!(page.is_scroll_locked());

    site.effects().close_menu();
    assert!(!site.session().menu_open());
    assert!(!page.is_scroll_locked());
}

#[test]
fn scroll_bursts_run_leading_and_trailing() {
    let page = page_markup(true);
    let site = start(&page, PROJECTS);
    let header = page.query_all("header")[0];
    let projects_link = page.query_all("a[href=\"#projects\"]")[0];

    page.set_scroll_y(80.0);
    site.on_scroll(page.now_ms());
    assert!(page.has_class(&header, "scrolled"));

    page.advance(30);
    page.set_scroll_y(700.0);
    site.on_scroll(page.now_ms());
    page.advance(20);
    site.on_scroll(page.now_ms());
    assert_eq!(page.pending_timers(), 1);
    assert!(!page.has_class(&projects_link, "active"));

    page.advance(50);
    assert_eq!(page.pending_timers(), 0);
    assert!(page.has_class(&projects_link, "active"));

    page.set_scroll_y(0.0);
    page.advance(100);
    site.on_scroll(page.now_ms());
    assert!(!page.has_class(&header, "scrolled"));
}
