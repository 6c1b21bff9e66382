//! Browser wiring: attaches DOM listeners that forward into [`Portfolio`],
//! plus the few effects that only exist in a real browser (smooth scrolling,
//! lazy video loading, theme variables, wireframe canvases).

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, ErrorEvent, Event, HtmlElement, HtmlMediaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, PromiseRejectionEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions,
};

use crate::config::{parse_hex_color, theme_variables, SiteConfig, SITE_CONFIG};
use crate::contact::SimulatedTransport;
use crate::content::PROJECTS;
use crate::dom::Page;
use crate::effects::{anchor_action, AnchorAction};
use crate::error::{report, UiError};
use crate::portfolio::Portfolio;
use crate::web_page::WebPage;
use crate::wireframe::{self, WireframeSettings};

type Site = Portfolio<WebPage, SimulatedTransport>;

fn on(target: &Element, event: &'static str, handler: impl FnMut(&Event) + 'static) {
    EventListener::new(target, event, handler).forget();
}

/// Like [`on`], but the handler may call `prevent_default`.
fn on_active(target: &Element, event: &'static str, handler: impl FnMut(&Event) + 'static) {
    EventListener::new_with_options(target, event, EventListenerOptions::enable_prevent_default(), handler).forget();
}

pub fn start() -> Result<(), UiError> {
    let config: &'static SiteConfig = &SITE_CONFIG;
    let page = Rc::new(WebPage::new()?);

    install_global_handlers(&page);
    publish_theme(&page, config);

    let site = Site::start(page.clone(), PROJECTS, config, SimulatedTransport);

    wire_gallery(&page, &site);
    wire_modal(&page, &site);
    wire_contact(&page, &site);
    wire_menu(&page, &site);
    wire_scroll(&page, &site);
    wire_anchors(&page, &site);
    report("lazy_videos", observe_lazy_videos(&page, config));

    if config.features.enable_wireframes {
        start_wireframes(&page, config);
    }
    log::info!("portfolio initialized");
    Ok(())
}

fn install_global_handlers(page: &WebPage) {
    EventListener::new(page.window(), "error", |event| {
        if let Some(event) = event.dyn_ref::<ErrorEvent>() {
            log::error!("uncaught: {} ({}:{})", event.message(), event.filename(), event.lineno());
        }
    })
    .forget();
    EventListener::new(page.window(), "unhandledrejection", |event| {
        if let Some(event) = event.dyn_ref::<PromiseRejectionEvent>() {
            log::error!("unhandled rejection: {:?}", event.reason());
        }
    })
    .forget();
}

fn publish_theme(page: &WebPage, config: &SiteConfig) {
    let Some(root) = page
        .document()
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    for (name, value) in theme_variables(&config.theme) {
        if let Err(e) = root.style().set_property(&name, value) {
            log::warn!("theme: {}: {:?}", name, e);
        }
    }
}

fn wire_gallery(page: &Rc<WebPage>, site: &Rc<Site>) {
    for card in site.gallery().cards() {
        let site = site.clone();
        let target = card.clone();
        on(&card, "click", move |event| {
            // Clicks on the card's own controls are handled by those controls.
            let on_control = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".btn").ok().flatten())
                .is_some();
            if !on_control {
                site.open_project_at(&target);
            }
        });
    }

    for button in page.query_all(".view-project-btn") {
        let site = site.clone();
        let target = button.clone();
        on(&button, "click", move |event| {
            event.stop_propagation();
            site.open_project_at(&target);
        });
    }

    for button in page.query_all(".filter-btn") {
        let site = site.clone();
        let target = button.clone();
        on(&button, "click", move |_| {
            let token = target.get_attribute("data-filter").unwrap_or_default();
            site.select_filter(&token);
        });
    }

    if let Some(button) = page.element_by_id("viewAllBtn") {
        let site = site.clone();
        let page = page.clone();
        on(&button, "click", move |_| {
            site.view_all();
            if let Some(section) = page.element_by_id("projects") {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                section.scroll_into_view_with_scroll_into_view_options(&options);
            }
        });
    }
}

fn wire_modal(page: &Rc<WebPage>, site: &Rc<Site>) {
    let Some(modal) = page.element_by_id(crate::modal::MODAL_ID) else {
        log::debug!("modal: not in markup");
        return;
    };

    let close_targets = page
        .element_by_id(crate::modal::CLOSE_ID)
        .into_iter()
        .chain(page.query_within(&modal, crate::modal::OVERLAY_SELECTOR));
    for target in close_targets {
        let site = site.clone();
        on(&target, "click", move |_| site.modal().close());
    }

    for (id, delta) in [(crate::modal::PREV_ID, -1), (crate::modal::NEXT_ID, 1)] {
        if let Some(button) = page.element_by_id(id) {
            let site = site.clone();
            on(&button, "click", move |_| {
                report("navigate_projects", site.modal().navigate(delta));
            });
        }
    }

    let site = site.clone();
    EventListener::new_with_options(
        page.document(),
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                if site.handle_key(&event.key()) {
                    event.prevent_default();
                }
            }
        },
    )
    .forget();
}

fn wire_contact(page: &WebPage, site: &Rc<Site>) {
    let Some(form) = site.contact() else {
        return;
    };

    for field in form.field_nodes() {
        let blur_site = site.clone();
        let target = field.clone();
        on(field, "blur", move |_| {
            if let Some(form) = blur_site.contact() {
                // The inline error is the user-facing outcome.
                let _ = form.validate_field(&target);
            }
        });

        let input_site = site.clone();
        let target = field.clone();
        on(field, "input", move |_| {
            if let Some(form) = input_site.contact() {
                form.on_input(&target);
            }
        });
    }

    let Some(element) = page.element_by_id(crate::contact::FORM_ID) else {
        return;
    };
    let site = site.clone();
    on_active(&element, "submit", move |event| {
        event.prevent_default();
        let site = site.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(form) = site.contact() {
                let outcome = form.submit().await;
                log::debug!("contact: {:?}", outcome);
            }
        });
    });
}

fn wire_menu(page: &Rc<WebPage>, site: &Rc<Site>) {
    if let Some(button) = page.query_all(".mobile-menu-btn").into_iter().next() {
        let site = site.clone();
        on(&button, "click", move |_| site.effects().toggle_menu());
    }
    for link in page.query_all(".mobile-nav .nav-link") {
        let site = site.clone();
        on(&link, "click", move |_| site.effects().close_menu());
    }
}

fn wire_scroll(page: &Rc<WebPage>, site: &Rc<Site>) {
    let site = site.clone();
    EventListener::new(page.window(), "scroll", move |_| {
        site.on_scroll(js_sys::Date::now() as u64);
    })
    .forget();
}

fn wire_anchors(page: &Rc<WebPage>, site: &Rc<Site>) {
    for anchor in page.query_all("a[href^=\"#\"]") {
        let site = site.clone();
        let page = page.clone();
        let target = anchor.clone();
        on_active(&anchor, "click", move |event| {
            let href = target.get_attribute("href").unwrap_or_default();
            match anchor_action(&href) {
                Some(AnchorAction::Suppress) => event.prevent_default(),
                Some(AnchorAction::ScrollTo(id)) => {
                    if let Some(top) = site.effects().anchor_scroll_top(&id) {
                        event.prevent_default();
                        let options = ScrollToOptions::new();
                        options.set_top(top);
                        options.set_behavior(ScrollBehavior::Smooth);
                        page.window().scroll_to_with_scroll_to_options(&options);
                    }
                }
                None => {}
            }
        });
    }
}

/// Gallery videos carry their URL in `data-src` until they come near the viewport.
fn observe_lazy_videos(page: &WebPage, config: &SiteConfig) -> Result<(), UiError> {
    let videos = page.query_all("video");
    if videos.is_empty() {
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(video) = target.dyn_ref::<HtmlMediaElement>() {
                    if video.src().is_empty() {
                        load_deferred_source(video);
                    }
                }
                observer.unobserve(&target);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_root_margin(&format!("{}px", config.performance.lazy_load_offset_px));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(|e| UiError::Dom(format!("{:?}", e)))?;
    for video in &videos {
        observer.observe(video);
    }
    callback.forget();
    Ok(())
}

fn load_deferred_source(video: &HtmlMediaElement) {
    let Ok(Some(source)) = video.query_selector("source") else {
        return;
    };
    if let Some(src) = source.get_attribute("data-src") {
        let _ = source.set_attribute("src", &src);
        video.load();
    }
}

fn prefers_reduced_motion(page: &WebPage) -> bool {
    page.window()
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

fn start_wireframes(page: &WebPage, config: &SiteConfig) {
    let still = config.performance.respect_reduced_motion && prefers_reduced_motion(page);
    let color = parse_hex_color(config.theme.accent).unwrap_or_else(|| {
        log::warn!("wireframe: bad accent `{}`", config.theme.accent);
        [1.0, 1.0, 1.0]
    });
    let settings = WireframeSettings {
        color,
        opacity: config.wireframes.opacity,
        spin: config.wireframes.spin,
        animate: !still,
        max_pixel_ratio: config.performance.max_pixel_ratio,
        resize_debounce_ms: config.performance.resize_debounce_ms,
    };
    for &(canvas_id, geometry) in config.wireframes.canvases {
        report("create_wireframe", wireframe::spawn(canvas_id, geometry, settings));
    }
}
