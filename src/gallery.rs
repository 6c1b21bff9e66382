use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::content::{index_of, Project};
use crate::dom::Page;
use crate::error::UiError;
use crate::filter::Filter;
use crate::markup::card_markup;
use crate::state::Session;

pub const GRID_SELECTOR: &str = ".projects-grid";
pub const FILTER_BUTTON_SELECTOR: &str = ".filter-btn";
/// Fade-out length before a filtered card leaves the layout.
pub const HIDE_DELAY_MS: u32 = 300;
/// Gap between re-entering the layout and fading in, so the transition runs.
pub const SHOW_DELAY_MS: u32 = 10;

const RENDER_ERROR_HTML: &str = "<p>Error loading projects. Please refresh the page.</p>";

/// Project cards: rendering, filtering and card → project lookup.
pub struct Gallery<P: Page> {
    page: Rc<P>,
    session: Rc<Session>,
    catalog: &'static [Project],
    placeholder: &'static str,
    cards: RefCell<Vec<P::Node>>,
    // Bumped by every filter pass; pending fades from older passes are dropped.
    generation: Rc<Cell<u64>>,
}

impl<P: Page + 'static> Gallery<P> {
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
            cards: RefCell::new(Vec::new()),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Renders one card per project into the grid. Cards are built detached
    /// and attached in one go; on failure the grid shows an error notice.
    pub fn render(&self) -> Result<usize, UiError> {
        let grid = self
            .page
            .query_all(GRID_SELECTOR)
            .into_iter()
            .next()
            .ok_or_else(|| UiError::missing(GRID_SELECTOR))?;

        let attached = self.build_cards().and_then(|cards| {
            self.page.replace_children(&grid, &cards)?;
            Ok(cards)
        });

        match attached {
            Ok(cards) => {
                let count = cards.len();
                *self.cards.borrow_mut() = cards;
                log::debug!("render_projects: {} card(s)", count);
                Ok(count)
            }
            Err(e) => {
                self.cards.borrow_mut().clear();
                self.page.set_inner_html(&grid, RENDER_ERROR_HTML);
                Err(e)
            }
        }
    }

    fn build_cards(&self) -> Result<Vec<P::Node>, UiError> {
        self.catalog
            .iter()
            .map(|project| {
                let card = self.page.create_element("article")?;
                self.page.set_class_name(&card, "project-card scroll-reveal-scale");
                self.page.set_attribute(&card, "data-project", &project.id.to_string());
                self.page.set_attribute(&card, "role", "listitem");
                self.page.set_inner_html(&card, &card_markup(project, self.placeholder));
                Ok(card)
            })
            .collect()
    }

    pub fn cards(&self) -> Vec<P::Node> {
        self.cards.borrow().clone()
    }

    /// Catalog index of the project a card (or any element carrying
    /// `data-project`) stands for.
    pub fn index_for_card(&self, card: &P::Node) -> Result<usize, UiError> {
        let raw = self
            .page
            .attribute(card, "data-project")
            .ok_or_else(|| UiError::missing("data-project"))?;
        let id: u32 = raw
            .trim()
            .parse()
            .map_err(|_| UiError::Dom(format!("bad project id `{}`", raw)))?;
        index_of(self.catalog, id).ok_or(UiError::UnknownProjectId(id))
    }

    /// Marks the matching filter button, records the filter and applies it.
    pub fn select_filter(&self, token: &str) {
        let filter = Filter::parse(token);
        for button in self.page.query_all(FILTER_BUTTON_SELECTOR) {
            let selected = self
                .page
                .attribute(&button, "data-filter")
                .map(|t| Filter::parse(&t) == filter)
                .unwrap_or(false);
            if selected {
                self.page.add_class(&button, "active");
            } else {
                self.page.remove_class(&button, "active");
            }
            self.page
                .set_attribute(&button, "aria-pressed", if selected { "true" } else { "false" });
        }
        self.apply_filter(&filter);
        self.session.set_active_filter(filter);
    }

    pub fn apply_filter(&self, filter: &Filter) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        for (position, card) in self.cards.borrow().iter().enumerate() {
            let Ok(index) = self.index_for_card(card) else {
                self.page.set_style(card, "display", "none");
                continue;
            };
            let shown = filter.admits(position, self.catalog[index].category);

            let page = self.page.clone();
            let current = self.generation.clone();
            let target = card.clone();
            if shown {
                self.page.set_style(card, "display", "block");
                self.page.set_timeout(
                    SHOW_DELAY_MS,
                    Box::new(move || {
                        if current.get() == generation {
                            page.set_style(&target, "opacity", "1");
                            page.add_class(&target, "revealed");
                        }
                    }),
                );
            } else {
                self.page.set_style(card, "opacity", "0");
                self.page.remove_class(card, "revealed");
                self.page.set_timeout(
                    HIDE_DELAY_MS,
                    Box::new(move || {
                        if current.get() == generation {
                            page.set_style(&target, "display", "none");
                        }
                    }),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryPage, NodeId};

    static CATALOG: &[Project] = &[
        Project {
            id: 10,
            title: "Kaioken <Animation>",
            category: "Animation • Featured",
            media_url: "https://imgur.com/uZVZq0R",
            short_description: "Short & sweet",
            description: "Long",
            features: &["Rigging"],
            technologies: &["Blender"],
            live_url: "#",
            source_url: "#",
        },
        Project {
            id: 20,
            title: "Shop",
            category: "Web Apps",
            media_url: "https://cdn.test/shop.png",
            short_description: "A store",
            description: "Long",
            features: &[],
            technologies: &[],
            live_url: "#",
            source_url: "#",
        },
        Project {
            id: 30,
            title: "Blast",
            category: "VFX",
            media_url: "https://cdn.test/blast.webm",
            short_description: "Boom",
            description: "Long",
            features: &[],
            technologies: &[],
            live_url: "#",
            source_url: "#",
        },
        Project {
            id: 40,
            title: "Dungeon",
            category: "Games • Featured",
            media_url: "https://cdn.test/dungeon.gif",
            short_description: "Crawl",
            description: "Long",
            features: &[],
            technologies: &[],
            live_url: "#",
            source_url: "#",
        },
    ];

    fn gallery() -> (Rc<MemoryPage>, Gallery<MemoryPage>, NodeId) {
        let page = Rc::new(MemoryPage::new());
        let grid = page.add(page.body(), "div.projects-grid");
        let gallery = Gallery::new(page.clone(), Rc::new(Session::new()), CATALOG, "none.svg");
        (page, gallery, grid)
    }

    fn displayed(page: &MemoryPage, gallery: &Gallery<MemoryPage>) -> Vec<usize> {
        gallery
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| page.style(**c, "display").as_deref() != Some("none"))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn renders_cards_in_order() {
        let (page, gallery, grid) = gallery();
        assert_eq!(gallery.render(), Ok(4));
        let cards = page.children(grid);
        assert_eq!(cards, gallery.cards());
        let ids: Vec<_> = cards
            .iter()
            .map(|c| page.attribute(c, "data-project").unwrap_or_default())
            .collect();
        assert_eq!(ids, ["10", "20", "30", "40"]);
        assert!(page.has_class(&cards[0], "project-card"));
        assert!(page.has_class(&cards[0], "scroll-reveal-scale"));
        let html = page.inner_html(cards[0]);
        assert!(html.contains("Kaioken &lt;Animation&gt;"));
        assert!(html.contains("Short &amp; sweet"));
        assert!(html.contains("https://i.imgur.com/uZVZq0R.mp4"));
    }

    #[test]
    fn missing_grid_is_reported() {
        let page = Rc::new(MemoryPage::new());
        let gallery = Gallery::new(page, Rc::new(Session::new()), CATALOG, "none.svg");
        assert_eq!(gallery.render(), Err(UiError::missing(GRID_SELECTOR)));
        assert!(gallery.cards().is_empty());
    }

    #[test]
    fn failed_build_leaves_error_notice_and_no_cards() {
        let (page, gallery, grid) = gallery();
        gallery.render().expect("render");
        assert_eq!(gallery.cards().len(), 4);

        page.fail_creates_after(2);
        let err = gallery.render().expect_err("third card cannot be built");
        assert!(matches!(err, UiError::Dom(_)));
        assert_eq!(page.inner_html(grid), RENDER_ERROR_HTML);
        assert!(page.children(grid).is_empty());
        assert!(page.query_all(".project-card").is_empty());
        assert!(gallery.cards().is_empty());
    }

    #[test]
    fn card_lookup_resolves_project_index() {
        let (_page, gallery, _grid) = gallery();
        gallery.render().expect("render");
        let cards = gallery.cards();
        assert_eq!(gallery.index_for_card(&cards[2]), Ok(2));
    }

    #[test]
    fn featured_keeps_first_three_positions() {
        let (page, gallery, _grid) = gallery();
        gallery.render().expect("render");
        gallery.apply_filter(&Filter::parse("featured"));
        page.advance(u64::from(HIDE_DELAY_MS));
        assert_eq!(displayed(&page, &gallery), vec![0, 1, 2]);
    }

    #[test]
    fn category_filter_fades_then_hides() {
        let (page, gallery, _grid) = gallery();
        gallery.render().expect("render");
        gallery.apply_filter(&Filter::parse("featured games"));
        gallery.apply_filter(&Filter::parse("GAMES"));
        let cards = gallery.cards();
        assert_eq!(page.style(cards[0], "opacity").as_deref(), Some("0"));
        assert_eq!(page.style(cards[0], "display"), None);

        page.advance(u64::from(HIDE_DELAY_MS));
        assert_eq!(displayed(&page, &gallery), vec![3]);
        assert!(page.has_class(&cards[3], "revealed"));
        assert_eq!(page.style(cards[3], "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn newer_filter_cancels_pending_hide() {
        let (page, gallery, _grid) = gallery();
        gallery.render().expect("render");
        gallery.apply_filter(&Filter::parse("vfx"));
        page.advance(100);
        gallery.apply_filter(&Filter::All);
        page.advance(u64::from(HIDE_DELAY_MS));
        assert_eq!(displayed(&page, &gallery), vec![0, 1, 2, 3]);
    }

    #[test]
    fn select_filter_marks_single_button() {
        let (page, gallery, _grid) = gallery();
        let all = page.add(page.body(), "button.filter-btn.active[data-filter=all]");
        let vfx = page.add(page.body(), "button.filter-btn[data-filter=vfx]");
        gallery.render().expect("render");
        gallery.select_filter("vfx");
        assert!(!page.has_class(&all, "active"));
        assert_eq!(page.attribute(&all, "aria-pressed").as_deref(), Some("false"));
        assert!(page.has_class(&vfx, "active"));
        assert_eq!(page.attribute(&vfx, "aria-pressed").as_deref(), Some("true"));
        assert_eq!(gallery.session.active_filter(), Filter::parse("vfx"));
    }
}
