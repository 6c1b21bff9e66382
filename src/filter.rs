/// How many leading cards the `featured` filter keeps.
pub const FEATURED_COUNT: usize = 3;

/// A gallery filter, parsed from a filter button's `data-filter` token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    /// The first [`FEATURED_COUNT`] cards by position, whatever their category says.
    Featured,
    /// Case-insensitive substring of the category text, stored lowercased.
    Category(String),
}

impl Filter {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("all") {
            Filter::All
        } else if token.eq_ignore_ascii_case("featured") {
            Filter::Featured
        } else {
            Filter::Category(token.to_lowercase())
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Featured => "featured",
            Filter::Category(needle) => needle,
        }
    }

    /// Whether the card at `position` (render order) with `category` stays visible.
    pub fn admits(&self, position: usize, category: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Featured => position < FEATURED_COUNT,
            Filter::Category(needle) => category.to_lowercase().contains(needle.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORIES: [&str; 5] = [
        "Animation • Featured",
        "VFX",
        "Web Apps",
        "Games • Featured",
        "UI/UX",
    ];

    fn visible(filter: &Filter) -> Vec<usize> {
        CATEGORIES
            .iter()
            .enumerate()
            .filter(|(i, c)| filter.admits(*i, c))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn all_shows_everything() {
        assert_eq!(visible(&Filter::parse("all")), vec![0, 1, 2, 3, 4]);
        assert_eq!(visible(&Filter::parse("")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn featured_is_positional() {
        assert_eq!(visible(&Filter::parse("featured")), vec![0, 1, 2]);
        assert_eq!(visible(&Filter::parse("FEATURED")), vec![0, 1, 2]);
    }

    #[test]
    fn category_is_case_insensitive_substring() {
        assert_eq!(visible(&Filter::parse("vfx")), vec![1]);
        assert_eq!(visible(&Filter::parse("Apps")), vec![2]);
        assert_eq!(visible(&Filter::parse("ui/ux")), vec![4]);
        assert_eq!(visible(&Filter::parse("anim")), vec![0]);
        assert!(visible(&Filter::parse("3d models")).is_empty());
    }

    #[test]
    fn token_round_trips_for_buttons() {
        assert_eq!(Filter::parse(" All ").token(), "all");
        assert_eq!(Filter::parse("Web").token(), "web");
    }
}
