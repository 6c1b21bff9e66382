//! Site-wide settings. Everything here is `'static` and therefore frozen
//! once the module is compiled in.

#[derive(Debug)]
pub struct SiteConfig {
    pub personal: Personal,
    pub contact: Contact,
    pub seo: Seo,
    pub theme: Theme,
    pub features: Features,
    pub projects: ProjectsConfig,
    pub performance: Performance,
    pub wireframes: WireframeConfig,
}

#[derive(Debug)]
pub struct Personal {
    pub name: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub location: &'static str,
}

#[derive(Debug)]
pub struct Contact {
    pub email: &'static str,
    pub phone: &'static str,
    pub social: &'static [(&'static str, &'static str)],
    pub resume_url: &'static str,
}

#[derive(Debug)]
pub struct Seo {
    pub site_name: &'static str,
    pub site_url: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct Theme {
    /// `(token, css colour)` pairs, published as `--color-<token>`.
    pub colors: &'static [(&'static str, &'static str)],
    pub accent: &'static str,
    pub animations: AnimationSpeeds,
}

/// Transition durations in milliseconds.
#[derive(Debug)]
pub struct AnimationSpeeds {
    pub fast: u32,
    pub normal: u32,
    pub slow: u32,
}

#[derive(Debug)]
pub struct Features {
    pub enable_animations: bool,
    pub enable_wireframes: bool,
    pub contact_form: ContactFormConfig,
}

#[derive(Debug)]
pub struct ContactFormConfig {
    pub enabled: bool,
    pub endpoint: &'static str,
    pub max_message_length: usize,
    /// Refuse a submit while another one is still in flight.
    pub single_flight: bool,
}

#[derive(Debug)]
pub struct ProjectsConfig {
    pub categories: &'static [&'static str],
    pub placeholder_media: &'static str,
}

#[derive(Debug)]
pub struct Performance {
    pub lazy_load_offset_px: u32,
    pub scroll_throttle_ms: u32,
    pub resize_debounce_ms: u32,
    pub max_pixel_ratio: f64,
    pub respect_reduced_motion: bool,
}

#[derive(Debug)]
pub struct WireframeConfig {
    pub opacity: f32,
    /// Radians added per frame around x and y.
    pub spin: (f32, f32),
    /// `(canvas id, geometry name)` pairs.
    pub canvases: &'static [(&'static str, &'static str)],
}

/// Settings the page ships with. Variants are built from it with struct
/// update syntax.
pub const DEFAULT_CONFIG: SiteConfig = SiteConfig {
    personal: Personal {
        name: "Deven Hodder",
        title: "Freelancer & Developer",
        tagline: "Full-stack developer, 3D artist, and UI/UX designer",
        location: "Available for remote work worldwide",
    },
    contact: Contact {
        email: "drhodder1@gmail.com",
        phone: "+1 (602) 615-7923",
        social: &[
            ("github", "https://github.com/yourusername"),
            ("linkedin", "https://linkedin.com/in/yourusername"),
            ("twitter", "https://twitter.com/yourusername"),
            ("instagram", "https://instagram.com/yourusername"),
            ("tiktok", "https://tiktok.com/@yourusername"),
        ],
        resume_url: "resume.pdf",
    },
    seo: Seo {
        site_name: "Deven Hodder Portfolio",
        site_url: "https://devenhodder.com",
        description: "Full-stack developer, 3D artist, and UI/UX designer specializing in game development, web applications, and immersive digital experiences.",
    },
    theme: Theme {
        colors: &[
            ("primary", "#0a0a0a"),
            ("secondary", "#1a1a1a"),
            ("accent", "#dbafff"),
            ("accent-dark", "#b88ee6"),
            ("accent-light", "#f0dcff"),
            ("text-primary", "#f0f0f0"),
            ("text-secondary", "#aaaaaa"),
            ("text-muted", "#6b6b6b"),
            ("card-background", "#151515"),
            ("border", "rgba(219, 175, 255, 0.15)"),
            ("success", "#4ade80"),
            ("error", "#f87171"),
            ("warning", "#fbbf24"),
        ],
        accent: "#dbafff",
        animations: AnimationSpeeds {
            fast: 150,
            normal: 300,
            slow: 500,
        },
    },
    features: Features {
        enable_animations: true,
        enable_wireframes: true,
        contact_form: ContactFormConfig {
            enabled: true,
            endpoint: "/api/contact",
            max_message_length: 2000,
            single_flight: false,
        },
    },
    projects: ProjectsConfig {
        categories: &[
            "All Work",
            "Featured",
            "Animations",
            "VFX",
            "UI/UX",
            "3D Models",
            "Web Apps",
            "Games",
        ],
        placeholder_media: "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 400 300'%3E%3Crect fill='%23151515' width='400' height='300'/%3E%3Ctext x='50%25' y='50%25' dominant-baseline='middle' text-anchor='middle' fill='%23dbafff' font-size='48'%3E?%3C/text%3E%3C/svg%3E",
    },
    performance: Performance {
        lazy_load_offset_px: 50,
        scroll_throttle_ms: 100,
        resize_debounce_ms: 250,
        max_pixel_ratio: 2.0,
        respect_reduced_motion: true,
    },
    wireframes: WireframeConfig {
        opacity: 0.8,
        spin: (0.003, 0.005),
        canvases: &[("hero-wireframe", "torus"), ("pyramid", "pyramid")],
    },
};

pub static SITE_CONFIG: SiteConfig = DEFAULT_CONFIG;

/// Parses `#rrggbb` or `#rgb` into 0..1 channels.
pub fn parse_hex_color(value: &str) -> Option<[f32; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// CSS custom properties for every theme colour token.
pub fn theme_variables(theme: &Theme) -> Vec<(String, &'static str)> {
    theme
        .colors
        .iter()
        .map(|(token, value)| (format!("--color-{}", token), *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_parses() {
        let [r, g, b] = parse_hex_color(SITE_CONFIG.theme.accent).expect("accent");
        assert!((r - 219.0 / 255.0).abs() < 1e-6);
        assert!((g - 175.0 / 255.0).abs() < 1e-6);
        assert!((b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_hex_color("#fff"), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(parse_hex_color("dbafff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#abcd"), None);
    }

    #[test]
    fn theme_variables_are_prefixed() {
        let vars = theme_variables(&SITE_CONFIG.theme);
        assert!(vars.contains(&("--color-accent".to_string(), "#dbafff")));
        assert_eq!(vars.len(), SITE_CONFIG.theme.colors.len());
    }
}
