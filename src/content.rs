/// One portfolio work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    /// Display tags, several may be joined with " • ".
    pub category: &'static str,
    /// Image or video, share links are rewritten to direct media at render time.
    pub media_url: &'static str,
    pub short_description: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub technologies: &'static [&'static str],
    pub live_url: &'static str,
    pub source_url: &'static str,
}

pub static PROJECTS: &[Project] = &[Project {
    id: 1,
    title: "Kaioken Animation",
    category: "Animation • Featured",
    media_url: "https://imgur.com/uZVZq0R",
    short_description: "An animation based on the Kaioken technique from Dragon Ball Z.",
    description: "An animation based on the Kaioken technique from Dragon Ball Z.",
    features: &["R6 Rigging", "Smooth Animation", "Bezier Curves"],
    technologies: &[
        "Blender",
        "Inverse Kinematics",
        "Animation Principles",
        "Video Editing",
    ],
    live_url: "#",
    source_url: "#",
}];

/// Position of the project with `id` in `catalog`.
pub fn index_of(catalog: &[Project], id: u32) -> Option<usize> {
    catalog.iter().position(|p| p.id == id)
}
