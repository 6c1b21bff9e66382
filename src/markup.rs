//! Markup fragments for cards and the detail view. Every piece of text and
//! every attribute value goes through [`escape_html`] before it is spliced in.

use std::borrow::Cow;

use crate::content::Project;

/// Share-link host and the host serving its raw media.
const MEDIA_HOSTS: &[(&str, &str)] = &[("imgur.com", "i.imgur.com")];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn of(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.ends_with(".mp4")
            || lower.contains(".mp4?")
            || lower.ends_with(".webm")
            || lower.ends_with(".mov")
        {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

fn video_mime(url: &str) -> &'static str {
    let lower = url.to_ascii_lowercase();
    if lower.ends_with(".webm") {
        "video/webm"
    } else if lower.ends_with(".mov") {
        "video/quicktime"
    } else {
        "video/mp4"
    }
}

/// Rewrites a recognized share link (`https://imgur.com/<id>`) to the host's
/// direct media file. Anything else passes through untouched.
pub fn direct_media_url(url: &str) -> Cow<'_, str> {
    for (share, direct) in MEDIA_HOSTS {
        if url.contains(&format!("{}/", share)) && !url.contains(direct) {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            let id = path
                .rsplit('/')
                .next()
                .and_then(|segment| segment.split('.').next())
                .unwrap_or_default();
            if id.is_empty() {
                return Cow::Borrowed(url);
            }
            return Cow::Owned(format!("https://{}/{}.mp4", direct, id));
        }
    }
    Cow::Borrowed(url)
}

/// Where a media element is placed; gallery cards defer video loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Card,
    Detail,
}

pub fn media_markup(project: &Project, slot: MediaSlot, placeholder: &str) -> String {
    let source = if project.media_url.trim().is_empty() {
        Cow::Borrowed(placeholder)
    } else {
        direct_media_url(project.media_url)
    };
    let url = escape_html(&source);
    let title = escape_html(project.title);

    match MediaKind::of(&source) {
        MediaKind::Video => {
            let (preload, src_attr) = match slot {
                MediaSlot::Card => ("none", "data-src"),
                MediaSlot::Detail => ("metadata", "src"),
            };
            format!(
                r#"<video autoplay loop muted playsinline preload="{preload}" aria-label="{title} preview video"><source {src_attr}="{url}" type="{mime}">Your browser does not support the video tag.</video>"#,
                mime = video_mime(&source),
            )
        }
        MediaKind::Image => {
            let loading = match slot {
                MediaSlot::Card => r#" loading="lazy""#,
                MediaSlot::Detail => "",
            };
            format!(r#"<img src="{url}" alt="{title} preview"{loading} />"#)
        }
    }
}

/// Inner markup of a gallery card; the `<article>` itself is created by the gallery.
pub fn card_markup(project: &Project, placeholder: &str) -> String {
    let title = escape_html(project.title);
    format!(
        concat!(
            r#"<div class="project-img">{media}</div>"#,
            r#"<div class="project-content">"#,
            r#"<span class="project-category">{category}</span>"#,
            r#"<h3>{title}</h3>"#,
            r#"<p>{description}</p>"#,
            r#"<button class="btn btn-outline view-project-btn" aria-label="View {title} project details">View Project</button>"#,
            r#"</div>"#,
        ),
        media = media_markup(project, MediaSlot::Card, placeholder),
        category = escape_html(project.category),
        title = title,
        description = escape_html(project.short_description),
    )
}

pub fn list_markup(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}
