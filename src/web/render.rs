//! HTML for the viewer page. Two shapes: the chapter list, or one chapter
//! with its verses. Every interpolated string is escaped.

use std::fmt::Write;

use crate::content::ChapterMeta;
use crate::core::library::Library;
use crate::core::view_model::{ViewModel, build_chapter};

/// Where page images are served from and what extension they carry.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Target of the "back to list" link on chapter pages.
    pub home_url: String,
    pub pages_url: String,
    pub page_image_ext: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            home_url: "/".to_string(),
            pages_url: "/pages".to_string(),
            page_image_ext: "png".to_string(),
        }
    }
}

/// What the `surah` query parameter asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    ChapterList,
    /// Kept signed: a negative selector renders an empty chapter, not the list.
    Chapter(i64),
}

impl Selection {
    /// Absent, blank, non-numeric and `0` all mean "show the list".
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
            None | Some(0) => Selection::ChapterList,
            Some(n) => Selection::Chapter(n),
        }
    }
}

/// View models for a selector value; chapters that can't exist are empty.
pub fn chapter_view_models(library: &Library, chapter: i64) -> Vec<ViewModel> {
    u32::try_from(chapter)
        .map(|c| build_chapter(library, c))
        .unwrap_or_default()
}

pub fn render_page(library: &Library, selection: Selection, settings: &RenderSettings) -> String {
    let body = match selection {
        Selection::ChapterList => render_chapter_list(library.store().chapters()),
        Selection::Chapter(n) => {
            let name = u32::try_from(n)
                .ok()
                .and_then(|c| library.store().get_chapter_name(c));
            render_chapter(n, name, &chapter_view_models(library, n), settings)
        }
    };
    wrap_document(&body)
}

fn wrap_document(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>📖 Quran Viewer</title>
    <style>
        body {{ font-family: Arial; background: #f4f4f4; padding: 20px; }}
        .ayah {{ background: #fff; padding: 15px; margin: 15px 0; border-left: 5px solid #0f7c90; }}
        .ayah-text {{ font-size: 24px; }}
        .page-image {{ width: 100%; margin-top: 10px; }}
        audio {{ width: 100%; margin-top: 10px; }}
        a {{ color: #0f7c90; text-decoration: none; }}
    </style>
</head>
<body>
<h1>📖 Quran Viewer</h1>
{body}
</body>
</html>
"#
    )
}

pub fn render_chapter_list(chapters: &[ChapterMeta]) -> String {
    let mut html = String::from("<h2>Select a Surah</h2>\n<ul>\n");
    for meta in chapters {
        let number = meta
            .surah_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        let name = escape_html(meta.surah_name.as_deref().unwrap_or("Unknown"));
        let _ = writeln!(
            html,
            r#"    <li><a href="?surah={number}">{number}. {name}</a></li>"#
        );
    }
    html.push_str("</ul>");
    html
}

pub fn render_chapter(
    chapter: i64,
    name: Option<&str>,
    verses: &[ViewModel],
    settings: &RenderSettings,
) -> String {
    let mut html = format!(
        "<h2>Surah {chapter} - {}</h2>\n",
        escape_html(name.unwrap_or(""))
    );
    for vm in verses {
        render_verse(&mut html, vm, settings);
    }
    let _ = write!(
        html,
        r#"<p><a href="{}">⬅ Back to Surah List</a></p>"#,
        escape_html(&settings.home_url)
    );
    html
}

fn render_verse(html: &mut String, vm: &ViewModel, settings: &RenderSettings) {
    let _ = writeln!(html, r#"<div class="ayah" id="ayah-{}-{}">"#, vm.chapter, vm.verse);
    let _ = writeln!(html, "    <strong>{}:{}</strong><br>", vm.chapter, vm.verse);
    let _ = writeln!(html, r#"    <p class="ayah-text">{}</p>"#, escape_html(&vm.text));
    let _ = writeln!(html, "    <p><em>{}</em></p>", escape_html(&vm.translation));

    match &vm.audio_url {
        Some(url) => {
            let _ = writeln!(
                html,
                r#"    <audio controls><source src="{}" type="audio/mpeg"></audio>"#,
                escape_html(url)
            );
        }
        None => html.push_str("    <p><small>🎵 Audio not available</small></p>\n"),
    }

    match (vm.page_number, vm.line_number) {
        (Some(page), Some(line)) => {
            let _ = writeln!(html, "    <p><small>📄 Page: {page} | Line: {line}</small></p>");
        }
        _ => html.push_str("    <p><small>📄 Layout unavailable</small></p>\n"),
    }

    if let Some(image) = vm.page_image_name(&settings.page_image_ext) {
        let _ = writeln!(
            html,
            r#"    <img class="page-image" src="{}/{}" alt="Page image">"#,
            escape_html(settings.pages_url.trim_end_matches('/')),
            escape_html(&image)
        );
    }

    html.push_str("</div>\n");
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_library;

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse(None), Selection::ChapterList);
        assert_eq!(Selection::parse(Some("")), Selection::ChapterList);
        assert_eq!(Selection::parse(Some("abc")), Selection::ChapterList);
        assert_eq!(Selection::parse(Some("0")), Selection::ChapterList);
        assert_eq!(Selection::parse(Some("2")), Selection::Chapter(2));
        assert_eq!(Selection::parse(Some(" 18 ")), Selection::Chapter(18));
        assert_eq!(Selection::parse(Some("-3")), Selection::Chapter(-3));
    }

    #[test]
    fn test_chapter_list_links_every_chapter() {
        let chapters = vec![
            ChapterMeta {
                surah_number: Some(1),
                surah_name: Some("Al-Fatihah".to_string()),
            },
            ChapterMeta::default(),
        ];
        let html = render_chapter_list(&chapters);
        assert!(html.contains(r#"<a href="?surah=1">1. Al-Fatihah</a>"#));
        assert!(html.contains("?. Unknown"));
    }

    #[test]
    fn test_chapter_page_renders_verse_block() {
        let page = render_page(
            &sample_library(),
            Selection::Chapter(1),
            &RenderSettings::default(),
        );
        assert!(page.contains("Surah 1 - Al-Fatihah"));
        assert!(page.contains("<strong>1:1</strong>"));
        assert!(page.contains("Bismillah ArRahman"));
        assert!(page.contains("In the name of God"));
        assert!(page.contains("Audio not available"));
        assert!(page.contains("Page: 1 | Line: 1"));
        assert!(page.contains(r#"src="/pages/001.png""#));
    }

    #[test]
    fn test_verse_without_layout_says_unavailable() {
        let page = render_page(
            &sample_library(),
            Selection::Chapter(2),
            &RenderSettings::default(),
        );
        assert!(page.contains("<strong>2:5</strong>"));
        assert!(page.contains("Layout unavailable"));
        assert!(page.contains(r#"<source src="https://cdn.example/2_5.mp3""#));
        assert!(!page.contains("<img"));
    }

    #[test]
    fn test_unknown_and_negative_chapters_render_empty_section() {
        for n in [99, -1] {
            let page = render_page(
                &sample_library(),
                Selection::Chapter(n),
                &RenderSettings::default(),
            );
            assert!(page.contains(&format!("Surah {n} - ")));
            assert!(!page.contains(r#"class="ayah""#));
            assert!(page.contains("Back to Surah List"));
        }
    }

    #[test]
    fn test_custom_image_settings() {
        let settings = RenderSettings {
            pages_url: "https://img.example/pages/".to_string(),
            page_image_ext: "jpg".to_string(),
            ..RenderSettings::default()
        };
        let page = render_page(&sample_library(), Selection::Chapter(1), &settings);
        assert!(page.contains(r#"src="https://img.example/pages/001.jpg""#));
    }

    #[test]
    fn test_back_link_follows_home_url() {
        let page = render_page(
            &sample_library(),
            Selection::Chapter(1),
            &RenderSettings::default(),
        );
        assert!(page.contains(r#"<a href="/">⬅ Back to Surah List</a>"#));

        let settings = RenderSettings {
            home_url: "/quran/?view=list&x=1".to_string(),
            ..RenderSettings::default()
        };
        let page = render_page(&sample_library(), Selection::Chapter(1), &settings);
        assert!(page.contains(r#"<a href="/quran/?view=list&amp;x=1">⬅ Back to Surah List</a>"#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
