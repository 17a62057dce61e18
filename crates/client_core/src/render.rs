//! Markdown to markup. Raw HTML in the source is escaped, never passed through,
//! and link or image targets with a script-capable scheme are neutralized.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::config::RenderOptions;

pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct CmarkRenderer {
    options: RenderOptions,
}

impl CmarkRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn parser_options(&self) -> Options {
        if !self.options.gfm {
            return Options::empty();
        }
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let hard_breaks = self.options.breaks;
        let parser = Parser::new_ext(markdown, self.parser_options()).map(|event| match event {
            Event::SoftBreak if hard_breaks => Event::HardBreak,
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Keeps relative targets and http(s)/mailto URLs; anything else becomes `#`.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let trimmed = url.trim_start();
    let scheme_end = trimmed.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(end) if trimmed[end..].starts_with(':') => {
            let scheme = trimmed[..end].to_ascii_lowercase();
            if ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                url
            } else {
                CowStr::Borrowed("#")
            }
        }
        _ => url,
    }
}

/// Escapes text for inclusion in markup built by hand.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // push_html over a single text event does the escaping for us
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::Borrowed(text))));
    out
}
