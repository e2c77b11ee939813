//! HTML to Markdown/plain text conversion for rendered wiki pages.
//!
//! The page is parsed into a DOM with `scraper`, so character references of
//! every kind are already decoded by the time text is emitted.

use regex::Regex;
use scraper::{ElementRef, Html, Node};

lazy_static::lazy_static! {
    static ref RE_BLANK_LINES: Regex = Regex::new(r"\n\s*\n+").unwrap();
    static ref RE_SPACES: Regex = Regex::new(r"[ \t\u{a0}]+").unwrap();
}

/// Elements whose content is never shown.
const SKIPPED: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that start and end on their own line.
const BLOCKS: [&str; 18] = [
    "p", "div", "ul", "ol", "li", "table", "tr", "dl", "dt", "dd", "blockquote", "pre", "h1",
    "h2", "h3", "h4", "h5", "h6",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Markdown,
    Plain,
}

/// Convert rendered wiki HTML into readable Markdown.
///
/// Headings, links, emphasis and list items survive; everything else is
/// flattened to text.
pub fn html_to_markdown(html: &str) -> String {
    render(html, Style::Markdown)
}

/// Convert rendered wiki HTML into plain text with no markup at all.
pub fn html_to_plain_text(html: &str) -> String {
    render(html, Style::Plain)
}

fn render(html: &str, style: Style) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    walk(fragment.root_element(), style, &mut out);
    tidy(&out)
}

fn walk(element: ElementRef<'_>, style: Style, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    render_element(child, style, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef<'_>, style: Style, out: &mut String) {
    let el = element.value();
    let name = el.name();

    // MediaWiki's "[edit]" links next to headings
    if SKIPPED.contains(&name) || el.classes().any(|c| c == "mw-editsection") {
        return;
    }

    match (style, name) {
        (Style::Markdown, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
            let level: usize = name[1..].parse().unwrap_or(2);
            let title = inline_text(element);
            out.push_str(&format!("\n\n{} {}\n\n", "#".repeat(level), title));
        }
        (Style::Markdown, "a") => {
            let label = inline_text(element);
            let href = el.attr("href").unwrap_or_default();
            if label.is_empty() {
                return;
            }
            if href.is_empty() || href.starts_with('#') {
                out.push_str(&label);
            } else {
                out.push_str(&format!("[{}]({})", label, href));
            }
        }
        (Style::Markdown, "b" | "strong") => wrap_inline(element, "**", out),
        (Style::Markdown, "i" | "em") => wrap_inline(element, "_", out),
        (Style::Markdown, "li") => {
            out.push_str("\n* ");
            walk(element, style, out);
            out.push('\n');
        }
        (_, "br") => out.push('\n'),
        (_, "td" | "th") => {
            walk(element, style, out);
            out.push(' ');
        }
        _ if BLOCKS.contains(&name) => {
            out.push('\n');
            walk(element, style, out);
            out.push('\n');
        }
        _ => walk(element, style, out),
    }
}

fn wrap_inline(element: ElementRef<'_>, marker: &str, out: &mut String) {
    let text = inline_text(element);
    if !text.is_empty() {
        out.push_str(&format!("{}{}{}", marker, text, marker));
    }
}

/// Single-line text of an element, markup dropped.
fn inline_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    walk(element, Style::Plain, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tidy(text: &str) -> String {
    let text = RE_SPACES.replace_all(text, " ");

    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    RE_BLANK_LINES
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}
