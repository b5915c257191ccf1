//! Plain-text rendering of article HTML.
//!
//! Block elements become line breaks, list items get bullets, `pre` blocks are
//! kept verbatim and everything else is collapsed to single spaces.

use scraper::{ElementRef, Html};

/// Elements followed and preceded by a blank line.
const PARAGRAPH_BLOCKS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "table", "ul", "ol", "figure", "hr",
];

/// Elements that start on a new line.
const LINE_BLOCKS: &[&str] = &["div", "section", "article", "header", "footer", "tr", "dt", "dd"];

/// Elements whose content is never rendered.
const SKIPPED: &[&str] = &["script", "style", "head", "template", "noscript"];

/// Convert an HTML fragment to readable plain text.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut writer = TextWriter::default();
    writer.walk(fragment.root_element(), None);
    writer.finish()
}

#[derive(Default)]
struct TextWriter {
    out: String,
    pending_space: bool,
}

impl TextWriter {
    /// `ordinal` is the running item number when inside an `ol`.
    fn walk(&mut self, element: ElementRef<'_>, mut ordinal: Option<usize>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text);
                continue;
            }

            let Some(el) = ElementRef::wrap(child) else {
                continue;
            };
            let name = el.value().name();

            match name {
                _ if SKIPPED.contains(&name) => {}
                "br" => {
                    self.trim_trailing_spaces();
                    self.out.push('\n');
                    self.pending_space = false;
                }
                "pre" => {
                    self.block_break(2);
                    let raw: String = el.text().collect();
                    self.out.push_str(raw.trim_matches('\n'));
                    self.block_break(2);
                }
                "li" => {
                    self.block_break(1);
                    match ordinal.as_mut() {
                        Some(n) => {
                            *n += 1;
                            self.out.push_str(&format!(" {n}. "));
                        }
                        None => self.out.push_str(" * "),
                    }
                    self.pending_space = false;
                    self.walk(el, None);
                }
                "ol" => {
                    self.block_break(2);
                    self.walk(el, Some(0));
                    self.block_break(2);
                }
                "a" => {
                    let label: String = el.text().collect();
                    self.walk(el, None);
                    if let Some(href) = el.value().attr("href") {
                        let href = href.trim();
                        if !href.is_empty() && !href.starts_with('#') && href != label.trim() {
                            self.push_text(&format!(" [{href}]"));
                        }
                    }
                }
                "img" => {
                    if let Some(alt) = el.value().attr("alt").filter(|a| !a.trim().is_empty()) {
                        self.push_text(alt);
                    }
                }
                "td" | "th" => {
                    self.push_text(" ");
                    self.walk(el, None);
                    self.push_text(" ");
                }
                _ if PARAGRAPH_BLOCKS.contains(&name) => {
                    self.block_break(2);
                    self.walk(el, None);
                    self.block_break(2);
                }
                _ if LINE_BLOCKS.contains(&name) => {
                    self.block_break(1);
                    self.walk(el, None);
                    self.block_break(1);
                }
                _ => self.walk(el, ordinal),
            }
        }
    }

    /// Append inline text, collapsing whitespace runs.
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.out.is_empty() && !self.out.ends_with(['\n', ' ']) {
                self.out.push(' ');
            }
            self.pending_space = false;
            self.out.push(c);
        }
    }

    /// Make sure the output ends with at least `newlines` line breaks.
    fn block_break(&mut self, newlines: usize) {
        self.pending_space = false;
        self.trim_trailing_spaces();
        if self.out.is_empty() {
            return;
        }
        let existing = self.out.chars().rev().take_while(|&c| c == '\n').count();
        for _ in existing..newlines {
            self.out.push('\n');
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
    }

    fn finish(self) -> String {
        self.out.trim_start_matches('\n').trim_end().to_string()
    }
}
