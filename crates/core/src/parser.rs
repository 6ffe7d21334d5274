//! Line-oriented lesson content parser.
//!
//! Lesson bodies use a small markdown-like grammar: `#` headings, paragraphs
//! separated by blank lines, fenced code blocks and flat `-` bullet lists.
//! Parsing is total; anything the grammar does not recognise becomes
//! paragraph text.

use std::mem;

use crate::model::ContentBlock;

const FENCE: &str = "```";

/// Parse raw lesson content into display blocks, in source order.
///
/// A fence that is opened but never closed swallows the rest of the input:
/// its lines are not emitted as a `Code` block or as anything else.
#[must_use]
pub fn parse(content: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut scanner = Scanner::default();

    for (idx, line) in lines.iter().enumerate() {
        scanner.feed(line, lines.get(idx + 1).copied());
    }

    scanner.finish()
}

#[derive(Default)]
struct Scanner {
    blocks: Vec<ContentBlock>,
    paragraph: String,
    /// `Some` while inside an open fence.
    code: Option<String>,
    list_items: Vec<String>,
}

impl Scanner {
    fn feed(&mut self, line: &str, next: Option<&str>) {
        if is_fence(line) {
            match self.code.take() {
                Some(code) => self.blocks.push(ContentBlock::Code { text: code }),
                None => {
                    self.flush_paragraph();
                    self.code = Some(String::new());
                }
            }
            return;
        }

        if let Some(code) = self.code.as_mut() {
            code.push_str(line);
            code.push('\n');
            return;
        }

        if line.starts_with('#') {
            self.flush_paragraph();
            let (level, text) = split_heading(line);
            self.blocks.push(ContentBlock::Heading {
                level,
                text: text.to_owned(),
            });
            return;
        }

        if let Some(item) = strip_list_marker(line) {
            self.flush_paragraph();
            self.list_items.push(item.to_owned());

            let continues = next.is_some_and(|next| strip_list_marker(next).is_some());
            if !continues {
                let items = mem::take(&mut self.list_items);
                self.blocks.push(ContentBlock::List { items });
            }
            return;
        }

        if line.trim().is_empty() {
            self.flush_paragraph();
            return;
        }

        if !self.paragraph.is_empty() {
            self.paragraph.push(' ');
        }
        self.paragraph.push_str(line);
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = mem::take(&mut self.paragraph);
        self.blocks.push(ContentBlock::Paragraph { text });
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_paragraph();
        self.blocks
    }
}

fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Returns the heading level (length of the `#` run) and its text.
///
/// The run and one following whitespace character are removed. A run with
/// nothing after it has empty text; a run glued to text keeps the whole line.
fn split_heading(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();

    let mut chars = rest.chars();
    let text = match chars.next() {
        Some(ch) if ch.is_whitespace() => chars.as_str(),
        Some(_) => line,
        None => rest,
    };
    (level, text)
}

/// Matches "optional leading whitespace, `-`, one whitespace character" and
/// returns the remainder of the line.
fn strip_list_marker(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('-')?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(ch) if ch.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}
