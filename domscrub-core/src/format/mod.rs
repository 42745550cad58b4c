//! format/mod.rs - Canonical string form of a working tree.
//!
//! `prettify` prints the tree through the shared template and then cleans the
//! printed text line by line: wrapper and declaration lines go, indentation is
//! made relative to the first line, blank lines and trailing carriage returns
//! are dropped. The result always uses `\n` line endings.
//!
//! License: MIT OR APACHE 2.0

pub mod printer;
pub mod template;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::HtmlTree;
use crate::encoding::repair_text;
use crate::errors::Result;
use template::PrettyPrintTemplate;

pub use printer::print_tree;
pub use template::template;

static XML_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*<\?xml[^>]*>\s*$").expect("XML_DECLARATION: hardcoded regex is valid")
});

const ENCODED_CARRIAGE_RETURNS: [&str; 3] = ["&#13;", "&#xD;", "&#xd;"];

/// Serializes `tree` into its canonical, diff-friendly text form.
pub fn prettify(tree: &HtmlTree) -> Result<String> {
    let template = template();
    let printed = print_tree(tree, template)?;
    let repaired = repair_text(&printed);
    let finished = finish_lines(&repaired, tree.is_fragment(), template);
    trace!("Prettified tree into {} line(s).", finished.lines().count());
    Ok(finished)
}

fn finish_lines(text: &str, wrapped: bool, template: &PrettyPrintTemplate) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();

    if lines.first().is_some_and(|line| XML_DECLARATION.is_match(line)) {
        lines.remove(0);
    }

    if wrapped {
        let open = format!("<{}>", template.document_wrapper);
        let close = format!("</{}>", template.document_wrapper);
        if lines.first().is_some_and(|line| line.trim() == open) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if lines.last().is_some_and(|line| line.trim() == close) {
            lines.pop();
        }
    }

    let indent = lines.first().map_or(0, |line| indent_width(line));

    lines
        .into_iter()
        .map(|line| dedent(line, indent))
        .filter(|line| !line.trim().is_empty())
        .map(strip_carriage_returns)
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| matches!(c, ' ' | '\t')).count()
}

/// Removes at most `width` leading indentation characters.
fn dedent(line: &str, width: usize) -> &str {
    let strip = line
        .bytes()
        .take(width)
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count();
    &line[strip..]
}

fn strip_carriage_returns(mut line: &str) -> &str {
    loop {
        let mut trimmed = line.trim_end_matches('\r');
        for entity in ENCODED_CARRIAGE_RETURNS {
            if let Some(rest) = trimmed.strip_suffix(entity) {
                trimmed = rest;
            }
        }
        if trimmed.len() == line.len() {
            return line;
        }
        line = trimmed;
    }
}
