//! Indentation-normalizing serialization of a tree.
//!
//! Fragments are printed inside a shell element (the template's
//! `document_wrapper`) so every tree is printed the same way; the shell lines
//! are removed again by the caller.

use html_escape::{encode_double_quoted_attribute, encode_text};
use kuchiki::{ElementData, NodeData, NodeRef};

use super::template::PrettyPrintTemplate;
use crate::dom::{self, HtmlTree};
use crate::errors::Result;

struct Printer<'t> {
    template: &'t PrettyPrintTemplate,
    out: String,
}

impl<'t> Printer<'t> {
    fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth {
            self.out.push_str(&self.template.indent);
        }
        self.out.push_str(content);
        self.out.push('\n');
    }

    fn text_lines(&mut self, depth: usize, text: &str) {
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.line(depth, &encode_text(line));
        }
    }

    fn children(&mut self, node: &NodeRef, depth: usize) -> Result<()> {
        for child in node.children() {
            self.node(&child, depth)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &NodeRef, depth: usize) -> Result<()> {
        match node.data() {
            NodeData::Element(element) => self.element(node, element, depth)?,
            NodeData::Text(text) => self.text_lines(depth, &text.borrow()),
            NodeData::Comment(comment) => {
                let comment = comment.borrow();
                // The parser keeps an XML declaration as a bogus comment.
                let printed = if comment.starts_with("?xml") {
                    format!("<{}>", comment)
                } else {
                    format!("<!--{}-->", comment)
                };
                self.line(depth, &printed);
            }
            NodeData::Doctype(doctype) => {
                let mut decl = format!("<!DOCTYPE {}", doctype.name);
                if !doctype.public_id.is_empty() {
                    decl.push_str(&format!(" PUBLIC \"{}\"", doctype.public_id));
                }
                if !doctype.system_id.is_empty() {
                    decl.push_str(&format!(" \"{}\"", doctype.system_id));
                }
                decl.push('>');
                self.line(depth, &decl);
            }
            NodeData::ProcessingInstruction(_) => {}
            _ => self.children(node, depth)?,
        }
        Ok(())
    }

    fn element(&mut self, node: &NodeRef, element: &ElementData, depth: usize) -> Result<()> {
        let tag = element.name.local.to_string();
        if self.template.is_verbatim(&tag) {
            let verbatim = dom::outer_html(node)?;
            self.line(depth, &verbatim);
            return Ok(());
        }

        let open = open_tag(&tag, element);
        if self.template.is_void(&tag) {
            self.line(depth, &open);
            return Ok(());
        }
        let close = format!("</{}>", tag);

        let significant: Vec<NodeRef> = node
            .children()
            .filter(|child| match child.as_text() {
                Some(text) => !text.borrow().trim().is_empty(),
                None => child.as_element().is_some() || child.as_comment().is_some(),
            })
            .collect();

        if significant.is_empty() {
            self.line(depth, &format!("{}{}", open, close));
            return Ok(());
        }

        if significant.iter().all(|child| child.as_text().is_some()) {
            let joined: String = significant
                .iter()
                .filter_map(|child| child.as_text().map(|t| t.borrow().clone()))
                .collect();
            let joined = joined.trim();
            if !joined.contains('\n') {
                self.line(depth, &format!("{}{}{}", open, encode_text(joined), close));
                return Ok(());
            }
        }

        self.line(depth, &open);
        for child in &significant {
            self.node(child, depth + 1)?;
        }
        self.line(depth, &close);
        Ok(())
    }
}

fn open_tag(tag: &str, element: &ElementData) -> String {
    let mut open = format!("<{}", tag);
    for (name, attribute) in element.attributes.borrow().map.iter() {
        open.push(' ');
        if let Some(prefix) = &attribute.prefix {
            open.push_str(prefix);
            open.push(':');
        }
        open.push_str(&name.local);
        open.push_str("=\"");
        open.push_str(&encode_double_quoted_attribute(&attribute.value));
        open.push('"');
    }
    open.push('>');
    open
}

/// Prints `tree`, one node per line. Fragments are wrapped in the template's
/// shell element.
pub fn print_tree(tree: &HtmlTree, template: &PrettyPrintTemplate) -> Result<String> {
    let mut printer = Printer {
        template,
        out: String::new(),
    };
    if tree.is_fragment() {
        let wrapper = &template.document_wrapper;
        printer.line(0, &format!("<{}>", wrapper));
        printer.children(tree.root(), 1)?;
        printer.line(0, &format!("</{}>", wrapper));
    } else {
        printer.children(tree.root(), 0)?;
    }
    Ok(printer.out)
}
