//! Applies compiled text rules.
//!
//! Tree-scoped rules rewrite the text nodes beneath each element their
//! selector matches; global rules rewrite the serialized string. Within each
//! half, rules run in configuration order.

use kuchiki::traits::*;
use kuchiki::NodeRef;
use log::debug;
use std::borrow::Cow;

use super::compiler::CompiledRule;
use crate::dom::HtmlTree;
use crate::errors::Result;

/// Applies selector-bound rules to matching tree content.
///
/// Each text node under a matched element is rewritten on its own; a pattern
/// never matches across element boundaries. Text under nested matches is
/// rewritten once per rule.
pub fn apply_scoped(tree: &HtmlTree, rules: &[CompiledRule]) -> Result<()> {
    for rule in rules {
        let Some(selector) = rule.selector.as_deref() else {
            continue;
        };
        let mut outermost: Vec<NodeRef> = Vec::new();
        for element in tree.select(selector)? {
            if !element.ancestors().any(|ancestor| outermost.contains(&ancestor)) {
                outermost.push(element);
            }
        }
        let mut replaced = 0usize;
        for element in outermost {
            let texts: Vec<_> = element.descendants().text_nodes().collect();
            for text in texts {
                let rewritten = match rule.regex.replace_all(&text.borrow(), rule.replace_with.as_str()) {
                    Cow::Borrowed(_) => continue,
                    Cow::Owned(rewritten) => rewritten,
                };
                *text.borrow_mut() = rewritten;
                replaced += 1;
            }
        }
        debug!(
            "Scoped rule '{}' on '{}' rewrote {} text node(s).",
            rule.regex.as_str(),
            selector,
            replaced
        );
    }
    Ok(())
}

/// Applies string-wide rules to serialized output, in order.
pub fn apply_global(mut text: String, rules: &[CompiledRule]) -> String {
    for rule in rules {
        if let Cow::Owned(rewritten) = rule.regex.replace_all(&text, rule.replace_with.as_str()) {
            debug!("Global rule '{}' rewrote output.", rule.regex.as_str());
            text = rewritten;
        }
    }
    text
}
