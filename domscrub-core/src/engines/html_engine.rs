//! A `SanitizationEngine` implementation that runs the rule pipeline over a
//! parsed HTML tree.
//!
//! One run resolves the rules that apply to its `RunOptions`, then moves a
//! single working value through the stages in a fixed order:
//!
//! 1. parse
//! 2. spacing normalization (when `remove_spacing` is truthy)
//! 3. root replacement: region composition, or else the `selector` fragment
//! 4. `dom_transform` edits, in configuration order
//! 5. selector-scoped `sanitization` rules
//! 6. serialization to the canonical string form, with encoding repair
//! 7. global `sanitization` rules
//!
//! The working value is a tree up to step 6 and text afterwards; it never goes
//! back to being a tree.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use serde_yml::Value;

use crate::config::{RunOptions, SanitizeConfig};
use crate::dom::HtmlTree;
use crate::encoding::repair_text;
use crate::engine::SanitizationEngine;
use crate::errors::{DomScrubError, Result};
use crate::format::prettify;
use crate::rules::{is_truthy, select, select_all, RuleKind};
use crate::sanitizers::compiler::{compile_text_rules, CompiledTextRules};
use crate::sanitizers::spacing::normalize_spacing;
use crate::sanitizers::text_rules::{apply_global, apply_scoped};
use crate::selection::{compose_regions, plan_regions, select_fragment};
use crate::transforms::{apply_transforms, parse_transforms, DomTransform};

/// The single working value of one run.
#[derive(Debug)]
pub enum PipelineState {
    Tree(HtmlTree),
    Text(String),
}

impl PipelineState {
    /// Runs a tree stage. Once the state is text, tree stages are skipped.
    fn then_tree<F>(self, stage: F) -> Result<Self>
    where
        F: FnOnce(HtmlTree) -> Result<HtmlTree>,
    {
        match self {
            PipelineState::Tree(tree) => Ok(PipelineState::Tree(stage(tree)?)),
            text @ PipelineState::Text(_) => Ok(text),
        }
    }

    /// The canonical, repaired string form of the state.
    fn into_text(self) -> Result<String> {
        match self {
            PipelineState::Tree(tree) => {
                let printed = prettify(&tree)?;
                Ok(repair_text(&printed).into_owned())
            }
            PipelineState::Text(text) => Ok(text),
        }
    }

    /// Serializes the tree, discarding it. Text stays text.
    fn serialize(self) -> Result<Self> {
        Ok(PipelineState::Text(self.into_text()?))
    }

    /// Runs a text stage, serializing first if needed.
    fn then_text<F>(self, stage: F) -> Result<Self>
    where
        F: FnOnce(String) -> String,
    {
        Ok(PipelineState::Text(stage(self.into_text()?)))
    }
}

/// The rules that apply to one run, resolved before the input is parsed.
#[derive(Debug)]
struct ResolvedRules {
    remove_spacing: bool,
    selector: Option<String>,
    regions: Option<Value>,
    transforms: Vec<DomTransform>,
    text_rules: CompiledTextRules,
}

impl ResolvedRules {
    fn resolve(config: &SanitizeConfig, options: &RunOptions) -> Result<Self> {
        let remove_spacing = select(config, RuleKind::RemoveSpacing, options)?
            .is_some_and(|record| is_truthy(&record.value));

        let selector = match select(config, RuleKind::Selector, options)? {
            None => None,
            Some(record) => match record.value {
                Value::Null => None,
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(s),
                other => {
                    return Err(DomScrubError::invalid_rule(
                        RuleKind::Selector.as_str(),
                        format!("expected a CSS selector string, found {:?}", other),
                    ))
                }
            },
        };

        let mut region_records = select_all(config, RuleKind::Regions, options)?;
        if region_records.len() > 1 {
            warn!(
                "{} 'regions' records apply; using the first one.",
                region_records.len()
            );
        }
        let regions = if region_records.is_empty() {
            None
        } else {
            Some(region_records.swap_remove(0).value)
        };

        let transforms = parse_transforms(&select_all(config, RuleKind::DomTransform, options)?)?;
        let text_rules = compile_text_rules(&select_all(config, RuleKind::Sanitization, options)?)?;

        debug!(
            "Resolved rules: remove_spacing={}, selector={:?}, regions={}, {} transform(s), {} text rule(s).",
            remove_spacing,
            selector,
            regions.is_some(),
            transforms.len(),
            text_rules.len()
        );

        Ok(Self {
            remove_spacing,
            selector,
            regions,
            transforms,
            text_rules,
        })
    }
}

/// Replaces the tree's root: regions when they validate, else the selector.
fn replace_root(tree: HtmlTree, rules: &ResolvedRules, options: &RunOptions) -> Result<HtmlTree> {
    match plan_regions(rules.regions.as_ref(), options.output.as_deref()) {
        Ok(plan) => {
            debug!("Composing {} region(s).", plan.len());
            compose_regions(tree, &plan)
        }
        Err(reason) => {
            debug!("Region composition skipped: {}.", reason);
            match rules.selector.as_deref() {
                Some(selector) => select_fragment(tree, selector),
                None => Ok(tree),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlEngine {
    config: SanitizeConfig,
}

impl HtmlEngine {
    /// Creates an engine without checking the configuration up front. Rule
    /// errors then surface on the first run that selects the faulty rule.
    pub fn new(config: SanitizeConfig) -> Self {
        Self { config }
    }

    /// Creates an engine after validating every declared rule.
    pub fn validated(config: SanitizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl SanitizationEngine for HtmlEngine {
    fn sanitize(&self, html: &str, options: &RunOptions) -> Result<String> {
        if html.is_empty() {
            return Ok(String::new());
        }
        let rules = ResolvedRules::resolve(&self.config, options)?;

        let state = PipelineState::Tree(HtmlTree::parse(html))
            .then_tree(|tree| {
                if rules.remove_spacing {
                    normalize_spacing(&tree);
                }
                Ok(tree)
            })?
            .then_tree(|tree| replace_root(tree, &rules, options))?
            .then_tree(|tree| apply_transforms(tree, &rules.transforms))?
            .then_tree(|tree| {
                apply_scoped(&tree, &rules.text_rules.scoped)?;
                Ok(tree)
            })?
            .serialize()?
            .then_text(|text| apply_global(text, &rules.text_rules.global))?;

        state.into_text()
    }

    fn config(&self) -> &SanitizeConfig {
        &self.config
    }
}
