// domscrub-core/tests/pipeline_tests.rs
use anyhow::Result;
use test_log::test;

use domscrub_core::{
    sanitize, sanitize_bytes, DomScrubError, HtmlEngine, RunOptions, SanitizationEngine,
    SanitizeConfig,
};

fn config(yaml: &str) -> SanitizeConfig {
    SanitizeConfig::from_yaml_str(yaml).expect("test config parses")
}

#[test]
fn test_end_to_end_timestamp_scenario() -> Result<()> {
    let config = config(
        r#"
selector: div.content
sanitization:
  - { selector: span.ts, value: ['\d+', TIMESTAMP] }
"#,
    );
    let html = r#"<html><body><header>site</header><div class="content"><span class="ts">12345</span> hi</div></body></html>"#;
    let output = sanitize(html, &config, &RunOptions::default())?;
    assert_eq!(
        output,
        "<div class=\"content\">\n  <span class=\"ts\">TIMESTAMP</span>\n  hi\n</div>"
    );
    Ok(())
}

#[test]
fn test_remove_spacing_round_trip() -> Result<()> {
    let output = sanitize("<p>a   b</p>", &config("remove_spacing: true"), &RunOptions::default())?;
    assert!(output.contains("a b"));
    assert!(!output.contains("  "));
    Ok(())
}

#[test]
fn test_remove_spacing_false_keeps_runs() -> Result<()> {
    let output = sanitize("<p>a   b</p>", &config("remove_spacing: false"), &RunOptions::default())?;
    assert_eq!(output, "<p>a   b</p>");
    Ok(())
}

#[test]
fn test_scoped_rules_run_before_global_rules() -> Result<()> {
    // Configured as [global1, scoped1, global2, scoped2]. Each rule only has
    // something to rewrite if every rule before it in the execution order
    // scoped1, scoped2, global1, global2 has already run.
    let config = config(
        r#"
sanitization:
  - { value: [gamma, delta] }
  - { selector: p, value: [alpha, beta] }
  - { value: [delta, epsilon] }
  - { selector: p, value: [beta, gamma] }
"#,
    );
    let output = sanitize("<p>alpha</p>", &config, &RunOptions::default())?;
    assert_eq!(output, "<p>epsilon</p>");
    Ok(())
}

#[test]
fn test_global_rules_see_serialized_markup() -> Result<()> {
    let config = config(r#"sanitization: ['<span class="ts">', '<span>']"#);
    let output = sanitize(r#"<div><span class="ts">1</span></div>"#, &config, &RunOptions::default())?;
    assert_eq!(output, "<div>\n  <span>1</span>\n</div>");
    Ok(())
}

#[test]
fn test_scoped_rule_leaves_unmatched_content_alone() -> Result<()> {
    let config = config(r#"sanitization: { selector: .ts, value: ['\d+', N] }"#);
    let output = sanitize(
        r#"<p>7 items</p><p class="ts">2024</p>"#,
        &config,
        &RunOptions::default(),
    )?;
    assert_eq!(output, "<p>7 items</p>\n<p class=\"ts\">N</p>");
    Ok(())
}

#[test]
fn test_disabled_and_path_filtered_rules() -> Result<()> {
    let config = config(
        r#"
sanitization:
  - { value: [a, X], disabled: true }
  - { value: [b, Y], path: "/news/" }
  - { value: [c, Z] }
"#,
    );
    let html = "<p>abc</p>";
    let news = RunOptions::default().with_path("https://example.com/news/today");
    let other = RunOptions::default().with_path("https://example.com/about");
    assert_eq!(sanitize(html, &config, &news)?, "<p>aYZ</p>");
    assert_eq!(sanitize(html, &config, &other)?, "<p>abZ</p>");
    Ok(())
}

#[test]
fn test_ambiguous_remove_spacing_names_the_kind() {
    let config = config("remove_spacing: [{ value: true }, { value: false }]");
    let err = sanitize("<p>x</p>", &config, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, DomScrubError::ConfigurationAmbiguity { .. }));
    assert!(err.to_string().contains("remove_spacing"));
}

#[test]
fn test_disabled_record_does_not_count_towards_ambiguity() -> Result<()> {
    let config = config("selector: [{ value: main, disabled: true }, { value: article }]");
    let output = sanitize("<main>m</main><article>a</article>", &config, &RunOptions::default())?;
    assert_eq!(output, "<article>a</article>");
    Ok(())
}

#[test]
fn test_regions_compose_in_output_order() -> Result<()> {
    let config = config(
        r#"
regions:
  - { name: heading, selector: h1 }
  - { name: lead, selector: p.lead }
"#,
    );
    let html = r#"<p class="lead">Intro</p><h1>Title</h1><p>rest</p>"#;
    let options = RunOptions::default().with_output(["heading", "lead"]);
    assert_eq!(
        sanitize(html, &config, &options)?,
        "<heading>\n  <h1>Title</h1>\n</heading>\n<lead>\n  <p class=\"lead\">Intro</p>\n</lead>"
    );
    Ok(())
}

#[test]
fn test_region_named_after_a_later_selector_keeps_its_place() -> Result<()> {
    let config = config(
        r#"
regions:
  - { name: header, selector: .top }
  - { name: all_headers, selector: header }
"#,
    );
    let options = RunOptions::default().with_output(["header", "all_headers"]);
    let output = sanitize(r#"<div class="top">T</div><header>H</header>"#, &config, &options)?;
    assert_eq!(
        output,
        "<header>\n  <div class=\"top\">T</div>\n</header>\n<all_headers>\n  <header>H</header>\n</all_headers>"
    );
    Ok(())
}

#[test]
fn test_selector_inside_rule_value_is_an_error() {
    let config = config(r#"sanitization: [{ pattern: '\d+', replacement: N, selector: span.ts }]"#);
    let err = sanitize(
        r#"<p data-id="42">7 items <span class="ts">2024</span></p>"#,
        &config,
        &RunOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DomScrubError::InvalidRule { .. }));
}

#[test]
fn test_malformed_region_falls_back_to_selector() -> Result<()> {
    let config = config(
        r#"
selector: main
regions:
  - { name: heading }
"#,
    );
    let options = RunOptions::default().with_output(["heading"]);
    let output = sanitize("<nav>n</nav><main><h1>T</h1></main>", &config, &options)?;
    assert_eq!(output, "<main>\n  <h1>T</h1>\n</main>");
    Ok(())
}

#[test]
fn test_unknown_output_name_falls_back_to_whole_tree() -> Result<()> {
    let config = config("regions: [{ name: heading, selector: h1 }]");
    let options = RunOptions::default().with_output(["footer"]);
    let output = sanitize("<h1>T</h1><p>x</p>", &config, &options)?;
    assert_eq!(output, "<h1>T</h1>\n<p>x</p>");
    Ok(())
}

#[test]
fn test_dom_transforms_apply_in_order() -> Result<()> {
    let config = config(
        r#"
selector: article
dom_transform:
  - { value: { kind: remove, selector: .ad } }
  - { value: [strip, em] }
  - { value: { kind: remove_class, selector: p, class: js-ready } }
  - { value: [unwrap_root, article] }
"#,
    );
    let html = r#"<article><div class="ad">buy</div><p class="js-ready">an <em>important</em> note</p></article>"#;
    let output = sanitize(html, &config, &RunOptions::default())?;
    assert_eq!(output, "<p>an important note</p>");
    Ok(())
}

#[test]
fn test_full_document_selection_drops_doctype() -> Result<()> {
    let html = "<!DOCTYPE html>\n<html>\n<head><title>t</title></head>\n<body><main>m</main></body></html>";
    let output = sanitize(html, &config("selector: main"), &RunOptions::default())?;
    assert_eq!(output, "<main>m</main>");
    Ok(())
}

#[test]
fn test_output_has_no_wrapper_or_blank_line_artifacts() -> Result<()> {
    let html = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<html><body>\r\n<div>\r\n\r\n<p>x&#13;</p>y&#13;\r\n</div></body></html>";
    let output = sanitize(html, &SanitizeConfig::default(), &RunOptions::default())?;
    assert!(!output.contains("<?xml"));
    assert!(!output.contains("<!--?xml"));
    assert!(!output.contains('\r'));
    assert!(!output.lines().any(|line| line.trim().is_empty()));
    assert!(output.starts_with("<html>"));
    Ok(())
}

#[test]
fn test_fragment_output_never_wrapped() -> Result<()> {
    let output = sanitize("<p>x</p>", &SanitizeConfig::default(), &RunOptions::default())?;
    assert_eq!(output, "<p>x</p>");
    Ok(())
}

#[test]
fn test_invalid_bytes_and_control_characters_removed() -> Result<()> {
    let input = b"<p data-x=\"a\xfe\xffb\">one\x01 two\xe2\x82</p>";
    let output = sanitize_bytes(input, &SanitizeConfig::default(), &RunOptions::default())?;
    assert_eq!(output, "<p data-x=\"ab\">one two</p>");
    Ok(())
}

#[test]
fn test_sanitize_is_idempotent_on_its_output() -> Result<()> {
    let config = config("remove_spacing: true");
    let html = "<section>\n  <h2>Head   line</h2>\n  <ul><li>a</li><li><b>b</b>  c</li></ul>\n</section>";
    let once = sanitize(html, &config, &RunOptions::default())?;
    let twice = sanitize(&once, &config, &RunOptions::default())?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_engine_trait_object() -> Result<()> {
    let engine: Box<dyn SanitizationEngine> = Box::new(HtmlEngine::validated(config("selector: p"))?);
    assert!(!engine.config().is_empty());
    assert_eq!(engine.sanitize("<div><p>x</p></div>", &RunOptions::default())?, "<p>x</p>");
    Ok(())
}
