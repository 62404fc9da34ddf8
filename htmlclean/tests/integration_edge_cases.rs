//! Edge-case tests: hostile URLs, recovered markup, deep nesting, rewrites
//! and the per-call report.

use htmlclean::{
    clean_html, policy_for_name, Error, FilterSet, Policy, Sanitizer, UrlRewrites,
};

fn clean(html: &str, filter_set: FilterSet) -> String {
    clean_html(html, filter_set).unwrap()
}

#[test]
fn test_obfuscated_script_schemes_are_rejected() {
    let hostile = [
        r#"<a href="JAVASCRIPT:alert(1)">x</a>"#,
        r#"<a href="  javascript:alert(1)">x</a>"#,
        r#"<a href="jav&#x09;ascript:alert(1)">x</a>"#,
        r#"<a href="java&#10;script:alert(1)">x</a>"#,
        r#"<a href="javascript&colon;alert(1)">x</a>"#,
        r#"<a href="vbscript:msgbox(1)">x</a>"#,
        r#"<a href="data:text/html;base64,PHNjcmlwdD4=">x</a>"#,
    ];
    for html in hostile {
        assert_eq!(clean(html, FilterSet::Link), "x", "kept {html:?}");
    }
}

#[test]
fn test_image_sources_follow_scheme_policy() {
    assert_eq!(clean(r#"<img src="javascript:alert(1)">"#, FilterSet::Media), "");
    assert_eq!(
        clean(r#"<img src="data:image/png;base64,AAAA" alt="a">"#, FilterSet::Media),
        r#"<img alt="a">"#
    );
    assert_eq!(
        clean(r#"<img src="/images/a.png">"#, FilterSet::Media),
        r#"<img src="/images/a.png">"#
    );
}

#[test]
fn test_unclosed_markup_is_recovered() {
    assert_eq!(
        clean("<p>unclosed <b>bold", FilterSet::Strict),
        "<p>unclosed <b>bold</b></p>"
    );
    assert_eq!(clean("<p>a<p>b", FilterSet::Strict), "<p>a</p><p>b</p>");
    assert_eq!(
        clean("<b><i>x</b>y</i>", FilterSet::Strict),
        "<b><i>x</i></b><i>y</i>"
    );
}

#[test]
fn test_stray_brackets_become_text() {
    let out = clean("<<>>", FilterSet::Strict);
    assert!(!out.contains('<'), "unexpected markup in {out:?}");
    assert!(out.contains("&lt;"));
}

#[test]
fn test_table_structure_is_completed_by_parser() {
    assert_eq!(
        clean("<table><tr><td>a</td><td></td></tr></table>", FilterSet::Basic),
        "<table><tbody><tr><td>a</td></tr></tbody></table>"
    );
}

#[test]
fn test_unicode_text_passes_through() {
    assert_eq!(
        clean("<p>Grüße, 世界 🎉</p>", FilterSet::Strict),
        "<p>Grüße, 世界 🎉</p>"
    );
    assert_eq!(clean("caf&eacute;", FilterSet::Strict), "café");
}

#[test]
fn test_limited_keeps_media_but_not_the_main_chain() {
    assert_eq!(
        clean(r#"<p><b>x</b><img src="https://x.test/a.png"></p>"#, FilterSet::Limited),
        r#"<p>x<img src="https://x.test/a.png"></p>"#
    );
    assert_eq!(
        clean(r#"<a href="https://x.test/">link</a>"#, FilterSet::Limited),
        "link"
    );
    assert_eq!(
        clean(r#"<ul class="menu"><li>one</li></ul>"#, FilterSet::Limited),
        "<ul><li>one</li></ul>"
    );
    assert_eq!(clean("<h2>Title</h2>", FilterSet::Limited), "Title");
}

#[test]
fn test_media_elements_without_a_void_form_are_stripped() {
    assert_eq!(
        clean(
            r#"<video controls><source src="https://x.test/a.mp4" type="video/mp4">Fallback</video>"#,
            FilterSet::Media
        ),
        "Fallback"
    );
    assert_eq!(
        clean(r#"<audio controls src="https://x.test/a.mp3"></audio>"#, FilterSet::Media),
        ""
    );
}

#[test]
fn test_nested_dropped_tags() {
    assert_eq!(
        clean(
            "<p>keep</p><object><embed src=\"x.swf\"><p>gone</p></object><p>too</p>",
            FilterSet::Media
        ),
        "<p>keep</p><p>too</p>"
    );
    assert_eq!(
        clean("<form><input name=\"q\"><p>inside</p></form>after", FilterSet::Media),
        "after"
    );
}

#[test]
fn test_deep_nesting_is_flattened_past_limit() {
    let depth = 10;
    let html = format!(
        "{}<script>bad()</script>x{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let sanitizer = Sanitizer::new(FilterSet::Basic).max_depth(4);
    let sanitized = sanitizer.clean_with_report(&html).unwrap();
    assert_eq!(sanitized.html, format!("{}x{}", "<div>".repeat(4), "</div>".repeat(4)));
    assert_eq!(sanitized.report.depth_limited, 1);
}

#[test]
fn test_very_deep_input_does_not_overflow() {
    let depth = 5_000;
    let html = format!("{}deep{}", "<span>".repeat(depth), "</span>".repeat(depth));
    assert_eq!(clean(&html, FilterSet::Strict), "deep");
}

#[test]
fn test_default_rewrites_upgrade_known_hosts() {
    let sanitized = Sanitizer::new(FilterSet::Link)
        .clean_with_report(r#"<a href="http://player.vimeo.com/video/1">video</a>"#)
        .unwrap();
    assert_eq!(
        sanitized.html,
        r#"<a href="https://player.vimeo.com/video/1">video</a>"#
    );
    assert_eq!(sanitized.report.rewritten_urls, 1);
}

#[test]
fn test_rewrites_can_be_replaced_or_disabled() {
    let html = r#"<a href="http://cdn.example.com/a.css">a</a>"#;
    let custom = Sanitizer::new(FilterSet::Link)
        .url_rewrites(UrlRewrites::none().with("http://cdn.example.com", "//cdn.example.com"));
    assert_eq!(
        custom.clean(html).unwrap(),
        r#"<a href="//cdn.example.com/a.css">a</a>"#
    );

    let untouched = r#"<a href="http://player.vimeo.com/video/1">video</a>"#;
    let plain = Sanitizer::new(FilterSet::Link).url_rewrites(UrlRewrites::none());
    assert_eq!(plain.clean(untouched).unwrap(), untouched);
}

#[test]
fn test_custom_class_prefixes() {
    let sanitizer = Sanitizer::new(FilterSet::Basic).class_prefixes(["js-"]);
    assert_eq!(
        sanitizer
            .clean(r#"<p class="js-toggle MsoNormal lead">x</p>"#)
            .unwrap(),
        r#"<p class="MsoNormal lead">x</p>"#
    );
}

#[test]
fn test_report_counts_each_decision() {
    let html = concat!(
        "<!-- note -->",
        "<script>x()</script>",
        "<font>y</font>",
        "<a>z</a>",
        r#"<p onclick="go()"></p>"#,
    );
    let sanitized = Sanitizer::new(FilterSet::Link)
        .clean_with_report(html)
        .unwrap();
    let report = sanitized.report;

    assert_eq!(sanitized.html, "yz");
    assert_eq!(report.removed_comments, 1);
    assert_eq!(report.dropped_subtrees, 1);
    assert_eq!(report.stripped_tags, 1);
    assert_eq!(report.demoted_elements, 1);
    assert_eq!(report.removed_empty, 1);
    assert_eq!(report.removed_attributes, 1);
    assert!(!report.is_clean());
}

#[test]
fn test_clean_input_reports_nothing() {
    let sanitized = Sanitizer::new(FilterSet::Strict)
        .clean_with_report("<p>ok</p>")
        .unwrap();
    assert_eq!(sanitized.html, "<p>ok</p>");
    assert!(sanitized.report.is_clean());
    assert_eq!(sanitized.report.parse_errors, 0);
}

#[test]
fn test_custom_policy() {
    let policy = Policy::empty()
        .allow_tags(["p", "a"])
        .drop_tags(["script"])
        .allow_attributes("a", ["href"])
        .allow_schemes(["https"])
        .allow_href_types([htmlclean::LinkType::Absolute]);
    let sanitizer = Sanitizer::with_policy(policy);

    assert_eq!(sanitizer.filter_set(), None);
    assert_eq!(
        sanitizer
            .clean(r#"<p><a href="https://example.com/">a</a><a href="/rel">b</a></p><script>x</script>"#)
            .unwrap(),
        r#"<p><a href="https://example.com/">a</a>b</p>"#
    );
}

#[test]
fn test_unknown_filter_set_name_is_an_error() {
    assert_eq!(
        policy_for_name("loose").err(),
        Some(Error::InvalidFilterSet("loose".to_string()))
    );
    assert_eq!(
        "Loose".parse::<FilterSet>(),
        Err(Error::InvalidFilterSet("Loose".to_string()))
    );
    assert!(policy_for_name("LINK").is_ok());
}
