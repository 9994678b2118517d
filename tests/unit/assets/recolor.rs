use super::*;

const PLACEHOLDER: FrameColor = FrameColor::rgb(0x1f, 0x32, 0x4f);
const FRAME: FrameColor = FrameColor::rgb(0x40, 0x40, 0x66);

#[test]
fn replaces_fill_and_stroke_attributes_in_any_case_and_quote_style() {
    let markup = r##"<rect fill="#1F324F"/><rect stroke='#1f324f' fill = "#1F324f"/>"##;
    assert_eq!(
        recolor_overlay(markup, PLACEHOLDER, FRAME),
        r##"<rect fill="#404066"/><rect stroke='#404066' fill = "#404066"/>"##
    );
}

#[test]
fn replaces_style_declarations() {
    let markup = r##"<path style="opacity:1;fill:#1F324F;stroke: #1f324f"/><style>.a{fill:#1F324F}</style>"##;
    assert_eq!(
        recolor_overlay(markup, PLACEHOLDER, FRAME),
        r##"<path style="opacity:1;fill:#404066;stroke: #404066"/><style>.a{fill:#404066}</style>"##
    );
}

#[test]
fn leaves_unrelated_occurrences_alone() {
    let markup = concat!(
        r##"<stop stop-color="#1F324F"/>"##,
        r##"<text>#1F324F</text>"##,
        r##"<rect data-fill="#1F324F"/>"##,
        r##"<rect fill="#1F324F80"/>"##,
        r##"<rect fill="#000000"/>"##,
    );
    assert_eq!(recolor_overlay(markup, PLACEHOLDER, FRAME), markup);
}

#[test]
fn non_ascii_markup_is_preserved() {
    let markup = r##"<!-- café ✓ --><rect fill="#1F324F"/><text>héllo</text>"##;
    assert_eq!(
        recolor_overlay(markup, PLACEHOLDER, FRAME),
        r##"<!-- café ✓ --><rect fill="#404066"/><text>héllo</text>"##
    );
}

#[test]
fn in_paint_property_requires_property_boundary() {
    assert!(in_paint_property(r#"<rect fill=""#));
    assert!(in_paint_property("style=\"fill:"));
    assert!(in_paint_property("{ stroke :  "));
    assert!(!in_paint_property("stop-color:"));
    assert!(!in_paint_property("<text>"));
    assert!(!in_paint_property(r#"data-fill=""#));
    assert!(!in_paint_property(r#"fill"#));
}
