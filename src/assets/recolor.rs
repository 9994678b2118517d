use crate::foundation::color::FrameColor;

/// Replace every `fill`/`stroke` use of `placeholder` in overlay markup with `color`.
///
/// Matches are case-insensitive and cover presentation attributes in either quote style
/// (`fill="#1F324F"`, `stroke = '#1f324f'`) as well as `fill:`/`stroke:` declarations inside
/// `style` attributes and `<style>` blocks. Other occurrences (`stop-color`, text content) are
/// left alone.
pub fn recolor_overlay(markup: &str, placeholder: FrameColor, color: FrameColor) -> String {
    let needle = placeholder.to_hex();
    let replacement = color.to_hex();
    // ASCII lowercasing keeps byte offsets aligned with `markup`.
    let haystack = markup.to_ascii_lowercase();

    let mut out = String::with_capacity(markup.len());
    let mut copied = 0;
    let mut replaced = 0usize;
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(&needle) {
        let start = from + rel;
        let end = start + needle.len();
        from = end;

        let hex_continues = haystack.as_bytes().get(end).is_some_and(u8::is_ascii_hexdigit);
        if hex_continues || !in_paint_property(&haystack[..start]) {
            continue;
        }
        out.push_str(&markup[copied..start]);
        out.push_str(&replacement);
        copied = end;
        replaced += 1;
    }
    out.push_str(&markup[copied..]);

    tracing::debug!(
        placeholder = %needle,
        color = %replacement,
        replaced,
        "recolored overlay"
    );
    out
}

/// Whether the text right before a color value opens a `fill`/`stroke` value.
fn in_paint_property(before: &str) -> bool {
    let before = before.trim_end_matches(is_space);
    let (before, is_attr) = match before.as_bytes().last() {
        Some(b'"' | b'\'') => (
            before[..before.len() - 1]
                .trim_end_matches(is_space)
                .strip_suffix('='),
            true,
        ),
        Some(b':') => (Some(&before[..before.len() - 1]), false),
        _ => (None, false),
    };
    let Some(before) = before else {
        return false;
    };
    let before = before.trim_end_matches(is_space);

    ["fill", "stroke"].iter().any(|prop| {
        before.strip_suffix(prop).is_some_and(|head| {
            head.chars().last().is_none_or(|c| {
                if is_attr {
                    is_space(c)
                } else {
                    is_space(c) || matches!(c, ';' | '{' | '"' | '\'')
                }
            })
        })
    })
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/recolor.rs"]
mod tests;
