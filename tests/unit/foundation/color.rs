use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(
        FrameColor::parse("#404066").unwrap(),
        FrameColor::rgb(0x40, 0x40, 0x66)
    );
    assert_eq!(
        FrameColor::parse("1F324F").unwrap(),
        FrameColor::rgb(0x1f, 0x32, 0x4f)
    );
    assert_eq!(
        FrameColor::parse("#fa0").unwrap(),
        FrameColor::rgb(0xff, 0xaa, 0x00)
    );
}

#[test]
fn parses_rgb_function() {
    assert_eq!(
        FrameColor::parse("rgb(10, 20, 30)").unwrap(),
        FrameColor::rgb(10, 20, 30)
    );
    assert!(FrameColor::parse("rgb(10, 20)").is_err());
    assert!(FrameColor::parse("rgb(10, 20, 300)").is_err());
}

#[test]
fn rejects_malformed_colors() {
    for bad in ["", "#", "#12", "#12345", "#gggggg", "blue", "#1234567"] {
        let err = FrameColor::parse(bad).unwrap_err();
        assert!(matches!(err, StripError::InvalidColor(_)), "{bad}");
    }
}

#[test]
fn hex_roundtrip_is_lowercase() {
    let c = FrameColor::parse("#EDCC6F").unwrap();
    assert_eq!(c.to_hex(), "#edcc6f");
    assert_eq!(c.to_string(), "#edcc6f");
}

#[test]
fn serde_uses_hex_strings() {
    let c: FrameColor = serde_json::from_value(serde_json::json!("#88cafc")).unwrap();
    assert_eq!(c, FrameColor::rgb(0x88, 0xca, 0xfc));
    assert_eq!(serde_json::to_value(c).unwrap(), serde_json::json!("#88cafc"));
    assert!(serde_json::from_value::<FrameColor>(serde_json::json!("nope")).is_err());
}

#[test]
fn hsl_primary_colors() {
    let red = rgb_to_hsl(1.0, 0.0, 0.0);
    assert!((red.h - 0.0).abs() < 1e-9);
    assert!((red.s - 1.0).abs() < 1e-9);
    assert!((red.l - 0.5).abs() < 1e-9);

    let blue = rgb_to_hsl(0.0, 0.0, 1.0);
    assert!((blue.h - 240.0).abs() < 1e-9);

    let grey = rgb_to_hsl(0.4, 0.4, 0.4);
    assert_eq!(grey.s, 0.0);
}

#[test]
fn hsl_roundtrip_is_close() {
    let samples = [
        (0.2, 0.4, 0.6),
        (0.9, 0.1, 0.3),
        (0.5, 0.5, 0.1),
        (0.05, 0.95, 0.5),
    ];
    for (r, g, b) in samples {
        let (r2, g2, b2) = hsl_to_rgb(rgb_to_hsl(r, g, b));
        assert!((r - r2).abs() < 1e-9);
        assert!((g - g2).abs() < 1e-9);
        assert!((b - b2).abs() < 1e-9);
    }
}
