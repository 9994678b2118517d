use super::*;

#[test]
fn parses_saved_session() {
    let json = r##"{
        "layout": "4v",
        "frame_color": "#404066",
        "photos": [
            { "path": "shots/1.png", "filter": "vintage" },
            { "path": "/abs/2.png", "adjustments": { "contrast": 20 } },
            { "data_url": "data:image/png;base64,AAAA" }
        ]
    }"##;
    let manifest = PhotoManifest::from_json_str(json).unwrap();
    assert_eq!(manifest.layout, Some(LayoutId::FourSlot));
    assert_eq!(manifest.frame_color, Some(FrameColor::rgb(0x40, 0x40, 0x66)));

    let photos = manifest.into_photos(Path::new("/session")).unwrap();
    assert_eq!(photos.len(), 3);
    assert_eq!(
        photos[0].source,
        PhotoSource::Path(PathBuf::from("/session/shots/1.png"))
    );
    assert_eq!(photos[0].filter, Some(FilterKey::Vintage));
    assert_eq!(photos[1].source, PhotoSource::Path(PathBuf::from("/abs/2.png")));
    assert_eq!(photos[1].adjustments.unwrap().contrast, Some(20.0));
    assert!(matches!(photos[2].source, PhotoSource::DataUrl(_)));
}

#[test]
fn entries_need_exactly_one_source() {
    let both = r#"{ "photos": [ { "path": "a.png", "data_url": "data:," } ] }"#;
    assert!(matches!(
        PhotoManifest::from_json_str(both).unwrap_err(),
        StripError::Validation(_)
    ));

    let neither = r#"{ "photos": [ { "filter": "warm" } ] }"#;
    assert!(PhotoManifest::from_json_str(neither).is_err());

    let unchecked = PhotoManifest {
        photos: vec![ManifestEntry::default()],
        ..PhotoManifest::default()
    };
    assert!(unchecked.into_photos(Path::new(".")).is_err());
}

#[test]
fn bad_json_and_unknown_fields_are_validation_errors() {
    for json in [
        "{",
        r#"{ "photos": [], "extra": 1 }"#,
        r#"{ "photos": [], "layout": "nine-slot" }"#,
        r#"{ "photos": [], "frame_color": "blue" }"#,
        r#"{ "photos": [ { "path": "a.png", "filter": "sepia" } ] }"#,
    ] {
        let err = PhotoManifest::from_json_str(json).unwrap_err();
        assert!(matches!(err, StripError::Validation(_)), "{json}: {err}");
    }
}

#[test]
fn missing_file_is_wrapped_io_error() {
    let err = PhotoManifest::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, StripError::Other(_)));
    assert!(err.to_string().contains("read photo manifest"));
}
