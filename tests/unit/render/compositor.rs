use super::*;
use crate::assets::photo::PhotoSource;
use crate::assets::source::InMemoryOverlaySource;
use crate::grade::params::FilterKey;

fn solid(width: u32, height: u32, px: [u8; 4]) -> Photo {
    Photo::new(PhotoSource::Rgba {
        width,
        height,
        data: px.repeat((width * height) as usize),
    })
}

/// Frame for a 600x1250 three-row strip drawn as placeholder-colored rects.
fn three_row_frame() -> String {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="1250" viewBox="0 0 600 1250">
  <rect x="0" y="0" width="30" height="1250" fill="#1F324F"/>
  <rect x="570" y="0" width="30" height="1250" fill="#1F324F"/>
  <rect x="0" y="0" width="600" height="33" fill="#1F324F"/>
  <rect x="0" y="418" width="600" height="15" fill="#1F324F"/>
  <rect x="0" y="818" width="600" height="15" fill="#1F324F"/>
  <rect x="0" y="1218" width="600" height="32" fill="#1F324F"/>
</svg>"##
        .to_owned()
}

#[test]
fn match_layout_switches_to_layout_of_photo_count() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new();
    let mut diags = Vec::new();

    let ctx = ComposeContext::new(&config, &overlays).with_options(ComposeOptions {
        match_layout_to_photos: true,
        ..ComposeOptions::default()
    });
    let plan = plan_layout(3, LayoutId::FourSlot, &ctx, &mut diags).unwrap();
    assert_eq!(plan.layout.id, LayoutId::ThreeSlot);

    // No layout holds two photos, so the requested one stays.
    let plan = plan_layout(2, LayoutId::FourSlot, &ctx, &mut diags).unwrap();
    assert_eq!(plan.layout.id, LayoutId::FourSlot);

    let ctx = ComposeContext::new(&config, &overlays);
    let plan = plan_layout(3, LayoutId::FourSlot, &ctx, &mut diags).unwrap();
    assert_eq!(plan.layout.id, LayoutId::FourSlot);
}

#[test]
fn missing_overlay_sizes_canvas_around_default_slots() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new();
    let ctx = ComposeContext::new(&config, &overlays);
    let mut diags = Vec::new();

    let plan = plan_layout(3, LayoutId::ThreeSlot, &ctx, &mut diags).unwrap();
    assert!(plan.markup.is_none());
    assert_eq!(plan.slot_source, SlotSource::Default);
    assert_eq!(
        plan.canvas,
        Canvas {
            width: 594,
            height: 1248
        }
    );
    assert_eq!(diags.len(), 1);
    assert!(matches!(diags[0].error, StripError::OverlayFetch(_)));
    assert_eq!(diags[0].slot, None);
}

#[test]
fn overlay_geometry_overrides_default_slots() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new()
        .with("three-slot.svg", three_row_frame())
        .unwrap();
    let ctx = ComposeContext::new(&config, &overlays);
    let mut diags = Vec::new();

    let plan = plan_layout(3, LayoutId::ThreeSlot, &ctx, &mut diags).unwrap();
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(plan.slot_source, SlotSource::Inferred);
    assert_eq!(
        plan.canvas,
        Canvas {
            width: 600,
            height: 1250
        }
    );
    assert_eq!(plan.slots[1], Slot::new(30, 433, 540, 385).unwrap());
}

#[test]
fn inconsistent_overlay_falls_back_with_warning() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new()
        .with("four-slot.svg", three_row_frame())
        .unwrap();
    let ctx = ComposeContext::new(&config, &overlays);
    let mut diags = Vec::new();

    let plan = plan_layout(4, LayoutId::FourSlot, &ctx, &mut diags).unwrap();
    assert_eq!(plan.slot_source, SlotSource::Default);
    assert_eq!(plan.slots, config.layouts.resolve(LayoutId::FourSlot).unwrap().default_slots);
    assert!(plan.markup.is_some());
    assert!(matches!(
        diags.as_slice(),
        [Diagnostic {
            slot: None,
            error: StripError::SlotInferenceMismatch {
                inferred: 3,
                expected: 4
            }
        }]
    ));
}

#[test]
fn unparsable_overlay_is_treated_as_missing() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new()
        .with("three-slot.svg", "<svg")
        .unwrap();
    let ctx = ComposeContext::new(&config, &overlays);
    let mut diags = Vec::new();

    let plan = plan_layout(3, LayoutId::ThreeSlot, &ctx, &mut diags).unwrap();
    assert!(plan.markup.is_none());
    assert!(matches!(diags[0].error, StripError::OverlayFetch(_)));
}

#[test]
fn prepare_one_isolates_failures() {
    let slot = Slot::new(0, 0, 8, 4).unwrap();
    let bad = Photo::new(PhotoSource::Encoded(b"nope".to_vec()));
    let (image, errors) = prepare_one(0, &bad, &slot);
    assert!(image.is_none());
    assert!(matches!(errors.as_slice(), [StripError::PhotoDecode(_)]));

    let good = solid(16, 16, [10, 200, 30, 255]);
    let (image, errors) = prepare_one(1, &good, &slot);
    assert!(errors.is_empty());
    let image = image.unwrap();
    assert_eq!(image.dimensions(), (8, 4));
    assert!(image.pixels().all(|p| p.0 == [10, 200, 30, 255]));
}

#[test]
fn prepare_one_applies_filter_grade() {
    let slot = Slot::new(0, 0, 9, 9).unwrap();
    let photo = solid(9, 9, [120, 120, 120, 255])
        .with_filter(FilterKey::Warm)
        .with_adjustments(crate::grade::params::AdjustmentParameters {
            vignette: Some(50.0),
            ..Default::default()
        });
    let (image, errors) = prepare_one(0, &photo, &slot);
    assert!(errors.is_empty());
    let image = image.unwrap();
    let center = image.get_pixel(4, 4).0;
    assert!(center[0] > center[2], "warm grade expected, got {center:?}");
    // Vignette darkens the corners relative to the center.
    assert!(image.get_pixel(0, 0).0[0] < center[0]);
}

#[test]
fn zero_threads_is_rejected() {
    let config = StripConfig::default();
    let overlays = InMemoryOverlaySource::new();
    let ctx = ComposeContext::new(&config, &overlays).with_options(ComposeOptions {
        threads: Some(0),
        ..ComposeOptions::default()
    });
    let err = compose(
        &[solid(2, 2, [0, 0, 0, 255])],
        LayoutId::ThreeSlot,
        config.default_frame_color,
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(err, StripError::Validation(_)));
    assert!(err.is_fatal());
}

#[test]
fn diagnostics_render_with_slot_prefix() {
    let d = Diagnostic {
        slot: Some(2),
        error: StripError::photo_decode("bad bytes"),
    };
    assert_eq!(d.to_string(), "slot 2: photo decode failure: bad bytes");
}
