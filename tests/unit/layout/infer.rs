use super::*;

fn rect(x: f64, y: f64, width: f64, height: f64) -> OverlayRect {
    OverlayRect {
        x,
        y,
        width,
        height,
    }
}

fn svg(width: u32, height: u32, rects: &[OverlayRect]) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}">"#
    );
    for r in rects {
        out.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#1F324F"/>"##,
            r.x, r.y, r.width, r.height
        ));
    }
    out.push_str("</svg>");
    out
}

#[test]
fn borders_and_separators_yield_one_slot_per_row() {
    // Separators deliberately listed bottom-up.
    let rects = [
        rect(0.0, 0.0, 5.0, 300.0),
        rect(95.0, 0.0, 5.0, 300.0),
        rect(0.0, 200.0, 100.0, 4.0),
        rect(0.0, 100.0, 100.0, 4.0),
    ];
    let slots = infer_slots(&rects, 3, 100, 300).unwrap().unwrap();
    assert_eq!(
        slots,
        vec![
            Slot {
                x: 5,
                y: 0,
                width: 90,
                height: 100
            },
            Slot {
                x: 5,
                y: 104,
                width: 90,
                height: 96
            },
            Slot {
                x: 5,
                y: 204,
                width: 90,
                height: 96
            },
        ]
    );
}

#[test]
fn edge_bars_frame_the_rows_instead_of_splitting_them() {
    let rects = [
        rect(0.0, 0.0, 30.0, 1250.0),
        rect(570.0, 0.0, 30.0, 1250.0),
        rect(0.0, 0.0, 600.0, 33.0),
        rect(0.0, 418.0, 600.0, 15.0),
        rect(0.0, 818.0, 600.0, 15.0),
        rect(0.0, 1218.0, 600.0, 32.0),
    ];
    let slots = infer_slots_from_overlay(&svg(600, 1250, &rects), 3, 600, 1250).unwrap();
    assert_eq!(
        slots,
        vec![
            Slot::new(30, 33, 540, 385).unwrap(),
            Slot::new(30, 433, 540, 385).unwrap(),
            Slot::new(30, 833, 540, 385).unwrap(),
        ]
    );
}

#[test]
fn count_mismatch_is_reported_and_degrades_to_none() {
    let rects = [
        rect(0.0, 0.0, 5.0, 300.0),
        rect(95.0, 0.0, 5.0, 300.0),
        rect(0.0, 150.0, 100.0, 4.0),
    ];
    let err = infer_slots(&rects, 4, 100, 300).unwrap_err();
    assert!(matches!(
        err,
        StripError::SlotInferenceMismatch {
            inferred: 2,
            expected: 4
        }
    ));
    assert!(!err.is_fatal());
    assert_eq!(infer_slots_from_overlay(&svg(100, 300, &rects), 4, 100, 300), None);
}

#[test]
fn markup_without_frame_rects_infers_nothing() {
    // Separators but no side borders.
    let rects = [rect(0.0, 100.0, 100.0, 4.0), rect(0.0, 200.0, 100.0, 4.0)];
    assert_eq!(infer_slots(&rects, 3, 100, 300).unwrap(), None);

    // Side borders but no separators.
    let rects = [rect(0.0, 0.0, 5.0, 300.0), rect(95.0, 0.0, 5.0, 300.0)];
    assert_eq!(infer_slots(&rects, 1, 100, 300).unwrap(), None);

    // A full-canvas backdrop is not a side border.
    let rects = [rect(0.0, 0.0, 100.0, 300.0), rect(0.0, 150.0, 100.0, 4.0)];
    assert_eq!(infer_slots(&rects, 2, 100, 300).unwrap(), None);

    assert_eq!(infer_slots(&[], 3, 100, 300).unwrap(), None);
    assert_eq!(infer_slots_from_overlay("<svg", 3, 100, 300), None);
}

#[test]
fn coincident_separators_collapse() {
    let rects = [
        rect(0.0, 0.0, 5.0, 300.0),
        rect(95.0, 0.0, 5.0, 300.0),
        rect(0.0, 100.0, 100.0, 2.0),
        rect(0.0, 101.0, 100.0, 6.0),
    ];
    let slots = infer_slots(&rects, 2, 100, 300).unwrap().unwrap();
    assert_eq!(slots[0].height, 100);
    assert_eq!(slots[1].y, 107);
    assert_eq!(slots[1].height, 193);
}
