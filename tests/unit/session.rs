use super::*;
use crate::foundation::core::{Canvas, Slot};
use crate::layout::registry::LayoutId;
use crate::render::canvas::CanvasBuffer;
use crate::render::compositor::SlotSource;

fn strip(tag: u8) -> ComposedStrip {
    let mut canvas = CanvasBuffer::new(Canvas {
        width: 1,
        height: 1,
    })
    .unwrap();
    canvas.draw_premul(&[tag, tag, tag, 255], 1, 1, 0, 0).unwrap();
    ComposedStrip {
        layout: LayoutId::ThreeSlot,
        slots: vec![Slot::new(0, 0, 1, 1).unwrap()],
        slot_source: SlotSource::Default,
        filled: vec![false],
        overlay_drawn: false,
        canvas,
        diagnostics: Vec::new(),
    }
}

#[test]
fn newer_runs_supersede_older_tokens() {
    let session = StripSession::default();
    let first = session.begin_run();
    assert!(first.is_current());
    first.ensure_current().unwrap();

    let second = session.begin_run();
    assert!(second.generation() > first.generation());
    assert!(!first.is_current());
    assert!(second.is_current());
    assert!(matches!(
        first.ensure_current().unwrap_err(),
        StripError::Superseded { generation } if generation == first.generation()
    ));
}

#[test]
fn publish_only_accepts_current_run() {
    let session = StripSession::default();
    assert!(session.latest().is_none());

    let stale = session.begin_run();
    let fresh = session.begin_run();
    assert!(!session.publish(&stale, strip(1)));
    assert!(session.latest().is_none());

    assert!(session.publish(&fresh, strip(2)));
    assert_eq!(session.latest().unwrap().canvas.pixel(0, 0), Some([2, 2, 2, 255]));

    let _newer = session.begin_run();
    assert!(!session.publish(&fresh, strip(3)));
    assert_eq!(session.latest().unwrap().canvas.pixel(0, 0), Some([2, 2, 2, 255]));
}

#[test]
fn invalid_color_keeps_last_valid() {
    let session = StripSession::new(FrameColor::rgb(0x88, 0xca, 0xfc));
    assert_eq!(
        session.set_frame_color("#404066").unwrap(),
        FrameColor::rgb(0x40, 0x40, 0x66)
    );
    let err = session.set_frame_color("not-a-color").unwrap_err();
    assert!(matches!(err, StripError::InvalidColor(_)));
    assert_eq!(session.frame_color(), FrameColor::rgb(0x40, 0x40, 0x66));
}

#[test]
fn tokens_go_stale_across_threads() {
    let session = std::sync::Arc::new(StripSession::default());
    let token = session.begin_run();
    let handle = {
        let session = std::sync::Arc::clone(&session);
        std::thread::spawn(move || session.begin_run())
    };
    let newer = handle.join().unwrap();
    assert!(!token.is_current());
    assert!(newer.is_current());
}
