use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn encoded_png_keeps_straight_alpha() {
    let img = decode_photo(&PhotoSource::Encoded(png_bytes(3, 2, [100, 50, 200, 128]))).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [100, 50, 200, 128]);
}

#[test]
fn data_url_roundtrips_through_base64() {
    let bytes = png_bytes(4, 4, [10, 20, 30, 255]);
    let url = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
    let img = decode_photo(&PhotoSource::DataUrl(url)).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);

    // Line-wrapped payloads are tolerated.
    let encoded = STANDARD.encode(&bytes);
    let (a, b) = encoded.split_at(encoded.len() / 2);
    let wrapped = format!("data:image/png;base64,{a}\n{b}");
    assert_eq!(data_url_payload(&wrapped).unwrap(), bytes);
}

#[test]
fn malformed_data_urls_are_decode_failures() {
    for url in [
        "image/png;base64,AAAA",
        "data:image/png;base64",
        "data:text/plain,hello",
        "data:image/png;base64,!!!",
    ] {
        let err = decode_photo(&PhotoSource::DataUrl(url.to_owned())).unwrap_err();
        assert!(matches!(err, StripError::PhotoDecode(_)), "{url}: {err}");
        assert!(!err.is_fatal());
    }
}

#[test]
fn path_source_reads_from_disk() {
    let dir = std::env::temp_dir().join(format!("photostrip-decode-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("one.png");
    std::fs::write(&path, png_bytes(5, 1, [1, 2, 3, 255])).unwrap();

    let img = decode_photo(&PhotoSource::Path(path)).unwrap();
    assert_eq!(img.dimensions(), (5, 1));

    let missing = decode_photo(&PhotoSource::Path(dir.join("missing.png"))).unwrap_err();
    assert!(matches!(missing, StripError::PhotoDecode(_)));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn raw_rgba_is_checked() {
    let ok = decode_photo(&PhotoSource::Rgba {
        width: 2,
        height: 1,
        data: vec![9, 8, 7, 6, 5, 4, 3, 2],
    })
    .unwrap();
    assert_eq!(ok.get_pixel(1, 0).0, [5, 4, 3, 2]);

    let short = decode_photo(&PhotoSource::Rgba {
        width: 2,
        height: 2,
        data: vec![0; 8],
    })
    .unwrap_err();
    assert!(matches!(short, StripError::PhotoDecode(_)));

    let empty = decode_photo(&PhotoSource::Rgba {
        width: 0,
        height: 0,
        data: Vec::new(),
    })
    .unwrap_err();
    assert!(matches!(empty, StripError::InvalidGeometry(_)));
}

#[test]
fn garbage_bytes_are_decode_failures() {
    let err = decode_photo(&PhotoSource::Encoded(b"not an image".to_vec())).unwrap_err();
    assert!(matches!(err, StripError::PhotoDecode(_)));
}
