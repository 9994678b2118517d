use base64::{Engine, engine::general_purpose::STANDARD};
use image::RgbaImage;

use crate::{
    assets::photo::PhotoSource,
    foundation::error::{StripError, StripResult},
};

/// Decode any [`PhotoSource`] into straight-alpha RGBA8.
pub fn decode_photo(source: &PhotoSource) -> StripResult<RgbaImage> {
    let img = match source {
        PhotoSource::Encoded(bytes) => decode_image(bytes)?,
        PhotoSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                StripError::photo_decode(format!("read '{}': {e}", path.display()))
            })?;
            decode_image(&bytes)?
        }
        PhotoSource::DataUrl(url) => decode_image(&data_url_payload(url)?)?,
        PhotoSource::Rgba {
            width,
            height,
            data,
        } => RgbaImage::from_raw(*width, *height, data.clone()).ok_or_else(|| {
            StripError::photo_decode(format!(
                "rgba buffer of {} bytes does not hold {width}x{height} pixels",
                data.len()
            ))
        })?,
    };

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(StripError::invalid_geometry(format!(
            "decoded photo is {width}x{height}"
        )));
    }
    Ok(img)
}

fn decode_image(bytes: &[u8]) -> StripResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StripError::photo_decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Bytes carried by a `data:<mime>;base64,<payload>` URL.
pub fn data_url_payload(url: &str) -> StripResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| StripError::photo_decode("data URL must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| StripError::photo_decode("data URL has no ',' separator"))?;
    if !meta
        .split(';')
        .any(|p| p.trim().eq_ignore_ascii_case("base64"))
    {
        return Err(StripError::photo_decode(
            "only base64-encoded data URLs are supported",
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StripError::photo_decode(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
