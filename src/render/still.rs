use std::path::Path;

use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StillclipError, StillclipResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;

/// Placement of the scaled image inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letterbox {
    /// Left edge in canvas pixels.
    pub x: u32,
    /// Top edge in canvas pixels.
    pub y: u32,
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
}

/// Read and decode a still image from disk.
pub fn load_still(path: &Path) -> StillclipResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        StillclipError::render(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_still(&bytes).map_err(|e| match e {
        StillclipError::Render(msg) => {
            StillclipError::render(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })
}

/// Decode a still image from encoded bytes (PNG, JPEG, ...).
pub fn decode_still(bytes: &[u8]) -> StillclipResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| StillclipError::render(format!("failed to decode image bytes: {e}")))?;
    Ok(img.to_rgba8())
}

/// Fit a `src_w`x`src_h` image inside `canvas` preserving aspect ratio, centered.
pub fn letterbox_rect(src_w: u32, src_h: u32, canvas: Canvas) -> StillclipResult<Letterbox> {
    if src_w == 0 || src_h == 0 {
        return Err(StillclipError::render("source image has zero size"));
    }
    if canvas.width == 0 || canvas.height == 0 {
        return Err(StillclipError::render("canvas width/height must be non-zero"));
    }

    let scale = (f64::from(canvas.width) / f64::from(src_w))
        .min(f64::from(canvas.height) / f64::from(src_h));
    let width = ((f64::from(src_w) * scale).round() as u32).clamp(1, canvas.width);
    let height = ((f64::from(src_h) * scale).round() as u32).clamp(1, canvas.height);

    Ok(Letterbox {
        x: (canvas.width - width) / 2,
        y: (canvas.height - height) / 2,
        width,
        height,
    })
}

/// Rasterize `image` into a `canvas`-sized premultiplied buffer.
///
/// The image is scaled to fit and centered; the bars are filled with `background` (straight
/// RGBA8). Translucent image pixels are composited over the background.
#[tracing::instrument(level = "debug", skip(image), fields(src_w = image.width(), src_h = image.height()))]
pub fn render_still(
    image: &RgbaImage,
    canvas: Canvas,
    background: [u8; 4],
) -> StillclipResult<FrameRGBA> {
    let fit = letterbox_rect(image.width(), image.height(), canvas)?;
    let scaled = if (fit.width, fit.height) == image.dimensions() {
        image.clone()
    } else {
        image::imageops::resize(image, fit.width, fit.height, FilterType::Triangle)
    };

    let bg = premultiply(background);
    let stride = canvas.width as usize * 4;
    let mut data = Vec::with_capacity(stride * canvas.height as usize);
    for _ in 0..(canvas.width as usize * canvas.height as usize) {
        data.extend_from_slice(&bg);
    }

    for (sx, sy, px) in scaled.enumerate_pixels() {
        let src = premultiply(px.0);
        let i = (fit.y + sy) as usize * stride + (fit.x + sx) as usize * 4;
        let dst = &mut data[i..i + 4];
        let inv = 255 - u16::from(src[3]);
        for (d, s) in dst.iter_mut().zip(src) {
            *d = (u16::from(s) + mul_div255_u16(u16::from(*d), inv)).min(255) as u8;
        }
    }

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
        premultiplied: true,
    })
}

fn premultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 255 {
        return px;
    }
    let m = |c: u8| mul_div255_u16(u16::from(c), a) as u8;
    [m(px[0]), m(px[1]), m(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/still.rs"]
mod tests;
