//! Turns a recorded [`Scene`] into RGBA pixels and PNG bytes.

use image::{ImageOutputFormat, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale, point};
use std::io::Cursor;
use tiny_skia::{LineCap, Paint, PathBuilder, PixmapMut, Stroke, Transform};

use super::scene::{Anchor, DrawCommand, Point, Scene};
use crate::error::{Error, Result};

/// Text height used for anchoring, relative to the font size in pixels.
const TEXT_HEIGHT_RATIO: f32 = 0.75;

pub fn rasterize(scene: &Scene, font: &Font<'_>) -> RgbaImage {
    let mut img = RgbaImage::new(scene.width, scene.height);

    for command in &scene.commands {
        match command {
            DrawCommand::Clear(color) => {
                for pixel in img.pixels_mut() {
                    *pixel = *color;
                }
            }
            DrawCommand::Text {
                text,
                at,
                anchor,
                size,
                color,
            } => {
                let px = size.px(scene.height);
                draw_text_anchored(&mut img, font, text, *at, *anchor, px, *color);
            }
            DrawCommand::Image {
                image, at, anchor, ..
            } => {
                let x = at.x - anchor.ax * image.width() as f32;
                let y = at.y - anchor.ay * image.height() as f32;
                imageops::overlay(&mut img, image, x.round() as i64, y.round() as i64);
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
                width,
            } => {
                let path = PathBuilder::from_circle(center.x, center.y, *radius);
                stroke(&mut img, path, *color, *width);
            }
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => {
                let mut pb = PathBuilder::new();
                pb.move_to(from.x, from.y);
                pb.line_to(to.x, to.y);
                stroke(&mut img, pb.finish(), *color, *width);
            }
        }
    }

    img
}

/// Stroke `path` straight into the image buffer.
///
/// The buffer is treated as premultiplied RGBA, which holds because the
/// background is opaque before anything is stroked.
fn stroke(img: &mut RgbaImage, path: Option<tiny_skia::Path>, color: Rgba<u8>, width: f32) {
    let Some(path) = path else {
        return;
    };

    let (w, h) = img.dimensions();
    let Some(mut pixmap) = PixmapMut::from_bytes(&mut **img, w, h) else {
        tracing::warn!(w, h, "cannot stroke onto empty canvas");
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };

    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Horizontal advance of `text` at `scale`.
pub fn text_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn draw_text_anchored(
    img: &mut RgbaImage,
    font: &Font<'_>,
    text: &str,
    at: Point,
    anchor: Anchor,
    px: f32,
    color: Rgba<u8>,
) {
    if text.is_empty() {
        return;
    }

    let scale = Scale::uniform(px);
    let width = text_width(font, scale, text);
    let height = px * TEXT_HEIGHT_RATIO;

    let left = at.x - anchor.ax * width;
    let baseline = at.y + anchor.ay * height;
    // draw_text_mut positions the top of the line box, one ascent above the baseline.
    let top = baseline - font.v_metrics(scale).ascent;

    draw_text_mut(
        img,
        color,
        left.round() as i32,
        top.round() as i32,
        scale,
        font,
        text,
    );
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)
        .map_err(|e| Error::decode("png output", e))?;
    Ok(out.into_inner())
}
