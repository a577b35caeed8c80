//! Recorded drawing commands.
//!
//! The composer never touches pixels directly. It draws onto a [`Canvas`],
//! which resolves the current transform and appends commands in canvas
//! coordinates to a [`Scene`]. The scene is rasterized afterwards.

use image::{Rgba, RgbaImage};
use tiny_skia::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fractional anchor of a text or image box: (0, 0) is the top/left edge
/// for images and the baseline/left for text, (1, 1) the opposite corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub ax: f32,
    pub ay: f32,
}

impl Anchor {
    pub const fn new(ax: f32, ay: f32) -> Self {
        Self { ax, ay }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// 10% of the canvas height.
    Primary,
    /// 30% of the primary size.
    Secondary,
}

impl FontSize {
    pub fn px(self, canvas_height: u32) -> f32 {
        let primary = canvas_height as f32 * 0.10;
        match self {
            Self::Primary => primary,
            Self::Secondary => primary * 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba<u8>),
    Text {
        text: String,
        at: Point,
        anchor: Anchor,
        size: FontSize,
        color: Rgba<u8>,
    },
    Image {
        name: String,
        image: RgbaImage,
        at: Point,
        anchor: Anchor,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Rgba<u8>,
        width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba<u8>,
        width: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Text commands with the given content, in drawing order.
    pub fn texts<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.commands
            .iter()
            .filter(move |c| matches!(c, DrawCommand::Text { text, .. } if text == content))
    }

    pub fn background(&self) -> Option<Rgba<u8>> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }
}

/// Stroke width of circles and lines, in pixels.
const LINE_WIDTH: f32 = 1.0;

/// Immediate-mode recorder with a save/restore transform stack.
///
/// Only translations and rotations are supported, so lengths such as circle
/// radii are kept as given.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    color: Rgba<u8>,
    font_size: FontSize,
    transform: Transform,
    stack: Vec<Transform>,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: Rgba([0, 0, 0, 255]),
            font_size: FontSize::Primary,
            transform: Transform::identity(),
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    pub fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear(self.color));
    }

    /// Save the current transform.
    pub fn push(&mut self) {
        self.stack.push(self.transform);
    }

    /// Restore the last saved transform. Unbalanced pops leave the transform untouched.
    pub fn pop(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.transform = saved;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    /// Rotate the local frame clockwise (y grows downwards) by `radians`.
    pub fn rotate(&mut self, radians: f32) {
        self.transform = self
            .transform
            .pre_concat(Transform::from_rotate(radians.to_degrees()));
    }

    fn map(&self, x: f32, y: f32) -> Point {
        let mut points = [tiny_skia::Point::from_xy(x, y)];
        self.transform.map_points(&mut points);
        Point::new(points[0].x, points[0].y)
    }

    pub fn draw_text_anchored(&mut self, text: impl Into<String>, x: f32, y: f32, anchor: Anchor) {
        let at = self.map(x, y);
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            at,
            anchor,
            size: self.font_size,
            color: self.color,
        });
    }

    pub fn draw_image_anchored(
        &mut self,
        name: impl Into<String>,
        image: RgbaImage,
        x: f32,
        y: f32,
        anchor: Anchor,
    ) {
        let at = self.map(x, y);
        self.commands.push(DrawCommand::Image {
            name: name.into(),
            image,
            at,
            anchor,
        });
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        let center = self.map(x, y);
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: self.color,
            width: LINE_WIDTH,
        });
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let from = self.map(x1, y1);
        let to = self.map(x2, y2);
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: self.color,
            width: LINE_WIDTH,
        });
    }

    pub fn finish(self) -> Scene {
        Scene {
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }
}
