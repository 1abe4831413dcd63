//! Output raster with a small 2D drawing model.
//!
//! The model is the subset of an HTML canvas the branding layers need:
//! solid rectangles, scaled image draws, single-line text with alignment and
//! baseline, drop shadows, and a transform made of a translation plus
//! quarter-turn rotations.
//!
//! Transform state is scoped: [`Canvas::save`] returns a guard that derefs to
//! the canvas and restores the previous transform when dropped, however the
//! scope is left.
//!
//! Shadow offsets are in output pixels and ignore the transform, as on an
//! HTML canvas.

use super::font::Typeface;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::ops::{Deref, DerefMut};

/// Axis-aligned rectangle in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Gaussian drop shadow cast by everything drawn with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba<u8>,
    /// Canvas-style blur radius; the Gaussian sigma is half of it.
    pub blur: f32,
    pub offset: (f32, f32),
}

impl Shadow {
    /// Subtle shadow under the caption text and the logo.
    pub const SOFT: Shadow = Shadow {
        color: Rgba([0, 0, 0, 77]),
        blur: 4.0,
        offset: (0.0, 2.0),
    };

    /// Heavy shadow keeping the small credit legible on any background.
    pub const STRONG: Shadow = Shadow {
        color: Rgba([0, 0, 0, 179]),
        blur: 3.0,
        offset: (1.0, 1.0),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Which horizontal line of the text sits on the anchor's y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    /// Middle of the em box.
    Middle,
    /// Top of the em box (the ascent line).
    Top,
}

/// Translation plus a number of 90° counter-clockwise turns.
///
/// Maps local coordinates to output pixels: `out = origin + R(turns) · local`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub origin: (f32, f32),
    pub quarter_turns_ccw: u8,
}

impl Transform {
    fn rotate_vec(turns: u8, (x, y): (f32, f32)) -> (f32, f32) {
        match turns % 4 {
            0 => (x, y),
            1 => (y, -x),
            2 => (-x, -y),
            _ => (-y, x),
        }
    }

    pub fn apply(&self, point: (f32, f32)) -> (f32, f32) {
        let (rx, ry) = Self::rotate_vec(self.quarter_turns_ccw, point);
        (self.origin.0 + rx, self.origin.1 + ry)
    }

    /// Output-space bounding box of a local rectangle.
    fn map_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.apply((rect.x, rect.y)),
            self.apply((rect.right(), rect.y)),
            self.apply((rect.x, rect.bottom())),
            self.apply((rect.right(), rect.bottom())),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Turn a locally upright sprite into output orientation.
    fn orient(&self, sprite: RgbaImage) -> RgbaImage {
        match self.quarter_turns_ccw % 4 {
            0 => sprite,
            1 => imageops::rotate270(&sprite),
            2 => imageops::rotate180(&sprite),
            _ => imageops::rotate90(&sprite),
        }
    }
}

/// The raster being composited.
pub struct Canvas {
    image: RgbaImage,
    transform: Transform,
}

impl Canvas {
    /// Start from an unmodified copy of `source`.
    pub fn from_source(source: &DynamicImage) -> Self {
        Self {
            image: source.to_rgba8(),
            transform: Transform::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Open a transform scope; the transform is restored when the guard drops.
    pub fn save(&mut self) -> CanvasScope<'_> {
        let saved = self.transform;
        CanvasScope {
            canvas: self,
            saved,
        }
    }

    /// Move the local origin by `(dx, dy)` in local coordinates.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.origin = self.transform.apply((dx, dy));
    }

    /// Rotate the local axes 90° counter-clockwise (canvas `rotate(-π/2)`).
    pub fn rotate_ccw(&mut self) {
        self.transform.quarter_turns_ccw = (self.transform.quarter_turns_ccw + 1) % 4;
    }

    /// Opaque fill of a local rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let out = self.transform.map_rect(rect);
        let x0 = out.x.round().max(0.0) as u32;
        let y0 = out.y.round().max(0.0) as u32;
        let x1 = (out.right().round().max(0.0) as u32).min(self.width());
        let y1 = (out.bottom().round().max(0.0) as u32).min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// Draw `source` scaled into a local rectangle.
    pub fn draw_image(&mut self, source: &RgbaImage, rect: Rect, shadow: Option<Shadow>) {
        let width = rect.width.round().max(1.0) as u32;
        let height = rect.height.round().max(1.0) as u32;
        let scaled = if (width, height) == source.dimensions() {
            source.clone()
        } else {
            imageops::resize(source, width, height, FilterType::Lanczos3)
        };
        let local = Rect::new(rect.x, rect.y, width as f32, height as f32);
        self.draw_sprite(scaled, local, shadow);
    }

    /// Draw one line of text anchored at local `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_text(
        &mut self,
        face: &Typeface,
        text: &str,
        font_size: f32,
        color: Rgba<u8>,
        (x, y): (f32, f32),
        align: TextAlign,
        baseline: TextBaseline,
        shadow: Option<Shadow>,
    ) {
        let sprite = face.rasterize(text, font_size, color);
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - sprite.advance / 2.0,
        };
        let baseline_y = match baseline {
            TextBaseline::Alphabetic => y,
            TextBaseline::Middle => y + (sprite.metrics.ascent + sprite.metrics.descent) / 2.0,
            TextBaseline::Top => y + sprite.metrics.ascent,
        };
        let local = Rect::new(
            start_x - sprite.origin_x,
            baseline_y - sprite.baseline,
            sprite.image.width() as f32,
            sprite.image.height() as f32,
        );
        self.draw_sprite(sprite.image, local, shadow);
    }

    /// Place an upright sprite occupying `local`, shadow first.
    fn draw_sprite(&mut self, sprite: RgbaImage, local: Rect, shadow: Option<Shadow>) {
        let out = self.transform.map_rect(local);
        let sprite = self.transform.orient(sprite);
        let x = out.x.round() as i64;
        let y = out.y.round() as i64;
        if let Some(shadow) = shadow {
            self.cast_shadow(&sprite, x, y, shadow);
        }
        imageops::overlay(&mut self.image, &sprite, x, y);
    }

    fn cast_shadow(&mut self, sprite: &RgbaImage, x: i64, y: i64, shadow: Shadow) {
        let pad = (shadow.blur * 1.5).ceil() as u32 + 1;
        let Rgba([r, g, b, a]) = shadow.color;
        let mut mask = RgbaImage::from_pixel(
            sprite.width() + 2 * pad,
            sprite.height() + 2 * pad,
            Rgba([r, g, b, 0]),
        );
        for (sx, sy, px) in sprite.enumerate_pixels() {
            let alpha = (px[3] as u32 * a as u32 + 127) / 255;
            mask.put_pixel(sx + pad, sy + pad, Rgba([r, g, b, alpha as u8]));
        }
        let mask = if shadow.blur > 0.0 {
            imageops::blur(&mask, shadow.blur / 2.0)
        } else {
            mask
        };
        let sx = x - pad as i64 + shadow.offset.0.round() as i64;
        let sy = y - pad as i64 + shadow.offset.1.round() as i64;
        imageops::overlay(&mut self.image, &mask, sx, sy);
    }
}

/// Transform scope opened by [`Canvas::save`].
pub struct CanvasScope<'a> {
    canvas: &'a mut Canvas,
    saved: Transform,
}

impl Deref for CanvasScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for CanvasScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for CanvasScope<'_> {
    fn drop(&mut self) {
        self.canvas.transform = self.saved;
    }
}
