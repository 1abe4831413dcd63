//! Embedded typefaces, text measurement and line rasterization.
//!
//! Two DejaVu Sans faces are compiled into the binary: bold for the caption
//! bar and the sub-logo label, regular for the photo credit. Sizes are CSS
//! pixel sizes (the em square), converted to `ab_glyph`'s height-based
//! [`PxScale`] per face.
//!
//! Measurement and rasterization walk glyphs identically (advance + kerning),
//! so a line the fitter accepted is exactly as wide when it is drawn.

use ab_glyph::{Font, FontRef, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use thiserror::Error;

const REGULAR_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");
const BOLD_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

#[derive(Error, Debug)]
#[error("embedded font '{name}' could not be parsed")]
pub struct FontError {
    pub name: &'static str,
}

/// Width of a single line of text at a given pixel size.
///
/// The seam between the text fitter and real glyph metrics. Tests substitute
/// a fixed-advance implementation so fitting is deterministic without fonts.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Vertical metrics of a face at a given size, in pixels.
///
/// `descent` is negative (below the baseline), as in the font tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// A single rendered line on a transparent background.
///
/// Transparent pixels carry the fill color with zero alpha so blurring the
/// sprite (for shadows) never bleeds black into the edges.
#[derive(Debug, Clone)]
pub struct TextSprite {
    pub image: RgbaImage,
    /// X of the pen start inside `image`.
    pub origin_x: f32,
    /// Row of the alphabetic baseline inside `image`.
    pub baseline: f32,
    /// Horizontal advance of the whole line.
    pub advance: f32,
    pub metrics: LineMetrics,
}

/// One parsed typeface.
pub struct Typeface {
    font: FontRef<'static>,
}

impl Typeface {
    fn parse(name: &'static str, data: &'static [u8]) -> Result<Self, FontError> {
        let font = FontRef::try_from_slice(data).map_err(|_| FontError { name })?;
        Ok(Self { font })
    }

    /// Converts an em-square pixel size to the face's height-based scale.
    fn scale(&self, font_size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(2048.0);
        PxScale::from(font_size * self.font.height_unscaled() / units_per_em)
    }

    pub fn metrics(&self, font_size: f32) -> LineMetrics {
        let scaled = self.font.as_scaled(self.scale(font_size));
        LineMetrics {
            ascent: scaled.ascent(),
            descent: scaled.descent(),
        }
    }

    /// Rasterize one line of text in `color`.
    pub fn rasterize(&self, text: &str, font_size: f32, color: Rgba<u8>) -> TextSprite {
        let scale = self.scale(font_size);
        let scaled = self.font.as_scaled(scale);
        let metrics = self.metrics(font_size);
        let advance = self.text_width(text, font_size);

        // Glyph outlines may overhang their advance box (italics, accents).
        let pad = (font_size * 0.15).ceil().max(2.0);
        let width = (advance + 2.0 * pad).ceil().max(1.0) as u32;
        let height = (metrics.ascent - metrics.descent + 2.0 * pad).ceil().max(1.0) as u32;
        let baseline = pad + metrics.ascent;

        let Rgba([r, g, b, a]) = color;
        let mut image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));

        let mut cursor_x = pad;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                cursor_x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(cursor_x, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = gx as i64 + bounds.min.x as i64;
                    let y = gy as i64 + bounds.min.y as i64;
                    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                        return;
                    }
                    let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
                    let pixel = image.get_pixel_mut(x as u32, y as u32);
                    // Neighbouring glyph boxes overlap; keep the stronger coverage.
                    pixel[3] = pixel[3].max(alpha);
                });
            }
            cursor_x += scaled.h_advance(id);
            prev = Some(id);
        }

        TextSprite {
            image,
            origin_x: pad,
            baseline,
            advance,
            metrics,
        }
    }
}

impl TextMeasure for Typeface {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(self.scale(font_size));
        let mut width = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

/// The two faces used by the compositor.
pub struct Fonts {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl Fonts {
    pub fn embedded() -> Result<Self, FontError> {
        Ok(Self {
            regular: Typeface::parse("DejaVuSans", REGULAR_FONT_DATA)?,
            bold: Typeface::parse("DejaVuSans-Bold", BOLD_FONT_DATA)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> Fonts {
        Fonts::embedded().unwrap()
    }

    #[test]
    fn embedded_fonts_parse() {
        assert!(Fonts::embedded().is_ok());
    }

    #[test]
    fn width_scales_linearly_with_size() {
        let f = fonts();
        let w10 = f.bold.text_width("Einsatz Wesel", 10.0);
        let w20 = f.bold.text_width("Einsatz Wesel", 20.0);
        assert!(w10 > 0.0);
        assert!((w20 / w10 - 2.0).abs() < 0.01, "w10={w10} w20={w20}");
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let f = fonts();
        assert!(f.bold.text_width("Brand", 40.0) > f.regular.text_width("Brand", 40.0));
    }

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(fonts().regular.text_width("", 30.0), 0.0);
    }

    #[test]
    fn metrics_are_proportional_to_em_size() {
        let m = fonts().regular.metrics(100.0);
        // DejaVu Sans: ascent ~0.93em, descent ~-0.24em.
        assert!(m.ascent > 80.0 && m.ascent < 100.0, "ascent={}", m.ascent);
        assert!(m.descent < 0.0 && m.descent > -40.0, "descent={}", m.descent);
    }

    #[test]
    fn rasterized_line_has_ink_in_fill_color() {
        let sprite = fonts()
            .bold
            .rasterize("THW", 32.0, Rgba([255, 255, 255, 255]));
        assert!(sprite.image.width() as f32 >= sprite.advance);
        let inked: Vec<_> = sprite.image.pixels().filter(|p| p[3] > 0).collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
    }

    #[test]
    fn rasterized_ink_sits_above_baseline() {
        // Capitals without descenders: no ink more than a pixel below the baseline.
        let sprite = fonts().bold.rasterize("HEH", 40.0, Rgba([0, 0, 0, 255]));
        let below = (sprite.baseline.ceil() as u32 + 1)..sprite.image.height();
        for y in below {
            for x in 0..sprite.image.width() {
                assert_eq!(sprite.image.get_pixel(x, y)[3], 0, "ink at ({x},{y})");
            }
        }
    }
}
