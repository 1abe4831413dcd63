//! The branding compositor.
//!
//! A [`Compositor`] owns the parsed fonts and the organization [`Brand`]; it
//! is built once and reused for every image. [`Compositor::composite`] is a
//! pure function of (source, logo, settings): it plans the layers with
//! [`plan_layers`] and replays them onto a fresh [`Canvas`] in order.

use super::backend::Dimensions;
use super::canvas::{Canvas, Shadow, TextAlign, TextBaseline};
use super::font::{FontError, Fonts};
use super::layers::{Brand, Layer, WHITE, plan_layers};
use crate::logos::LogoCache;
use crate::settings::{LogoVariant, Settings};
use image::{DynamicImage, RgbaImage};
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("logo '{0}' is not loaded")]
    LogoNotReady(LogoVariant),
    #[error("font error: {0}")]
    Font(#[from] FontError),
}

pub struct Compositor {
    fonts: Fonts,
    brand: Brand,
}

impl Compositor {
    pub fn new(brand: Brand) -> Result<Self, CompositeError> {
        Ok(Self {
            fonts: Fonts::embedded()?,
            brand,
        })
    }

    /// Render `settings` onto a copy of `source`. The output has the source's
    /// dimensions and the source itself is never modified.
    pub fn composite(
        &self,
        source: &DynamicImage,
        logo: &RgbaImage,
        settings: &Settings,
    ) -> RgbaImage {
        let mut canvas = Canvas::from_source(source);
        let layers = plan_layers(
            Dimensions::of(source),
            Dimensions::of(logo),
            settings,
            &self.brand,
            &self.fonts.bold,
        );

        for layer in &layers {
            match layer {
                Layer::CaptionBar {
                    rect,
                    fill,
                    caption,
                } => {
                    canvas.fill_rect(*rect, *fill);
                    let Some(caption) = caption else { continue };
                    if !caption.layout.fits {
                        warn!(
                            "caption overflows the bar at the minimum size ({:.1}px, {} lines)",
                            caption.layout.font_size,
                            caption.layout.lines.len()
                        );
                    }
                    for (line, anchor) in caption.line_anchors() {
                        canvas.fill_text(
                            &self.fonts.bold,
                            line,
                            caption.layout.font_size,
                            WHITE,
                            anchor,
                            TextAlign::Center,
                            TextBaseline::Middle,
                            Some(Shadow::SOFT),
                        );
                    }
                }
                Layer::Logo { rect, .. } => {
                    canvas.draw_image(logo, *rect, Some(Shadow::SOFT));
                }
                Layer::SubLabel {
                    text,
                    line,
                    anchor,
                    fill,
                    shadow,
                } => {
                    canvas.fill_text(
                        &self.fonts.bold,
                        text,
                        line.font_size,
                        *fill,
                        *anchor,
                        TextAlign::Center,
                        TextBaseline::Top,
                        Some(*shadow),
                    );
                }
                Layer::Credit {
                    text,
                    font_size,
                    anchor,
                } => {
                    let mut scope = canvas.save();
                    scope.translate(anchor.0, anchor.1);
                    scope.rotate_ccw();
                    scope.fill_text(
                        &self.fonts.regular,
                        text,
                        *font_size,
                        WHITE,
                        (0.0, 0.0),
                        TextAlign::Left,
                        TextBaseline::Alphabetic,
                        Some(Shadow::STRONG),
                    );
                }
            }
        }

        debug!(
            "composited {}x{} with {} layers",
            canvas.width(),
            canvas.height(),
            layers.len()
        );
        canvas.into_image()
    }

    /// [`composite`](Self::composite) with the logo taken from `logos`.
    ///
    /// Fails with [`CompositeError::LogoNotReady`] instead of drawing without
    /// a logo.
    pub fn composite_cached(
        &self,
        source: &DynamicImage,
        logos: &LogoCache,
        settings: &Settings,
    ) -> Result<RgbaImage, CompositeError> {
        let logo = logos
            .get(settings.logo)
            .ok_or(CompositeError::LogoNotReady(settings.logo))?;
        Ok(self.composite(source, logo, settings))
    }
}
