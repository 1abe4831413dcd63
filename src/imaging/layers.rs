//! Layer planning: all branding geometry as pure functions.
//!
//! [`plan_layers`] turns output dimensions, the logo's native dimensions and a
//! [`Settings`] record into an ordered list of [`Layer`]s. Nothing here touches
//! pixels; the compositor replays the list onto a canvas. The list order is the
//! draw order and later layers paint over earlier ones:
//!
//! ```text
//! 1. CaptionBar   full width, bottom 35% of the height, optional fitted text
//! 2. Logo         20% (gear) / 40% (wordmark) of the width, corner-anchored
//! 3. SubLabel     gear logos only, one line centered under the logo
//! 4. Credit       "Foto: <org> / <name>", rotated up the left edge
//! ```
//!
//! All sizes are fractions of the output, so a branded 6000px photo looks
//! like a branded 1000px photo scaled up.

use super::backend::Dimensions;
use super::canvas::{Rect, Shadow};
use super::fit::{SingleLine, TextLayout, fit, shrink_to_width};
use super::font::TextMeasure;
use crate::settings::{LogoVariant, Position, Settings};
use image::Rgba;

/// Caption bar height as a fraction of the output height.
pub const BAR_HEIGHT_RATIO: f32 = 0.35;
/// Logo width as a fraction of the output width.
pub const GEAR_LOGO_RATIO: f32 = 0.20;
pub const WORDMARK_LOGO_RATIO: f32 = 0.40;
/// Logo inset from its corner, as a fraction of the output width.
pub const LOGO_PADDING_RATIO: f32 = 0.02;
/// Credit inset from the left and bottom edges, as a fraction of the output width.
pub const CREDIT_PADDING_RATIO: f32 = 0.015;
pub const CREDIT_MIN_FONT_SIZE: f32 = 18.0;
pub const CREDIT_FONT_RATIO: f32 = 0.025;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Organization identity drawn into every output.
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    /// Credit prefix, as in "Foto: THW / Max Mustermann".
    pub organization: String,
    /// Signature color: caption bar fill and non-white sub-labels.
    pub primary: Rgba<u8>,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            organization: "THW".to_string(),
            primary: Rgba([0x00, 0x33, 0x99, 0xff]),
        }
    }
}

/// Caption text laid out inside the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionText {
    pub layout: TextLayout,
    /// Horizontal center of every line.
    pub center_x: f32,
    /// Vertical middle of the first line; following lines step by the line height.
    pub first_line_y: f32,
}

impl CaptionText {
    /// Middle-baseline anchor of each line, in order.
    pub fn line_anchors(&self) -> impl Iterator<Item = (&str, (f32, f32))> + '_ {
        let step = self.layout.line_height();
        self.layout
            .lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (line.as_str(), (self.center_x, self.first_line_y + i as f32 * step)))
    }
}

/// One drawing pass of the compositor.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    CaptionBar {
        rect: Rect,
        fill: Rgba<u8>,
        caption: Option<CaptionText>,
    },
    Logo {
        variant: LogoVariant,
        rect: Rect,
    },
    /// Drawn center-aligned with its em-box top at `anchor`.
    SubLabel {
        text: String,
        line: SingleLine,
        anchor: (f32, f32),
        fill: Rgba<u8>,
        shadow: Shadow,
    },
    /// `anchor` is the baseline start; the text runs upwards from it.
    Credit {
        text: String,
        font_size: f32,
        anchor: (f32, f32),
    },
}

impl Layer {
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::CaptionBar { .. } => "caption-bar",
            Layer::Logo { .. } => "logo",
            Layer::SubLabel { .. } => "sub-label",
            Layer::Credit { .. } => "credit",
        }
    }
}

/// Height of the caption bar for an output of `height` pixels.
pub fn bar_height(height: u32) -> f32 {
    (height as f32 * BAR_HEIGHT_RATIO).round()
}

/// Logo rectangle: width from the variant class, height from the native aspect.
pub fn logo_rect(
    output: Dimensions,
    logo: Dimensions,
    variant: LogoVariant,
    position: Position,
) -> Rect {
    let w = output.width as f32;
    let h = output.height as f32;
    let ratio = if variant.is_gear() {
        GEAR_LOGO_RATIO
    } else {
        WORDMARK_LOGO_RATIO
    };
    let logo_width = w * ratio;
    let logo_height = logo_width * (logo.height as f32 / logo.width.max(1) as f32);
    let padding = w * LOGO_PADDING_RATIO;

    let x = if position.is_left() {
        padding
    } else {
        w - logo_width - padding
    };
    let y = if position.is_top() {
        padding
    } else {
        h - logo_height - padding
    };
    Rect::new(x, y, logo_width, logo_height)
}

/// Plan every layer for one output image.
///
/// `measure` must be the face the caption and sub-label are drawn with.
pub fn plan_layers<M: TextMeasure + ?Sized>(
    output: Dimensions,
    logo: Dimensions,
    settings: &Settings,
    brand: &Brand,
    measure: &M,
) -> Vec<Layer> {
    let w = output.width as f32;
    let h = output.height as f32;
    let mut layers = Vec::with_capacity(4);

    let bar = settings.show_caption_bar.then(|| bar_height(output.height));
    if let Some(bar_h) = bar {
        let rect = Rect::new(0.0, h - bar_h, w, bar_h);
        let caption = settings.caption_text().map(|text| {
            let layout = fit(measure, text, w * 0.9, bar_h * 0.8, bar_h * 0.5);
            let line_height = layout.line_height();
            // Centered block, nudged down half a line so ascenders clear the bar edge.
            let first_line_y = rect.y + (bar_h - layout.block_height()) / 2.0 + line_height * 0.5;
            CaptionText {
                layout,
                center_x: w / 2.0,
                first_line_y,
            }
        });
        layers.push(Layer::CaptionBar {
            rect,
            fill: brand.primary,
            caption,
        });
    }

    let rect = logo_rect(output, logo, settings.logo, settings.position);
    layers.push(Layer::Logo {
        variant: settings.logo,
        rect,
    });

    if let Some(text) = settings.sub_label() {
        let line = shrink_to_width(measure, text, rect.width * 1.5, rect.width * 0.15);
        let white = settings.logo.is_white();
        layers.push(Layer::SubLabel {
            text: text.to_string(),
            line,
            anchor: (rect.x + rect.width / 2.0, rect.bottom() + rect.height * 0.05),
            fill: if white { WHITE } else { brand.primary },
            // Contrasting halo: dark behind white text, light behind blue.
            shadow: Shadow {
                color: if white {
                    Rgba([0, 0, 0, 128])
                } else {
                    Rgba([255, 255, 255, 128])
                },
                blur: 3.0,
                offset: (0.0, 1.0),
            },
        });
    }

    if let Some(name) = settings.credit_name() {
        let font_size = CREDIT_MIN_FONT_SIZE.max(w * CREDIT_FONT_RATIO);
        let padding = w * CREDIT_PADDING_RATIO;
        let baseline_y = h - padding - bar.unwrap_or(0.0);
        layers.push(Layer::Credit {
            text: format!("Foto: {} / {}", brand.organization, name),
            font_size,
            anchor: (padding + font_size, baseline_y),
        });
    }

    layers
}
