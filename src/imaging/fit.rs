//! Auto-fitting text layout.
//!
//! [`fit`] is a bounded shrink-and-rewrap search: wrap greedily at the current
//! size, check the block against the box, otherwise shrink by
//! [`SHRINK_FACTOR`] and try again. Once the next step would land at or below
//! [`MIN_FONT_SIZE`] the last computed layout is accepted even if it overflows.
//!
//! The step and the floor are part of the output contract: changing either
//! moves text on every rendered image.

use super::font::TextMeasure;

/// Smallest size the fitter will shrink towards.
pub const MIN_FONT_SIZE: f32 = 10.0;
/// Multiplicative step per shrink iteration.
pub const SHRINK_FACTOR: f32 = 0.9;
/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Result of fitting a block of text into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Size the lines were wrapped (and must be drawn) at.
    pub font_size: f32,
    pub lines: Vec<String>,
    /// False when the floor was reached without satisfying the box.
    pub fits: bool,
}

impl TextLayout {
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height()
    }
}

/// Fit `text` into `max_width` × `max_height`, starting at `start_font_size`.
///
/// Explicit `\n` breaks start new paragraphs; each paragraph wraps on single
/// spaces. Words are never split, so a word wider than the box stays on its
/// own oversized line and drives the size down to the floor.
pub fn fit<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: f32,
    max_height: f32,
    start_font_size: f32,
) -> TextLayout {
    let mut font_size = start_font_size;
    loop {
        let lines = wrap(measure, text, max_width, font_size);
        let block_height = lines.len() as f32 * font_size * LINE_HEIGHT_FACTOR;
        let widest = lines
            .iter()
            .map(|line| measure.text_width(line, font_size))
            .fold(0.0f32, f32::max);
        let fits = block_height <= max_height && widest <= max_width;

        let next = font_size * SHRINK_FACTOR;
        // Written as a negated comparison so a NaN size also terminates.
        if fits || !(next > MIN_FONT_SIZE) {
            return TextLayout {
                font_size,
                lines,
                fits,
            };
        }
        font_size = next;
    }
}

/// Greedy word wrap at a fixed size.
///
/// A word joins the current line only while the joined line stays strictly
/// narrower than `max_width`. An empty paragraph yields one empty line.
pub fn wrap<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: f32,
    font_size: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut words = paragraph.split(' ');
        let mut current = words.next().unwrap_or_default().to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.text_width(&candidate, font_size) < max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// A single line shrunk (never wrapped) to a maximum width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleLine {
    pub font_size: f32,
    pub width: f32,
}

/// Shrink one line by [`SHRINK_FACTOR`] while it is wider than `max_width`
/// and the size is still above [`MIN_FONT_SIZE`].
///
/// Unlike [`fit`] the check runs before each step, so the final size can end
/// up one step below the floor.
pub fn shrink_to_width<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: f32,
    start_font_size: f32,
) -> SingleLine {
    let mut font_size = start_font_size;
    let mut width = measure.text_width(text, font_size);
    while width > max_width && font_size > MIN_FONT_SIZE {
        font_size *= SHRINK_FACTOR;
        width = measure.text_width(text, font_size);
    }
    SingleLine { font_size, width }
}
