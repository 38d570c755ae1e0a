//! Draws track boxes and identifier labels onto output frames.

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::integration::{Track, TrackId};
use crate::tracker::Rect;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("track {track_id} has a malformed box {rect:?}")]
    MalformedBox { track_id: TrackId, rect: Rect },
    #[error("track {track_id} has an empty box")]
    EmptyBox { track_id: TrackId },
    #[error("label font could not be parsed")]
    InvalidFont,
}

/// Colors and sizes used when annotating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    pub color: [u8; 3],
    /// Box outline width in pixels
    pub thickness: u32,
    /// Label baseline distance above the box
    pub label_offset: i32,
    /// Label glyph height in pixels
    pub label_scale: f32,
    pub label_prefix: String,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            thickness: 2,
            label_offset: 10,
            label_scale: 14.4,
            label_prefix: "ID: ".to_string(),
        }
    }
}

/// DejaVu Sans Mono, used for identifier labels unless another font is set.
static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Renders confirmed tracks. Without a font only boxes are drawn.
#[derive(Clone)]
pub struct FrameAnnotator {
    style: AnnotationStyle,
    font: Option<FontArc>,
}

impl FrameAnnotator {
    /// Annotator that labels tracks with the bundled font.
    pub fn new(style: AnnotationStyle) -> Self {
        let font = FontArc::try_from_slice(DEFAULT_FONT).ok();
        if font.is_none() {
            warn!("bundled label font failed to parse, drawing boxes only");
        }
        Self { style, font }
    }

    /// Draw boxes only.
    pub fn without_font(mut self) -> Self {
        self.font = None;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Use a TTF/OTF font, given as raw bytes, for identifier labels.
    pub fn with_font_bytes(self, bytes: Vec<u8>) -> Result<Self, AnnotateError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| AnnotateError::InvalidFont)?;
        Ok(self.with_font(font))
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    pub fn label(&self, track_id: &TrackId) -> String {
        format!("{}{}", self.style.label_prefix, track_id)
    }

    /// Draw one track's box and label. The frame is untouched on error.
    pub fn annotate(&self, frame: &mut RgbImage, track: &Track) -> Result<(), AnnotateError> {
        if !track.rect.is_well_formed() {
            return Err(AnnotateError::MalformedBox {
                track_id: track.track_id.clone(),
                rect: track.rect,
            });
        }
        let [x1, y1, x2, y2] = track.rect.to_pixel_tlbr();
        if x2 <= x1 || y2 <= y1 {
            return Err(AnnotateError::EmptyBox {
                track_id: track.track_id.clone(),
            });
        }

        let color = Rgb(self.style.color);
        let (width, height) = ((x2 - x1) as u32, (y2 - y1) as u32);
        for inset in 0..self.style.thickness {
            let shrink = 2 * inset;
            if shrink >= width || shrink >= height {
                break;
            }
            let outline = PixelRect::at(x1 + inset as i32, y1 + inset as i32)
                .of_size(width - shrink, height - shrink);
            draw_hollow_rect_mut(frame, outline, color);
        }

        if let Some(font) = &self.font {
            let scale = PxScale::from(self.style.label_scale);
            let top = y1 - self.style.label_offset - self.style.label_scale as i32;
            draw_text_mut(frame, color, x1, top, scale, font, &self.label(&track.track_id));
        }
        Ok(())
    }
}

impl Default for FrameAnnotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default())
    }
}

impl std::fmt::Debug for FrameAnnotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAnnotator")
            .field("style", &self.style)
            .field("font", &self.font.is_some())
            .finish()
    }
}
