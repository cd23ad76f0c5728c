//! Per-frame identification of the characters in the 12 team-panel slots.
//!
//! The pipeline, run once per captured frame: sample each panel's backdrop
//! color, alpha-composite every roster icon over it, crop each fixed slot
//! rectangle, score crop-vs-template with per-channel normalized
//! cross-correlation, and keep the best-scoring character per slot.

mod compositor;
mod detector;
mod extract;
pub mod layout;
mod matcher;

pub use compositor::fuse;
pub use detector::{Lineup, LineupDetector, SlotMatch};
pub use extract::{crop_slot, sample_background};
pub use layout::{slot_region, Side, SlotRegion, SLOT_COUNT};
pub use matcher::match_score;

use thiserror::Error;

/// Failures that abort a whole detection call. No partial lineup is ever
/// returned; the caller may retry on a later frame.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("roster has no reference icons")]
    EmptyRoster,

    #[error(
        "{what} at ({x}, {y}) size {width}x{height} does not fit a \
         {frame_width}x{frame_height} frame"
    )]
    OutOfBounds {
        what: &'static str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error(
        "template for '{name}' ({template_width}x{template_height}) is larger \
         than the {slot_width}x{slot_height} slot crop"
    )]
    TemplateTooLarge {
        name: String,
        template_width: u32,
        template_height: u32,
        slot_width: u32,
        slot_height: u32,
    },
}
