use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hud_data::Roster;

use crate::compositor::fuse;
use crate::extract::{crop_slot, sample_background};
use crate::layout::{slot_region, Side, SLOT_COUNT};
use crate::matcher::match_score;
use crate::DetectError;

/// Winner for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotMatch {
    /// Global slot index, 1..=12.
    pub slot: u8,
    pub name: String,
    pub score: f64,
}

/// Full detection result: exactly one entry per slot, ordered by slot index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub slots: Vec<SlotMatch>,
}

impl Lineup {
    pub fn get(&self, slot: u8) -> Option<&SlotMatch> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    pub fn name_of(&self, slot: u8) -> Option<&str> {
        self.get(slot).map(|s| s.name.as_str())
    }
}

/// Matches every slot of a frame against the roster.
///
/// Stateless across calls: each `detect` is a pure function of the frame
/// and the roster it borrows.
pub struct LineupDetector<'a> {
    roster: &'a Roster,
}

impl<'a> LineupDetector<'a> {
    /// Best-match selection is undefined with zero candidates, so an empty
    /// roster is rejected here rather than per call.
    pub fn new(roster: &'a Roster) -> Result<Self, DetectError> {
        if roster.is_empty() {
            return Err(DetectError::EmptyRoster);
        }
        Ok(Self { roster })
    }

    /// Identify the character in each of the 12 slots.
    ///
    /// Any out-of-bounds access aborts the whole call; no partial lineup is
    /// returned.
    pub fn detect(&self, frame: &RgbImage) -> Result<Lineup, DetectError> {
        let mut slots = Vec::with_capacity(SLOT_COUNT as usize);

        for side in [Side::Blue, Side::Red] {
            let background = sample_background(frame, side)?;
            debug!("{:?} panel backdrop: {:?}", side, background.0);

            // Templates depend on (character, side) only, never on the slot;
            // fuse each icon once and share across the side's six slots.
            let templates: Vec<RgbImage> = self
                .roster
                .iter()
                .map(|r| fuse(&r.icon, &r.mask, background))
                .collect();

            let indices: Vec<u8> = side.slots().collect();

            #[cfg(feature = "parallel")]
            let matches: Vec<SlotMatch> = {
                use rayon::prelude::*;
                indices
                    .par_iter()
                    .map(|&slot| self.detect_slot(frame, slot, &templates))
                    .collect::<Result<Vec<_>, _>>()?
            };

            #[cfg(not(feature = "parallel"))]
            let matches: Vec<SlotMatch> = indices
                .iter()
                .map(|&slot| self.detect_slot(frame, slot, &templates))
                .collect::<Result<Vec<_>, _>>()?;

            slots.extend(matches);
        }

        Ok(Lineup { slots })
    }

    fn detect_slot(
        &self,
        frame: &RgbImage,
        slot: u8,
        templates: &[RgbImage],
    ) -> Result<SlotMatch, DetectError> {
        let region = slot_region(slot);
        let crop = crop_slot(frame, region)?;

        // One fresh score per candidate, in roster order; nothing is
        // carried between slots.
        let mut scores = Vec::with_capacity(templates.len());
        for (icon, template) in self.roster.iter().zip(templates) {
            if template.width() > crop.width() || template.height() > crop.height() {
                return Err(DetectError::TemplateTooLarge {
                    name: icon.name.clone(),
                    template_width: template.width(),
                    template_height: template.height(),
                    slot_width: crop.width(),
                    slot_height: crop.height(),
                });
            }
            scores.push(match_score(template, &crop));
        }

        // Strict `>` keeps the earliest roster entry on ties.
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = i;
            }
        }

        let icon = self.roster.get(best).ok_or(DetectError::EmptyRoster)?;
        debug!("slot {} -> {} ({:.3})", slot, icon.name, scores[best]);

        Ok(SlotMatch {
            slot,
            name: icon.name.clone(),
            score: scores[best],
        })
    }
}
