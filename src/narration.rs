//! Victory line shown when a race ends
//!
//! The text comes from an external writer. This module only decides what to
//! show when that writer fails or answers with nothing.

use crate::error::Result;

/// Shown when the writer answers with blank text
pub const BLANK_NARRATION: &str = "VICTORY ATTAINED!";

/// Something that can write a victory line for a winner and theme
pub trait VictoryNarrator {
    fn narrate(&self, winner: &str, theme: &str) -> Result<String>;
}

impl<F> VictoryNarrator for F
where
    F: Fn(&str, &str) -> Result<String>,
{
    fn narrate(&self, winner: &str, theme: &str) -> Result<String> {
        self(winner, theme)
    }
}

/// Ask `narrator` for a victory line, announcing the winner plainly on failure
pub fn victory_message<N: VictoryNarrator + ?Sized>(narrator: &N, winner: &str, theme: &str) -> String {
    match narrator.narrate(winner, theme) {
        Ok(text) if text.trim().is_empty() => BLANK_NARRATION.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("Victory narration for '{}' unavailable ({}), using fallback", theme, e);
            format!("Winner: {}!", winner)
        }
    }
}
