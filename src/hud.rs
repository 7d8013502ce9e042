//! Score display

use crate::consts::CANVAS_SIZE;

/// Screen-space text anchor (pixels, origin top-left) and font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchor {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Score label centred near the top of the canvas
pub const SCORE_ANCHOR: TextAnchor = TextAnchor {
    x: CANVAS_SIZE.0 as f32 / 2.0,
    y: 70.0,
    size: 50.0,
};

/// HUD text for the current score
pub fn score_text(score: u64) -> String {
    format!("Score {}", score)
}

/// Tracks what is on screen so the DOM is only touched on change
#[derive(Debug, Default)]
pub struct HudCache {
    score: Option<u64>,
}

impl HudCache {
    /// Returns the new label if the score changed since the last call
    pub fn score_changed(&mut self, score: u64) -> Option<String> {
        if self.score == Some(score) {
            return None;
        }
        self.score = Some(score);
        Some(score_text(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_text() {
        assert_eq!(score_text(0), "Score 0");
        assert_eq!(score_text(42), "Score 42");
    }

    #[test]
    fn test_cache_reports_changes_only() {
        let mut cache = HudCache::default();
        assert_eq!(cache.score_changed(0).as_deref(), Some("Score 0"));
        assert_eq!(cache.score_changed(0), None);
        assert_eq!(cache.score_changed(1).as_deref(), Some("Score 1"));
    }
}
