//! Deck-level operations.
//!
//! `index` is both the sort key and the identity handle used for
//! previous/next context during single-slide re-synthesis, so every
//! structural mutation must renumber before the deck is read again.

use crate::slide::SlideRecord;

/// Re-stamp indices to match array position (dense, 0-based).
pub fn renumber(deck: &mut [SlideRecord]) {
    for (i, slide) in deck.iter_mut().enumerate() {
        slide.index = i;
    }
}

/// True when indices are dense, 0-based, and in array order.
pub fn is_numbered(deck: &[SlideRecord]) -> bool {
    deck.iter().enumerate().all(|(i, s)| s.index == i)
}

/// Manual field edits from the consumer. Text fields only; the type tag is
/// never changed through this path.
pub mod edit {
    use super::SlideRecord;

    /// Replace a slide's title.
    pub fn set_title(deck: &mut [SlideRecord], index: usize, title: impl Into<String>) -> bool {
        match deck.get_mut(index) {
            Some(slide) => {
                slide.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Replace a slide's bullets, when the variant has any.
    pub fn set_bullets(deck: &mut [SlideRecord], index: usize, bullets: Vec<String>) -> bool {
        deck.get_mut(index)
            .and_then(|s| s.body.bullets_mut())
            .map(|b| *b = bullets)
            .is_some()
    }

    /// Replace or clear a slide's speaker notes.
    pub fn set_notes(deck: &mut [SlideRecord], index: usize, notes: Option<String>) -> bool {
        match deck.get_mut(index) {
            Some(slide) => {
                slide.notes = notes;
                true
            }
            None => false,
        }
    }
}
