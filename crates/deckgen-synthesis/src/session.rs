//! Per-deck synthesis session.
//!
//! A deck is one independent unit of work. The session guarantees at most
//! one in-flight synthesis call per deck: a second request while one is
//! outstanding is rejected with [`SynthesisError::Busy`] rather than raced,
//! because every synthesis path mutates the deck array by index. Failed
//! calls leave the previous deck state intact.

use std::sync::Mutex;

use deckgen_schema::{deck::edit, renumber, GenerationConfig, ParsedTable, SlideRecord, SynthesisMode};

use crate::client::ModelClient;
use crate::error::{Result, SynthesisError};
use crate::outline;

/// Owns one deck and serializes synthesis calls against it.
pub struct DeckSession {
    deck: Mutex<Vec<SlideRecord>>,
}

impl DeckSession {
    /// Start a session with an empty deck.
    pub fn new() -> Self {
        Self::with_deck(Vec::new())
    }

    /// Start a session from an existing deck (e.g., loaded history).
    pub fn with_deck(mut deck: Vec<SlideRecord>) -> Self {
        renumber(&mut deck);
        Self {
            deck: Mutex::new(deck),
        }
    }

    /// Clone of the current deck state.
    pub fn snapshot(&self) -> Vec<SlideRecord> {
        self.deck.lock().expect("deck lock poisoned").clone()
    }

    /// Full-deck synthesis per the config's mode. Replaces the deck only
    /// on success.
    pub fn synthesize(
        &self,
        client: &dyn ModelClient,
        table: &ParsedTable,
        config: &GenerationConfig,
        assets: &[String],
    ) -> Result<Vec<SlideRecord>> {
        let mut guard = self.deck.try_lock().map_err(|_| SynthesisError::Busy)?;

        let new_deck = match config.mode {
            SynthesisMode::Split => outline::split_outline(table, config),
            SynthesisMode::Expand => outline::expand_outline(client, table, config, assets)?,
        };

        *guard = new_deck.clone();
        Ok(new_deck)
    }

    /// Re-synthesize one slide in place. Other records keep their indices.
    pub fn regenerate_slide(
        &self,
        client: &dyn ModelClient,
        index: usize,
        table: &ParsedTable,
        config: &GenerationConfig,
    ) -> Result<SlideRecord> {
        let mut guard = self.deck.try_lock().map_err(|_| SynthesisError::Busy)?;

        let replacement = outline::regenerate_slide(client, &guard, index, table, config)?;
        guard[index] = replacement.clone();
        Ok(replacement)
    }

    /// Apply a free-text instruction; the deck is replaced atomically.
    /// Returns the model's change summary.
    pub fn modify(
        &self,
        client: &dyn ModelClient,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<String> {
        let mut guard = self.deck.try_lock().map_err(|_| SynthesisError::Busy)?;

        let outcome = outline::modify_deck(client, &guard, instruction, config)?;
        *guard = outcome.slides;
        Ok(outcome.summary)
    }

    /// Manual title edit (text-only path, never changes the type tag).
    pub fn edit_title(&self, index: usize, title: impl Into<String>) -> bool {
        let mut guard = self.deck.lock().expect("deck lock poisoned");
        edit::set_title(&mut guard, index, title)
    }

    /// Manual bullets edit.
    pub fn edit_bullets(&self, index: usize, bullets: Vec<String>) -> bool {
        let mut guard = self.deck.lock().expect("deck lock poisoned");
        edit::set_bullets(&mut guard, index, bullets)
    }

    /// Manual speaker-notes edit.
    pub fn edit_notes(&self, index: usize, notes: Option<String>) -> bool {
        let mut guard = self.deck.lock().expect("deck lock poisoned");
        edit::set_notes(&mut guard, index, notes)
    }
}

impl Default for DeckSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CompletionRequest;
    use deckgen_schema::{CellValue, ParsedSheet};

    struct CannedClient(String);

    impl ModelClient for CannedClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingClient;

    impl ModelClient for FailingClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(SynthesisError::MalformedResponse("boom".to_string()))
        }
    }

    fn sample_table() -> ParsedTable {
        let mut sheet = ParsedSheet::new("S", vec!["a".to_string()]);
        for i in 0..6 {
            sheet.push_row(vec![CellValue::Number(i as f64)]);
        }
        ParsedTable::new("t.csv", vec![sheet])
    }

    fn split_config(pages: usize) -> GenerationConfig {
        GenerationConfig {
            mode: SynthesisMode::Split,
            page_count: pages,
            ..Default::default()
        }
    }

    #[test]
    fn test_synthesize_split_replaces_deck() {
        let session = DeckSession::new();
        let table = sample_table();

        let deck = session
            .synthesize(&FailingClient, &table, &split_config(4), &[])
            .unwrap();
        assert_eq!(deck.len(), 4);
        assert_eq!(session.snapshot().len(), 4);
    }

    #[test]
    fn test_failed_synthesis_preserves_previous_deck() {
        let session = DeckSession::with_deck(vec![
            SlideRecord::content(0, "Keep me", vec![]),
        ]);
        let table = sample_table();
        let config = GenerationConfig::default(); // expand mode

        let result = session.synthesize(&FailingClient, &table, &config, &[]);
        assert!(result.is_err());
        assert_eq!(session.snapshot()[0].title, "Keep me");
    }

    #[test]
    fn test_failed_regen_preserves_other_slides() {
        let session = DeckSession::with_deck(vec![
            SlideRecord::content(0, "A", vec![]),
            SlideRecord::content(0, "B", vec![]),
        ]);
        let table = sample_table();

        let result = session.regenerate_slide(
            &CannedClient("not json at all".to_string()),
            1,
            &table,
            &GenerationConfig::default(),
        );
        assert!(result.is_err());

        let deck = session.snapshot();
        assert_eq!(deck[0].title, "A");
        assert_eq!(deck[1].title, "B");
        assert!(deckgen_schema::is_numbered(&deck));
    }

    #[test]
    fn test_regen_only_touches_target_index() {
        let session = DeckSession::with_deck(vec![
            SlideRecord::content(0, "A", vec![]),
            SlideRecord::content(1, "B", vec![]),
            SlideRecord::content(2, "C", vec![]),
        ]);
        let table = sample_table();

        let replacement = session
            .regenerate_slide(
                &CannedClient(r#"{"type":"content","title":"B2"}"#.to_string()),
                1,
                &table,
                &GenerationConfig::default(),
            )
            .unwrap();

        assert_eq!(replacement.index, 1);
        let deck = session.snapshot();
        assert_eq!(deck[0].title, "A");
        assert_eq!(deck[1].title, "B2");
        assert_eq!(deck[2].title, "C");
        assert_eq!(deck[2].index, 2);
    }

    #[test]
    fn test_modify_replaces_whole_deck() {
        let session = DeckSession::with_deck(vec![
            SlideRecord::content(0, "A", vec![]),
            SlideRecord::content(1, "B", vec![]),
        ]);

        let summary = session
            .modify(
                &CannedClient(
                    r#"{"slides":[{"title":"Merged"}],"summary":"Merged slides"}"#.to_string(),
                ),
                "merge",
                &GenerationConfig::default(),
            )
            .unwrap();

        assert_eq!(summary, "Merged slides");
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn test_manual_edits() {
        let session = DeckSession::with_deck(vec![SlideRecord::content(0, "A", vec![])]);

        assert!(session.edit_title(0, "A+"));
        assert!(session.edit_bullets(0, vec!["b".to_string()]));
        assert!(session.edit_notes(0, Some("n".to_string())));

        let deck = session.snapshot();
        assert_eq!(deck[0].title, "A+");
        assert_eq!(deck[0].notes.as_deref(), Some("n"));
    }
}
