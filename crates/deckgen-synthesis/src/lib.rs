//! Outline synthesis for deckgen.
//!
//! Turns a [`ParsedTable`](deckgen_schema::ParsedTable) into a typed slide
//! deck, either deterministically (`split` mode) or through a chat-completion
//! model (`expand` mode). Model output is treated as untrusted: a recovery
//! ladder salvages JSON from prose and fences, and a normalization pass
//! coerces every record into the schema before it reaches a renderer.

pub mod client;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod prompt;
pub mod recover;
pub mod session;

pub use client::{CompletionRequest, HttpModelClient, ModelClient, DEFAULT_API_URL};
pub use error::{Result, SynthesisError};
pub use outline::{expand_outline, modify_deck, regenerate_slide, split_outline, ModifyOutcome};
pub use session::DeckSession;
