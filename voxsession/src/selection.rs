//! Search-prompt selection registry.
//!
//! Maps an outstanding search prompt (keyed by its message id) to the
//! candidate list it offered, and resolves a discrete user choice into
//! one candidate. An unknown prompt or an out-of-range choice resolves
//! to `None`: the triggering event is usually stale or foreign input
//! (a reaction from the bot itself, or on an unrelated message) and is
//! ignored rather than reported.
//!
//! The registry neither expires entries nor enforces single use; if a
//! caller wants one-shot prompts, that policy lives with the caller.

use std::collections::HashMap;
use voxresolver::TrackCandidate;

/// Prompt-message identifier handed out by the command surface.
pub type PromptId = u64;

#[derive(Debug, Default)]
pub struct SelectionRegistry {
    prompts: HashMap<PromptId, Vec<TrackCandidate>>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the candidate list offered by a prompt. Several
    /// prompts may be outstanding at once for the same session.
    pub fn register(&mut self, prompt: PromptId, candidates: Vec<TrackCandidate>) {
        self.prompts.insert(prompt, candidates);
    }

    /// Resolves a user's choice against a registered prompt.
    pub fn resolve_choice(&self, prompt: PromptId, choice: usize) -> Option<TrackCandidate> {
        self.prompts
            .get(&prompt)
            .and_then(|candidates| candidates.get(choice))
            .cloned()
    }

    /// Number of outstanding prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<TrackCandidate> {
        (0..n)
            .map(|i| TrackCandidate {
                source_url: format!("https://example.com/w{i}"),
                stream_url: format!("https://cdn.example.com/s{i}"),
                title: format!("Song {i}"),
                duration_secs: Some(100),
                uploader: None,
            })
            .collect()
    }

    #[test]
    fn resolves_a_valid_choice() {
        let mut registry = SelectionRegistry::new();
        registry.register(42, candidates(3));
        let chosen = registry.resolve_choice(42, 1).unwrap();
        assert_eq!(chosen.title, "Song 1");
    }

    #[test]
    fn out_of_range_choice_is_not_found() {
        let mut registry = SelectionRegistry::new();
        registry.register(42, candidates(3));
        assert!(registry.resolve_choice(42, 7).is_none());
    }

    #[test]
    fn unknown_prompt_is_not_found() {
        let registry = SelectionRegistry::new();
        assert!(registry.resolve_choice(9999, 0).is_none());
    }

    #[test]
    fn prompts_coexist_and_survive_resolution() {
        let mut registry = SelectionRegistry::new();
        registry.register(1, candidates(2));
        registry.register(2, candidates(5));
        assert_eq!(registry.len(), 2);

        assert!(registry.resolve_choice(1, 0).is_some());
        // No single-use enforcement: the entry is still there.
        assert!(registry.resolve_choice(1, 1).is_some());
        assert_eq!(registry.len(), 2);
    }
}
