//! Flashcard drill state machine.
//!
//! ```text
//! NotStarted --start--> Active --close--> Closed
//!                        |  ^
//!                        +--+ reveal / mark / next / previous / restart
//! ```
//!
//! The deck is a shuffled copy of the collection taken at `start`; it is only
//! reshuffled by `restart`. Boundary moves (next at the last card, previous at
//! the first, scoring a hidden card) leave the state untouched and report
//! [`Transition::Unchanged`]. Operations outside `Active` are rejected with a
//! [`SessionError`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::error::SessionError;
use crate::types::VocabularyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillPhase {
    NotStarted,
    Active,
    Closed,
}

/// Whether an accepted operation changed the drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Applied,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct FlashcardSession<R = StdRng> {
    phase: DrillPhase,
    original: Vec<VocabularyRecord>,
    deck: Vec<VocabularyRecord>,
    position: usize,
    revealed: bool,
    correct: u32,
    incorrect: u32,
    rng: R,
}

impl FlashcardSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for FlashcardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FlashcardSession<R> {
    /// A drill that shuffles with the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            phase: DrillPhase::NotStarted,
            original: Vec::new(),
            deck: Vec::new(),
            position: 0,
            revealed: false,
            correct: 0,
            incorrect: 0,
            rng,
        }
    }

    /// Snapshot `collection` and deal a shuffled deck.
    ///
    /// Calling this on an active drill starts over with the new collection.
    pub fn start(&mut self, collection: &[VocabularyRecord]) -> Result<(), SessionError> {
        if self.phase == DrillPhase::Closed {
            return Err(SessionError::Closed);
        }
        if collection.is_empty() {
            return Err(SessionError::EmptyCollection);
        }

        self.original = collection.to_vec();
        self.phase = DrillPhase::Active;
        self.deal();
        Ok(())
    }

    /// Flip the current card.
    pub fn reveal(&mut self) -> Result<Transition, SessionError> {
        self.ensure_active()?;
        self.revealed = !self.revealed;
        Ok(Transition::Applied)
    }

    pub fn mark_correct(&mut self) -> Result<Transition, SessionError> {
        self.score(true)
    }

    pub fn mark_incorrect(&mut self) -> Result<Transition, SessionError> {
        self.score(false)
    }

    pub fn next(&mut self) -> Result<Transition, SessionError> {
        self.ensure_active()?;
        if self.is_last() {
            return Ok(Transition::Unchanged);
        }
        self.position += 1;
        self.revealed = false;
        Ok(Transition::Applied)
    }

    pub fn previous(&mut self) -> Result<Transition, SessionError> {
        self.ensure_active()?;
        if self.position == 0 {
            return Ok(Transition::Unchanged);
        }
        self.position -= 1;
        self.revealed = false;
        Ok(Transition::Applied)
    }

    /// Reshuffle the original collection and zero the score.
    pub fn restart(&mut self) -> Result<Transition, SessionError> {
        self.ensure_active()?;
        self.deal();
        Ok(Transition::Applied)
    }

    pub fn close(&mut self) -> Transition {
        if self.phase == DrillPhase::Closed {
            return Transition::Unchanged;
        }
        self.phase = DrillPhase::Closed;
        self.deck.clear();
        self.original.clear();
        Transition::Applied
    }

    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    pub fn deck(&self) -> &[VocabularyRecord] {
        &self.deck
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect
    }

    pub fn current_card(&self) -> Option<&VocabularyRecord> {
        self.deck.get(self.position)
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.deck.len()
    }

    /// Last card with its answer showing.
    pub fn is_complete(&self) -> bool {
        self.phase == DrillPhase::Active && self.is_last() && self.revealed
    }

    pub fn snapshot(&self) -> DrillSnapshot {
        let card = self.current_card().map(|record| CardView {
            id: record.id,
            front: record.display_word(),
            back: self.revealed.then(|| CardBack {
                meaning: record.meaning.clone(),
                example: record.example.clone(),
                synonyms: record.synonyms.clone(),
                antonyms: record.antonyms.clone(),
            }),
        });

        DrillSnapshot {
            phase: self.phase,
            card_number: if self.deck.is_empty() { 0 } else { self.position + 1 },
            total: self.deck.len(),
            revealed: self.revealed,
            correct: self.correct,
            incorrect: self.incorrect,
            is_first: self.is_first(),
            is_last: self.is_last(),
            completed: self.is_complete(),
            card,
        }
    }

    fn score(&mut self, correct: bool) -> Result<Transition, SessionError> {
        self.ensure_active()?;
        if !self.revealed {
            return Ok(Transition::Unchanged);
        }

        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }

        if !self.is_last() {
            self.position += 1;
            self.revealed = false;
        }
        Ok(Transition::Applied)
    }

    fn deal(&mut self) {
        self.deck = self.original.clone();
        self.deck.shuffle(&mut self.rng);
        self.position = 0;
        self.revealed = false;
        self.correct = 0;
        self.incorrect = 0;
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.phase {
            DrillPhase::Active => Ok(()),
            DrillPhase::NotStarted => Err(SessionError::NotStarted),
            DrillPhase::Closed => Err(SessionError::Closed),
        }
    }
}

/// Serializable view of the drill for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillSnapshot {
    pub phase: DrillPhase,
    /// 1-based; 0 when there is no deck.
    pub card_number: usize,
    pub total: usize,
    pub revealed: bool,
    pub correct: u32,
    pub incorrect: u32,
    pub is_first: bool,
    pub is_last: bool,
    pub completed: bool,
    pub card: Option<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: Uuid,
    pub front: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<CardBack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardBack {
    pub meaning: String,
    pub example: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}
