//! Turns a dictionary lookup into a savable vocabulary record.
//!
//! The primary meaning is always the first definition of the first sense.
//! Synonyms and antonyms are collected across every sense, de-duplicated in
//! encounter order and capped at [`MAX_RELATED`]. Examples that are missing,
//! too long or flagged as complex are replaced by a simple template sentence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::types::{DictionaryLookupResult, Meaning, NewVocabularyRecord};

/// Maximum synonyms (and antonyms) kept on a record.
pub const MAX_RELATED: usize = 3;

/// Examples must be strictly shorter than this many characters.
pub const MAX_EXAMPLE_CHARS: usize = 100;

const COMPLEX_MARKER: &str = "complex";

/// Fallback sentences; `{word}` is replaced with the looked-up word.
pub const EXAMPLE_TEMPLATES: [&str; 5] = [
    "I learned a new word today: \"{word}\".",
    "The teacher used \"{word}\" in our lesson.",
    "My friend taught me what \"{word}\" means.",
    "I found \"{word}\" in my favorite book.",
    "Can you use \"{word}\" in a sentence?",
];

/// Source of fallback example sentences.
pub trait ExampleWriter: Send {
    fn example_for(&mut self, word: &str) -> String;
}

/// Picks one of [`EXAMPLE_TEMPLATES`] uniformly at random.
#[derive(Debug, Clone)]
pub struct TemplateExamples {
    rng: StdRng,
}

impl TemplateExamples {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Default for TemplateExamples {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleWriter for TemplateExamples {
    fn example_for(&mut self, word: &str) -> String {
        let template = EXAMPLE_TEMPLATES[self.rng.random_range(0..EXAMPLE_TEMPLATES.len())];
        template.replace("{word}", word)
    }
}

/// Converts lookup results into record drafts.
#[derive(Debug, Clone, Default)]
pub struct DefinitionNormalizer<W = TemplateExamples> {
    writer: W,
}

impl DefinitionNormalizer {
    pub fn new() -> Self {
        Self::with_writer(TemplateExamples::new())
    }
}

impl<W: ExampleWriter> DefinitionNormalizer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Build a draft owned by `owner_id` from a lookup result.
    pub fn normalize(
        &mut self,
        result: &DictionaryLookupResult,
        owner_id: Uuid,
    ) -> Result<NewVocabularyRecord> {
        let word = result.word.trim();
        if word.is_empty() {
            return Err(CoreError::LookupFailed("lookup returned an empty word".to_string()));
        }

        let first = result
            .meanings
            .first()
            .and_then(|m| m.definitions.first())
            .ok_or_else(|| CoreError::LookupFailed(format!("no definitions for {word}")))?;

        let (synonyms, antonyms) = merge_related(&result.meanings);

        let example = match usable_example(first.example.as_deref()) {
            Some(example) => example.to_string(),
            None => self.writer.example_for(word),
        };

        Ok(NewVocabularyRecord {
            word: word.to_string(),
            meaning: first.definition.clone(),
            example,
            synonyms,
            antonyms,
            owner_id,
        })
    }
}

/// Returns the example if it is simple enough to show as-is.
pub fn usable_example(example: Option<&str>) -> Option<&str> {
    example.filter(|e| {
        !e.is_empty() && e.chars().count() < MAX_EXAMPLE_CHARS && !e.contains(COMPLEX_MARKER)
    })
}

/// First [`MAX_RELATED`] distinct synonyms and antonyms across all senses.
pub fn merge_related(meanings: &[Meaning]) -> (Vec<String>, Vec<String>) {
    let mut synonyms = Vec::new();
    let mut antonyms = Vec::new();

    for def in meanings.iter().flat_map(|m| m.definitions.iter()) {
        collect_distinct(&mut synonyms, &def.synonyms);
        collect_distinct(&mut antonyms, &def.antonyms);
    }

    (synonyms, antonyms)
}

fn collect_distinct(into: &mut Vec<String>, candidates: &[String]) {
    for candidate in candidates {
        if into.len() == MAX_RELATED {
            return;
        }
        if !into.contains(candidate) {
            into.push(candidate.clone());
        }
    }
}
