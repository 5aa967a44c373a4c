//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use vocab_core::{Definition, DictionaryLookupResult, Meaning};

/// Lookup result with one definition per `(part_of_speech, definition,
/// example)` triple.
pub fn lookup_result(word: &str, senses: &[(&str, &str, Option<&str>)]) -> DictionaryLookupResult {
    DictionaryLookupResult {
        word: word.to_string(),
        meanings: senses
            .iter()
            .map(|(part, definition, example)| Meaning {
                part_of_speech: part.to_string(),
                definitions: vec![Definition {
                    definition: definition.to_string(),
                    example: example.map(str::to_string),
                    synonyms: vec![],
                    antonyms: vec![],
                }],
            })
            .collect(),
    }
}

/// Entries known to the fake dictionary.
pub fn dictionary_entries() -> Vec<DictionaryLookupResult> {
    let mut serene = lookup_result(
        "serene",
        &[
            ("adjective", "Calm, peaceful, and untroubled.", Some("A serene lake at dawn.")),
            ("noun", "An expanse of clear sky.", None),
        ],
    );
    serene.meanings[0].definitions[0].synonyms = vec!["calm".into(), "peaceful".into()];
    serene.meanings[1].definitions[0].synonyms = vec!["calm".into(), "tranquil".into(), "placid".into()];
    serene.meanings[0].definitions[0].antonyms = vec!["agitated".into()];

    let ephemeral = lookup_result(
        "ephemeral",
        &[(
            "adjective",
            "Lasting for a very short time.",
            Some("This is a complex sentence about ephemeral things."),
        )],
    );

    let cat = lookup_result("cat", &[("noun", "A small domesticated carnivorous mammal.", Some("The cat slept."))]);

    vec![serene, ephemeral, cat]
}

/// Create a checkout request body.
pub fn checkout_body(price_id: &str) -> serde_json::Value {
    json!({ "price_id": price_id })
}
