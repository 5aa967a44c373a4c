//! Public dictionary API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use vocab_core::{CoreError, Definition, DictionaryLookup, DictionaryLookupResult, Meaning};

/// Entry shape returned by the dictionary API. Only the fields we keep.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEntry {
    word: String,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

impl From<ApiEntry> for DictionaryLookupResult {
    fn from(entry: ApiEntry) -> Self {
        Self {
            word: entry.word,
            meanings: entry
                .meanings
                .into_iter()
                .map(|m| Meaning {
                    part_of_speech: m.part_of_speech,
                    definitions: m
                        .definitions
                        .into_iter()
                        .map(|d| Definition {
                            definition: d.definition,
                            example: d.example,
                            synonyms: d.synonyms,
                            antonyms: d.antonyms,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

pub struct DictionaryClient {
    client: Client,
    base_url: String,
}

impl DictionaryClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn entry_url(&self, word: &str) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CoreError::LookupFailed(format!("bad dictionary url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CoreError::LookupFailed("dictionary url cannot have a path".to_string()))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

#[async_trait]
impl DictionaryLookup for DictionaryClient {
    async fn lookup(&self, word: &str) -> vocab_core::Result<Option<DictionaryLookupResult>> {
        let url = self.entry_url(&word.to_lowercase())?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::LookupFailed(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CoreError::LookupFailed(e.to_string()))?;

        let entry = interpret(status, &body)?;
        if entry.is_none() {
            tracing::debug!(%word, status = status.as_u16(), "no dictionary entry");
        }
        Ok(entry)
    }
}

/// Turn a dictionary response into its first usable entry.
///
/// The API answers unknown words with a non-2xx status. An empty entry list
/// or an entry without senses also counts as not found.
fn interpret(
    status: StatusCode,
    body: &str,
) -> vocab_core::Result<Option<DictionaryLookupResult>> {
    if !status.is_success() {
        return Ok(None);
    }

    let entries: Vec<ApiEntry> =
        serde_json::from_str(body).map_err(|e| CoreError::LookupFailed(e.to_string()))?;

    Ok(entries
        .into_iter()
        .next()
        .map(DictionaryLookupResult::from)
        .filter(|entry| !entry.meanings.is_empty()))
}
