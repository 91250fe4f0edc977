use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One entry of the phrase catalog.
///
/// Field names are capitalised on the wire to stay compatible with the
/// catalog files and the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PhraseRecord {
    #[serde(rename = "Phrase")]
    pub phrase: String,
    /// Category tag. Display only, never used by game logic.
    #[serde(rename = "Type")]
    pub kind: String,
}

impl PhraseRecord {
    pub fn new(phrase: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            kind: kind.into(),
        }
    }
}
