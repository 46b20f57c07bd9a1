// SPDX-License-Identifier: MPL-2.0
//! JSON answer of `POST search`.

use serde::{Deserialize, Deserializer};

/// Either the identifier of the cached results or the validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Errors {
        #[serde(deserialize_with = "error_messages")]
        errors: Vec<String>,
    },
    Results {
        #[serde(deserialize_with = "string_or_number")]
        results_id: String,
    },
}

impl SearchResponse {
    pub fn from_json(body: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// The server sends one string of markup, already joined, which is kept
/// whole. A JSON list gives one entry per message.
fn error_messages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        List(Vec<String>),
    }

    let messages = match Raw::deserialize(deserializer)? {
        Raw::Joined(joined) => vec![joined],
        Raw::List(list) => list,
    };
    Ok(messages
        .into_iter()
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .collect())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
