use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::{MatchError, PreferenceTable, WeightTable};

/// Errors that can occur while loading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid dataset: {0}")]
    Invalid(#[from] MatchError),
}

/// On-disk market description (JSON or TOML)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub preferences: Option<PreferenceDataset>,
    #[serde(default)]
    pub bidding: Option<BiddingDataset>,
}

impl Dataset {
    /// Load a dataset, picking the format from the file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            other => Err(DatasetError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, DatasetError> {
        Ok(toml::from_str(text)?)
    }
}

/// Best-first preference lists for both sides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceDataset {
    pub proposers: Vec<PreferenceEntry>,
    pub receivers: Vec<PreferenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub name: String,
    pub preferences: Vec<String>,
}

impl PreferenceDataset {
    /// Validate and build the preference table; entry order is canonical order
    pub fn to_table(&self) -> Result<PreferenceTable, MatchError> {
        let builder = self
            .proposers
            .iter()
            .fold(PreferenceTable::builder(), |b, e| {
                b.proposer(e.name.as_str(), e.preferences.iter().map(String::as_str))
            });
        let builder = self.receivers.iter().fold(builder, |b, e| {
            b.receiver(e.name.as_str(), e.preferences.iter().map(String::as_str))
        });
        builder.build()
    }
}

/// Weights, budgets and capacities for the bidding variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiddingDataset {
    pub proposers: Vec<BidderEntry>,
    pub receivers: Vec<ReceiverEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderEntry {
    pub name: String,
    pub budget: f64,
    #[serde(with = "weight_entries")]
    pub weights: Vec<(String, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverEntry {
    pub name: String,
    pub capacity: f64,
    #[serde(with = "weight_entries")]
    pub weights: Vec<(String, i64)>,
}

/// Validated inputs of a bidding run
#[derive(Debug, Clone)]
pub struct BiddingMarket {
    pub weights: WeightTable,
    pub budgets: HashMap<String, f64>,
    pub capacities: HashMap<String, f64>,
}

impl BiddingDataset {
    pub fn to_market(&self) -> Result<BiddingMarket, MatchError> {
        let builder = self.proposers.iter().fold(WeightTable::builder(), |b, e| {
            b.proposer(e.name.as_str(), e.weights.iter().map(|(r, w)| (r.as_str(), *w)))
        });
        let weights = self
            .receivers
            .iter()
            .fold(builder, |b, e| {
                b.receiver(e.name.as_str(), e.weights.iter().map(|(p, w)| (p.as_str(), *w)))
            })
            .build()?;

        Ok(BiddingMarket {
            weights,
            budgets: self
                .proposers
                .iter()
                .map(|e| (e.name.clone(), e.budget))
                .collect(),
            capacities: self
                .receivers
                .iter()
                .map(|e| (e.name.clone(), e.capacity))
                .collect(),
        })
    }
}

/// Weight maps read as ordered entries, so a repeated name reaches
/// [`WeightTable`] validation instead of silently overwriting
mod weight_entries {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(entries: &[(String, i64)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, weight) in entries {
            map.serialize_entry(name, weight)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, i64)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, i64)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of participant names to weights")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, i64>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
