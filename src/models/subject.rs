// src/models/subject.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lookup table from subject id to display name.
///
/// Built once from configuration and shared by the scoring engine and the
/// handlers that present subjects, so there is exactly one mapping in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCatalog(BTreeMap<String, String>);

impl SubjectCatalog {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn name_of(&self, subject_id: &str) -> Option<&str> {
        self.0.get(subject_id).map(String::as_str)
    }

    pub fn contains(&self, subject_id: &str) -> bool {
        self.0.contains_key(subject_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SubjectCatalog {
    fn default() -> Self {
        Self::new([
            ("physics", "Physics"),
            ("chemistry", "Chemistry"),
            ("biology", "Biology"),
        ])
    }
}
