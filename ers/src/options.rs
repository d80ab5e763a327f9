//! Decoding options.

use serde::{Deserialize, Serialize};

/// What to do when a tagged optional field occurs more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTagPolicy {
    /// Fail with [`crate::Error::DuplicateTag`].
    #[default]
    Reject,
    /// Keep the last occurrence and log a warning.
    LastWins,
}

/// Options for [`crate::EvidenceRecord::decode_with`].
///
/// Deserializable so a host application can embed it in its own
/// configuration; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub duplicate_tags: DuplicateTagPolicy,
}

impl DecodeOptions {
    pub fn with_duplicate_tags(mut self, policy: DuplicateTagPolicy) -> Self {
        self.duplicate_tags = policy;
        self
    }
}
