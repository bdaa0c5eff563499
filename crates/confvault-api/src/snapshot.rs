//! Raw configuration snapshots

use std::fmt;

/// The configuration exactly as the device returned it.
///
/// Never parsed or re-encoded. `Debug` prints the size only, so snapshots
/// can be logged without leaking their content.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ConfigSnapshot(Vec<u8>);

impl ConfigSnapshot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<Vec<u8>> for ConfigSnapshot {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ConfigSnapshot {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ConfigSnapshot {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<String> for ConfigSnapshot {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}
