use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::Tag;

/// The controlled vocabulary: canonical tag name to its [`Tag`] record.
///
/// Iteration follows stored order, which is the key order of `tags.json`.
/// Normalization depends on that order, so it is preserved across load and save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
    tags: IndexMap<String, Tag>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the tag keyed by its canonical name.
    ///
    /// Replacing keeps the tag's original position in the stored order.
    pub fn upsert(&mut self, tag: Tag) {
        self.tags.insert(tag.name().to_string(), tag);
    }

    /// Removes a tag by canonical name, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.tags.shift_remove(name)
    }

    /// Returns the tag with this exact canonical name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Byte-exact, case-sensitive membership test on canonical names.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Iterates tags in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// Iterates canonical names in stored order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<Tag> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for tag in iter {
            vocabulary.upsert(tag);
        }
        vocabulary
    }
}

// The map key is authoritative for the canonical name; a record's `tagName`
// may be missing or stale in hand-edited files.
impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut tags = IndexMap::<String, Tag>::deserialize(deserializer)?;
        for (key, tag) in tags.iter_mut() {
            if tag.name != *key {
                tag.name = key.clone();
            }
        }
        Ok(Self { tags })
    }
}
