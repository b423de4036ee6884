use crate::models::Vocabulary;

/// Turns a free-text model reply into canonical tags from the vocabulary.
pub struct TagExtractor;

impl TagExtractor {
    /// Splits `reply` on commas, trims each piece, and keeps the pieces that
    /// exactly match a canonical name.
    ///
    /// Never fails. Unknown pieces are dropped, reply order is kept, and
    /// duplicates are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::{Tag, Vocabulary};
    /// use doctag::tagger::TagExtractor;
    ///
    /// let vocabulary: Vocabulary = [Tag::new("Cat"), Tag::new("Dog")].into_iter().collect();
    /// assert_eq!(TagExtractor::extract("Cat, Bird", &vocabulary), vec!["Cat"]);
    /// assert_eq!(TagExtractor::extract(" Dog ,Cat", &vocabulary), vec!["Dog", "Cat"]);
    /// assert!(TagExtractor::extract("", &vocabulary).is_empty());
    /// ```
    #[must_use]
    pub fn extract(reply: &str, vocabulary: &Vocabulary) -> Vec<String> {
        reply
            .split(',')
            .map(str::trim)
            .filter(|piece| vocabulary.contains(piece))
            .map(String::from)
            .collect()
    }
}
