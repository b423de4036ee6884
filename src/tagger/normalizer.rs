use crate::models::Vocabulary;

/// Rewrites variant spellings in document text to their canonical tag names.
///
/// Substitution is sequential over the whole text: tags in stored order, each
/// tag's variants in stored order. A later rule sees the output of earlier
/// ones, so when a canonical name of one tag is a variant of another the
/// result depends on vocabulary order. Matching ignores word boundaries.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Replaces every occurrence of every variant with its canonical name.
    ///
    /// Empty variant strings are skipped. Never fails; with no matching
    /// variants the input comes back unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::{Tag, Vocabulary};
    /// use doctag::tagger::TextNormalizer;
    ///
    /// let vocabulary: Vocabulary = [
    ///     Tag::with_variants("Cat", vec!["feline".to_string(), "kitty".to_string()]),
    ///     Tag::with_variants("Dog", vec!["canine".to_string()]),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// assert_eq!(
    ///     TextNormalizer::normalize("I saw a kitty and a canine.", &vocabulary),
    ///     "I saw a Cat and a Dog."
    /// );
    /// ```
    #[must_use]
    pub fn normalize(text: &str, vocabulary: &Vocabulary) -> String {
        let mut normalized = text.to_string();
        for tag in vocabulary.iter() {
            for variant in tag.variants() {
                if variant.is_empty() || !normalized.contains(variant.as_str()) {
                    continue;
                }
                normalized = normalized.replace(variant.as_str(), tag.name());
            }
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    fn vocab(tags: &[(&str, &[&str])]) -> Vocabulary {
        tags.iter()
            .map(|(name, variants)| {
                Tag::with_variants(*name, variants.iter().map(|v| v.to_string()).collect())
            })
            .collect()
    }

    #[test]
    fn replaces_every_occurrence_of_each_variant() {
        let vocabulary = vocab(&[("Cat", &["kitty"])]);
        assert_eq!(
            TextNormalizer::normalize("kitty, kitty, kitty", &vocabulary),
            "Cat, Cat, Cat"
        );
    }

    #[test]
    fn substring_matches_inside_words_are_replaced() {
        let vocabulary = vocab(&[("Dog", &["canine"])]);
        assert_eq!(
            TextNormalizer::normalize("caninely loyal", &vocabulary),
            "Dogly loyal"
        );
    }

    #[test]
    fn empty_vocabulary_returns_text_unchanged() {
        let text = "nothing to see here";
        assert_eq!(TextNormalizer::normalize(text, &Vocabulary::new()), text);
    }

    #[test]
    fn empty_variants_are_ignored() {
        let vocabulary = vocab(&[("Cat", &["", "kitty"])]);
        assert_eq!(TextNormalizer::normalize("a kitty", &vocabulary), "a Cat");
    }

    #[test]
    fn later_rules_rewrite_output_of_earlier_rules() {
        // "Cat" is canonical for the first tag and a variant of the second.
        let vocabulary = vocab(&[("Cat", &["kitty"]), ("Animal", &["Cat"])]);
        assert_eq!(
            TextNormalizer::normalize("a kitty", &vocabulary),
            "a Animal"
        );
    }

    #[test]
    fn chained_result_depends_on_vocabulary_order() {
        let vocabulary = vocab(&[("Animal", &["Cat"]), ("Cat", &["kitty"])]);
        assert_eq!(TextNormalizer::normalize("a kitty", &vocabulary), "a Cat");
    }

    #[test]
    fn variants_within_one_tag_apply_in_stored_order() {
        // "kit" runs after "kitty", so only the leftover "kit" is rewritten.
        let vocabulary = vocab(&[("Cat", &["kitty", "kit"])]);
        assert_eq!(
            TextNormalizer::normalize("kitty kit", &vocabulary),
            "Cat Cat"
        );
    }

    #[test]
    fn normalization_is_idempotent_without_cross_tag_collisions() {
        let vocabulary = vocab(&[("Cat", &["feline", "kitty"]), ("Dog", &["canine", "pup"])]);
        let text = "A feline, a kitty, a canine and a pup walk into a bar.";

        let once = TextNormalizer::normalize(text, &vocabulary);
        let twice = TextNormalizer::normalize(&once, &vocabulary);
        assert_eq!(once, twice);
        for variant in ["feline", "kitty", "canine", "pup"] {
            assert!(!once.contains(variant), "{variant} should be gone");
        }
    }

    #[test]
    fn handles_multibyte_text() {
        let vocabulary = vocab(&[("ミーティング", &["打ち合わせ", "会議"])]);
        assert_eq!(
            TextNormalizer::normalize("明日の会議と打ち合わせ", &vocabulary),
            "明日のミーティングとミーティング"
        );
    }
}
