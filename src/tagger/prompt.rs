//! System prompt rendering.
//!
//! Substitution is literal text replacement of `%TAGS%` and `%DATE%`, not
//! structured templating. `%` inside tag names is not escaped.

use time::OffsetDateTime;

use crate::models::{DATE_PLACEHOLDER, TAGS_PLACEHOLDER, Vocabulary};

/// Renders prompt templates against a vocabulary and a timestamp.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Renders `template`, replacing every `%TAGS%` with the vocabulary listing
    /// and every `%DATE%` with `now` as `YYYY/MM/DD HH:MM:SS`.
    ///
    /// Deterministic for identical inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::{Tag, Vocabulary};
    /// use doctag::tagger::PromptBuilder;
    /// use time::macros::datetime;
    ///
    /// let vocabulary: Vocabulary =
    ///     [Tag::with_variants("Dog", vec!["canine".to_string()])].into_iter().collect();
    /// let prompt = PromptBuilder::render(
    ///     "Tags:\n%TAGS%Now: %DATE%",
    ///     &vocabulary,
    ///     datetime!(2024-03-05 09:07:01 UTC),
    /// );
    /// assert_eq!(prompt, "Tags:\nDog: Dog,canine\nNow: 2024/03/05 09:07:01");
    /// ```
    #[must_use]
    pub fn render(template: &str, vocabulary: &Vocabulary, now: OffsetDateTime) -> String {
        template
            .replace(TAGS_PLACEHOLDER, &Self::tag_listing(vocabulary))
            .replace(DATE_PLACEHOLDER, &Self::format_timestamp(now))
    }

    /// One `<name>: <name>,<variant>,...` line per tag, each newline-terminated.
    ///
    /// An empty vocabulary yields an empty string.
    #[must_use]
    pub fn tag_listing(vocabulary: &Vocabulary) -> String {
        vocabulary
            .iter()
            .map(|tag| format!("{}\n", tag.listing_line()))
            .collect()
    }

    /// Formats a timestamp as `YYYY/MM/DD HH:MM:SS` in its own offset.
    #[must_use]
    pub fn format_timestamp(now: OffsetDateTime) -> String {
        format!(
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use time::macros::datetime;

    fn animals() -> Vocabulary {
        [
            Tag::with_variants("Cat", vec!["feline".to_string(), "kitty".to_string()]),
            Tag::with_variants("Dog", vec!["canine".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn tag_listing_has_one_line_per_tag_in_stored_order() {
        assert_eq!(
            PromptBuilder::tag_listing(&animals()),
            "Cat: Cat,feline,kitty\nDog: Dog,canine\n"
        );
    }

    #[test]
    fn tag_listing_of_empty_vocabulary_is_empty() {
        assert_eq!(PromptBuilder::tag_listing(&Vocabulary::new()), "");
    }

    #[test]
    fn render_replaces_every_placeholder_occurrence() {
        let prompt = PromptBuilder::render(
            "%TAGS%|%TAGS%|%DATE%|%DATE%",
            &animals(),
            datetime!(2025-12-31 23:59:58 UTC),
        );

        assert!(!prompt.contains("%TAGS%"));
        assert!(!prompt.contains("%DATE%"));
        assert_eq!(prompt.matches("Dog: Dog,canine").count(), 2);
        assert_eq!(prompt.matches("2025/12/31 23:59:58").count(), 2);
    }

    #[test]
    fn render_without_placeholders_returns_template_unchanged() {
        let template = "Pick tags, comma separated.";
        assert_eq!(
            PromptBuilder::render(template, &animals(), datetime!(2024-01-01 00:00:00 UTC)),
            template
        );
    }

    #[test]
    fn render_with_empty_vocabulary_substitutes_empty_listing() {
        let prompt = PromptBuilder::render(
            "```\n%TAGS%```",
            &Vocabulary::new(),
            datetime!(2024-01-01 00:00:00 UTC),
        );
        assert_eq!(prompt, "```\n```");
    }

    #[test]
    fn timestamp_uses_the_value_offset() {
        let now = datetime!(2024-07-04 01:02:03 +09:00);
        assert_eq!(PromptBuilder::format_timestamp(now), "2024/07/04 01:02:03");
    }

    #[test]
    fn render_is_deterministic() {
        let now = datetime!(2024-02-29 12:00:00 UTC);
        let template = "%TAGS%\n%DATE%";
        assert_eq!(
            PromptBuilder::render(template, &animals(), now),
            PromptBuilder::render(template, &animals(), now)
        );
    }
}
