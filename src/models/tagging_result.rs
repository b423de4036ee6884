/// Header that prefixes the tag line of every output artifact.
pub const TAG_LINE_PREFIX: &str = "タグ: ";

/// Outcome of tagging one document.
///
/// Only the rendered form is persisted; this type exists between the
/// extraction/normalization steps and the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingResult {
    tags: Vec<String>,
    normalized_text: String,
}

impl TaggingResult {
    pub fn new(tags: Vec<String>, normalized_text: impl Into<String>) -> Self {
        Self {
            tags,
            normalized_text: normalized_text.into(),
        }
    }

    /// Extracted canonical tags, in reply order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    /// Renders the output artifact: a tag line followed by the normalized text.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::TaggingResult;
    ///
    /// let result = TaggingResult::new(
    ///     vec!["Cat".to_string(), "Dog".to_string()],
    ///     "I saw a Cat and a Dog.",
    /// );
    /// assert_eq!(result.render(), "タグ: Cat, Dog\nI saw a Cat and a Dog.");
    /// ```
    pub fn render(&self) -> String {
        format!(
            "{TAG_LINE_PREFIX}{}\n{}",
            self.tags.join(", "),
            self.normalized_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_with_no_tags_keeps_empty_tag_line() {
        let result = TaggingResult::new(Vec::new(), "plain text");
        assert_eq!(result.render(), "タグ: \nplain text");
    }

    #[test]
    fn render_keeps_duplicate_tags() {
        let result = TaggingResult::new(vec!["Cat".to_string(), "Cat".to_string()], "x");
        assert_eq!(result.render(), "タグ: Cat, Cat\nx");
    }
}
