use serde::{Deserialize, Serialize};

/// A canonical tag with the variant spellings that should be normalized to it.
///
/// Serialized in the `tags.json` record shape: `{"tagName": .., "variant": [..]}`.
/// The canonical name may also appear among its own variants; nothing prevents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "tagName", default)]
    pub(crate) name: String,
    #[serde(rename = "variant", default)]
    variants: Vec<String>,
}

impl Tag {
    /// Creates a new tag with no variants.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::Tag;
    ///
    /// let tag = Tag::new("Cat");
    /// assert_eq!(tag.name(), "Cat");
    /// assert!(tag.variants().is_empty());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Creates a new tag with the specified variant spellings, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::Tag;
    ///
    /// let tag = Tag::with_variants("Cat", vec!["feline".to_string(), "kitty".to_string()]);
    /// assert_eq!(tag.variants(), &["feline", "kitty"]);
    /// ```
    pub fn with_variants(name: impl Into<String>, variants: Vec<String>) -> Self {
        Self {
            name: name.into(),
            variants,
        }
    }

    /// Returns the canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant spellings in stored order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Adds a variant spelling to the end of the list.
    pub fn add_variant(&mut self, variant: impl Into<String>) {
        self.variants.push(variant.into());
    }

    /// Renders the tag as a listing line body: `<name>: <name>,<variant>,...`.
    ///
    /// The canonical name always leads the comma-separated part, even when it
    /// is also stored as a variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::Tag;
    ///
    /// let tag = Tag::with_variants("Dog", vec!["canine".to_string()]);
    /// assert_eq!(tag.listing_line(), "Dog: Dog,canine");
    /// assert_eq!(Tag::new("Bird").listing_line(), "Bird: Bird");
    /// ```
    pub fn listing_line(&self) -> String {
        let mut spellings = Vec::with_capacity(self.variants.len() + 1);
        spellings.push(self.name.as_str());
        spellings.extend(self.variants.iter().map(String::as_str));
        format!("{}: {}", self.name, spellings.join(","))
    }
}
