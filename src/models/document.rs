/// A named plain-text document waiting to be tagged.
///
/// The name is the uploaded file name and doubles as the key of its output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    raw_text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_text: raw_text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
