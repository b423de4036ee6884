use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:1234/v1";
pub const DEFAULT_API_KEY: &str = "lm-studio";
pub const DEFAULT_MODEL: &str = "local-model";

/// Placeholder replaced with the vocabulary listing.
pub const TAGS_PLACEHOLDER: &str = "%TAGS%";
/// Placeholder replaced with the batch start time.
pub const DATE_PLACEHOLDER: &str = "%DATE%";

/// System prompt written into a fresh `settings.json`.
pub const DEFAULT_SYSTEM_PROMPT: &str = "あなたは優秀なドキュメント分析アシスタントです。\n以下のドキュメントの内容を分析し、関連するタグを提示されたタグリストの中からすべて選んで、カンマ区切りで出力してください。\n\n#利用可能なタグリスト\n```\n%TAGS%\n```\n\n#ドキュメント";

/// Connection info for the model endpoint plus the prompt template.
///
/// Fields missing from a stored record fall back to their defaults individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base: String,
    pub api_key: String,
    pub system_prompt: String,
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Returns the API key with everything but the last four characters hidden.
    ///
    /// # Examples
    ///
    /// ```
    /// use doctag::Settings;
    ///
    /// let settings = Settings { api_key: "sk-abcdef123456".to_string(), ..Settings::default() };
    /// assert_eq!(settings.masked_api_key(), "***********3456");
    /// ```
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
