use std::collections::HashMap;

/// Fallback language every lookup ends at.
pub const FALLBACK_LANGUAGE: &str = "english";

/// String tables per language, with built-in engine texts and an
/// english fallback for missing keys.
#[derive(Debug)]
pub struct Localization {
    tables: HashMap<String, HashMap<String, String>>,
    language: String,
}

impl Localization {
    pub fn new(language: impl Into<String>) -> Self {
        let mut loc = Self {
            tables: HashMap::new(),
            language: language.into(),
        };
        loc.add_texts(FALLBACK_LANGUAGE, base_texts());
        loc
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Merge texts into a language table, creating it if needed.
    pub fn add_texts<I, K, V>(&mut self, language: &str, texts: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.tables.entry(language.to_string()).or_default();
        for (key, value) in texts {
            table.insert(key.into(), value.into());
        }
    }

    /// Look up a key in the current language, then in the fallback.
    /// A key missing everywhere comes back verbatim so broken lookups
    /// stay visible on screen instead of blanking out.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.tables.get(&self.language).and_then(|t| t.get(key)) {
            return value;
        }
        if let Some(value) = self.tables.get(FALLBACK_LANGUAGE).and_then(|t| t.get(key)) {
            return value;
        }
        log::debug!("missing text key '{}'", key);
        key
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}

/// Engine-provided english texts.
fn base_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("loading", "Loading..."),
        ("paused", "Paused"),
        ("press_any_key", "Press any key"),
        ("game_over", "Game over"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_language_wins() {
        let mut loc = Localization::new("german");
        loc.add_texts("german", [("paused", "Pause")]);
        assert_eq!(loc.text("paused"), "Pause");
    }

    #[test]
    fn falls_back_to_english() {
        let loc = Localization::new("german");
        assert_eq!(loc.text("paused"), "Paused");
    }

    #[test]
    fn missing_key_returned_verbatim() {
        let loc = Localization::default();
        assert_eq!(loc.text("no_such_key"), "no_such_key");
    }

    #[test]
    fn added_texts_merge_into_table() {
        let mut loc = Localization::default();
        loc.add_texts(FALLBACK_LANGUAGE, [("score", "Score")]);
        assert_eq!(loc.text("score"), "Score");
        // Built-ins survive the merge.
        assert_eq!(loc.text("loading"), "Loading...");
    }
}
