//! Host color tokens

use serde::{Deserialize, Serialize};

/// Subset of the host's `themeParams` the page consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeParams {
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub button_color: Option<String>,
    #[serde(default)]
    pub button_text_color: Option<String>,
}

impl ThemeParams {
    /// Page-level style variables for every token the host provided.
    ///
    /// Missing or blank tokens are skipped so the stylesheet defaults stay.
    pub fn style_vars(&self) -> Vec<(&'static str, &str)> {
        [
            ("--app-bg-color", &self.bg_color),
            ("--app-text-color", &self.text_color),
            ("--button-bg", &self.button_color),
            ("--button-color", &self.button_text_color),
        ]
        .into_iter()
        .filter_map(|(var, token)| {
            token
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (var, v))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.style_vars().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_vars_skip_missing_tokens() {
        let theme: ThemeParams = serde_json::from_str(
            r##"{"bg_color":"#17212b","text_color":"#f5f5f5","button_color":"","hint_color":"#708499"}"##,
        )
        .unwrap();

        assert_eq!(
            theme.style_vars(),
            vec![("--app-bg-color", "#17212b"), ("--app-text-color", "#f5f5f5")]
        );
        assert!(ThemeParams::default().is_empty());
    }
}
