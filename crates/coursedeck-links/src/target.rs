//! Browsing-context targets for links and cards

use serde::{Deserialize, Serialize};

/// Where a link or card opens its destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// Same browsing context (`_self` or no target)
    SameContext,
    /// New browsing context (`_blank`)
    NewContext,
    /// Any other named context (`_parent`, `_top`, frame names)
    Named(String),
}

impl LinkTarget {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => LinkTarget::SameContext,
            Some(v) if v.eq_ignore_ascii_case("_self") => LinkTarget::SameContext,
            Some(v) if v.eq_ignore_ascii_case("_blank") => LinkTarget::NewContext,
            Some(v) => LinkTarget::Named(v.to_string()),
        }
    }

    /// Name passed to `window.open`
    pub fn as_str(&self) -> &str {
        match self {
            LinkTarget::SameContext => "_self",
            LinkTarget::NewContext => "_blank",
            LinkTarget::Named(name) => name,
        }
    }

    pub fn opens_new_context(&self) -> bool {
        matches!(self, LinkTarget::NewContext)
    }
}

impl Default for LinkTarget {
    fn default() -> Self {
        LinkTarget::SameContext
    }
}

impl std::fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the `rel` value a new-context link must carry, or `None` when the
/// existing value already prevents opener access.
pub fn with_noopener(rel: Option<&str>) -> Option<String> {
    let rel = rel.map(str::trim).unwrap_or("");
    if rel.to_ascii_lowercase().contains("noopener") {
        return None;
    }

    if rel.is_empty() {
        Some("noopener noreferrer".to_string())
    } else {
        Some(format!("{} noopener noreferrer", rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(LinkTarget::parse(None), LinkTarget::SameContext);
        assert_eq!(LinkTarget::parse(Some("_self")), LinkTarget::SameContext);
        assert_eq!(LinkTarget::parse(Some("_BLANK")), LinkTarget::NewContext);
        assert_eq!(
            LinkTarget::parse(Some("_top")),
            LinkTarget::Named("_top".to_string())
        );
        assert_eq!(LinkTarget::NewContext.as_str(), "_blank");
    }

    #[test]
    fn test_noopener_added_once() {
        assert_eq!(with_noopener(None).as_deref(), Some("noopener noreferrer"));
        assert_eq!(
            with_noopener(Some("external")).as_deref(),
            Some("external noopener noreferrer")
        );
        assert_eq!(with_noopener(Some("NoOpener")), None);
        assert_eq!(with_noopener(Some("noopener noreferrer")), None);
    }
}
