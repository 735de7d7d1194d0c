//! Campaign parameter tagging
//!
//! Adds a single `key=value` pair to outbound URLs. Relative links stay
//! relative so the markup keeps working when the page is served from a
//! different origin.

use url::Url;

use crate::error::LinkError;
use crate::Result;

/// URL prefixes that are never tagged
const SKIPPED_PREFIXES: &[&str] = &["#", "mailto:", "javascript:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmTagger {
    key: String,
    value: String,
}

impl UtmTagger {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(LinkError::InvalidParam(
                "parameter name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            key,
            value: value.into(),
        })
    }

    /// Build a tagger from a `key=value` string such as `utm_source=pp_tma`
    pub fn parse(param: &str) -> Result<Self> {
        match param.trim().split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Err(LinkError::InvalidParam(param.to_string())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The parameter in `key=value` form
    fn param(&self) -> String {
        format!("{}={}", self.key, self.value)
    }

    /// Whether `url` should be left untouched
    pub fn should_skip(&self, url: &str) -> bool {
        if url.is_empty() {
            return true;
        }

        let lowered = url.to_lowercase();
        if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            return true;
        }

        lowered.contains(&format!("{}=", self.key.to_lowercase()))
    }

    /// Return `url` with the parameter present exactly once.
    ///
    /// `base` is the page location used to resolve relative links. Parse
    /// failures fall back to plain string concatenation.
    pub fn tag(&self, url: &str, base: Option<&Url>) -> String {
        if self.should_skip(url) {
            return url.to_string();
        }

        let parsed = match base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };

        match parsed {
            Ok(mut full) => {
                let present = full.query_pairs().any(|(k, _)| k == self.key.as_str());
                if !present {
                    full.query_pairs_mut().append_pair(&self.key, &self.value);
                }

                if url.starts_with("//") {
                    let absolute = full.as_str();
                    let scheme_len = full.scheme().len() + 1;
                    return absolute[scheme_len..].to_string();
                }

                if url.starts_with('.') || url.starts_with('/') {
                    return relative_form(&full);
                }

                full.to_string()
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "URL parse failed, appending parameter");
                self.append_naive(url)
            }
        }
    }

    fn append_naive(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", url, separator, self.param())
    }
}

fn relative_form(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
