//! Path Pattern Matching
//!
//! Patterns are absolute paths whose segments are either literals or
//! `:name` placeholders:
//!
//! - `/players` - exact match
//! - `/player/:uuid` - one parameter
//! - `/a/:x/b/:y` - several parameters, extracted in declared order
//!
//! A pattern compiles to a regex anchored at both ends. Literal segments are
//! escaped; placeholders become `([^/]+)`.

use regex::Regex;

use super::error::RouteError;

/// Parameters extracted from a matched path, in declared order.
///
/// Values are the raw segment text; percent-decoding is left to the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    entries: Vec<(String, String)>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if the pattern declared it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A compiled path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile a pattern string.
    ///
    /// Rejects patterns without a leading `/`, placeholders with an empty
    /// name, and repeated parameter names.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| RouteError::invalid(pattern, "must start with '/'"))?;

        let mut regex_str = String::from("^");
        let mut param_names: Vec<String> = Vec::new();

        if rest.is_empty() {
            regex_str.push('/');
        } else {
            for segment in rest.split('/') {
                regex_str.push('/');
                match segment.strip_prefix(':') {
                    Some("") => {
                        return Err(RouteError::invalid(pattern, "empty parameter name"));
                    }
                    Some(name) => {
                        if param_names.iter().any(|n| n == name) {
                            return Err(RouteError::invalid(
                                pattern,
                                format!("duplicate parameter '{}'", name),
                            ));
                        }
                        param_names.push(name.to_string());
                        regex_str.push_str("([^/]+)");
                    }
                    None => regex_str.push_str(&regex::escape(segment)),
                }
            }
        }
        regex_str.push('$');

        let regex = Regex::new(&regex_str)
            .map_err(|e| RouteError::invalid(pattern, e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a bare path (no query or fragment)
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}
