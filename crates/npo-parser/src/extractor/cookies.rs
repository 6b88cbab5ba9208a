use std::{io::ErrorKind, path::Path};

use tracing::debug;

use super::error::ExtractorError;

/// Cookies loaded from a Netscape-format cookie file.
///
/// Names are unique; a later line for the same name replaces the earlier
/// value but keeps its position, so the rendered header follows file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a cookie file. A missing file yields an empty jar.
    pub fn load(path: &Path) -> Result<Self, ExtractorError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let jar = Self::parse(&content);
                debug!("Loaded {} cookies from {}", jar.len(), path.display());
                Ok(jar)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cookie file at {}, continuing without cookies", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parses Netscape cookie lines:
    /// `domain  flag  path  secure  expiry  name  value`, tab separated.
    /// Comments, blank lines and lines with fewer than seven fields are skipped.
    pub fn parse(content: &str) -> Self {
        let mut jar = Self::new();
        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 7 {
                continue;
            }
            jar.insert(fields[5], fields[6]);
        }
        jar
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Renders the `Cookie` header value, or `None` for an empty jar.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
