/// Coarse allow-list for the browser-supplied `Origin` header.
///
/// This is an anti-abuse gate, not authentication: it trusts whatever the
/// client sends.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
    preview_suffix: String,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>, preview_suffix: impl Into<String>) -> Self {
        Self {
            allowed,
            preview_suffix: preview_suffix.into(),
        }
    }

    /// An origin passes if it is listed exactly, ends with the preview-hosting
    /// suffix, or mentions `localhost`. A missing origin never passes.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin.filter(|o| !o.is_empty()) else {
            return false;
        };

        if self.allowed.iter().any(|a| a == origin) {
            return true;
        }

        if !self.preview_suffix.is_empty() && origin.ends_with(&self.preview_suffix) {
            return true;
        }

        origin.contains("localhost")
    }

    /// Value for `Access-Control-Allow-Origin`: the origin itself when allowed,
    /// otherwise the literal `null`.
    pub fn allow_origin_value<'a>(&self, origin: Option<&'a str>) -> &'a str {
        match origin {
            Some(o) if self.is_allowed(Some(o)) => o,
            _ => "null",
        }
    }
}
