use crate::config::QUERY_PLACEHOLDER;
use crate::utils::error::{AppError, Result};

/// External shopping-search URL with a `{query}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUrlTemplate {
    template: String,
}

impl SearchUrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(QUERY_PLACEHOLDER) {
            return Err(AppError::InvalidConfigValueError {
                field: "sync.search_url_template".to_string(),
                value: template,
                reason: format!("missing the {} placeholder", QUERY_PLACEHOLDER),
            });
        }
        Ok(Self { template })
    }

    /// Percent-encodes `query` and substitutes it for every placeholder.
    pub fn render(&self, query: &str) -> String {
        self.template
            .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query))
    }
}
