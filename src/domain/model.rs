use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One line of the Grocy shopping list, as returned by `/stock/shopping_list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShoppingListEntry {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    /// Free-text entries have no product.
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        rename = "qu_id_purchase_unit",
        alias = "qu_id_purchase",
        deserialize_with = "lenient::optional_id"
    )]
    pub purchase_unit_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuantityUnit {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// View model for one rendered row. Names are empty when a lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    pub id: i64,
    pub quantity: f64,
    pub unit_name: String,
    pub product_name: String,
    pub note: Option<String>,
}

impl EnrichedItem {
    pub fn bare(entry: &ShoppingListEntry) -> Self {
        Self {
            id: entry.id,
            quantity: entry.amount,
            unit_name: String::new(),
            product_name: String::new(),
            note: entry.note.clone().filter(|note| !note.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    Product,
    QuantityUnit,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Product => write!(f, "product"),
            Lookup::QuantityUnit => write!(f, "quantity unit"),
        }
    }
}

/// Something that went wrong while building a listing. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncIssue {
    /// The shopping list itself could not be fetched.
    Fetch { reason: String },
    /// A product or unit lookup failed; the item is kept with empty names.
    Enrichment {
        entry_id: i64,
        lookup: Lookup,
        lookup_id: i64,
        reason: String,
    },
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncIssue::Fetch { reason } => {
                write!(f, "Could not load the shopping list: {}", reason)
            }
            SyncIssue::Enrichment {
                entry_id,
                lookup,
                lookup_id,
                reason,
            } => write!(
                f,
                "Entry {}: {} {} unavailable ({})",
                entry_id, lookup, lookup_id, reason
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemListing {
    pub items: Vec<EnrichedItem>,
    pub issues: Vec<SyncIssue>,
}

impl ItemListing {
    pub fn fetch_failed(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, SyncIssue::Fetch { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub succeeded_ids: BTreeSet<i64>,
    pub failures: Vec<DeletionFailure>,
}

impl DeletionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            return format!("Deleted {} item(s)", self.succeeded_ids.len());
        }
        let failed: Vec<String> = self.failures.iter().map(|f| f.id.to_string()).collect();
        format!(
            "Deleted {} item(s), {} failed (ids: {})",
            self.succeeded_ids.len(),
            self.failures.len(),
            failed.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    NothingSelected,
    Processed(DeletionReport),
}

impl DeletionOutcome {
    pub fn summary(&self) -> String {
        match self {
            DeletionOutcome::NothingSelected => "Nothing selected".to_string(),
            DeletionOutcome::Processed(report) => report.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    FetchFailed(String),
    Processed(DeletionOutcome),
}

impl ClearOutcome {
    pub fn summary(&self) -> String {
        match self {
            ClearOutcome::FetchFailed(reason) => {
                format!("Could not load the shopping list: {}", reason)
            }
            ClearOutcome::Processed(DeletionOutcome::NothingSelected) => {
                "The shopping list is already empty".to_string()
            }
            ClearOutcome::Processed(outcome) => outcome.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NoQuery,
    Ready {
        query: String,
        search_url: String,
        listing: ItemListing,
    },
}

/// Grocy has returned ids and amounts both as JSON numbers and as strings,
/// depending on version and database backend.
mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Text(String),
    }

    fn to_i64(raw: NumberOrString) -> Result<Option<i64>, String> {
        match raw {
            NumberOrString::Int(n) => Ok(Some(n)),
            NumberOrString::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
            NumberOrString::Float(f) => Err(format!("expected an integer id, got {}", f)),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(None),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("expected an integer id, got '{}'", s)),
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = NumberOrString::deserialize(deserializer)?;
        to_i64(raw)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("id must not be empty"))
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(raw) => to_i64(raw).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Int(n)) => Ok(n as f64),
            Some(NumberOrString::Float(f)) => Ok(f),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(0.0),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("expected an amount, got '{}'", s))),
            None => Ok(0.0),
        }
    }
}
