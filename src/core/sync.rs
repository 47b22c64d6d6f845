use crate::config::SyncConfig;
use crate::core::search::SearchUrlTemplate;
use crate::domain::model::{
    ClearOutcome, DeletionFailure, DeletionOutcome, DeletionReport, EnrichedItem, ItemListing,
    Lookup, SearchOutcome, ShoppingListEntry, SyncIssue,
};
use crate::domain::ports::InventoryService;
use crate::utils::error::{InventoryError, Result};
use std::collections::BTreeSet;
use std::time::Duration;

/// Shopping-list workflows on top of an `InventoryService`.
///
/// Holds no mutable state; every call re-fetches what it needs and issues one
/// outbound request at a time. Remote failures never surface as `Err`, they
/// are folded into the returned listing or report.
pub struct ShoppingListSync<I: InventoryService> {
    inventory: I,
    search: SearchUrlTemplate,
    settle_delay: Duration,
}

impl<I: InventoryService> ShoppingListSync<I> {
    pub fn new(inventory: I, config: &SyncConfig) -> Result<Self> {
        Ok(Self {
            inventory,
            search: SearchUrlTemplate::new(config.search_url_template.clone())?,
            settle_delay: config.settle_delay(),
        })
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Fetch the shopping list and join product and unit names onto each
    /// entry. Output order matches the remote list.
    pub async fn list_items(&self) -> ItemListing {
        let entries = match self.inventory.shopping_list().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Error fetching shopping list: {}", e);
                return ItemListing {
                    items: Vec::new(),
                    issues: vec![SyncIssue::Fetch {
                        reason: e.to_string(),
                    }],
                };
            }
        };

        tracing::debug!("Fetched {} shopping list entries", entries.len());

        let mut listing = ItemListing {
            items: Vec::with_capacity(entries.len()),
            issues: Vec::new(),
        };
        for entry in &entries {
            let item = self.enrich(entry, &mut listing.issues).await;
            listing.items.push(item);
        }

        if !listing.issues.is_empty() {
            tracing::warn!(
                "{} lookup(s) failed while enriching {} entries",
                listing.issues.len(),
                entries.len()
            );
        }
        listing
    }

    async fn enrich(&self, entry: &ShoppingListEntry, issues: &mut Vec<SyncIssue>) -> EnrichedItem {
        let mut item = EnrichedItem::bare(entry);

        let Some(product_id) = entry.product_id else {
            return item;
        };
        let Some(product) = best_effort(
            self.inventory.product(product_id).await,
            entry.id,
            Lookup::Product,
            product_id,
            issues,
        ) else {
            return item;
        };
        item.product_name = product.name;

        if let Some(unit_id) = product.purchase_unit_id {
            if let Some(unit) = best_effort(
                self.inventory.quantity_unit(unit_id).await,
                entry.id,
                Lookup::QuantityUnit,
                unit_id,
                issues,
            ) {
                item.unit_name = unit.name;
            }
        }

        item
    }

    /// Delete each selected entry independently, then wait out the settle
    /// delay. Grocy gives no acknowledgment that the deletion has propagated,
    /// so a listing fetched right after may still show the entries.
    pub async fn delete_items(&self, ids: &BTreeSet<i64>) -> DeletionOutcome {
        if ids.is_empty() {
            tracing::info!("Delete requested with nothing selected");
            return DeletionOutcome::NothingSelected;
        }

        let mut report = DeletionReport::default();
        for &id in ids {
            match self.inventory.delete_shopping_list_entry(id).await {
                Ok(()) => {
                    report.succeeded_ids.insert(id);
                }
                Err(e) => {
                    tracing::warn!("Error deleting shopping list item {}: {}", id, e);
                    report.failures.push(DeletionFailure {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        tracing::info!("{}", report.summary());
        DeletionOutcome::Processed(report)
    }

    /// Delete every entry currently on the list.
    pub async fn clear_list(&self) -> ClearOutcome {
        let entries = match self.inventory.shopping_list().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Error fetching shopping list for delete: {}", e);
                return ClearOutcome::FetchFailed(e.to_string());
            }
        };

        let ids: BTreeSet<i64> = entries.iter().map(|entry| entry.id).collect();
        ClearOutcome::Processed(self.delete_items(&ids).await)
    }

    /// Build the external search URL for `query` alongside the current list.
    pub async fn search_redirect(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::NoQuery;
        }

        let search_url = self.search.render(query);
        tracing::debug!("Search URL for '{}': {}", query, search_url);

        SearchOutcome::Ready {
            query: query.to_string(),
            search_url,
            listing: self.list_items().await,
        }
    }
}

/// Keep the value of a successful lookup; otherwise record the failure and
/// let the caller fall back to its default.
fn best_effort<T>(
    result: std::result::Result<T, InventoryError>,
    entry_id: i64,
    lookup: Lookup,
    lookup_id: i64,
    issues: &mut Vec<SyncIssue>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Error fetching {} {} for entry {}: {}", lookup, lookup_id, entry_id, e);
            issues.push(SyncIssue::Enrichment {
                entry_id,
                lookup,
                lookup_id,
                reason: e.to_string(),
            });
            None
        }
    }
}
