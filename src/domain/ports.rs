use crate::domain::model::{Product, QuantityUnit, ShoppingListEntry};
use crate::utils::error::InventoryError;
use async_trait::async_trait;

/// The remote system of record for shopping-list entries, products and units.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn shopping_list(&self) -> Result<Vec<ShoppingListEntry>, InventoryError>;
    async fn product(&self, id: i64) -> Result<Product, InventoryError>;
    async fn quantity_unit(&self, id: i64) -> Result<QuantityUnit, InventoryError>;
    async fn delete_shopping_list_entry(&self, id: i64) -> Result<(), InventoryError>;
}
