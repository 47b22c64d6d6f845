pub mod search;
pub mod sync;

pub use crate::domain::model::{
    ClearOutcome, DeletionOutcome, DeletionReport, EnrichedItem, ItemListing, SearchOutcome,
    SyncIssue,
};
pub use crate::domain::ports::InventoryService;
pub use search::SearchUrlTemplate;
pub use sync::ShoppingListSync;
