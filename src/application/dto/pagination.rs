use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: serde::de::DeserializeOwned"
))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, per_page: u32, current_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX);
        Self {
            items,
            total_items,
            per_page,
            current_page,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
