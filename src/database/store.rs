use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use thiserror::Error;

use crate::models::ShopStatus;

/// Every listing endpoint pages in slices of this size.
pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("duplicate key in {collection}")]
    DuplicateKey { collection: &'static str },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Window for a 1-based page number. Pages below 1 are treated as page 1;
    /// the offset is capped so it always fits the server's signed 64-bit skip.
    pub fn for_page(page: i64, page_size: u64) -> Self {
        let page = page.max(1) as u64;
        let max_skip = i64::MAX as u64;
        Self {
            skip: (page - 1).saturating_mul(page_size).min(max_skip),
            limit: page_size,
        }
    }
}

/// Result of an insert, shaped like the driver's `InsertOneResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub inserted_id: Bson,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[schema(value_type = Option<String>)]
    pub upserted_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Page of users sorted ascending by `sort_field`.
    async fn find_users(&self, page: PageRequest, sort_field: &str) -> StoreResult<Vec<Document>>;

    async fn count_users(&self) -> StoreResult<u64>;

    /// Exact match on `email`; `Bson::Null` matches users without an email.
    async fn find_user_by_email(&self, email: &Bson) -> StoreResult<Option<Document>>;

    async fn insert_user(&self, user: Document) -> StoreResult<InsertOutcome>;
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Shops in `status`. With a page the result is sorted by district.
    async fn find_shops_by_status(
        &self,
        status: ShopStatus,
        page: Option<PageRequest>,
    ) -> StoreResult<Vec<Document>>;

    async fn count_shops_by_status(&self, status: ShopStatus) -> StoreResult<u64>;

    /// Shops in `status` whose town contains `town`, ignoring case.
    /// `town` is matched literally.
    async fn search_shops_by_town(&self, status: ShopStatus, town: &str) -> StoreResult<Vec<Document>>;

    async fn find_shop_by_mobile(&self, mobile: &Bson) -> StoreResult<Option<Document>>;

    async fn insert_shop(&self, shop: Document) -> StoreResult<InsertOutcome>;

    async fn set_shop_status(&self, id: ObjectId, status: ShopStatus) -> StoreResult<UpdateOutcome>;

    async fn delete_shop(&self, id: ObjectId) -> StoreResult<DeleteOutcome>;
}

/// Everything the HTTP layer needs from the document database.
#[async_trait]
pub trait Store: UserStore + ShopStore {
    async fn ping(&self) -> StoreResult<()>;
}
