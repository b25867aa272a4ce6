// ==================== SHOPS ====================
// Approved catalog, moderation queue (Pending -> Approve) and removal

use mongodb::bson::{oid::ObjectId, Document};
use serde::Serialize;
use serde_json::Value;

use crate::database::{DeleteOutcome, PageRequest, Store, StoreError, UpdateOutcome, PAGE_SIZE};
use crate::models::shop::fields::MOBILE;
use crate::models::{documents_to_json, json_to_document, lookup_key, ShopStatus};
use crate::services::CreateOutcome;
use crate::utils::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopsPage {
    #[schema(value_type = Vec<Object>)]
    pub shops: Vec<Value>,
    pub count_shop: u64,
}

fn parse_shop_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidIdentifier(id.to_string()))
}

/// One page of approved shops by district plus the approved total.
pub async fn list_approved_shops(db: &dyn Store, page: i64) -> Result<ShopsPage, AppError> {
    let window = PageRequest::for_page(page, PAGE_SIZE);

    let (shops, count_shop) = futures::try_join!(
        db.find_shops_by_status(ShopStatus::Approve, Some(window)),
        db.count_shops_by_status(ShopStatus::Approve)
    )?;

    Ok(ShopsPage {
        shops: documents_to_json(shops),
        count_shop,
    })
}

pub async fn list_pending_shops(db: &dyn Store) -> Result<Vec<Value>, AppError> {
    let shops = db.find_shops_by_status(ShopStatus::Pending, None).await?;
    Ok(documents_to_json(shops))
}

/// Approved shops whose town contains `town` (case-insensitive, literal match).
pub async fn search_by_town(db: &dyn Store, town: &str) -> Result<Vec<Value>, AppError> {
    let shops = db.search_shops_by_town(ShopStatus::Approve, town).await?;
    Ok(documents_to_json(shops))
}

/// Inserts the shop unless one with the same mobile number already exists.
pub async fn create_shop(db: &dyn Store, body: &Value) -> Result<CreateOutcome, AppError> {
    let shop: Document = json_to_document(body).map_err(AppError::InvalidBody)?;
    let mobile = lookup_key(&shop, MOBILE);

    if db.find_shop_by_mobile(&mobile).await?.is_some() {
        log::info!("🏪 Shop with mobile {} already exists, skipping insert", mobile);
        return Ok(CreateOutcome::AlreadyExists);
    }

    match db.insert_shop(shop).await {
        Ok(outcome) => Ok(CreateOutcome::Created(outcome)),
        Err(StoreError::DuplicateKey { .. }) => Ok(CreateOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// Sets the shop to `Approve` regardless of its current state.
pub async fn approve_shop(db: &dyn Store, id: &str) -> Result<UpdateOutcome, AppError> {
    let id = parse_shop_id(id)?;
    Ok(db.set_shop_status(id, ShopStatus::Approve).await?)
}

pub async fn delete_shop(db: &dyn Store, id: &str) -> Result<DeleteOutcome, AppError> {
    let id = parse_shop_id(id)?;
    Ok(db.delete_shop(id).await?)
}
