// ==================== USERS ====================
// Paginated listing, admin role lookup and sign-up of user documents

use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;

use crate::database::{PageRequest, Store, StoreError, PAGE_SIZE};
use crate::models::user::fields::EMAIL;
use crate::models::{documents_to_json, json_to_document, lookup_key, RoleResponse};
use crate::services::CreateOutcome;
use crate::utils::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    #[schema(value_type = Vec<Object>)]
    pub users: Vec<Value>,
    pub count_user: u64,
}

/// One page of users plus the total user count, fetched concurrently.
pub async fn list_users(db: &dyn Store, page: i64, sort_field: &str) -> Result<UsersPage, AppError> {
    let window = PageRequest::for_page(page, PAGE_SIZE);

    let (users, count_user) = futures::try_join!(db.find_users(window, sort_field), db.count_users())?;

    Ok(UsersPage {
        users: documents_to_json(users),
        count_user,
    })
}

pub async fn get_role(db: &dyn Store, email: &str) -> Result<RoleResponse, AppError> {
    let user = db.find_user_by_email(&Bson::from(email)).await?;
    Ok(RoleResponse::for_user(user.as_ref()))
}

/// Inserts the user unless one with the same email already exists.
pub async fn create_user(db: &dyn Store, body: &Value) -> Result<CreateOutcome, AppError> {
    let user: Document = json_to_document(body).map_err(AppError::InvalidBody)?;
    let email = lookup_key(&user, EMAIL);

    if db.find_user_by_email(&email).await?.is_some() {
        log::info!("👤 User {} already exists, skipping insert", email);
        return Ok(CreateOutcome::AlreadyExists);
    }

    match db.insert_user(user).await {
        Ok(outcome) => Ok(CreateOutcome::Created(outcome)),
        // Lost the race against a concurrent sign-up with the same email
        Err(StoreError::DuplicateKey { .. }) => Ok(CreateOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}
