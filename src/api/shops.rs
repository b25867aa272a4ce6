use actix_web::{web, HttpResponse, ResponseError};
use serde_json::Value;

use crate::api::PageQuery;
use crate::database::{DeleteOutcome, Store, UpdateOutcome};
use crate::services::shop_service::{self, ShopsPage};

const SHOP_EXISTS_MESSAGE: &str = "shop already exists";

/// GET /shops?page=N - Lojas aprovadas, ordenadas por distrito
#[utoipa::path(
    get,
    path = "/shops",
    tag = "Shops",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of approved shops and total approved count", body = ShopsPage),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_shops(db: web::Data<dyn Store>, query: web::Query<PageQuery>) -> HttpResponse {
    let page = query.page_number();
    log::info!("🏪 GET /shops - page {}", page);

    match shop_service::list_approved_shops(db.get_ref(), page).await {
        Ok(result) => {
            log::info!("✅ Listed {} of {} approved shops", result.shops.len(), result.count_shop);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::error!("❌ Error listing shops: {}", e);
            e.error_response()
        }
    }
}

/// GET /shops/request - Fila de moderação (status Pending)
#[utoipa::path(
    get,
    path = "/shops/request",
    tag = "Shops",
    responses(
        (status = 200, description = "Every shop waiting for approval"),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_pending_shops(db: web::Data<dyn Store>) -> HttpResponse {
    log::info!("📥 GET /shops/request");

    match shop_service::list_pending_shops(db.get_ref()).await {
        Ok(shops) => {
            log::info!("✅ {} shops pending approval", shops.len());
            HttpResponse::Ok().json(shops)
        }
        Err(e) => {
            log::error!("❌ Error listing pending shops: {}", e);
            e.error_response()
        }
    }
}

/// GET /shops/{town_name} - Busca lojas aprovadas pela cidade
#[utoipa::path(
    get,
    path = "/shops/{town_name}",
    tag = "Shops",
    params(("town_name" = String, Path, description = "Part of the town name, matched case-insensitively")),
    responses(
        (status = 200, description = "Approved shops in matching towns"),
        (status = 500, description = "Database error")
    )
)]
pub async fn search_shops(db: web::Data<dyn Store>, town_name: web::Path<String>) -> HttpResponse {
    log::info!("🔍 GET /shops/{}", town_name);

    match shop_service::search_by_town(db.get_ref(), &town_name).await {
        Ok(shops) => HttpResponse::Ok().json(shops),
        Err(e) => {
            log::error!("❌ Error searching shops: {}", e);
            e.error_response()
        }
    }
}

/// POST /shops - Cadastra loja se o número de celular ainda não existe
#[utoipa::path(
    post,
    path = "/shops",
    tag = "Shops",
    responses(
        (status = 200, description = "Insert result, or message with null insertedId when the mobile is taken"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 500, description = "Database error")
    )
)]
pub async fn create_shop(db: web::Data<dyn Store>, body: web::Json<Value>) -> HttpResponse {
    log::info!("📝 POST /shops - mobile {}", body.get("mobile").unwrap_or(&Value::Null));

    match shop_service::create_shop(db.get_ref(), &body).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome.into_json(SHOP_EXISTS_MESSAGE)),
        Err(e) => {
            log::error!("❌ Error creating shop: {}", e);
            e.error_response()
        }
    }
}

/// PATCH /shop/{id} - Aprova a loja (Pending -> Approve)
#[utoipa::path(
    patch,
    path = "/shop/{id}",
    tag = "Shops",
    params(("id" = String, Path, description = "Shop ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Update result", body = UpdateOutcome),
        (status = 400, description = "Invalid identifier"),
        (status = 500, description = "Database error")
    )
)]
pub async fn approve_shop(db: web::Data<dyn Store>, id: web::Path<String>) -> HttpResponse {
    log::info!("✔️  PATCH /shop/{}", id);

    match shop_service::approve_shop(db.get_ref(), &id).await {
        Ok(result) => {
            log::info!("✅ Approve matched {} / modified {}", result.matched_count, result.modified_count);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("⚠️ Failed to approve shop {}: {}", id, e);
            e.error_response()
        }
    }
}

/// DELETE /shops/{id} - Remove a loja
#[utoipa::path(
    delete,
    path = "/shops/{id}",
    tag = "Shops",
    params(("id" = String, Path, description = "Shop ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Delete result; deletedCount is 0 when nothing matched", body = DeleteOutcome),
        (status = 400, description = "Invalid identifier"),
        (status = 500, description = "Database error")
    )
)]
pub async fn delete_shop(db: web::Data<dyn Store>, id: web::Path<String>) -> HttpResponse {
    log::info!("🗑️  DELETE /shops/{}", id);

    match shop_service::delete_shop(db.get_ref(), &id).await {
        Ok(result) => {
            log::info!("✅ Deleted {} shop(s)", result.deleted_count);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("⚠️ Failed to delete shop {}: {}", id, e);
            e.error_response()
        }
    }
}
