use actix_web::{web, HttpResponse, ResponseError};
use serde_json::Value;

use crate::api::PageQuery;
use crate::config::Config;
use crate::database::Store;
use crate::models::RoleResponse;
use crate::services::user_service::{self, UsersPage};

const USER_EXISTS_MESSAGE: &str = "user already exists";

/// GET /users?page=N - Lista usuários paginados (10 por página)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users and total user count", body = UsersPage),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_users(
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let page = query.page_number();
    log::info!("📋 GET /users - page {}", page);

    match user_service::list_users(db.get_ref(), page, &config.users_sort_field).await {
        Ok(result) => {
            log::info!("✅ Listed {} of {} users", result.users.len(), result.count_user);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            e.error_response()
        }
    }
}

/// GET /users/role/{email} - Retorna se o usuário é Admin
#[utoipa::path(
    get,
    path = "/users/role/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Exact email of the user")),
    responses(
        (status = 200, description = "Admin flag; false when the user does not exist", body = RoleResponse),
        (status = 500, description = "Database error")
    )
)]
pub async fn get_role(db: web::Data<dyn Store>, email: web::Path<String>) -> HttpResponse {
    log::info!("🔑 GET /users/role/{}", email);

    match user_service::get_role(db.get_ref(), &email).await {
        Ok(role) => HttpResponse::Ok().json(role),
        Err(e) => {
            log::error!("❌ Error looking up role: {}", e);
            e.error_response()
        }
    }
}

/// POST /users - Cadastra usuário se o email ainda não existe
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Insert result, or message with null insertedId when the email is taken"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 500, description = "Database error")
    )
)]
pub async fn create_user(db: web::Data<dyn Store>, body: web::Json<Value>) -> HttpResponse {
    log::info!("📝 POST /users - email {}", body.get("email").unwrap_or(&Value::Null));

    match user_service::create_user(db.get_ref(), &body).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome.into_json(USER_EXISTS_MESSAGE)),
        Err(e) => {
            log::error!("❌ Error creating user: {}", e);
            e.error_response()
        }
    }
}
