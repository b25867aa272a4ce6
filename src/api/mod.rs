use actix_web::web;
use serde::Deserialize;

use crate::utils::AppError;

pub mod health;
pub mod shops;
pub mod swagger;
pub mod users;

/// `?page=` of the paginated listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; anything unparsable or below 1 means page 1
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Leading integer of `page` (so `"2abc"` is page 2), clamped to 1.
    pub fn page_number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(leading_integer)
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['-', '+']));
    let digits = raw[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return None;
    }

    // Out-of-range digit runs saturate instead of falling back to page 1
    let number = &raw[..sign_len + digits];
    Some(number.parse().unwrap_or(if number.starts_with('-') { i64::MIN } else { i64::MAX }))
}

/// Mounts every endpoint. Literal `/shops/request` is registered before
/// `/shops/{town_name}` so it is not captured as a town.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidBody(err.to_string()).into()),
    )
    .route("/", web::get().to(health::index))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("", web::post().to(users::create_user))
            .route("/role/{email}", web::get().to(users::get_role)),
    )
    .service(
        web::scope("/shops")
            .route("", web::get().to(shops::list_shops))
            .route("", web::post().to(shops::create_shop))
            .route("/request", web::get().to(shops::list_pending_shops))
            .route("/{town_name}", web::get().to(shops::search_shops))
            .route("/{id}", web::delete().to(shops::delete_shop)),
    )
    .service(web::scope("/shop").route("/{id}", web::patch().to(shops::approve_shop)));
}
