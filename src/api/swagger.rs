use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mobilesebaa API",
        version = "1.0.0",
        description = "Users and mobile shop directory.\n\n**Features:**\n- Paginated user listing and admin role lookup\n- Approved shop catalog sorted by district\n- Town search (case-insensitive)\n- Shop moderation: Pending -> Approve"
    ),
    paths(
        // Health
        crate::api::health::index,
        crate::api::health::health_check,

        // Users
        crate::api::users::list_users,
        crate::api::users::get_role,
        crate::api::users::create_user,

        // Shops
        crate::api::shops::list_shops,
        crate::api::shops::list_pending_shops,
        crate::api::shops::search_shops,
        crate::api::shops::create_shop,
        crate::api::shops::approve_shop,
        crate::api::shops::delete_shop,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::RoleResponse,
            crate::models::ShopStatus,
            crate::services::user_service::UsersPage,
            crate::services::shop_service::ShopsPage,
            crate::database::UpdateOutcome,
            crate::database::DeleteOutcome,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability."),
        (name = "Users", description = "User listing, sign-up and admin role lookup."),
        (name = "Shops", description = "Shop catalog, town search and moderation."),
    )
)]
pub struct ApiDoc;
