use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

/// Role value that grants admin status.
pub const ADMIN_ROLE: &str = "Admin";

/// Users are stored as opaque documents; only these fields are interpreted.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
}

/// Response of the role lookup endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct RoleResponse {
    pub admin: bool,
}

impl RoleResponse {
    pub fn for_user(user: Option<&Document>) -> Self {
        let admin = user
            .and_then(|doc| doc.get_str(fields::ROLE).ok())
            .is_some_and(|role| role == ADMIN_ROLE);

        Self { admin }
    }
}
