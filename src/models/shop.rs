use serde::{Deserialize, Serialize};

pub const SHOPS_COLLECTION: &str = "shops";

/// Shops are stored as opaque documents; only these fields are interpreted.
pub mod fields {
    pub const ID: &str = "_id";
    pub const MOBILE: &str = "mobile";
    pub const STATUS: &str = "status";
    pub const DISTRICT: &str = "selectedDistrict";
    pub const TOWN: &str = "selectedTown";
}

/// Moderation state of a shop. `Pending -> Approve` is the only transition.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
pub enum ShopStatus {
    Pending,
    Approve,
}

impl ShopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopStatus::Pending => "Pending",
            ShopStatus::Approve => "Approve",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_matches_stored_values() {
        assert_eq!(ShopStatus::Pending.as_str(), "Pending");
        assert_eq!(ShopStatus::Approve.as_str(), "Approve");
        assert_eq!(serde_json::to_value(ShopStatus::Approve).unwrap(), "Approve");
    }
}
