pub mod document;
pub mod shop;
pub mod user;

pub use document::*;
pub use shop::ShopStatus;
pub use user::RoleResponse;
