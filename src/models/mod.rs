//! Concrete record types served by the API

pub mod category;
pub mod product;
pub mod seed;
pub mod user;

pub use category::Category;
pub use product::Product;
pub use user::User;
