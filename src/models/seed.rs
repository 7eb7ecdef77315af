//! Deterministic demo data
//!
//! Seeds a small warehouse: two categories, a handful of products, and an
//! admin plus a regular user. Used by the binary at startup and reusable
//! from tests.

use anyhow::Result;

use crate::auth::password;
use crate::models::{Category, Product, User};
use crate::store::{MemoryStore, RecordStore};

/// Demo admin credentials: `admin@depot.local` / `admin123`
pub const ADMIN_EMAIL: &str = "admin@depot.local";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Demo clerk credentials: `clerk@depot.local` / `clerk123`
pub const CLERK_EMAIL: &str = "clerk@depot.local";
pub const CLERK_PASSWORD: &str = "clerk123";

pub async fn seed_demo(store: &MemoryStore) -> Result<()> {
    let electronics =
        RecordStore::<Category>::insert(store, Category::new("electronics", "active")).await?;
    let accessories =
        RecordStore::<Category>::insert(store, Category::new("accessories", "active")).await?;

    for product in [
        Product::new("Laptop Pro", 1500.0, "active", Some(electronics.id)),
        Product::new("USB-C Hub", 45.0, "inactive", Some(accessories.id)),
        Product::new("Mechanical Keyboard", 120.0, "active", Some(electronics.id)),
        Product::new("Laptop Stand", 35.0, "active", Some(accessories.id)),
    ] {
        RecordStore::<Product>::insert(store, product).await?;
    }

    let admin = User::new(
        "Admin",
        ADMIN_EMAIL,
        password::hash(ADMIN_PASSWORD)?,
        "admin",
    );
    RecordStore::<User>::insert(store, admin).await?;

    let clerk = User::new(
        "Warehouse Clerk",
        CLERK_EMAIL,
        password::hash(CLERK_PASSWORD)?,
        "user",
    );
    RecordStore::<User>::insert(store, clerk).await?;

    Ok(())
}
