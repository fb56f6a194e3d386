use async_trait::async_trait;

use crate::model::{
    Analytics, Contact, Course, NewContact, NewCourse, NewOrder, NewOrderItem, NewUser, Order,
    OrderItem, User, UserUpdate,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence for every table the storefront owns.
///
/// `PgStore` is the production backend; `MemoryStore` is used when no database
/// is configured and in tests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_courses(&self) -> anyhow::Result<Vec<Course>>;
    async fn course_by_id(&self, id: i32) -> anyhow::Result<Option<Course>>;
    async fn create_course(&self, course: NewCourse) -> anyhow::Result<Course>;

    /// Write an order and all of its items, or nothing
    async fn create_order(&self, order: NewOrder, items: &[NewOrderItem]) -> anyhow::Result<Order>;
    async fn list_orders(&self) -> anyhow::Result<Vec<Order>>;
    async fn order_by_number(&self, order_number: &str) -> anyhow::Result<Option<Order>>;
    async fn order_items(&self, order_id: i32) -> anyhow::Result<Vec<OrderItem>>;

    async fn create_contact(&self, contact: NewContact) -> anyhow::Result<Contact>;
    async fn list_contacts(&self) -> anyhow::Result<Vec<Contact>>;

    async fn user_by_external_id(&self, external_id: &str) -> anyhow::Result<Option<User>>;
    /// Insert a user, or return the existing one with the same external id
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn update_user(&self, external_id: &str, update: UserUpdate) -> anyhow::Result<Option<User>>;
    async fn delete_user(&self, external_id: &str) -> anyhow::Result<bool>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;

    async fn analytics(&self) -> anyhow::Result<Analytics>;
}
