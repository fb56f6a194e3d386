use anyhow::Context;

use async_trait::async_trait;

use sqlx::PgPool;

use crate::model::{
    Analytics, Contact, Course, NewContact, NewCourse, NewOrder, NewOrderItem, NewUser, Order,
    OrderItem, User, UserUpdate,
};
use crate::repo::{ContactsRepo, CoursesRepo, OrdersRepo, UsersRepo};

use super::Store;

/// Postgres-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_courses(&self) -> anyhow::Result<Vec<Course>> {
        CoursesRepo::fetch_all(&self.pool)
            .await
            .context("Failed to fetch courses")
    }

    async fn course_by_id(&self, id: i32) -> anyhow::Result<Option<Course>> {
        CoursesRepo::fetch_by_id(&self.pool, id)
            .await
            .context("Failed to fetch course")
    }

    async fn create_course(&self, course: NewCourse) -> anyhow::Result<Course> {
        CoursesRepo::insert(&self.pool, &course)
            .await
            .context("Failed to insert course")
    }

    async fn create_order(&self, order: NewOrder, items: &[NewOrderItem]) -> anyhow::Result<Order> {
        // Order and items commit together
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let stored = OrdersRepo::insert(&mut *tx, &order)
            .await
            .context("Failed to insert order")?;
        for item in items {
            OrdersRepo::insert_item(&mut *tx, stored.id, item)
                .await
                .context("Failed to insert order item")?;
        }

        tx.commit().await.context("Failed to commit order")?;

        Ok(stored)
    }

    async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        OrdersRepo::fetch_all(&self.pool)
            .await
            .context("Failed to fetch orders")
    }

    async fn order_by_number(&self, order_number: &str) -> anyhow::Result<Option<Order>> {
        OrdersRepo::fetch_by_number(&self.pool, order_number)
            .await
            .context("Failed to fetch order")
    }

    async fn order_items(&self, order_id: i32) -> anyhow::Result<Vec<OrderItem>> {
        OrdersRepo::fetch_items(&self.pool, order_id)
            .await
            .context("Failed to fetch order items")
    }

    async fn create_contact(&self, contact: NewContact) -> anyhow::Result<Contact> {
        ContactsRepo::insert(&self.pool, &contact)
            .await
            .context("Failed to insert contact")
    }

    async fn list_contacts(&self) -> anyhow::Result<Vec<Contact>> {
        ContactsRepo::fetch_all(&self.pool)
            .await
            .context("Failed to fetch contacts")
    }

    async fn user_by_external_id(&self, external_id: &str) -> anyhow::Result<Option<User>> {
        UsersRepo::fetch_by_external_id(&self.pool, external_id)
            .await
            .context("Failed to fetch user")
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        UsersRepo::insert(&self.pool, &user)
            .await
            .context("Failed to insert user")
    }

    async fn update_user(&self, external_id: &str, update: UserUpdate) -> anyhow::Result<Option<User>> {
        UsersRepo::update(&self.pool, external_id, &update)
            .await
            .context("Failed to update user")
    }

    async fn delete_user(&self, external_id: &str) -> anyhow::Result<bool> {
        UsersRepo::delete(&self.pool, external_id)
            .await
            .context("Failed to delete user")
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        UsersRepo::fetch_all(&self.pool)
            .await
            .context("Failed to fetch users")
    }

    async fn analytics(&self) -> anyhow::Result<Analytics> {
        let user_count = UsersRepo::count(&self.pool)
            .await
            .context("Failed to count users")?;
        let (order_count, total_revenue) = OrdersRepo::summary(&self.pool)
            .await
            .context("Failed to summarize orders")?;

        Ok(Analytics::new(user_count, order_count, total_revenue))
    }
}
