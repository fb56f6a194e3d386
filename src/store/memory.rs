use std::sync::{Mutex, MutexGuard};

use anyhow::Context;

use async_trait::async_trait;

use chrono::Utc;

use rust_decimal::Decimal;

use crate::model::{
    sample_courses, Analytics, Contact, Course, NewContact, NewCourse, NewOrder, NewOrderItem,
    NewUser, Order, OrderItem, User, UserUpdate,
};

use super::Store;

#[derive(Debug, Default)]
struct Tables {
    courses: Vec<Course>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    contacts: Vec<Contact>,
    users: Vec<User>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store used when no database is configured.
///
/// Every operation holds a single lock, so multi-row writes are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the launch catalog
    pub fn with_sample_catalog() -> Self {
        let mut tables = Tables::default();
        for course in sample_courses() {
            let id = tables.next_id();
            tables.courses.push(course.into_course(id));
        }
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow::anyhow!("In-memory store lock poisoned"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_courses(&self) -> anyhow::Result<Vec<Course>> {
        Ok(self.lock()?.courses.clone())
    }

    async fn course_by_id(&self, id: i32) -> anyhow::Result<Option<Course>> {
        Ok(self.lock()?.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn create_course(&self, course: NewCourse) -> anyhow::Result<Course> {
        let mut tables = self.lock()?;
        let id = tables.next_id();
        let course = course.into_course(id);
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn create_order(&self, order: NewOrder, items: &[NewOrderItem]) -> anyhow::Result<Order> {
        let mut tables = self.lock()?;

        if tables.orders.iter().any(|o| o.order_number == order.order_number) {
            anyhow::bail!("Order number {} already exists", order.order_number);
        }
        if let Some(missing) = items
            .iter()
            .find(|item| !tables.courses.iter().any(|c| c.id == item.course_id))
        {
            anyhow::bail!("Course {} does not exist", missing.course_id);
        }

        let id = tables.next_id();
        let stored = Order {
            id,
            order_number: order.order_number,
            user_id: order.user_id,
            customer_first_name: order.customer.first_name.to_string(),
            customer_last_name: order.customer.last_name.to_string(),
            customer_email: order.customer.email.to_string(),
            customer_phone: order.customer.phone.to_string(),
            subtotal: order.totals.subtotal,
            tax: order.totals.tax,
            total: order.totals.total,
            payment_intent_id: order.payment_intent_id,
            created_at: Utc::now(),
        };
        tables.orders.push(stored.clone());

        for item in items {
            let item_id = tables.next_id();
            tables.order_items.push(OrderItem {
                id: item_id,
                order_id: id,
                course_id: item.course_id,
                price: item.price,
            });
        }

        Ok(stored)
    }

    async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let mut orders = self.lock()?.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn order_by_number(&self, order_number: &str) -> anyhow::Result<Option<Order>> {
        Ok(self
            .lock()?
            .orders
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn order_items(&self, order_id: i32) -> anyhow::Result<Vec<OrderItem>> {
        Ok(self
            .lock()?
            .order_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn create_contact(&self, contact: NewContact) -> anyhow::Result<Contact> {
        let mut tables = self.lock()?;
        let id = tables.next_id();
        let contact = Contact {
            id,
            name: contact.name.to_string(),
            email: contact.email.to_string(),
            subject: contact.subject.to_string(),
            message: contact.message.as_ref().to_string(),
            created_at: Utc::now(),
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self) -> anyhow::Result<Vec<Contact>> {
        let mut contacts = self.lock()?.contacts.clone();
        contacts.reverse();
        Ok(contacts)
    }

    async fn user_by_external_id(&self, external_id: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        let mut tables = self.lock()?;
        if let Some(existing) = tables.users.iter().find(|u| u.external_id == user.external_id) {
            return Ok(existing.clone());
        }

        let id = tables.next_id();
        let user = User {
            id,
            external_id: user.external_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, external_id: &str, update: UserUpdate) -> anyhow::Result<Option<User>> {
        let mut tables = self.lock()?;
        let Some(user) = tables.users.iter_mut().find(|u| u.external_id == external_id) else {
            return Ok(None);
        };

        if let Some(email) = update.email {
            user.email = email;
        }
        if update.first_name.is_some() {
            user.first_name = update.first_name;
        }
        if update.last_name.is_some() {
            user.last_name = update.last_name;
        }
        if update.profile_image_url.is_some() {
            user.profile_image_url = update.profile_image_url;
        }

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, external_id: &str) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.external_id != external_id);
        let removed = tables.users.len() < before;

        if removed {
            // Mirrors `on delete set null` on orders.user_id
            let remaining: Vec<i32> = tables.users.iter().map(|u| u.id).collect();
            for order in tables.orders.iter_mut() {
                if order.user_id.map_or(false, |id| !remaining.contains(&id)) {
                    order.user_id = None;
                }
            }
        }

        Ok(removed)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let mut users = self.lock()?.users.clone();
        users.reverse();
        Ok(users)
    }

    async fn analytics(&self) -> anyhow::Result<Analytics> {
        let tables = self.lock()?;
        let user_count = i64::try_from(tables.users.len()).context("Too many users")?;
        let order_count = i64::try_from(tables.orders.len()).context("Too many orders")?;
        let total_revenue: Decimal = tables.orders.iter().map(|o| o.total).sum();

        Ok(Analytics::new(user_count, order_count, total_revenue))
    }
}
