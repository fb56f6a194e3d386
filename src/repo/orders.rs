use rust_decimal::Decimal;

use sqlx::PgExecutor;

use crate::model::{NewOrder, NewOrderItem, Order, OrderItem};

/// Repository for orders and their line items
pub struct OrdersRepo;

impl OrdersRepo {
    #[tracing::instrument(name = "Insert order", skip(executor, new_order), fields(order_number = %new_order.order_number))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_order: &NewOrder,
    ) -> sqlx::Result<Order> {
        sqlx::query_as::<_, Order>(
            "insert into orders(order_number, user_id, customer_first_name, customer_last_name, customer_email, customer_phone, subtotal, tax, total, payment_intent_id)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            returning *",
        )
        .bind(&new_order.order_number)
        .bind(new_order.user_id)
        .bind(new_order.customer.first_name.as_ref())
        .bind(new_order.customer.last_name.as_ref())
        .bind(new_order.customer.email.as_ref())
        .bind(new_order.customer.phone.as_ref())
        .bind(new_order.totals.subtotal)
        .bind(new_order.totals.tax)
        .bind(new_order.totals.total)
        .bind(&new_order.payment_intent_id)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Insert order item", skip(executor))]
    pub async fn insert_item<'con>(
        executor: impl PgExecutor<'con>,
        order_id: i32,
        item: &NewOrderItem,
    ) -> sqlx::Result<OrderItem> {
        sqlx::query_as::<_, OrderItem>(
            "insert into order_items(order_id, course_id, price) values ($1, $2, $3) returning *",
        )
        .bind(order_id)
        .bind(item.course_id)
        .bind(item.price)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch all orders", skip(executor))]
    pub async fn fetch_all<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Vec<Order>> {
        sqlx::query_as::<_, Order>("select * from orders order by created_at desc, id desc")
            .fetch_all(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch an order by number", skip(executor))]
    pub async fn fetch_by_number<'con>(
        executor: impl PgExecutor<'con>,
        order_number: &str,
    ) -> sqlx::Result<Option<Order>> {
        sqlx::query_as::<_, Order>("select * from orders where order_number=$1")
            .bind(order_number)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch order items", skip(executor))]
    pub async fn fetch_items<'con>(
        executor: impl PgExecutor<'con>,
        order_id: i32,
    ) -> sqlx::Result<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>("select * from order_items where order_id=$1 order by id")
            .bind(order_id)
            .fetch_all(executor)
            .await
    }

    /// Order count and the sum of order totals
    #[tracing::instrument(name = "Summarize orders", skip(executor))]
    pub async fn summary<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<(i64, Decimal)> {
        sqlx::query_as::<_, (i64, Decimal)>(
            "select count(*), coalesce(sum(total), 0) from orders",
        )
        .fetch_one(executor)
        .await
    }
}
