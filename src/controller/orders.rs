use std::collections::HashMap;

use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use anyhow::Context;

use rand::distributions::Alphanumeric;
use rand::Rng;

use rust_decimal::Decimal;

use serde::Deserialize;

use uuid::Uuid;

use crate::auth::Authenticated;
use crate::client::PaymentClient;
use crate::domain::{to_minor_units, CustomerInfo, CustomerInfoForm, Totals, ValidationErrors};
use crate::error::{RestError, RestResult};
use crate::model::{NewOrder, NewOrderItem, OrderDetails, PlacedOrder};
use crate::settings::CheckoutSettings;
use crate::store::Store;

const ORDER_NUMBER_LEN: usize = 8;

/// Largest accepted difference between submitted and computed totals
const TOTALS_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Order submission body, unvalidated
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    items: Option<Vec<i64>>,
    customer_info: Option<CustomerInfoForm>,
    subtotal: Option<Decimal>,
    tax: Option<Decimal>,
    total: Option<Decimal>,
}

/// Order submission that passed field validation
#[derive(Debug)]
struct ValidOrderForm {
    items: Vec<i32>,
    customer: CustomerInfo,
    submitted: Totals,
}

impl TryFrom<OrderForm> for ValidOrderForm {
    type Error = ValidationErrors;

    fn try_from(form: OrderForm) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let items = match form.items {
            None => {
                errors.push("items", "items is required");
                None
            }
            Some(items) if items.is_empty() => {
                errors.push("items", "Cart is empty");
                None
            }
            Some(items) => {
                let ids: Option<Vec<i32>> = items
                    .into_iter()
                    .map(|id| i32::try_from(id).ok().filter(|id| *id > 0))
                    .collect();
                if ids.is_none() {
                    errors.push("items", "items must be positive course ids");
                }
                ids
            }
        };

        let customer = match form.customer_info {
            None => {
                errors.push("customerInfo", "customerInfo is required");
                None
            }
            Some(info) => CustomerInfo::try_from(info)
                .map_err(|nested| errors.extend_nested("customerInfo", nested))
                .ok(),
        };

        let subtotal = amount(&mut errors, "subtotal", form.subtotal);
        let tax = amount(&mut errors, "tax", form.tax);
        let total = amount(&mut errors, "total", form.total);

        errors.finish(|| {
            Some(Self {
                items: items?,
                customer: customer?,
                submitted: Totals {
                    subtotal: subtotal?,
                    tax: tax?,
                    total: total?,
                },
            })
        })
    }
}

fn amount(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>) -> Option<Decimal> {
    match value {
        None => {
            errors.push(field, format!("{} is required", field));
            None
        }
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            errors.push(field, format!("{} must not be negative", field));
            None
        }
        Some(value) => Some(value),
    }
}

/// Field errors for every submitted total that disagrees with the computed one
fn compare_totals(submitted: &Totals, computed: &Totals) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let fields = [
        ("subtotal", submitted.subtotal, computed.subtotal),
        ("tax", submitted.tax, computed.tax),
        ("total", submitted.total, computed.total),
    ];
    for (field, submitted, computed) in fields {
        if (submitted - computed).abs() > TOTALS_TOLERANCE {
            errors.push(field, format!("{} does not match the expected {}", field, computed));
        }
    }
    errors
}

/// Human readable order number, e.g. `HBH-7QK2M9XD`
fn generate_order_number(prefix: &str) -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_NUMBER_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("{}-{}", prefix, code)
}

/// Price every submitted course id, failing on ids the catalog doesn't know
async fn price_items(store: &dyn Store, ids: &[i32]) -> RestResult<Vec<NewOrderItem>> {
    let mut prices: HashMap<i32, Option<Decimal>> = HashMap::new();
    for id in ids {
        if !prices.contains_key(id) {
            let price = store.course_by_id(*id).await?.map(|course| course.price);
            prices.insert(*id, price);
        }
    }

    let mut unknown: Vec<i32> = prices
        .iter()
        .filter(|(_, price)| price.is_none())
        .map(|(id, _)| *id)
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        let mut errors = ValidationErrors::new();
        errors.push("items", format!("Unknown course ids: {:?}", unknown));
        return Err(errors.into());
    }

    Ok(ids
        .iter()
        .filter_map(|id| {
            prices[id].map(|price| NewOrderItem {
                course_id: *id,
                price,
            })
        })
        .collect())
}

/// Submit a checked-out cart, creating the order and its payment intent
#[tracing::instrument(
    name = "Submit an order",
    skip(form, session, store, payment_client, checkout),
    fields(order_number = tracing::field::Empty)
)]
#[post("")]
async fn submit(
    form: web::Json<OrderForm>,
    session: Option<Authenticated>,
    store: web::Data<dyn Store>,
    payment_client: web::Data<PaymentClient>,
    checkout: web::Data<CheckoutSettings>,
) -> RestResult<impl Responder> {
    let store = store.get_ref();
    let form: ValidOrderForm = form.into_inner().try_into()?;

    // Price from the catalog, never from the client
    let items = price_items(store, &form.items).await?;
    let subtotal: Decimal = items.iter().map(|item| item.price).sum();
    let totals = Totals::from_subtotal(subtotal, checkout.tax_rate).rounded();

    let mismatches = compare_totals(&form.submitted, &totals);
    if !mismatches.is_empty() {
        tracing::warn!(submitted = ?form.submitted, computed = ?totals, "Submitted totals rejected");
        return Err(mismatches.into());
    }

    let order_number = generate_order_number(&checkout.order_number_prefix);
    tracing::Span::current().record("order_number", &tracing::field::display(&order_number));

    // Create the payment intent first so a gateway failure leaves nothing behind
    let amount = to_minor_units(totals.total).context("Order total out of range")?;
    let intent = payment_client
        .create_payment_intent(amount, &order_number, &Uuid::new_v4().to_string())
        .await
        .map_err(|error| {
            tracing::error!(error.cause_chain = ?error, "Failed to create payment intent");
            RestError::InternalError("Failed to create payment".into())
        })?;

    let user_id = match session {
        Some(Authenticated(identity)) => store
            .user_by_external_id(&identity.external_id)
            .await?
            .map(|user| user.id),
        None => None,
    };

    let order = store
        .create_order(
            NewOrder {
                order_number,
                user_id,
                customer: form.customer,
                totals,
                payment_intent_id: Some(intent.id),
            },
            &items,
        )
        .await?;

    Ok(HttpResponse::Created().json(PlacedOrder {
        order_id: order.id,
        order_number: order.order_number,
        payment_client_handle: intent.client_secret,
    }))
}

/// Fetch an order, its items and its payment status
#[tracing::instrument(name = "Fetch an order", skip(store, payment_client))]
#[get("/{order_number}")]
async fn fetch(
    store: web::Data<dyn Store>,
    payment_client: web::Data<PaymentClient>,
    path: web::Path<(String,)>,
) -> RestResult<impl Responder> {
    let (order_number,) = path.into_inner();

    let order = store
        .order_by_number(&order_number)
        .await?
        .ok_or_else(|| RestError::NotFound(format!("Order {} not found", order_number)))?;
    let items = store.order_items(order.id).await?;

    let payment_status = match &order.payment_intent_id {
        Some(id) => match payment_client.retrieve_payment_intent(id).await {
            Ok(intent) => Some(intent.status),
            Err(error) => {
                tracing::warn!(error.cause_chain = ?error, "Failed to fetch payment status");
                None
            }
        },
        None => None,
    };

    Ok(HttpResponse::Ok().json(OrderDetails {
        order,
        items,
        payment_status,
    }))
}

/// Order API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/orders").service(submit).service(fetch)
}
