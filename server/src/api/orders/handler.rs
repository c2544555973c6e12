//! Order Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{CurrentUser, ensure_role, live_role};
use crate::core::AppState;
use crate::db::models::{DeletedOrder, Order, OrderStatus, PaymentStatus, Role};
use crate::db::repository::{DeletedOrderRepository, OrderFilter};
use crate::orders::{NewLineItem, NewOrder, OrderPatch};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok};

/// Roles with back-office visibility over all orders
const BACK_OFFICE: &[Role] = &[Role::Admin, Role::Sales, Role::Accountant];

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub created_by: Option<String>,
    pub customer_email: Option<String>,
}

/// List orders, date descending.
///
/// Customers are pinned to their own orders; back-office roles may filter
/// by creator or customer identity.
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppResponse<Vec<Order>>>, AppError> {
    let role = live_role(&state, &actor).await?;

    let filter = if !BACK_OFFICE.contains(&role) {
        OrderFilter {
            created_by: None,
            customer_email: Some(actor.email.clone()),
        }
    } else {
        OrderFilter {
            created_by: query.created_by,
            customer_email: query.customer_email,
        }
    };

    let orders = state.order_service().list_orders(&filter).await?;
    Ok(ok(orders))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Target customer; back-office only. Customers order for themselves.
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "must contain at least one item"))]
    pub items: Vec<OrderItemRequest>,
    pub payment_status: PaymentStatus,
}

/// Create an order
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    validate_payload(&req)?;

    let role = live_role(&state, &actor).await?;
    let user_id = match (&req.user_id, role) {
        // Back-office checkout on behalf of a customer
        (Some(raw), Role::Admin | Role::Sales | Role::Accountant) => ObjectId::parse_str(raw)
            .map_err(|_| AppError::Validation(format!("Invalid user id: {raw}")))?,
        (Some(_), _) => {
            return Err(AppError::Forbidden(
                "Only back-office roles can order for another customer".to_string(),
            ));
        }
        (None, _) => ObjectId::parse_str(&actor.id).map_err(|_| AppError::InvalidToken)?,
    };

    let mut items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        items.push(NewLineItem {
            product_id: ObjectId::parse_str(&item.product_id).map_err(|_| {
                AppError::Validation(format!("Invalid product id: {}", item.product_id))
            })?,
            quantity: item.quantity,
        });
    }

    let order = state
        .order_service()
        .create_order(
            NewOrder {
                user_id,
                items,
                payment_status: req.payment_status,
            },
            &actor,
        )
        .await?;

    Ok(ok(order))
}

/// Fetch one order by its number
pub async fn get_by_number(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(order_number): Path<String>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    let order = state.order_service().get_order(&order_number).await?;

    // Customers may only see their own orders
    let role = live_role(&state, &actor).await?;
    if !BACK_OFFICE.contains(&role) && order.customer.email != actor.email {
        return Err(AppError::NotFound(format!("Order {order_number} not found")));
    }

    Ok(ok(order))
}

/// Record a print event
pub async fn record_print(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(order_number): Path<String>,
) -> Result<Json<AppResponse<()>>, AppError> {
    ensure_role(&state, &actor, BACK_OFFICE).await?;
    state
        .order_service()
        .record_print(&order_number, &actor)
        .await?;
    Ok(ok(()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Update order status fields (back-office), appending edit history
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(order_number): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    ensure_role(&state, &actor, BACK_OFFICE).await?;

    let order = state
        .order_service()
        .update_order(
            &order_number,
            OrderPatch {
                status: req.status,
                payment_status: req.payment_status,
            },
            &actor,
        )
        .await?;
    Ok(ok(order))
}

/// Soft delete: move the order to the archival collection (admin)
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(order_number): Path<String>,
) -> Result<Json<AppResponse<DeletedOrder>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin]).await?;
    let archived = state
        .order_service()
        .soft_delete(&order_number, &actor)
        .await?;
    Ok(ok(archived))
}

/// List the soft-delete archive (admin)
pub async fn list_deleted(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<AppResponse<Vec<DeletedOrder>>>, AppError> {
    ensure_role(&state, &actor, &[Role::Admin]).await?;
    let deleted = DeletedOrderRepository::new(state.database())
        .find_all()
        .await?;
    Ok(ok(deleted))
}
