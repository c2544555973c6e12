//! Order service
//!
//! Owns the order lifecycle: creation with a generated sequential number,
//! the deferred-payment ledger increment, print and edit history, and the
//! soft-delete archive. The order write is authoritative; confirmation
//! dispatch is best-effort and never fails the request.

use std::sync::Arc;

use mongodb::Client;
use mongodb::bson::{self, doc, oid::ObjectId};

use crate::audit::{AdminAction, AdminLogService};
use crate::auth::CurrentUser;
use crate::db::DbService;
use crate::db::models::{
    CustomerSnapshot, DeletedOrder, EditEntry, LineItem, Order, OrderStatus, PaymentStatus,
    PrintEntry,
};
use crate::db::repository::{
    DeletedOrderRepository, OrderFilter, OrderRepository, ProductRepository, RepoError,
    UserRepository,
};
use crate::orders::number::{
    LEGACY_BASE, LEGACY_NUMBER_PATTERN, OrderNumberAllocator, format_number, parse_number,
};
use crate::services::MailerService;
use crate::utils::AppError;

/// Requested order line, resolved against the catalog at creation time
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: ObjectId,
    pub quantity: i64,
}

/// Typed order-creation input (already validated at the boundary)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: ObjectId,
    pub items: Vec<NewLineItem>,
    pub payment_status: PaymentStatus,
}

/// Partial order update
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderService {
    client: Client,
    orders: OrderRepository,
    deleted: DeletedOrderRepository,
    users: UserRepository,
    products: ProductRepository,
    allocator: OrderNumberAllocator,
    mailer: Arc<MailerService>,
    admin_log: AdminLogService,
}

impl OrderService {
    pub fn new(db: &DbService, mailer: Arc<MailerService>, admin_log: AdminLogService) -> Self {
        let database = db.database();
        Self {
            client: db.client().clone(),
            orders: OrderRepository::new(database),
            deleted: DeletedOrderRepository::new(database),
            users: UserRepository::new(database),
            products: ProductRepository::new(database),
            allocator: OrderNumberAllocator::new(database),
            mailer,
            admin_log,
        }
    }

    /// Create an order.
    ///
    /// Resolves line items against the catalog, allocates the next
    /// sequential number, and persists the order. A `Pending` payment
    /// status also grows the customer's ledger_balance and lifetime_value
    /// by the order amount; both writes commit in one transaction.
    pub async fn create_order(&self, data: NewOrder, actor: &CurrentUser) -> Result<Order, AppError> {
        if data.items.is_empty() {
            return Err(AppError::Validation("Order needs at least one item".into()));
        }

        let user = self
            .users
            .find_by_id(data.user_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", data.user_id)))?;

        // Snapshot item name and price at checkout time
        let mut items = Vec::with_capacity(data.items.len());
        let mut amount = 0.0;
        for line in &data.items {
            if line.quantity < 1 {
                return Err(AppError::Validation("Item quantity must be at least 1".into()));
            }
            let product = self
                .products
                .find_by_id(line.product_id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Product {} not found", line.product_id))
                })?;
            amount += product.price * line.quantity as f64;
            items.push(LineItem {
                product_id: line.product_id,
                name: product.name,
                price: product.price,
                quantity: line.quantity,
            });
        }

        let order_number = self.allocator.next().await.map_err(AppError::from)?;
        let now = bson::DateTime::now();
        let order = Order {
            id: None,
            order_number,
            customer: CustomerSnapshot {
                user_id: data.user_id,
                name: user.name.clone(),
                email: user.email.clone(),
                avatar: user.avatar.clone(),
            },
            items,
            amount,
            payment_status: data.payment_status,
            status: OrderStatus::Processing,
            print_history: Vec::new(),
            edit_history: Vec::new(),
            created_by: actor.email.clone(),
            created_at: now,
            updated_at: now,
        };

        let order = self.persist_with_ledger(order).await?;

        tracing::info!(
            order_number = %order.order_number,
            amount = order.amount,
            payment_status = %order.payment_status,
            "Order created"
        );

        self.dispatch_confirmation(&order);

        self.admin_log
            .log(
                AdminAction::OrderCreated,
                "order",
                order.order_number.clone(),
                Some(actor.id.clone()),
                Some(actor.name.clone()),
                serde_json::json!({
                    "amount": order.amount,
                    "payment_status": order.payment_status.to_string(),
                    "customer": order.customer.email,
                }),
            )
            .await;

        Ok(order)
    }

    /// Order insert plus the ledger increment, committed together.
    async fn persist_with_ledger(&self, order: Order) -> Result<Order, AppError> {
        let mut session = self
            .client
            .start_session()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start session: {e}")))?;
        session
            .start_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {e}")))?;

        let deferred = order.payment_status == PaymentStatus::Pending;
        let user_id = order.customer.user_id;
        let amount = order.amount;

        let order = match self.orders.insert_with_session(&mut session, order).await {
            Ok(order) => order,
            Err(e) => {
                session.abort_transaction().await.ok();
                return Err(e.into());
            }
        };

        if deferred
            && let Err(e) = self
                .users
                .apply_ledger_increment(&mut session, user_id, amount)
                .await
        {
            session.abort_transaction().await.ok();
            return Err(e.into());
        }

        session
            .commit_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit order: {e}")))?;

        Ok(order)
    }

    /// Fire-and-forget confirmation email. At most once; failure is logged
    /// and never surfaces to the caller.
    fn dispatch_confirmation(&self, order: &Order) {
        let mailer = self.mailer.clone();
        let email = order.customer.email.clone();
        let name = order.customer.name.clone();
        let order_number = order.order_number.clone();
        let amount = order.amount;
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_order_confirmation(&email, &name, &order_number, amount)
                .await
            {
                tracing::warn!(
                    order_number = %order_number,
                    error = %e,
                    "Order confirmation dispatch failed"
                );
            }
        });
    }

    /// Matching orders, date descending, unpaginated.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_all(filter).await?)
    }

    pub async fn get_order(&self, order_number: &str) -> Result<Order, AppError> {
        self.orders
            .find_by_number(order_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_number} not found")))
    }

    /// Append a print event to the order's history.
    pub async fn record_print(
        &self,
        order_number: &str,
        actor: &CurrentUser,
    ) -> Result<(), AppError> {
        let entry = PrintEntry {
            printed_by: actor.email.clone(),
            at: bson::DateTime::now(),
        };
        let matched = self.orders.push_print(order_number, &entry).await?;
        if !matched {
            return Err(AppError::NotFound(format!("Order {order_number} not found")));
        }

        self.admin_log
            .log(
                AdminAction::OrderPrinted,
                "order",
                order_number.to_string(),
                Some(actor.id.clone()),
                Some(actor.name.clone()),
                serde_json::json!({}),
            )
            .await;

        Ok(())
    }

    /// Update status fields, recording one edit-history entry per change.
    pub async fn update_order(
        &self,
        order_number: &str,
        patch: OrderPatch,
        actor: &CurrentUser,
    ) -> Result<Order, AppError> {
        let existing = self.get_order(order_number).await?;

        let now = bson::DateTime::now();
        let mut sets = doc! {};
        let mut edits = Vec::new();

        if let Some(status) = patch.status
            && status != existing.status
        {
            sets.insert("status", bson::to_bson(&status).map_err(RepoError::from)?);
            edits.push(EditEntry {
                edited_by: actor.email.clone(),
                field: "status".into(),
                from: existing.status.to_string(),
                to: status.to_string(),
                at: now,
            });
        }
        if let Some(payment_status) = patch.payment_status
            && payment_status != existing.payment_status
        {
            sets.insert(
                "payment_status",
                bson::to_bson(&payment_status).map_err(RepoError::from)?,
            );
            edits.push(EditEntry {
                edited_by: actor.email.clone(),
                field: "payment_status".into(),
                from: existing.payment_status.to_string(),
                to: payment_status.to_string(),
                at: now,
            });
        }

        if edits.is_empty() {
            return Ok(existing);
        }

        let updated = self.orders.apply_edits(order_number, sets, &edits).await?;

        self.admin_log
            .log(
                AdminAction::OrderEdited,
                "order",
                order_number.to_string(),
                Some(actor.id.clone()),
                Some(actor.name.clone()),
                serde_json::json!({
                    "changes": edits
                        .iter()
                        .map(|e| serde_json::json!({ "field": e.field, "from": e.from, "to": e.to }))
                        .collect::<Vec<_>>(),
                }),
            )
            .await;

        Ok(updated)
    }

    /// Move an order to the archival collection (soft delete).
    pub async fn soft_delete(
        &self,
        order_number: &str,
        actor: &CurrentUser,
    ) -> Result<DeletedOrder, AppError> {
        let order = self.get_order(order_number).await?;

        let archived = self
            .deleted
            .archive(DeletedOrder {
                id: None,
                order,
                deleted_by: actor.email.clone(),
                deleted_at: bson::DateTime::now(),
            })
            .await?;
        self.orders.delete_by_number(order_number).await?;

        self.admin_log
            .log(
                AdminAction::OrderDeleted,
                "order",
                order_number.to_string(),
                Some(actor.id.clone()),
                Some(actor.name.clone()),
                serde_json::json!({ "amount": archived.order.amount }),
            )
            .await;

        Ok(archived)
    }

    /// Number historical orders that predate number assignment.
    ///
    /// Runs once at startup. Starts from [`LEGACY_BASE`] (not the checkout
    /// base; the two constants are deliberately distinct) and continues
    /// after any previously backfilled number in the legacy range.
    pub async fn backfill_order_numbers(&self) -> Result<u64, AppError> {
        let unnumbered = self.orders.find_unnumbered().await?;
        if unnumbered.is_empty() {
            return Ok(0);
        }

        let mut next = LEGACY_BASE;
        if let Some(latest) = self
            .orders
            .find_latest_numbered(LEGACY_NUMBER_PATTERN)
            .await?
            && let Some(n) = parse_number(&latest.order_number)
            && n >= LEGACY_BASE
        {
            next = n + 1;
        }

        let mut assigned = 0;
        for order in unnumbered {
            let Some(id) = order.id else { continue };
            self.orders.set_order_number(id, &format_number(next)).await?;
            next += 1;
            assigned += 1;
        }

        tracing::info!(count = assigned, "Backfilled legacy order numbers");
        Ok(assigned)
    }
}
