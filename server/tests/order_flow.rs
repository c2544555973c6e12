//! End-to-end order lifecycle tests against a live document store.
//!
//! Ignored by default — they need a reachable MongoDB replica set
//! (transactions require one):
//!
//! ```text
//! MONGODB_URI=mongodb://localhost:27017 cargo test -p dm-server -- --ignored
//! ```

use mongodb::bson;

use dm_server::auth::CurrentUser;
use dm_server::core::{AppState, Config};
use dm_server::db::models::{AccountStatus, PaymentStatus, Product, Role, User};
use dm_server::db::repository::{DeletedOrderRepository, ProductRepository, UserRepository};
use dm_server::orders::{NewLineItem, NewOrder};
use dm_server::utils::AppError;

fn unique_db_name() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_millis();
    format!("dm_test_{millis}")
}

fn fresh_user(email: &str) -> User {
    let now = bson::DateTime::now();
    User {
        id: None,
        name: "Test Customer".into(),
        email: email.into(),
        password_hash: None,
        role: Role::Customer,
        status: AccountStatus::Active,
        is_verified: true,
        verify_token: None,
        verify_token_expires_at: None,
        reset_token: None,
        reset_token_expires_at: None,
        ledger_balance: 0.0,
        lifetime_value: 0.0,
        avatar: None,
        virtual_account: None,
        created_at: now,
        updated_at: now,
    }
}

fn fresh_product(name: &str, price: f64) -> Product {
    let now = bson::DateTime::now();
    Product {
        id: None,
        name: name.into(),
        description: "test item".into(),
        brand: "Oraimo".into(),
        price,
        image: None,
        stock: 50,
        stock_history: Vec::new(),
        reviews: Vec::new(),
        rating: 0.0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn order_lifecycle_end_to_end() {
    let mut config = Config::from_env();
    config.db.database = unique_db_name();

    let state = AppState::initialize(&config).await.expect("state init");
    let db_name = config.db.database.clone();

    let users = UserRepository::new(state.database());
    let products = ProductRepository::new(state.database());
    let service = state.order_service();

    let customer = users
        .create(fresh_user("customer@example.com"))
        .await
        .expect("create customer");
    let customer_id = customer.id.expect("customer id");

    let staff = users
        .create(fresh_user("sales@example.com"))
        .await
        .expect("create staff");
    let actor = CurrentUser {
        id: staff.id.expect("staff id").to_hex(),
        name: staff.name.clone(),
        email: staff.email.clone(),
        role: Role::Sales,
    };

    let charger = products
        .create(fresh_product("20W Fast Charger", 2_500.0))
        .await
        .expect("create product");
    let charger_id = charger.id.expect("product id");

    // ── First order on an empty store: base number, Pending grows the ledger ──
    let order = service
        .create_order(
            NewOrder {
                user_id: customer_id,
                items: vec![NewLineItem {
                    product_id: charger_id,
                    quantity: 2,
                }],
                payment_status: PaymentStatus::Pending,
            },
            &actor,
        )
        .await
        .expect("create pending order");

    assert_eq!(order.order_number, "DM-145000");
    assert_eq!(order.amount, 5_000.0);

    let customer = users
        .find_by_id(customer_id)
        .await
        .expect("reload")
        .expect("customer exists");
    assert_eq!(customer.ledger_balance, 5_000.0);
    assert_eq!(customer.lifetime_value, 5_000.0);

    // ── Second order: next sequential number, Paid leaves the ledger alone ──
    let paid = service
        .create_order(
            NewOrder {
                user_id: customer_id,
                items: vec![NewLineItem {
                    product_id: charger_id,
                    quantity: 1,
                }],
                payment_status: PaymentStatus::Paid,
            },
            &actor,
        )
        .await
        .expect("create paid order");

    assert_eq!(paid.order_number, "DM-145001");

    let customer = users
        .find_by_id(customer_id)
        .await
        .expect("reload")
        .expect("customer exists");
    assert_eq!(customer.ledger_balance, 5_000.0);
    assert_eq!(customer.lifetime_value, 5_000.0);

    // ── Print history ──
    service
        .record_print(&order.order_number, &actor)
        .await
        .expect("record print");
    let printed = service.get_order(&order.order_number).await.expect("get");
    assert_eq!(printed.print_history.len(), 1);
    assert_eq!(printed.print_history[0].printed_by, actor.email);

    match service.record_print("DM-999999", &actor).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }

    // ── Reviews recompute the mean rating ──
    use dm_server::db::models::Review;
    let review = |rating| Review {
        author_id: customer_id,
        author_name: "Test Customer".into(),
        rating,
        comment: "solid".into(),
        at: bson::DateTime::now(),
    };
    products
        .add_review(charger_id, &review(4))
        .await
        .expect("first review");
    let after = products
        .add_review(charger_id, &review(5))
        .await
        .expect("second review");
    assert_eq!(after.reviews.len(), 2);
    assert!((after.rating - 4.5).abs() < f64::EPSILON);

    // ── Soft delete moves the order to the archive ──
    let archived = service
        .soft_delete(&order.order_number, &actor)
        .await
        .expect("soft delete");
    assert_eq!(archived.order.order_number, order.order_number);
    assert_eq!(archived.deleted_by, actor.email);

    match service.get_order(&order.order_number).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound after soft delete, got {other:?}"),
    }
    let deleted = DeletedOrderRepository::new(state.database())
        .find_all()
        .await
        .expect("list archive");
    assert_eq!(deleted.len(), 1);

    state.client().database(&db_name).drop().await.ok();
}
