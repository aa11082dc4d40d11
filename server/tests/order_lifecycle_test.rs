//! Order lifecycle tests against the in-memory database
//!
//! Covers hardened order creation (server-side pricing), the status
//! state machine, user scoping and the dashboard aggregates.

use canteen_server::db;
use canteen_server::db::repository::{
    AdminRepository, MenuItemRepository, OrderFilter, OrderRepository, RepoError, UserRepository,
};
use shared::error::ErrorCode;
use shared::models::{
    AdminSignupRequest, MenuCategory, MenuItemCreate, OrderCreate, OrderLineInput, OrderStatus,
    PaymentStatus, SignupRequest,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

struct TestEnv {
    db: Surreal<Db>,
    menu: MenuItemRepository,
    orders: OrderRepository,
    users: UserRepository,
}

async fn env() -> TestEnv {
    let db = db::open_in_memory().await.expect("in-memory db");
    TestEnv {
        menu: MenuItemRepository::new(db.clone()),
        orders: OrderRepository::new(db.clone()),
        users: UserRepository::new(db.clone()),
        db,
    }
}

fn menu_payload(name: &str, price: f64) -> MenuItemCreate {
    MenuItemCreate {
        name: name.to_string(),
        description: String::new(),
        category: MenuCategory::Snacks,
        price: Some(price),
        available: None,
        is_special: false,
        ..Default::default()
    }
}

fn signup(name: &str, phone: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        phone: phone.to_string(),
        password: "secret123".to_string(),
        email: None,
        department: Some("Mechanical".to_string()),
        room_number: Some("B-204".to_string()),
    }
}

async fn seed_user(env: &TestEnv) -> String {
    env.users
        .create(signup("Prof. Rao", "9876543210"))
        .await
        .expect("user")
        .id
        .expect("id")
}

async fn seed_item(env: &TestEnv, name: &str, price: f64) -> String {
    env.menu
        .create(menu_payload(name, price), format!("{}.jpg", name))
        .await
        .expect("item")
        .id
        .expect("id")
}

fn domain_code(err: RepoError) -> ErrorCode {
    match err {
        RepoError::Domain(app) => app.code,
        other => panic!("expected domain error, got {:?}", other),
    }
}

#[tokio::test]
async fn order_is_priced_from_the_catalog() {
    let env = env().await;
    let user = seed_user(&env).await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;
    let tea = seed_item(&env, "Tea", 5.0).await;

    let order = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![
                    OrderLineInput {
                        menu_item_id: samosa.clone(),
                        quantity: 3,
                    },
                    OrderLineInput {
                        menu_item_id: tea,
                        quantity: 2,
                    },
                ],
                total_amount: Some(40.0),
                payment_method: None,
                room_number: Some("B-204".to_string()),
                special_instructions: None,
            },
        )
        .await
        .expect("order");

    assert_eq!(order.total_amount, 40.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.items.len(), 2);
    // Snapshot comes from the catalog, not the client
    let line = order.items.iter().find(|l| l.menu_item == samosa).unwrap();
    assert_eq!(line.name, "Samosa");
    assert_eq!(line.price, 10.0);
    // The owning user is joined back onto the read
    assert_eq!(order.user_info.as_ref().unwrap().name, "Prof. Rao");
}

#[tokio::test]
async fn order_creation_rejections() {
    let env = env().await;
    let user = seed_user(&env).await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;

    // Empty cart
    let err = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::EmptyOrder);

    // Zero quantity
    let err = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: samosa.clone(),
                    quantity: 0,
                }],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::InvalidQuantity);

    // Unknown item
    let err = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: "nonexistent".to_string(),
                    quantity: 1,
                }],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::MenuItemNotFound);

    // Tampered total
    let err = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: samosa.clone(),
                    quantity: 2,
                }],
                total_amount: Some(1.0),
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::OrderTotalMismatch);

    // Unavailable item
    env.menu
        .set_availability(&samosa, false)
        .await
        .expect("toggle");
    let err = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: samosa,
                    quantity: 1,
                }],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::MenuItemUnavailable);
}

#[tokio::test]
async fn order_requires_an_existing_active_user() {
    let env = env().await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;

    let cart = OrderCreate {
        items: vec![OrderLineInput {
            menu_item_id: samosa,
            quantity: 1,
        }],
        total_amount: None,
        payment_method: None,
        room_number: None,
        special_instructions: None,
    };

    // A 30-day token can outlive its account
    let err = env.orders.create("ghost", cart.clone()).await.unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::UserNotFound);

    let user = seed_user(&env).await;
    env.db
        .query("UPDATE type::thing('user', $key) SET isActive = false")
        .bind(("key", user.clone()))
        .await
        .expect("deactivate")
        .check()
        .expect("deactivate");
    let err = env.orders.create(&user, cart).await.unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::AccountDisabled);
}

#[tokio::test]
async fn order_lines_are_immune_to_catalog_edits() {
    let env = env().await;
    let user = seed_user(&env).await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;
    let tea = seed_item(&env, "Tea", 5.0).await;

    let order = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![
                    OrderLineInput {
                        menu_item_id: samosa.clone(),
                        quantity: 2,
                    },
                    OrderLineInput {
                        menu_item_id: tea.clone(),
                        quantity: 1,
                    },
                ],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .expect("order");
    let id = order.id.expect("id");

    // Reprice one item, delete the other
    env.menu
        .update(
            &samosa,
            shared::models::MenuItemUpdate {
                name: Some("Jumbo Samosa".to_string()),
                price: Some(25.0),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    env.menu.delete(&tea).await.expect("delete");

    let order = env
        .orders
        .find_by_id(&id)
        .await
        .expect("find")
        .expect("order");
    assert_eq!(order.total_amount, 25.0);
    let line = order.items.iter().find(|l| l.menu_item == samosa).unwrap();
    assert_eq!(line.name, "Samosa");
    assert_eq!(line.price, 10.0);
    let line = order.items.iter().find(|l| l.menu_item == tea).unwrap();
    assert_eq!(line.name, "Tea");
    assert_eq!(line.price, 5.0);
    // Only the display-time image projection follows the catalog
    assert_eq!(line.image, None);
}

#[tokio::test]
async fn status_machine_is_forward_only() {
    let env = env().await;
    let user = seed_user(&env).await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;

    let order = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: samosa,
                    quantity: 1,
                }],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .expect("order");
    let id = order.id.expect("id");

    // Skipping ahead is fine
    let order = env
        .orders
        .update_status(&id, OrderStatus::Preparing)
        .await
        .expect("preparing");
    assert_eq!(order.status, OrderStatus::Preparing);

    // Backward is not
    let err = env
        .orders
        .update_status(&id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::InvalidStatusTransition);

    // Delivery settles the cash payment
    let order = env
        .orders
        .update_status(&id, OrderStatus::Delivered)
        .await
        .expect("delivered");
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    // Terminal states are locked, even against cancellation
    let err = env
        .orders
        .update_status(&id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::InvalidStatusTransition);
}

#[tokio::test]
async fn user_filter_and_recent_feed() {
    let env = env().await;
    let rao = seed_user(&env).await;
    let iyer = env
        .users
        .create(signup("Prof. Iyer", "9123456780"))
        .await
        .expect("user")
        .id
        .expect("id");
    let samosa = seed_item(&env, "Samosa", 10.0).await;

    let place = |user: String, qty: u32| {
        let orders = env.orders.clone();
        let samosa = samosa.clone();
        async move {
            orders
                .create(
                    &user,
                    OrderCreate {
                        items: vec![OrderLineInput {
                            menu_item_id: samosa,
                            quantity: qty,
                        }],
                        total_amount: None,
                        payment_method: None,
                        room_number: None,
                        special_instructions: None,
                    },
                )
                .await
                .expect("order")
        }
    };

    place(rao.clone(), 1).await;
    place(rao.clone(), 2).await;
    let cancelled = place(iyer.clone(), 3).await;
    env.orders
        .update_status(&cancelled.id.expect("id"), OrderStatus::Cancelled)
        .await
        .expect("cancel");

    let rao_orders = env
        .orders
        .find(&OrderFilter {
            user: Some(rao.clone()),
            ..Default::default()
        })
        .await
        .expect("find");
    assert_eq!(rao_orders.len(), 2);
    assert!(rao_orders.iter().all(|o| o.user == rao));

    // The feed is scoped to its user and never shows cancelled orders
    let recent = env
        .orders
        .find_recent(Some(&rao), 5)
        .await
        .expect("recent");
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|o| o.user == rao));
    let recent = env
        .orders
        .find_recent(Some(&iyer), 5)
        .await
        .expect("recent");
    assert!(recent.is_empty(), "Iyer's only order was cancelled");

    // The unscoped feed is the admin dashboard view
    let recent = env.orders.find_recent(None, 5).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|o| o.status != OrderStatus::Cancelled));

    // Status filter
    let pending = env
        .orders
        .find(&OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        })
        .await
        .expect("find");
    assert_eq!(pending.len(), 2);
}

#[tokio::test]
async fn stats_count_today_and_exclude_cancelled_revenue() {
    let env = env().await;
    let user = seed_user(&env).await;
    let samosa = seed_item(&env, "Samosa", 10.0).await;

    for qty in [1, 2] {
        env.orders
            .create(
                &user,
                OrderCreate {
                    items: vec![OrderLineInput {
                        menu_item_id: samosa.clone(),
                        quantity: qty,
                    }],
                    total_amount: None,
                    payment_method: None,
                    room_number: None,
                    special_instructions: None,
                },
            )
            .await
            .expect("order");
    }
    let cancelled = env
        .orders
        .create(
            &user,
            OrderCreate {
                items: vec![OrderLineInput {
                    menu_item_id: samosa.clone(),
                    quantity: 10,
                }],
                total_amount: None,
                payment_method: None,
                room_number: None,
                special_instructions: None,
            },
        )
        .await
        .expect("order");
    env.orders
        .update_status(&cancelled.id.expect("id"), OrderStatus::Cancelled)
        .await
        .expect("cancel");

    let now = chrono::Utc::now().timestamp_millis();
    let today = (now - 60_000, now + 60_000);

    let stats = env.orders.stats(today).await.expect("stats");
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.today_orders, 3);
    assert_eq!(stats.pending_orders, 2, "cancelled leaves the queue");
    assert_eq!(stats.total_revenue, 30.0, "cancelled revenue excluded");
    assert_eq!(stats.today_revenue, 30.0);

    let count = env
        .orders
        .count_between(today.0, today.1)
        .await
        .expect("count");
    assert_eq!(count, 3, "today-count includes cancelled orders");

    // Range excludes orders outside the window
    let earlier = env
        .orders
        .count_between(now - 120_000, now - 61_000)
        .await
        .expect("count");
    assert_eq!(earlier, 0);
}

#[tokio::test]
async fn signup_rules_and_admin_cap() {
    let env = env().await;

    env.users
        .create(signup("Prof. Rao", "9876543210"))
        .await
        .expect("first signup");

    // Duplicate phone
    let err = env
        .users
        .create(signup("Imposter", "9876543210"))
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::PhoneExists);

    // Wrong password fails, right one succeeds
    assert!(env.users.authenticate("9876543210", "wrong").await.is_err());
    let user = env
        .users
        .authenticate("9876543210", "secret123")
        .await
        .expect("login");
    assert_eq!(user.name, "Prof. Rao");

    // Admin registration closes after two accounts
    let admins = AdminRepository::new(env.db.clone());
    for i in 0..2 {
        admins
            .create(AdminSignupRequest {
                name: format!("Admin {}", i),
                email: format!("admin{}@canteen.test", i),
                password: "secret123".to_string(),
            })
            .await
            .expect("admin signup");
    }
    let err = admins
        .create(AdminSignupRequest {
            name: "Third".to_string(),
            email: "third@canteen.test".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::AdminLimitReached);

    // Disabled admin accounts cannot log in
    admins
        .authenticate("admin0@canteen.test", "secret123")
        .await
        .expect("login");
    env.db
        .query("UPDATE admin SET isActive = false WHERE email = $email")
        .bind(("email", "admin0@canteen.test"))
        .await
        .expect("deactivate")
        .check()
        .expect("deactivate");
    let err = admins
        .authenticate("admin0@canteen.test", "secret123")
        .await
        .unwrap_err();
    assert_eq!(domain_code(err), ErrorCode::AccountDisabled);
}
