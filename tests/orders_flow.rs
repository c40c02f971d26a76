use laundry_pos_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::orders::{CreateOrderDetail, CreateOrderRequest, PayOrderRequest, UpdateOrderStatusRequest},
    entity::{
        customers::ActiveModel as CustomerActive, outlets::ActiveModel as OutletActive,
        payment_methods::ActiveModel as PaymentMethodActive,
        service_categories::ActiveModel as CategoryActive, services::ActiveModel as ServiceActive,
    },
    error::AppError,
    routes::params::{ListOrderQuery, OrderSummaryQuery, OrderTrendQuery, TrendGranularity},
    services::{order_service, report_service},
    state::AppState,
};
use chrono::Days;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Full order lifecycle: create -> pay -> move through statuses, with the
// list filters, reports and CSV export checked along the way.
#[tokio::test]
async fn order_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let outlet_id = create_outlet(&state, "Flow Outlet", "FLOW1").await?;
    let john = create_customer(&state, outlet_id, "John Tanaka", "0812000111").await?;
    let jane = create_customer(&state, outlet_id, "Jane Padma", "0812000222").await?;

    let category_id = create_category(&state, "Wash Flow").await?;
    let wash = create_service(&state, outlet_id, category_id, "Wash Regular", 7000).await?;
    let blanket = create_service(&state, outlet_id, category_id, "Blanket", 15000).await?;
    let cash = create_payment_method(&state, "Cash Flow").await?;

    // First order: 3 kg wash + 1 blanket for John.
    let created = order_service::create_order(
        &state,
        CreateOrderRequest {
            outlet_id,
            customer_id: john,
            perfume_id: None,
            notes: Some("extra softener".into()),
            details: vec![
                CreateOrderDetail {
                    service_id: wash,
                    qty: 3,
                },
                CreateOrderDetail {
                    service_id: blanket,
                    qty: 1,
                },
            ],
        },
    )
    .await?;
    let full = created.data.unwrap();
    assert_eq!(full.order.total_amount, 3 * 7000 + 15000);
    assert_eq!(full.order.status, "accepted");
    assert!(full.order.invoice_number.starts_with("INV/"));
    assert!(full.order.invoice_number.ends_with("/FLOW1/1"));
    assert_eq!(full.details.len(), 2);
    assert_eq!(full.status_history.len(), 1);
    assert_eq!(full.status_history[0].status, "accepted");
    // Line items snapshot the service price.
    let wash_line = full.details.iter().find(|d| d.service_id == wash).unwrap();
    assert_eq!(wash_line.price, 7000);
    let order_id = full.order.id;
    let invoice_number = full.order.invoice_number.clone();

    // Second order for Jane gets the next sequence number for the day.
    let second = order_service::create_order(
        &state,
        CreateOrderRequest {
            outlet_id,
            customer_id: jane,
            perfume_id: None,
            notes: None,
            details: vec![CreateOrderDetail {
                service_id: wash,
                qty: 2,
            }],
        },
    )
    .await?;
    let second_id = second.data.unwrap().order.id;
    let second_invoice = order_service::get_order(&state, second_id)
        .await?
        .data
        .unwrap()
        .order
        .invoice_number;
    assert!(second_invoice.ends_with("/FLOW1/2"));

    // A bad service id rolls the whole order back.
    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            outlet_id,
            customer_id: john,
            perfume_id: None,
            notes: None,
            details: vec![
                CreateOrderDetail {
                    service_id: wash,
                    qty: 1,
                },
                CreateOrderDetail {
                    service_id: Uuid::new_v4(),
                    qty: 1,
                },
            ],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(count_rows(&state, "orders").await?, 2);
    assert_eq!(count_rows(&state, "order_details").await?, 3);
    assert_eq!(count_rows(&state, "order_status_history").await?, 2);

    // Keyword search is case-insensitive and reaches the joined customer.
    let by_name = order_service::list_orders(
        &state,
        ListOrderQuery {
            keyword: Some("john".into()),
            outlet_id: Some(outlet_id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_name.paging.as_ref().unwrap().count, 1);
    assert_eq!(by_name.data.unwrap()[0].order.id, order_id);

    let unpaid = order_service::list_orders(
        &state,
        ListOrderQuery {
            outlet_id: Some(outlet_id),
            paid: Some(false),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(unpaid.paging.as_ref().unwrap().count, 2);

    // Pay the first order.
    let paid = order_service::pay_order(
        &state,
        order_id,
        PayOrderRequest {
            payment_method_id: cash,
        },
    )
    .await?;
    let paid_order = paid.data.unwrap();
    assert!(paid_order.paid_at.is_some());
    assert_eq!(paid_order.status, "accepted");

    // Paying twice is rejected and the bogus method is never applied.
    let err = order_service::pay_order(
        &state,
        order_id,
        PayOrderRequest {
            payment_method_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let paid_only = order_service::list_orders(
        &state,
        ListOrderQuery {
            outlet_id: Some(outlet_id),
            paid: Some(true),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(paid_only.paging.as_ref().unwrap().count, 1);

    // Forward transitions append history; backwards and repeats are refused.
    order_service::update_order_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            status: "on-process".into(),
        },
    )
    .await?;
    order_service::update_order_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            status: "waiting-pickup".into(),
        },
    )
    .await?;

    let err = order_service::update_order_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            status: "accepted".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UnprocessableEntity(_)));

    let err = order_service::update_order_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            status: "waiting-pickup".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UnprocessableEntity(_)));

    let err = order_service::update_order_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            status: "finished".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Status changes must not clobber unrelated columns.
    let after_moves = order_service::get_order(&state, order_id).await?.data.unwrap();
    assert_eq!(after_moves.order.status, "waiting-pickup");
    assert_eq!(after_moves.order.notes.as_deref(), Some("extra softener"));
    assert_eq!(after_moves.order.total_amount, 3 * 7000 + 15000);
    assert!(after_moves.order.paid_at.is_some());
    assert_eq!(after_moves.status_history.len(), 3);
    assert_eq!(after_moves.status_history[2].status, "waiting-pickup");

    // Skipping intermediate statuses is allowed.
    order_service::update_order_status(
        &state,
        second_id,
        UpdateOrderStatusRequest {
            status: "complete".into(),
        },
    )
    .await?;

    // Invoice lookup returns the same order.
    let by_invoice = order_service::get_order_by_invoice(&state, &invoice_number)
        .await?
        .data
        .unwrap();
    assert_eq!(by_invoice.order.id, order_id);

    // Reports over what the flow created.
    let summary = report_service::order_summary(
        &state,
        OrderSummaryQuery {
            outlet_id: Some(outlet_id),
            start: None,
            end: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.on_process, 1);
    assert_eq!(summary.complete, 1);
    assert_eq!(summary.rev_today + summary.rev_yesterday, 3 * 7000 + 15000);

    let today = chrono::Utc::now().date_naive();
    let trend = report_service::order_trend(
        &state,
        OrderTrendQuery {
            outlet_id: Some(outlet_id),
            start: Some(today.checked_sub_days(Days::new(2)).unwrap()),
            end: Some(today),
            granularity: TrendGranularity::Weekly,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(trend.len(), 3);
    let total: i64 = trend.iter().map(|p| p.total).sum();
    assert_eq!(total, 3 * 7000 + 15000);

    // An outlet with no paid orders still gets one bucket per day, all zero.
    let empty_trend = report_service::order_trend(
        &state,
        OrderTrendQuery {
            outlet_id: Some(Uuid::new_v4()),
            start: Some(today.checked_sub_days(Days::new(2)).unwrap()),
            end: Some(today),
            granularity: TrendGranularity::Weekly,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(empty_trend.len(), 3);
    assert!(empty_trend.iter().all(|p| p.total == 0));
    let mut dates: Vec<&str> = empty_trend.iter().map(|p| p.date.as_str()).collect();
    let sorted = dates.clone();
    dates.sort();
    assert_eq!(dates, sorted);

    let err = report_service::order_trend(
        &state,
        OrderTrendQuery {
            outlet_id: None,
            start: None,
            end: Some(today),
            granularity: TrendGranularity::Weekly,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Summary over an outlet with no orders is all zeros, never an error.
    let empty_summary = report_service::order_summary(
        &state,
        OrderSummaryQuery {
            outlet_id: Some(Uuid::new_v4()),
            start: None,
            end: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(empty_summary.accepted, 0);
    assert_eq!(empty_summary.on_process, 0);
    assert_eq!(empty_summary.complete, 0);
    assert_eq!(empty_summary.rev_today, 0);
    assert_eq!(empty_summary.rev_yesterday, 0);

    // CSV export carries every order for the outlet.
    let export = order_service::export_orders_csv(
        &state,
        ListOrderQuery {
            outlet_id: Some(outlet_id),
            ..Default::default()
        },
    )
    .await?;
    assert!(export.filename.starts_with("orders-"));
    let body = String::from_utf8(export.body)?;
    let mut lines = body.lines();
    assert!(lines.next().unwrap().starts_with("invoice_number,"));
    assert_eq!(lines.count(), 2);
    assert!(body.contains(&invoice_number));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(database_url).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_status_history, order_details, orders, services, \
         service_categories, customers, outlets, payment_methods, perfumes, users \
         RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        report_tz_offset_hours: 7,
        shutdown_grace_secs: 5,
    };

    Ok(AppState { pool, orm, config })
}

async fn create_outlet(state: &AppState, name: &str, code: &str) -> anyhow::Result<Uuid> {
    let outlet = OutletActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        code: Set(code.into()),
        address: Set(String::new()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(outlet.id)
}

async fn create_customer(
    state: &AppState,
    outlet_id: Uuid,
    name: &str,
    phone: &str,
) -> anyhow::Result<Uuid> {
    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(outlet_id),
        name: Set(name.into()),
        phone_number: Set(phone.into()),
        address: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(customer.id)
}

async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

async fn create_service(
    state: &AppState,
    outlet_id: Uuid,
    category_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(outlet_id),
        category_id: Set(category_id),
        name: Set(name.into()),
        price: Set(price),
        unit: Set("kg".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(service.id)
}

async fn create_payment_method(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let method = PaymentMethodActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(method.id)
}

async fn count_rows(state: &AppState, table: &str) -> anyhow::Result<i64> {
    let backend = state.orm.get_database_backend();
    let row = state
        .orm
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*)::BIGINT AS n FROM {table}"),
        ))
        .await?
        .ok_or_else(|| anyhow::anyhow!("count query returned no row"))?;
    Ok(row.try_get::<i64>("", "n")?)
}
