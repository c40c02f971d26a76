use laundry_pos_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        outlets::{CreateOutletRequest, UpdateOutletRequest},
        services::{CreateServiceCategoryRequest, CreateServiceRequest, UpdateServiceRequest},
    },
    entity::perfumes::ActiveModel as PerfumeActive,
    error::AppError,
    routes::params::{
        CustomerSummaryQuery, ListCustomerQuery, ListOutletQuery, ListPerfumeQuery,
        ListServiceQuery,
    },
    services::{auth_service, catalog_service, customer_service, outlet_service, report_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Master data CRUD: auth, outlets, customers, services and the lookups
// order entry depends on.
#[tokio::test]
async fn masters_crud_flow() -> anyhow::Result<()> {
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

    // Registration and login.
    unsafe { std::env::set_var("JWT_SECRET", "masters-flow-secret") };
    let registered = auth_service::register_user(
        &state,
        RegisterRequest {
            name: "Owner".into(),
            email: "owner@example.com".into(),
            phone_number: String::new(),
            password: "supersecret".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(registered.email, "owner@example.com");

    let err = auth_service::register_user(
        &state,
        RegisterRequest {
            name: "Copycat".into(),
            email: "owner@example.com".into(),
            phone_number: String::new(),
            password: "supersecret".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "owner@example.com".into(),
            password: "wrongpassword".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "owner@example.com".into(),
            password: "supersecret".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!login.token.is_empty());
    assert_eq!(login.user.id, registered.id);

    // Outlets: explicit codes are uppercased, missing codes are generated.
    let main = outlet_service::create_outlet(
        &state,
        CreateOutletRequest {
            name: "Main Outlet".into(),
            code: Some("main2".into()),
            address: "Jl. Melati 1".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(main.code, "MAIN2");

    let generated = outlet_service::create_outlet(
        &state,
        CreateOutletRequest {
            name: "Second Outlet".into(),
            code: None,
            address: String::new(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(generated.code.len(), 5);
    assert_eq!(generated.code, generated.code.to_uppercase());

    let err = outlet_service::create_outlet(
        &state,
        CreateOutletRequest {
            name: "Another".into(),
            code: Some("MAIN2".into()),
            address: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = outlet_service::create_outlet(
        &state,
        CreateOutletRequest {
            name: String::new(),
            code: None,
            address: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let found = outlet_service::list_outlets(
        &state,
        ListOutletQuery {
            keyword: Some("main2".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(found.paging.as_ref().unwrap().count, 1);

    // Updating one field leaves the others untouched.
    let renamed = outlet_service::update_outlet(
        &state,
        main.id,
        UpdateOutletRequest {
            name: Some("Main Outlet West".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(renamed.name, "Main Outlet West");
    assert_eq!(renamed.code, "MAIN2");
    assert_eq!(renamed.address, "Jl. Melati 1");

    let err = outlet_service::update_outlet(
        &state,
        Uuid::new_v4(),
        UpdateOutletRequest {
            name: Some("Ghost".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Customers.
    let err = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            outlet_id: Uuid::new_v4(),
            name: "Nobody".into(),
            phone_number: "000".into(),
            address: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let customer = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            outlet_id: main.id,
            name: "Budi Santoso".into(),
            phone_number: "0812000111".into(),
            address: Some("Jl. Kenanga 5".into()),
        },
    )
    .await?
    .data
    .unwrap();

    let updated = customer_service::update_customer(
        &state,
        customer.id,
        UpdateCustomerRequest {
            phone_number: Some("0812000999".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.phone_number, "0812000999");
    assert_eq!(updated.name, "Budi Santoso");

    let by_phone = customer_service::list_customers(
        &state,
        ListCustomerQuery {
            keyword: Some("0999".into()),
            outlet_id: Some(main.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_phone.paging.as_ref().unwrap().count, 1);

    // An outlet with customers cannot be removed.
    let err = outlet_service::delete_outlet(&state, main.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let summary = report_service::customer_summary(
        &state,
        CustomerSummaryQuery {
            outlet_id: Some(main.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(summary.total, 1);

    customer_service::delete_customer(&state, customer.id).await?;
    let err = customer_service::delete_customer(&state, customer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Service catalog.
    let category = catalog_service::create_service_category(
        &state,
        CreateServiceCategoryRequest {
            name: "Wash Masters".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let err = catalog_service::create_service_category(
        &state,
        CreateServiceCategoryRequest {
            name: "Wash Masters".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = catalog_service::create_service(
        &state,
        CreateServiceRequest {
            outlet_id: Uuid::new_v4(),
            category_id: category.id,
            name: "Orphan".into(),
            price: 5000,
            unit: "kg".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = catalog_service::create_service(
        &state,
        CreateServiceRequest {
            outlet_id: main.id,
            category_id: Uuid::new_v4(),
            name: "Uncategorized".into(),
            price: 5000,
            unit: "kg".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let service = catalog_service::create_service(
        &state,
        CreateServiceRequest {
            outlet_id: main.id,
            category_id: category.id,
            name: "Wash Regular".into(),
            price: 7000,
            unit: "kg".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let with_category = catalog_service::get_service(&state, service.id)
        .await?
        .data
        .unwrap();
    assert_eq!(with_category.category.as_ref().unwrap().name, "Wash Masters");

    let repriced = catalog_service::update_service(
        &state,
        service.id,
        UpdateServiceRequest {
            price: Some(8000),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(repriced.price, 8000);
    assert_eq!(repriced.name, "Wash Regular");
    assert_eq!(repriced.unit, "kg");

    let listed = catalog_service::list_services(
        &state,
        ListServiceQuery {
            outlet_id: Some(main.id),
            category_id: Some(category.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.paging.as_ref().unwrap().count, 1);

    catalog_service::delete_service(&state, service.id).await?;
    let err = catalog_service::get_service(&state, service.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Perfume lookups.
    let empty = catalog_service::list_perfumes(&state, ListPerfumeQuery::default()).await?;
    assert_eq!(empty.paging.as_ref().unwrap().count, 0);

    let perfume = PerfumeActive {
        id: Set(Uuid::new_v4()),
        name: Set("Lavender Masters".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let fetched = catalog_service::get_perfume(&state, perfume.id).await?.data.unwrap();
    assert_eq!(fetched.name, "Lavender Masters");

    let err = catalog_service::get_perfume(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

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
