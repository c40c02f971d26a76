pub mod customer_repo;
pub mod order_repo;
pub mod outlet_repo;
pub mod payment_method_repo;
pub mod perfume_repo;
pub mod report_repo;
pub mod service_repo;
pub mod user_repo;
