pub mod customers;
pub mod order_details;
pub mod order_status_history;
pub mod orders;
pub mod outlets;
pub mod payment_methods;
pub mod perfumes;
pub mod service_categories;
pub mod services;
pub mod users;

pub use customers::Entity as Customers;
pub use order_details::Entity as OrderDetails;
pub use order_status_history::Entity as OrderStatusHistory;
pub use orders::Entity as Orders;
pub use outlets::Entity as Outlets;
pub use payment_methods::Entity as PaymentMethods;
pub use perfumes::Entity as Perfumes;
pub use service_categories::Entity as ServiceCategories;
pub use services::Entity as Services;
pub use users::Entity as Users;
