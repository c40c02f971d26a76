use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// Order lifecycle. Transitions only ever move forward; history rows are
/// appended per transition and never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "on-process")]
    OnProcess,
    #[serde(rename = "waiting-pickup")]
    WaitingPickup,
    #[serde(rename = "complete")]
    Complete,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Accepted,
        OrderStatus::OnProcess,
        OrderStatus::WaitingPickup,
        OrderStatus::Complete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Accepted => "accepted",
            OrderStatus::OnProcess => "on-process",
            OrderStatus::WaitingPickup => "waiting-pickup",
            OrderStatus::Complete => "complete",
        }
    }

    fn rank(self) -> u8 {
        match self {
            OrderStatus::Accepted => 0,
            OrderStatus::OnProcess => 1,
            OrderStatus::WaitingPickup => 2,
            OrderStatus::Complete => 3,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Outlet {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::outlets::Model> for Outlet {
    fn from(model: entity::outlets::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            address: model.address,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::customers::Model> for Customer {
    fn from(model: entity::customers::Model) -> Self {
        Self {
            id: model.id,
            outlet_id: model.outlet_id,
            name: model.name,
            phone_number: model.phone_number,
            address: model.address,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::service_categories::Model> for ServiceCategory {
    fn from(model: entity::service_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: i64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::services::Model> for Service {
    fn from(model: entity::services::Model) -> Self {
        Self {
            id: model.id,
            outlet_id: model.outlet_id,
            category_id: model.category_id,
            name: model.name,
            price: model.price,
            unit: model.unit,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceWithCategory {
    #[serde(flatten)]
    pub service: Service,
    pub category: Option<ServiceCategory>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Perfume {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::perfumes::Model> for Perfume {
    fn from(model: entity::perfumes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::payment_methods::Model> for PaymentMethod {
    fn from(model: entity::payment_methods::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub customer_id: Uuid,
    pub perfume_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub invoice_number: String,
    pub status: String,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            outlet_id: model.outlet_id,
            customer_id: model.customer_id,
            perfume_id: model.perfume_id,
            payment_method_id: model.payment_method_id,
            invoice_number: model.invoice_number,
            status: model.status,
            total_amount: model.total_amount,
            notes: model.notes,
            paid_at: model.paid_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub service_id: Uuid,
    pub qty: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entity::order_details::Model> for OrderDetail {
    fn from(model: entity::order_details::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            service_id: model.service_id,
            qty: model.qty,
            price: model.price,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusHistory {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::order_status_history::Model> for OrderStatusHistory {
    fn from(model: entity::order_status_history::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// List row: the order plus the customer it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<Customer>,
}

/// Fully-associated order aggregate returned by single-order lookups.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderFull {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<Customer>,
    pub details: Vec<OrderDetail>,
    pub status_history: Vec<OrderStatusHistory>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderSummary {
    pub accepted: i64,
    pub on_process: i64,
    pub complete: i64,
    pub rev_yesterday: i64,
    pub rev_today: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrendPoint {
    pub date: String,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustomerSummary {
    pub total: i64,
    pub new_today: i64,
    pub new_this_month: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serde_uses_hyphenated_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::WaitingPickup).unwrap(),
            "\"waiting-pickup\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"on-process\"").unwrap(),
            OrderStatus::OnProcess
        );
    }

    #[test]
    fn transitions_only_move_forward() {
        use OrderStatus::*;

        assert!(Accepted.can_transition_to(OnProcess));
        assert!(Accepted.can_transition_to(Complete));
        assert!(OnProcess.can_transition_to(WaitingPickup));
        assert!(WaitingPickup.can_transition_to(Complete));

        assert!(!Complete.can_transition_to(Accepted));
        assert!(!WaitingPickup.can_transition_to(OnProcess));
        assert!(!Accepted.can_transition_to(Accepted));
    }
}
