use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::customers::{Column as CustomerCol, Entity as Customers, Model as CustomerModel};
use crate::entity::order_details::{
    ActiveModel as DetailActive, Column as DetailCol, Entity as OrderDetails, Model as DetailModel,
};
use crate::entity::order_status_history::{
    ActiveModel as HistoryActive, Column as HistoryCol, Entity as OrderStatusHistory,
    Model as HistoryModel,
};
use crate::entity::orders::{ActiveModel, Column, Entity as Orders, Model};
use crate::routes::params::{Pagination, Sort, SortOrder};

pub const SORTABLE: &[&str] = &["created_at", "total_amount", "invoice_number", "status"];

/// Order plus everything hanging off it, as one lookup result.
pub type OrderAggregate = (
    Model,
    Option<CustomerModel>,
    Vec<DetailModel>,
    Vec<HistoryModel>,
);

#[derive(Debug)]
pub struct NewOrder {
    pub outlet_id: Uuid,
    pub customer_id: Uuid,
    pub perfume_id: Option<Uuid>,
    pub invoice_number: String,
    pub status: String,
    pub total_amount: i64,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct NewOrderDetail {
    pub service_id: Uuid,
    pub qty: i32,
    pub price: i64,
}

#[derive(Debug, Default)]
pub struct OrderFilter {
    pub outlet_id: Option<Uuid>,
    pub keyword: Option<String>,
    pub status: Option<String>,
    pub paid: Option<bool>,
}

#[derive(Debug, Default)]
pub struct OrderPatch {
    pub status: Option<String>,
    pub payment_method_id: Option<Uuid>,
    pub paid_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub notes: Option<String>,
}

impl OrderPatch {
    pub fn into_active(self, id: Uuid) -> ActiveModel {
        let mut active = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        if let Some(payment_method_id) = self.payment_method_id {
            active.payment_method_id = Set(Some(payment_method_id));
        }
        if let Some(paid_at) = self.paid_at {
            active.paid_at = Set(Some(paid_at));
        }
        if let Some(notes) = self.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());
        active
    }
}

fn sort_column(field: &str) -> Column {
    match field {
        "total_amount" => Column::TotalAmount,
        "invoice_number" => Column::InvoiceNumber,
        "status" => Column::Status,
        _ => Column::CreatedAt,
    }
}

fn build_condition(filter: &OrderFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(outlet_id) = filter.outlet_id {
        condition = condition.add(Column::OutletId.eq(outlet_id));
    }
    if let Some(status) = filter.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Status.eq(status.clone()));
    }
    if let Some(paid) = filter.paid {
        condition = condition.add(if paid {
            Column::PaidAt.is_not_null()
        } else {
            Column::PaidAt.is_null()
        });
    }
    if let Some(keyword) = filter.keyword.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{keyword}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Orders, Column::InvoiceNumber)).ilike(pattern.clone()))
                .add(Expr::col((Customers, CustomerCol::Name)).ilike(pattern.clone()))
                .add(Expr::col((Customers, CustomerCol::PhoneNumber)).ilike(pattern)),
        );
    }
    condition
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewOrder) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(new.outlet_id),
        customer_id: Set(new.customer_id),
        perfume_id: Set(new.perfume_id),
        payment_method_id: Set(None),
        invoice_number: Set(new.invoice_number),
        status: Set(new.status),
        total_amount: Set(new.total_amount),
        notes: Set(new.notes),
        paid_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn insert_details<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    details: Vec<NewOrderDetail>,
) -> Result<Vec<DetailModel>, DbErr> {
    let mut inserted = Vec::with_capacity(details.len());
    for detail in details {
        let row = DetailActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            service_id: Set(detail.service_id),
            qty: Set(detail.qty),
            price: Set(detail.price),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
        inserted.push(row);
    }
    Ok(inserted)
}

pub async fn insert_status_history<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    status: &str,
) -> Result<HistoryModel, DbErr> {
    HistoryActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        status: Set(status.to_string()),
        created_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_and_count<C: ConnectionTrait>(
    conn: &C,
    filter: &OrderFilter,
    sort: &Sort,
    pagination: &Pagination,
) -> Result<(Vec<(Model, Option<CustomerModel>)>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut finder = Orders::find()
        .find_also_related(Customers)
        .filter(build_condition(filter));
    let column = sort_column(&sort.field);
    finder = match sort.order {
        SortOrder::Asc => finder.order_by_asc(column),
        SortOrder::Desc => finder.order_by_desc(column),
    };

    let total = finder.clone().count(conn).await? as i64;
    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;

    Ok((rows, total))
}

/// Unpaginated variant used by exports.
pub async fn find_all<C: ConnectionTrait>(
    conn: &C,
    filter: &OrderFilter,
    sort: &Sort,
) -> Result<Vec<(Model, Option<CustomerModel>)>, DbErr> {
    let mut finder = Orders::find()
        .find_also_related(Customers)
        .filter(build_condition(filter));
    let column = sort_column(&sort.field);
    finder = match sort.order {
        SortOrder::Asc => finder.order_by_asc(column),
        SortOrder::Desc => finder.order_by_desc(column),
    };
    finder.all(conn).await
}

/// Row-locked lookup for status/payment updates inside a transaction.
pub async fn find_by_id_for_update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<Model>, DbErr> {
    Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(conn)
        .await
}

pub async fn find_by_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_number: &str,
) -> Result<Option<Model>, DbErr> {
    Orders::find()
        .filter(Column::InvoiceNumber.eq(invoice_number))
        .one(conn)
        .await
}

pub async fn find_full<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<OrderAggregate>, DbErr> {
    let Some((order, customer)) = Orders::find_by_id(id)
        .find_also_related(Customers)
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let details = OrderDetails::find()
        .filter(DetailCol::OrderId.eq(id))
        .order_by_asc(DetailCol::CreatedAt)
        .all(conn)
        .await?;

    let history = OrderStatusHistory::find()
        .filter(HistoryCol::OrderId.eq(id))
        .order_by_asc(HistoryCol::CreatedAt)
        .all(conn)
        .await?;

    Ok(Some((order, customer, details, history)))
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    patch: OrderPatch,
) -> Result<Model, DbErr> {
    patch.into_active(id).update(conn).await
}

/// Orders created at or after `since` for one outlet. Drives the daily
/// invoice sequence number.
pub async fn count_created_since<C: ConnectionTrait>(
    conn: &C,
    outlet_id: Uuid,
    since: chrono::DateTime<chrono::FixedOffset>,
) -> Result<i64, DbErr> {
    let total = Orders::find()
        .filter(Column::OutletId.eq(outlet_id))
        .filter(Column::CreatedAt.gte(since))
        .count(conn)
        .await?;
    Ok(total as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_with_status_only_touches_status() {
        let active = OrderPatch {
            status: Some("complete".into()),
            ..Default::default()
        }
        .into_active(Uuid::new_v4());

        assert!(active.status.is_set());
        assert!(active.payment_method_id.is_not_set());
        assert!(active.paid_at.is_not_set());
        assert!(active.notes.is_not_set());
        assert!(active.total_amount.is_not_set());
        assert!(active.invoice_number.is_not_set());
        assert!(active.updated_at.is_set());
    }

    #[test]
    fn empty_filter_builds_no_clauses() {
        let condition = build_condition(&OrderFilter::default());
        assert!(condition.is_empty());
    }

    #[test]
    fn blank_keyword_and_status_are_ignored() {
        let condition = build_condition(&OrderFilter {
            keyword: Some(String::new()),
            status: Some(String::new()),
            ..Default::default()
        });
        assert!(condition.is_empty());
    }
}
