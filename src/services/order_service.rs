use chrono::{NaiveDate, Utc};
use sea_orm::TransactionTrait;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::{
    datetime::{day_start, fixed_offset, local_today},
    dto::orders::{CreateOrderRequest, PayOrderRequest, UpdateOrderStatusRequest},
    entity::{customers, orders},
    error::{AppError, AppResult},
    models::{
        Customer, Order, OrderDetail, OrderFull, OrderStatus, OrderStatusHistory,
        OrderWithCustomer,
    },
    repository::customer_repo,
    repository::order_repo::{self, NewOrder, NewOrderDetail, OrderFilter, OrderPatch},
    repository::outlet_repo,
    repository::payment_method_repo,
    repository::perfume_repo,
    repository::service_repo,
    response::{ApiResponse, Attachment, Paging},
    routes::params::{ListOrderQuery, Sort, parse_sort},
    state::AppState,
};

/// Creates the order row, its line items and the initial history entry in
/// one transaction. Any failure rolls the whole thing back.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderFull>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;

    let outlet = match outlet_repo::find_by_id(&txn, payload.outlet_id).await? {
        Some(outlet) => outlet,
        None => return Err(AppError::NotFound("Outlet not found".into())),
    };
    let customer = match customer_repo::find_by_id(&txn, payload.customer_id).await? {
        Some(customer) => customer,
        None => return Err(AppError::NotFound("Customer not found".into())),
    };
    if let Some(perfume_id) = payload.perfume_id {
        if perfume_repo::find_by_id(&txn, perfume_id).await?.is_none() {
            return Err(AppError::NotFound("Perfume not found".into()));
        }
    }

    let service_ids: Vec<Uuid> = payload.details.iter().map(|d| d.service_id).collect();
    let services = service_repo::find_by_ids(&txn, service_ids).await?;
    let price_by_id: HashMap<Uuid, i64> = services.iter().map(|s| (s.id, s.price)).collect();

    // Line items snapshot the service price at order time.
    let mut total_amount: i64 = 0;
    let mut details = Vec::with_capacity(payload.details.len());
    for line in &payload.details {
        let Some(&price) = price_by_id.get(&line.service_id) else {
            return Err(AppError::BadRequest(format!(
                "Service {} not found",
                line.service_id
            )));
        };
        total_amount += price * i64::from(line.qty);
        details.push(NewOrderDetail {
            service_id: line.service_id,
            qty: line.qty,
            price,
        });
    }

    let offset = fixed_offset(state.config.report_tz_offset_hours);
    let today = local_today(offset);
    let seq = order_repo::count_created_since(&txn, outlet.id, day_start(today, offset)).await? + 1;
    let invoice_number = build_invoice_number(today, &outlet.code, seq);

    let order = order_repo::create(
        &txn,
        NewOrder {
            outlet_id: outlet.id,
            customer_id: customer.id,
            perfume_id: payload.perfume_id,
            invoice_number,
            status: OrderStatus::Accepted.as_str().to_string(),
            total_amount,
            notes: payload.notes,
        },
    )
    .await?;

    let inserted = order_repo::insert_details(&txn, order.id, details).await?;
    let history =
        order_repo::insert_status_history(&txn, order.id, OrderStatus::Accepted.as_str()).await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(OrderFull {
        order: Order::from(order),
        customer: Some(Customer::from(customer)),
        details: inserted.into_iter().map(OrderDetail::from).collect(),
        status_history: vec![OrderStatusHistory::from(history)],
    }))
}

pub async fn list_orders(
    state: &AppState,
    query: ListOrderQuery,
) -> AppResult<ApiResponse<Vec<OrderWithCustomer>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();
    let sort = parse_sort(
        query.sort.as_deref(),
        Sort::desc("created_at"),
        order_repo::SORTABLE,
    );

    let filter = OrderFilter {
        outlet_id: query.outlet_id,
        keyword: query.keyword,
        status: query.status,
        paid: query.paid,
    };
    let (rows, total) = order_repo::find_and_count(&state.orm, &filter, &sort, &pagination).await?;

    let items = rows
        .into_iter()
        .map(|(order, customer)| OrderWithCustomer {
            order: Order::from(order),
            customer: customer.map(Customer::from),
        })
        .collect();

    Ok(ApiResponse::ok_paged(
        items,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderFull>> {
    let aggregate = match order_repo::find_full(&state.orm, id).await? {
        Some(aggregate) => aggregate,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    Ok(ApiResponse::ok(order_full_view(aggregate)))
}

pub async fn get_order_by_invoice(
    state: &AppState,
    invoice_number: &str,
) -> AppResult<ApiResponse<OrderFull>> {
    let order = match order_repo::find_by_invoice(&state.orm, invoice_number).await? {
        Some(order) => order,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    let aggregate = match order_repo::find_full(&state.orm, order.id).await? {
        Some(aggregate) => aggregate,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    Ok(ApiResponse::ok(order_full_view(aggregate)))
}

/// Moves the order forward through its lifecycle and appends the history
/// entry in the same transaction.
pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;
    let next: OrderStatus = payload.status.parse().map_err(AppError::BadRequest)?;

    let txn = state.orm.begin().await?;

    let order = match order_repo::find_by_id_for_update(&txn, id).await? {
        Some(order) => order,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    let current: OrderStatus = order
        .status
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;

    if !current.can_transition_to(next) {
        return Err(AppError::UnprocessableEntity(format!(
            "Cannot change status from {current} to {next}"
        )));
    }

    let updated = order_repo::update(
        &txn,
        id,
        OrderPatch {
            status: Some(next.as_str().to_string()),
            ..Default::default()
        },
    )
    .await?;
    order_repo::insert_status_history(&txn, id, next.as_str()).await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(Order::from(updated)))
}

pub async fn pay_order(
    state: &AppState,
    id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let order = match order_repo::find_by_id_for_update(&txn, id).await? {
        Some(order) => order,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    if order.paid_at.is_some() {
        return Err(AppError::Conflict("Order already paid".into()));
    }
    if payment_method_repo::find_by_id(&txn, payload.payment_method_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Payment method not found".into()));
    }

    let updated = order_repo::update(
        &txn,
        id,
        OrderPatch {
            payment_method_id: Some(payload.payment_method_id),
            paid_at: Some(Utc::now().into()),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(Order::from(updated)))
}

pub async fn export_orders_csv(
    state: &AppState,
    query: ListOrderQuery,
) -> AppResult<Attachment> {
    let sort = parse_sort(
        query.sort.as_deref(),
        Sort::desc("created_at"),
        order_repo::SORTABLE,
    );
    let filter = OrderFilter {
        outlet_id: query.outlet_id,
        keyword: query.keyword,
        status: query.status,
        paid: query.paid,
    };
    let rows = order_repo::find_all(&state.orm, &filter, &sort).await?;

    let offset = fixed_offset(state.config.report_tz_offset_hours);
    let filename = format!("orders-{}", local_today(offset).format("%Y%m%d"));
    Ok(Attachment::csv(
        filename,
        render_orders_csv(&rows).into_bytes(),
    ))
}

fn order_full_view(aggregate: order_repo::OrderAggregate) -> OrderFull {
    let (order, customer, details, history) = aggregate;
    OrderFull {
        order: Order::from(order),
        customer: customer.map(Customer::from),
        details: details.into_iter().map(OrderDetail::from).collect(),
        status_history: history.into_iter().map(OrderStatusHistory::from).collect(),
    }
}

fn build_invoice_number(date: NaiveDate, outlet_code: &str, seq: i64) -> String {
    format!("INV/{}/{}/{}", date.format("%Y%m%d"), outlet_code, seq)
}

fn render_orders_csv(rows: &[(orders::Model, Option<customers::Model>)]) -> String {
    let mut out =
        String::from("invoice_number,customer,phone_number,status,total_amount,paid_at,created_at\n");
    for (order, customer) in rows {
        let (name, phone) = customer
            .as_ref()
            .map(|c| (c.name.as_str(), c.phone_number.as_str()))
            .unwrap_or(("", ""));
        let paid_at = order
            .paid_at
            .map(|t| t.with_timezone(&Utc).to_rfc3339())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&order.invoice_number),
            csv_field(name),
            csv_field(phone),
            csv_field(&order.status),
            order.total_amount,
            paid_at,
            order.created_at.with_timezone(&Utc).to_rfc3339(),
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(raw: &str) -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    #[test]
    fn invoice_number_embeds_date_code_and_sequence() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(build_invoice_number(date, "MAIN1", 3), "INV/20240115/MAIN1/3");
    }

    #[test]
    fn csv_fields_escape_delimiters_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn csv_render_includes_header_and_rows() {
        let order = orders::Model {
            id: Uuid::new_v4(),
            outlet_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            perfume_id: None,
            payment_method_id: None,
            invoice_number: "INV/20240115/MAIN1/1".into(),
            status: "accepted".into(),
            total_amount: 25000,
            notes: None,
            paid_at: None,
            created_at: ts("2024-01-15T08:00:00+00:00"),
            updated_at: ts("2024-01-15T08:00:00+00:00"),
        };
        let customer = customers::Model {
            id: order.customer_id,
            outlet_id: order.outlet_id,
            name: "Doe, John".into(),
            phone_number: "0812000111".into(),
            address: None,
            created_at: ts("2024-01-10T08:00:00+00:00"),
            updated_at: ts("2024-01-10T08:00:00+00:00"),
        };

        let csv = render_orders_csv(&[(order, Some(customer))]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "invoice_number,customer,phone_number,status,total_amount,paid_at,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("INV/20240115/MAIN1/1,\"Doe, John\",0812000111,accepted,25000,,"));
        assert!(lines.next().is_none());
    }
}
