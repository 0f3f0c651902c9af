//! Order repository.
//!
//! Order creation and deletion are the two multi-statement writes in the
//! crate; both run in a transaction so stock and order rows move together.
//! The decrement on create is conditional (`stock >= quantity`), which
//! closes the window between pricing and persisting: a racing order that
//! drained the stock makes the decrement match zero rows, the transaction
//! rolls back, and nothing is written.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use botica_core::{
    Medication, MedicationType, Money, Order, OrderLine, OrderStatus, OwnerSummary, PricedOrder,
    Specialty,
};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct OrderRecord {
    id: i32,
    issued_at: DateTime<Utc>,
    reason: Option<String>,
    status: String,
    total_cents: i64,
    user_id: i32,
    owner_given_name: String,
    owner_family_name: String,
    owner_email: String,
}

impl OrderRecord {
    fn into_order(self, lines: Vec<OrderLine>) -> DbResult<Order> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e| DbError::Internal(format!("order {}: {}", self.id, e)))?;

        Ok(Order {
            id: self.id,
            issued_at: self.issued_at,
            reason: self.reason,
            status,
            total: Money::from_cents(self.total_cents),
            user_id: self.user_id,
            lines,
            owner: Some(OwnerSummary {
                id: self.user_id,
                given_name: self.owner_given_name,
                family_name: self.owner_family_name,
                email: self.owner_email,
            }),
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct LineRecord {
    order_id: i32,
    medication_id: i32,
    description_snapshot: String,
    quantity: i32,
    unit_price_cents: i64,
    subtotal_cents: i64,
    med_description: String,
    med_manufactured_at: Option<DateTime<Utc>>,
    med_expires_at: Option<DateTime<Utc>>,
    med_presentation: Option<String>,
    med_stock: i32,
    med_unit_price_cents: i64,
    med_pack_price_cents: Option<i64>,
    med_type_id: Option<i32>,
    med_brand: Option<String>,
    med_specialty_id: Option<i32>,
    med_created_at: DateTime<Utc>,
    med_type_description: Option<String>,
    med_specialty_description: Option<String>,
}

impl From<LineRecord> for OrderLine {
    fn from(r: LineRecord) -> Self {
        let medication_type = match (r.med_type_id, r.med_type_description) {
            (Some(id), Some(description)) => Some(MedicationType { id, description }),
            _ => None,
        };
        let specialty = match (r.med_specialty_id, r.med_specialty_description) {
            (Some(id), Some(description)) => Some(Specialty { id, description }),
            _ => None,
        };

        OrderLine {
            order_id: r.order_id,
            medication_id: r.medication_id,
            description: r.description_snapshot,
            quantity: r.quantity,
            unit_price: Money::from_cents(r.unit_price_cents),
            subtotal: Money::from_cents(r.subtotal_cents),
            medication: Some(Medication {
                id: r.medication_id,
                description: r.med_description,
                manufactured_at: r.med_manufactured_at,
                expires_at: r.med_expires_at,
                presentation: r.med_presentation,
                stock: r.med_stock,
                unit_price: Money::from_cents(r.med_unit_price_cents),
                pack_price: r.med_pack_price_cents.map(Money::from_cents),
                type_id: r.med_type_id,
                brand: r.med_brand,
                specialty_id: r.med_specialty_id,
                created_at: r.med_created_at,
                medication_type,
                specialty,
            }),
        }
    }
}

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.issued_at, o.reason, o.status, o.total_cents, o.user_id,
           u.given_name AS owner_given_name,
           u.family_name AS owner_family_name,
           u.email AS owner_email
    FROM orders o
    JOIN users u ON u.id = o.user_id
"#;

const LINE_SELECT: &str = r#"
    SELECT l.order_id, l.medication_id, l.description_snapshot, l.quantity,
           l.unit_price_cents, l.subtotal_cents,
           m.description AS med_description,
           m.manufactured_at AS med_manufactured_at,
           m.expires_at AS med_expires_at,
           m.presentation AS med_presentation,
           m.stock AS med_stock,
           m.unit_price_cents AS med_unit_price_cents,
           m.pack_price_cents AS med_pack_price_cents,
           m.type_id AS med_type_id,
           m.brand AS med_brand,
           m.specialty_id AS med_specialty_id,
           m.created_at AS med_created_at,
           t.description AS med_type_description,
           s.description AS med_specialty_description
    FROM order_lines l
    JOIN medications m ON m.id = l.medication_id
    LEFT JOIN medication_types t ON t.id = m.type_id
    LEFT JOIN specialties s ON s.id = m.specialty_id
"#;

/// Repository for sales orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a priced order in one transaction and returns its id.
    ///
    /// Each line inserts its snapshot row and conditionally decrements the
    /// medication's stock. A decrement that matches no row means the stock
    /// moved under us; the whole transaction rolls back with
    /// [`DbError::StockConflict`].
    pub async fn create(
        &self,
        user_id: i32,
        reason: Option<&str>,
        priced: &PricedOrder,
    ) -> DbResult<i32> {
        debug!(user_id, lines = priced.lines.len(), "Creating order");

        let mut tx = self.pool.begin().await?;

        let order_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (issued_at, reason, status, total_cents, user_id)
            VALUES (NOW(), $1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(reason)
        .bind(OrderStatus::Pending.as_str())
        .bind(priced.total.cents())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for line in &priced.lines {
            let decremented = sqlx::query(
                "UPDATE medications SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
            )
            .bind(line.medication_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                // Dropping the transaction rolls it back.
                return Err(DbError::StockConflict {
                    medication_id: line.medication_id,
                    description: line.description.clone(),
                });
            }

            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    order_id, medication_id, description_snapshot,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order_id)
            .bind(line.medication_id)
            .bind(&line.description)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .bind(line.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order_id)
    }

    /// Gets one order with its lines and owner.
    ///
    /// With `owner` set, an order belonging to someone else comes back as
    /// `None`, indistinguishable from a missing order.
    pub async fn get(&self, id: i32, owner: Option<i32>) -> DbResult<Option<Order>> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "{ORDER_SELECT} WHERE o.id = $1 AND ($2::int4 IS NULL OR o.user_id = $2)"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, LineRecord>(&format!(
            "{LINE_SELECT} WHERE l.order_id = $1 ORDER BY l.medication_id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let lines = lines.into_iter().map(OrderLine::from).collect();
        record.into_order(lines).map(Some)
    }

    /// Returns one page of orders (newest first) plus the total count.
    ///
    /// `owner` of `None` means no filter: the admin view.
    pub async fn list(
        &self,
        owner: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Order>, i64)> {
        debug!(?owner, limit, offset, "Listing orders");

        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"{ORDER_SELECT}
            WHERE ($1::int4 IS NULL OR o.user_id = $1)
            ORDER BY o.issued_at DESC LIMIT $2 OFFSET $3"#
        ))
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders o WHERE ($1::int4 IS NULL OR o.user_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let line_records = sqlx::query_as::<_, LineRecord>(&format!(
            "{LINE_SELECT} WHERE l.order_id = ANY($1) ORDER BY l.order_id, l.medication_id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(records.len());
        for record in records {
            let lines = line_records
                .iter()
                .filter(|l| l.order_id == record.id)
                .cloned()
                .map(OrderLine::from)
                .collect();
            orders.push(record.into_order(lines)?);
        }

        Ok((orders, total))
    }

    /// Updates an order's status and/or reason. `None` leaves a column
    /// unchanged.
    pub async fn update(
        &self,
        id: i32,
        status: Option<OrderStatus>,
        reason: Option<&str>,
    ) -> DbResult<()> {
        debug!(id, ?status, "Updating order");

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = COALESCE($2, status),
                reason = COALESCE($3, reason)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(reason)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Deletes an order and restores the stock its lines had consumed, in
    /// one transaction.
    pub async fn delete(&self, id: i32) -> DbResult<()> {
        debug!(id, "Deleting order");

        let mut tx = self.pool.begin().await?;

        let lines: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT medication_id, quantity FROM order_lines WHERE order_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (medication_id, quantity) in lines {
            sqlx::query("UPDATE medications SET stock = stock + $2 WHERE id = $1")
                .bind(medication_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        tx.commit().await?;
        Ok(())
    }
}
