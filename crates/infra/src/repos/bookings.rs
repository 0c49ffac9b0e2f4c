use chrono::NaiveDate;
use sqlx::{Postgres, Result as SqlxResult, Transaction};
use uuid::Uuid;

use crate::{db::Db, models::BookingRow, pagination::LimitOffset};

const BOOKING_COLUMNS: &str = "id, turf_id, player_id, created_by, booked_on, start_minute, \
     end_minute, kind, plan, amount_cents, advance_cents, remaining_cents, status, notes, \
     created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub turf_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub turf_id: Uuid,
    pub player_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub booked_on: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub kind: String,
    pub plan: String,
    pub amount_cents: i64,
    pub advance_cents: i64,
    pub status: String,
    pub notes: Option<String>,
}

/// Outcome of a status transition.
#[derive(Debug)]
pub enum StatusChange {
    Updated(BookingRow),
    NotFound,
    Illegal { from: String },
}

/// Outcome of the transactional slot claim.
#[derive(Debug)]
pub enum BookingAttempt {
    Created(BookingRow),
    TurfNotFound,
    OutsideOpenHours { open_hour: i32, close_hour: i32 },
    SlotTaken,
    MonthlyLimitReached { current: i64, max: i64 },
}

#[derive(Clone)]
pub struct BookingRepo {
    pool: Db,
}

impl BookingRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Claim a slot. The turf row is locked `FOR UPDATE` before the overlap
    /// check so two concurrent claims for the same turf serialize; the
    /// check, the insert and any counter/notification writes commit or
    /// roll back together. `max_bookings_per_month: None` means the
    /// owner's plan does not cap bookings.
    pub async fn create_gated(
        &self,
        data: CreateBooking,
        max_bookings_per_month: Option<i64>,
    ) -> SqlxResult<BookingAttempt> {
        let mut tx = self.pool.begin().await?;

        let turf: Option<(Uuid, i32, i32)> = sqlx::query_as(
            "SELECT owner_id, open_hour, close_hour FROM turfs WHERE id = $1 FOR UPDATE",
        )
        .bind(data.turf_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((owner_id, open_hour, close_hour)) = turf else {
            tx.rollback().await?;
            return Ok(BookingAttempt::TurfNotFound);
        };

        if data.start_minute < open_hour * 60 || data.end_minute > close_hour * 60 {
            tx.rollback().await?;
            return Ok(BookingAttempt::OutsideOpenHours {
                open_hour,
                close_hour,
            });
        }

        if let Some(max) = max_bookings_per_month {
            // The cap spans every turf the owner has, so the count must
            // serialize on the owner row, not the turf row already held.
            sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;

            let current: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM bookings b
                JOIN turfs t ON t.id = b.turf_id
                WHERE t.owner_id = $1
                  AND b.status <> 'cancelled'
                  AND date_trunc('month', b.booked_on) = date_trunc('month', $2::date)
                "#,
            )
            .bind(owner_id)
            .bind(data.booked_on)
            .fetch_one(&mut *tx)
            .await?;

            if current >= max {
                tx.rollback().await?;
                return Ok(BookingAttempt::MonthlyLimitReached { current, max });
            }
        }

        let clash: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE turf_id = $1
                  AND booked_on = $2
                  AND status <> 'cancelled'
                  AND start_minute < $4
                  AND $3 < end_minute
            )
            "#,
        )
        .bind(data.turf_id)
        .bind(data.booked_on)
        .bind(data.start_minute)
        .bind(data.end_minute)
        .fetch_one(&mut *tx)
        .await?;

        if clash {
            tx.rollback().await?;
            return Ok(BookingAttempt::SlotTaken);
        }

        let remaining = data.amount_cents - data.advance_cents;
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (turf_id, player_id, created_by, booked_on, start_minute,
                                  end_minute, kind, plan, amount_cents, advance_cents,
                                  remaining_cents, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(data.turf_id)
        .bind(data.player_id)
        .bind(data.created_by)
        .bind(data.booked_on)
        .bind(data.start_minute)
        .bind(data.end_minute)
        .bind(&data.kind)
        .bind(&data.plan)
        .bind(data.amount_cents)
        .bind(data.advance_cents)
        .bind(remaining)
        .bind(&data.status)
        .bind(data.notes)
        .fetch_one(&mut *tx)
        .await?;

        if row.status == "confirmed" {
            if let Some(player_id) = row.player_id {
                bump_player_counters(&mut tx, player_id, 1, row.amount_cents).await?;
            }
        }

        notify(
            &mut tx,
            owner_id,
            "New booking",
            &format!(
                "{} booking on {} ({:02}:{:02}-{:02}:{:02})",
                row.kind,
                row.booked_on,
                row.start_minute / 60,
                row.start_minute % 60,
                row.end_minute / 60,
                row.end_minute % 60
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(BookingAttempt::Created(row))
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<BookingRow>> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(
        &self,
        filter: BookingFilter,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<BookingRow>> {
        let p = page.unwrap_or_default();

        sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            SELECT b.{cols}
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE ($1::uuid IS NULL OR b.turf_id = $1)
              AND ($2::uuid IS NULL OR t.owner_id = $2)
              AND ($3::uuid IS NULL OR b.player_id = $3)
              AND ($4::text IS NULL OR b.status = $4)
              AND ($5::date IS NULL OR b.booked_on >= $5)
              AND ($6::date IS NULL OR b.booked_on <= $6)
            ORDER BY b.booked_on DESC, b.start_minute DESC
            LIMIT $7 OFFSET $8
            "#,
            cols = BOOKING_COLUMNS.replace(", ", ", b.")
        ))
        .bind(filter.turf_id)
        .bind(filter.owner_id)
        .bind(filter.player_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(p.limit)
        .bind(p.offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Non-cancelled bookings across an owner's turfs in the calendar
    /// month containing `date`.
    pub async fn count_month_for_owner(
        &self,
        owner_id: Uuid,
        date: NaiveDate,
    ) -> SqlxResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
              AND b.status <> 'cancelled'
              AND date_trunc('month', b.booked_on) = date_trunc('month', $2::date)
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
    }

    /// Taken minute ranges for one turf and day, cancelled bookings excluded.
    pub async fn taken_ranges(
        &self,
        turf_id: Uuid,
        date: NaiveDate,
    ) -> SqlxResult<Vec<(i32, i32)>> {
        sqlx::query_as(
            r#"
            SELECT start_minute, end_minute
            FROM bookings
            WHERE turf_id = $1 AND booked_on = $2 AND status <> 'cancelled'
            ORDER BY start_minute
            "#,
        )
        .bind(turf_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    /// Apply a status transition; the legality check, player counters and
    /// the owner notification all ride the same transaction as the update.
    pub async fn set_status(&self, id: Uuid, new_status: &str) -> SqlxResult<StatusChange> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(StatusChange::NotFound);
        };

        if !is_legal_transition(&current.status, new_status) {
            tx.rollback().await?;
            return Ok(StatusChange::Illegal { from: current.status });
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(player_id) = row.player_id {
            match (current.status.as_str(), new_status) {
                ("pending", "confirmed") => {
                    bump_player_counters(&mut tx, player_id, 1, row.amount_cents).await?;
                }
                ("confirmed", "cancelled") => {
                    bump_player_counters(&mut tx, player_id, -1, -row.amount_cents).await?;
                }
                _ => {}
            }
        }

        if new_status == "cancelled" {
            let owner_id: Uuid =
                sqlx::query_scalar("SELECT owner_id FROM turfs WHERE id = $1")
                    .bind(row.turf_id)
                    .fetch_one(&mut *tx)
                    .await?;
            notify(
                &mut tx,
                owner_id,
                "Booking cancelled",
                &format!("Booking on {} was cancelled", row.booked_on),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(StatusChange::Updated(row))
    }

    /// Edit the payment fields. A confirmed booking has already pushed its
    /// amount into the player's spend counter, so an amount edit moves the
    /// counter by the delta in the same transaction.
    pub async fn update_payment(
        &self,
        id: Uuid,
        amount_cents: Option<i64>,
        advance_cents: Option<i64>,
        notes: Option<String>,
    ) -> SqlxResult<Option<BookingRow>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET amount_cents = COALESCE($2, amount_cents),
                advance_cents = COALESCE($3, advance_cents),
                remaining_cents = COALESCE($2, amount_cents) - COALESCE($3, advance_cents),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(amount_cents)
        .bind(advance_cents)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        if current.status == "confirmed" {
            if let Some(player_id) = current.player_id {
                let delta = row.amount_cents - current.amount_cents;
                if delta != 0 {
                    bump_player_counters(&mut tx, player_id, 0, delta).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(Some(row))
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// The only transitions the API accepts; everything else is a 400.
pub fn is_legal_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        ("pending", "confirmed") | ("pending", "cancelled") | ("confirmed", "cancelled")
    )
}

async fn bump_player_counters(
    tx: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
    bookings_delta: i32,
    spent_delta_cents: i64,
) -> SqlxResult<()> {
    sqlx::query(
        r#"
        UPDATE players
        SET total_bookings = total_bookings + $2,
            total_spent_cents = total_spent_cents + $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(player_id)
    .bind(bookings_delta)
    .bind(spent_delta_cents)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn notify(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    title: &str,
    body: &str,
) -> SqlxResult<()> {
    sqlx::query("INSERT INTO notifications (user_id, title, body) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(title)
        .bind(body)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        assert!(is_legal_transition("pending", "confirmed"));
        assert!(is_legal_transition("pending", "cancelled"));
        assert!(is_legal_transition("confirmed", "cancelled"));
        assert!(!is_legal_transition("confirmed", "pending"));
        assert!(!is_legal_transition("cancelled", "confirmed"));
        assert!(!is_legal_transition("pending", "pending"));
    }
}
