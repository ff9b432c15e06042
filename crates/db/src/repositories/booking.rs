use crate::models::{DbBooking, DbServiceItem, DbStaffBooking};
use chrono::NaiveDate;
use eyre::Result;
use slotwise_core::models::booking::BookingStatus;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn get_booking_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, clinic_id, booking_date, start_time, status, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(booking)
}

/// Status of the booking, with the row locked until the transaction ends.
pub async fn lock_booking_status(conn: &mut PgConnection, id: Uuid) -> Result<Option<String>> {
    let status = sqlx::query_scalar::<_, String>(
        r#"
        SELECT status
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(status)
}

pub async fn get_booking_id_by_item(conn: &mut PgConnection, service_item_id: Uuid) -> Result<Option<Uuid>> {
    let booking_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT booking_id
        FROM service_items
        WHERE id = $1
        "#,
    )
    .bind(service_item_id)
    .fetch_optional(conn)
    .await?;

    Ok(booking_id)
}

pub async fn get_service_items(conn: &mut PgConnection, booking_id: Uuid) -> Result<Vec<DbServiceItem>> {
    let items = sqlx::query_as::<_, DbServiceItem>(
        r#"
        SELECT id, booking_id, service_id, position, price, assigned_staff_id
        FROM service_items
        WHERE booking_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(booking_id)
    .fetch_all(conn)
    .await?;

    Ok(items)
}

pub async fn update_booking_status(conn: &mut PgConnection, id: Uuid, status: BookingStatus) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_assigned_staff(conn: &mut PgConnection, service_item_id: Uuid, staff_id: Option<Uuid>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE service_items
        SET assigned_staff_id = $2
        WHERE id = $1
        "#,
    )
    .bind(service_item_id)
    .bind(staff_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Staff assignments of the clinic's active bookings on `date`.
pub async fn get_staff_bookings(conn: &mut PgConnection, clinic_id: Uuid, date: NaiveDate) -> Result<Vec<DbStaffBooking>> {
    let rows = sqlx::query_as::<_, DbStaffBooking>(
        r#"
        SELECT DISTINCT si.assigned_staff_id AS staff_id, b.id AS booking_id
        FROM service_items si
        JOIN bookings b ON b.id = si.booking_id
        WHERE b.clinic_id = $1
          AND b.booking_date = $2
          AND b.status IN ('PENDING', 'CONFIRMED', 'IN_PROGRESS')
          AND si.assigned_staff_id IS NOT NULL
        "#,
    )
    .bind(clinic_id)
    .bind(date)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}
