use crate::models::DbReservation;
use chrono::Utc;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

/// Inserts a reservation unless the slot already carries one, in which case
/// `None` is returned.
pub async fn create_reservation(
    conn: &mut PgConnection,
    slot_id: Uuid,
    booking_id: Uuid,
    service_item_id: Uuid,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations (id, slot_id, booking_id, service_item_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (slot_id) DO NOTHING
        RETURNING id, slot_id, booking_id, service_item_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(slot_id)
    .bind(booking_id)
    .bind(service_item_id)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;

    Ok(reservation)
}

pub async fn delete_reservation_by_slot(conn: &mut PgConnection, slot_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM reservations
        WHERE slot_id = $1
        "#,
    )
    .bind(slot_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_reservations_by_slot_ids(conn: &mut PgConnection, slot_ids: &[Uuid]) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, slot_id, booking_id, service_item_id, created_at
        FROM reservations
        WHERE slot_id = ANY($1)
        "#,
    )
    .bind(slot_ids)
    .fetch_all(conn)
    .await?;

    Ok(reservations)
}

pub async fn count_booking_reservations(conn: &mut PgConnection, booking_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservations
        WHERE booking_id = $1
        "#,
    )
    .bind(booking_id)
    .fetch_one(conn)
    .await?;

    Ok(count)
}
