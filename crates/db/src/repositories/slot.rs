use crate::models::DbSlot;
use eyre::Result;
use slotwise_core::models::shift::{Slot, SlotStatus};
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn create_slot(conn: &mut PgConnection, slot: &Slot) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO slots (id, shift_id, staff_id, clinic_id, slot_date, start_time, end_time, status, version)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(slot.id)
    .bind(slot.shift_id)
    .bind(slot.staff_id)
    .bind(slot.clinic_id)
    .bind(slot.slot_date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.status.as_str())
    .bind(slot.version)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_slot_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, shift_id, staff_id, clinic_id, slot_date, start_time, end_time, status, version
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_shift_ids(conn: &mut PgConnection, shift_ids: &[Uuid]) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, shift_id, staff_id, clinic_id, slot_date, start_time, end_time, status, version
        FROM slots
        WHERE shift_id = ANY($1)
        ORDER BY slot_date ASC, start_time ASC
        "#,
    )
    .bind(shift_ids)
    .fetch_all(conn)
    .await?;

    Ok(slots)
}

/// Locks every slot of the shift and returns their statuses.
pub async fn lock_shift_slots(conn: &mut PgConnection, shift_id: Uuid) -> Result<Vec<String>> {
    let statuses = sqlx::query_scalar::<_, String>(
        r#"
        SELECT status
        FROM slots
        WHERE shift_id = $1
        FOR UPDATE
        "#,
    )
    .bind(shift_id)
    .fetch_all(conn)
    .await?;

    Ok(statuses)
}

/// Moves a slot from `from` to `to` if it is still at `expected_version`.
/// Returns `None` when another transaction got there first.
pub async fn transition_slot(
    conn: &mut PgConnection,
    id: Uuid,
    expected_version: i64,
    from: SlotStatus,
    to: SlotStatus,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET status = $4, version = version + 1
        WHERE id = $1 AND version = $2 AND status = $3
        RETURNING id, shift_id, staff_id, clinic_id, slot_date, start_time, end_time, status, version
        "#,
    )
    .bind(id)
    .bind(expected_version)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(conn)
    .await?;

    Ok(slot)
}
