use crate::models::DbShift;
use chrono::NaiveDate;
use eyre::Result;
use slotwise_core::models::shift::Shift;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn create_shift(conn: &mut PgConnection, shift: &Shift) -> Result<DbShift> {
    tracing::debug!(
        "Creating shift: id={}, staff_id={}, work_date={}",
        shift.id, shift.staff_id, shift.work_date
    );

    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        INSERT INTO shifts (id, staff_id, clinic_id, work_date, start_time, end_time,
                            break_start, break_end, overnight, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, staff_id, clinic_id, work_date, start_time, end_time,
                  break_start, break_end, overnight, notes, created_at
        "#,
    )
    .bind(shift.id)
    .bind(shift.staff_id)
    .bind(shift.clinic_id)
    .bind(shift.work_date)
    .bind(shift.start_time)
    .bind(shift.end_time)
    .bind(shift.break_start)
    .bind(shift.break_end)
    .bind(shift.overnight)
    .bind(&shift.notes)
    .bind(shift.created_at)
    .fetch_one(conn)
    .await?;

    Ok(shift)
}

pub async fn get_shift_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbShift>> {
    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, staff_id, clinic_id, work_date, start_time, end_time,
               break_start, break_end, overnight, notes, created_at
        FROM shifts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(shift)
}

pub async fn find_shift(
    conn: &mut PgConnection,
    staff_id: Uuid,
    clinic_id: Uuid,
    work_date: NaiveDate,
) -> Result<Option<DbShift>> {
    let shift = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, staff_id, clinic_id, work_date, start_time, end_time,
               break_start, break_end, overnight, notes, created_at
        FROM shifts
        WHERE staff_id = $1 AND clinic_id = $2 AND work_date = $3
        "#,
    )
    .bind(staff_id)
    .bind(clinic_id)
    .bind(work_date)
    .fetch_optional(conn)
    .await?;

    Ok(shift)
}

pub async fn get_staff_shifts_between(
    conn: &mut PgConnection,
    staff_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbShift>> {
    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, staff_id, clinic_id, work_date, start_time, end_time,
               break_start, break_end, overnight, notes, created_at
        FROM shifts
        WHERE staff_id = $1 AND work_date BETWEEN $2 AND $3
        ORDER BY work_date ASC, start_time ASC
        "#,
    )
    .bind(staff_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await?;

    Ok(shifts)
}

pub async fn get_clinic_shifts_between(
    conn: &mut PgConnection,
    clinic_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbShift>> {
    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, staff_id, clinic_id, work_date, start_time, end_time,
               break_start, break_end, overnight, notes, created_at
        FROM shifts
        WHERE clinic_id = $1 AND work_date BETWEEN $2 AND $3
        ORDER BY work_date ASC, start_time ASC
        "#,
    )
    .bind(clinic_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await?;

    Ok(shifts)
}

/// Deletes the shift; its slots go with it.
pub async fn delete_shift(conn: &mut PgConnection, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM shifts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}
