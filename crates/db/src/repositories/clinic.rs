use crate::models::DbOperatingHours;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn get_operating_hours(
    conn: &mut PgConnection,
    clinic_id: Uuid,
    day_of_week: i16,
) -> Result<Option<DbOperatingHours>> {
    let hours = sqlx::query_as::<_, DbOperatingHours>(
        r#"
        SELECT clinic_id, day_of_week, open_time, close_time, is_closed
        FROM clinic_hours
        WHERE clinic_id = $1 AND day_of_week = $2
        "#,
    )
    .bind(clinic_id)
    .bind(day_of_week)
    .fetch_optional(conn)
    .await?;

    Ok(hours)
}
