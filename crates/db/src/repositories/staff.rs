use crate::models::DbStaff;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn get_staff_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT id, clinic_id, full_name, specialty, active, created_at
        FROM staff
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(staff)
}

/// Every staff member of the clinic, inactive ones included.
pub async fn get_staff_by_clinic(conn: &mut PgConnection, clinic_id: Uuid) -> Result<Vec<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT id, clinic_id, full_name, specialty, active, created_at
        FROM staff
        WHERE clinic_id = $1
        ORDER BY full_name ASC
        "#,
    )
    .bind(clinic_id)
    .fetch_all(conn)
    .await?;

    Ok(staff)
}
