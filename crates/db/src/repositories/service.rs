use crate::models::DbService;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn get_services_by_ids(conn: &mut PgConnection, ids: &[Uuid]) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, clinic_id, name, category, duration_minutes, price
        FROM services
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    Ok(services)
}
