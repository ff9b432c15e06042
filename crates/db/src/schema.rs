use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Weekly opening hours, Monday = 0
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clinic_hours (
            clinic_id UUID NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            PRIMARY KEY (clinic_id, day_of_week)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            clinic_id UUID NOT NULL,
            full_name VARCHAR(255) NOT NULL,
            specialty VARCHAR(32) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            clinic_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            category VARCHAR(32) NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            price NUMERIC(10, 2) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            staff_id UUID NOT NULL REFERENCES staff(id),
            clinic_id UUID NOT NULL,
            work_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            break_start TIME NULL,
            break_end TIME NULL,
            overnight BOOLEAN NOT NULL DEFAULT FALSE,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_shift_per_day UNIQUE (staff_id, clinic_id, work_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shift_id UUID NOT NULL REFERENCES shifts(id) ON DELETE CASCADE,
            staff_id UUID NOT NULL REFERENCES staff(id),
            clinic_id UUID NOT NULL,
            slot_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'AVAILABLE',
            version BIGINT NOT NULL DEFAULT 0,
            CONSTRAINT valid_slot_status CHECK (status IN ('AVAILABLE', 'BOOKED', 'BLOCKED'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            clinic_id UUID NOT NULL,
            booking_date DATE NOT NULL,
            start_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_items (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(id),
            position INTEGER NOT NULL DEFAULT 0,
            price NUMERIC(10, 2) NOT NULL,
            assigned_staff_id UUID NULL REFERENCES staff(id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // A slot carries at most one reservation
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_id UUID NOT NULL UNIQUE REFERENCES slots(id),
            booking_id UUID NOT NULL REFERENCES bookings(id),
            service_item_id UUID NOT NULL REFERENCES service_items(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_staff_clinic_id ON staff(clinic_id);
        CREATE INDEX IF NOT EXISTS idx_shifts_clinic_date ON shifts(clinic_id, work_date);
        CREATE INDEX IF NOT EXISTS idx_shifts_staff_date ON shifts(staff_id, work_date);
        CREATE INDEX IF NOT EXISTS idx_slots_shift_id ON slots(shift_id);
        CREATE INDEX IF NOT EXISTS idx_slots_staff_start ON slots(staff_id, slot_date, start_time);
        CREATE INDEX IF NOT EXISTS idx_service_items_booking_id ON service_items(booking_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_booking_id ON reservations(booking_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_service_item_id ON reservations(service_item_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_clinic_date ON bookings(clinic_id, booking_date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
