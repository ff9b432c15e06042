use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotwise_core::models::{
    shift::{CreateShiftBatchResponse, ShiftWithSlots, Slot, SlotStatus},
    specialty::Specialty,
};
use uuid::Uuid;

use crate::test_utils::{monday, TestContext};

fn shift_body(ctx: &TestContext, staff_id: Uuid, start: &str, end: &str) -> Value {
    json!({
        "staff_id": staff_id,
        "clinic_id": ctx.clinic_id,
        "work_date": monday(),
        "start_time": start,
        "end_time": end,
        "break_start": null,
        "break_end": null,
        "notes": "front desk",
    })
}

#[test_log::test(tokio::test)]
async fn test_create_shift_returns_generated_slots() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;

    let response = ctx
        .server
        .post("/api/shifts")
        .json(&shift_body(&ctx, vet.id, "09:00:00", "12:00:00"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: ShiftWithSlots = response.json();
    assert_eq!(created.shift.staff_id, vet.id);
    assert_eq!(created.slots.len(), 6);
    assert!(created.slots.iter().all(|slot| slot.status == SlotStatus::Available && slot.version == 0));
}

#[test_log::test(tokio::test)]
async fn test_create_shift_rejects_inverted_times() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;

    let response = ctx
        .server
        .post("/api/shifts")
        .json(&shift_body(&ctx, vet.id, "17:00:00", "09:00:00"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
}

#[test_log::test(tokio::test)]
async fn test_duplicate_shift_needs_force() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    let body = shift_body(&ctx, vet.id, "09:00:00", "12:00:00");

    ctx.server.post("/api/shifts").json(&body).await.assert_status(StatusCode::CREATED);
    ctx.server
        .post("/api/shifts")
        .json(&body)
        .expect_failure()
        .await
        .assert_status(StatusCode::CONFLICT);

    let mut forced = shift_body(&ctx, vet.id, "13:00:00", "15:00:00");
    forced["force"] = json!(true);
    let response = ctx.server.post("/api/shifts").json(&forced).await;
    response.assert_status(StatusCode::CREATED);
    let replaced: ShiftWithSlots = response.json();
    assert_eq!(replaced.slots.len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_unknown_staff_is_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/shifts")
        .json(&shift_body(&ctx, Uuid::new_v4(), "09:00:00", "12:00:00"))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_batch_creates_selected_weekdays() {
    let ctx = TestContext::new();
    let groomer = ctx.hire(Specialty::Groomer).await;

    let response = ctx
        .server
        .post("/api/shifts/batch")
        .json(&json!({
            "staff_id": groomer.id,
            "clinic_id": ctx.clinic_id,
            "from_date": "2025-03-10",
            "to_date": "2025-03-16",
            "weekdays": [0, 2, 4],
            "repeat_weeks": 2,
            "start_time": "10:00:00",
            "end_time": "14:00:00",
            "break_start": "12:00:00",
            "break_end": "12:30:00",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let batch: CreateShiftBatchResponse = response.json();
    assert_eq!(batch.created.len(), 6);
    assert!(batch.skipped.is_empty());
    assert!(batch.created.iter().all(|created| created.slots.len() == 7));
}

#[test_log::test(tokio::test)]
async fn test_batch_rejects_repeat_weeks_out_of_range() {
    let ctx = TestContext::new();
    let groomer = ctx.hire(Specialty::Groomer).await;

    ctx.server
        .post("/api/shifts/batch")
        .json(&json!({
            "staff_id": groomer.id,
            "clinic_id": ctx.clinic_id,
            "from_date": "2025-03-10",
            "to_date": "2025-03-10",
            "repeat_weeks": 60,
            "start_time": "10:00:00",
            "end_time": "14:00:00",
            "break_start": null,
            "break_end": null,
        }))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_shift_slots_then_delete() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    let created: ShiftWithSlots = ctx
        .server
        .post("/api/shifts")
        .json(&shift_body(&ctx, vet.id, "09:00:00", "10:30:00"))
        .await
        .json();
    let path = format!("/api/shifts/{}", created.shift.id);

    let slots: Vec<Slot> = ctx.server.get(&format!("{}/slots", path)).await.json();
    assert_eq!(slots, created.slots);

    ctx.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    ctx.server
        .get(&format!("{}/slots", path))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .delete(&path)
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
