use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotwise_core::models::{
    shift::{ShiftWithSlots, Slot, SlotStatus},
    specialty::Specialty,
};
use uuid::Uuid;

use crate::test_utils::{monday, TestContext};

async fn first_slot(ctx: &TestContext) -> Slot {
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    let created: ShiftWithSlots = ctx
        .server
        .post("/api/shifts")
        .json(&json!({
            "staff_id": vet.id,
            "clinic_id": ctx.clinic_id,
            "work_date": monday(),
            "start_time": "09:00:00",
            "end_time": "10:00:00",
            "break_start": null,
            "break_end": null,
        }))
        .await
        .json();
    created.slots[0].clone()
}

#[test_log::test(tokio::test)]
async fn test_block_and_unblock_bump_version() {
    let ctx = TestContext::new();
    let slot = first_slot(&ctx).await;

    let blocked: Slot = ctx.server.post(&format!("/api/slots/{}/block", slot.id)).await.json();
    assert_eq!(blocked.status, SlotStatus::Blocked);
    assert_eq!(blocked.version, slot.version + 1);

    let unblocked: Slot = ctx.server.post(&format!("/api/slots/{}/unblock", slot.id)).await.json();
    assert_eq!(unblocked.status, SlotStatus::Available);
    assert_eq!(unblocked.version, slot.version + 2);
}

#[test_log::test(tokio::test)]
async fn test_block_twice_conflicts() {
    let ctx = TestContext::new();
    let slot = first_slot(&ctx).await;
    let path = format!("/api/slots/{}/block", slot.id);

    ctx.server.post(&path).await.assert_status_ok();
    ctx.server.post(&path).expect_failure().await.assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_unblock_available_slot_conflicts() {
    let ctx = TestContext::new();
    let slot = first_slot(&ctx).await;

    ctx.server
        .post(&format!("/api/slots/{}/unblock", slot.id))
        .expect_failure()
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_unknown_slot_is_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .post(&format!("/api/slots/{}/block", Uuid::new_v4()))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
