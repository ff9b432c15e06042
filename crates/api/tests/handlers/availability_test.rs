use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotwise_core::models::{
    assignment::{AvailabilityReport, GlobalSlotsResponse},
    specialty::{ServiceCategory, Specialty},
};

use crate::test_utils::{monday, time, TestContext};

async fn vet_on_duty(ctx: &TestContext) {
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    ctx.server
        .post("/api/shifts")
        .json(&json!({
            "staff_id": vet.id,
            "clinic_id": ctx.clinic_id,
            "work_date": monday(),
            "start_time": "09:00:00",
            "end_time": "12:00:00",
            "break_start": null,
            "break_end": null,
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn test_draft_check_suggests_staff() {
    let ctx = TestContext::new();
    vet_on_duty(&ctx).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 30, 4500).await;

    let report: AvailabilityReport = ctx
        .server
        .post("/api/availability/check")
        .json(&json!({
            "clinic_id": ctx.clinic_id,
            "date": monday(),
            "start_time": "09:30:00",
            "service_ids": [checkup.id],
        }))
        .await
        .json();

    assert!(report.all_available);
    assert_eq!(report.booking_id, None);
    assert!(report.items[0].suggested_staff.is_some());
    assert_eq!(report.available_total, checkup.price);
}

#[test_log::test(tokio::test)]
async fn test_draft_check_requires_services() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/availability/check")
        .json(&json!({
            "clinic_id": ctx.clinic_id,
            "date": monday(),
            "start_time": "09:30:00",
            "service_ids": [],
        }))
        .expect_failure()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_global_slots_skip_booked_time() {
    let ctx = TestContext::new();
    vet_on_duty(&ctx).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 60, 6000).await;
    let body = json!({
        "clinic_id": ctx.clinic_id,
        "date": monday(),
        "service_ids": [checkup.id],
    });

    let before: GlobalSlotsResponse = ctx.server.post("/api/availability/slots").json(&body).await.json();
    assert_eq!(
        before.start_times,
        vec![time(9, 0), time(9, 30), time(10, 0), time(10, 30), time(11, 0)]
    );

    let booking = ctx.book(time(9, 0), &[&checkup]).await;
    ctx.server.post(&format!("/api/bookings/{}/assign", booking.id)).await.assert_status_ok();

    let after: GlobalSlotsResponse = ctx.server.post("/api/availability/slots").json(&body).await.json();
    assert_eq!(after.start_times, vec![time(10, 0), time(10, 30), time(11, 0)]);
}
