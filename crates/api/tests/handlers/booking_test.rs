use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotwise_core::models::{
    assignment::{AssignmentReport, AvailabilityReport, ItemOutcome, ReassignOutcome, ReleaseResponse},
    shift::{ShiftWithSlots, Slot, SlotStatus},
    specialty::{ServiceCategory, Specialty},
    staff::Staff,
};
use uuid::Uuid;

use crate::test_utils::{monday, time, TestContext};

async fn open_shift(ctx: &TestContext, staff: &Staff, date: chrono::NaiveDate) -> ShiftWithSlots {
    ctx.server
        .post("/api/shifts")
        .json(&json!({
            "staff_id": staff.id,
            "clinic_id": ctx.clinic_id,
            "work_date": date,
            "start_time": "09:00:00",
            "end_time": "12:00:00",
            "break_start": null,
            "break_end": null,
        }))
        .await
        .json()
}

fn assigned_staff(outcome: &ItemOutcome) -> Uuid {
    match outcome {
        ItemOutcome::Assigned { staff, .. } => staff.id,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test_log::test(tokio::test)]
async fn test_assign_without_body_allows_partial() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    let shift = open_shift(&ctx, &vet, monday()).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 60, 6000).await;
    let groom = ctx.offer(ServiceCategory::Grooming, 30, 3000).await;
    let booking = ctx.book(time(9, 0), &[&checkup, &groom]).await;

    let response = ctx.server.post(&format!("/api/bookings/{}/assign", booking.id)).await;

    response.assert_status_ok();
    let report: AssignmentReport = response.json();
    assert!(report.committed);
    assert_eq!(report.assigned_count(), 1);
    assert_eq!(assigned_staff(&report.items[0].outcome), vet.id);
    assert!(matches!(report.items[1].outcome, ItemOutcome::NoStaffAvailable { .. }));

    let slots: Vec<Slot> = ctx.server.get(&format!("/api/shifts/{}/slots", shift.shift.id)).await.json();
    let booked = slots.iter().filter(|slot| slot.status == SlotStatus::Booked).count();
    assert_eq!(booked, 2);
}

#[test_log::test(tokio::test)]
async fn test_all_or_nothing_leaves_slots_free() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    open_shift(&ctx, &vet, monday()).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 60, 6000).await;
    let groom = ctx.offer(ServiceCategory::Grooming, 30, 3000).await;
    let booking = ctx.book(time(9, 0), &[&checkup, &groom]).await;

    let report: AssignmentReport = ctx
        .server
        .post(&format!("/api/bookings/{}/assign", booking.id))
        .json(&json!({ "policy": "ALL_OR_NOTHING" }))
        .await
        .json();

    assert!(!report.committed);
    assert!(ctx.store.reservations().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_availability_suggests_other_days() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    let groomer = ctx.hire(Specialty::Groomer).await;
    open_shift(&ctx, &vet, monday()).await;
    let tuesday = monday().succ_opt().unwrap();
    open_shift(&ctx, &groomer, tuesday).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 30, 4500).await;
    let groom = ctx.offer(ServiceCategory::Grooming, 60, 5500).await;
    let booking = ctx.book(time(10, 0), &[&checkup, &groom]).await;

    let report: AvailabilityReport = ctx
        .server
        .get(&format!("/api/bookings/{}/availability", booking.id))
        .await
        .json();

    assert!(!report.all_available);
    assert_eq!(report.failed_specialties, vec![Specialty::Groomer]);
    assert_eq!(report.available_total, checkup.price);
    assert_eq!(report.unavailable_total, groom.price);
    assert_eq!(report.alternatives.len(), 1);
    assert_eq!(report.alternatives[0].date, tuesday);
    assert_eq!(report.alternatives[0].staff.id, groomer.id);
    assert!(ctx.store.reservations().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_release_then_cancel() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;
    open_shift(&ctx, &vet, monday()).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 60, 6000).await;
    let booking = ctx.book(time(10, 0), &[&checkup]).await;
    ctx.server.post(&format!("/api/bookings/{}/assign", booking.id)).await.assert_status_ok();

    let released: ReleaseResponse = ctx
        .server
        .post(&format!("/api/bookings/{}/release", booking.id))
        .await
        .json();
    assert_eq!(released.released_slot_ids.len(), 2);
    assert!(ctx.store.reservations().await.is_empty());

    let cancelled: ReleaseResponse = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .await
        .json();
    assert!(cancelled.released_slot_ids.is_empty());

    ctx.server
        .post(&format!("/api/bookings/{}/assign", booking.id))
        .expect_failure()
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_unknown_booking_is_not_found() {
    let ctx = TestContext::new();
    let id = Uuid::new_v4();

    for path in ["assign", "release", "cancel"] {
        ctx.server
            .post(&format!("/api/bookings/{}/{}", id, path))
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
    ctx.server
        .get(&format!("/api/bookings/{}/availability", id))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_reassign_moves_item_to_other_vet() {
    let ctx = TestContext::new();
    let first = ctx.hire(Specialty::GeneralPractice).await;
    let second = ctx.hire(Specialty::GeneralPractice).await;
    open_shift(&ctx, &first, monday()).await;
    open_shift(&ctx, &second, monday()).await;
    let checkup = ctx.offer(ServiceCategory::Checkup, 30, 4500).await;
    let booking = ctx.book(time(11, 0), &[&checkup]).await;

    let report: AssignmentReport = ctx
        .server
        .post(&format!("/api/bookings/{}/assign", booking.id))
        .await
        .json();
    let current = assigned_staff(&report.items[0].outcome);
    let target = if current == first.id { second.id } else { first.id };

    let outcome: ReassignOutcome = ctx
        .server
        .post(&format!("/api/service-items/{}/reassign", booking.items[0].id))
        .json(&json!({ "staff_id": target }))
        .await
        .json();

    match outcome {
        ReassignOutcome::Reassigned { staff_id, slot_ids, .. } => {
            assert_eq!(staff_id, target);
            assert_eq!(slot_ids.len(), 1);
        }
        other => panic!("expected a reassignment, got {:?}", other),
    }
    let reservations = ctx.store.reservations().await;
    assert_eq!(reservations.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_reassign_unknown_item_is_not_found() {
    let ctx = TestContext::new();
    let vet = ctx.hire(Specialty::GeneralPractice).await;

    ctx.server
        .post(&format!("/api/service-items/{}/reassign", Uuid::new_v4()))
        .json(&json!({ "staff_id": vet.id }))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
