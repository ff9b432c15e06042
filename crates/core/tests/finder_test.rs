mod common;

use common::{at, service, time, World};
use pretty_assertions::assert_eq;
use slotwise_core::config::SchedulingConfig;
use slotwise_core::models::{
    shift::SlotStatus,
    specialty::{ServiceCategory, Specialty},
};
use slotwise_core::schedule::finder::find_start_times;
use uuid::Uuid;

#[test]
fn test_start_times_follow_shift_coverage() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    world.work(&vet, time(9, 0), time(11, 0));
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 60, 4500);

    let times = find_start_times(&world.snapshot, &[checkup], &SchedulingConfig::default());

    assert_eq!(times, vec![time(9, 0), time(9, 30), time(10, 0)]);
}

#[test]
fn test_booked_slots_exclude_overlapping_starts() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    world.work(&vet, time(9, 0), time(11, 0));
    world.set_status(vet.id, at(9, 30), SlotStatus::Booked);
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 30, 4500);

    let times = find_start_times(&world.snapshot, &[checkup], &SchedulingConfig::default());

    assert_eq!(times, vec![time(9, 0), time(10, 0), time(10, 30)]);
}

#[test]
fn test_break_is_not_bookable() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    let mut shift = common::shift(&vet, time(9, 0), time(11, 0));
    shift.break_start = Some(time(10, 0));
    shift.break_end = Some(time(10, 30));
    world.add_shift(shift);
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 30, 4500);

    let times = find_start_times(&world.snapshot, &[checkup], &SchedulingConfig::default());

    assert_eq!(times, vec![time(9, 0), time(9, 30), time(10, 30)]);
}

#[test]
fn test_sequence_needs_every_step_covered() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    let groomer = world.hire("Lena Park", Specialty::Groomer);
    world.work(&vet, time(9, 0), time(12, 0));
    world.work(&groomer, time(10, 0), time(12, 0));
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 30, 4500);
    let grooming = service(world.clinic_id(), "Full groom", ServiceCategory::Grooming, 60, 5500);

    let times = find_start_times(&world.snapshot, &[checkup, grooming], &SchedulingConfig::default());

    assert_eq!(times, vec![time(9, 30), time(10, 0), time(10, 30)]);
}

#[test]
fn test_missing_specialty_short_circuits() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    world.work(&vet, time(9, 0), time(17, 0));
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 30, 4500);
    let grooming = service(world.clinic_id(), "Full groom", ServiceCategory::Grooming, 60, 5500);

    let times = find_start_times(&world.snapshot, &[checkup, grooming], &SchedulingConfig::default());

    assert!(times.is_empty());
}

#[test]
fn test_window_bounds_candidates() {
    let mut world = World::new(Uuid::new_v4());
    let vet = world.hire("Dr. Ana Torres", Specialty::GeneralPractice);
    world.work(&vet, time(6, 0), time(23, 0));
    let checkup = service(world.clinic_id(), "Checkup", ServiceCategory::Checkup, 30, 4500);
    let config = SchedulingConfig {
        window_start: time(8, 0),
        window_end: time(9, 0),
        ..SchedulingConfig::default()
    };

    let times = find_start_times(&world.snapshot, &[checkup], &config);

    assert_eq!(times, vec![time(8, 0), time(8, 30)]);
}

#[test]
fn test_empty_sequence_has_no_start_times() {
    let world = World::new(Uuid::new_v4());

    assert!(find_start_times(&world.snapshot, &[], &SchedulingConfig::default()).is_empty());
}
