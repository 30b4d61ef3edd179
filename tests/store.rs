#![forbid(unsafe_code)]
use chrono::NaiveDate;
use permanence::{
    generate_week, AssignmentStore, NewStaff, RosterOrder, Scheduler, ShiftAssignment,
    ShiftGroup, SqliteStore, StaffDirectory, StaffId, StoreError, ANCHOR_MONDAY,
    REFERENCE_ORDER,
};
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seeded() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.seed_reference_roster().unwrap(), 7);
    store
}

fn generated(store: &SqliteStore, monday: NaiveDate) -> Vec<ShiftAssignment> {
    let ring = RosterOrder::default().order(store.list_active().unwrap());
    generate_week(monday, &ring).unwrap()
}

fn slots(week: &[ShiftAssignment]) -> Vec<(NaiveDate, ShiftGroup, StaffId)> {
    week.iter().map(ShiftAssignment::slot).collect()
}

#[test]
fn ungenerated_week_is_empty() {
    let store = seeded();
    assert!(store.get_week(ANCHOR_MONDAY).unwrap().is_empty());
    assert!(store
        .get_assignment(ANCHOR_MONDAY, ShiftGroup::GroupA)
        .unwrap()
        .is_none());
}

#[test]
fn seeding_only_happens_once() {
    let store = seeded();
    assert_eq!(store.seed_reference_roster().unwrap(), 0);
    assert_eq!(store.list_active().unwrap().len(), 7);
}

#[test]
fn replace_then_read_back_with_names() {
    let mut store = seeded();
    let week = generated(&store, ANCHOR_MONDAY);
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();

    let stored = store.get_week(ANCHOR_MONDAY).unwrap();
    assert_eq!(stored.len(), 14);
    assert_eq!(slots(&stored), slots(&week));
    assert!(stored.iter().all(|a| a.id.is_some()));

    let first = store
        .get_assignment(ANCHOR_MONDAY, ShiftGroup::GroupA)
        .unwrap()
        .unwrap();
    assert_eq!(first.staff_name.as_deref(), Some(REFERENCE_ORDER[0]));
}

#[test]
fn replace_is_idempotent() {
    let mut store = seeded();
    let week = generated(&store, ANCHOR_MONDAY);
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();
    let once = slots(&store.get_week(ANCHOR_MONDAY).unwrap());
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();
    let twice = slots(&store.get_week(ANCHOR_MONDAY).unwrap());
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 14);
}

#[test]
fn weeks_do_not_leak_into_each_other() {
    let mut store = seeded();
    let next = d(2025, 9, 8);
    let w1 = generated(&store, ANCHOR_MONDAY);
    let w2 = generated(&store, next);
    store.replace_week(ANCHOR_MONDAY, &w1).unwrap();
    store.replace_week(next, &w2).unwrap();

    assert_eq!(store.clear_week(ANCHOR_MONDAY).unwrap(), 14);
    assert!(store.get_week(ANCHOR_MONDAY).unwrap().is_empty());
    assert_eq!(store.get_week(next).unwrap().len(), 14);
}

#[test]
fn failed_replace_keeps_previous_week() {
    let mut store = seeded();
    let week = generated(&store, ANCHOR_MONDAY);
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();
    let before = slots(&store.get_week(ANCHOR_MONDAY).unwrap());

    let mut broken = generated(&store, ANCHOR_MONDAY);
    broken[9].staff_id = StaffId::new(9_999);
    let err = store.replace_week(ANCHOR_MONDAY, &broken).unwrap_err();
    assert!(matches!(err, StoreError::UnknownStaff(id) if id == StaffId::new(9_999)));

    assert_eq!(slots(&store.get_week(ANCHOR_MONDAY).unwrap()), before);
}

#[test]
fn rejects_assignments_outside_the_week() {
    let mut store = seeded();
    let week = generated(&store, d(2025, 9, 8));
    let err = store.replace_week(ANCHOR_MONDAY, &week).unwrap_err();
    assert!(matches!(err, StoreError::OutOfWeek { .. }));
    assert!(store.get_week(d(2025, 9, 8)).unwrap().is_empty());
}

#[test]
fn rejects_duplicate_slots() {
    let mut store = seeded();
    let mut week = generated(&store, ANCHOR_MONDAY);
    let dup = week[0].clone();
    week.push(dup);
    let err = store.replace_week(ANCHOR_MONDAY, &week).unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateSlot {
            group: ShiftGroup::GroupA,
            ..
        }
    ));
}

#[test]
fn relief_is_next_slot() {
    let mut store = seeded();
    let week = generated(&store, ANCHOR_MONDAY);
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();

    let tuesday = d(2025, 9, 2);
    let relief = store
        .relief_for(tuesday, ShiftGroup::GroupA)
        .unwrap()
        .unwrap();
    assert_eq!((relief.date, relief.group), (tuesday, ShiftGroup::GroupB));

    let relief = store
        .relief_for(tuesday, ShiftGroup::GroupB)
        .unwrap()
        .unwrap();
    assert_eq!(
        (relief.date, relief.group),
        (d(2025, 9, 3), ShiftGroup::GroupA)
    );

    // Sunday night hands over to a week not generated yet
    assert!(store
        .relief_for(d(2025, 9, 7), ShiftGroup::GroupB)
        .unwrap()
        .is_none());
}

#[test]
fn inactive_staff_leave_the_rotation() {
    let store = seeded();
    let victim = store.list_active().unwrap()[0].id;
    assert!(store.set_active(victim, false).unwrap());
    assert!(!store.set_active(StaffId::new(404), false).unwrap());
    assert_eq!(store.list_active().unwrap().len(), 6);
    assert_eq!(store.list_staff().unwrap().len(), 7);
}

#[test]
fn empty_names_are_rejected() {
    let store = seeded();
    let err = store.add_staff(&NewStaff::named("   ")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidStaff(_)));
}

#[test]
fn scheduler_regenerates_and_projects_rows() {
    let mut scheduler = Scheduler::new(seeded());
    // any day of the week designates that week
    let persisted = scheduler.regenerate_week(d(2025, 9, 4)).unwrap();
    assert_eq!(persisted.len(), 14);
    assert_eq!(persisted[0].date, ANCHOR_MONDAY);

    let rows = scheduler.week_rows(d(2025, 9, 7)).unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].group_a.as_deref(), Some(REFERENCE_ORDER[0]));
    assert_eq!(rows[0].group_b.as_deref(), Some(REFERENCE_ORDER[6]));
    assert_eq!(rows[6].date, d(2025, 9, 7));

    let on_duty = scheduler
        .on_duty(d(2025, 9, 2), ShiftGroup::GroupB)
        .unwrap()
        .unwrap();
    assert_eq!(on_duty.staff_name.as_deref(), Some(REFERENCE_ORDER[0]));
    let relief = scheduler
        .relief_for(d(2025, 9, 2), ShiftGroup::GroupB)
        .unwrap()
        .unwrap();
    assert_eq!(relief.staff_name.as_deref(), Some(REFERENCE_ORDER[2]));

    let empty = scheduler.week_rows(d(2025, 9, 15)).unwrap();
    assert_eq!(empty.len(), 7);
    assert!(empty.iter().all(|r| r.is_empty()));

    assert_eq!(scheduler.clear_week(d(2025, 9, 3)).unwrap(), 14);
    assert!(scheduler.week(ANCHOR_MONDAY).unwrap().is_empty());
}

#[test]
fn scheduler_needs_two_active_people() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.add_staff(&NewStaff::named("Seul")).unwrap();
    let mut scheduler = Scheduler::new(store);
    assert!(scheduler.regenerate_week(ANCHOR_MONDAY).is_err());
    assert!(scheduler.week(ANCHOR_MONDAY).unwrap().is_empty());
}

#[test]
fn file_database_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("planning.db");
    {
        let mut scheduler = Scheduler::new(SqliteStore::open(&path).unwrap());
        scheduler.store().seed_reference_roster().unwrap();
        scheduler.regenerate_week(ANCHOR_MONDAY).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get_week(ANCHOR_MONDAY).unwrap().len(), 14);
}

#[test]
fn renaming_updates_name_and_ring_position() {
    let store = seeded();
    let first = store.list_active().unwrap()[0].clone();
    assert!(store.rename_staff(first.id, "  An Bình  ").unwrap());

    let renamed = store
        .list_staff()
        .unwrap()
        .into_iter()
        .find(|m| m.id == first.id)
        .unwrap();
    assert_eq!(renamed.full_name, "An Bình");

    // no longer matches the reference order: goes to the tail
    let ring = Scheduler::new(store).ring().unwrap();
    assert_eq!(ring.len(), 7);
    assert_eq!(ring[6].id, first.id);
}

#[test]
fn renaming_rejects_empty_names_and_unknown_ids() {
    let store = seeded();
    let id = store.list_active().unwrap()[0].id;
    let err = store.rename_staff(id, " \t").unwrap_err();
    assert!(matches!(err, StoreError::InvalidStaff(_)));
    assert!(!store.rename_staff(StaffId::new(404), "Personne").unwrap());
    assert!(store
        .list_staff()
        .unwrap()
        .iter()
        .any(|m| m.id == id && !m.full_name.trim().is_empty()));
}

#[test]
fn deleting_unscheduled_staff() {
    let store = seeded();
    let id = store.add_staff(&NewStaff::named("Trần Văn Tạm")).unwrap();
    assert!(store.delete_staff(id).unwrap());
    assert!(!store.delete_staff(id).unwrap());
    assert_eq!(store.list_staff().unwrap().len(), 7);
}

#[test]
fn deleting_scheduled_staff_is_refused() {
    let mut store = seeded();
    let week = generated(&store, ANCHOR_MONDAY);
    store.replace_week(ANCHOR_MONDAY, &week).unwrap();
    let busy = week[0].staff_id;

    let err = store.delete_staff(busy).unwrap_err();
    assert!(matches!(err, StoreError::StaffInUse(id) if id == busy));
    assert!(store.list_staff().unwrap().iter().any(|m| m.id == busy));
    assert_eq!(store.get_week(ANCHOR_MONDAY).unwrap().len(), 14);

    // once the week is cleared the person can go
    store.clear_week(ANCHOR_MONDAY).unwrap();
    assert!(store.delete_staff(busy).unwrap());
}

#[test]
fn relief_after_last_calendar_day_is_an_error() {
    let store = seeded();
    let err = store
        .relief_for(NaiveDate::MAX, ShiftGroup::GroupB)
        .unwrap_err();
    assert!(matches!(err, StoreError::DateOverflow));
    assert!(store
        .relief_for(NaiveDate::MAX, ShiftGroup::GroupA)
        .unwrap()
        .is_none());
}
