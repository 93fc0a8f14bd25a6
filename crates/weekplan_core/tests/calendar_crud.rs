use weekplan_core::{Calendar, CalendarError, Priority, TimePoint};

fn tp(week: u32, day: u32, time: u32) -> TimePoint {
    TimePoint::new(week, day, time).unwrap()
}

#[test]
fn create_then_find_returns_equal_meeting() {
    let mut calendar = Calendar::new();
    let id = calendar
        .create("Design review", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530))
        .unwrap();

    let found = calendar.find(id).unwrap();
    assert_eq!(found.id(), id);
    assert_eq!(found.subject(), "Design review");
    assert_eq!(found.priority(), Priority::Critical);
    assert_eq!(found.start(), tp(1, 2, 1400));
    assert_eq!(found.end(), tp(1, 2, 1530));
}

#[test]
fn delete_then_find_is_not_found() {
    let mut calendar = Calendar::new();
    let id = calendar
        .create("1:1", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 930))
        .unwrap();

    let removed = calendar.delete(id).unwrap();
    assert_eq!(removed.subject(), "1:1");
    assert_eq!(calendar.find(id).unwrap_err(), CalendarError::NotFound(id));
    assert_eq!(calendar.delete(id).unwrap_err(), CalendarError::NotFound(id));
}

#[test]
fn ids_strictly_increase_and_are_never_reused() {
    let mut calendar = Calendar::new();
    let mut issued = Vec::new();
    for day in 1..=5 {
        let id = calendar
            .create("daily", Priority::NonCritical, tp(1, day, 900), tp(1, day, 915))
            .unwrap();
        issued.push(id);
    }
    assert_eq!(issued, vec![1, 2, 3, 4, 5]);

    calendar.delete(5).unwrap();
    calendar.delete(2).unwrap();
    let next = calendar
        .create("daily", Priority::NonCritical, tp(1, 5, 900), tp(1, 5, 915))
        .unwrap();
    assert_eq!(next, 6);
}

#[test]
fn overlapping_create_fails_with_conflicting_id() {
    let mut calendar = Calendar::new();
    let first = calendar
        .create("Design review", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530))
        .unwrap();

    let err = calendar
        .create("Lunch", Priority::NonCritical, tp(1, 2, 1300), tp(1, 2, 1430))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::Conflict {
            conflicting_ids: vec![first]
        }
    );
    assert_eq!(calendar.len(), 1);
}

#[test]
fn adjacent_create_succeeds() {
    let mut calendar = Calendar::new();
    calendar
        .create("Design review", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530))
        .unwrap();
    let second = calendar
        .create("Follow-up", Priority::NonCritical, tp(1, 2, 1530), tp(1, 2, 1600))
        .unwrap();
    assert_eq!(second, 2);
}

#[test]
fn cross_week_meeting_blocks_following_monday() {
    let mut calendar = Calendar::new();
    let retreat = calendar
        .create("Retreat", Priority::Critical, tp(2, 6, 1800), tp(3, 1, 1200))
        .unwrap();

    let err = calendar
        .create("Standup", Priority::NonCritical, tp(3, 1, 1100), tp(3, 1, 1300))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::Conflict {
            conflicting_ids: vec![retreat]
        }
    );
}

#[test]
fn conflict_lists_every_overlapping_meeting() {
    let mut calendar = Calendar::new();
    let morning = calendar
        .create("a", Priority::NonCritical, tp(4, 3, 900), tp(4, 3, 1000))
        .unwrap();
    let noon = calendar
        .create("b", Priority::NonCritical, tp(4, 3, 1130), tp(4, 3, 1230))
        .unwrap();

    let err = calendar
        .create("c", Priority::NonCritical, tp(4, 3, 930), tp(4, 3, 1200))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::Conflict {
            conflicting_ids: vec![morning, noon]
        }
    );
}

#[test]
fn update_to_identical_span_has_no_self_conflict() {
    let mut calendar = Calendar::new();
    let id = calendar
        .create("Design review", Priority::Critical, tp(1, 2, 1400), tp(1, 2, 1530))
        .unwrap();

    calendar
        .update(id, "Design review v2", Priority::NonCritical, tp(1, 2, 1400), tp(1, 2, 1530))
        .unwrap();

    let updated = calendar.find(id).unwrap();
    assert_eq!(updated.subject(), "Design review v2");
    assert_eq!(updated.priority(), Priority::NonCritical);
}

#[test]
fn update_rejects_conflict_with_other_meeting_and_keeps_state() {
    let mut calendar = Calendar::new();
    let first = calendar
        .create("a", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 1000))
        .unwrap();
    let second = calendar
        .create("b", Priority::NonCritical, tp(1, 1, 1000), tp(1, 1, 1100))
        .unwrap();

    let err = calendar
        .update(second, "b", Priority::NonCritical, tp(1, 1, 930), tp(1, 1, 1100))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::Conflict {
            conflicting_ids: vec![first]
        }
    );
    assert_eq!(calendar.find(second).unwrap().start(), tp(1, 1, 1000));
    assert_eq!(calendar.next_id(), 3);
}

#[test]
fn update_unknown_id_and_invalid_details_fail() {
    let mut calendar = Calendar::new();
    let id = calendar
        .create("a", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 1000))
        .unwrap();

    assert_eq!(
        calendar
            .update(42, "x", Priority::NonCritical, tp(1, 1, 1200), tp(1, 1, 1300))
            .unwrap_err(),
        CalendarError::NotFound(42)
    );
    assert!(matches!(
        calendar.update(id, " ", Priority::NonCritical, tp(1, 1, 900), tp(1, 1, 1000)),
        Err(CalendarError::Validation(_))
    ));
    assert!(matches!(
        calendar.update(id, "a", Priority::NonCritical, tp(1, 1, 1000), tp(1, 1, 900)),
        Err(CalendarError::Validation(_))
    ));
    assert_eq!(calendar.find(id).unwrap().subject(), "a");
}

#[test]
fn clear_empties_listings_but_keeps_id_sequence() {
    let mut calendar = Calendar::new();
    for day in 1..=3 {
        calendar
            .create("x", Priority::NonCritical, tp(1, day, 800), tp(1, day, 900))
            .unwrap();
    }
    calendar.clear();

    assert!(calendar.is_empty());
    let listing = calendar.list_by_day(1).unwrap();
    assert_eq!(listing.total, 0);
    assert!(listing.days.iter().all(|day| day.meetings.is_empty()));

    let id = calendar
        .create("after clear", Priority::NonCritical, tp(1, 1, 800), tp(1, 1, 900))
        .unwrap();
    assert_eq!(id, 4);
}

#[test]
fn list_by_day_groups_by_start_day_in_time_order() {
    let mut calendar = Calendar::new();
    let late = calendar
        .create("late", Priority::NonCritical, tp(1, 2, 1600), tp(1, 3, 1130))
        .unwrap();
    let early = calendar
        .create("early", Priority::Critical, tp(1, 2, 800), tp(1, 2, 900))
        .unwrap();
    let friday = calendar
        .create("friday", Priority::NonCritical, tp(1, 5, 1000), tp(1, 5, 1100))
        .unwrap();
    calendar
        .create("next week", Priority::NonCritical, tp(2, 2, 800), tp(2, 2, 900))
        .unwrap();

    let listing = calendar.list_by_day(1).unwrap();
    assert_eq!(listing.week, 1);
    assert_eq!(listing.total, 3);
    assert_eq!(listing.days.len(), 7);

    let tuesday = &listing.days[1];
    assert_eq!(tuesday.day, 2);
    assert_eq!(tuesday.day_name, "Tuesday");
    let ids: Vec<u64> = tuesday.meetings.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![early, late]);
    assert_eq!(tuesday.count(), 2);

    assert_eq!(listing.days[2].count(), 0);
    assert_eq!(listing.days[4].meetings[0].id(), friday);
    assert_eq!(calendar.active_weeks(), vec![1, 2]);
}
