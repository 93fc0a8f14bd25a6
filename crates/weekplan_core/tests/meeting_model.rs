use weekplan_core::{Meeting, MeetingValidationError, Priority, TimePoint, TimePointError};

fn tp(week: u32, day: u32, time: u32) -> TimePoint {
    TimePoint::new(week, day, time).unwrap()
}

#[test]
fn every_in_range_time_point_constructs() {
    for week in [1, 2, 25, 49, 50] {
        for day in 1..=7 {
            for hour in 0..=23 {
                for minute in [0, 1, 30, 59] {
                    let time = hour * 100 + minute;
                    let point = TimePoint::new(week, day, time).unwrap();
                    assert_eq!(point.week(), week);
                    assert_eq!(point.day(), day);
                    assert_eq!(point.time_of_day(), time);
                }
            }
        }
    }
}

#[test]
fn out_of_range_fields_fail_with_range_error() {
    assert_eq!(TimePoint::new(0, 3, 1200).unwrap_err(), TimePointError::Week(0));
    assert_eq!(TimePoint::new(51, 3, 1200).unwrap_err(), TimePointError::Week(51));
    assert_eq!(TimePoint::new(3, 0, 1200).unwrap_err(), TimePointError::Day(0));
    assert_eq!(TimePoint::new(3, 8, 1200).unwrap_err(), TimePointError::Day(8));
    assert_eq!(TimePoint::new(3, 3, 2400).unwrap_err(), TimePointError::Time(2400));
    for hour in 0..=23 {
        let time = hour * 100 + 60;
        assert_eq!(
            TimePoint::new(3, 3, time).unwrap_err(),
            TimePointError::Minutes(time)
        );
    }
}

#[test]
fn time_point_serialization_uses_expected_wire_fields() {
    let point = tp(2, 6, 1800);
    let json = serde_json::to_value(point).unwrap();
    assert_eq!(json, serde_json::json!({ "week": 2, "day": 6, "time": 1800 }));

    let decoded: TimePoint = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, point);
}

#[test]
fn deserialize_rejects_out_of_range_time_point() {
    let value = serde_json::json!({ "week": 1, "day": 9, "time": 900 });
    let err = serde_json::from_value::<TimePoint>(value).unwrap_err();
    assert!(
        err.to_string().contains("day 9 out of range"),
        "unexpected error: {err}"
    );
}

#[test]
fn meeting_serialization_round_trips_through_validation() {
    let meeting =
        Meeting::with_id(3, "planning", Priority::Critical, tp(1, 1, 900), tp(1, 1, 1030)).unwrap();
    let json = serde_json::to_value(&meeting).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["subject"], "planning");
    assert_eq!(json["priority"], "critical");
    assert_eq!(json["start"]["time"], 900);

    let decoded: Meeting = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, meeting);
}

#[test]
fn deserialize_rejects_reversed_meeting_span() {
    let value = serde_json::json!({
        "id": 1,
        "subject": "backwards",
        "priority": "non_critical",
        "start": { "week": 1, "day": 2, "time": 1000 },
        "end": { "week": 1, "day": 1, "time": 1000 }
    });
    let err = serde_json::from_value::<Meeting>(value).unwrap_err();
    assert!(err.to_string().contains("must be after start"), "unexpected error: {err}");
}

#[test]
fn meeting_requires_positive_duration() {
    let err = Meeting::new("x", Priority::NonCritical, tp(1, 3, 1000), tp(1, 3, 1000)).unwrap_err();
    assert_eq!(
        err,
        MeetingValidationError::NonPositiveDuration {
            start: tp(1, 3, 1000),
            end: tp(1, 3, 1000),
        }
    );
}
