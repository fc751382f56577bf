use time_span::time::{
    MINUTES_PER_DAY, TimeOfDay, add_minutes, decrement_by_one_minute, difference,
    from_time_of_day, increment_by_one_minute, is_valid_time12, to_time_of_day,
};

fn all_times() -> impl Iterator<Item = String> {
    (0..MINUTES_PER_DAY).map(|m| from_time_of_day(TimeOfDay::from_minutes(m)))
}

#[test]
fn round_trip_every_minute() {
    for m in 0..MINUTES_PER_DAY {
        let t = TimeOfDay::from_minutes(m);
        assert_eq!(to_time_of_day(&from_time_of_day(t)), Some(t));
        assert_eq!(i64::from(t.minutes()), m);
    }
}

#[test]
fn difference_stays_in_range() {
    let sample: Vec<String> = all_times().step_by(37).collect();
    for start in &sample {
        assert_eq!(difference(start, start), Some(0));
        for end in &sample {
            let d = difference(start, end).expect("valid pair");
            assert!(d < 1440, "{} -> {} gave {}", start, end, d);
            // Adding the difference back lands on the end time.
            assert_eq!(add_minutes(start, i64::from(d)).as_deref(), Some(end.as_str()));
        }
    }
}

#[test]
fn wraparound_examples() {
    assert_eq!(add_minutes("11:59 PM", 1).as_deref(), Some("12:00 AM"));
    assert_eq!(
        add_minutes("12:00 AM", (-1i64).rem_euclid(MINUTES_PER_DAY)).as_deref(),
        Some("11:59 PM")
    );
    assert_eq!(difference("11:00 PM", "01:00 AM"), Some(120));
    assert_eq!(difference("01:00 AM", "11:00 PM"), Some(1320));
}

#[test]
fn large_and_negative_deltas_reduce_modulo_a_day() {
    assert_eq!(add_minutes("09:00 AM", 1440).as_deref(), Some("09:00 AM"));
    assert_eq!(add_minutes("09:00 AM", 10_000).as_deref(), Some("07:40 AM"));
    assert_eq!(add_minutes("09:00 AM", -10_000).as_deref(), Some("10:20 AM"));
    assert_eq!(add_minutes("09:00 AM", i64::MAX).map(|s| is_valid_time12(&s)), Some(true));
}

#[test]
fn midnight_and_noon() {
    assert_eq!(to_time_of_day("12:00 AM").map(TimeOfDay::minutes), Some(0));
    assert_eq!(to_time_of_day("12:00 PM").map(TimeOfDay::minutes), Some(720));
    assert_eq!(from_time_of_day(TimeOfDay::from_minutes(0)), "12:00 AM");
    assert_eq!(from_time_of_day(TimeOfDay::from_minutes(720)), "12:00 PM");
}

#[test]
fn invalid_inputs_are_rejected_quietly() {
    assert!(!is_valid_time12("13:00 AM"));
    assert_eq!(difference("13:00 AM", "01:00 PM"), None);
    assert_eq!(add_minutes("13:00 AM", 5), None);
    assert_eq!(to_time_of_day("9:30"), None);
}

#[test]
fn spinner_full_circle() {
    let mut t = "12:00 AM".to_string();
    for _ in 0..MINUTES_PER_DAY {
        t = increment_by_one_minute(&t).unwrap();
    }
    assert_eq!(t, "12:00 AM");

    let t = decrement_by_one_minute("12:00 AM").unwrap();
    assert_eq!(t, "11:59 PM");
}
