use chrono::NaiveTime;
use rstest::rstest;
use slotwise_api::config::{parse_clock_time, parse_log_level};
use tracing::Level;

#[rstest]
#[case("trace", Level::TRACE)]
#[case("debug", Level::DEBUG)]
#[case("warn", Level::WARN)]
#[case("error", Level::ERROR)]
#[case("verbose", Level::INFO)]
fn test_parse_log_level(#[case] value: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(value), expected);
}

#[rstest]
#[case("08:00", NaiveTime::from_hms_opt(8, 0, 0).unwrap())]
#[case(" 19:30 ", NaiveTime::from_hms_opt(19, 30, 0).unwrap())]
#[case("20:00:00", NaiveTime::from_hms_opt(20, 0, 0).unwrap())]
fn test_parse_clock_time(#[case] value: &str, #[case] expected: NaiveTime) {
    assert_eq!(parse_clock_time(value).unwrap(), expected);
}

#[test]
fn test_parse_clock_time_rejects_garbage() {
    assert!(parse_clock_time("noon").is_err());
    assert!(parse_clock_time("25:00").is_err());
}
