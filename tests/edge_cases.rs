//! Edge case tests for chatlens
//!
//! These tests cover boundary conditions that the unit tests in each module
//! do not: empty inputs, degenerate conversations and unusual line shapes.

use chatlens::Message;
use chatlens::config::{AnalysisConfig, FunnelConfig};
use chatlens::core::classifier::{Category, MatchPolicy, Taxonomy};
use chatlens::core::conversation::{Conversation, group};
use chatlens::core::metrics::{
    daily_histogram, funnel, hourly_histogram, keyword_mentions, response_latency,
    sender_frequency, unanswered_conversations, weekday_histogram,
};
use chatlens::corpus::Corpus;
use chatlens::message::Operator;
use chatlens::parser::{ChatLogParser, clean_sender, parse};
use chatlens::report::analyze;
use chrono::NaiveDate;

fn msg(convo: &str, day: u32, h: u32, m: u32, sender: &str, body: &str) -> Message {
    let ts = NaiveDate::from_ymd_opt(2023, 2, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap();
    Message::new(ts, sender, body, convo)
}

// =========================================================================
// Empty inputs
// =========================================================================

#[test]
fn test_metrics_over_nothing() {
    let none: Vec<Message> = Vec::new();
    let op = Operator::new("Shop");
    let convos: Vec<Conversation> = Vec::new();

    assert!(sender_frequency(&none, 10).is_empty());
    assert_eq!(hourly_histogram(&none).len(), 24);
    assert!(daily_histogram(&none).is_empty());
    assert_eq!(weekday_histogram(&none).total(), 0);
    assert!(response_latency(&convos, &op, 360.0).is_empty());
    assert_eq!(funnel(&convos, &op, &FunnelConfig::default()).contacted, 0);
    assert!(
        unanswered_conversations(&convos, &op, &Taxonomy::default(), 5, "other").is_empty()
    );
}

#[test]
fn test_empty_report_has_no_data() {
    let report = analyze(&Corpus::default(), &AnalysisConfig::new());
    assert!(report.is_empty());
    assert_eq!(report.latency.mean(), None);
    assert_eq!(report.latency.median(), None);
    assert_eq!(report.funnel.percent_of_total(0), None);
}

#[test]
fn test_parse_only_noise() {
    let report = ChatLogParser::new().parse_str(
        "Messages and calls are end-to-end encrypted.\n\n\n<Media omitted>\n",
        "noise.txt",
    );
    assert!(report.messages.is_empty());
    assert_eq!(report.skipped_lines, 2);
}

// =========================================================================
// Line shapes
// =========================================================================

#[test]
fn test_sender_stops_at_first_colon_space() {
    let messages = parse(["01/02/23 09.00 - Alice: note: bring samples"], "a.txt");
    assert_eq!(messages[0].sender, "Alice");
    assert_eq!(messages[0].body, "note: bring samples");
}

#[test]
fn test_single_digit_date_and_hour() {
    let messages = parse(["1/2/23 9.05 - Alice: hi"], "a.txt");
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].timestamp,
        NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    );
}

#[test]
fn test_impossible_date_is_dropped() {
    let report = ChatLogParser::new().parse_lines(["31/02/23 09.00 - Alice: hi"], "a.txt");
    assert!(report.messages.is_empty());
    assert_eq!(report.invalid_timestamps, 1);
    assert_eq!(report.skipped_lines, 0);
}

#[test]
fn test_crlf_line_endings() {
    let report = ChatLogParser::new().parse_str(
        "01/02/23 09.00 - Alice: hi\r\n01/02/23 09.01 - Bob: yo\r\n",
        "a.txt",
    );
    assert_eq!(report.messages.len(), 2);
    assert_eq!(report.messages[1].body, "yo");
}

#[test]
fn test_sender_of_only_invisible_chars() {
    assert_eq!(clean_sender("\u{200f}\u{2066}\u{2069}"), "");
}

// =========================================================================
// Degenerate conversations
// =========================================================================

#[test]
fn test_singleton_conversation() {
    let op = Operator::new("Shop");
    let convos = group(vec![msg("a.txt", 1, 9, 0, "Alice", "hi")]);

    assert!(response_latency(convos.values(), &op, 360.0).is_empty());
    assert!(
        unanswered_conversations(convos.values(), &op, &Taxonomy::default(), 5, "other")
            .is_empty()
    );
    assert_eq!(funnel(convos.values(), &op, &FunnelConfig::default()).contacted, 1);
}

#[test]
fn test_same_minute_reply_is_not_a_latency() {
    let op = Operator::new("Shop");
    let convos = group(vec![
        msg("a.txt", 1, 9, 0, "Alice", "hi"),
        msg("a.txt", 1, 9, 0, "Shop", "hello"),
    ]);
    assert!(response_latency(convos.values(), &op, 360.0).is_empty());
}

#[test]
fn test_zero_gap_pair_skipped_for_later_pair() {
    let op = Operator::new("Shop");
    let convos = group(vec![
        msg("a.txt", 1, 9, 0, "Alice", "hi"),
        msg("a.txt", 1, 9, 0, "Shop", "hello"),
        msg("a.txt", 1, 10, 0, "Alice", "price?"),
        msg("a.txt", 1, 10, 20, "Shop", "50"),
    ]);
    let latency = response_latency(convos.values(), &op, 360.0);
    assert_eq!(latency.filtered_minutes(), vec![20.0]);
}

#[test]
fn test_latency_threshold_is_exclusive() {
    let op = Operator::new("Shop");
    let convos = group(vec![
        msg("a.txt", 1, 9, 0, "Alice", "hi"),
        msg("a.txt", 1, 15, 0, "Shop", "sorry, late"),
    ]);
    let latency = response_latency(convos.values(), &op, 360.0);
    assert_eq!(latency.raw.len(), 1);
    assert_eq!(latency.raw[0].minutes, 360.0);
    assert!(latency.filtered_minutes().is_empty());
    assert_eq!(latency.excluded(), 1);
}

#[test]
fn test_out_of_order_input_is_sorted() {
    let op = Operator::new("Shop");
    let convos = group(vec![
        msg("a.txt", 1, 9, 30, "Shop", "answer"),
        msg("a.txt", 1, 9, 0, "Alice", "question"),
    ]);
    let convo = &convos["a.txt"];
    assert!(convo.is_sorted());
    assert_eq!(convo.messages()[0].sender, "Alice");
    assert_eq!(
        response_latency(convos.values(), &op, 360.0).filtered_minutes(),
        vec![30.0]
    );
}

#[test]
fn test_operator_name_is_case_sensitive() {
    let op = Operator::new("Shop");
    let convos = group(vec![
        msg("a.txt", 1, 9, 0, "Alice", "hi"),
        msg("a.txt", 1, 9, 5, "shop", "hello"),
    ]);
    assert!(response_latency(convos.values(), &op, 360.0).is_empty());
}

#[test]
fn test_stage_three_can_exceed_stage_two() {
    let op = Operator::new("Shop");
    let stages = FunnelConfig {
        discussion: Category::new("discussion", ["never-said"]),
        conversion: Category::new("conversion", ["address"]),
        case_fold: true,
    };
    let convos = group(vec![
        msg("a.txt", 1, 9, 0, "Alice", "hi"),
        msg("a.txt", 1, 9, 5, "Shop", "Your ADDRESS please"),
    ]);
    let report = funnel(convos.values(), &op, &stages);
    assert_eq!(report.discussed, 0);
    assert_eq!(report.converting, 1);
}

#[test]
fn test_customer_keyword_does_not_count_for_conversion() {
    let op = Operator::new("Shop");
    let stages = FunnelConfig {
        discussion: Category::new("discussion", ["price"]),
        conversion: Category::new("conversion", ["address"]),
        case_fold: true,
    };
    let convos = group(vec![msg("a.txt", 1, 9, 0, "Alice", "my address is ...")]);
    assert_eq!(funnel(convos.values(), &op, &stages).converting, 0);
}

// =========================================================================
// Classification
// =========================================================================

#[test]
fn test_keyword_mentions_drops_zero_rows() {
    let tax = Taxonomy::new(MatchPolicy::FirstMatch, true)
        .with_category(Category::new("Kuwait", ["kuwait"]))
        .with_category(Category::new("Doha", ["doha"]));
    let messages = vec![msg("a.txt", 1, 9, 0, "Alice", "ship to Kuwait")];
    let table = keyword_mentions(&messages, &tax);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("Kuwait"), Some(1));
    assert_eq!(table.get("Doha"), None);
}

#[test]
fn test_sender_frequency_ties_keep_first_seen() {
    let messages = vec![
        msg("a.txt", 1, 9, 0, "Zed", "1"),
        msg("a.txt", 1, 9, 1, "Amy", "2"),
        msg("a.txt", 1, 9, 2, "Amy", "3"),
        msg("a.txt", 1, 9, 3, "Zed", "4"),
        msg("a.txt", 1, 9, 4, "Bob", "5"),
    ];
    let table = sender_frequency(&messages, 2);
    let labels: Vec<_> = table.labels().collect();
    assert_eq!(labels, vec!["Zed", "Amy"]);
}
