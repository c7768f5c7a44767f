//! Corpus-wide reductions.
//!
//! Every function here is pure and total: empty inputs yield empty tables,
//! zero counts or `None` averages, never an error. Message-level metrics take
//! whatever slice of messages the caller chooses (the report passes customer
//! messages only); conversation-level metrics look at both parties.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Timelike};

use super::classifier::Taxonomy;
use super::conversation::Conversation;
use super::models::{
    CountTable, FunnelReport, LatencyObservation, LatencyReport, UnansweredConversation,
};
use crate::config::FunnelConfig;
use crate::message::{Message, Operator};

/// Weekday names, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The `top_n` most active senders.
///
/// Senders with equal counts keep the order in which they were first seen.
pub fn sender_frequency<'a, I>(messages: I, top_n: usize) -> CountTable
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for msg in messages {
        let sender = msg.sender.as_str();
        match index.get(sender) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(sender, order.len());
                order.push((sender, 1));
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(top_n).collect()
}

/// Messages per hour of day. Always 24 rows, `"0"` through `"23"`.
pub fn hourly_histogram<'a, I>(messages: I) -> CountTable
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut hours = [0usize; 24];
    for msg in messages {
        hours[msg.timestamp.hour() as usize] += 1;
    }
    hours
        .iter()
        .enumerate()
        .map(|(hour, &count)| (hour.to_string(), count))
        .collect()
}

/// Messages per calendar day, oldest first. Labels are `YYYY-MM-DD`.
///
/// Only days with at least one message appear.
pub fn daily_histogram<'a, I>(messages: I) -> CountTable
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut days = BTreeMap::new();
    for msg in messages {
        *days.entry(msg.timestamp.date()).or_insert(0usize) += 1;
    }
    days.into_iter()
        .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), count))
        .collect()
}

/// Messages per weekday, Monday first. Always 7 rows.
pub fn weekday_histogram<'a, I>(messages: I) -> CountTable
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut days = [0usize; 7];
    for msg in messages {
        days[msg.timestamp.weekday().num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS.into_iter().zip(days).collect()
}

/// Classifies message bodies and counts the categories.
///
/// Follows the taxonomy's own policy and case folding. Categories that were
/// never mentioned are left out; the rest stay in taxonomy order.
pub fn keyword_mentions<'a, I>(messages: I, taxonomy: &Taxonomy) -> CountTable
where
    I: IntoIterator<Item = &'a Message>,
{
    taxonomy
        .tally(messages.into_iter().map(|m| m.body.as_str()))
        .without_zeros()
}

/// Conversations where the operator sent the last message.
///
/// Each one is given a drop-off reason: the first category of `reasons`
/// found in the last `context` messages (joined with spaces), or `fallback`
/// when nothing matches.
pub fn unanswered_conversations<'a, I>(
    conversations: I,
    operator: &Operator,
    reasons: &Taxonomy,
    context: usize,
    fallback: &str,
) -> Vec<UnansweredConversation>
where
    I: IntoIterator<Item = &'a Conversation>,
{
    conversations
        .into_iter()
        .filter_map(|convo| {
            let last = convo.last_message()?;
            if !operator.is(&last.sender) {
                return None;
            }
            let reason = reasons
                .first_match(&convo.tail_text(context))
                .unwrap_or(fallback);
            Some(UnansweredConversation {
                conversation_id: convo.id().to_string(),
                last_message_at: last.timestamp,
                reason: reason.to_string(),
            })
        })
        .collect()
}

/// Tallies drop-off reasons in taxonomy order, `fallback` last.
///
/// Reasons with no conversations are left out.
pub fn drop_off_tally(
    unanswered: &[UnansweredConversation],
    reasons: &Taxonomy,
    fallback: &str,
) -> CountTable {
    reasons
        .labels()
        .chain(std::iter::once(fallback))
        .map(|label| {
            let count = unanswered.iter().filter(|u| u.reason == label).count();
            (label, count)
        })
        .collect::<CountTable>()
        .without_zeros()
}

/// Seller response time, at most one observation per conversation.
///
/// The observation is the first customer → operator adjacency with a
/// positive gap; zero or negative gaps (same-minute replies, clock
/// anomalies) are skipped and the scan moves on to the next adjacency.
pub fn response_latency<'a, I>(
    conversations: I,
    operator: &Operator,
    threshold_minutes: f64,
) -> LatencyReport
where
    I: IntoIterator<Item = &'a Conversation>,
{
    let raw = conversations
        .into_iter()
        .filter_map(|convo| {
            convo.response_pairs(operator).find_map(|(asked, replied)| {
                let seconds = (replied.timestamp - asked.timestamp).num_seconds();
                (seconds > 0).then(|| LatencyObservation {
                    conversation_id: convo.id().to_string(),
                    minutes: seconds as f64 / 60.0,
                })
            })
        })
        .collect();

    LatencyReport {
        threshold_minutes,
        raw,
    }
}

/// Three-stage engagement funnel.
///
/// Stage 2 looks at the whole transcript; stage 3 only at the operator's
/// messages, since it tracks the seller asking for order details. The stages
/// are tested independently, so stage 3 can exceed stage 2.
pub fn funnel<'a, I>(conversations: I, operator: &Operator, stages: &FunnelConfig) -> FunnelReport
where
    I: IntoIterator<Item = &'a Conversation>,
{
    let mut report = FunnelReport::default();
    for convo in conversations {
        report.contacted += 1;
        if stages.discussion.matches(&convo.full_text(), stages.case_fold) {
            report.discussed += 1;
        }
        if stages
            .conversion
            .matches(&convo.operator_text(operator), stages.case_fold)
        {
            report.converting += 1;
        }
    }
    report
}

/// Message count per conversation, by conversation id.
pub fn message_count_per_conversation<'a, I>(conversations: I) -> CountTable
where
    I: IntoIterator<Item = &'a Conversation>,
{
    conversations
        .into_iter()
        .map(|c| (c.id(), c.len()))
        .collect()
}
