//! Metric result types handed to the export layer.
//!
//! Every metric produces one of these typed values instead of pre-formatted
//! strings. Writers in [`core::output`](crate::core::output) decide on
//! headers, delimiters and encodings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    /// Category, sender, day, hour... depending on the metric.
    pub label: String,
    /// Number of messages, mentions or conversations.
    pub count: usize,
}

/// An ordered label → count table.
///
/// Row order is meaningful (rank, taxonomy order or calendar order) and is
/// preserved by every operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable {
    rows: Vec<CountRow>,
}

impl CountTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, label: impl Into<String>, count: usize) {
        self.rows.push(CountRow {
            label: label.into(),
            count,
        });
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[CountRow] {
        &self.rows
    }

    /// Returns the labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    /// Looks up the count for a label.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.count)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Drops rows with a zero count.
    #[must_use]
    pub fn without_zeros(mut self) -> Self {
        self.rows.retain(|r| r.count > 0);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for CountTable {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(label, count)| CountRow {
                    label: label.into(),
                    count,
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CountTable {
    type Item = &'a CountRow;
    type IntoIter = std::slice::Iter<'a, CountRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// One seller response-time measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyObservation {
    /// Conversation the measurement comes from.
    pub conversation_id: String,
    /// Minutes between the customer message and the operator reply.
    pub minutes: f64,
}

/// Response latency, raw and with slow outliers removed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Outlier cutoff in minutes; values at or above it are filtered out.
    pub threshold_minutes: f64,
    /// Every positive observation, one per conversation at most.
    pub raw: Vec<LatencyObservation>,
}

impl LatencyReport {
    /// Observations strictly below the threshold.
    pub fn filtered(&self) -> impl Iterator<Item = &LatencyObservation> {
        self.raw
            .iter()
            .filter(move |o| o.minutes < self.threshold_minutes)
    }

    /// Filtered values in minutes.
    pub fn filtered_minutes(&self) -> Vec<f64> {
        self.filtered().map(|o| o.minutes).collect()
    }

    /// Number of observations dropped as outliers.
    pub fn excluded(&self) -> usize {
        self.raw.len() - self.filtered().count()
    }

    /// Mean of the filtered view, `None` when it is empty.
    pub fn mean(&self) -> Option<f64> {
        let values = self.filtered_minutes();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Median of the filtered view, `None` when it is empty.
    pub fn median(&self) -> Option<f64> {
        let mut values = self.filtered_minutes();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Some((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Some(values[mid])
        }
    }

    /// Returns `true` if nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Conversation counts for the three engagement stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunnelReport {
    /// Stage 1: every distinct conversation.
    pub contacted: usize,
    /// Stage 2: any message (either side) mentions a discussion keyword.
    pub discussed: usize,
    /// Stage 3: an operator message mentions a conversion keyword.
    pub converting: usize,
}

impl FunnelReport {
    /// Stage labels, in order.
    pub const STAGES: [&'static str; 3] = [
        "1. Initial contact",
        "2. Further discussion (price/type)",
        "3. Potential conversion (address requested)",
    ];

    /// Counts in stage order.
    pub fn counts(&self) -> [usize; 3] {
        [self.contacted, self.discussed, self.converting]
    }

    /// Share of stage-1 conversations, in percent. `None` when there are none.
    pub fn percent_of_total(&self, count: usize) -> Option<f64> {
        if self.contacted == 0 {
            return None;
        }
        Some(count as f64 / self.contacted as f64 * 100.0)
    }

    /// The funnel as a count table with stage labels.
    pub fn to_table(&self) -> CountTable {
        Self::STAGES.into_iter().zip(self.counts()).collect()
    }
}

/// A conversation whose last word was the operator's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredConversation {
    /// Source file.
    pub conversation_id: String,
    /// Timestamp of the operator's final message.
    pub last_message_at: NaiveDateTime,
    /// Drop-off category derived from the trailing context.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(minutes: f64) -> LatencyObservation {
        LatencyObservation {
            conversation_id: "c.txt".into(),
            minutes,
        }
    }

    #[test]
    fn test_count_table_basics() {
        let mut table = CountTable::new();
        table.push("a", 2);
        table.push("b", 0);
        table.push("c", 5);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 7);
        assert_eq!(table.get("c"), Some(5));
        assert_eq!(table.get("z"), None);

        let trimmed = table.without_zeros();
        assert_eq!(trimmed.labels().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_count_table_serializes_as_list() {
        let table: CountTable = [("Mon", 3)].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"label":"Mon","count":3}]"#);
    }

    #[test]
    fn test_latency_filtered_and_mean() {
        let report = LatencyReport {
            threshold_minutes: 360.0,
            raw: vec![obs(5.0), obs(15.0), obs(360.0), obs(1000.0)],
        };
        assert_eq!(report.filtered_minutes(), vec![5.0, 15.0]);
        assert_eq!(report.excluded(), 2);
        assert_eq!(report.mean(), Some(10.0));
        assert_eq!(report.median(), Some(10.0));
    }

    #[test]
    fn test_latency_median_odd() {
        let report = LatencyReport {
            threshold_minutes: 360.0,
            raw: vec![obs(30.0), obs(1.0), obs(4.0)],
        };
        assert_eq!(report.median(), Some(4.0));
    }

    #[test]
    fn test_latency_empty() {
        let report = LatencyReport {
            threshold_minutes: 360.0,
            raw: vec![],
        };
        assert!(report.is_empty());
        assert_eq!(report.mean(), None);
        assert_eq!(report.median(), None);
        assert_eq!(report.excluded(), 0);
    }

    #[test]
    fn test_latency_all_outliers_has_no_mean() {
        let report = LatencyReport {
            threshold_minutes: 360.0,
            raw: vec![obs(400.0)],
        };
        assert!(!report.is_empty());
        assert_eq!(report.mean(), None);
    }

    #[test]
    fn test_funnel_percentages() {
        let funnel = FunnelReport {
            contacted: 4,
            discussed: 2,
            converting: 1,
        };
        assert_eq!(funnel.percent_of_total(2), Some(50.0));
        assert_eq!(funnel.to_table().get(FunnelReport::STAGES[2]), Some(1));
        assert_eq!(FunnelReport::default().percent_of_total(0), None);
    }
}
