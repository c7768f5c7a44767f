//! Keyword classification by substring containment.
//!
//! A [`Taxonomy`] is an ordered list of [`Category`] entries, each with a
//! label and a list of literal keywords. Text matches a category when it
//! contains any of the category's keywords. What happens when several
//! categories match is decided by the taxonomy's [`MatchPolicy`]:
//!
//! | Policy | Result |
//! |--------|--------|
//! | [`FirstMatch`](MatchPolicy::FirstMatch) | only the earliest matching category |
//! | [`AllMatches`](MatchPolicy::AllMatches) | every matching category, once each |
//!
//! Order therefore matters for first-match taxonomies: list specific
//! categories before general ones.
//!
//! # Example
//!
//! ```
//! use chatlens::core::classifier::{Category, MatchPolicy, Taxonomy};
//!
//! let taxonomy = Taxonomy::new(MatchPolicy::FirstMatch, true)
//!     .with_category(Category::new("Price", ["price", "cost"]))
//!     .with_category(Category::new("Shipping", ["ship", "price list"]));
//!
//! assert_eq!(taxonomy.classify("What PRICE and shipping?"), vec!["Price"]);
//! assert!(taxonomy.classify("hello").is_empty());
//! ```

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::models::CountTable;

/// How many categories a single text may be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Stop at the first category (in taxonomy order) that matches.
    #[default]
    FirstMatch,
    /// Report every category that matches.
    AllMatches,
}

/// A labelled keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Label reported when the category matches.
    pub label: String,
    /// Literal substrings; any one of them is enough.
    pub keywords: Vec<String>,
}

impl Category {
    /// Creates a category from a label and keywords.
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `text` contains any keyword.
    ///
    /// With `case_fold`, both sides are lowercased before comparing.
    /// Empty keywords never match.
    pub fn matches(&self, text: &str, case_fold: bool) -> bool {
        self.contains_any(&prepare(text, case_fold), case_fold)
    }

    /// `haystack` must already be lowercase when `case_fold` is set.
    fn contains_any(&self, haystack: &str, case_fold: bool) -> bool {
        self.keywords.iter().any(|kw| {
            if kw.is_empty() {
                false
            } else if case_fold {
                haystack.contains(kw.to_lowercase().as_str())
            } else {
                haystack.contains(kw.as_str())
            }
        })
    }
}

fn prepare(text: &str, case_fold: bool) -> Cow<'_, str> {
    if case_fold {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// An ordered set of categories with a match policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    /// How many categories one text can receive.
    #[serde(default)]
    pub policy: MatchPolicy,

    /// Compare case-insensitively.
    #[serde(default)]
    pub case_fold: bool,

    /// Categories in priority order.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Taxonomy {
    /// Creates an empty taxonomy.
    pub fn new(policy: MatchPolicy, case_fold: bool) -> Self {
        Self {
            policy,
            case_fold,
            categories: Vec::new(),
        }
    }

    /// Appends a category (lowest priority so far).
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Returns the category labels in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.label.as_str())
    }

    /// Classifies `text` according to the taxonomy's policy.
    ///
    /// Under [`MatchPolicy::FirstMatch`] the result has at most one label.
    /// Under [`MatchPolicy::AllMatches`] each matching category appears once,
    /// however many of its keywords occur.
    pub fn classify(&self, text: &str) -> Vec<&str> {
        let haystack = prepare(text, self.case_fold);
        let mut labels = Vec::new();
        for category in &self.categories {
            if category.contains_any(&haystack, self.case_fold) {
                labels.push(category.label.as_str());
                if self.policy == MatchPolicy::FirstMatch {
                    break;
                }
            }
        }
        labels
    }

    /// Returns the first label that appears more than once, if any.
    pub fn duplicate_label(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.labels().find(|label| !seen.insert(*label))
    }

    /// Returns the first matching category, ignoring the policy.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = prepare(text, self.case_fold);
        self.categories
            .iter()
            .find(|c| c.contains_any(&haystack, self.case_fold))
            .map(|c| c.label.as_str())
    }

    /// Counts classifications over many texts.
    ///
    /// The table lists every category in taxonomy order, including those
    /// with a zero count.
    pub fn tally<'t, I>(&self, texts: I) -> CountTable
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut counts = vec![0usize; self.categories.len()];
        for text in texts {
            for label in self.classify(text) {
                if let Some(idx) = self.categories.iter().position(|c| c.label == label) {
                    counts[idx] += 1;
                }
            }
        }

        self.labels()
            .zip(counts)
            .map(|(label, count)| (label.to_string(), count))
            .collect()
    }
}
