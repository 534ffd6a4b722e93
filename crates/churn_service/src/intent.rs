//! Query intent extraction
//!
//! A small pure function mapping free-text queries onto a bounded record
//! selection and an optional segment filter. Keyword and number parsing
//! only; no general natural-language understanding. Queries with no
//! actionable parameter fall back to the default window instead of
//! failing.

/// Which slice of the source data a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSelection {
    /// The most recent `n` records in source order.
    LastN(usize),
    /// Every record the source holds.
    All,
}

/// A field/value equality filter mentioned in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentFilter {
    /// Wire name of the filtered field.
    pub field: &'static str,
    /// Canonical category value.
    pub value: &'static str,
}

/// Parsed query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    pub selection: RecordSelection,
    pub segment: Option<SegmentFilter>,
}

/// Keyword table mapping query phrases to canonical segment filters.
/// First match wins; phrases are matched against the lowercased query.
const SEGMENT_KEYWORDS: [(&str, SegmentFilter); 10] = [
    (
        "month-to-month",
        SegmentFilter {
            field: "Contract",
            value: "Month-to-month",
        },
    ),
    (
        "month to month",
        SegmentFilter {
            field: "Contract",
            value: "Month-to-month",
        },
    ),
    (
        "one year",
        SegmentFilter {
            field: "Contract",
            value: "One year",
        },
    ),
    (
        "two year",
        SegmentFilter {
            field: "Contract",
            value: "Two year",
        },
    ),
    (
        "fiber",
        SegmentFilter {
            field: "InternetService",
            value: "Fiber optic",
        },
    ),
    (
        "dsl",
        SegmentFilter {
            field: "InternetService",
            value: "DSL",
        },
    ),
    (
        "no internet",
        SegmentFilter {
            field: "InternetService",
            value: "No",
        },
    ),
    (
        "electronic check",
        SegmentFilter {
            field: "PaymentMethod",
            value: "Electronic check",
        },
    ),
    (
        "mailed check",
        SegmentFilter {
            field: "PaymentMethod",
            value: "Mailed check",
        },
    ),
    (
        "credit card",
        SegmentFilter {
            field: "PaymentMethod",
            value: "Credit card (automatic)",
        },
    ),
];

/// Extract a [`QueryIntent`] from free text.
///
/// Deterministic and side-effect free, so it is testable without the
/// pipeline. Explicit counts are clamped to `[1, max_window]`.
pub fn parse_intent(query: &str, default_window: usize, max_window: usize) -> QueryIntent {
    let lowered = query.to_lowercase();

    let selection = if let Some(n) = first_number(&lowered) {
        RecordSelection::LastN(n.clamp(1, max_window))
    } else if mentions_all(&lowered) {
        RecordSelection::All
    } else {
        RecordSelection::LastN(default_window.clamp(1, max_window))
    };

    let segment = SEGMENT_KEYWORDS
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, filter)| *filter);

    QueryIntent { selection, segment }
}

/// First run of ASCII digits in the text, if any.
fn first_number(text: &str) -> Option<usize> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        None
    } else {
        // Runs too long for usize are treated as "no explicit count".
        digits.parse().ok()
    }
}

/// Whole-word check for "all"-style selections.
fn mentions_all(text: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| matches!(word, "all" | "every" | "entire" | "everyone"))
}
