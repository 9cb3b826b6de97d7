//! Keyword routing for the site chat widget.
//!
//! The widget owns the canned answer text; the server only names the topic.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Courses,
    Fees,
    Duration,
    Internship,
    Certifications,
    Placement,
    Location,
    AiTools,
    Greeting,
    Thanks,
    General,
}

#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Any needle appears anywhere in the lowercased message.
    AnyContains(&'static [&'static str]),
    /// Any needle equals a whole word of the lowercased message.
    AnyWord(&'static [&'static str]),
}

impl Predicate {
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::AnyContains(needles) => needles.iter().any(|needle| lowered.contains(needle)),
            Self::AnyWord(needles) => lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| needles.contains(&word)),
        }
    }
}

/// Checked in order; the first matching rule decides the topic.
pub const RULES: &[(Predicate, Topic)] = &[
    (Predicate::AnyContains(&["course", "program", "learn"]), Topic::Courses),
    (Predicate::AnyContains(&["fee", "cost", "price"]), Topic::Fees),
    (Predicate::AnyWord(&["pay", "payment", "emi"]), Topic::Fees),
    (Predicate::AnyContains(&["duration"]), Topic::Duration),
    (Predicate::AnyWord(&["long", "time", "month", "months", "weeks"]), Topic::Duration),
    (Predicate::AnyContains(&["intern", "infopark"]), Topic::Internship),
    (Predicate::AnyWord(&["job", "jobs"]), Topic::Internship),
    (Predicate::AnyContains(&["certif", "google", "hubspot"]), Topic::Certifications),
    (Predicate::AnyContains(&["placement", "hire", "hiring", "career"]), Topic::Placement),
    (Predicate::AnyContains(&["location", "address", "wayanad", "mananthavady"]), Topic::Location),
    (Predicate::AnyWord(&["where"]), Topic::Location),
    (Predicate::AnyContains(&["chatgpt", "artificial", "midjourney"]), Topic::AiTools),
    (Predicate::AnyWord(&["ai"]), Topic::AiTools),
    (Predicate::AnyWord(&["hi", "hello", "hey", "namaste"]), Topic::Greeting),
    (Predicate::AnyContains(&["thank"]), Topic::Thanks),
];

pub fn classify(message: &str) -> Topic {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(predicate, _)| predicate.matches(&lowered))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::General)
}
