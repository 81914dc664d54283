//! Spaced-repetition review scheduling.
//!
//! Pure functions of (catalog, day): no side effects, no hidden state, safe
//! to call concurrently. A concept is due on a day iff the elapsed days since
//! its introduction exactly equal one of the fixed intervals — there is no
//! catch-up for missed days.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ConceptCatalog;
use crate::domain::{Concept, ConceptCategory};

/// Review day-offsets relative to introduction: J+1, J+3, J+7, J+14, J+30.
/// Strictly increasing; the same sequence applies to every concept.
pub const REVIEW_INTERVALS: [u32; 5] = [1, 3, 7, 14, 30];

/// How urgent a review is. Variant order doubles as the sort order
/// (high before medium before low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// A due reminder for one concept on one specific day. Derived, never stored.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub concept: Concept,
    /// 1-based index of the matched interval (1st review, 2nd, ...).
    pub review_number: usize,
    pub days_since_introduction: u32,
    pub importance: Importance,
}

/// Importance by 0-based interval index. The first two reviews (J+1, J+3)
/// are the initial consolidation window and both count as high; J+7 is
/// medium; by J+14 the concept is considered well anchored.
fn importance_for_interval(index: usize) -> Importance {
    match index {
        0 | 1 => Importance::High,
        2 => Importance::Medium,
        _ => Importance::Low,
    }
}

/// All reviews due on `current_day`, sorted high → medium → low.
/// Ties keep catalog order (the sort is stable). A day of 0 yields an empty
/// list since no concept is introduced before day 1.
pub fn reviews_for_day(catalog: &ConceptCatalog, current_day: u32) -> Vec<Review> {
    let mut reviews: Vec<Review> = Vec::new();

    for concept in catalog.all() {
        if concept.introduced_on_day > current_day {
            continue;
        }
        let days_since = current_day - concept.introduced_on_day;

        for (index, interval) in REVIEW_INTERVALS.iter().enumerate() {
            if days_since == *interval {
                reviews.push(Review {
                    concept: concept.clone(),
                    review_number: index + 1,
                    days_since_introduction: days_since,
                    importance: importance_for_interval(index),
                });
            }
        }
    }

    reviews.sort_by_key(|r| r.importance);
    reviews
}

/// The next scheduled review day for a concept that has already had
/// `reviews_done` reviews, or None once the sequence is exhausted.
pub fn next_review_day(introduced_day: u32, reviews_done: usize) -> Option<u32> {
    REVIEW_INTERVALS
        .get(reviews_done)
        .map(|interval| introduced_day + interval)
}

/// Whether a specific concept is due on `current_day`.
pub fn should_review_today(catalog: &ConceptCatalog, concept_id: &str, current_day: u32) -> bool {
    reviews_for_day(catalog, current_day)
        .iter()
        .any(|r| r.concept.id == concept_id)
}

/// Every day on which a concept will come up for review.
pub fn review_schedule(catalog: &ConceptCatalog, concept_id: &str) -> Vec<u32> {
    match catalog.get(concept_id) {
        Some(c) => REVIEW_INTERVALS
            .iter()
            .map(|interval| c.introduced_on_day + interval)
            .collect(),
        None => Vec::new(),
    }
}

/// Aggregate counts over one day's reviews.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub by_category: HashMap<ConceptCategory, usize>,
}

pub fn review_stats(catalog: &ConceptCatalog, current_day: u32) -> ReviewStats {
    let reviews = reviews_for_day(catalog, current_day);
    let mut stats = ReviewStats {
        total: reviews.len(),
        ..ReviewStats::default()
    };
    for r in &reviews {
        match r.importance {
            Importance::High => stats.high += 1,
            Importance::Medium => stats.medium += 1,
            Importance::Low => stats.low += 1,
        }
        *stats.by_category.entry(r.concept.category).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Concept;

    fn single_concept_catalog(id: &str, day: u32) -> ConceptCatalog {
        catalog_of(&[(id, day)])
    }

    fn catalog_of(entries: &[(&str, u32)]) -> ConceptCatalog {
        ConceptCatalog::from_concepts(entries.iter().map(|(id, day)| Concept {
            id: id.to_string(),
            name: id.to_string(),
            category: ConceptCategory::C,
            introduced_on_day: *day,
            short_description: String::new(),
            key_points: vec![],
            quick_review: None,
        }))
    }

    #[test]
    fn reviews_fall_exactly_on_intervals() {
        let catalog = single_concept_catalog("printf", 1);
        // Introduced day 1: due on days 2, 4, 8, 15, 31 and nowhere else.
        for day in [2u32, 4, 8, 15, 31] {
            let reviews = reviews_for_day(&catalog, day);
            assert_eq!(reviews.len(), 1, "expected one review on day {day}");
            assert_eq!(reviews[0].concept.id, "printf");
        }
        for day in [1u32, 3, 5, 9, 16, 32, 100] {
            assert!(
                reviews_for_day(&catalog, day).is_empty(),
                "no review expected on day {day}"
            );
        }
    }

    #[test]
    fn no_duplicate_review_for_same_day() {
        let catalog = single_concept_catalog("printf", 1);
        for day in 1..=40 {
            let count = reviews_for_day(&catalog, day)
                .iter()
                .filter(|r| r.concept.id == "printf")
                .count();
            assert!(count <= 1, "day {day} produced {count} reviews");
        }
    }

    #[test]
    fn scenario_day_four_review() {
        let catalog = single_concept_catalog("printf", 1);
        let reviews = reviews_for_day(&catalog, 4);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].days_since_introduction, 3);
        assert_eq!(reviews[0].review_number, 2);
        assert_eq!(reviews[0].importance, Importance::High);
        assert!(reviews_for_day(&catalog, 5).is_empty());
    }

    // Both J+1 and J+3 are high importance: the first two reviews form the
    // initial consolidation window. Deliberate: an earlier rendition of the
    // tiering demoted J+3 to medium, contradicting its own description of
    // the tiers. See DESIGN.md.
    #[test]
    fn second_review_is_high_importance() {
        assert_eq!(importance_for_interval(0), Importance::High);
        assert_eq!(importance_for_interval(1), Importance::High);
        assert_eq!(importance_for_interval(2), Importance::Medium);
        assert_eq!(importance_for_interval(3), Importance::Low);
        assert_eq!(importance_for_interval(4), Importance::Low);
    }

    #[test]
    fn output_sorted_by_importance_with_stable_ties() {
        // Day 31: "a" (day 1) hits J+30 (low), "b" (day 24) hits J+7
        // (medium), "c" (day 30) and "d" (day 28) hit J+1/J+3 (high).
        let catalog = catalog_of(&[("a", 1), ("b", 24), ("c", 30), ("d", 28)]);
        let reviews = reviews_for_day(&catalog, 31);
        let ids: Vec<&str> = reviews.iter().map(|r| r.concept.id.as_str()).collect();
        // Highs first in catalog order, then medium, then low.
        assert_eq!(ids, vec!["c", "d", "b", "a"]);
        let ranks: Vec<Importance> = reviews.iter().map(|r| r.importance).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn day_zero_yields_empty() {
        let catalog = single_concept_catalog("printf", 1);
        assert!(reviews_for_day(&catalog, 0).is_empty());
    }

    #[test]
    fn next_review_day_walks_the_interval_set() {
        assert_eq!(next_review_day(1, 0), Some(2));
        assert_eq!(next_review_day(1, 1), Some(4));
        assert_eq!(next_review_day(1, 4), Some(31));
        assert_eq!(next_review_day(1, 5), None);
    }

    #[test]
    fn schedule_and_should_review() {
        let catalog = single_concept_catalog("printf", 2);
        assert_eq!(review_schedule(&catalog, "printf"), vec![3, 5, 9, 16, 32]);
        assert!(review_schedule(&catalog, "unknown").is_empty());
        assert!(should_review_today(&catalog, "printf", 3));
        assert!(!should_review_today(&catalog, "printf", 4));
    }

    #[test]
    fn stats_count_importance_and_categories() {
        let catalog = catalog_of(&[("a", 1), ("b", 24), ("c", 30)]);
        let stats = review_stats(&catalog, 31);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high, 1);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.by_category.get(&ConceptCategory::C), Some(&3));
    }
}
