//! Rule selection: range filtering, mode selection and the nearest-age fallback.

use crate::models::MedicationRule;

use super::medication_key;

/// Pick the most frequent value, ties broken by first occurrence.
///
/// Values are compared exactly, so "Ibuprofen" and "ibuprofen" count separately.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // (value, count) in first-seen order
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Rules whose temperature and age ranges contain the patient, in table order.
pub fn matching_rules(rules: &[MedicationRule], age: u32, temperature_f: f64) -> Vec<&MedicationRule> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(age, temperature_f))
        .collect()
}

/// Age-ranged rule whose minimum age is closest to `age`, first on ties.
///
/// Returns the rule's table index alongside it.
pub fn nearest_by_age(rules: &[MedicationRule], age: u32) -> Option<(usize, &MedicationRule)> {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.has_age_range())
        .min_by_key(|(_, rule)| rule.age_distance(age))
}

/// Most frequent medication anywhere in the table that differs from `previous_key`.
pub fn alternative_medication<'a>(rules: &'a [MedicationRule], previous_key: &str) -> Option<&'a str> {
    mode(
        rules
            .iter()
            .map(|rule| rule.medication.as_str())
            .filter(|medication| medication_key(medication) != previous_key),
    )
}
