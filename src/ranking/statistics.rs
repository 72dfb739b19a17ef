use super::types::{ItemId, ItemStats, Position};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let squared: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (squared / (values.len() - 1) as f64).sqrt()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 1.0 for identical positions, falling linearly to 0.0 at `max_diff_reference`.
pub fn similarity(abs_diff: f64, max_diff_reference: f64) -> f64 {
    (1.0 - abs_diff / max_diff_reference).max(0.0)
}

pub fn item_stats(positions: &[Position]) -> ItemStats {
    let values: Vec<f64> = positions.iter().map(|&p| f64::from(p)).collect();
    ItemStats {
        avg_rank: mean(&values),
        std_dev_rank: sample_std_dev(&values),
        votes: values.len(),
    }
}

/// Item with the smallest value. Ties keep the first item seen, so callers
/// iterating in ascending id order get the lowest id.
pub fn argmin<I>(values: I) -> Option<ItemId>
where
    I: IntoIterator<Item = (ItemId, f64)>,
{
    pick(values, |candidate, best| candidate < best)
}

/// Item with the largest value, same tie policy as [`argmin`].
pub fn argmax<I>(values: I) -> Option<ItemId>
where
    I: IntoIterator<Item = (ItemId, f64)>,
{
    pick(values, |candidate, best| candidate > best)
}

fn pick<I, F>(values: I, replaces: F) -> Option<ItemId>
where
    I: IntoIterator<Item = (ItemId, f64)>,
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<(ItemId, f64)> = None;
    for (id, value) in values {
        match best {
            Some((_, best_value)) if !replaces(value, best_value) => {}
            _ => best = Some((id, value)),
        }
    }
    best.map(|(id, _)| id)
}
