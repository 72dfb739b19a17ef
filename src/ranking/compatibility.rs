use super::statistics::round2;
use super::types::{DivergenceReport, ItemId, PairwiseComparison, SharedPosition, UserId};
use crate::config::settings::CompatibilitySettings;

/// Compares two users' positions over the items both of them ranked.
///
/// `shared` must be in a stable order (the store returns it by item id);
/// extrema ties keep the first item in that order.
pub fn calculate_compatibility(
    user_a: UserId,
    user_b: UserId,
    shared: &[SharedPosition],
    config: &CompatibilitySettings,
) -> PairwiseComparison {
    if user_a == user_b {
        return PairwiseComparison::identical();
    }
    if shared.is_empty() {
        return PairwiseComparison::nothing_shared();
    }

    let mut favorite = Extremum::lowest();
    let mut least_favorite = Extremum::highest();
    let mut most_divergent = Extremum::highest();
    let mut most_concordant = Extremum::lowest();
    let mut total_diff: u64 = 0;

    for item in shared {
        let abs_diff = u64::from(item.position_a.abs_diff(item.position_b));
        let sum_pos = u64::from(item.position_a) + u64::from(item.position_b);
        total_diff += abs_diff;

        favorite.offer(item.item_id, sum_pos);
        least_favorite.offer(item.item_id, sum_pos);
        most_divergent.offer(item.item_id, abs_diff);
        most_concordant.offer(item.item_id, abs_diff);
    }

    let shared_count = shared.len();
    let avg_abs_diff = total_diff as f64 / shared_count as f64;

    PairwiseComparison {
        compatibility_percent: percent_from_average_difference(avg_abs_diff, config.max_diff_reference),
        shared_count,
        report: Some(DivergenceReport {
            favorite_id: favorite.item_id,
            least_favorite_id: least_favorite.item_id,
            most_divergent_id: most_divergent.item_id,
            most_concordant_id: most_concordant.item_id,
            max_position_difference: most_divergent.value,
            min_position_difference: most_concordant.value,
        }),
    }
}

/// `100 * (1 - avg / reference)`, floored at 0 and rounded to 2 decimals.
pub fn percent_from_average_difference(avg_abs_diff: f64, max_diff_reference: f64) -> f64 {
    let percent = (100.0 * (1.0 - avg_abs_diff / max_diff_reference)).max(0.0);
    round2(percent)
}

/// Running extremum that only moves on a strict improvement.
struct Extremum {
    item_id: ItemId,
    value: u64,
    seen: bool,
    prefer_lower: bool,
}

impl Extremum {
    fn lowest() -> Self {
        Self { item_id: 0, value: 0, seen: false, prefer_lower: true }
    }

    fn highest() -> Self {
        Self { item_id: 0, value: 0, seen: false, prefer_lower: false }
    }

    fn offer(&mut self, item_id: ItemId, value: u64) {
        let improves = if self.prefer_lower { value < self.value } else { value > self.value };
        if !self.seen || improves {
            self.item_id = item_id;
            self.value = value;
            self.seen = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(rows: &[(ItemId, u32, u32)]) -> Vec<SharedPosition> {
        rows.iter()
            .map(|&(item_id, position_a, position_b)| SharedPosition { item_id, position_a, position_b })
            .collect()
    }

    fn config() -> CompatibilitySettings {
        CompatibilitySettings::default()
    }

    #[test]
    fn test_self_comparison_is_perfect_without_report() {
        let items = shared(&[(1, 1, 4)]);
        let result = calculate_compatibility(7, 7, &items, &config());
        assert_eq!(result, PairwiseComparison::identical());
        assert_eq!(result.compatibility_percent, 100.0);
        assert_eq!(result.shared_count, 0);
        assert!(result.report.is_none());
    }

    #[test]
    fn test_no_shared_items() {
        let result = calculate_compatibility(1, 2, &[], &config());
        assert_eq!(result.compatibility_percent, 0.0);
        assert_eq!(result.shared_count, 0);
        assert!(result.report.is_none());
    }

    #[test]
    fn test_three_shared_albums() {
        // X=10, Y=20, Z=30; A=[1,3,5], B=[1,5,2]
        let items = shared(&[(10, 1, 1), (20, 3, 5), (30, 5, 2)]);
        let result = calculate_compatibility(1, 2, &items, &config());

        assert_eq!(result.compatibility_percent, 66.67);
        assert_eq!(result.shared_count, 3);

        let report = result.report.unwrap();
        assert_eq!(report.most_divergent_id, 30);
        assert_eq!(report.max_position_difference, 3);
        assert_eq!(report.most_concordant_id, 10);
        assert_eq!(report.min_position_difference, 0);
        assert_eq!(report.favorite_id, 10);
        assert_eq!(report.least_favorite_id, 20);
    }

    #[test]
    fn test_first_item_wins_ties() {
        let items = shared(&[(1, 2, 3), (2, 3, 2), (3, 1, 4), (4, 4, 1)]);
        let report = calculate_compatibility(1, 2, &items, &config()).report.unwrap();

        // every item sums to 5
        assert_eq!(report.favorite_id, 1);
        assert_eq!(report.least_favorite_id, 1);
        // diffs are 1, 1, 3, 3
        assert_eq!(report.most_concordant_id, 1);
        assert_eq!(report.most_divergent_id, 3);
    }

    #[test]
    fn test_large_average_difference_floors_at_zero() {
        let items = shared(&[(1, 1, 6), (2, 8, 1)]);
        let result = calculate_compatibility(1, 2, &items, &config());
        assert_eq!(result.compatibility_percent, 0.0);
        assert_eq!(result.shared_count, 2);

        let exact = shared(&[(1, 1, 6)]);
        assert_eq!(calculate_compatibility(1, 2, &exact, &config()).compatibility_percent, 0.0);
    }

    #[test]
    fn test_symmetry() {
        let forward = shared(&[(1, 1, 3), (2, 2, 1), (3, 3, 2), (4, 4, 7)]);
        let backward: Vec<SharedPosition> = forward
            .iter()
            .map(|s| SharedPosition { item_id: s.item_id, position_a: s.position_b, position_b: s.position_a })
            .collect();

        let ab = calculate_compatibility(1, 2, &forward, &config());
        let ba = calculate_compatibility(2, 1, &backward, &config());
        assert_eq!(ab.compatibility_percent, ba.compatibility_percent);
        assert_eq!(ab.shared_count, ba.shared_count);

        let (ra, rb) = (ab.report.unwrap(), ba.report.unwrap());
        assert_eq!(ra.max_position_difference, rb.max_position_difference);
        assert_eq!(ra.min_position_difference, rb.min_position_difference);
    }

    #[test]
    fn test_widening_a_difference_never_raises_the_score() {
        let mut previous = f64::MAX;
        for b_position in 1..=12 {
            let items = shared(&[(1, 1, b_position), (2, 2, 2), (3, 3, 4)]);
            let percent = calculate_compatibility(1, 2, &items, &config()).compatibility_percent;
            assert!((0.0..=100.0).contains(&percent));
            assert!(percent <= previous);
            previous = percent;
        }
    }

    #[test]
    fn test_positions_near_the_type_limit() {
        let items = shared(&[(1, u32::MAX, u32::MAX), (2, u32::MAX - 1, 1), (3, 1, 1)]);
        let result = calculate_compatibility(1, 2, &items, &config());
        assert_eq!(result.shared_count, 3);
        assert_eq!(result.compatibility_percent, 0.0);

        let report = result.report.unwrap();
        assert_eq!(report.favorite_id, 3);
        assert_eq!(report.least_favorite_id, 1);
        assert_eq!(report.most_divergent_id, 2);
        assert_eq!(report.max_position_difference, u64::from(u32::MAX - 2));
        assert_eq!(report.most_concordant_id, 1);
    }

    #[test]
    fn test_reference_constant_is_configurable() {
        let items = shared(&[(1, 1, 3)]);
        let wide = CompatibilitySettings { max_diff_reference: 10.0 };
        assert_eq!(calculate_compatibility(1, 2, &items, &wide).compatibility_percent, 80.0);
        assert_eq!(calculate_compatibility(1, 2, &items, &config()).compatibility_percent, 60.0);
    }
}
