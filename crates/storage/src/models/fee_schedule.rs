use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Event, PerformanceType};

/// Groups of this size and above are billed at the large-group rate.
pub const LARGE_GROUP_MIN_PARTICIPANTS: usize = 10;

/// A validated view over an event's fee columns.
///
/// `None` means "not configured" and is never priced as a real tier.
/// `Some(0)` is a deliberately free price point. Negative values are
/// discarded when the schedule is built and reported in `warnings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeSchedule {
    pub registration_fee_per_dancer: Option<Decimal>,
    pub solo_1_fee: Option<Decimal>,
    pub solo_2_fee: Option<Decimal>,
    pub solo_3_fee: Option<Decimal>,
    pub solo_additional_fee: Option<Decimal>,
    pub duet_trio_fee_per_person: Option<Decimal>,
    pub small_group_fee_per_person: Option<Decimal>,
    pub large_group_fee_per_person: Option<Decimal>,
    /// Data-quality problems an administrator should fix on the event
    pub warnings: Vec<String>,
}

/// An amount looked up from the schedule, with a note when the lookup had to
/// fall back or clamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub amount: Decimal,
    pub note: Option<String>,
}

impl ResolvedPrice {
    fn charged(amount: Decimal) -> Self {
        Self { amount, note: None }
    }

    fn zero_with_note(note: String) -> Self {
        Self {
            amount: Decimal::ZERO,
            note: Some(note),
        }
    }
}

impl FeeSchedule {
    pub fn from_event(event: &Event) -> Self {
        let mut warnings = Vec::new();

        let mut field = |name: &str, value: Option<Decimal>| -> Option<Decimal> {
            match value {
                Some(v) if v.is_sign_negative() && !v.is_zero() => {
                    warnings.push(format!(
                        "{} is negative ({}); treated as not configured",
                        name, v
                    ));
                    None
                }
                other => other,
            }
        };

        let registration_fee_per_dancer =
            field("registration_fee_per_dancer", event.registration_fee_per_dancer);
        let solo_1_fee = field("solo_1_fee", event.solo_1_fee);
        let solo_2_fee = field("solo_2_fee", event.solo_2_fee);
        let solo_3_fee = field("solo_3_fee", event.solo_3_fee);
        let solo_additional_fee = field("solo_additional_fee", event.solo_additional_fee);
        let duet_trio_fee_per_person =
            field("duet_trio_fee_per_person", event.duet_trio_fee_per_person);
        let small_group_fee_per_person =
            field("small_group_fee_per_person", event.small_group_fee_per_person);
        let large_group_fee_per_person =
            field("large_group_fee_per_person", event.large_group_fee_per_person);

        let mut schedule = Self {
            registration_fee_per_dancer,
            solo_1_fee,
            solo_2_fee,
            solo_3_fee,
            solo_additional_fee,
            duet_trio_fee_per_person,
            small_group_fee_per_person,
            large_group_fee_per_person,
            warnings,
        };
        schedule.check_solo_packages();

        if !schedule.warnings.is_empty() {
            tracing::warn!(
                "Fee schedule for event {} has {} configuration warning(s): {}",
                event.event_id,
                schedule.warnings.len(),
                schedule.warnings.join("; ")
            );
        }

        schedule
    }

    fn check_solo_packages(&mut self) {
        for position in 2..=3 {
            if let (Some(previous), Some(current)) =
                (self.positive_package(position - 1), self.positive_package(position))
            {
                if current < previous {
                    self.warnings.push(format!(
                        "solo_{}_fee ({}) is lower than solo_{}_fee ({}); solo #{} is charged R0",
                        position,
                        format_amount(current),
                        position - 1,
                        format_amount(previous),
                        position
                    ));
                }
            }
        }
    }

    /// Cumulative package total for `count` solos (1 to 3).
    pub fn solo_package(&self, count: u32) -> Option<Decimal> {
        match count {
            1 => self.solo_1_fee,
            2 => self.solo_2_fee,
            3 => self.solo_3_fee,
            _ => None,
        }
    }

    fn positive_package(&self, count: u32) -> Option<Decimal> {
        self.solo_package(count).filter(|v| v.is_sign_positive() && !v.is_zero())
    }

    /// Marginal charge for a dancer's solo at `position` (1-based).
    ///
    /// Positions 2 and 3 are the difference between consecutive package
    /// totals, and only when both totals are configured and positive.
    /// A non-monotonic pair is clamped to zero.
    pub fn solo_increment(&self, position: u32) -> ResolvedPrice {
        match position {
            0 | 1 => match self.solo_1_fee {
                Some(fee) => ResolvedPrice::charged(fee),
                None => ResolvedPrice::zero_with_note(
                    "Solo package for 1 solo is not configured".to_string(),
                ),
            },
            2 | 3 => {
                match (
                    self.positive_package(position - 1),
                    self.positive_package(position),
                ) {
                    (Some(previous), Some(current)) if current >= previous => {
                        ResolvedPrice::charged(current - previous)
                    }
                    (Some(previous), Some(current)) => ResolvedPrice::zero_with_note(format!(
                        "Package total for {} solos ({}) is lower than for {} ({}); increment clamped to R0",
                        position,
                        format_amount(current),
                        position - 1,
                        format_amount(previous)
                    )),
                    _ => ResolvedPrice::zero_with_note(format!(
                        "Solo package totals for {} and {} solos are not both configured",
                        position - 1,
                        position
                    )),
                }
            }
            _ => match self.solo_additional_fee {
                Some(fee) => ResolvedPrice::charged(fee),
                None => ResolvedPrice::zero_with_note(
                    "Additional solo fee is not configured".to_string(),
                ),
            },
        }
    }

    /// What a dancer should have paid in total for `count` solos.
    pub fn solo_package_total(&self, count: u32) -> Decimal {
        (1..=count).map(|p| self.solo_increment(p).amount).sum()
    }

    /// Per-person rate applied to a non-solo entry of `participant_count`.
    pub fn per_person_rate(
        &self,
        performance_type: PerformanceType,
        participant_count: usize,
    ) -> Option<Decimal> {
        match performance_type {
            PerformanceType::Solo => None,
            PerformanceType::Duet | PerformanceType::Trio => self.duet_trio_fee_per_person,
            PerformanceType::Group if participant_count >= LARGE_GROUP_MIN_PARTICIPANTS => {
                self.large_group_fee_per_person
            }
            PerformanceType::Group => self.small_group_fee_per_person,
        }
    }

    pub fn non_solo_fee(
        &self,
        performance_type: PerformanceType,
        participant_count: usize,
    ) -> ResolvedPrice {
        match self.per_person_rate(performance_type, participant_count) {
            Some(rate) => ResolvedPrice::charged(rate * Decimal::from(participant_count)),
            None => ResolvedPrice::zero_with_note(format!(
                "{} per-person rate is not configured",
                rate_name(performance_type, participant_count)
            )),
        }
    }

    pub fn registration_fee(&self) -> ResolvedPrice {
        match self.registration_fee_per_dancer {
            Some(fee) => ResolvedPrice::charged(fee),
            None => {
                ResolvedPrice::zero_with_note("Registration fee is not configured".to_string())
            }
        }
    }
}

fn rate_name(performance_type: PerformanceType, participant_count: usize) -> &'static str {
    match performance_type {
        PerformanceType::Group if participant_count >= LARGE_GROUP_MIN_PARTICIPANTS => {
            "Large group"
        }
        PerformanceType::Group => "Small group",
        PerformanceType::Duet | PerformanceType::Trio => "Duet/trio",
        PerformanceType::Solo => "Solo",
    }
}

/// Formats a currency amount as Rand, dropping cents when they are zero.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.fract().is_zero() {
        format!("R{}", rounded.trunc())
    } else {
        format!("R{:.2}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard() -> FeeSchedule {
        FeeSchedule {
            registration_fee_per_dancer: Some(dec!(300)),
            solo_1_fee: Some(dec!(400)),
            solo_2_fee: Some(dec!(750)),
            solo_3_fee: Some(dec!(1000)),
            solo_additional_fee: Some(dec!(100)),
            duet_trio_fee_per_person: Some(dec!(280)),
            small_group_fee_per_person: Some(dec!(220)),
            large_group_fee_per_person: Some(dec!(190)),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_solo_increments_follow_package_totals() {
        let schedule = standard();
        let increments: Vec<Decimal> = (1..=5).map(|p| schedule.solo_increment(p).amount).collect();

        assert_eq!(
            increments,
            vec![dec!(400), dec!(350), dec!(250), dec!(100), dec!(100)]
        );
    }

    #[test]
    fn test_package_total_is_sum_of_increments() {
        let schedule = standard();
        assert_eq!(schedule.solo_package_total(0), Decimal::ZERO);
        assert_eq!(schedule.solo_package_total(2), dec!(750));
        assert_eq!(schedule.solo_package_total(3), dec!(1000));
        assert_eq!(schedule.solo_package_total(5), dec!(1200));
    }

    #[test]
    fn test_non_monotonic_packages_clamp_to_zero() {
        let schedule = FeeSchedule {
            solo_2_fee: Some(dec!(300)),
            ..standard()
        };

        let second = schedule.solo_increment(2);
        assert_eq!(second.amount, Decimal::ZERO);
        assert!(second.note.unwrap().contains("clamped"));

        // 1000 - 300 is still a valid increment
        assert_eq!(schedule.solo_increment(3).amount, dec!(700));
    }

    #[test]
    fn test_missing_tier_is_not_configured() {
        let schedule = FeeSchedule {
            solo_2_fee: None,
            ..standard()
        };

        let second = schedule.solo_increment(2);
        assert_eq!(second.amount, Decimal::ZERO);
        assert!(second.note.unwrap().contains("not configured"));
        assert_eq!(schedule.solo_increment(3).amount, Decimal::ZERO);
    }

    #[test]
    fn test_zero_tier_is_free_for_first_solo() {
        let schedule = FeeSchedule {
            solo_1_fee: Some(Decimal::ZERO),
            ..standard()
        };

        assert_eq!(schedule.solo_increment(1), ResolvedPrice::charged(Decimal::ZERO));
        // A zero package cannot anchor an increment
        assert_eq!(schedule.solo_increment(2).amount, Decimal::ZERO);
        assert!(schedule.solo_increment(2).note.is_some());
    }

    #[test]
    fn test_group_break_point() {
        let schedule = standard();
        assert_eq!(
            schedule.non_solo_fee(PerformanceType::Group, 9).amount,
            dec!(1980)
        );
        assert_eq!(
            schedule.non_solo_fee(PerformanceType::Group, 10).amount,
            dec!(1900)
        );
        assert_eq!(
            schedule.non_solo_fee(PerformanceType::Duet, 2).amount,
            dec!(560)
        );
        assert_eq!(
            schedule.non_solo_fee(PerformanceType::Trio, 3).amount,
            dec!(840)
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(400.00)), "R400");
        assert_eq!(format_amount(dec!(350.5)), "R350.50");
        assert_eq!(format_amount(Decimal::ZERO), "R0");
    }
}
