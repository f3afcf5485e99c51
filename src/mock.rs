//! Plausible-looking sample contributions for when the real ones are
//! unavailable
use crate::dataset::{ContributionDataset, ContributionDay, Origin};
use crate::year::CalendarYear;
use rand::Rng;
use time::{Date, Weekday};

/// Generate a year of sample contributions.  Dates after `today` always get
/// zero; weekends are quieter than weekdays, and weekdays of the year
/// containing `today` are busier than those of other years.
pub(crate) fn generate<R: Rng + ?Sized>(
    year: CalendarYear,
    today: Date,
    rng: &mut R,
) -> ContributionDataset {
    let current_year = year.contains(today);
    let contributions = year
        .days()
        .map(|date| {
            let count = if date > today {
                0
            } else {
                sample_count(date.weekday(), current_year, rng)
            };
            ContributionDay::new(date, count)
        })
        .collect::<Vec<_>>();
    let total_contributions = contributions.iter().map(|d| d.count).sum();
    ContributionDataset {
        contributions,
        total_contributions,
        origin: Origin::Sample,
    }
}

fn sample_count<R: Rng + ?Sized>(weekday: Weekday, current_year: bool, rng: &mut R) -> u32 {
    match weekday {
        Weekday::Saturday | Weekday::Sunday => {
            if rng.gen_bool(0.2) {
                rng.gen_range(0..=4)
            } else {
                0
            }
        }
        _ if current_year => {
            if rng.gen_bool(0.7) {
                rng.gen_range(1..=12)
            } else {
                0
            }
        }
        _ => {
            if rng.gen_bool(0.5) {
                rng.gen_range(0..=7)
            } else {
                0
            }
        }
    }
}
