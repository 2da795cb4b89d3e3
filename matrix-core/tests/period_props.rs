//! Period resolver property tests
//!
//! The resolver is pure, so these generate whole year calendars and pin the
//! partitioning invariants instead of single examples.

use matrix_core::resolve_weeks;
use plan_store::curriculum::WeekInfo;
use plan_store::model::Period;
use proptest::prelude::*;

fn week(number: u32, code: Option<String>) -> WeekInfo {
    WeekInfo {
        week: number,
        code,
        ..Default::default()
    }
}

/// Build a calendar of four quarters with the given segment lengths,
/// numbering weeks 1..n and marking each segment start with "Q.1".
fn marked_calendar(segment_lens: &[usize; 4]) -> Vec<WeekInfo> {
    let mut weeks = Vec::new();
    let mut number = 1u32;
    for (quarter, len) in segment_lens.iter().enumerate() {
        for offset in 0..*len {
            let code = (offset == 0).then(|| format!("{}.1", quarter + 1));
            weeks.push(week(number, code));
            number += 1;
        }
    }
    weeks
}

proptest! {
    /// Each quarter resolves to exactly its contiguous segment, and the four
    /// segments partition the whole calendar.
    #[test]
    fn quarter_markers_partition_the_year(
        lens in [1usize..10, 1usize..10, 1usize..10, 1usize..10],
    ) {
        let calendar = marked_calendar(&lens);

        let mut expected_start = 1u32;
        let mut covered = Vec::new();
        for quarter in 1..=4u8 {
            let resolved = resolve_weeks(&Period::Quarter(quarter), &calendar);
            let len = lens[quarter as usize - 1] as u32;
            let expected: Vec<u32> = (expected_start..expected_start + len).collect();
            prop_assert_eq!(&resolved, &expected);
            covered.extend(resolved);
            expected_start += len;
        }
        let all: Vec<u32> = calendar.iter().map(|w| w.week).collect();
        prop_assert_eq!(covered, all);
    }

    /// Custom ranges are inclusive and keep calendar order, holidays or not.
    #[test]
    fn custom_range_is_inclusive_and_ordered(
        total in 1u32..60,
        bounds in (1u32..60, 1u32..60),
    ) {
        let (a, b) = bounds;
        let (start, end) = (a.min(b), a.max(b));
        let calendar: Vec<WeekInfo> = (1..=total).map(|n| week(n, None)).collect();

        let resolved = resolve_weeks(&Period::Custom([start, end]), &calendar);
        let expected: Vec<u32> = (1..=total).filter(|n| (start..=end).contains(n)).collect();
        prop_assert_eq!(resolved, expected);
    }

    /// Without boundary markers the semesters halve the year, ceiling
    /// division in favor of semester 1, and together cover every week.
    #[test]
    fn unmarked_semesters_halve_the_year(total in 1usize..80) {
        let calendar: Vec<WeekInfo> = (1..=total as u32).map(|n| week(n, None)).collect();

        let first = resolve_weeks(&Period::Semester(1), &calendar);
        let second = resolve_weeks(&Period::Semester(2), &calendar);
        prop_assert_eq!(first.len(), (total + 1) / 2);
        prop_assert_eq!(second.len(), total / 2);

        let mut combined = first;
        combined.extend(second);
        let all: Vec<u32> = calendar.iter().map(|w| w.week).collect();
        prop_assert_eq!(combined, all);
    }

    /// Resolution is a pure function: same inputs, same output.
    #[test]
    fn resolution_is_idempotent(
        quarter in 1u8..=4,
        lens in [1usize..10, 1usize..10, 1usize..10, 1usize..10],
    ) {
        let calendar = marked_calendar(&lens);
        let once = resolve_weeks(&Period::Quarter(quarter), &calendar);
        let twice = resolve_weeks(&Period::Quarter(quarter), &calendar);
        prop_assert_eq!(once, twice);
    }
}
