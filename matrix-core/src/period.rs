//! Period resolution
//!
//! Maps a plan's period specification plus a year's week calendar to the
//! ordered list of visible week numbers. Pure and side-effect-free; every
//! malformed input degrades to a usable week list instead of erroring.

use plan_store::curriculum::WeekInfo;
use plan_store::model::Period;

/// Resolve the visible week numbers for a period against a year calendar.
///
/// `weeks` must already be sorted ascending by week number (the calendar
/// store guarantees this).
///
/// Degenerate inputs never panic:
/// - a quarter whose start marker is missing yields all non-zero weeks;
/// - a semester without boundary markers is split in half (ceiling division,
///   semester 1 gets the odd week);
/// - an out-of-range quarter/semester value or a reversed custom range
///   yields the whole year.
pub fn resolve_weeks(period: &Period, weeks: &[WeekInfo]) -> Vec<u32> {
    match period {
        Period::Quarter(q) => quarter_weeks(*q, weeks),
        Period::Semester(s) if (1..=2).contains(s) => semester_weeks(*s, weeks),
        Period::Custom([start, end]) if start <= end => weeks
            .iter()
            .filter(|w| (*start..=*end).contains(&w.week))
            .map(|w| w.week)
            .collect(),
        // FullYear, out-of-range semester, reversed custom range
        _ => weeks.iter().map(|w| w.week).collect(),
    }
}

fn quarter_weeks(quarter: u8, weeks: &[WeekInfo]) -> Vec<u32> {
    let teaching: Vec<&WeekInfo> = weeks.iter().filter(|w| !w.is_zero()).collect();

    let start_code = format!("{}.1", quarter);
    let Some(start) = teaching.iter().position(|w| w.has_code(&start_code)) else {
        // no start marker for this quarter: show every teaching week
        return teaching.iter().map(|w| w.week).collect();
    };

    let next_code = format!("{}.1", quarter as u16 + 1);
    let end = teaching
        .iter()
        .skip(start + 1)
        .position(|w| w.has_code(&next_code))
        .map(|offset| start + 1 + offset)
        .unwrap_or(teaching.len());

    teaching[start..end].iter().map(|w| w.week).collect()
}

fn semester_weeks(semester: u8, weeks: &[WeekInfo]) -> Vec<u32> {
    let teaching: Vec<&WeekInfo> = weeks.iter().filter(|w| !w.is_zero()).collect();

    let first = teaching.iter().position(|w| w.has_code("1.1"));
    let second = teaching.iter().position(|w| w.has_code("3.1"));

    let split = match (first, second) {
        (Some(i1), Some(i3)) if i1 < i3 => i3,
        // markers absent or out of order: halve, ceiling to semester 1
        _ => (teaching.len() + 1) / 2,
    };

    let slice = if semester == 1 {
        &teaching[..split]
    } else {
        &teaching[split..]
    };
    slice.iter().map(|w| w.week).collect()
}
