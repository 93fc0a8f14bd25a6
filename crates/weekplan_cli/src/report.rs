//! Text and JSON rendering of calendar listings.

use std::fmt::Write;
use weekplan_core::{Meeting, WeekListing};

const INDENT: &str = "    ";

/// Renders one meeting as an indented detail block.
pub fn render_meeting(meeting: &Meeting) -> String {
    let start = meeting.start();
    let end = meeting.end();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{INDENT}Meeting ID {} on {} (week {})",
        meeting.id(),
        start.day_name(),
        start.week()
    );
    let _ = writeln!(out, "{INDENT}Subject: {}", meeting.subject());
    let _ = writeln!(out, "{INDENT}Start Time: {:04}", start.time_of_day());
    let _ = writeln!(out, "{INDENT}End Time: {:04}", end.time_of_day());
    if end.week() != start.week() || end.day() != start.day() {
        let _ = writeln!(
            out,
            "{INDENT}End Day: {} (week {}, day {})",
            end.day_name(),
            end.week(),
            end.day()
        );
    }
    let _ = writeln!(out, "{INDENT}Priority: {}", meeting.priority());
    out
}

/// Renders days 1 through 7 with per-day totals and the week total.
pub fn render_week(listing: &WeekListing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Week {}", listing.week);
    for day in &listing.days {
        let _ = writeln!(out, "Day {}: {}", day.day, day.day_name);
        for meeting in &day.meetings {
            out.push_str(&render_meeting(meeting));
            out.push('\n');
        }
        let _ = writeln!(out, "{INDENT}Total meetings today: {}", day.count());
    }
    let _ = writeln!(out, "Number of meetings this week: {}", listing.total);
    out
}

/// Renders several weeks followed by the overall total.
pub fn render_weeks(listings: &[WeekListing]) -> String {
    if listings.is_empty() {
        return "No meetings scheduled.\n".to_string();
    }
    let mut out = String::new();
    for listing in listings {
        out.push_str(&render_week(listing));
        out.push('\n');
    }
    let total: usize = listings.iter().map(|listing| listing.total).sum();
    let _ = writeln!(out, "Number of meetings in calendar: {total}");
    out
}

pub fn render_json(listings: &[WeekListing]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(listings)
}
