use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AggregateReport, CandidateRow, Category};

/// Map marker colors (fill, border) for high schools, which never pass
/// through the classifier.
pub const HIGH_SCHOOL_COLORS: (&str, &str) = ("green", "darkgreen");

/// Map marker colors (fill, border) per classification outcome.
pub fn marker_colors(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::NearHighSchool => ("yellow", "yellow"),
        Category::IsolatedHighEnrollment => ("red", "red"),
        Category::IsolatedLowEnrollment => ("blue", "blue"),
        Category::Other => ("black", "black"),
    }
}

fn candidate_line(output: &mut String, row: &CandidateRow) {
    let enrollment = row
        .enrollment
        .map(|value| value.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(
        output,
        "- {} (EMIS {}) at {:.6}, {:.6}, enrollment {}",
        row.school_name, row.emis_code, row.latitude, row.longitude, enrollment
    );
}

pub fn build_report(
    gender: Option<&str>,
    radius_km: f64,
    enrollment_threshold: i32,
    generated: NaiveDate,
    report: &AggregateReport,
) -> String {
    let mut output = String::new();
    let scope_label = gender.unwrap_or("all schools");

    let _ = writeln!(output, "# Middle-to-High Upgrade Screening");
    let _ = writeln!(
        output,
        "Generated {} for {} (high school within {:.1} km, enrollment threshold {})",
        generated, scope_label, radius_km, enrollment_threshold
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## School Mix");
    let _ = writeln!(output, "- Schools screened: {}", report.total_schools);
    let _ = writeln!(output, "- High schools: {}", report.high_school_count);
    let _ = writeln!(output, "- Middle schools: {}", report.middle_school_count);
    let _ = writeln!(
        output,
        "- Near a high school: {}",
        report.near_high_school_count
    );
    let _ = writeln!(
        output,
        "- Isolated, high enrollment: {}",
        report.isolated_high_enrollment_count
    );
    let _ = writeln!(
        output,
        "- Isolated, low enrollment: {}",
        report.isolated_low_enrollment_count
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upgrade Candidates");

    if report.upgrade_candidates.is_empty() {
        let _ = writeln!(
            output,
            "No isolated middle schools above the enrollment threshold."
        );
    } else {
        for row in report.upgrade_candidates.iter() {
            candidate_line(&mut output, row);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Isolated Low-Enrollment Schools");

    if report.low_enrollment.is_empty() {
        let _ = writeln!(output, "No isolated middle schools below the threshold.");
    } else {
        for row in report.low_enrollment.iter().take(10) {
            candidate_line(&mut output, row);
        }
        if report.low_enrollment.len() > 10 {
            let _ = writeln!(output, "... and {} more", report.low_enrollment.len() - 10);
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Skipped Records");
        for skipped in report.skipped.iter() {
            let _ = writeln!(
                output,
                "- {} (EMIS {}): {}",
                skipped.school_name, skipped.emis_code, skipped.reason
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Marker Legend");
    let _ = writeln!(output, "- High school: {}", HIGH_SCHOOL_COLORS.0);
    for category in [
        Category::NearHighSchool,
        Category::IsolatedHighEnrollment,
        Category::IsolatedLowEnrollment,
    ] {
        let _ = writeln!(
            output,
            "- {}: {}",
            category.label(),
            marker_colors(category).0
        );
    }

    output
}

pub fn to_json(report: &AggregateReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
