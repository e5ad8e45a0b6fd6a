use thiserror::Error;

use crate::models::{AggregateReport, CandidateRow, Category, Level, SchoolRecord, SkippedSchool};
use crate::proximity::ProximityIndex;

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_ENROLLMENT_THRESHOLD: i32 = 200;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ClassifyError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

pub fn validate_point(latitude: f64, longitude: f64) -> Result<(), ClassifyError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ClassifyError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ClassifyError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

pub fn validate_coordinates(school: &SchoolRecord) -> Result<(), ClassifyError> {
    validate_point(school.latitude, school.longitude)
}

/// Category for a Middle-level school. Proximity wins over enrollment:
/// a middle school with any high school within `radius_km` is never an
/// upgrade candidate, whatever its enrollment. Unknown enrollment counts
/// as low.
pub fn classify_middle_school(
    school: &SchoolRecord,
    index: &ProximityIndex,
    radius_km: f64,
    enrollment_threshold: i32,
) -> Category {
    if index.any_within_radius(school.latitude, school.longitude, radius_km) {
        return Category::NearHighSchool;
    }

    match school.enrollment {
        Some(enrollment) if enrollment > enrollment_threshold => Category::IsolatedHighEnrollment,
        _ => Category::IsolatedLowEnrollment,
    }
}

/// Classify every record in one pass: records failing coordinate
/// validation are skipped and reported, never fatal; the proximity index
/// is built from the valid High-level records; valid Middle-level
/// records are classified in input order. High-level records are index
/// input only and are never classified themselves.
pub fn classify_all(
    schools: &[SchoolRecord],
    radius_km: f64,
    enrollment_threshold: i32,
) -> AggregateReport {
    let mut skipped = Vec::new();
    let mut valid: Vec<&SchoolRecord> = Vec::new();

    for school in schools {
        match validate_coordinates(school) {
            Ok(()) => valid.push(school),
            Err(err) => skipped.push(SkippedSchool {
                emis_code: school.emis_code.clone(),
                school_name: school.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    let index = ProximityIndex::from_high_schools(&valid);

    let mut report = AggregateReport {
        total_schools: valid.len(),
        high_school_count: index.len(),
        middle_school_count: 0,
        near_high_school_count: 0,
        isolated_high_enrollment_count: 0,
        isolated_low_enrollment_count: 0,
        other_level_count: 0,
        upgrade_candidates: Vec::new(),
        low_enrollment: Vec::new(),
        skipped,
    };

    for &school in &valid {
        match school.level {
            Level::High => {}
            Level::Middle => {
                report.middle_school_count += 1;
                match classify_middle_school(school, &index, radius_km, enrollment_threshold) {
                    Category::NearHighSchool => report.near_high_school_count += 1,
                    Category::IsolatedHighEnrollment => {
                        report.isolated_high_enrollment_count += 1;
                        report.upgrade_candidates.push(candidate_row(school));
                    }
                    Category::IsolatedLowEnrollment => {
                        report.isolated_low_enrollment_count += 1;
                        report.low_enrollment.push(candidate_row(school));
                    }
                    Category::Other => {}
                }
            }
            Level::Other => report.other_level_count += 1,
        }
    }

    report
}

fn candidate_row(school: &SchoolRecord) -> CandidateRow {
    CandidateRow {
        latitude: school.latitude,
        longitude: school.longitude,
        school_name: school.name.clone(),
        emis_code: school.emis_code.clone(),
        enrollment: school.enrollment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;
    use crate::models::Gender;

    fn school(
        emis: &str,
        level: Level,
        lat: f64,
        lon: f64,
        enrollment: Option<i32>,
    ) -> SchoolRecord {
        SchoolRecord {
            emis_code: emis.to_string(),
            name: format!("GBS {emis}"),
            level,
            gender: Gender::Male,
            latitude: lat,
            longitude: lon,
            enrollment,
        }
    }

    // Central Lahore; the nearest other fixture point is ~3.6 km away.
    const MID_LAT: f64 = 31.5204;
    const MID_LON: f64 = 74.3587;

    #[test]
    fn isolated_high_enrollment_becomes_upgrade_candidate() {
        let schools = vec![school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250))];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.isolated_high_enrollment_count, 1);
        assert_eq!(report.upgrade_candidates.len(), 1);
        assert_eq!(report.upgrade_candidates[0].emis_code, "m-1");
        assert!(report.low_enrollment.is_empty());
    }

    #[test]
    fn isolated_low_enrollment_goes_to_low_list() {
        let schools = vec![school("m-1", Level::Middle, MID_LAT, MID_LON, Some(150))];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.isolated_low_enrollment_count, 1);
        assert_eq!(report.low_enrollment.len(), 1);
        assert!(report.upgrade_candidates.is_empty());
    }

    #[test]
    fn enrollment_at_threshold_counts_as_low() {
        let schools = vec![school("m-1", Level::Middle, MID_LAT, MID_LON, Some(200))];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.isolated_low_enrollment_count, 1);
        assert_eq!(report.isolated_high_enrollment_count, 0);
    }

    #[test]
    fn unknown_enrollment_counts_as_low() {
        let schools = vec![school("m-1", Level::Middle, MID_LAT, MID_LON, None)];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.isolated_low_enrollment_count, 1);
        assert_eq!(report.low_enrollment[0].enrollment, None);
    }

    #[test]
    fn nearby_high_school_overrides_enrollment() {
        let schools = vec![
            school("h-1", Level::High, 31.5497, 74.3436, Some(900)),
            school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250)),
        ];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.near_high_school_count, 1);
        assert!(report.upgrade_candidates.is_empty());
        assert!(report.low_enrollment.is_empty());
    }

    #[test]
    fn high_school_at_exactly_the_radius_counts_as_near() {
        let north = MID_LAT + 5.0 / 111.195;
        let radius = geo::haversine_km(MID_LAT, MID_LON, north, MID_LON);
        let schools = vec![
            school("h-1", Level::High, north, MID_LON, None),
            school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250)),
        ];
        let report = classify_all(&schools, radius, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.near_high_school_count, 1);
        assert_eq!(report.isolated_high_enrollment_count, 0);
    }

    #[test]
    fn empty_input_gives_all_zero_report() {
        let report = classify_all(&[], DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.total_schools, 0);
        assert_eq!(report.high_school_count, 0);
        assert_eq!(report.middle_school_count, 0);
        assert_eq!(report.near_high_school_count, 0);
        assert_eq!(report.isolated_high_enrollment_count, 0);
        assert_eq!(report.isolated_low_enrollment_count, 0);
        assert!(report.upgrade_candidates.is_empty());
        assert!(report.low_enrollment.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn category_counts_sum_to_middle_count() {
        let schools = vec![
            school("h-1", Level::High, 31.5497, 74.3436, Some(800)),
            school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250)),
            // Kasur district, ~50 km from both Lahore points.
            school("m-2", Level::Middle, 31.1156, 74.4502, Some(300)),
            school("m-3", Level::Middle, 31.1190, 74.4600, Some(120)),
            school("m-4", Level::Middle, 31.1200, 74.4700, None),
            school("x-1", Level::Other, MID_LAT, MID_LON, Some(50)),
        ];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.middle_school_count, 4);
        assert_eq!(
            report.near_high_school_count
                + report.isolated_high_enrollment_count
                + report.isolated_low_enrollment_count,
            report.middle_school_count
        );
        assert_eq!(report.other_level_count, 1);
        assert_eq!(report.high_school_count, 1);
    }

    #[test]
    fn candidate_lists_keep_input_order() {
        let schools = vec![
            school("m-9", Level::Middle, 31.1156, 74.4502, Some(300)),
            school("m-2", Level::Middle, 31.1190, 74.4600, Some(400)),
            school("m-5", Level::Middle, 31.1200, 74.4700, Some(250)),
        ];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        let order: Vec<&str> = report
            .upgrade_candidates
            .iter()
            .map(|row| row.emis_code.as_str())
            .collect();
        assert_eq!(order, vec!["m-9", "m-2", "m-5"]);
    }

    #[test]
    fn invalid_coordinates_skip_one_record_not_the_batch() {
        let schools = vec![
            school("m-bad", Level::Middle, 123.0, 74.3587, Some(250)),
            school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250)),
        ];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].emis_code, "m-bad");
        assert!(report.skipped[0].reason.contains("latitude"));
        assert_eq!(report.middle_school_count, 1);
        assert_eq!(report.isolated_high_enrollment_count, 1);
    }

    #[test]
    fn invalid_high_school_never_enters_the_index() {
        let schools = vec![
            school("h-bad", Level::High, MID_LAT, 999.0, None),
            school("m-1", Level::Middle, MID_LAT, MID_LON, Some(250)),
        ];
        let report = classify_all(&schools, DEFAULT_RADIUS_KM, DEFAULT_ENROLLMENT_THRESHOLD);

        assert_eq!(report.high_school_count, 0);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("longitude"));
        assert_eq!(report.isolated_high_enrollment_count, 1);
    }

    #[test]
    fn middle_rule_checks_proximity_before_enrollment() {
        let index = ProximityIndex::new(vec![(31.5497, 74.3436)]);
        let near = school("m-1", Level::Middle, MID_LAT, MID_LON, Some(500));
        assert_eq!(
            classify_middle_school(&near, &index, 5.0, 200),
            Category::NearHighSchool
        );

        let empty = ProximityIndex::default();
        assert_eq!(
            classify_middle_school(&near, &empty, 5.0, 200),
            Category::IsolatedHighEnrollment
        );
    }
}
