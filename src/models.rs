use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Middle,
    Other,
}

impl Level {
    pub fn from_label(label: &str) -> Level {
        match label {
            "High" => Level::High,
            "Middle" => Level::Middle,
            _ => Level::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::High => "High",
            Level::Middle => "Middle",
            Level::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_label(label: &str) -> Gender {
        match label {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            _ => Gender::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchoolRecord {
    pub emis_code: String,
    pub name: String,
    pub level: Level,
    pub gender: Gender,
    pub latitude: f64,
    pub longitude: f64,
    pub enrollment: Option<i32>,
}

/// Classification outcome for a single school record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NearHighSchool,
    IsolatedHighEnrollment,
    IsolatedLowEnrollment,
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::NearHighSchool => "Near a high school",
            Category::IsolatedHighEnrollment => "Isolated, high enrollment",
            Category::IsolatedLowEnrollment => "Isolated, low enrollment",
            Category::Other => "Other level",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateRow {
    pub latitude: f64,
    pub longitude: f64,
    pub school_name: String,
    pub emis_code: String,
    pub enrollment: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSchool {
    pub emis_code: String,
    pub school_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub total_schools: usize,
    pub high_school_count: usize,
    pub middle_school_count: usize,
    pub near_high_school_count: usize,
    pub isolated_high_enrollment_count: usize,
    pub isolated_low_enrollment_count: usize,
    pub other_level_count: usize,
    pub upgrade_candidates: Vec<CandidateRow>,
    pub low_enrollment: Vec<CandidateRow>,
    pub skipped: Vec<SkippedSchool>,
}
