use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Gender, Level, SchoolRecord};

pub struct CsvImport {
    pub imported: usize,
    pub missing_coordinates: usize,
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let schools = vec![
        (
            Uuid::parse_str("6f0a3c1e-58d2-4b9a-9f25-1c2b9a6f4e01")?,
            "32110001",
            "Govt. Boys High School Model Town",
            Level::High,
            Gender::Male,
            31.4832,
            74.3239,
            Some(850),
        ),
        (
            Uuid::parse_str("b2d44c0a-7a31-4f7e-8c55-9e0d1b3a7c02")?,
            "32110002",
            "Govt. Boys Middle School Garden Town",
            Level::Middle,
            Gender::Male,
            31.4925,
            74.3312,
            Some(420),
        ),
        (
            Uuid::parse_str("4e91f7b8-06c3-4d6a-b1e9-5a8c2d4f6e03")?,
            "32730010",
            "Govt. Boys Middle School Khudian Khas",
            Level::Middle,
            Gender::Male,
            31.0333,
            74.2500,
            Some(310),
        ),
        (
            Uuid::parse_str("a7c52e19-3b84-4c0d-9f16-7d2e8b5a1c04")?,
            "32730011",
            "Govt. Boys Middle School Raja Jang",
            Level::Middle,
            Gender::Male,
            31.2167,
            74.2167,
            Some(140),
        ),
        (
            Uuid::parse_str("d1e83f5a-92c6-47b1-8a04-3f6c9d2e7b05")?,
            "32730012",
            "Govt. Boys Middle School Halla",
            Level::Middle,
            Gender::Male,
            31.1500,
            74.3500,
            None,
        ),
        (
            Uuid::parse_str("2c6b9d4f-1e57-4a82-b3c0-8e5a7f1d9c06")?,
            "32110003",
            "Govt. Girls High School Gulberg",
            Level::High,
            Gender::Female,
            31.5102,
            74.3441,
            Some(760),
        ),
    ];

    for (id, emis_code, name, level, gender, latitude, longitude, enrollment) in schools {
        sqlx::query(
            r#"
            INSERT INTO school_upgrade.schools
            (id, emis_code, school_name, level, gender, latitude, longitude, total_enrollment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (emis_code) DO UPDATE
            SET school_name = EXCLUDED.school_name,
                level = EXCLUDED.level,
                gender = EXCLUDED.gender,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                total_enrollment = EXCLUDED.total_enrollment
            "#,
        )
        .bind(id)
        .bind(emis_code)
        .bind(name)
        .bind(level.label())
        .bind(gender.label())
        .bind(latitude)
        .bind(longitude)
        .bind(enrollment)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<CsvImport> {
    // Column headers as shipped in the PMIU location extract. Enrollment
    // arrives with float formatting ("250.0") and blanks for unknown.
    #[derive(serde::Deserialize)]
    struct CsvRow {
        #[serde(rename = "EMIS_Code")]
        emis_code: String,
        #[serde(rename = "School_Name")]
        school_name: String,
        #[serde(rename = "Level")]
        level: String,
        #[serde(rename = "Gender")]
        gender: String,
        #[serde(rename = "Lat")]
        lat: Option<f64>,
        #[serde(rename = "Lng")]
        lng: Option<f64>,
        #[serde(rename = "total_enrollment")]
        total_enrollment: Option<f64>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut imported = 0usize;
    let mut missing_coordinates = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        let (latitude, longitude) = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                missing_coordinates += 1;
                continue;
            }
        };

        let enrollment = row
            .total_enrollment
            .filter(|value| *value >= 0.0)
            .map(|value| value.round() as i32);

        let result = sqlx::query(
            r#"
            INSERT INTO school_upgrade.schools
            (id, emis_code, school_name, level, gender, latitude, longitude, total_enrollment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (emis_code) DO UPDATE
            SET school_name = EXCLUDED.school_name,
                level = EXCLUDED.level,
                gender = EXCLUDED.gender,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                total_enrollment = EXCLUDED.total_enrollment
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.emis_code)
        .bind(&row.school_name)
        .bind(&row.level)
        .bind(&row.gender)
        .bind(latitude)
        .bind(longitude)
        .bind(enrollment)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            imported += 1;
        }
    }

    Ok(CsvImport {
        imported,
        missing_coordinates,
    })
}

pub async fn fetch_schools(pool: &PgPool) -> anyhow::Result<Vec<SchoolRecord>> {
    let records = sqlx::query(
        "SELECT emis_code, school_name, level, gender, \
         latitude, longitude, total_enrollment \
         FROM school_upgrade.schools \
         ORDER BY emis_code",
    )
    .fetch_all(pool)
    .await?;

    let mut schools = Vec::new();

    for row in records {
        let level: String = row.get("level");
        let gender: String = row.get("gender");
        schools.push(SchoolRecord {
            emis_code: row.get("emis_code"),
            name: row.get("school_name"),
            level: Level::from_label(&level),
            gender: Gender::from_label(&gender),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            enrollment: row.get("total_enrollment"),
        });
    }

    Ok(schools)
}
