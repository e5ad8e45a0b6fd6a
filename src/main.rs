use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod classify;
mod db;
mod geo;
mod models;
mod proximity;
mod report;
mod stats;

#[derive(Parser)]
#[command(name = "punjab-school-upgrade")]
#[command(about = "Middle-to-high school upgrade screening for the Punjab school dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a small Lahore-area sample dataset
    Seed,
    /// Import schools from a PMIU location CSV
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Classify middle schools and print upgrade candidates
    Classify {
        #[arg(long)]
        gender: Option<String>,
        #[arg(long, default_value_t = classify::DEFAULT_RADIUS_KM)]
        radius_km: f64,
        #[arg(long, default_value_t = classify::DEFAULT_ENROLLMENT_THRESHOLD)]
        enrollment_threshold: i32,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Write a screening report to disk
    Report {
        #[arg(long)]
        gender: Option<String>,
        #[arg(long, default_value_t = classify::DEFAULT_RADIUS_KM)]
        radius_km: f64,
        #[arg(long, default_value_t = classify::DEFAULT_ENROLLMENT_THRESHOLD)]
        enrollment_threshold: i32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Straight-line distance between two coordinates
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
    /// Summary statistics over a population-density CSV
    DensityStats {
        #[arg(long)]
        csv: PathBuf,
    },
}

// Explicit filter-then-classify step; the classifier itself never
// filters by gender.
fn filter_by_gender(
    schools: Vec<models::SchoolRecord>,
    gender: Option<&str>,
) -> Vec<models::SchoolRecord> {
    match gender {
        Some(label) => {
            let wanted = models::Gender::from_label(label);
            schools
                .into_iter()
                .filter(|school| school.gender == wanted)
                .collect()
        }
        None => schools,
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect().await?;
            let summary = db::import_csv(&pool, &csv).await?;
            println!("Imported {} schools from {}.", summary.imported, csv.display());
            if summary.missing_coordinates > 0 {
                println!(
                    "Skipped {} rows with missing coordinates.",
                    summary.missing_coordinates
                );
            }
        }
        Commands::Classify {
            gender,
            radius_km,
            enrollment_threshold,
            limit,
        } => {
            let pool = connect().await?;
            let schools = db::fetch_schools(&pool).await?;
            let schools = filter_by_gender(schools, gender.as_deref());
            let outcome = classify::classify_all(&schools, radius_km, enrollment_threshold);

            if outcome.total_schools == 0 && outcome.skipped.is_empty() {
                println!("No schools found for this selection.");
                return Ok(());
            }

            println!("Schools screened: {}", outcome.total_schools);
            println!("High schools: {}", outcome.high_school_count);
            println!("Middle schools: {}", outcome.middle_school_count);
            println!("Near a high school: {}", outcome.near_high_school_count);
            println!(
                "Isolated, high enrollment: {}",
                outcome.isolated_high_enrollment_count
            );
            println!(
                "Isolated, low enrollment: {}",
                outcome.isolated_low_enrollment_count
            );
            if !outcome.skipped.is_empty() {
                println!("Skipped (invalid coordinates): {}", outcome.skipped.len());
            }

            if outcome.upgrade_candidates.is_empty() {
                println!("No upgrade candidates in this selection.");
            } else {
                println!("Top upgrade candidates:");
                for row in outcome.upgrade_candidates.iter().take(limit) {
                    let enrollment = row
                        .enrollment
                        .map(|value| value.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    println!(
                        "- {} (EMIS {}) at {:.6}, {:.6}, enrollment {}",
                        row.school_name, row.emis_code, row.latitude, row.longitude, enrollment
                    );
                }
            }
        }
        Commands::Report {
            gender,
            radius_km,
            enrollment_threshold,
            out,
            json,
        } => {
            let pool = connect().await?;
            let schools = db::fetch_schools(&pool).await?;
            let schools = filter_by_gender(schools, gender.as_deref());
            let outcome = classify::classify_all(&schools, radius_km, enrollment_threshold);

            let contents = if json {
                report::to_json(&outcome)?
            } else {
                report::build_report(
                    gender.as_deref(),
                    radius_km,
                    enrollment_threshold,
                    Utc::now().date_naive(),
                    &outcome,
                )
            };
            std::fs::write(&out, contents)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            classify::validate_point(lat1, lon1)?;
            classify::validate_point(lat2, lon2)?;
            let km = geo::haversine_km(lat1, lon1, lat2, lon2);
            println!("Point 1: {lat1:.6}, {lon1:.6}");
            println!("Point 2: {lat2:.6}, {lon2:.6}");
            println!("Straight-line distance: {km:.2} km");
        }
        Commands::DensityStats { csv } => {
            let points = stats::read_density_csv(&csv)?;
            let values: Vec<f64> = points.iter().map(|point| point.density).collect();

            match stats::summarize(&values) {
                None => println!("No density points in {}.", csv.display()),
                Some(summary) => {
                    let mean_lat = points.iter().map(|point| point.latitude).sum::<f64>()
                        / points.len() as f64;
                    let mean_lon = points.iter().map(|point| point.longitude).sum::<f64>()
                        / points.len() as f64;
                    println!("Map center: {mean_lat:.4}, {mean_lon:.4}");
                    println!("Total data points: {}", summary.total_points);
                    println!("Maximum density: {:.0}", summary.max);
                    println!("Minimum density: {:.0}", summary.min);
                    println!("Average density: {:.0}", summary.mean);
                    println!("Median density: {:.0}", summary.median);
                    println!("Standard deviation: {:.0}", summary.std_dev);
                    println!("25th percentile: {:.0}", summary.q25);
                    println!("75th percentile: {:.0}", summary.q75);
                    println!("90th percentile: {:.0}", summary.q90);
                }
            }
        }
    }

    Ok(())
}
