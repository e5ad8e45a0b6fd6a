use std::path::Path;

use serde::Deserialize;

/// One row of the WorldPop density extract.
#[derive(Debug, Clone, Deserialize)]
pub struct DensityPoint {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Population Density at 1km")]
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DensitySummary {
    pub total_points: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub q25: f64,
    pub q75: f64,
    pub q90: f64,
}

pub fn read_density_csv(path: &Path) -> anyhow::Result<Vec<DensityPoint>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut points = Vec::new();

    for result in reader.deserialize::<DensityPoint>() {
        points.push(result?);
    }

    Ok(points)
}

/// Summary statistics over a density series. Quantiles use linear
/// interpolation between order statistics; the standard deviation uses
/// the n-1 denominator. Returns None for an empty series.
pub fn summarize(values: &[f64]) -> Option<DensitySummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let total_points = sorted.len();
    let mean = sorted.iter().sum::<f64>() / total_points as f64;
    let std_dev = if total_points < 2 {
        0.0
    } else {
        let sum_sq = sorted
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>();
        (sum_sq / (total_points - 1) as f64).sqrt()
    };

    Some(DensitySummary {
        total_points,
        max: sorted[total_points - 1],
        min: sorted[0],
        mean,
        median: quantile(&sorted, 0.5),
        std_dev,
        q25: quantile(&sorted, 0.25),
        q75: quantile(&sorted, 0.75),
        q90: quantile(&sorted, 0.90),
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;

    if lower + 1 >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
}
