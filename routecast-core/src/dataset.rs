//! The aggregated forecast table and the views the dashboard draws from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Coordinates, ForecastRow, Metric, SkippedPoint};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Union of forecast rows across all route points of one refresh.
pub struct AggregatedDataset {
    /// Rows grouped by route point, in route order.
    pub rows: Vec<ForecastRow>,
    /// Route points that contributed no rows or fewer than requested.
    pub skipped: Vec<SkippedPoint>,
}

/// Values of one metric over time for a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Route point name.
    pub location: String,
    /// `(date, value)` pairs in row order.
    pub points: Vec<(NaiveDate, f64)>,
}

impl AggregatedDataset {
    /// True when no route point produced any rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct location names in first-appearance order.
    #[must_use]
    pub fn locations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.location.as_str()) {
                names.push(row.location.as_str());
            }
        }
        names
    }

    /// One series per location for the given metric.
    #[must_use]
    pub fn series(&self, metric: Metric) -> Vec<Series> {
        self.locations()
            .into_iter()
            .map(|location| Series {
                location: location.to_owned(),
                points: self
                    .rows
                    .iter()
                    .filter(|row| row.location == location)
                    .map(|row| (row.date, metric.value(row)))
                    .collect(),
            })
            .collect()
    }

    /// Map markers: one per location that has coordinates, in route order.
    #[must_use]
    pub fn markers(&self) -> Vec<(&str, Coordinates)> {
        let mut markers: Vec<(&str, Coordinates)> = Vec::new();
        for row in &self.rows {
            let Some(coordinates) = row.coordinates else {
                continue;
            };
            if markers.iter().all(|(name, _)| *name != row.location) {
                markers.push((row.location.as_str(), coordinates));
            }
        }
        markers
    }

    /// Smallest and largest value of the metric, `None` without rows.
    #[must_use]
    pub fn value_bounds(&self, metric: Metric) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| metric.value(row))
            .fold(None, |bounds, value| match bounds {
                None => Some((value, value)),
                Some((low, high)) => Some((low.min(value), high.max(value))),
            })
    }

    /// Earliest and latest row date, `None` without rows.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|row| row.date).min()?;
        let last = self.rows.iter().map(|row| row.date).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location: &str, day: u32, temperature: f64, coordinates: Option<Coordinates>) -> ForecastRow {
        ForecastRow {
            date: NaiveDate::from_ymd_opt(2024, 7, day).expect("valid date"),
            location: location.to_owned(),
            coordinates,
            temperature,
            humidity: 50.0,
            wind_speed: 10.0,
            precipitation_probability: 20.0,
            description: String::from("Sunny"),
        }
    }

    const MOSCOW: Coordinates = Coordinates {
        latitude: 55.75,
        longitude: 37.62,
    };

    #[test]
    fn empty_dataset_views_are_empty() {
        let dataset = AggregatedDataset::default();

        assert!(dataset.is_empty());
        assert!(dataset.series(Metric::Temperature).is_empty());
        assert!(dataset.markers().is_empty());
        assert_eq!(dataset.value_bounds(Metric::Humidity), None);
        assert_eq!(dataset.date_span(), None);
    }

    #[test]
    fn series_are_grouped_by_location_in_first_appearance_order() {
        let dataset = AggregatedDataset {
            rows: vec![
                row("Moscow", 1, 20.0, Some(MOSCOW)),
                row("Moscow", 2, 22.0, Some(MOSCOW)),
                row("Omsk", 1, 15.0, None),
            ],
            skipped: Vec::new(),
        };

        let series = dataset.series(Metric::Temperature);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].location, "Moscow");
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[0].points[1].1, 22.0);
        assert_eq!(series[1].location, "Omsk");
        assert_eq!(dataset.value_bounds(Metric::Temperature), Some((15.0, 22.0)));
    }

    #[test]
    fn markers_skip_rows_without_coordinates() {
        let spb = Coordinates {
            latitude: 59.94,
            longitude: 30.31,
        };
        let dataset = AggregatedDataset {
            rows: vec![
                row("Moscow", 1, 20.0, Some(MOSCOW)),
                row("Moscow", 2, 21.0, Some(MOSCOW)),
                row("Omsk", 1, 15.0, None),
                row("SPB", 1, 17.0, Some(spb)),
            ],
            skipped: Vec::new(),
        };

        let markers = dataset.markers();

        assert_eq!(markers, vec![("Moscow", MOSCOW), ("SPB", spb)]);
        assert_eq!(
            dataset.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date"),
                NaiveDate::from_ymd_opt(2024, 7, 2).expect("valid date"),
            ))
        );
    }
}
