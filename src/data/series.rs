//! Chart series projected from the reading list.

use super::reading::Reading;

/// One chart point: 1-based list position and the raw field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: usize,
    pub y: Option<f64>,
}

/// Soil moisture and pH over list position, aligned point for point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub soil_moisture: Vec<Point>,
    pub ph: Vec<Point>,
}

impl ChartSeries {
    /// Project the list into both series.
    ///
    /// x is `index + 1` in input order; values are copied untouched, so a
    /// missing measurement stays a `None` point.
    pub fn project(readings: &[Reading]) -> Self {
        Self {
            soil_moisture: project_field(readings, |r| r.soil_moisture),
            ph: project_field(readings, |r| r.ph),
        }
    }

    pub fn len(&self) -> usize {
        self.soil_moisture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soil_moisture.is_empty()
    }
}

/// Project one field of each reading into a series.
pub fn project_field<F>(readings: &[Reading], field: F) -> Vec<Point>
where
    F: Fn(&Reading) -> Option<f64>,
{
    readings
        .iter()
        .enumerate()
        .map(|(i, r)| Point {
            x: i + 1,
            y: field(r),
        })
        .collect()
}

/// Points with a value, as `(x, y)` pairs for plotting.
pub fn plottable(points: &[Point]) -> Vec<(f64, f64)> {
    points.iter().filter_map(|p| p.y.map(|y| (p.x as f64, y))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reading() {
        let series = ChartSeries::project(&[Reading::new(25.0, 5.5, 60.0, 28.0)]);
        assert_eq!(series.soil_moisture, vec![Point { x: 1, y: Some(25.0) }]);
        assert_eq!(series.ph, vec![Point { x: 1, y: Some(5.5) }]);
    }

    #[test]
    fn test_empty_list() {
        let series = ChartSeries::project(&[]);
        assert!(series.is_empty());
        assert!(series.ph.is_empty());
    }

    #[test]
    fn test_lengths_and_x_values() {
        let readings: Vec<Reading> =
            (0..7).map(|i| Reading::new(i as f64 * 10.0, 6.0, 50.0, 20.0)).collect();
        let series = ChartSeries::project(&readings);

        assert_eq!(series.soil_moisture.len(), readings.len());
        assert_eq!(series.ph.len(), readings.len());

        let xs: Vec<usize> = series.soil_moisture.iter().map(|p| p.x).collect();
        assert_eq!(xs, (1..=7).collect::<Vec<_>>());
        assert_eq!(series.soil_moisture[3].y, Some(30.0));
    }

    #[test]
    fn test_missing_values_pass_through() {
        let mut gap = Reading::new(40.0, 6.5, 50.0, 20.0);
        gap.ph = None;
        let readings = vec![Reading::new(50.0, 7.0, 50.0, 20.0), gap];

        let series = ChartSeries::project(&readings);
        assert_eq!(series.ph.len(), 2);
        assert_eq!(series.ph[1], Point { x: 2, y: None });

        assert_eq!(plottable(&series.ph), vec![(1.0, 7.0)]);
        assert_eq!(plottable(&series.soil_moisture), vec![(1.0, 50.0), (2.0, 40.0)]);
    }
}
