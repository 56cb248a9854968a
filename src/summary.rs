use std::{io, path::Path};

use itertools::Itertools;
use serde::Deserialize;

use crate::error::GraphError;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub count: u64,
    pub traversal: u64,
}

/// Total `traversal` per distinct `count`, ascending by count.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub bins: Vec<(u64, u64)>,
}

impl Histogram {
    pub fn from_rows<I: IntoIterator<Item = SummaryRow>>(rows: I) -> Self {
        let bins = rows
            .into_iter()
            .map(|row| (row.count, row.traversal))
            .into_grouping_map()
            .sum()
            .into_iter()
            .sorted()
            .collect();
        Self { bins }
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        log::info!("Loading summary from {:?}", path);
        Self::from_csv(csv::Reader::from_path(path)?)
    }

    pub fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, GraphError> {
        let rows: Vec<SummaryRow> = reader.deserialize().collect::<Result<_, _>>()?;
        log::debug!("Loaded {} summary rows", rows.len());
        Ok(Self::from_rows(rows))
    }

    /// One line per bin; the largest total spans `width` characters.
    pub fn render(&self, width: usize) -> String {
        let Some(max) = self.bins.iter().map(|&(_, total)| total).max() else {
            return String::from("no data\n");
        };
        let label_width = self
            .bins
            .iter()
            .map(|(count, _)| count.to_string().len())
            .max()
            .unwrap_or_default();

        self.bins
            .iter()
            .map(|&(count, total)| {
                let bar = match max {
                    0 => 0,
                    _ => (total as f64 / max as f64 * width as f64).round() as usize,
                };
                format!("{:>label_width$} | {} {}\n", count, "#".repeat(bar), total)
            })
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(data: &str) -> Result<Histogram, GraphError> {
        Histogram::from_csv(csv::Reader::from_reader(data.as_bytes()))
    }

    #[test]
    fn sums_traversal_per_count() {
        let histogram = load("count,traversal\n3,4\n1,2\n3,6\n10,5\n").unwrap();
        assert_eq!(histogram.bins, vec![(1, 2), (3, 10), (10, 5)]);
    }

    #[test]
    fn renders_scaled_bars() {
        let histogram = load("count,traversal\n1,2\n3,10\n10,5\n").unwrap();
        assert_eq!(
            histogram.render(10),
            " 1 | ## 2\n 3 | ########## 10\n10 | ##### 5\n"
        );
    }

    #[test]
    fn empty_summary_renders_placeholder() {
        let histogram = load("count,traversal\n").unwrap();
        assert_eq!(histogram.render(10), "no data\n");
    }

    #[test]
    fn zero_totals_render_without_bars() {
        let histogram = load("count,traversal\n1,0\n").unwrap();
        assert_eq!(histogram.render(10), "1 |  0\n");
    }

    #[test]
    fn missing_column_is_an_error() {
        assert!(matches!(load("count\n1\n"), Err(GraphError::Csv(_))));
    }
}
