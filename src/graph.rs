use std::{fmt, io};

use indexmap::IndexSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A directed route leg between two stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub origin: String,
    pub destination: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.origin, self.destination)
    }
}

/// Unique edges in first-seen order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EdgeSet(pub IndexSet<Edge>);

impl EdgeSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.0.iter()
    }

    pub fn stations(&self) -> StationIndex {
        StationIndex::from_pairs(
            self.iter()
                .map(|edge| (edge.origin.as_str(), edge.destination.as_str())),
        )
    }

    pub fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, GraphError> {
        reader
            .deserialize::<Edge>()
            .map(|edge| edge.map_err(GraphError::from))
            .collect()
    }

    pub fn write_csv<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), GraphError> {
        if self.is_empty() {
            // serialize only emits headers alongside the first row
            writer.write_record(["origin", "destination"])?;
        }
        for edge in self.iter() {
            writer.serialize(edge)?;
        }
        Ok(())
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Station names with stable zero-based indices in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StationIndex(IndexSet<String>);

impl StationIndex {
    /// Every origin first, then every destination, each name kept at its
    /// first position.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (origins, destinations): (Vec<&str>, Vec<&str>) = pairs.into_iter().unzip();
        Self(
            origins
                .into_iter()
                .chain(destinations)
                .map(String::from)
                .collect(),
        )
    }

    pub fn insert(&mut self, station: &str) -> bool {
        self.0.insert(station.to_string())
    }

    pub fn index_of(&self, station: &str) -> Option<usize> {
        self.0.get_index_of(station)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get_index(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Square 0/1 matrix labelled by station on both axes. Row is the origin,
/// column the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    stations: StationIndex,
    cells: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    pub fn new(stations: StationIndex) -> Self {
        let size = stations.len();
        Self {
            stations,
            cells: vec![vec![0; size]; size],
        }
    }

    pub fn from_edges(stations: StationIndex, edges: &EdgeSet) -> Result<Self, GraphError> {
        let mut matrix = Self::new(stations);
        for edge in edges.iter() {
            matrix.connect(&edge.origin, &edge.destination)?;
        }
        Ok(matrix)
    }

    pub fn connect(&mut self, origin: &str, destination: &str) -> Result<(), GraphError> {
        let row = self.require(origin)?;
        let column = self.require(destination)?;
        self.cells[row][column] = 1;
        Ok(())
    }

    fn require(&self, station: &str) -> Result<usize, GraphError> {
        self.stations
            .index_of(station)
            .ok_or_else(|| GraphError::UnknownStation {
                station: station.to_string(),
            })
    }

    pub fn dimension(&self) -> usize {
        self.stations.len()
    }

    pub fn stations(&self) -> &StationIndex {
        &self.stations
    }

    #[cfg(test)]
    pub fn get(&self, origin: &str, destination: &str) -> Option<u8> {
        let row = self.stations.index_of(origin)?;
        let column = self.stations.index_of(destination)?;
        Some(self.cells[row][column])
    }

    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    pub fn out_degree(&self, index: usize) -> usize {
        self.row(index)
            .map(|row| row.iter().filter(|&&cell| cell == 1).count())
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        (0..self.dimension()).map(|index| self.out_degree(index)).sum()
    }

    pub fn write_csv<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), GraphError> {
        writer.write_record(std::iter::once("").chain(self.stations.names()))?;

        for (name, row) in self.stations.names().zip(&self.cells) {
            let cells = row.iter().map(u8::to_string);
            writer.write_record(std::iter::once(name.to_string()).chain(cells))?;
        }
        Ok(())
    }

    pub fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, GraphError> {
        let mut stations = StationIndex::default();
        for name in reader.headers()?.iter().skip(1) {
            if !stations.insert(name) {
                return Err(GraphError::malformed(format!(
                    "station {:?} appears twice in the header",
                    name
                )));
            }
        }

        let mut matrix = Self::new(stations);
        let mut row_count = 0;
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let expected = matrix.stations.name(index).ok_or_else(|| {
                GraphError::malformed(format!(
                    "more rows than the {} header stations",
                    matrix.dimension()
                ))
            })?;
            let label = record.get(0).unwrap_or_default();
            if label != expected {
                return Err(GraphError::malformed(format!(
                    "row {} is labelled {:?} but the header expects {:?}",
                    index, label, expected
                )));
            }
            if record.len() != matrix.dimension() + 1 {
                return Err(GraphError::malformed(format!(
                    "row {:?} has {} cells, expected {}",
                    label,
                    record.len().saturating_sub(1),
                    matrix.dimension()
                )));
            }

            for (column, cell) in record.iter().skip(1).enumerate() {
                matrix.cells[index][column] = match cell.trim() {
                    "0" => 0,
                    "1" => 1,
                    other => {
                        return Err(GraphError::malformed(format!(
                            "cell ({:?}, {}) holds {:?}, expected 0 or 1",
                            label, column, other
                        )))
                    }
                };
            }
            row_count += 1;
        }

        if row_count != matrix.dimension() {
            return Err(GraphError::malformed(format!(
                "{} rows for {} stations",
                row_count,
                matrix.dimension()
            )));
        }
        Ok(matrix)
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, row) in self.stations.names().zip(&self.cells) {
            writeln!(f, "{}: {}", name, row.iter().join(" "))?;
        }
        Ok(())
    }
}
