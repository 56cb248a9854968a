use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::GraphError,
    graph::{AdjacencyMatrix, EdgeSet, StationIndex},
    route::RouteNameParser,
    table::RouteTable,
};

/// Where the three build artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub cleaned_file: String,
    pub edges_file: String,
    pub matrix_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cleaned_file: String::from("cleaned_routes.csv"),
            edges_file: String::from("edge_set.csv"),
            matrix_file: String::from("adjacency_matrix.csv"),
        }
    }
}

impl OutputConfig {
    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_file)
    }

    pub fn edges_path(&self) -> PathBuf {
        self.output_dir.join(&self.edges_file)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.output_dir.join(&self.matrix_file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub unparsed: usize,
    pub edges: usize,
    pub stations: usize,
}

/// The cleaned table together with the graph derived from it.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    pub table: RouteTable,
    pub edges: EdgeSet,
    pub matrix: AdjacencyMatrix,
    rows_read: usize,
}

impl RouteGraph {
    pub fn build(table: RouteTable) -> Result<Self, GraphError> {
        let rows_read = table.len();
        let table = table.clean();
        log::debug!("Kept {} of {} rows with a route name", table.len(), rows_read);

        let unparsed = table.unparsed_count();
        if unparsed > 0 {
            log::warn!(
                "{} route names have no origin/destination and are left out of the graph",
                unparsed
            );
        }

        let pairs: Vec<(&str, &str)> = table
            .records
            .iter()
            .filter_map(|record| Some((record.origin()?, record.destination()?)))
            .collect();

        let edges: EdgeSet = table.records.iter().filter_map(|record| record.edge()).collect();
        let stations = StationIndex::from_pairs(pairs);
        log::debug!("Derived {} edges over {} stations", edges.len(), stations.len());

        let matrix = AdjacencyMatrix::from_edges(stations, &edges)?;

        Ok(Self {
            table,
            edges,
            matrix,
            rows_read,
        })
    }

    pub fn report(&self) -> BuildReport {
        BuildReport {
            rows_read: self.rows_read,
            rows_kept: self.table.len(),
            unparsed: self.table.unparsed_count(),
            edges: self.edges.len(),
            stations: self.matrix.dimension(),
        }
    }

    pub fn write(&self, config: &OutputConfig) -> Result<(), GraphError> {
        fs::create_dir_all(&config.output_dir)
            .map_err(|e| GraphError::io(&config.output_dir, e))?;

        let path = config.cleaned_path();
        log::info!("Writing cleaned routes to {:?}", path);
        write_to(&path, |writer| self.table.write_csv(writer))?;

        let path = config.edges_path();
        log::info!("Writing edge list to {:?}", path);
        write_to(&path, |writer| self.edges.write_csv(writer))?;

        let path = config.matrix_path();
        log::info!("Writing adjacency matrix to {:?}", path);
        write_to(&path, |writer| self.matrix.write_csv(writer))?;

        Ok(())
    }
}

fn write_to<F>(path: &Path, write: F) -> Result<(), GraphError>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<(), GraphError>,
{
    let mut writer = csv::Writer::from_path(path)?;
    write(&mut writer)?;
    writer.flush().map_err(|e| GraphError::io(path, e))
}

/// Loads the routes table, derives the graph and writes all three artifacts.
/// Nothing is written unless the whole graph was derived.
pub fn run(input: &Path, config: &OutputConfig) -> Result<BuildReport, GraphError> {
    let parser = RouteNameParser::new()?;
    let table = RouteTable::from_path(input, &parser)?;
    let graph = RouteGraph::build(table)?;
    graph.write(config)?;
    Ok(graph.report())
}
