use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    error::GraphError,
    graph::{AdjacencyMatrix, EdgeSet},
    pipeline::OutputConfig,
    summary::Histogram,
};

mod error;
mod graph;
mod pipeline;
mod route;
mod summary;
mod table;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    #[command(
        name = "build",
        about = "derive the edge list and adjacency matrix from a routes table"
    )]
    Build {
        /// a CSV file with a route_long_name column
        input: PathBuf,
        /// directory receiving the three output files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(long, default_value_t = String::from("cleaned_routes.csv"))]
        cleaned_file: String,
        #[arg(long, default_value_t = String::from("edge_set.csv"))]
        edges_file: String,
        #[arg(long, default_value_t = String::from("adjacency_matrix.csv"))]
        matrix_file: String,
    },
    #[command(
        name = "histogram",
        about = "render a count/traversal summary table as a text histogram"
    )]
    Histogram {
        /// a CSV file with count and traversal columns
        summary: PathBuf,
        /// length of the longest bar
        #[arg(long, default_value_t = 50)]
        width: usize,
    },
    #[command(name = "inspect-edges", about = "summarize a previously written edge list")]
    InspectEdges { edges: PathBuf },
    #[command(
        name = "inspect-matrix",
        about = "summarize a previously written adjacency matrix"
    )]
    InspectMatrix { matrix: PathBuf },
}

impl App {
    pub fn run(self) -> Result<(), GraphError> {
        match self {
            Self::Build {
                input,
                output_dir,
                cleaned_file,
                edges_file,
                matrix_file,
            } => {
                let config = OutputConfig {
                    output_dir,
                    cleaned_file,
                    edges_file,
                    matrix_file,
                };
                let report = pipeline::run(&input, &config)?;
                log::info!(
                    "Kept {} of {} rows ({} unparsed), {} edges over {} stations",
                    report.rows_kept,
                    report.rows_read,
                    report.unparsed,
                    report.edges,
                    report.stations
                );
            }
            Self::Histogram { summary, width } => {
                print!("{}", Histogram::from_path(&summary)?.render(width));
            }
            Self::InspectEdges { edges } => {
                let edges = EdgeSet::from_csv(csv::Reader::from_path(&edges)?)?;
                let matrix = AdjacencyMatrix::from_edges(edges.stations(), &edges)?;
                println!(
                    "{} edges over {} stations",
                    edges.len(),
                    matrix.dimension()
                );
                for edge in edges.iter() {
                    println!("{}", edge);
                }
            }
            Self::InspectMatrix { matrix } => {
                let matrix = AdjacencyMatrix::from_csv(csv::Reader::from_path(&matrix)?)?;
                println!(
                    "{}x{} matrix with {} edges",
                    matrix.dimension(),
                    matrix.dimension(),
                    matrix.edge_count()
                );
                let degrees = matrix
                    .stations()
                    .names()
                    .enumerate()
                    .map(|(index, name)| format!("{} ({})", name, matrix.out_degree(index)))
                    .join(", ");
                println!("out-degree: {}", degrees);
            }
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    if let Err(e) = args.app.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
