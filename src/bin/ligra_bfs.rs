use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ligra::{edge_map_traced, load_graph, EdgeMapOptions, FirstVisit, StepInfo};
use ligra::{Vertex, VertexSubset};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ligra_bfs")]
#[command(about = "Breadth-first reachability by repeated edge maps", long_about = None)]
struct Cli {
    /// Graph file (`tag n m offsets... edges...`)
    graph: PathBuf,

    /// Source vertex
    #[arg(long, default_value_t = 0)]
    source: Vertex,

    /// Sparse/dense density divisor (overrides --options)
    #[arg(long)]
    ratio: Option<usize>,

    /// JSON file with edge map options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Treat the graph as symmetric and skip building its transpose
    #[arg(long, default_value_t = false)]
    symmetric: bool,

    /// Print the run report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    vertices: usize,
    edges: usize,
    source: Vertex,
    options: EdgeMapOptions,
    rounds: Vec<StepInfo>,
    reached: usize,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report = run(&cli)?;
    print_report(&report, cli.json)
}

/// Loads the graph and runs BFS from the source until the frontier empties.
fn run(cli: &Cli) -> Result<Report> {
    let options = resolve_options(cli)?;

    let graph = load_graph(&cli.graph)
        .with_context(|| format!("Failed to load graph {}", cli.graph.display()))?;
    let n = graph.num_vertices();
    if cli.source as usize >= n {
        bail!("source {} is out of range for {n} vertices", cli.source);
    }
    let transposed = (!cli.symmetric).then(|| graph.transpose());
    let in_graph = transposed.as_ref().unwrap_or(&graph);

    let start = Instant::now();
    let bfs = FirstVisit::new(n);
    bfs.visit(cli.source);

    let mut frontier = VertexSubset::from_vertex(cli.source);
    let mut rounds = Vec::new();
    loop {
        let (next, info) = edge_map_traced(&graph, in_graph, &frontier, &bfs, &options);
        let Some(info) = info else { break };
        rounds.push(info);
        frontier = next;
    }

    Ok(Report {
        vertices: n,
        edges: graph.num_edges(),
        source: cli.source,
        options,
        rounds,
        reached: bfs.visited_count(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1e3,
    })
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Graph: {} vertices, {} edges", report.vertices, report.edges);
    for (i, round) in report.rounds.iter().enumerate() {
        println!("  round {i:>3}: {:>10} active ({:?})", round.frontier, round.strategy);
    }
    println!(
        "Reached {} vertices from {} in {} rounds ({:.3} ms)",
        report.reached,
        report.source,
        report.rounds.len(),
        report.elapsed_ms
    );
    Ok(())
}

fn resolve_options(cli: &Cli) -> Result<EdgeMapOptions> {
    let mut options = match &cli.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse options {}", path.display()))?
        }
        None => EdgeMapOptions::default(),
    };
    if let Some(ratio) = cli.ratio {
        options.sparse_dense_ratio = ratio;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ligra::{LoadError, Strategy};
    use tempfile::NamedTempFile;

    use super::*;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ligra_bfs").chain(args.iter().copied()))
    }

    #[test]
    fn ratio_flag_overrides_options_file() {
        let options = temp_file(r#"{"sparse_dense_ratio": 20, "sparse_grain": 50}"#);
        let path = options.path().to_str().unwrap();

        let resolved = resolve_options(&cli(&["g.adj", "--options", path])).unwrap();
        assert_eq!(resolved.sparse_dense_ratio, 20);
        assert_eq!(resolved.sparse_grain, 50);

        let args = ["g.adj", "--options", path, "--ratio", "3"];
        let resolved = resolve_options(&cli(&args)).unwrap();
        assert_eq!(resolved.sparse_dense_ratio, 3);
        assert_eq!(resolved.sparse_grain, 50);

        let resolved = resolve_options(&cli(&["g.adj"])).unwrap();
        assert_eq!(resolved, EdgeMapOptions::default());
    }

    #[test]
    fn run_reports_each_round() {
        let graph = temp_file("AdjacencyGraph 4 3 0 2 3 3 1 2 3");
        let report = run(&cli(&[graph.path().to_str().unwrap()])).unwrap();

        assert_eq!(report.vertices, 4);
        assert_eq!(report.edges, 3);
        assert_eq!(report.reached, 4);
        let frontiers: Vec<usize> = report.rounds.iter().map(|r| r.frontier).collect();
        assert_eq!(frontiers, vec![1, 2, 1]);
        // n / 10 is 0 here, so every non-empty frontier runs dense.
        assert!(report.rounds.iter().all(|r| r.strategy == Strategy::Dense));

        let report = run(&cli(&[graph.path().to_str().unwrap(), "--ratio", "0"])).unwrap();
        assert_eq!(report.reached, 4);
        assert!(report.rounds.iter().all(|r| r.strategy == Strategy::Sparse));
    }

    #[test]
    fn run_rejects_out_of_range_source() {
        let graph = temp_file("AdjacencyGraph 4 3 0 2 3 3 1 2 3");
        let err = run(&cli(&[graph.path().to_str().unwrap(), "--source", "4"])).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn run_surfaces_malformed_graph() {
        let graph = temp_file("AdjacencyGraph 4 3 0 2 3");
        let err = run(&cli(&[graph.path().to_str().unwrap()])).unwrap_err();
        assert!(err
            .chain()
            .any(|e| matches!(e.downcast_ref::<LoadError>(), Some(LoadError::TokenCount { .. }))));
    }
}
