use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docsim::clustering::adjacency::{lower_triangle, parse_square_matrix};
use docsim::clustering::{
    default_output_path, write_dendrogram, AdjacencyMatrix, Kmeans, SingleLinkClustering,
    SoftDivisiveClustering,
};
use docsim::config::Config;
use docsim::distances::MetricKind;
use docsim::error::{Error, Result};
use docsim::io::{list_files, write_lines, write_lower_triangle};
use docsim::representation::{AccumulatorMode, CentroidAccumulator, Corpus, WeightMode};
use docsim::similarity::score_matrix;
use docsim::visualization::{print_cluster_analysis, print_soft_cluster_analysis};
use log::{error, info};

/// Document similarity and clustering over word distributions
#[derive(Parser, Debug)]
#[command(name = "docsim")]
#[command(version)]
#[command(about = "Compare documents by their word distributions and cluster them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every document pair and write a lower-triangle matrix
    Similarity {
        /// YAML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run K-means and print a cluster report
    Kmeans {
        /// YAML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Soft divisive clustering by deterministic annealing
    Soft {
        /// YAML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Single-link clustering of a precomputed score matrix
    Hierarchical {
        /// Lower-triangle score matrix
        #[arg(short, long)]
        matrix: PathBuf,

        /// Document names, one per line
        #[arg(short, long)]
        names: PathBuf,

        /// Metric that produced the scores; decides which end is "similar"
        #[arg(long, conflicts_with = "high_score_is_similar")]
        metric: Option<String>,

        /// Treat high scores as similar (Cosine, Jaccard)
        #[arg(long)]
        high_score_is_similar: bool,

        /// Dendrogram file, defaults to `<matrix>-Clustering.txt`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Keep only the strict lower triangle of a full square matrix
    Strip {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Similarity { config } => {
            let config = load_config(&config)?;
            run_similarity(&config)
        }
        Commands::Kmeans { config } => {
            let config = load_config(&config)?;
            run_kmeans(&config)
        }
        Commands::Soft { config } => {
            let config = load_config(&config)?;
            run_soft(&config)
        }
        Commands::Hierarchical {
            matrix,
            names,
            metric,
            high_score_is_similar,
            output,
        } => {
            init_env_logger();
            let low_score_is_similar = match metric {
                Some(name) => name.parse::<MetricKind>()?.low_score_is_similar(),
                None => !high_score_is_similar,
            };
            let output = output.unwrap_or_else(|| default_output_path(&matrix));
            run_hierarchical(&matrix, &names, low_score_is_similar, &output)
        }
        Commands::Strip { input, output } => {
            init_env_logger();
            let text = std::fs::read_to_string(&input).map_err(|e| Error::io(&input, e))?;
            let square = parse_square_matrix(&text)?;
            write_lower_triangle(&output, &lower_triangle(square.view()))?;
            info!("Stripped {} x {} matrix into {}", square.nrows(), square.ncols(), output.display());
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let config = Config::from_file(path)?;
    config.setup_logging();
    info!("{}", config);
    Ok(config)
}

fn init_env_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn output_dir(config: &Config) -> Result<PathBuf> {
    let dir = config
        .output_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    Ok(dir)
}

fn run_similarity(config: &Config) -> Result<()> {
    let paths = list_files(&config.corpus.data_dir)?;
    let corpus = if config.corpus.bilingual {
        Corpus::load_bilingual(&paths)?.0
    } else {
        let mode = if config.clustering_params.relative_freq {
            WeightMode::Relative
        } else {
            WeightMode::Count
        };
        Corpus::load(&paths, &config.document_loader(mode)?)?
    };

    let metric = config.build_metric()?;
    let matrix = score_matrix(&corpus, metric.as_ref())?;

    let dir = output_dir(config)?;
    let matrix_path = dir.join(format!("{}.csv", metric.name()));
    let names_path = dir.join(format!("{}-names.txt", metric.name()));
    write_lower_triangle(&matrix_path, matrix.scores())?;
    write_lines(&names_path, matrix.documents())?;
    info!(
        "Wrote {} and {}",
        matrix_path.display(),
        names_path.display()
    );
    Ok(())
}

fn run_kmeans(config: &Config) -> Result<()> {
    let paths = list_files(&config.corpus.data_dir)?;
    let (corpus, template) = if config.corpus.bilingual {
        Corpus::load_bilingual(&paths)?
    } else {
        let mut accumulator = CentroidAccumulator::new(AccumulatorMode::Forgy);
        let loader = config.document_loader(WeightMode::Relative)?;
        let corpus = Corpus::load_with_accumulator(&paths, &loader, &mut accumulator)?;
        (corpus, accumulator.into_distribution())
    };

    let params = config.to_clustering_params()?;
    let mut kmeans = Kmeans::new(params, &corpus, template);
    let outcome = kmeans.fit()?;
    print_cluster_analysis(&kmeans, &outcome);
    Ok(())
}

fn run_soft(config: &Config) -> Result<()> {
    let paths = list_files(&config.corpus.data_dir)?;
    let mut accumulator = CentroidAccumulator::new(AccumulatorMode::Soft);
    let corpus = if config.corpus.bilingual {
        let (corpus, _) = Corpus::load_bilingual(&paths)?;
        for document in corpus.documents() {
            accumulator.absorb(document);
        }
        corpus
    } else {
        let loader = config.document_loader(WeightMode::Relative)?;
        Corpus::load_with_accumulator(&paths, &loader, &mut accumulator)?
    };

    let mut soft =
        SoftDivisiveClustering::new(config.to_soft_divisive_params(), &corpus, accumulator.mean());
    let outcome = soft.fit()?;
    print_soft_cluster_analysis(&soft, &outcome);
    Ok(())
}

fn run_hierarchical(
    matrix_path: &Path,
    names_path: &Path,
    low_score_is_similar: bool,
    output: &Path,
) -> Result<()> {
    let matrix = AdjacencyMatrix::from_files(matrix_path, names_path)?;
    let root = SingleLinkClustering::new(matrix, low_score_is_similar).fit()?;
    write_dendrogram(output, &root)?;
    info!("Dendrogram written to {}", output.display());
    Ok(())
}
