use crate::clustering::soft_divisive::{
    DEFAULT_BETA_MAX, DEFAULT_BETA_STEP_DOWN, DEFAULT_BETA_STEP_UP, DEFAULT_INITIAL_BETA,
    DEFAULT_MAX_CLUSTERS, DEFAULT_ROUNDS_PER_BETA,
};
use crate::clustering::{
    ClusteringParams, InitializationMethod, SoftDivisiveParams, DEFAULT_MAX_ITERATIONS,
};
use crate::core::TopN;
use crate::distances::{Combination, DistanceMetric, MetricKind, DEFAULT_CHI_SQUARE_TOP_N};
use crate::error::{Error, Result};
use crate::representation::{DocumentLoader, WeightMode};
use crate::vocabulary::{Language, StopwordList};
use log::{error, warn, LevelFilter};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fmt, sync::Arc};

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_chi_square_top_n() -> usize {
    DEFAULT_CHI_SQUARE_TOP_N
}

fn default_shortlist_dir() -> PathBuf {
    PathBuf::from("shortlists")
}

#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    pub data_dir: PathBuf,
    pub language: Option<String>, // E.g., "english"; no stopword filtering when absent
    #[serde(default = "default_shortlist_dir")]
    pub shortlist_dir: PathBuf,
    #[serde(default)]
    pub bilingual: bool,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ClusteringParamsConfig {
    pub distance_metric: String,               // E.g., "KL"
    pub initialization_method: Option<String>, // E.g., "ForgyPairs"
    #[serde(default)]
    pub k: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    pub rng_seed: Option<u64>,
    #[serde(default = "default_true")]
    pub relative_freq: bool,
    pub combination: Option<String>, // "average" or "minimum", KL and Chi-square only
    #[serde(default = "default_chi_square_top_n")]
    pub chi_square_top_n: usize,
}

/// Annealing schedule of the soft divisive run; every field is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SoftClusteringConfig {
    pub initial_beta: f64,
    pub beta_max: f64,
    pub max_clusters: usize,
    pub rounds_per_beta: usize,
    pub beta_step_up: f64,
    pub beta_step_down: f64,
}

impl Default for SoftClusteringConfig {
    fn default() -> Self {
        Self {
            initial_beta: DEFAULT_INITIAL_BETA,
            beta_max: DEFAULT_BETA_MAX,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            rounds_per_beta: DEFAULT_ROUNDS_PER_BETA,
            beta_step_up: DEFAULT_BETA_STEP_UP,
            beta_step_down: DEFAULT_BETA_STEP_DOWN,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String, // Log level, e.g., "info", "debug", "warn", "error"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub clustering_params: ClusteringParamsConfig,
    #[serde(default)]
    pub soft_clustering: SoftClusteringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub output_path: Option<PathBuf>, // Directory for score matrices and reports
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Corpus:")?;
        writeln!(f, "    Data Directory: {}", self.corpus.data_dir.display())?;
        writeln!(
            f,
            "    Language: {}",
            self.corpus.language.as_deref().unwrap_or("None")
        )?;
        writeln!(f, "    Bilingual: {}", self.corpus.bilingual)?;
        match self.corpus.top_n {
            Some(top_n) => writeln!(f, "    Top N: {}", top_n)?,
            None => writeln!(f, "    Top N: all")?,
        }
        writeln!(f, "  Clustering Parameters:")?;
        writeln!(
            f,
            "    Distance Metric: {}",
            self.clustering_params.distance_metric
        )?;
        writeln!(
            f,
            "    Initialization Method: {}",
            self.clustering_params
                .initialization_method
                .as_deref()
                .unwrap_or("ForgyPairs")
        )?;
        writeln!(f, "    K: {}", self.clustering_params.k)?;
        writeln!(
            f,
            "    Max Iterations: {}",
            self.clustering_params.max_iterations
        )?;
        writeln!(
            f,
            "    Relative Frequency: {}",
            self.clustering_params.relative_freq
        )?;
        if let Some(combination) = &self.clustering_params.combination {
            writeln!(f, "    Combination: {}", combination)?;
        }
        writeln!(f, "  Soft Clustering:")?;
        writeln!(
            f,
            "    Beta: {} to {}",
            self.soft_clustering.initial_beta, self.soft_clustering.beta_max
        )?;
        writeln!(f, "    Max Clusters: {}", self.soft_clustering.max_clusters)?;
        writeln!(f, "  Logging:")?;
        writeln!(f, "    Level: {}", self.logging.level)?;
        if let Some(output_path) = &self.output_path {
            writeln!(f, "  Output Path: {}", output_path.display())?;
        } else {
            writeln!(f, "  Output Path: None")?;
        }
        Ok(())
    }
}

impl Config {
    /// Reads the YAML configuration file and returns a validated `Config`.
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let file_content =
            std::fs::read_to_string(file_path).map_err(|e| Error::io(file_path, e))?;
        Self::from_yaml(&file_content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.metric_kind()?;
        self.initialization_method()?;
        self.combination()?;
        self.language()?;
        self.level_filter()?;

        if self.corpus.top_n == Some(0) {
            return Err(Error::InvalidConfig(
                "top_n must be greater than 0".to_string(),
            ));
        }
        if self.clustering_params.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        self.to_soft_divisive_params().validate()?;
        if self.clustering_params.chi_square_top_n == 0 {
            return Err(Error::InvalidConfig(
                "chi_square_top_n must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn metric_kind(&self) -> Result<MetricKind> {
        self.clustering_params.distance_metric.parse()
    }

    pub fn initialization_method(&self) -> Result<InitializationMethod> {
        self.clustering_params
            .initialization_method
            .as_deref()
            .map_or(Ok(InitializationMethod::default()), str::parse)
    }

    pub fn combination(&self) -> Result<Option<Combination>> {
        self.clustering_params
            .combination
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    pub fn language(&self) -> Result<Option<Language>> {
        self.corpus.language.as_deref().map(str::parse).transpose()
    }

    /// Metric for pairwise scoring. Bilingual lexicons already hold
    /// probabilities, so they are always scored in relative mode.
    pub fn build_metric(&self) -> Result<Arc<dyn DistanceMetric>> {
        let relative_freq = self.clustering_params.relative_freq || self.corpus.bilingual;
        if relative_freq != self.clustering_params.relative_freq {
            warn!("Bilingual lexicons hold probabilities; scoring in relative mode");
        }
        self.build_metric_with(relative_freq)
    }

    fn build_metric_with(&self, relative_freq: bool) -> Result<Arc<dyn DistanceMetric>> {
        Ok(self.metric_kind()?.build(
            relative_freq,
            self.combination()?,
            self.clustering_params.chi_square_top_n,
        ))
    }

    /// Converts `ClusteringParamsConfig` into `ClusteringParams`.
    ///
    /// K-means documents and centroids hold relative frequencies, so the
    /// metric runs in relative mode whatever `relative_freq` says.
    pub fn to_clustering_params(&self) -> Result<ClusteringParams> {
        if !self.clustering_params.relative_freq {
            warn!("K-means works on relative frequencies; ignoring relative_freq: false");
        }
        Ok(ClusteringParams {
            distance_metric: self.build_metric_with(true)?,
            initialization_method: self.initialization_method()?,
            k: self.clustering_params.k,
            max_iterations: self.clustering_params.max_iterations,
            rng_seed: self.clustering_params.rng_seed,
        })
    }

    pub fn to_soft_divisive_params(&self) -> SoftDivisiveParams {
        let soft = &self.soft_clustering;
        SoftDivisiveParams {
            initial_beta: soft.initial_beta,
            beta_max: soft.beta_max,
            max_clusters: soft.max_clusters,
            rounds_per_beta: soft.rounds_per_beta,
            beta_step_up: soft.beta_step_up,
            beta_step_down: soft.beta_step_down,
            rng_seed: self.clustering_params.rng_seed,
        }
    }

    /// A loader for monolingual documents in the given weight mode, with the
    /// configured shortlist and truncation.
    pub fn document_loader(&self, mode: WeightMode) -> Result<DocumentLoader> {
        let mut loader = DocumentLoader::new()
            .with_mode(mode)
            .with_top_n(TopN::from(self.corpus.top_n));
        if let Some(language) = self.language()? {
            loader = loader.with_stopwords(StopwordList::for_language(
                language,
                &self.corpus.shortlist_dir,
            )?);
        }
        Ok(loader)
    }

    fn level_filter(&self) -> Result<LevelFilter> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::Trace),
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" => Ok(LevelFilter::Off),
            _ => Err(Error::InvalidConfig(format!(
                "unsupported log level: {}",
                self.logging.level
            ))),
        }
    }

    /// Sets up logging based on the logging level in the configuration.
    pub fn setup_logging(&self) {
        let level_filter = self.level_filter().unwrap_or(LevelFilter::Info);

        if let Err(e) = env_logger::Builder::new()
            .filter_level(level_filter)
            .try_init()
        {
            error!("Failed to initialize logger: {}", e);
        }
    }
}
