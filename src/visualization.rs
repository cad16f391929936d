use crate::clustering::{
    Cluster, Kmeans, KmeansOutcome, SoftDivisiveClustering, SoftDivisiveOutcome,
};
use crate::distances::DistanceMetric;
use crate::representation::Corpus;
use colored::Colorize;
use std::fmt;

pub fn print_cluster_analysis(kmeans: &Kmeans<'_>, outcome: &KmeansOutcome) {
    println!("\n{}", "=== Cluster Analysis ===".bold());

    let metric = kmeans.params.distance_metric.as_ref();
    let stats = calculate_cluster_stats(&kmeans.clusters, kmeans.corpus, metric);
    print_run_summary(outcome, metric, kmeans.sum_of_squared_error());
    print_summary_statistics(&stats);
    print_detailed_cluster_info(&stats);
    print_members(&kmeans.clusters, kmeans.corpus);
}

fn calculate_cluster_stats(
    clusters: &[Cluster],
    corpus: &Corpus,
    metric: &dyn DistanceMetric,
) -> Vec<ClusterStats> {
    clusters
        .iter()
        .enumerate()
        .map(|(idx, cluster)| {
            let (avg_score, sum_score) = calculate_score_stats(cluster, corpus, metric);
            ClusterStats {
                cluster_id: idx,
                size: cluster.member_count(),
                avg_score_to_centroid: avg_score,
                sum_score_to_centroid: sum_score,
                distribution_size: cluster.centroid.distribution_size,
            }
        })
        .collect()
}

fn calculate_score_stats(cluster: &Cluster, corpus: &Corpus, metric: &dyn DistanceMetric) -> (f64, f64) {
    if cluster.is_empty() {
        return (0.0, 0.0);
    }

    let sum_score: f64 = cluster
        .members()
        .iter()
        .filter_map(|&idx| corpus.get(idx))
        .map(|document| {
            metric.compute(
                &cluster.centroid.distribution,
                cluster.centroid.distribution_size,
                document.distribution(),
                document.corpus_size(),
            )
        })
        .sum();

    let avg_score = sum_score / cluster.member_count() as f64;
    (avg_score, sum_score)
}

#[derive(Debug)]
struct ClusterStats {
    cluster_id: usize,
    size: usize,
    avg_score_to_centroid: f64,
    sum_score_to_centroid: f64,
    distribution_size: usize,
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster {}: {} documents, Avg Score: {:.4}, Sum Score: {:.4}, Centroid Size: {}",
            self.cluster_id,
            self.size,
            self.avg_score_to_centroid,
            self.sum_score_to_centroid,
            self.distribution_size
        )
    }
}

fn print_run_summary(outcome: &KmeansOutcome, metric: &dyn DistanceMetric, sse: f64) {
    println!("\n{}", "Run:".bold());
    println!("Metric: {}", metric.name());
    println!("Clusters: {}", outcome.effective_k);
    println!("Iterations: {}", outcome.iterations);
    let status = if outcome.converged {
        "converged".green()
    } else {
        "stopped at iteration limit".yellow()
    };
    println!("Status: {}", status);
    if let Some(round) = outcome.stable_round {
        println!("Final Membership Since Round: {}", round);
    }
    println!("Sum of Squared Error: {:.6}", sse);
}

fn print_summary_statistics(stats: &[ClusterStats]) {
    println!("\n{}", "Summary Statistics:".bold());
    println!("Total Clusters: {}", stats.len());

    let total_documents: usize = stats.iter().map(|s| s.size).sum();
    let non_empty = stats.iter().filter(|s| s.size > 0).count();
    let avg_cluster_size = total_documents as f64 / stats.len().max(1) as f64;
    let total_sum_score: f64 = stats.iter().map(|s| s.sum_score_to_centroid).sum();
    let overall_avg_score = total_sum_score / total_documents.max(1) as f64;

    println!("Total Documents: {}", total_documents);
    println!("Non-empty Clusters: {}", non_empty);
    println!("Average Cluster Size: {:.2}", avg_cluster_size);
    println!("Total Sum of Scores: {:.4}", total_sum_score);
    println!("Overall Average Score: {:.4}", overall_avg_score);
}

fn print_detailed_cluster_info(stats: &[ClusterStats]) {
    println!("\n{}", "Detailed Cluster Information:".bold());
    for stat in stats {
        let info = format!("{}", stat);
        match stat.size {
            0 => println!("{}", info.red()),
            1 => println!("{}", info.yellow()),
            _ => println!("{}", info.green()),
        }
    }
}

fn print_members(clusters: &[Cluster], corpus: &Corpus) {
    println!("\n{}", "Members:".bold());
    for (idx, cluster) in clusters.iter().enumerate() {
        println!("\nCluster {}:", idx);
        for document in cluster.members().iter().filter_map(|&m| corpus.get(m)) {
            println!("  ├── {}", document.name());
        }
    }
}

pub fn print_soft_cluster_analysis(soft: &SoftDivisiveClustering<'_>, outcome: &SoftDivisiveOutcome) {
    println!("\n{}", "=== Soft Cluster Analysis ===".bold());

    println!("\n{}", "Run:".bold());
    println!("Clusters: {}", outcome.clusters);
    println!("Beta Steps: {}", outcome.beta_steps);
    println!("Final Beta: {:.3}", outcome.final_beta);

    println!("\n{}", "Memberships:".bold());
    for (document, row) in soft.corpus.documents().iter().zip(&soft.memberships) {
        let probabilities: Vec<String> = row.iter().map(|p| format!("{:.3}", p)).collect();
        println!("{}: [{}]", document.name(), probabilities.join(", "));
    }

    println!("\n{}", "Most Probable Cluster:".bold());
    let labels = soft.labels();
    for cluster in 0..soft.centroids.len() {
        let members: Vec<&str> = labels
            .iter()
            .zip(soft.corpus.documents())
            .filter(|&(&label, _)| label == cluster)
            .map(|(_, document)| document.name())
            .collect();
        let header = format!("Cluster {}: {} documents", cluster, members.len());
        match members.len() {
            0 => println!("\n{}", header.red()),
            1 => println!("\n{}", header.yellow()),
            _ => println!("\n{}", header.green()),
        }
        for name in members {
            println!("  ├── {}", name);
        }
    }
}
