#[cfg(test)]
mod tests {
    use docsim::clustering::{SoftDivisiveClustering, SoftDivisiveParams};
    use docsim::io::list_files;
    use docsim::representation::{
        AccumulatorMode, CentroidAccumulator, Corpus, DocumentLoader, WeightMode,
    };

    #[test]
    fn test_soft_accumulator_mean_seeds_the_annealing() {
        let dir = tempfile::tempdir().unwrap();
        let texts = [
            "apple pear apple plum pear apple",
            "pear apple plum plum apple",
            "car bus car truck bus",
            "bus truck car truck",
        ];
        for (i, text) in texts.iter().enumerate() {
            std::fs::write(dir.path().join(format!("doc{i}.txt")), text).unwrap();
        }
        let paths = list_files(dir.path()).unwrap();

        let loader = DocumentLoader::new().with_mode(WeightMode::Relative);
        let mut accumulator = CentroidAccumulator::new(AccumulatorMode::Soft);
        let corpus = Corpus::load_with_accumulator(&paths, &loader, &mut accumulator).unwrap();
        let mean = accumulator.mean();
        assert!((mean.total() - 1.0).abs() < 1e-12);
        assert!((mean.weight("apple") - (0.5 + 0.4) / 4.0).abs() < 1e-12);

        for seed in [11, 12, 13] {
            let params = SoftDivisiveParams::default()
                .with_max_clusters(2)
                .with_seed(seed);
            let mut soft = SoftDivisiveClustering::new(params, &corpus, mean.clone());
            let outcome = soft.fit().unwrap();

            assert_eq!(outcome.clusters, 2);
            let labels = soft.labels();
            assert_eq!(labels[0], labels[1]);
            assert_eq!(labels[2], labels[3]);
            assert_ne!(labels[0], labels[2]);
        }
    }
}
