#[cfg(test)]
mod tests {
    use docsim::config::Config;
    use docsim::io::list_files;
    use docsim::representation::Corpus;
    use docsim::similarity::score_matrix;
    use std::fs;

    #[test]
    fn test_bilingual_lexicons_are_not_normalised_twice() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.e2f"), "house huis 0.8\ncat kat 0.2\n").unwrap();
        fs::write(
            dir.path().join("b.e2f"),
            "house huis 0.8\ncat kat 0.2\ndog hond 0.0\n",
        )
        .unwrap();

        let yaml = format!(
            "corpus:\n  data_dir: {:?}\n  bilingual: true\nclustering_params:\n  distance_metric: L1\n  relative_freq: false\n",
            dir.path().display().to_string()
        );
        let config = Config::from_yaml(&yaml).unwrap();

        let paths = list_files(&config.corpus.data_dir).unwrap();
        let (corpus, _) = Corpus::load_bilingual(&paths).unwrap();
        let metric = config.build_metric().unwrap();
        let matrix = score_matrix(&corpus, metric.as_ref()).unwrap();

        assert_eq!(matrix.scores(), &[0.0]);
    }
}
