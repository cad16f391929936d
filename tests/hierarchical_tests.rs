#[cfg(test)]
mod tests {
    use docsim::clustering::{
        default_output_path, write_dendrogram, AdjacencyMatrix, HierarchicalCluster,
        SingleLinkClustering,
    };
    use docsim::io::{write_lines, write_lower_triangle};
    use docsim::Error;
    use std::fs;

    fn three_documents() -> AdjacencyMatrix {
        // d(1,2) = 0.1, d(1,3) = 0.5, d(2,3) = 0.4
        AdjacencyMatrix::from_parts(
            vec![0.1, 0.5, 0.4],
            vec!["doc1".into(), "doc2".into(), "doc3".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_clustering() {
        let root = SingleLinkClustering::new(three_documents(), true)
            .fit()
            .expect("Clustering failed");

        assert_eq!(root.min_distance(), 0.4);
        let HierarchicalCluster::Binary { left, right, .. } = &root else {
            panic!("root should be a merge, got {root:?}");
        };
        assert_eq!(left.members(), vec!["doc3"]);
        assert_eq!(right.min_distance(), 0.1);
        let mut inner = right.members();
        inner.sort_unstable();
        assert_eq!(inner, vec!["doc1", "doc2"]);
    }

    #[test]
    fn test_adjacency_indices_for_four_documents() {
        let mut seen = Vec::new();
        for index in 0..6 {
            let (row, column) = AdjacencyMatrix::index_to_pair(index);
            assert!(column < row && row < 4);
            seen.push((row, column));
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_dendrogram_file_from_matrix_files() {
        let dir = tempfile::tempdir().unwrap();
        let matrix_path = dir.path().join("L1.csv");
        let names_path = dir.path().join("L1-names.txt");
        write_lower_triangle(&matrix_path, &[0.1, 0.5, 0.4]).unwrap();
        write_lines(&names_path, ["doc1", "doc2", "", "doc3"]).unwrap();

        let matrix = AdjacencyMatrix::from_files(&matrix_path, &names_path).unwrap();
        assert_eq!(matrix.document_count(), 3);

        let root = SingleLinkClustering::new(matrix, true).fit().unwrap();
        let output = default_output_path(&matrix_path);
        write_dendrogram(&output, &root).unwrap();

        let text = fs::read_to_string(dir.path().join("L1.csv-Clustering.txt")).unwrap();
        let expected = "\
|||||-Observation: doc3
||||||0.4
||||||-Observation: doc1
|||||||0.1
||||||-Observation: doc2
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_misshapen_rows_are_rejected_even_when_the_total_fits() {
        let dir = tempfile::tempdir().unwrap();
        let matrix_path = dir.path().join("L1.csv");
        let names_path = dir.path().join("L1-names.txt");
        fs::write(&matrix_path, "0.1,0.5,\n0.4,\n").unwrap();
        write_lines(&names_path, ["doc1", "doc2", "doc3"]).unwrap();

        let result = AdjacencyMatrix::from_files(&matrix_path, &names_path);
        assert!(matches!(result, Err(Error::MalformedMatrix { line: 1, .. })));
    }
}
