// Semantic clustering and emergence detection with a deterministic embedder.
//
// The keyword embedder puts every title that shares a vocabulary word on the
// same point, so cluster membership is known ahead of time.

mod common;

use common::{paper, papers, BrokenEmbedder, KeywordEmbedder};
use trendlens::corpus::models::Paper;
use trendlens::topics::clusters::compute_topics;
use trendlens::topics::emerging::{compute_emerging_topics, EmergenceThresholds};

fn two_topic_corpus() -> Vec<Paper> {
    let mut corpus = papers("Quantum annealing schedules", 2023, 6);
    corpus.extend(papers("Graph neural networks", 2023, 3));
    corpus
}

fn embedder() -> KeywordEmbedder {
    KeywordEmbedder::new(&["quantum", "graph", "diffusion"])
}

// ============================================================
// compute_topics
// ============================================================

#[tokio::test]
async fn clusters_sorted_by_size_with_representatives() {
    let corpus = two_topic_corpus();
    let topics = compute_topics(&embedder(), &corpus, 2).await.unwrap();

    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].size, 6);
    assert_eq!(topics[1].size, 3);

    assert_eq!(topics[0].representative_titles.len(), 3);
    assert!(topics[0]
        .representative_titles
        .iter()
        .all(|t| t.starts_with("Quantum")));
    assert!(topics[1]
        .representative_titles
        .iter()
        .all(|t| t.starts_with("Graph")));
    assert!(topics[0].keywords.len() <= 5);
}

#[tokio::test]
async fn representatives_come_from_corpus_titles() {
    let corpus = two_topic_corpus();
    let titles: Vec<&str> = corpus.iter().map(|p| p.title.as_str()).collect();
    let topics = compute_topics(&embedder(), &corpus, 2).await.unwrap();

    for topic in &topics {
        assert!(topic.representative_titles.len() <= 3);
        assert!(topic.representative_titles.len() <= topic.size);
        for title in &topic.representative_titles {
            assert!(titles.contains(&title.as_str()), "unknown title {title}");
        }
    }
}

#[tokio::test]
async fn sizes_sum_to_titled_papers() {
    let mut corpus = two_topic_corpus();
    corpus.push(paper("", 2023));
    corpus.push(paper("   ", 2023));

    let topics = compute_topics(&embedder(), &corpus, 2).await.unwrap();
    let total: usize = topics.iter().map(|t| t.size).sum();
    assert_eq!(total, 9);
}

#[tokio::test]
async fn same_input_same_clusters() {
    let corpus = two_topic_corpus();
    let first = compute_topics(&embedder(), &corpus, 2).await.unwrap();
    let second = compute_topics(&embedder(), &corpus, 2).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn fewer_papers_than_k_is_empty() {
    let corpus = papers("Quantum", 2023, 3);
    assert!(compute_topics(&embedder(), &corpus, 4).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_k_is_empty() {
    let corpus = two_topic_corpus();
    assert!(compute_topics(&embedder(), &corpus, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn no_usable_titles_is_empty() {
    let corpus = vec![paper("", 2023), paper(" ", 2023), paper("\t", 2024)];
    assert!(compute_topics(&embedder(), &corpus, 2).await.unwrap().is_empty());
}

#[tokio::test]
async fn embedder_failure_is_an_error() {
    let corpus = two_topic_corpus();
    assert!(compute_topics(&BrokenEmbedder, &corpus, 2).await.is_err());
}

#[tokio::test]
async fn empty_corpus_does_not_touch_embedder() {
    // BrokenEmbedder would fail if called
    let corpus: Vec<Paper> = Vec::new();
    assert!(compute_topics(&BrokenEmbedder, &corpus, 1).await.unwrap().is_empty());
}

// ============================================================
// compute_emerging_topics
// ============================================================

#[tokio::test]
async fn larger_new_period_cluster_is_emerging() {
    // 4 old vs 6 new: 6 / 4 = 1.5 > 1.3 and 6 > 5
    let mut corpus = papers("Quantum sensing", 2020, 4);
    corpus.extend(papers("Quantum sensing", 2023, 6));

    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 1, 1, &EmergenceThresholds::default())
            .await
            .unwrap();

    assert_eq!(emerging.len(), 1);
    assert_eq!(emerging[0].size, 6);
    assert!(emerging[0]
        .representative_titles
        .iter()
        .all(|t| t.starts_with("Quantum sensing")));
}

#[tokio::test]
async fn growth_below_ratio_is_not_emerging() {
    // 5 old vs 6 new: 1.2 is not above 1.3
    let mut corpus = papers("Quantum sensing", 2020, 5);
    corpus.extend(papers("Quantum sensing", 2023, 6));

    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 1, 1, &EmergenceThresholds::default())
            .await
            .unwrap();
    assert!(emerging.is_empty());
}

#[tokio::test]
async fn small_new_cluster_is_not_emerging() {
    // 1 old vs 5 new: ratio 5 but size is not above 5
    let mut corpus = papers("Quantum sensing", 2020, 1);
    corpus.extend(papers("Quantum sensing", 2023, 5));

    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 1, 1, &EmergenceThresholds::default())
            .await
            .unwrap();
    assert!(emerging.is_empty());
}

#[tokio::test]
async fn thresholds_are_configurable() {
    let mut corpus = papers("Quantum sensing", 2020, 2);
    corpus.extend(papers("Quantum sensing", 2023, 3));

    let loose = EmergenceThresholds {
        growth_ratio: 1.0,
        min_size: 2,
    };
    let emerging = compute_emerging_topics(&embedder(), &corpus, 1, 1, &loose)
        .await
        .unwrap();
    assert_eq!(emerging.len(), 1);
    assert_eq!(emerging[0].size, 3);
}

#[tokio::test]
async fn single_year_corpus_has_no_emerging_topics() {
    let corpus = papers("Quantum sensing", 2023, 20);
    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 1, 1, &EmergenceThresholds::default())
            .await
            .unwrap();
    assert!(emerging.is_empty());
}

#[tokio::test]
async fn window_larger_than_year_count_is_empty() {
    let mut corpus = papers("Quantum sensing", 2020, 4);
    corpus.extend(papers("Quantum sensing", 2023, 10));

    let thresholds = EmergenceThresholds::default();
    for window in [0, 3] {
        let emerging = compute_emerging_topics(&embedder(), &corpus, window, 1, &thresholds)
            .await
            .unwrap();
        assert!(emerging.is_empty(), "window {window}");
    }
}

#[tokio::test]
async fn window_covering_all_years_leaves_no_old_period() {
    let mut corpus = papers("Quantum sensing", 2020, 4);
    corpus.extend(papers("Quantum sensing", 2023, 10));

    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 2, 1, &EmergenceThresholds::default())
            .await
            .unwrap();
    assert!(emerging.is_empty());
}

#[tokio::test]
async fn old_period_too_small_to_cluster_is_empty() {
    // 1 old paper cannot form 2 clusters
    let mut corpus = papers("Quantum sensing", 2020, 1);
    corpus.extend(papers("Quantum sensing", 2023, 8));
    corpus.extend(papers("Graph sensing", 2023, 8));

    let emerging =
        compute_emerging_topics(&embedder(), &corpus, 1, 2, &EmergenceThresholds::default())
            .await
            .unwrap();
    assert!(emerging.is_empty());
}
