// Topic analysis: lexical term trends and semantic title clustering.

pub mod clusters;
pub mod download;
pub mod embeddings;
pub mod emerging;
pub mod frequency;
pub mod kmeans;
pub mod split;
pub mod tfidf;
pub mod tokenize;
pub mod traits;
