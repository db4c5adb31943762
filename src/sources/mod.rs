// Bibliographic sources: trait-based abstraction over the paper provider.
//
// The PaperSource trait defines the two calls acquisition needs: a count
// probe and a paged fetch, both scoped to one calendar month. ArxivClient
// implements it against the arXiv export API.

pub mod arxiv;
pub mod feed;
pub mod rate_limiter;
pub mod traits;
