pub mod cache;
pub mod compute;
pub mod store;

pub use cache::EvalCache;
pub use compute::compute_advanced_analysis;
pub use store::AdvancedAnalysisStore;
