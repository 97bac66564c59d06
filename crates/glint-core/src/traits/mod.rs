pub mod classifier;
pub mod embedder;
pub mod store;

pub use classifier::IClassifier;
pub use embedder::IEmbedder;
pub use store::IExpenseStore;
