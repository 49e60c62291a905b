pub mod client;
pub mod models;

pub use client::{AnalysisClient, AnalysisError};
pub use models::{AnalysisCategories, ReleaseAnalysis, RemovalNote};
