pub mod features;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod title_search;

pub use recommendations::{generate_recommendations, Recommender};
