pub mod catalog;
pub mod cleaning;
pub mod config;
pub mod config_processors;
pub mod datasetstats;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod stopwatch;
pub mod userknn;

pub use error::{RecommendError, Result};
pub use userknn::Recommender;
