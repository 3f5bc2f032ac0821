use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;
use crate::error::{RecommendError, Result};

// Set some default values
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INTERACTIONS_PATH: &str = "./data/processed/user-item-clean.csv";
const DEFAULT_ARTICLES_PATH: &str = "./data/processed/item-clean.csv";
const DEFAULT_NUM_ITEMS_TO_RECOMMEND: usize = 10;
const DEFAULT_HOLDOUT_FRACTION: f64 = 0.2;
const DEFAULT_MIN_VIEWS_FOR_HOLDOUT: usize = 5;
const DEFAULT_COLD_START_USER_FRACTION: f64 = 0.05;
const DEFAULT_SEED: u64 = 42;

pub struct AppConfig {
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
}

pub struct LogConfig {
    pub level: String,
}

pub struct DataConfig {
    pub interactions_path: String,
    pub articles_path: String,
}

pub struct ModelConfig {
    /// Keep only the `k` strongest neighbors, `0` keeps all of them.
    pub neighborhood_size_k: usize,
    pub num_items_to_recommend: usize,
}

pub struct EvaluationConfig {
    pub holdout_fraction: f64,
    pub min_views_for_holdout: usize,
    pub cold_start_user_fraction: f64,
    pub seed: u64,
    pub out_path: Option<String>,
}

impl AppConfig {
    /// Reads the configuration file if it exists and layers the environment
    /// variables `INTERACTIONS_DATA`, `ARTICLES_DATA` and `LOG_LEVEL` on top.
    pub fn new(config_path: &str) -> Result<AppConfig> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(config_path) {
            let config_text = ConfigText::new(config_file, config_path).map_err(|err| {
                RecommendError::Config(format!("loading {} failed: {}", config_path, err))
            })?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "interactions_path"]),
                OsStr::new("INTERACTIONS_DATA"),
            ),
            (
                ConfPath::from(&["data", "articles_path"]),
                OsStr::new("ARTICLES_DATA"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        Ok(AppConfig::parse(conf))
    }

    fn parse(conf: Config) -> AppConfig {
        AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_LOG_LEVEL)),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            interactions_path: conf
                .get(path.push("interactions_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_INTERACTIONS_PATH)),
            articles_path: conf
                .get(path.push("articles_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_ARTICLES_PATH)),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            neighborhood_size_k: conf
                .get(path.push("neighborhood_size_k"))
                .trim()
                .value()
                .unwrap_or(0),
            num_items_to_recommend: conf
                .get(path.push("num_items_to_recommend"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_ITEMS_TO_RECOMMEND),
        }
    }

    pub fn neighborhood_size(&self) -> Option<usize> {
        if self.neighborhood_size_k == 0 {
            None
        } else {
            Some(self.neighborhood_size_k)
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            holdout_fraction: conf
                .get(path.push("holdout_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_HOLDOUT_FRACTION),
            min_views_for_holdout: conf
                .get(path.push("min_views_for_holdout"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_MIN_VIEWS_FOR_HOLDOUT),
            cold_start_user_fraction: conf
                .get(path.push("cold_start_user_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_COLD_START_USER_FRACTION),
            seed: conf
                .get(path.push("seed"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_SEED),
            out_path: conf.get(path.push("out_path")).unquote().value().ok(),
        }
    }
}
