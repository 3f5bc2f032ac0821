use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Strip optional surrounding quotes from configuration strings.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    /// Trims every value and drops one pair of surrounding `"` if present.
    ///
    /// Unlike `justconfig::processors::Unquote`, unquoted values are kept as they
    /// are, so `path = ./data` and `path = "./data"` are equivalent.
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| {
            let v = v.trim();

            if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                MapAction::Replace(vec![v[1..v.len() - 1].to_owned()])
            } else {
                MapAction::Replace(vec![v.to_owned()])
            }
        })
    }
}

#[cfg(test)]
mod config_processors_test {
    use super::*;
    use justconfig::item::ValueExtractor;
    use justconfig::sources::defaults::Defaults;
    use justconfig::{ConfPath, Config};

    fn config_with(value: &str) -> Config {
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(conf.root().push_all(&["key"]), value, "unittest");
        conf.add_source(defaults);
        conf
    }

    #[test]
    fn should_strip_quotes() {
        let conf = config_with("\"./data/processed\"");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("./data/processed", value);
    }

    #[test]
    fn should_keep_unquoted_values() {
        let conf = config_with("  info ");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("info", value);
    }

    #[test]
    fn should_keep_single_quote_character() {
        let conf = config_with("\"");
        let value: String = conf.get(ConfPath::from(&["key"])).unquote().value().unwrap();
        assert_eq!("\"", value);
    }
}
