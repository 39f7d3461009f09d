use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use memset_dns01::config::{Config, ENV_AUTH_TOKEN};
use memset_dns01::error::Result;

pub struct Parser;

impl Parser {
    /// Loads the YAML file at `path` when given, the `MEMSET_*` environment
    /// otherwise. A file without `auth_token` takes it from the environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
        match path {
            Some(path) => {
                let cfg = Self::parse_yaml(path)?;
                Ok(Self::token_from_env(cfg, |key| std::env::var(key).ok()))
            }
            None => Config::from_env(),
        }
    }

    pub fn parse_yaml<P: AsRef<Path>>(path: P) -> Result<Config> {
        let reader = Self::file_reader(path)?;
        Self::parse_reader(reader)
    }

    pub fn parse_reader<R: Read>(reader: R) -> Result<Config> {
        let config: Config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    fn token_from_env<F>(mut cfg: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if cfg.auth_token.is_empty() {
            if let Some(token) = lookup(ENV_AUTH_TOKEN) {
                cfg.auth_token = token;
            }
        }
        cfg
    }

    fn file_reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
        let f = std::fs::File::open(path)?;
        Ok(BufReader::new(f))
    }
}

////////////////////////////////////////////////////////////
// Unit test
////////////////////////////////////////////////////////////
#[cfg(test)]
#[path = "config_test.rs"]
mod test;
