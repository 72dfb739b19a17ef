use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CompatibilitySettings {
    /// Average position difference that maps to 0% compatibility
    pub max_diff_reference: f64,
}

impl Default for CompatibilitySettings {
    fn default() -> Self {
        Self {
            max_diff_reference: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregationSettings {
    pub min_users_per_country: usize,
    /// Delete aggregates of countries that no longer reach the user threshold
    pub prune_stale: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            min_users_per_country: 2,
            prune_stale: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub interval: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60), // once a day
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub admin_token: String,
    pub compatibility: CompatibilitySettings,
    pub aggregation: AggregationSettings,
    pub scheduler: SchedulerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database_path: "album_rankings.db".to_string(),
            admin_token: "secret".to_string(),
            compatibility: CompatibilitySettings::default(),
            aggregation: AggregationSettings::default(),
            scheduler: SchedulerSettings::default(),
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = env::var("DATABASE_PATH") {
            config.database_path = path;
        }
        if let Ok(token) = env::var("ADMIN_TOKEN") {
            config.admin_token = token;
        }
        if let Some(min_users) = parse_env::<usize>("MIN_USERS_PER_COUNTRY") {
            config.aggregation.min_users_per_country = min_users;
        }
        if let Some(prune) = parse_env::<bool>("PRUNE_STALE_AGGREGATES") {
            config.aggregation.prune_stale = prune;
        }

        config
    }

    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable value for {}: {:?}", key, raw);
            None
        }
    }
}
