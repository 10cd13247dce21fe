//! Configuration management for the events Lambda.

use std::env;

/// Table used when `DYNAMODB_TABLE_NAME` is not set.
pub const DEFAULT_TABLE_NAME: &str = "events-table";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding event items
    pub table_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_table_name(env::var("DYNAMODB_TABLE_NAME").ok())
    }

    fn from_table_name(table_name: Option<String>) -> Self {
        Self {
            table_name: table_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_name() {
        assert_eq!(Config::from_table_name(None).table_name, "events-table");
        assert_eq!(
            Config::from_table_name(Some("  ".to_string())).table_name,
            "events-table"
        );
    }

    #[test]
    fn test_explicit_table_name() {
        let config = Config::from_table_name(Some("calendar-prod".to_string()));
        assert_eq!(config.table_name, "calendar-prod");
    }
}
