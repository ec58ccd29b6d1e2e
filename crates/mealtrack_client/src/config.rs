use crate::MealStoreError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub service_token: SecretString,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, MealStoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never have to mutate the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, MealStoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("MEALSTORE_SERVICE_TOKEN")
            .ok_or_else(|| MealStoreError::Config("MEALSTORE_SERVICE_TOKEN missing".into()))?;
        let base_url =
            get("MEALSTORE_BASE_URL").unwrap_or_else(|| "http://localhost:8973".into());
        Ok(Self {
            service_token: SecretString::new(token.into()),
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_token() {
        let get = |k: &str| match k {
            "MEALSTORE_BASE_URL" => Some("http://localhost".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_reads_values_and_defaults_base_url() {
        let get = |k: &str| match k {
            "MEALSTORE_SERVICE_TOKEN" => Some("sekrit".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost:8973");
    }
}
