/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased
/// environment variables (`database_url` <- `DATABASE_URL`). Optional settings
/// use `#[serde(default = "...")]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Load from an explicit set of `(NAME, value)` pairs.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
