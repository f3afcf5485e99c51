/// Environment variable holding the GitHub token used for the contribution
/// query
pub(crate) const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding a `tracing` filter directive
pub(crate) const LOG_FILTER_VAR: &str = "CONTRIBCAL_LOG";

/// Settings read from the environment at startup
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    pub(crate) token: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Config {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        Config { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_present() {
        let cfg = Config::from_lookup(|name| (name == TOKEN_VAR).then(|| String::from(" ghp_abc\n")));
        assert_eq!(cfg.token.as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn test_token_absent_or_blank() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
        assert_eq!(
            Config::from_lookup(|_| Some(String::from("   "))),
            Config::default()
        );
    }
}
