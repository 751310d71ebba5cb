//! Snapshot tests for the Tavily client

#[cfg(test)]
mod snapshot_tests {
    use crate::TavilyConfig;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = TavilyConfig {
            api_key: "test_api_key_redacted".to_string(),
            api_url: "https://api.tavily.com".to_string(),
            max_results: 5,
        };

        assert_yaml_snapshot!(config, @r###"
        ---
        api_key: test_api_key_redacted
        api_url: "https://api.tavily.com"
        max_results: 5
        "###);
    }

    #[test]
    fn test_config_defaults() {
        let config = TavilyConfig::new("test_key".to_string());
        assert_eq!(config.api_url, "https://api.tavily.com");
        assert_eq!(config.max_results, 5);
    }
}
