//! Template interpolation for YAML configuration files
//!
//! Handles `{{ env.NAME }}` interpolation so secrets such as API keys can stay
//! out of the configuration file. Plain `{{ name }}` looks the variable up in
//! the extra vars first and the environment second.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}")
        .expect("template regex is valid")
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Environment variables
    pub env: HashMap<String, String>,
    /// Additional context variables
    pub vars: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding the current process environment
    pub fn from_env() -> Self {
        Self {
            env: std::env::vars().collect(),
            vars: HashMap::new(),
        }
    }

    /// Set an environment variable in this context
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set an extra variable
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Get a value by path (e.g., "env.SONARR_API_KEY")
    pub fn get(&self, path: &str) -> Option<&str> {
        match path.split_once('.') {
            Some(("env", name)) => self.env.get(name).map(String::as_str),
            Some(("vars", name)) => self.vars.get(name).map(String::as_str),
            Some(_) => None,
            None => self
                .vars
                .get(path)
                .or_else(|| self.env.get(path))
                .map(String::as_str),
        }
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut errors = Vec::new();

    let result = TEMPLATE_REGEX.replace_all(template, |cap: &regex::Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(value) => value.to_string(),
            None => {
                errors.push(var_path.to_string());
                cap[0].to_string()
            }
        }
    });

    if errors.is_empty() {
        Ok(result.into_owned())
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set_env("SONARR_API_KEY", "abc123")
            .set_env("RADARR_HOST", "radarr.lan")
            .set_var("port", "7878");
        ctx
    }

    #[test]
    fn test_env_substitution() {
        let result = render("api_key: {{ env.SONARR_API_KEY }}", &ctx()).unwrap();
        assert_eq!(result, "api_key: abc123");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render("http://{{ env.RADARR_HOST }}:{{ port }}", &ctx()).unwrap();
        assert_eq!(result, "http://radarr.lan:7878");
    }

    #[test]
    fn test_bare_name_falls_back_to_env() {
        let result = render("{{ SONARR_API_KEY }}", &ctx()).unwrap();
        assert_eq!(result, "abc123");
    }

    #[test]
    fn test_undefined_variable() {
        let result = render("{{ env.MISSING }} and {{ env.ALSO_MISSING }}", &ctx());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("env.MISSING"));
        assert!(message.contains("env.ALSO_MISSING"));
    }

    #[test]
    fn test_unknown_root() {
        assert!(render("{{ config.key }}", &ctx()).is_err());
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = ctx();
        assert_eq!(render("{{env.RADARR_HOST}}", &ctx).unwrap(), "radarr.lan");
        assert_eq!(render("{{  env.RADARR_HOST  }}", &ctx).unwrap(), "radarr.lan");
    }
}
