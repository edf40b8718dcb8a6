use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::schema::ServerConfig;
use crate::error::ConfigError;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*\.([A-Za-z]+)\s*\}\}").unwrap());

/// Renders the server URL template against the server section.
///
/// Supported placeholders are `{{.Url}}`, `{{.User}}` and `{{.Pass}}`.
/// Unknown fields and unterminated `{{` are errors.
pub fn render_url_template(server: &ServerConfig, password: &str) -> Result<String, ConfigError> {
    let template = &server.url;
    let mut unknown = None;

    let rendered = RE_PLACEHOLDER.replace_all(template, |caps: &Captures| {
        match &caps[1] {
            "Url" => template.clone(),
            "User" => server.user.clone(),
            "Pass" => password.to_string(),
            other => {
                unknown.get_or_insert_with(|| other.to_string());
                String::new()
            }
        }
    });

    if let Some(field) = unknown {
        return Err(ConfigError::UrlTemplate {
            template: template.clone(),
            reason: format!("unknown field '.{}'", field),
        });
    }

    if rendered.contains("{{") || rendered.contains("}}") {
        return Err(ConfigError::UrlTemplate {
            template: template.clone(),
            reason: "unterminated or malformed placeholder".to_string(),
        });
    }

    Ok(rendered.into_owned())
}
