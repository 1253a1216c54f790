use crate::config::SwaggerConfig;
use minijinja::{context, Environment};
use serde::Serialize;

// No `.html` suffix: minijinja would HTML-escape the `/` in spec URLs.
const TEMPLATE_NAME: &str = "swagger_ui";

const SWAGGER_UI_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{{ title }}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
  <script>
    window.onload = function () {
      window.ui = SwaggerUIBundle({
        urls: [
          {% for spec in specs %}{ url: "{{ spec.url }}", name: "{{ spec.name }}" },
          {% endfor %}
        ],
        dom_id: "#swagger-ui",
        deepLinking: true,
        presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
        layout: "StandaloneLayout"
      });
    };
  </script>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct SpecLink {
    url: String,
    name: String,
}

/// Render the Swagger UI page listing every configured document.
pub fn render_swagger_ui(config: &SwaggerConfig) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, SWAGGER_UI_TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let prefix = config.swagger_ui_prefix.as_deref().unwrap_or("");
    let specs: Vec<SpecLink> = config
        .specs
        .iter()
        .map(|spec| SpecLink {
            url: format!("{prefix}{}", spec.route),
            name: spec.title.clone().unwrap_or_else(|| spec.endpoint.clone()),
        })
        .collect();
    let title = config.title.as_deref().unwrap_or("Swagger UI");

    template.render(context! { title, specs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecEntry;

    #[test]
    fn test_lists_spec_urls() {
        let mut config = SwaggerConfig::default();
        let mut v2 = SpecEntry::new("v2", "/v2.json");
        v2.title = Some("Version 2".to_string());
        config.specs.push(v2);
        config.swagger_ui_prefix = Some("/api".to_string());

        let html = render_swagger_ui(&config).unwrap();
        assert!(html.contains(r#"url: "/api/swagger.json", name: "swagger""#));
        assert!(html.contains(r#"url: "/api/v2.json", name: "Version 2""#));
        assert!(html.contains("<title>Swagger UI</title>"));
    }
}
