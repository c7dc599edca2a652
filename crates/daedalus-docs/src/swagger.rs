//! Swagger UI page.
//!
//! The page loads Swagger UI from a CDN and points it at the JSON document
//! endpoint, so the document is fetched (and memoized) only once.

/// Swagger UI assets used unless [`SwaggerUi::assets`] says otherwise.
pub const SWAGGER_UI_ASSETS: &str = "https://unpkg.com/swagger-ui-dist@5.18.2";

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>@TITLE@</title>
  <link rel="stylesheet" href="@ASSETS@/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="@ASSETS@/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({
        url: "@URL@",
        dom_id: "#swagger-ui",
        displayOperationId: @OPERATION_IDS@,
        tryItOutEnabled: @TRY_IT_OUT@,
      });
    };
  </script>
</body>
</html>
"##;

/// The HTML page that renders a document with Swagger UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaggerUi {
    document_url: String,
    title: String,
    assets: String,
    operation_ids: bool,
    try_it_out: bool,
}

impl SwaggerUi {
    /// A page titled after the API that loads the document from
    /// `document_url`.
    #[must_use]
    pub fn new(document_url: impl Into<String>, api_title: &str) -> Self {
        Self {
            document_url: document_url.into(),
            title: format!("{api_title} - Swagger UI"),
            assets: SWAGGER_UI_ASSETS.to_string(),
            operation_ids: true,
            try_it_out: false,
        }
    }

    /// Replaces the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Loads the Swagger UI assets from another base URL, e.g. a self-hosted
    /// copy.
    #[must_use]
    pub fn assets(mut self, base_url: impl Into<String>) -> Self {
        self.assets = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Shows operation ids next to each operation (on by default).
    #[must_use]
    pub fn operation_ids(mut self, show: bool) -> Self {
        self.operation_ids = show;
        self
    }

    /// Opens every operation in "try it out" mode.
    #[must_use]
    pub fn try_it_out(mut self, enabled: bool) -> Self {
        self.try_it_out = enabled;
        self
    }

    /// URL the page fetches the document from.
    #[must_use]
    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    /// The complete HTML page.
    #[must_use]
    pub fn html(&self) -> String {
        TEMPLATE
            .replace("@TITLE@", &escape(&self.title))
            .replace("@ASSETS@", &escape(&self.assets))
            .replace("@URL@", &escape(&self.document_url))
            .replace("@OPERATION_IDS@", bool_literal(self.operation_ids))
            .replace("@TRY_IT_OUT@", bool_literal(self.try_it_out))
    }
}

fn bool_literal(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Escapes text for both HTML content and a double-quoted JS string.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\\' => out.push_str("&#92;"),
            c => out.push(c),
        }
    }
    out
}
