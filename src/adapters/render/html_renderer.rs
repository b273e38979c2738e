//! Built-in HTML renderer.
//!
//! Renders each page from a fixed layout: navigation, an error or notice
//! banner, then a template-specific body built from the payload. Every value
//! taken from the payload is HTML-escaped.

use serde_json::{Map, Value};

use crate::ports::{keys, PagePayload, RenderError, TemplateRenderer};

/// Template names understood by [`HtmlRenderer`].
pub mod templates {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const DASHBOARD: &str = "dashboard";
    pub const UPLOAD: &str = "upload";
    pub const TRAIN: &str = "train";
    pub const PREDICT: &str = "predict";
    pub const PREDICTIONS: &str = "predictions";
    pub const PREVIEW: &str = "preview";
    pub const MODEL_INFO: &str = "model_info";
    pub const ERROR: &str = "error";

    pub const ALL: [&str; 10] = [
        LOGIN,
        REGISTER,
        DASHBOARD,
        UPLOAD,
        TRAIN,
        PREDICT,
        PREDICTIONS,
        PREVIEW,
        MODEL_INFO,
        ERROR,
    ];
}

/// Server-side HTML renderer with no external template files.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn body(&self, template: &str, payload: &PagePayload) -> Result<String, RenderError> {
        let body = match template {
            templates::LOGIN => credentials_form("/login", "Log in", payload, false, ("/register", "Create an account")),
            templates::REGISTER => credentials_form("/register", "Register", payload, true, ("/login", "Back to login")),
            templates::DASHBOARD => dashboard(payload),
            templates::UPLOAD => upload_form(payload),
            templates::TRAIN => train_form(payload),
            templates::PREDICT => predict_page(payload),
            templates::PREDICTIONS => predictions_page(payload),
            templates::PREVIEW => preview_page(payload),
            templates::MODEL_INFO => model_info_page(payload),
            templates::ERROR => String::new(),
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };
        Ok(body)
    }
}

impl TemplateRenderer for HtmlRenderer {
    fn render(&self, template: &str, payload: &PagePayload) -> Result<String, RenderError> {
        let body = self.body(template, payload)?;
        let title = escape(payload.title());

        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str("</head>\n<body>\n");
        html.push_str(&nav(payload));
        html.push_str(&format!("<main>\n<h1>{}</h1>\n", title));

        if let Some(error) = payload.error() {
            html.push_str(&format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape(error)));
        }
        if let Some(notice) = payload.get_str(keys::NOTICE) {
            html.push_str(&format!("<p class=\"notice\">{}</p>\n", escape(notice)));
        }

        html.push_str(&body);
        html.push_str("</main>\n</body>\n</html>\n");
        Ok(html)
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Display form of a JSON value: strings unquoted, everything else as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field<'a>(object: &'a Value, name: &str) -> &'a Value {
    object.get(name).unwrap_or(&Value::Null)
}

fn array<'a>(payload: &'a PagePayload, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Previously submitted value of a form field.
fn form_value(payload: &PagePayload, name: &str) -> String {
    payload
        .get(keys::FORM)
        .map(|form| escape(&display(field(form, name))))
        .unwrap_or_default()
}

fn nav(payload: &PagePayload) -> String {
    match payload.get_str(keys::USERNAME) {
        Some(username) => format!(
            "<nav><a href=\"/dashboard\">Dashboard</a> | <a href=\"/upload\">Upload</a> | \
             <a href=\"/train\">Train</a> | <a href=\"/preview\">Preview</a> | \
             <a href=\"/model-info\">Model info</a> | <span>{}</span> \
             <a href=\"/logout\">Log out</a></nav>\n",
            escape(username)
        ),
        None => "<nav><a href=\"/login\">Log in</a> | <a href=\"/register\">Register</a></nav>\n"
            .to_string(),
    }
}

fn credentials_form(
    action: &str,
    submit: &str,
    payload: &PagePayload,
    ask_email: bool,
    (href, text): (&str, &str),
) -> String {
    let mut html = format!("<form method=\"post\" action=\"{}\">\n", action);
    html.push_str(&format!(
        "<label>Username <input name=\"username\" value=\"{}\" required></label>\n",
        form_value(payload, "username")
    ));
    if ask_email {
        html.push_str(&format!(
            "<label>Email <input type=\"email\" name=\"email\" value=\"{}\"></label>\n",
            form_value(payload, "email")
        ));
    }
    html.push_str("<label>Password <input type=\"password\" name=\"password\" required></label>\n");
    html.push_str(&format!("<button type=\"submit\">{}</button>\n</form>\n", submit));
    html.push_str(&format!("<p><a href=\"{}\">{}</a></p>\n", href, text));
    html
}

fn dataset_table(datasets: &[Value]) -> String {
    if datasets.is_empty() {
        return "<p>No datasets uploaded yet.</p>\n".to_string();
    }
    let mut html = String::from(
        "<table class=\"datasets\">\n<tr><th>ID</th><th>Name</th><th>Rows</th><th>Columns</th><th>Created</th></tr>\n",
    );
    for dataset in datasets {
        let columns = field(dataset, "columns")
            .as_array()
            .map(|c| c.iter().map(display).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&display(field(dataset, "id"))),
            escape(&display(field(dataset, "name"))),
            escape(&display(field(dataset, "row_count"))),
            escape(&columns),
            escape(&display(field(dataset, "created_at"))),
        ));
    }
    html.push_str("</table>\n");
    html
}

fn dashboard(payload: &PagePayload) -> String {
    let mut html = String::from("<h2>Datasets</h2>\n");
    html.push_str(&dataset_table(array(payload, keys::DATASETS)));

    html.push_str("<h2>Models</h2>\n");
    let models = array(payload, keys::MODELS);
    if models.is_empty() {
        html.push_str("<p>No models trained yet.</p>\n");
        return html;
    }
    html.push_str(
        "<table class=\"models\">\n<tr><th>ID</th><th>Name</th><th>Type</th><th>Target</th><th></th></tr>\n",
    );
    for model in models {
        let id = escape(&display(field(model, "id")));
        html.push_str(&format!(
            "<tr><td>{id}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/predict/{id}\">Predict</a> <a href=\"/predictions/{id}\">History</a></td></tr>\n",
            escape(&display(field(model, "name"))),
            escape(&display(field(model, "model_type"))),
            escape(&display(field(model, "target_column"))),
        ));
    }
    html.push_str("</table>\n");
    html
}

fn upload_form(payload: &PagePayload) -> String {
    let mut html = String::new();
    if let Some(result) = payload.get(keys::RESULT) {
        html.push_str(&format!(
            "<p class=\"result\">{} (dataset {})</p>\n",
            escape(&display(field(result, "message"))),
            escape(&display(field(result, "dataset_id"))),
        ));
    }
    html.push_str("<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n");
    html.push_str("<label>CSV file <input type=\"file\" name=\"file\" accept=\".csv\" required></label>\n");
    html.push_str(&format!(
        "<label>Name <input name=\"name\" value=\"{}\"></label>\n",
        form_value(payload, "name")
    ));
    html.push_str(&format!(
        "<label>Description <textarea name=\"description\">{}</textarea></label>\n",
        form_value(payload, "description")
    ));
    if let Some(limit) = payload.get(keys::MAX_UPLOAD_BYTES) {
        html.push_str(&format!(
            "<p class=\"hint\">Maximum file size: {} bytes</p>\n",
            escape(&display(limit))
        ));
    }
    html.push_str("<button type=\"submit\">Upload</button>\n</form>\n");
    html
}

fn train_form(payload: &PagePayload) -> String {
    let mut html = String::new();
    if let Some(result) = payload.get(keys::RESULT) {
        let model_id = escape(&display(field(result, "model_id")));
        html.push_str(&format!(
            "<p class=\"result\">{} <a href=\"/predict/{id}\">Use model {id}</a></p>\n",
            escape(&display(field(result, "message"))),
            id = model_id,
        ));
    }
    let selected = form_value(payload, "dataset_id");
    html.push_str("<form method=\"post\" action=\"/train\">\n<label>Dataset <select name=\"dataset_id\" required>\n");
    for dataset in array(payload, keys::DATASETS) {
        let id = escape(&display(field(dataset, "id")));
        let marker = if id == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            id,
            marker,
            escape(&display(field(dataset, "name")))
        ));
    }
    html.push_str("</select></label>\n");
    html.push_str(&format!(
        "<label>Target column <input name=\"target_column\" value=\"{}\" required></label>\n",
        form_value(payload, "target_column")
    ));
    html.push_str("<label>Model type <select name=\"model_type\">\n");
    let chosen = form_value(payload, "model_type");
    for kind in [
        "random_forest",
        "decision_tree",
        "linear_regression",
        "logistic_regression",
        "svm",
    ] {
        let marker = if kind == chosen { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{kind}\"{marker}>{kind}</option>\n"));
    }
    html.push_str("</select></label>\n");
    for (name, label) in [
        ("name", "Name"),
        ("description", "Description"),
        ("drop_columns", "Drop columns (comma separated)"),
    ] {
        html.push_str(&format!(
            "<label>{} <input name=\"{}\" value=\"{}\"></label>\n",
            label,
            name,
            form_value(payload, name)
        ));
    }
    html.push_str("<button type=\"submit\">Train</button>\n</form>\n");
    html
}

fn predict_page(payload: &PagePayload) -> String {
    let mut html = String::new();
    let model = payload.get(keys::MODEL).unwrap_or(&Value::Null);
    let model_id = escape(&display(field(model, "id")));

    if let Some(result) = payload.get(keys::RESULT) {
        let predictions = field(result, "predictions")
            .as_array()
            .map(|p| p.iter().map(display).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        html.push_str(&format!(
            "<p class=\"result\">Prediction: {}</p>\n",
            escape(&predictions)
        ));
        if let Some(score) = field(result, "confidence_score").as_f64() {
            html.push_str(&format!("<p class=\"confidence\">Confidence: {:.2}</p>\n", score));
        }
    }

    html.push_str(&format!(
        "<form method=\"post\" action=\"/predict/{}\">\n",
        model_id
    ));
    match payload.get_str(keys::ENCODING) {
        Some("raw_json") => {
            html.push_str(&format!(
                "<label>Features (JSON) <textarea name=\"features_json\" required>{}</textarea></label>\n",
                form_value(payload, "features_json")
            ));
        }
        _ => {
            if let Some(features) = field(model, "feature_columns").as_array() {
                for feature in features {
                    let name = escape(&display(feature));
                    html.push_str(&format!(
                        "<label>{name} <input name=\"{name}\" value=\"{}\" required></label>\n",
                        form_value(payload, &display(feature))
                    ));
                }
            }
        }
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
    html.push_str(&format!(
        "<p><a href=\"/predictions/{}\">Prediction history</a></p>\n",
        model_id
    ));
    html
}

fn predictions_page(payload: &PagePayload) -> String {
    let page = payload.get(keys::PREDICTIONS).unwrap_or(&Value::Null);
    let model = payload.get(keys::MODEL).unwrap_or(&Value::Null);
    let model_id = escape(&display(field(model, "id")));
    let records = field(page, "predictions").as_array().map(Vec::as_slice).unwrap_or(&[]);

    let mut html = String::new();
    if records.is_empty() {
        html.push_str("<p>No predictions yet.</p>\n");
    } else {
        html.push_str(
            "<table class=\"predictions\">\n<tr><th>ID</th><th>Input</th><th>Result</th><th>Confidence</th><th>Created</th></tr>\n",
        );
        for record in records {
            html.push_str(&format!(
                "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&display(field(record, "id"))),
                escape(&field(record, "input_data").to_string()),
                escape(&display(field(record, "prediction_result"))),
                escape(&display(field(record, "confidence_score"))),
                escape(&display(field(record, "created_at"))),
            ));
        }
        html.push_str("</table>\n");
    }

    let current = field(page, "current_page").as_u64().unwrap_or(1);
    let pages = field(page, "pages").as_u64().unwrap_or(0);
    html.push_str("<p class=\"pagination\">");
    if current > 1 {
        html.push_str(&format!(
            "<a href=\"/predictions/{}?page={}\">Previous</a> ",
            model_id,
            current - 1
        ));
    }
    html.push_str(&format!("Page {} of {}", current, pages.max(1)));
    if current < pages {
        html.push_str(&format!(
            " <a href=\"/predictions/{}?page={}\">Next</a>",
            model_id,
            current + 1
        ));
    }
    html.push_str("</p>\n");
    html
}

fn preview_page(payload: &PagePayload) -> String {
    let mut html = String::from(
        "<form method=\"post\" action=\"/preview\" enctype=\"multipart/form-data\">\n\
         <label>CSV file <input type=\"file\" name=\"file\" accept=\".csv\" required></label>\n",
    );
    html.push_str(&format!(
        "<label>Rows <input type=\"number\" min=\"1\" name=\"num_rows\" value=\"{}\"></label>\n",
        form_value(payload, "num_rows")
    ));
    html.push_str("<button type=\"submit\">Preview</button>\n</form>\n");

    let Some(preview) = payload.get(keys::PREVIEW) else {
        return html;
    };
    let columns: Vec<String> = field(preview, "column_names")
        .as_array()
        .map(|c| c.iter().map(display).collect())
        .unwrap_or_default();

    html.push_str(&format!(
        "<p>{} rows, {} columns</p>\n<table class=\"preview\">\n<tr>",
        escape(&display(field(preview, "total_rows"))),
        escape(&display(field(preview, "total_columns"))),
    ));
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr>\n");
    let empty = Map::new();
    for row in field(preview, "preview").as_array().map(Vec::as_slice).unwrap_or(&[]) {
        let row = row.as_object().unwrap_or(&empty);
        html.push_str("<tr>");
        for column in &columns {
            let cell = row.get(column).map(display).unwrap_or_default();
            html.push_str(&format!("<td>{}</td>", escape(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn model_info_page(payload: &PagePayload) -> String {
    let info = payload.get(keys::MODEL_INFO).unwrap_or(&Value::Null);
    let list = |name: &str| {
        field(info, name)
            .as_array()
            .map(|v| v.iter().map(display).collect::<Vec<_>>().join(", "))
            .unwrap_or_default()
    };
    format!(
        "<dl class=\"model-info\">\n\
         <dt>Model type</dt><dd>{}</dd>\n\
         <dt>Target column</dt><dd>{}</dd>\n\
         <dt>Feature columns</dt><dd>{}</dd>\n\
         <dt>Categorical features</dt><dd>{}</dd>\n\
         <dt>Target classes</dt><dd>{}</dd>\n\
         </dl>\n",
        escape(&display(field(info, "model_type"))),
        escape(&display(field(info, "target_column"))),
        escape(&list("feature_columns")),
        escape(&list("categorical_features")),
        escape(&list("target_classes")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, payload: PagePayload) -> String {
        HtmlRenderer::new().render(template, &payload).unwrap()
    }

    #[test]
    fn every_known_template_renders() {
        for template in templates::ALL {
            let html = render(template, PagePayload::titled("T"));
            assert!(html.starts_with("<!DOCTYPE html>"), "{}", template);
        }
    }

    #[test]
    fn unknown_template_is_an_error() {
        let result = HtmlRenderer::new().render("nope", &PagePayload::new());
        assert_eq!(result, Err(RenderError::UnknownTemplate("nope".to_string())));
    }

    #[test]
    fn error_is_escaped() {
        let html = render(
            templates::LOGIN,
            PagePayload::titled("Login").with_error("<script>alert(1)</script>"),
        );
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(escape(r#"a"b'c&"#), "a&quot;b&#x27;c&amp;");
    }

    #[test]
    fn dashboard_lists_models_with_links() {
        let payload = PagePayload::titled("Dashboard")
            .with(keys::DATASETS, json!([]))
            .with(
                keys::MODELS,
                json!([{"id": 4, "name": "rf", "model_type": "random_forest", "target_column": "y"}]),
            );
        let html = render(templates::DASHBOARD, payload);
        assert!(html.contains("/predict/4"));
        assert!(html.contains("/predictions/4"));
        assert!(html.contains("No datasets uploaded yet."));
    }

    #[test]
    fn predict_form_has_one_input_per_feature() {
        let payload = PagePayload::titled("Predict")
            .with(keys::MODEL, json!({"id": 2, "feature_columns": ["age", "income"]}))
            .with(keys::ENCODING, "typed_fields");
        let html = render(templates::PREDICT, payload);
        assert!(html.contains("name=\"age\""));
        assert!(html.contains("name=\"income\""));
        assert!(html.contains("action=\"/predict/2\""));
    }

    #[test]
    fn predict_form_raw_json_uses_textarea() {
        let payload = PagePayload::titled("Predict")
            .with(keys::MODEL, json!({"id": 2, "feature_columns": ["age"]}))
            .with(keys::ENCODING, "raw_json");
        let html = render(templates::PREDICT, payload);
        assert!(html.contains("name=\"features_json\""));
        assert!(!html.contains("name=\"age\""));
    }

    #[test]
    fn predictions_page_paginates() {
        let payload = PagePayload::titled("History")
            .with(keys::MODEL, json!({"id": 5}))
            .with(
                keys::PREDICTIONS,
                json!({"predictions": [], "total": 30, "pages": 3, "current_page": 2}),
            );
        let html = render(templates::PREDICTIONS, payload);
        assert!(html.contains("/predictions/5?page=1"));
        assert!(html.contains("/predictions/5?page=3"));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn logged_in_nav_shows_username() {
        let html = render(
            templates::DASHBOARD,
            PagePayload::titled("Dashboard").with(keys::USERNAME, "alice"),
        );
        assert!(html.contains("alice"));
        assert!(html.contains("/logout"));
    }

    #[test]
    fn form_values_are_redisplayed() {
        let html = render(
            templates::REGISTER,
            PagePayload::titled("Register").with(keys::FORM, json!({"username": "bob\""})),
        );
        assert!(html.contains("value=\"bob&quot;\""));
    }

    #[test]
    fn only_register_asks_for_email() {
        let register = render(
            templates::REGISTER,
            PagePayload::titled("Register").with(keys::FORM, json!({"email": "a@b.c"})),
        );
        assert!(register.contains("name=\"email\" value=\"a@b.c\""));

        let login = render(templates::LOGIN, PagePayload::titled("Log in"));
        assert!(!login.contains("name=\"email\""));
    }
}
