use crate::error::PredictError;
use crate::fields::{FormField, FIELDS};
use crate::pipeline::{Prediction, Predictor};
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/api/fields", get(fields))
        .route("/healthz", get(healthz))
        .with_state(state)
}

fn status_for(err: &PredictError) -> StatusCode {
    if err.is_bad_input() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Model evaluation blocks, so keep it off the async worker threads.
async fn run_prediction(
    predictor: Arc<Predictor>,
    selections: HashMap<String, String>,
) -> Result<Prediction, PredictError> {
    tokio::task::spawn_blocking(move || predictor.predict_selections(&selections))
        .await
        .unwrap_or_else(|e| Err(PredictError::Task(e)))
}

// ---------- Handlers ----------

pub async fn index() -> Html<String> {
    Html(render_page(&HashMap::new(), None))
}

pub async fn predict_form(
    State(state): State<AppState>,
    Form(selections): Form<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    match run_prediction(state.predictor.clone(), selections.clone()).await {
        Ok(p) => (StatusCode::OK, Html(render_page(&selections, Some(Ok(p))))),
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            (status_for(&e), Html(render_page(&selections, Some(Err(e)))))
        }
    }
}

pub async fn predict_json(
    State(state): State<AppState>,
    Json(selections): Json<HashMap<String, String>>,
) -> Result<Json<Prediction>, (StatusCode, Json<Value>)> {
    run_prediction(state.predictor.clone(), selections).await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "prediction failed");
        (status_for(&e), Json(json!({ "error": e.to_string() })))
    })
}

pub async fn fields() -> Json<&'static [FormField]> {
    Json(&FIELDS[..])
}

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let artifacts = state.predictor.artifacts();
    Json(json!({
        "status": "ok",
        "features": artifacts.feature_order().len(),
        "encoded": artifacts.encoders().columns().collect::<Vec<_>>(),
    }))
}

// ---------- HTML ----------

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the form, keeping the submitted selections, with an optional
/// outcome banner.
pub fn render_page(
    selected: &HashMap<String, String>,
    outcome: Option<Result<Prediction, PredictError>>,
) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\">\
         <title>Accident Severity Prediction</title></head><body>\n\
         <h1>Accident Severity Prediction</h1>\n\
         <form method=\"post\" action=\"/predict\">\n",
    );

    for f in FIELDS.iter() {
        let current = selected.get(f.column).map(String::as_str);
        html.push_str(&format!(
            "<p><label for=\"{col}\">{label}</label><br><select id=\"{col}\" name=\"{col}\">",
            col = escape_html(f.column),
            label = escape_html(f.label),
        ));
        for option in f.options {
            let sel = if current == Some(*option) { " selected" } else { "" };
            let opt = escape_html(option);
            html.push_str(&format!("<option value=\"{opt}\"{sel}>{opt}</option>"));
        }
        html.push_str("</select></p>\n");
    }
    html.push_str("<button type=\"submit\">Predict Severity</button>\n</form>\n");

    match outcome {
        Some(Ok(p)) => html.push_str(&format!(
            "<p class=\"success\">Predicted Accident Severity: {}</p>\n",
            p.severity
        )),
        Some(Err(e)) => html.push_str(&format!(
            "<p class=\"error\">Prediction failed: {}</p>\n",
            escape_html(&e.to_string())
        )),
        None => {}
    }
    html.push_str("</body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::severity::Severity;

    #[test]
    fn test_form_has_every_control() {
        let page = render_page(&HashMap::new(), None);
        assert_eq!(page.matches("<select").count(), 11);
        assert!(page.contains("Predict Severity"));
        assert!(page.contains("Pedestrian island (formerly &#39;Central refuge&#39;)"));
        assert!(!page.contains("Predicted Accident Severity"));
    }

    #[test]
    fn test_success_banner_and_sticky_selection() {
        let mut sel = HashMap::new();
        sel.insert("Road_Type".to_string(), "Roundabout".to_string());
        let page = render_page(
            &sel,
            Some(Ok(Prediction {
                class: 3,
                severity: Severity::Slight,
            })),
        );
        assert!(page.contains("Predicted Accident Severity: Slight"));
        assert!(page.contains("<option value=\"Roundabout\" selected>"));
    }

    #[test]
    fn test_error_banner_is_escaped() {
        let err = PredictError::Record(RecordError::InvalidOption {
            column: "Road_Type",
            value: "<script>".to_string(),
        });
        let page = render_page(&HashMap::new(), Some(Err(err)));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
