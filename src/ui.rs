// src/ui.rs
// HTTP surface of the lab: the landing page, the simulation page, and the actions behind its form.
// Pages are rendered server-side from a snapshot of the simulation view; the chart is an inline PNG.
use crate::chart::render_chart; // PNG data URL for the derived series
use crate::client::SimulationService; // Service the view talks to
use crate::error::ViewError; // Handler error type
use crate::model::{FormField, SimulationRequest}; // Form field names and values
use crate::view::{SimulationView, ViewSnapshot}; // Shared page state
use actix_web::{http::header, web, HttpResponse, Result}; // Actix-web handler types
use serde::Deserialize; // Request body decoding
use tracing::warn; // Chart failures are logged, not fatal

pub const SIMULATION_PATH: &str = "/lab/pendulum";

/// Registers every route of the lab for a view backed by `S`.
pub fn routes<S: SimulationService + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(landing_handler))
        .route(SIMULATION_PATH, web::get().to(simulation_handler::<S>))
        .route("/lab/pendulum/field", web::post().to(edit_field_handler::<S>))
        .route("/lab/pendulum/run", web::post().to(run_handler::<S>))
        .route("/api/pendulum/state", web::get().to(state_handler::<S>));
}

#[derive(Deserialize)]
pub struct FieldEdit {
    name: String,  // Wire name of the field, e.g. "theta0_deg"
    value: String, // Raw input text, parsed as-is
}

pub async fn landing_handler() -> HttpResponse {
    html(landing_page())
}

pub async fn simulation_handler<S: SimulationService + 'static>(
    view: web::Data<SimulationView<S>>,
) -> HttpResponse {
    let snapshot = view.snapshot();
    // A chart that cannot be drawn should not take the results down with it.
    let chart = render_chart(&snapshot.chart).unwrap_or_else(|e| {
        warn!(error = %e, "chart rendering failed");
        None
    });
    html(simulation_page(&snapshot, chart.as_deref()))
}

/// Applies one field edit and returns the whole form as JSON.
pub async fn edit_field_handler<S: SimulationService + 'static>(
    view: web::Data<SimulationView<S>>,
    edit: web::Json<FieldEdit>,
) -> Result<HttpResponse, ViewError> {
    let field: FormField = edit.name.parse()?;
    let form = view.edit_field(field, &edit.value);
    Ok(HttpResponse::Ok().json(form))
}

/// Takes the submitted form, applies every field, runs the simulation and sends the browser back to the page.
pub async fn run_handler<S: SimulationService + 'static>(
    view: web::Data<SimulationView<S>>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, ViewError> {
    let edits = form
        .into_inner()
        .into_iter()
        .map(|(name, value)| -> Result<_, ViewError> { Ok((name.parse::<FormField>()?, value)) })
        .collect::<Result<Vec<_>, _>>()?;
    for (field, value) in &edits {
        view.edit_field(*field, value);
    }

    view.run().await;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, SIMULATION_PATH))
        .finish())
}

pub async fn state_handler<S: SimulationService + 'static>(
    view: web::Data<SimulationView<S>>,
) -> HttpResponse {
    HttpResponse::Ok().json(view.snapshot())
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main class="container">
<section class="paper">
{body}
</section>
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

pub fn landing_page() -> String {
    layout(
        "Science Virtual Lab",
        &format!(
            r#"<h1 class="centered">🧪 Science Virtual Lab</h1>
<p class="hint centered">Explore interactive science experiments powered by real physics simulations.</p>
<p class="centered"><a class="button large" href="{SIMULATION_PATH}">Go to Pendulum Simulation</a></p>"#
        ),
    )
}

pub fn simulation_page(snapshot: &ViewSnapshot, chart: Option<&str>) -> String {
    let mut body = String::from(
        r#"<h1>Pendulum Simulation</h1>
<p class="hint">Adjust the parameters below and run the simulation to see the motion.</p>
<form class="fields" method="post" action="/lab/pendulum/run">
"#,
    );

    for field in FormField::ALL {
        body.push_str(&input_field(&snapshot.form, field));
    }

    let (disabled, label) = if snapshot.busy {
        (" disabled", "Running…")
    } else {
        ("", "Run Simulation")
    };
    body.push_str(&format!(
        "<button type=\"submit\" class=\"button\"{disabled}>{label}</button>\n</form>\n"
    ));

    if let Some(error) = &snapshot.error {
        body.push_str(&format!(
            "<p class=\"error\" role=\"alert\">{}</p>\n",
            escape_html(error)
        ));
    }

    if let Some(result) = &snapshot.result {
        body.push_str(&format!(
            r#"<div class="results">
<h2>Simulation Results:</h2>
<p>θ (radians): <strong>{:.4}</strong></p>
<p>θ (degrees): <strong>{:.2}</strong></p>
<p>ω (rad/s): <strong>{:.2}</strong></p>
</div>
"#,
            result.theta_rad, result.theta_deg, result.omega
        ));
    }

    if !snapshot.chart.is_empty() {
        body.push_str("<div class=\"chart\">\n<h2>Pendulum Angle Over Time</h2>\n");
        match chart {
            Some(src) => body.push_str(&format!(
                "<img src=\"{src}\" alt=\"Pendulum angle over time\">\n"
            )),
            None => body.push_str("<p class=\"hint\">Chart unavailable.</p>\n"),
        }
        body.push_str("</div>\n");
    }

    layout("Pendulum Simulation", &body)
}

fn input_field(form: &SimulationRequest, field: FormField) -> String {
    let value = form.get(field);
    // NaN shows as an empty box, the same as a browser's number input.
    let value = if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    };
    format!(
        "<label>{label}<input type=\"number\" step=\"any\" name=\"{name}\" value=\"{value}\"></label>\n",
        label = escape_html(field.label()),
        name = field.name(),
    )
}

/// Minimal escaping for text placed in element content or quoted attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
