use maud::{html, Markup};

pub mod error;

pub use error::html_error_response;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// A `label: value` row; blank values render as a dash.
pub fn field_row(label: &str, value: Option<String>) -> Markup {
    html! {
        div class="field" {
            dt { (label) }
            dd { (value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())) }
        }
    }
}
