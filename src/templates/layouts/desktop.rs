use crate::domain::Actor;
use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, actor: &Actor, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Buyer Leads" }
                    nav {
                        ul {
                            li { a href="/buyers/export" { "Export" } }
                        }
                    }
                    span class="text-base" {
                        (actor.email)
                        @if actor.is_elevated() {
                            " (admin)"
                        }
                    }
                }
                (content)
            }
        }
    }
}
