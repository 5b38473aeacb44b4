// templates/pages/buyer.rs

use crate::domain::{timestamp, Actor, BuyerWithHistory, HistoryEntry};
use crate::templates::{card, desktop_layout, field_row};
use maud::{html, Markup};

fn rupees(amount: Option<i64>) -> Option<String> {
    amount.map(|a| format!("₹{a}"))
}

pub fn buyer_page(view: &BuyerWithHistory, actor: &Actor) -> Markup {
    let buyer = &view.buyer;
    let f = &buyer.fields;
    let can_edit = actor.may_modify(&buyer.owner_id);

    desktop_layout(
        &f.full_name,
        actor,
        html! {
            main class="container" {
                h1 { (f.full_name) }
                p class="muted" {
                    "Status: " strong { (f.status) }
                    " · Last updated " (timestamp::format(&buyer.updated_at))
                }
                @if !can_edit {
                    p class="muted" { "Read only: you do not own this lead." }
                }

                (card("Contact", html! {
                    dl {
                        (field_row("Phone", Some(f.phone.clone())))
                        (field_row("Email", f.email.clone()))
                        (field_row("City", Some(f.city.to_string())))
                        (field_row("Source", Some(f.source.to_string())))
                    }
                }))

                (card("Requirement", html! {
                    dl {
                        (field_row("Property type", Some(f.property_type.to_string())))
                        (field_row("BHK", f.bhk.map(|b| b.label().to_string())))
                        (field_row("Purpose", Some(f.purpose.to_string())))
                        (field_row("Budget min", rupees(f.budget_min)))
                        (field_row("Budget max", rupees(f.budget_max)))
                        (field_row("Timeline", Some(f.timeline.label().to_string())))
                        (field_row("Tags", Some(f.tags.join(", "))))
                        (field_row("Notes", f.notes.clone()))
                    }
                }))

                (card("Recent changes", history_list(&view.history)))
            }
        },
    )
}

fn history_list(history: &[HistoryEntry]) -> Markup {
    html! {
        @if history.is_empty() {
            p { "No history yet." }
        } @else {
            ul class="history" {
                @for entry in history {
                    li {
                        span class="muted" {
                            (timestamp::format(&entry.changed_at)) " by " (entry.changed_by)
                        }
                        ul {
                            @for line in entry.diff.describe() {
                                li { (line) }
                            }
                        }
                    }
                }
            }
        }
    }
}
