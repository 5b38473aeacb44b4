// Shared test data.
use crate::domain::buyer::{Bhk, BuyerInput, City, PropertyType, Purpose, Source, Status, Timeline};
use crate::domain::Actor;
use crate::domain::Role;

pub fn sample_input() -> BuyerInput {
    BuyerInput {
        full_name: "Asha Verma".to_string(),
        email: Some("asha@example.com".to_string()),
        phone: "9876543210".to_string(),
        city: City::Mohali,
        property_type: PropertyType::Plot,
        bhk: Some(Bhk::Two),
        purpose: Purpose::Buy,
        budget_min: Some(1_000_000),
        budget_max: Some(2_000_000),
        timeline: Timeline::ThreeToSix,
        source: Source::Referral,
        notes: None,
        tags: vec!["hot".to_string()],
        status: Status::New,
    }
}

pub fn apartment_input() -> BuyerInput {
    BuyerInput {
        property_type: PropertyType::Apartment,
        bhk: Some(Bhk::Three),
        ..sample_input()
    }
}

pub fn actor(user_id: &str) -> Actor {
    Actor {
        user_id: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        role: Role::User,
    }
}

pub fn admin(user_id: &str) -> Actor {
    Actor {
        role: Role::Admin,
        ..actor(user_id)
    }
}

/// A raw request payload equivalent to `apartment_input()`.
pub fn apartment_json() -> serde_json::Value {
    serde_json::json!({
        "fullName": "Asha Verma",
        "email": "asha@example.com",
        "phone": "9876543210",
        "city": "Mohali",
        "propertyType": "Apartment",
        "bhk": "THREE",
        "purpose": "Buy",
        "budgetMin": 1000000,
        "budgetMax": 2000000,
        "timeline": "THREE_TO_SIX",
        "source": "Referral",
        "notes": null,
        "tags": ["hot"],
        "status": "New"
    })
}
