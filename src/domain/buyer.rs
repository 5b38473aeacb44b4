// src/domain/buyer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum!(City {
    Chandigarh => "Chandigarh",
    Mohali => "Mohali",
    Zirakpur => "Zirakpur",
    Panchkula => "Panchkula",
    Other => "Other",
});

string_enum!(PropertyType {
    Apartment => "Apartment",
    Villa => "Villa",
    Plot => "Plot",
    Office => "Office",
    Retail => "Retail",
});

string_enum!(
    /// Room-count category. Only meaningful for residential property types.
    Bhk {
        Studio => "STUDIO",
        One => "ONE",
        Two => "TWO",
        Three => "THREE",
        Four => "FOUR",
    }
);

string_enum!(Purpose {
    Buy => "Buy",
    Rent => "Rent",
});

string_enum!(Timeline {
    ZeroToThree => "ZERO_TO_THREE",
    ThreeToSix => "THREE_TO_SIX",
    GreaterThanSix => "GREATER_THAN_6",
    Exploring => "Exploring",
});

string_enum!(Source {
    Website => "Website",
    Referral => "Referral",
    WalkIn => "Walk_in",
    Call => "Call",
    Other => "Other",
});

string_enum!(Status {
    New => "New",
    Qualified => "Qualified",
    Contacted => "Contacted",
    Visited => "Visited",
    Negotiation => "Negotiation",
    Converted => "Converted",
    Dropped => "Dropped",
});

impl PropertyType {
    /// Apartment and Villa are the only types that carry a room count.
    pub fn is_residential(&self) -> bool {
        matches!(self, PropertyType::Apartment | PropertyType::Villa)
    }
}

impl Bhk {
    pub fn label(&self) -> &'static str {
        match self {
            Bhk::Studio => "Studio",
            Bhk::One => "1",
            Bhk::Two => "2",
            Bhk::Three => "3",
            Bhk::Four => "4",
        }
    }
}

impl Timeline {
    pub fn label(&self) -> &'static str {
        match self {
            Timeline::ZeroToThree => "within 3 months",
            Timeline::ThreeToSix => "3-6 months",
            Timeline::GreaterThanSix => "6+ months",
            Timeline::Exploring => "Exploring",
        }
    }
}

/// The editable part of a buyer, as accepted from callers after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInput {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub city: City,
    pub property_type: PropertyType,
    pub bhk: Option<Bhk>,
    pub purpose: Purpose,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub timeline: Timeline,
    pub source: Source,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub status: Status,
}

impl BuyerInput {
    /// Forces the room count to null when the property type cannot carry one.
    pub fn normalize(mut self) -> Self {
        if !self.property_type.is_residential() {
            self.bhk = None;
        }
        self
    }
}

/// A buyer as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: String,
    pub owner_id: String,
    #[serde(flatten)]
    pub fields: BuyerInput,
    #[serde(with = "crate::domain::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::domain::timestamp")]
    pub updated_at: DateTime<Utc>,
}
