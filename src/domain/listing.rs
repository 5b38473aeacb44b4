// src/domain/listing.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::buyer::{City, PropertyType, Status, Timeline};
use crate::errors::{FieldError, ServerError};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page number accepted; keeps `offset()` within `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    UpdatedAt,
    CreatedAt,
    FullName,
    City,
    PropertyType,
    Status,
    Timeline,
    BudgetMin,
    BudgetMax,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "updatedAt" => SortField::UpdatedAt,
            "createdAt" => SortField::CreatedAt,
            "fullName" => SortField::FullName,
            "city" => SortField::City,
            "propertyType" => SortField::PropertyType,
            "status" => SortField::Status,
            "timeline" => SortField::Timeline,
            "budgetMin" => SortField::BudgetMin,
            "budgetMax" => SortField::BudgetMax,
            _ => return None,
        })
    }

    /// Column name; only ever one of these fixed identifiers reaches SQL.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::UpdatedAt => "updated_at",
            SortField::CreatedAt => "created_at",
            SortField::FullName => "full_name",
            SortField::City => "city",
            SortField::PropertyType => "property_type",
            SortField::Status => "status",
            SortField::Timeline => "timeline",
            SortField::BudgetMin => "budget_min",
            SortField::BudgetMax => "budget_max",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filters shared by the listing and the spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuyerFilter {
    pub city: Option<City>,
    pub property_type: Option<PropertyType>,
    pub status: Option<Status>,
    pub timeline: Option<Timeline>,
    /// Matched against name, phone and email, case-insensitively.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: BuyerFilter,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Builds a query from URL parameters. Blank values and the literal
    /// `undefined` count as absent; unknown category values are rejected.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ServerError> {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty() && *v != "undefined")
        };
        let mut errors = Vec::new();

        fn category<T>(
            raw: Option<&str>,
            key: &str,
            parse: fn(&str) -> Option<T>,
            errors: &mut Vec<FieldError>,
        ) -> Option<T> {
            let raw = raw?;
            let parsed = parse(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(key, format!("Unknown {key} '{raw}'")));
            }
            parsed
        }

        let filter = BuyerFilter {
            city: category(get("city"), "city", City::parse, &mut errors),
            property_type: category(get("propertyType"), "propertyType", PropertyType::parse, &mut errors),
            status: category(get("status"), "status", Status::parse, &mut errors),
            timeline: category(get("timeline"), "timeline", Timeline::parse, &mut errors),
            search: get("search").map(str::to_string),
        };

        let page = get("page")
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
            .min(MAX_PAGE);
        let page_size = get("pageSize")
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        let sort_by = match get("sortBy") {
            None => SortField::UpdatedAt,
            Some(raw) => SortField::parse(raw).unwrap_or_else(|| {
                errors.push(FieldError::new("sortBy", format!("Cannot sort by '{raw}'")));
                SortField::UpdatedAt
            }),
        };
        let sort_order = match get("sortOrder") {
            Some("asc") => SortOrder::Asc,
            None | Some("desc") => SortOrder::Desc,
            Some(raw) => {
                errors.push(FieldError::new("sortOrder", format!("Unknown sort order '{raw}'")));
                SortOrder::Desc
            }
        };

        if !errors.is_empty() {
            return Err(ServerError::Validation(errors));
        }

        Ok(ListQuery {
            filter,
            page,
            page_size,
            sort_by,
            sort_order,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, query: &ListQuery) -> Self {
        let total_pages = (total + query.page_size - 1) / query.page_size;
        Self {
            data,
            total,
            page: query.page,
            page_size: query.page_size,
            total_pages,
        }
    }
}
