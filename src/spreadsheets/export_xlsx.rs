use crate::domain::Buyer;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Workbook, Worksheet};

const HEADERS: [&str; 16] = [
    "Full Name",
    "Email",
    "Phone",
    "City",
    "Property Type",
    "BHK",
    "Purpose",
    "Budget Min",
    "Budget Max",
    "Timeline",
    "Source",
    "Status",
    "Tags",
    "Notes",
    "Created At",
    "Updated At",
];

pub fn export_buyers_xlsx(buyers: &[Buyer]) -> ResultResp {
    let buffer = build_workbook(buyers)?;
    xlsx_response(buffer, "buyers.xlsx")
}

fn build_workbook(buyers: &[Buyer]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, buyer) in buyers.iter().enumerate() {
        write_row(worksheet, (i + 1) as u32, buyer)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

fn write_row(worksheet: &mut Worksheet, r: u32, buyer: &Buyer) -> Result<(), ServerError> {
    let f = &buyer.fields;

    let text = [
        (0, f.full_name.clone()),
        (1, f.email.clone().unwrap_or_default()),
        (2, f.phone.clone()),
        (3, f.city.to_string()),
        (4, f.property_type.to_string()),
        (5, f.bhk.map(|b| b.label().to_string()).unwrap_or_default()),
        (6, f.purpose.to_string()),
        (9, f.timeline.label().to_string()),
        (10, f.source.to_string()),
        (11, f.status.to_string()),
        (12, f.tags.join(", ")),
        (13, f.notes.clone().unwrap_or_default()),
        (14, crate::domain::timestamp::format(&buyer.created_at)),
        (15, crate::domain::timestamp::format(&buyer.updated_at)),
    ];

    for (col, value) in text {
        worksheet
            .write_string(r, col, &value)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write column {col}: {e}")))?;
    }

    for (col, budget) in [(7, f.budget_min), (8, f.budget_max)] {
        if let Some(amount) = budget {
            worksheet
                .write_number(r, col, amount as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write budget: {e}")))?;
        }
    }

    Ok(())
}
