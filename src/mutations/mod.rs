pub mod coordinator;
pub mod import;
pub mod recorder;

pub use coordinator::BuyerService;
pub use import::ImportReport;
