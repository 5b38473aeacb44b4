mod auth_flow_tests;
mod buyer_tests;
mod import_export_tests;
