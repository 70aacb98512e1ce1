pub mod bank_api_service;
pub mod editor_service;
pub mod reconcile_service;
pub mod reorder_service;
