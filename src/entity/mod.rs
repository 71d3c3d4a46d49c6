pub mod audit_logs;
pub mod favorites;
pub mod products;
pub mod quote_requests;
pub mod suppliers;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use favorites::Entity as Favorites;
pub use products::Entity as Products;
pub use quote_requests::Entity as QuoteRequests;
pub use suppliers::Entity as Suppliers;
pub use users::Entity as Users;
