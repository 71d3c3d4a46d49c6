pub mod auth_service;
pub mod favorite_service;
pub mod product_service;
pub mod quote_service;
pub mod supplier_service;
