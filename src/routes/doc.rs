use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, ResubmitRequest, SupplierProfileRequest, UserProfile},
        favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        quotes::{CreateQuoteRequest, QuoteRequestList, UpdateQuoteStatusRequest},
        suppliers::{RejectSupplierRequest, SupplierDetail, SupplierList, UpdateSupplierRequest},
    },
    models::{Favorite, Product, QuoteRequest, Role, Supplier, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, favorites, health, params, products, quotes, suppliers},
    workflow::{QuoteStatus, SupplierStatus},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::resubmit,
        auth::me,
        products::list_products,
        products::list_supplier_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        admin::list_suppliers,
        admin::get_supplier,
        admin::approve_supplier,
        admin::reject_supplier,
        admin::block_supplier,
        admin::unblock_supplier,
        suppliers::my_supplier,
        suppliers::update_my_supplier,
        quotes::create_quote_request,
        quotes::list_my_quote_requests,
        quotes::list_received_quote_requests,
        quotes::get_quote_request,
        quotes::update_quote_status,
        quotes::delete_quote_request,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::favorite_status,
        favorites::remove_favorite
    ),
    components(
        schemas(
            Role,
            SupplierStatus,
            QuoteStatus,
            User,
            Supplier,
            Product,
            QuoteRequest,
            Favorite,
            RegisterRequest,
            SupplierProfileRequest,
            LoginRequest,
            LoginResponse,
            ResubmitRequest,
            UserProfile,
            UpdateSupplierRequest,
            RejectSupplierRequest,
            SupplierDetail,
            SupplierList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateQuoteRequest,
            UpdateQuoteStatusRequest,
            QuoteRequestList,
            AddFavoriteRequest,
            FavoriteProductList,
            FavoriteStatus,
            params::ProductSort,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Supplier>,
            ApiResponse<SupplierList>,
            ApiResponse<QuoteRequest>,
            ApiResponse<QuoteRequestList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and application resubmission"),
        (name = "Products", description = "Catalog and listing management"),
        (name = "Admin", description = "Supplier review"),
        (name = "Suppliers", description = "Supplier self-service"),
        (name = "Quote Requests", description = "Buyer quote requests"),
        (name = "Favourites", description = "Saved products"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
