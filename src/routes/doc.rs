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
    domain::{Category, OrderStatus, PaymentStatus, UnitType},
    dto::{
        cart::{AddToCartRequest, CartList, UpdateQuantityRequest, UpdateUnitTypeRequest},
        orders::{OrderList, OrderWithItems},
        products::{self, CreateProductRequest, UpdateProductRequest},
    },
    models::{CartItem, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, orders, params, products as product_routes},
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
        auth::login,
        auth::register,
        product_routes::list_products,
        product_routes::get_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::update_unit_type,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::cancel_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::update_payment_status,
        admin::create_product,
        admin::update_product,
        admin::delete_product
    ),
    components(
        schemas(
            User,
            Product,
            CartItem,
            Order,
            OrderItem,
            Category,
            UnitType,
            OrderStatus,
            PaymentStatus,
            AddToCartRequest,
            UpdateQuantityRequest,
            UpdateUnitTypeRequest,
            CartList,
            OrderList,
            OrderWithItems,
            CreateProductRequest,
            UpdateProductRequest,
            admin::UpdateOrderStatusRequest,
            admin::UpdatePaymentStatusRequest,
            params::Pagination,
            params::SortOrder,
            params::ProductSortBy,
            params::ProductQuery,
            params::OrderListQuery,
            products::ProductList,
            Meta,
            ApiResponse<Product>,
            ApiResponse<products::ProductList>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Order>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
