use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{TransactionStatus, TransactionType, TransactionView};
use crate::handlers;
use crate::schemas::{AuthorizeRequest, MessageResponse, TransactionRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::payments::authorize,
        handlers::payments::capture,
        handlers::payments::refund,
        handlers::payments::get_transaction,
        handlers::payments::history,
        handlers::admin::clear_cache,
    ),
    components(schemas(
        AuthorizeRequest,
        TransactionRequest,
        TransactionView,
        TransactionStatus,
        TransactionType,
        MessageResponse,
        handlers::HealthStatus,
    )),
    modifiers(&BasicAuthScheme),
    tags(
        (name = "Payments", description = "Authorize, capture and refund simulated card payments"),
        (name = "Admin", description = "Operational endpoints"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}
