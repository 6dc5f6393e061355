use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: i32,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    /// `MM-YYYY`
    #[schema(example = "09-2025")]
    pub start_date: String,
}

#[derive(ToSchema)]
pub struct SubscriptionInputDoc {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    #[schema(example = "09-2025")]
    pub start_date: String,
}

#[derive(ToSchema)]
pub struct TotalPriceRequestDoc {
    /// Falls back to the `userId` cookie when absent.
    pub user_id: Option<Uuid>,
    #[schema(example = "01-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: String,
    /// Exact service names; empty or absent means all.
    pub service_name: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct TotalPriceDoc { pub total: i64 }

#[derive(ToSchema)]
pub struct ResultDoc {
    #[schema(example = "updated")]
    pub result: String,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "not_found")]
    pub error: String,
    pub detail: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::list_by_user,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::total_price,
    ),
    components(
        schemas(
            HealthResponse,
            SubscriptionDoc,
            SubscriptionInputDoc,
            TotalPriceRequestDoc,
            TotalPriceDoc,
            ResultDoc,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscription")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_subscription_paths() {
        let doc = ApiDoc::openapi();
        for p in ["/health", "/subscription", "/subscription/users", "/subscription/total-price"] {
            assert!(doc.paths.paths.contains_key(p), "missing {p}");
        }
    }

    #[test]
    fn total_price_documents_the_former_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let op = &doc["paths"]["/subscription/total-price"]["post"];
        let desc = format!("{} {}", op["summary"].as_str().unwrap_or_default(), op["description"].as_str().unwrap_or_default());
        assert!(desc.contains("GET /subscription/total-price"), "{desc}");
        assert!(desc.contains("`result`"), "{desc}");
    }
}
