//! OpenAPI documentation configuration
//!
//! Generates OpenAPI 3.0 specification for the Atelier moderation API.

use utoipa::OpenApi;

use crate::catalog::{AuditLogRecord, ListingRecord};
use crate::handlers::{
    DeleteResponse, HealthResponse, ImageScanResponse, OpenSessionRequest, OpenSessionResponse,
    PublishRequest, PublishResponse, ReadyResponse, ReportRequest, ReviewActionRequest,
};

/// Atelier Moderation API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier - Listing Integrity API",
        version = "0.1.0",
        description = r#"
## Handmade Marketplace Listing Integrity API

Atelier keeps a handmade-goods catalog trustworthy by screening every
listing before it goes live:

- **Text integrity scan** - flags listings that read mass-produced
- **Image integrity scan** - flags stock-photo-like product shots
- **Fail-open policy** - an unreachable classifier never blocks a seller
- **Append-only audit trail** - every scan, verdict, and report is recorded
- **Review queue** - human moderators settle what the classifiers flag

### How It Works

1. Open an authoring session via `POST /authoring/sessions`
2. Submit each photo via `POST /authoring/sessions/{id}/images`
3. Publish via `POST /authoring/sessions/{id}/publish`; the listing goes
   live immediately or lands in the review queue with a reason
4. Moderators work `GET /moderation/queue` and settle listings with
   `POST /moderation/{id}/action`
5. Buyers can flag a live listing via `POST /listings/{id}/report`
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/atelier-market/atelier/blob/main/LICENSE"
        ),
        contact(
            name = "Atelier Team",
            url = "https://github.com/atelier-market/atelier"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Catalog", description = "Public catalog reads and seller listing management"),
        (name = "Authoring", description = "Listing authoring sessions with per-image integrity scans"),
        (name = "Moderation", description = "Review queue, moderator verdicts, and community reports"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::listings::list_listings,
        crate::handlers::listings::get_listing,
        crate::handlers::listings::list_seller_listings,
        crate::handlers::listings::delete_listing,
        crate::handlers::listings::report_listing,
        crate::handlers::authoring::open_session,
        crate::handlers::authoring::submit_image,
        crate::handlers::authoring::publish,
        crate::handlers::review::list_queue,
        crate::handlers::review::review_action,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            ListingRecord,
            AuditLogRecord,
            DeleteResponse,
            ReportRequest,
            OpenSessionRequest,
            OpenSessionResponse,
            ImageScanResponse,
            PublishRequest,
            PublishResponse,
            ReviewActionRequest,
        )
    )
)]
pub struct ApiDoc;
