use crate::api::handlers::{content, health};
use crate::content::store::ContentEntry;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        content::list,
        content::save,
        content::remove
    ),
    components(schemas(ContentEntry, content::DeleteRequest)),
    tags(
        (name = "content", description = "Content override document"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
