use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::jobs::query::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::state::AppState;

/// GET /api/openapi.json
/// Fixed OpenAPI 3.1 description; only `servers[0].url` follows the request.
pub async fn openapi_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let scheme = header_str(&headers, "x-forwarded-proto")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or("http");
    let host = header_str(&headers, "host")
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", state.config.port));

    Json(openapi_document(&format!("{scheme}://{host}")))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

pub fn openapi_document(server_url: &str) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "WordPress Jobs API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Job listings from WordPress, reduced to a flat schema with optional location and job type filtering."
        },
        "servers": [{ "url": server_url }],
        "paths": {
            "/api/jobs": {
                "get": {
                    "operationId": "listJobs",
                    "summary": "List job postings",
                    "description": "Returns one page of job listings. `total` and `totalPages` are counted before the `location` and `job_type` filters are applied.",
                    "parameters": parameters(),
                    "responses": {
                        "200": {
                            "description": "A page of job listings.",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/JobsResponse" }
                                }
                            }
                        },
                        "429": error_response("Rate limit exceeded."),
                        "500": error_response("Unexpected failure while handling the request."),
                        "503": error_response("WordPress API unreachable or timed out.")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Job": job_schema(),
                "JobsResponse": jobs_response_schema(),
                "Error": error_schema()
            }
        }
    })
}

fn parameters() -> Value {
    json!([
        query_param("search", "Free-text search passed to WordPress.", json!({ "type": "string" })),
        query_param("slug", "Exact job slug.", json!({ "type": "string" })),
        query_param(
            "per_page",
            "Results per page.",
            json!({ "type": "integer", "minimum": 1, "maximum": MAX_PER_PAGE, "default": DEFAULT_PER_PAGE })
        ),
        query_param("page", "Page number.", json!({ "type": "integer", "minimum": 1, "default": 1 })),
        query_param("location", "Case-insensitive substring match on location.", json!({ "type": "string" })),
        query_param("job_type", "Case-insensitive substring match on job type.", json!({ "type": "string" }))
    ])
}

fn job_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": ["integer", "null"] },
            "slug": { "type": ["string", "null"] },
            "title": { "type": "string" },
            "link": { "type": ["string", "null"], "format": "uri" },
            "employer": { "type": "string" },
            "employerLogo": { "type": ["string", "null"], "format": "uri" },
            "employerUrl": { "type": ["string", "null"], "format": "uri" },
            "location": { "type": "string" },
            "jobType": { "type": "string" },
            "category": { "type": "string" },
            "qualification": { "type": "string" },
            "experience": { "type": "string" },
            "salary": { "type": "string" },
            "description": { "type": "string", "maxLength": 803 },
            "postedDate": { "type": ["string", "null"], "examples": ["5/3/2024"] },
            "fullDescriptionUrl": { "type": ["string", "null"], "format": "uri" }
        }
    })
}

fn jobs_response_schema() -> Value {
    json!({
        "type": "object",
        "required": ["success", "count", "total", "totalPages", "currentPage", "jobs"],
        "properties": {
            "success": { "type": "boolean", "const": true },
            "count": { "type": "integer" },
            "total": { "type": "integer" },
            "totalPages": { "type": "integer" },
            "currentPage": { "type": "integer" },
            "jobs": {
                "type": "array",
                "items": { "$ref": "#/components/schemas/Job" }
            }
        }
    })
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "required": ["success", "error", "message"],
        "properties": {
            "success": { "type": "boolean", "const": false },
            "error": { "type": "string" },
            "message": { "type": "string" }
        }
    })
}

fn query_param(name: &str, description: &str, schema: Value) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": schema
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use crate::routes::build_router;
    use crate::test_support::{get, send, test_state};

    #[test]
    fn test_document_describes_jobs_operation() {
        let doc = openapi_document("http://localhost:3000");
        assert_eq!(doc["openapi"], "3.1.0");
        let params = doc["paths"]["/api/jobs"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        assert_eq!(
            names,
            ["search", "slug", "per_page", "page", "location", "job_type"]
        );
        assert_eq!(params[2]["schema"]["maximum"], 20);
    }

    #[tokio::test]
    async fn test_server_url_follows_request_host() {
        let app = build_router(test_state("http://127.0.0.1:1", 100));
        let request = Request::builder()
            .uri("/api/openapi.json")
            .header("host", "jobs.example.org")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["servers"][0]["url"], "https://jobs.example.org");
    }

    #[tokio::test]
    async fn test_server_url_defaults() {
        let app = build_router(test_state("http://127.0.0.1:1", 100));
        let (_, _, body) = get(app, "/api/openapi.json").await;
        assert_eq!(body["servers"][0]["url"], "http://localhost:3000");
    }
}
