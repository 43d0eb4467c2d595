use axum::{
    extract::{RawQuery, State},
    Extension, Json,
};
use bazaar_core::{decode, SearchParameters, SearchParamsUpdate, SearchResultEnvelope};
use bazaar_search::{cache_key, SearchOutcome, SearchSession, SearchStore};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    /// Canonical query string for the decoded parameters.
    query: String,
    params: SearchParameters,
    results: SearchResultEnvelope,
}

#[derive(Debug, Deserialize)]
pub(super) struct UrlRewriteRequest {
    #[serde(default)]
    query: String,
    #[serde(default)]
    update: SearchParamsUpdate,
}

#[derive(Debug, Serialize)]
pub(super) struct UrlRewriteData {
    query: String,
    params: SearchParameters,
}

pub(super) async fn run_search<S: SearchStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let params = decode(raw.as_deref().unwrap_or_default());
    let key = cache_key(&params);

    match state
        .cache
        .get_or_search(&state.orchestrator, &key, &params)
        .await
    {
        SearchOutcome::Completed(results) => Ok(Json(ApiResponse {
            data: SearchData {
                query: key,
                params,
                results,
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        SearchOutcome::Failed { error } => {
            tracing::error!(error = %error, query = %key, "search request failed");
            Err(ApiError::new(req_id.0, "internal_error", "search failed"))
        }
    }
}

/// Applies a parameter update to a query string the way the browser UI
/// would: pagination resets unless the update names a page.
#[allow(clippy::unused_async)]
pub(super) async fn rewrite_url<S: SearchStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UrlRewriteRequest>,
) -> Json<ApiResponse<UrlRewriteData>> {
    let mut session =
        SearchSession::from_query_string(state.orchestrator, state.cache, &body.query);
    session.update(body.update);

    Json(ApiResponse {
        data: UrlRewriteData {
            query: session.query_string().to_string(),
            params: session.params().clone(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
