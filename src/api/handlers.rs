//! HTTP endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{ApiResponse, CloseParams, HealthResponse, ScheduleRequest, StartRequest};
use crate::{
    state::{CloseOutcome, Notice, StatusView, CLOSE_CONFIRMATION},
    tasks::{ControlHandle, Reply},
};

type ControlResult = Result<(StatusCode, Json<ApiResponse>), StatusCode>;

fn loop_unavailable(e: String) -> StatusCode {
    error!("Failed to reach the event loop: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Read an optional JSON body.
///
/// A request without a JSON content type and without content falls back to
/// the defaults; any other rejection is answered with 422 and no command is
/// sent to the event loop.
async fn body_or_default<T: Default>(
    handle: &ControlHandle,
    headers: &HeaderMap,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ControlResult> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    if let JsonRejection::MissingJsonContentType(_) = rejection {
        let empty = headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .map_or(true, |length| length.trim() == "0");
        if empty {
            return Ok(T::default());
        }
    }

    warn!("Rejected request body: {}", rejection.body_text());
    let view = match handle.status().await {
        Ok(view) => view,
        Err(e) => return Err(Err(loop_unavailable(e))),
    };
    Err(Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(rejection.body_text(), view)),
    )))
}

/// Turn a reply into a response; refusals map to 422 (bad input) or 409 (wrong state)
fn control_response(
    reply: Reply,
    ok: impl FnOnce(Vec<Notice>, StatusView) -> ApiResponse,
) -> (StatusCode, Json<ApiResponse>) {
    match reply.result {
        Ok(notices) => (StatusCode::OK, Json(ok(notices, reply.view))),
        Err(e) => {
            warn!("Control action refused: {}", e);
            let code = if e.is_validation() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::CONFLICT
            };
            (code, Json(ApiResponse::error(e.to_string(), reply.view)))
        }
    }
}

/// Handle POST /anti-sleep/start - Start clicking on an interval
pub async fn anti_sleep_start_handler(
    State(handle): State<ControlHandle>,
    headers: HeaderMap,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> ControlResult {
    let request = match body_or_default(&handle, &headers, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };
    let reply = handle
        .start_anti_sleep(request.interval_seconds)
        .await
        .map_err(loop_unavailable)?;

    Ok(control_response(reply, |notices, view| {
        info!("Anti-sleep start endpoint called");
        ApiResponse::active(
            format!(
                "Anti-sleep started: clicking every {} seconds",
                view.anti_sleep.interval_seconds
            ),
            notices,
            view,
        )
    }))
}

/// Handle POST /anti-sleep/stop - Stop clicking
pub async fn anti_sleep_stop_handler(State(handle): State<ControlHandle>) -> ControlResult {
    let reply = handle.stop_anti_sleep().await.map_err(loop_unavailable)?;

    Ok(control_response(reply, |notices, view| {
        info!("Anti-sleep stop endpoint called");
        let message = if notices.is_empty() {
            "Anti-sleep was not running"
        } else {
            "Anti-sleep stopped"
        };
        ApiResponse::inactive(message.to_string(), notices, view)
    }))
}

/// Handle POST /shutdown/schedule - Schedule an OS shutdown after an offset
pub async fn shutdown_schedule_handler(
    State(handle): State<ControlHandle>,
    headers: HeaderMap,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> ControlResult {
    let request = match body_or_default(&handle, &headers, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };
    let reply = handle
        .schedule_shutdown(request.hours, request.minutes)
        .await
        .map_err(loop_unavailable)?;

    Ok(control_response(reply, |notices, view| {
        info!("Shutdown schedule endpoint called");
        ApiResponse::active(view.status_text.clone(), notices, view)
    }))
}

/// Handle POST /shutdown/cancel - Abort the scheduled shutdown
pub async fn shutdown_cancel_handler(State(handle): State<ControlHandle>) -> ControlResult {
    let reply = handle.cancel_shutdown().await.map_err(loop_unavailable)?;

    Ok(control_response(reply, |notices, view| {
        info!("Shutdown cancel endpoint called");
        ApiResponse::inactive(view.status_text.clone(), notices, view)
    }))
}

/// Handle POST /close - Close the controller, confirming if a shutdown is pending
pub async fn close_handler(
    State(handle): State<ControlHandle>,
    Query(params): Query<CloseParams>,
) -> ControlResult {
    let reply = handle.close(params.confirm).await.map_err(loop_unavailable)?;

    match reply.outcome {
        CloseOutcome::Closed => {
            info!("Close endpoint called - closing");
            let message = if reply.view.shutdown.target_time.is_some() {
                "Closing; the scheduled shutdown stays in place"
            } else {
                "Closing"
            };
            Ok((
                StatusCode::OK,
                Json(ApiResponse::inactive(message.to_string(), Vec::new(), reply.view)),
            ))
        }
        CloseOutcome::ConfirmationRequired => Ok((
            StatusCode::CONFLICT,
            Json(ApiResponse::confirm(CLOSE_CONFIRMATION.to_string(), reply.view)),
        )),
    }
}

/// Handle GET /status - Return the rendered status view
pub async fn status_handler(State(handle): State<ControlHandle>) -> Result<Json<StatusView>, StatusCode> {
    handle.status().await.map(Json).map_err(loop_unavailable)
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
