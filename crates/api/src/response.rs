//! Shared response envelope types for API handlers.
//!
//! Record endpoints answer with a `{ "data": ... }` envelope. Generation
//! endpoints use their own flat shapes (see `handlers::generation`).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
