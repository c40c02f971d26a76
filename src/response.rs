use axum::{
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Total pages for `count` rows at `per_page` rows per page.
/// Returns 0 when `per_page` is not positive so callers never divide by zero.
pub fn page_count(count: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (count + per_page - 1) / per_page
}

pub fn has_next(page: i64, page_count: i64) -> bool {
    page < page_count
}

pub fn has_prev(page: i64) -> bool {
    page > 1
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub per_page: i64,
    pub count: i64,
    pub page_count: i64,
    pub next: bool,
    pub prev: bool,
}

impl Paging {
    pub fn new(page: i64, per_page: i64, count: i64) -> Self {
        let page_count = page_count(count, per_page);
        Self {
            page,
            per_page,
            count,
            page_count,
            next: has_next(page, page_count),
            prev: has_prev(page),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: u32,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Uniform envelope for every JSON endpoint. `paging` and `error` are
/// serialized as `null` when absent rather than omitted.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub paging: Option<Paging>,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            paging: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_paged(data: T, paging: Paging) -> Self {
        Self {
            success: true,
            paging: Some(paging),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn failure(status: StatusCode, message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            success: false,
            paging: None,
            data: None,
            error: Some(ErrorBody {
                code: internal_code(status),
                status: status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
                message: message.into(),
                details,
            }),
        }
    }
}

/// Client-facing error codes keyed by HTTP status.
pub fn internal_code(status: StatusCode) -> u32 {
    match status {
        StatusCode::BAD_REQUEST => 4000,
        StatusCode::UNAUTHORIZED => 4010,
        StatusCode::NOT_FOUND => 4040,
        StatusCode::CONFLICT => 4090,
        StatusCode::UNPROCESSABLE_ENTITY => 4220,
        _ => 5000,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Csv,
    Xlsx,
    Pdf,
}

impl AttachmentKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv | Self::Xlsx => "application/octet-stream",
        }
    }
}

/// Raw byte download. Bypasses the JSON envelope and sets the
/// attachment-disposition headers expected by file downloads.
#[derive(Debug)]
pub struct Attachment {
    pub filename: String,
    pub kind: AttachmentKind,
    pub body: Vec<u8>,
}

impl Attachment {
    pub fn csv(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(filename, AttachmentKind::Csv, body)
    }

    pub fn xlsx(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(filename, AttachmentKind::Xlsx, body)
    }

    pub fn pdf(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(filename, AttachmentKind::Pdf, body)
    }

    fn new(filename: impl Into<String>, kind: AttachmentKind, body: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            kind,
            body,
        }
    }

    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename={}.{}",
            self.filename,
            self.kind.extension()
        )
    }
}

impl IntoResponse for Attachment {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            [
                (header::CONTENT_TYPE, self.kind.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
                (
                    HeaderName::from_static("content-description"),
                    "File Transfer".to_string(),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(45, 20), 3);
        assert_eq!(page_count(40, 20), 2);
        assert_eq!(page_count(1, 20), 1);
    }

    #[test]
    fn page_count_of_zero_rows_is_zero() {
        assert_eq!(page_count(0, 20), 0);
    }

    #[test]
    fn page_count_guards_non_positive_per_page() {
        assert_eq!(page_count(45, 0), 0);
        assert_eq!(page_count(45, -1), 0);
    }

    #[test]
    fn has_next_is_false_at_or_past_last_page() {
        assert!(has_next(1, 3));
        assert!(!has_next(3, 3));
        assert!(!has_next(4, 3));
        assert!(!has_next(1, 0));
    }

    #[test]
    fn has_prev_is_false_on_first_page() {
        assert!(!has_prev(1));
        assert!(!has_prev(0));
        assert!(has_prev(2));
    }

    #[test]
    fn paging_combines_count_math() {
        let paging = Paging::new(2, 20, 45);
        assert_eq!(paging.page_count, 3);
        assert!(paging.next);
        assert!(paging.prev);

        let last = Paging::new(3, 20, 45);
        assert!(!last.next);
        assert!(last.prev);
    }

    #[test]
    fn internal_codes_follow_fixed_table() {
        assert_eq!(internal_code(StatusCode::BAD_REQUEST), 4000);
        assert_eq!(internal_code(StatusCode::UNAUTHORIZED), 4010);
        assert_eq!(internal_code(StatusCode::NOT_FOUND), 4040);
        assert_eq!(internal_code(StatusCode::CONFLICT), 4090);
        assert_eq!(internal_code(StatusCode::UNPROCESSABLE_ENTITY), 4220);
        assert_eq!(internal_code(StatusCode::INTERNAL_SERVER_ERROR), 5000);
        assert_eq!(internal_code(StatusCode::BAD_GATEWAY), 5000);
    }

    #[test]
    fn success_envelope_keeps_null_error_and_paging() {
        let body = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(body["success"], serde_json::Value::Bool(true));
        assert!(body["paging"].is_null());
        assert!(body["error"].is_null());
        assert_eq!(body["data"]["id"], 1);
    }

    #[test]
    fn failure_envelope_carries_code_and_details() {
        let body = serde_json::to_value(ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            "invalid payload",
            vec!["name: required".to_string()],
        ))
        .unwrap();
        assert_eq!(body["success"], serde_json::Value::Bool(false));
        assert!(body["data"].is_null());
        assert_eq!(body["error"]["code"], 4000);
        assert_eq!(body["error"]["status"], "Bad Request");
        assert_eq!(body["error"]["details"][0], "name: required");
    }

    #[test]
    fn failure_envelope_omits_empty_details() {
        let body = serde_json::to_value(ApiResponse::failure(
            StatusCode::NOT_FOUND,
            "order not found",
            Vec::new(),
        ))
        .unwrap();
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn attachment_sets_download_headers() {
        let att = Attachment::csv("orders-20240101", b"a,b\n".to_vec());
        assert_eq!(
            att.content_disposition(),
            "attachment; filename=orders-20240101.csv"
        );
        assert_eq!(att.kind.content_type(), "application/octet-stream");
        assert_eq!(
            Attachment::pdf("invoice", Vec::new()).kind.content_type(),
            "application/pdf"
        );
        assert_eq!(AttachmentKind::Xlsx.extension(), "xlsx");
    }
}
