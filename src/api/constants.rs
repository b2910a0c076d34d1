//! Route paths and the generic messages returned for internal failures

pub const API_PREFIX: &str = "/api";
pub const LOGIN_PATH: &str = "/api/login";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const MSG_SERVER_ERROR: &str = "Server error";
pub const MSG_GEO_FAILED: &str = "Failed to fetch geolocation";
pub const MSG_HISTORY_FETCH_FAILED: &str = "Failed to fetch history";
pub const MSG_HISTORY_DELETE_FAILED: &str = "Failed to delete history";
