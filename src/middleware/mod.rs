pub mod response;
pub mod session;

pub use response::{ApiResponse, ApiResult, MessageBody};
pub use session::{session_cookie, session_gate, SESSION_COOKIE, SESSION_VALUE};
