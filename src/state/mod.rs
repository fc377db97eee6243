pub mod profile;
pub mod session;

pub use profile::{ProfileState, UploadMessage, UploadStatus, UploadTicket};
pub use session::{OpStatus, SessionAction, SessionOp, SessionState};
