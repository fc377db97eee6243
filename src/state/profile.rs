use crate::error::ApiError;
use crate::models::{Listing, ProfileField, ProfileOverlay};
use crate::services::storage::{progress_percent, UploadEvent};

pub const UPLOAD_ERROR_MESSAGE: &str = "Error Image upload (image should be less than 2 mb)";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Image successfully uploaded!";

/// Identifies one upload. Events carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Progress(u8),
    /// Sticky until the next file is picked.
    Failed,
}

/// What the line under the avatar says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMessage {
    Uploading(u8),
    Succeeded,
    Failed,
}

impl UploadMessage {
    pub fn text(&self) -> String {
        match self {
            UploadMessage::Uploading(percent) => format!("Uploading {} %", percent),
            UploadMessage::Succeeded => UPLOAD_SUCCESS_MESSAGE.to_string(),
            UploadMessage::Failed => UPLOAD_ERROR_MESSAGE.to_string(),
        }
    }
}

/// State owned by the profile view alone.
#[derive(Debug, Default)]
pub struct ProfileState {
    overlay: ProfileOverlay,
    upload: UploadStatus,
    generation: u64,
    update_succeeded: bool,
    listings: Vec<Listing>,
    listing_error: bool,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> &ProfileOverlay {
        &self.overlay
    }

    pub fn edit(&mut self, field: ProfileField, value: impl Into<String>) {
        self.overlay.set(field, value);
    }

    /// Supersedes whatever upload came before.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.generation += 1;
        self.upload = UploadStatus::Idle;
        UploadTicket(self.generation)
    }

    /// Returns false when the event belongs to a superseded upload.
    pub fn apply_upload_event(&mut self, ticket: UploadTicket, event: UploadEvent) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        match event {
            UploadEvent::Progress { transferred, total } => {
                if self.upload != UploadStatus::Failed {
                    self.upload = UploadStatus::Progress(progress_percent(transferred, total));
                }
            }
            UploadEvent::Completed(url) => self.overlay.set(ProfileField::Avatar, url),
            UploadEvent::Failed(err) => {
                log::warn!("avatar upload failed: {}", err);
                self.upload = UploadStatus::Failed;
            }
        }
        true
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.upload
    }

    pub fn upload_message(&self) -> Option<UploadMessage> {
        match self.upload {
            UploadStatus::Failed => Some(UploadMessage::Failed),
            UploadStatus::Progress(100) => Some(UploadMessage::Succeeded),
            UploadStatus::Progress(percent) if percent > 0 => Some(UploadMessage::Uploading(percent)),
            _ => None,
        }
    }

    pub fn mark_updated(&mut self) {
        self.update_succeeded = true;
    }

    pub fn update_succeeded(&self) -> bool {
        self.update_succeeded
    }

    pub fn begin_listings_fetch(&mut self) {
        self.listing_error = false;
    }

    /// On failure the previous listings stay on screen.
    pub fn finish_listings_fetch(&mut self, result: Result<Vec<Listing>, ApiError>) {
        match result {
            Ok(listings) => self.listings = listings,
            Err(err) => {
                log::warn!("could not load listings: {}", err);
                self.listing_error = true;
            }
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn listing_error(&self) -> bool {
        self.listing_error
    }
}
