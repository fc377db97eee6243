//! Avatar upload to object storage.
//!
//! An upload reports progress through an mpsc channel and ends with exactly one
//! terminal event, [`UploadEvent::Completed`] or [`UploadEvent::Failed`].

use futures::channel::mpsc;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, ProgressEvent, XmlHttpRequest};

use crate::config::StorageConfig;
use crate::error::StorageError;

#[derive(Debug)]
pub enum UploadEvent {
    Progress { transferred: u64, total: u64 },
    /// Public URL of the stored object.
    Completed(String),
    Failed(StorageError),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress { .. })
    }
}

/// `round(100 * transferred / total)`, 0 while the total is unknown.
pub fn progress_percent(transferred: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (transferred as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Timestamp prefix keeps repeated uploads of the same file apart.
pub fn object_name(millis: u64, file_name: &str) -> String {
    format!("{}{}", millis, file_name)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredObject {
    name: Option<String>,
    download_tokens: Option<String>,
}

/// Builds the download URL from the body of a successful upload.
pub fn download_url(
    config: &StorageConfig,
    object_name: &str,
    body: &str,
) -> Result<String, StorageError> {
    let stored: StoredObject = serde_json::from_str(body)
        .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
    let token = stored
        .download_tokens
        .as_deref()
        .and_then(|tokens| tokens.split(',').next())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| StorageError::MalformedResponse("missing downloadTokens".to_string()))?;
    let name = stored.name.as_deref().unwrap_or(object_name);
    Ok(config.download_url(name, token)?)
}

pub trait UploadControl {
    fn cancel(&self);
}

/// Keeps an upload running. Dropping it detaches the callbacks.
pub struct UploadHandle(Box<dyn UploadControl>);

impl UploadHandle {
    pub fn new(control: impl UploadControl + 'static) -> Self {
        Self(Box::new(control))
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }
}

pub struct UploadTask {
    pub events: mpsc::UnboundedReceiver<UploadEvent>,
    pub handle: UploadHandle,
}

pub trait ObjectStorage {
    fn start_upload(&self, file: File) -> Result<UploadTask, StorageError>;
}

/// Firebase Storage over its REST endpoint.
///
/// Uses `XMLHttpRequest` because fetch exposes no upload progress.
#[derive(Debug, Clone)]
pub struct FirebaseStorage {
    config: StorageConfig,
}

impl FirebaseStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

struct XhrUpload {
    xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_load: Closure<dyn FnMut(ProgressEvent)>,
    _on_error: Closure<dyn FnMut(ProgressEvent)>,
}

impl UploadControl for XhrUpload {
    fn cancel(&self) {
        if let Ok(upload) = self.xhr.upload() {
            upload.set_onprogress(None);
        }
        self.xhr.set_onload(None);
        self.xhr.set_onerror(None);
        if let Err(e) = self.xhr.abort() {
            log::debug!("abort of finished upload: {:?}", e);
        }
    }
}

fn send_event(tx: &mpsc::UnboundedSender<UploadEvent>, event: UploadEvent) {
    if let Err(e) = tx.unbounded_send(event) {
        log::debug!("upload event dropped, receiver gone: {:?}", e.into_inner());
    }
}

impl ObjectStorage for FirebaseStorage {
    fn start_upload(&self, file: File) -> Result<UploadTask, StorageError> {
        let name = object_name(js_sys::Date::now() as u64, &file.name());
        let url = self.config.upload_url(&name)?;
        log::debug!("uploading {} ({} bytes)", name, file.size());

        let xhr = XmlHttpRequest::new()?;
        xhr.open_with_async("POST", &url, true)?;
        let content_type = file.type_();
        if !content_type.is_empty() {
            xhr.set_request_header("Content-Type", &content_type)?;
        }

        let (tx, rx) = mpsc::unbounded();

        let progress_tx = tx.clone();
        let on_progress = Closure::wrap(Box::new(move |event: ProgressEvent| {
            if event.length_computable() {
                send_event(
                    &progress_tx,
                    UploadEvent::Progress {
                        transferred: event.loaded() as u64,
                        total: event.total() as u64,
                    },
                );
            }
        }) as Box<dyn FnMut(_)>);
        xhr.upload()?
            .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        let load_tx = tx.clone();
        let load_xhr = xhr.clone();
        let config = self.config.clone();
        let on_load = Closure::wrap(Box::new(move |_event: ProgressEvent| {
            let event = match load_xhr.status() {
                Ok(status) if (200..300).contains(&status) => {
                    let body = load_xhr.response_text().ok().flatten().unwrap_or_default();
                    match download_url(&config, &name, &body) {
                        Ok(url) => UploadEvent::Completed(url),
                        Err(err) => UploadEvent::Failed(err),
                    }
                }
                Ok(status) => UploadEvent::Failed(StorageError::Rejected { status }),
                Err(err) => UploadEvent::Failed(err.into()),
            };
            send_event(&load_tx, event);
        }) as Box<dyn FnMut(_)>);
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let on_error = Closure::wrap(Box::new(move |_event: ProgressEvent| {
            send_event(&tx, UploadEvent::Failed(StorageError::Network));
        }) as Box<dyn FnMut(_)>);
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        xhr.send_with_opt_blob(Some(file.as_ref()))?;

        Ok(UploadTask {
            events: rx,
            handle: UploadHandle::new(XhrUpload {
                xhr,
                _on_progress: on_progress,
                _on_load: on_load,
                _on_error: on_error,
            }),
        })
    }
}
