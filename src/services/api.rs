use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use reqwasm::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{Listing, ProfileOverlay, User};

pub type ApiFuture<T> = LocalBoxFuture<'static, Result<T, ApiError>>;

/// Backend routes used by the profile page.
pub trait ProfileApi {
    fn update_user(&self, user_id: &str, overlay: &ProfileOverlay) -> ApiFuture<User>;
    fn delete_user(&self, user_id: &str) -> ApiFuture<Value>;
    fn sign_out(&self) -> ApiFuture<Value>;
    fn user_listings(&self, user_id: &str) -> ApiFuture<Vec<Listing>>;
}

/// Reads a backend body. `{ "success": false, "message": .. }` is a rejection
/// whatever the HTTP status was.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(ApiError::Decode)?;
    if value.get("success") == Some(&Value::Bool(false)) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(ApiError::Rejected(message));
    }
    serde_json::from_value(value).map_err(ApiError::Decode)
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    log::debug!("{} answered {}", response.url(), status);
    parse_envelope(&body)
}

#[derive(Debug, Clone)]
pub struct HttpProfileApi {
    config: Rc<AppConfig>,
}

impl HttpProfileApi {
    pub fn new(config: Rc<AppConfig>) -> Self {
        Self { config }
    }
}

impl ProfileApi for HttpProfileApi {
    fn update_user(&self, user_id: &str, overlay: &ProfileOverlay) -> ApiFuture<User> {
        let url = self.config.endpoint(&format!("user/update/{}", user_id));
        let body = serde_json::to_string(overlay).map_err(ApiError::Encode);
        async move {
            let response = Request::post(&url)
                .header("Content-Type", "application/json")
                .body(body?)
                .send()
                .await?;
            read_envelope(response).await
        }
        .boxed_local()
    }

    fn delete_user(&self, user_id: &str) -> ApiFuture<Value> {
        let url = self.config.endpoint(&format!("user/delete/{}", user_id));
        async move {
            let response = Request::delete(&url).send().await?;
            read_envelope(response).await
        }
        .boxed_local()
    }

    fn sign_out(&self) -> ApiFuture<Value> {
        let url = self.config.endpoint("auth/signout");
        async move {
            let response = Request::get(&url).send().await?;
            read_envelope(response).await
        }
        .boxed_local()
    }

    fn user_listings(&self, user_id: &str) -> ApiFuture<Vec<Listing>> {
        let url = self.config.endpoint(&format!("user/listings/{}", user_id));
        async move {
            let response = Request::get(&url).send().await?;
            read_envelope(response).await
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_failure_is_rejection() {
        let err = parse_envelope::<User>(
            r#"{ "success": false, "statusCode": 401, "message": "You can only update your own account!" }"#,
        )
        .unwrap_err();
        match err {
            ApiError::Rejected(message) => {
                assert_eq!(message, "You can only update your own account!")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn failure_without_message_is_empty_rejection() {
        let err = parse_envelope::<Value>(r#"{ "success": false }"#).unwrap_err();
        assert_eq!(err.message(), "");
    }

    #[test]
    fn success_true_is_not_a_failure() {
        let value: Value = parse_envelope(r#"{ "success": true, "message": "ok" }"#).unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn payload_decodes_into_target() {
        let listings: Vec<Listing> = parse_envelope(
            r#"[{ "_id": "l-1", "name": "Cottage", "imageUrls": ["a.jpg"] },
                { "_id": "l-2", "name": "Loft", "imageUrls": [] }]"#,
        )
        .unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].name, "Loft");
    }

    #[test]
    fn plain_string_confirmation_is_accepted() {
        let value: Value = parse_envelope(r#""User has been logged out!""#).unwrap();
        assert_eq!(value, Value::String("User has been logged out!".to_string()));
    }

    #[test]
    fn unparsable_body_is_decode_error() {
        let err = parse_envelope::<Value>("<!DOCTYPE html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = parse_envelope::<Vec<Listing>>(r#"{ "name": "not a list" }"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
