//! Pass-through to the EmailJS delivery API for user reports. No retries and
//! no queueing: the request is forwarded once and the outcome reported.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

const EMAILJS_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Deserialize)]
pub struct EmailRequest {
    pub service_id: String,
    pub template_id: String,
    pub template_params: Value,
    pub user_id: String,
}

#[derive(Serialize)]
struct EmailJsPayload {
    service_id: String,
    template_id: String,
    template_params: Value,
    user_id: String,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

pub struct EmailRelay {
    client: Client,
    access_token: Option<String>,
}

impl EmailRelay {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }

    pub async fn forward(&self, request: EmailRequest) -> Result<(), AppError> {
        let payload = EmailJsPayload {
            service_id: request.service_id,
            template_id: request.template_id,
            template_params: request.template_params,
            user_id: request.user_id,
            access_token: self.access_token.clone(),
        };

        self.client
            .post(EMAILJS_URL)
            .json(&payload)
            .send()
            .await
            .map_err(AppError::EmailRelay)?
            .error_for_status()
            .map_err(AppError::EmailRelay)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(access_token: Option<String>) -> EmailJsPayload {
        EmailJsPayload {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            template_params: json!({ "message": "The slang 'rizz' is wrong." }),
            user_id: "user_z".to_string(),
            access_token,
        }
    }

    #[test]
    fn access_token_is_renamed_when_present() {
        let value = serde_json::to_value(payload(Some("secret".to_string()))).unwrap();

        assert_eq!(value["accessToken"], "secret");
        assert_eq!(value["service_id"], "service_x");
    }

    #[test]
    fn access_token_is_omitted_when_absent() {
        let value = serde_json::to_value(payload(None)).unwrap();

        assert!(value.get("accessToken").is_none());
    }
}
