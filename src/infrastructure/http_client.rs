//! REST 后端客户端
//!
//! 所有请求都发往固定的基础地址；会话里有令牌时附带
//! `Authorization: Bearer <token>`。失败统一归类为 `RequestFailed`。

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{config::BackendConfig, session_store::SessionStore};
use crate::core::error::CoreError;

/// 后端错误体里可能出现的字段
#[derive(Debug, Deserialize)]
struct BackendMessage {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl BackendClient {
    pub fn new(config: &BackendConfig, session: SessionStore) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CoreError::Internal(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), CoreError> {
        self.send::<(), serde_json::Value>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("后端请求: {} {}", method, path);
        let response = request.send().await.map_err(|e| {
            warn!("后端请求失败: {} {} - {}", method, path, e);
            CoreError::request_failed(None, None)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("读取响应体失败: {} {} - {}", method, path, e);
            CoreError::request_failed(Some(status.as_u16()), None)
        })?;

        if !status.is_success() {
            warn!("后端返回错误: {} {} - {}", method, path, status);
            return Err(error_from_body(status, &bytes));
        }

        // 204 或空响应体按 null 解析
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| {
            warn!("无法解析后端响应: {} {} - {}", method, path, e);
            CoreError::request_failed(Some(status.as_u16()), None)
        })
    }
}

fn error_from_body(status: StatusCode, bytes: &[u8]) -> CoreError {
    let message = serde_json::from_slice::<BackendMessage>(bytes)
        .ok()
        .and_then(|m| m.message.or(m.error));
    CoreError::request_failed(Some(status.as_u16()), message)
}

/// 校验服务端分配的记录 ID
pub fn check_record_id<'a>(id: &'a str, kind: &str) -> Result<&'a str, CoreError> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id != "undefined"
        && id != "null"
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(CoreError::Validation(format!("Invalid {kind} ID")))
    }
}

/// 拼接单条记录的资源路径
pub fn record_path(prefix: &str, id: &str, kind: &str) -> Result<String, CoreError> {
    Ok(format!("{prefix}/{}", check_record_id(id, kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_paths() {
        assert_eq!(
            record_path("/deleteproduct", "65f0c2ab", "product").unwrap(),
            "/deleteproduct/65f0c2ab"
        );
        for bad in ["", "  ", "undefined", "a/b", "x?y=1"] {
            let err = record_path("/ParticipantRegistration", bad, "participant").unwrap_err();
            assert_eq!(err.user_message(""), "Invalid participant ID");
        }
    }

    #[test]
    fn error_body_message_extraction() {
        let err = error_from_body(StatusCode::BAD_REQUEST, br#"{"message":"Email exists"}"#);
        assert_eq!(err.user_message("fallback"), "Email exists");

        let err = error_from_body(StatusCode::NOT_FOUND, br#"{"error":"No product"}"#);
        assert_eq!(err.user_message("fallback"), "No product");

        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = BackendConfig {
            base_url: "http://localhost:3002/api/contact/".to_string(),
            timeout_seconds: 5,
        };
        let client = BackendClient::new(&config, SessionStore::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3002/api/contact");
    }
}
