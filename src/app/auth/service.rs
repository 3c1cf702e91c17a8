//! 认证业务服务

use tracing::info;

use super::model::{CreateAccountRequest, LoginRequest, LoginResponse};
use crate::core::error::CoreError;
use crate::infrastructure::http_client::BackendClient;

#[derive(Clone)]
pub struct AuthService {
    client: BackendClient,
}

impl AuthService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// 登录，返回后端给出的令牌（可能没有）
    pub async fn login(&self, request: &LoginRequest) -> Result<Option<String>, CoreError> {
        let response: Option<LoginResponse> = self.client.post("/login", request).await?;
        let token = response.and_then(|r| r.token);
        info!("登录成功: {} (返回令牌: {})", request.email, token.is_some());
        Ok(token)
    }

    pub async fn create_account(&self, request: &CreateAccountRequest) -> Result<(), CoreError> {
        let _: serde_json::Value = self.client.post("/createaccount", request).await?;
        info!("账号已创建: {}", request.email);
        Ok(())
    }
}
