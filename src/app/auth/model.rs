//! 认证表单与请求体

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::{
    error::CoreError,
    form::{require, FormModel},
};

/// 登录表单
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// 未勾选时令牌只保存在内存里
    pub remember_me: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            remember_me: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应，令牌可能缺失
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

impl FormModel for LoginForm {
    type Payload = LoginRequest;

    fn to_payload(&self) -> Result<LoginRequest, CoreError> {
        require(&[(&self.email, "Email"), (&self.password, "Password")])?;
        let trimmed = Self {
            email: self.email.trim().to_string(),
            ..self.clone()
        };
        trimmed.validate()?;

        Ok(LoginRequest {
            email: trimmed.email,
            password: self.password.clone(),
        })
    }
}

/// 注册表单
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAccountForm {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub agree_to_terms: bool,
    /// 注册成功后置位，随后跳转登录页
    #[serde(skip_deserializing)]
    pub account_created: bool,
}

/// 后端要求 PascalCase 字段
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormModel for CreateAccountForm {
    type Payload = CreateAccountRequest;

    fn to_payload(&self) -> Result<CreateAccountRequest, CoreError> {
        require(&[
            (&self.first_name, "First name"),
            (&self.last_name, "Last name"),
            (&self.email, "Email"),
            (&self.password, "Password"),
        ])?;
        if self.password != self.confirm_password {
            return Err(CoreError::Validation("Passwords do not match".to_string()));
        }
        if !self.agree_to_terms {
            return Err(CoreError::Validation(
                "Please agree to terms and conditions".to_string(),
            ));
        }
        let email = self.email.trim().to_string();
        Self {
            email: email.clone(),
            ..self.clone()
        }
        .validate()?;

        Ok(CreateAccountRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

/// 找回密码表单，只在本地标记已提交
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(skip_deserializing)]
    pub submitted: bool,
}

impl FormModel for ForgotPasswordForm {
    type Payload = String;

    fn to_payload(&self) -> Result<String, CoreError> {
        require(&[(&self.email, "Email")])?;
        let email = self.email.trim().to_string();
        Self {
            email: email.clone(),
            submitted: false,
        }
        .validate()?;
        Ok(email)
    }
}
