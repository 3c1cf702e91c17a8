//! 认证页面处理器

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::{info, warn};

use super::model::{CreateAccountForm, ForgotPasswordForm, LoginForm};
use crate::app::{
    navigation::{page::Page, router::Route},
    state::AppState,
};
use crate::core::{form::FormState, response::Notification};

const LOGIN_FAILED: &str = "Failed to log in. Please try again.";
const CREATE_ACCOUNT_FAILED: &str = "Failed to create account. Please try again.";

pub async fn login_page(State(state): State<AppState>) -> Page<FormState<LoginForm>> {
    state.page(Route::Login, state.forms.login.snapshot())
}

pub async fn login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Response {
    let slot = &state.forms.login;
    let Some(_ticket) = slot.begin() else {
        return Page::busy(Route::Login, slot.snapshot()).into_response();
    };

    let remember_me = form.remember_me;
    let request = match slot.validate(form) {
        Ok(request) => request,
        Err(err) => {
            return Page::failed(Route::Login, slot.snapshot(), &err, LOGIN_FAILED).into_response()
        }
    };

    let outcome = match state.auth.login(&request).await {
        Ok(token) => state.session.sign_in(&request.email, token, remember_me),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => {
            info!("已登录: {}", request.email);
            slot.reset();
            Redirect::to(&Route::Dashboard.path()).into_response()
        }
        Err(err) => {
            warn!("登录失败: {} - {}", request.email, err);
            slot.fail(err.user_message(LOGIN_FAILED));
            Page::failed(Route::Login, slot.snapshot(), &err, LOGIN_FAILED).into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    if let Err(err) = state.session.sign_out() {
        warn!("清除会话失败: {}", err);
    }
    state.reset_views();
    info!("已退出登录");
    Redirect::to(&Route::Login.path()).into_response()
}

pub async fn create_account_page(
    State(state): State<AppState>,
) -> Page<FormState<CreateAccountForm>> {
    state.page(Route::CreateAccount, state.forms.create_account.snapshot())
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(form): Json<CreateAccountForm>,
) -> Response {
    let slot = &state.forms.create_account;
    let Some(_ticket) = slot.begin() else {
        return Page::busy(Route::CreateAccount, slot.snapshot()).into_response();
    };

    let request = match slot.validate(form) {
        Ok(request) => request,
        Err(err) => {
            return Page::failed(
                Route::CreateAccount,
                slot.snapshot(),
                &err,
                CREATE_ACCOUNT_FAILED,
            )
            .into_response()
        }
    };

    match state.auth.create_account(&request).await {
        Ok(()) => {
            slot.reset();
            slot.update(|form| form.account_created = true);
            state.flash(Notification::success("Account created. Please sign in."));
            Page::new(Route::CreateAccount, slot.snapshot())
                .notify(Notification::success("Account created successfully"))
                .into_response()
        }
        Err(err) => {
            warn!("注册失败: {} - {}", request.email, err);
            // 后端的具体原因不展示
            slot.fail(CREATE_ACCOUNT_FAILED);
            Page::new(Route::CreateAccount, slot.snapshot())
                .with_status(err.status_code())
                .notify(Notification::error(CREATE_ACCOUNT_FAILED))
                .into_response()
        }
    }
}

pub async fn forgot_password_page(
    State(state): State<AppState>,
) -> Page<FormState<ForgotPasswordForm>> {
    state.page(Route::ForgotPassword, state.forms.forgot_password.snapshot())
}

/// 只在本地标记为已提交，不发请求
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> Response {
    let slot = &state.forms.forgot_password;
    let Some(_ticket) = slot.begin() else {
        return Page::busy(Route::ForgotPassword, slot.snapshot()).into_response();
    };

    match slot.validate(form) {
        Ok(email) => {
            info!("找回密码已提交: {}", email);
            slot.update(|form| form.submitted = true);
            Page::new(Route::ForgotPassword, slot.snapshot())
                .notify(Notification::info(
                    "If an account exists for this email, reset instructions will follow",
                ))
                .into_response()
        }
        Err(err) => Page::failed(Route::ForgotPassword, slot.snapshot(), &err, "Invalid input")
            .into_response(),
    }
}
