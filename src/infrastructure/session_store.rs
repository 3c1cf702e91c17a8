//! 会话存储
//!
//! 令牌持久化在本地 JSON 文件里，登录标记在启动时由已保存的令牌推导。
//! 退出登录会清空内存状态并删除文件。

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::core::error::CoreError;

#[derive(Debug, Clone, Default)]
struct SessionState {
    logged_in: bool,
    token: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    #[serde(default)]
    email: Option<String>,
    saved_at: String,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    path: Option<PathBuf>,
}

/// 过滤掉前端常见的占位值
fn usable_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t != "null" && t != "undefined")
}

impl SessionStore {
    /// 不落盘的会话（测试或一次性使用）
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            path: None,
        }
    }

    /// 打开持久化会话，文件损坏时当作未登录
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<PersistedSession>(&content) {
                Ok(saved) => {
                    let token = usable_token(Some(saved.token));
                    info!("已从 {} 恢复会话 (有令牌: {})", path.display(), token.is_some());
                    SessionState {
                        logged_in: token.is_some(),
                        token,
                        email: saved.email,
                    }
                }
                Err(e) => {
                    warn!("会话文件 {} 无法解析，忽略: {}", path.display(), e);
                    SessionState::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(CoreError::Session(format!("读取 {} 失败: {e}", path.display()))),
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(path),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().logged_in
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn email(&self) -> Option<String> {
        self.read().email.clone()
    }

    /// 登录成功
    ///
    /// `persist` 为 false 时令牌只保存在内存中（未勾选"记住我"）。
    pub fn sign_in(
        &self,
        email: &str,
        token: Option<String>,
        persist: bool,
    ) -> Result<(), CoreError> {
        let token = usable_token(token);

        match (&self.path, &token) {
            (Some(path), Some(token)) if persist => {
                let saved = PersistedSession {
                    token: token.clone(),
                    email: Some(email.to_string()),
                    saved_at: chrono::Utc::now().to_rfc3339(),
                };
                let content = serde_json::to_string_pretty(&saved)
                    .map_err(|e| CoreError::Session(e.to_string()))?;
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| CoreError::Session(e.to_string()))?;
                }
                fs::write(path, content).map_err(|e| CoreError::Session(e.to_string()))?;
            }
            // 不记住时清掉上一次留下的文件
            _ => self.remove_persisted()?,
        }

        let mut state = self.write();
        state.logged_in = true;
        state.token = token;
        state.email = Some(email.to_string());
        Ok(())
    }

    /// 退出登录并清除所有本地持久化数据
    pub fn sign_out(&self) -> Result<(), CoreError> {
        *self.write() = SessionState::default();
        self.remove_persisted()
    }

    fn remove_persisted(&self) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Session(format!(
                "删除 {} 失败: {e}",
                path.display()
            ))),
        }
    }
}
