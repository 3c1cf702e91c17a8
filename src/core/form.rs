//! 表单状态容器
//!
//! 每个实体表单持有字段值、最近一次的校验错误和提交状态。
//! 所有校验都在提交时同步完成，失败时不会发出任何网络请求。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};

use serde::Serialize;

use super::error::CoreError;

/// 可提交的表单
pub trait FormModel: Clone + Default + Serialize {
    /// 校验通过后提交给后端的数据
    type Payload;

    /// 同步校验并把输入转换为提交数据
    fn to_payload(&self) -> Result<Self::Payload, CoreError>;
}

/// 单个表单的状态快照
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState<F> {
    pub values: F,
    pub error: Option<String>,
    pub submitting: bool,
}

/// 提交标记
///
/// 同一表单同时只允许一个提交在途，`SubmitTicket` 被 drop 时自动释放。
#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

pub struct SubmitTicket {
    in_flight: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn try_begin(&self) -> Option<SubmitTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// 控制台里一个表单的共享槽位
#[derive(Debug, Default)]
pub struct FormSlot<F> {
    state: Mutex<FormState<F>>,
    guard: SubmitGuard,
}

impl<F: FormModel> FormSlot<F> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FormState::default()),
            guard: SubmitGuard::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState<F>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> FormState<F> {
        let mut state = self.lock().clone();
        state.submitting = self.guard.is_submitting();
        state
    }

    pub fn begin(&self) -> Option<SubmitTicket> {
        self.guard.try_begin()
    }

    /// 记录用户输入，清掉上一次的错误
    pub fn record(&self, values: F) {
        let mut state = self.lock();
        state.values = values;
        state.error = None;
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.lock().error = Some(message.into());
    }

    /// 原地修改字段（例如上传图片后写入 data URL）
    pub fn update(&self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.lock().values);
    }

    /// 提交成功后回到空表单
    pub fn reset(&self) {
        let mut state = self.lock();
        state.values = F::default();
        state.error = None;
    }

    /// 记录输入并校验
    pub fn validate(&self, values: F) -> Result<F::Payload, CoreError> {
        let result = values.to_payload();
        self.record(values);
        if let Err(err) = &result {
            self.fail(err.user_message("Invalid input"));
        }
        result
    }
}

/// 必填字段检查，按给出的顺序报告缺失字段
pub fn require(fields: &[(&str, &str)]) -> Result<(), CoreError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, label)| format!("{label} is required"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(missing.join(", ")))
    }
}
