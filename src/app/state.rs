//! 控制台共享状态

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    auth::{
        model::{CreateAccountForm, ForgotPasswordForm, LoginForm},
        service::AuthService,
    },
    navigation::{page::Page, router::Route},
    participant::{
        model::{Participant, ParticipantForm},
        service::ParticipantService,
    },
    product::{
        model::ProductForm,
        service::ProductService,
        view::{ProductListView, VariantSelections},
    },
};
use crate::core::{form::FormSlot, response::Notification};
use crate::infrastructure::{http_client::BackendClient, session_store::SessionStore};

/// 各页面的表单
#[derive(Debug, Default)]
pub struct Forms {
    pub login: FormSlot<LoginForm>,
    pub create_account: FormSlot<CreateAccountForm>,
    pub forgot_password: FormSlot<ForgotPasswordForm>,
    pub add_product: FormSlot<ProductForm>,
    pub edit_product: FormSlot<ProductForm>,
    pub register_participant: FormSlot<ParticipantForm>,
    pub edit_participant: FormSlot<ParticipantForm>,
}

#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    backend_url: String,
    pub auth: AuthService,
    pub products: ProductService,
    pub participants: ParticipantService,
    pub forms: Arc<Forms>,
    product_list: Arc<RwLock<ProductListView>>,
    variants: Arc<Mutex<VariantSelections>>,
    /// 最近一次拉取的参赛者列表
    participant_list: Arc<RwLock<Vec<Participant>>>,
    /// 跳转后在下一个页面展示的提示
    flash: Arc<Mutex<Option<Notification>>>,
}

impl AppState {
    pub fn new(session: SessionStore, client: BackendClient) -> Self {
        Self {
            session,
            backend_url: client.base_url().to_string(),
            auth: AuthService::new(client.clone()),
            products: ProductService::new(client.clone()),
            participants: ParticipantService::new(client),
            forms: Arc::new(Forms::default()),
            product_list: Arc::new(RwLock::new(ProductListView::default())),
            variants: Arc::new(Mutex::new(VariantSelections::default())),
            participant_list: Arc::new(RwLock::new(Vec::new())),
            flash: Arc::new(Mutex::new(None)),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn product_list(&self) -> RwLockReadGuard<'_, ProductListView> {
        self.product_list
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn product_list_mut(&self) -> RwLockWriteGuard<'_, ProductListView> {
        self.product_list
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn variants(&self) -> MutexGuard<'_, VariantSelections> {
        self.variants
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cached_participants(&self) -> Vec<Participant> {
        self.participant_list
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn cache_participants(&self, participants: &[Participant]) {
        *self
            .participant_list
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = participants.to_vec();
    }

    fn flash_slot(&self) -> MutexGuard<'_, Option<Notification>> {
        self.flash
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn flash(&self, notification: Notification) {
        *self.flash_slot() = Some(notification);
    }

    /// 构建页面，带上跳转前留下的提示
    pub fn page<C: Serialize>(&self, route: Route, content: C) -> Page<C> {
        let page = Page::new(route, content);
        match self.flash_slot().take() {
            Some(notification) => page.notify(notification),
            None => page,
        }
    }

    /// 退出登录时丢弃所有页面状态
    pub fn reset_views(&self) {
        self.forms.login.reset();
        self.forms.create_account.reset();
        self.forms.forgot_password.reset();
        self.forms.add_product.reset();
        self.forms.edit_product.reset();
        self.forms.register_participant.reset();
        self.forms.edit_participant.reset();
        self.product_list_mut().clear();
        self.variants().clear();
        self.cache_participants(&[]);
    }
}
