//! 参赛者页面处理器

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use super::model::{gender_options, GenderOption, Participant, ParticipantForm};
use crate::app::{
    navigation::{page::Page, router::Route},
    state::AppState,
};
use crate::core::{
    error::CoreError,
    form::{FormSlot, FormState},
    response::Notification,
};
use crate::infrastructure::http_client::check_record_id;

const FETCH_FAILED: &str = "Failed to fetch participants";
const REGISTER_FAILED: &str = "Registration failed";
const UPDATE_FAILED: &str = "Update failed";
const DELETE_FAILED: &str = "Delete failed";

#[derive(Debug, Serialize)]
pub struct ParticipantListContent {
    pub participants: Vec<Participant>,
    pub total: usize,
}

impl ParticipantListContent {
    fn new(participants: Vec<Participant>) -> Self {
        Self {
            total: participants.len(),
            participants,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParticipantFormContent {
    pub id: Option<String>,
    pub form: FormState<ParticipantForm>,
    pub gender_options: Vec<GenderOption>,
}

impl ParticipantFormContent {
    fn new(id: Option<String>, slot: &FormSlot<ParticipantForm>) -> Self {
        Self {
            id,
            form: slot.snapshot(),
            gender_options: gender_options(),
        }
    }
}

/// 拉取列表并缓存；失败时保留上一次的缓存
async fn fetch_participants(state: &AppState) -> Result<Vec<Participant>, CoreError> {
    let participants = state.participants.list().await.map_err(|err| {
        warn!("加载参赛者失败: {}", err);
        err
    })?;
    state.cache_participants(&participants);
    Ok(participants)
}

/// 每次进入列表都重新拉取
pub async fn participant_list(State(state): State<AppState>) -> Page<ParticipantListContent> {
    match fetch_participants(&state).await {
        Ok(participants) => state.page(
            Route::ParticipantList,
            ParticipantListContent::new(participants),
        ),
        Err(err) => Page::failed(
            Route::ParticipantList,
            ParticipantListContent::new(state.cached_participants()),
            &err,
            FETCH_FAILED,
        ),
    }
}

fn cached_page(state: &AppState) -> Page<ParticipantListContent> {
    Page::new(
        Route::ParticipantList,
        ParticipantListContent::new(state.cached_participants()),
    )
}

/// 删除后重新拉取列表
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Page<ParticipantListContent> {
    if let Err(err) = check_record_id(&id, "participant") {
        return cached_page(&state)
            .with_status(err.status_code())
            .notify(Notification::warning(
                err.user_message("Invalid participant ID"),
            ));
    }

    if let Err(err) = state.participants.delete(&id).await {
        warn!("删除参赛者失败: {} - {}", id, err);
        return cached_page(&state)
            .with_status(err.status_code())
            .notify(err.notification(DELETE_FAILED));
    }

    match fetch_participants(&state).await {
        Ok(participants) => Page::new(
            Route::ParticipantList,
            ParticipantListContent::new(participants),
        )
        .notify(Notification::success("Deleted successfully")),
        Err(_) => {
            // 删除已生效，只从缓存里去掉这一条
            let mut participants = state.cached_participants();
            participants.retain(|p| p.id != id);
            state.cache_participants(&participants);
            Page::new(
                Route::ParticipantList,
                ParticipantListContent::new(participants),
            )
            .notify(Notification::warning(format!(
                "Deleted successfully. {FETCH_FAILED}"
            )))
        }
    }
}

pub async fn registration_page(State(state): State<AppState>) -> Page<ParticipantFormContent> {
    state.page(
        Route::ParticipantRegistration,
        ParticipantFormContent::new(None, &state.forms.register_participant),
    )
}

pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<ParticipantForm>,
) -> Page<ParticipantFormContent> {
    let slot = &state.forms.register_participant;
    let route = Route::ParticipantRegistration;
    let Some(_ticket) = slot.begin() else {
        return Page::busy(route, ParticipantFormContent::new(None, slot));
    };

    let result = match slot.validate(form) {
        Ok(payload) => state.participants.register(&payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            slot.reset();
            Page::new(route, ParticipantFormContent::new(None, slot))
                .notify(Notification::success("Participant registered successfully"))
        }
        Err(err) => {
            warn!("报名失败: {}", err);
            slot.fail(err.user_message(REGISTER_FAILED));
            Page::failed(
                route,
                ParticipantFormContent::new(None, slot),
                &err,
                REGISTER_FAILED,
            )
        }
    }
}

pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Page<ParticipantFormContent> {
    let slot = &state.forms.edit_participant;
    let route = Route::ParticipantEdit(id.clone());
    match state.participants.get(&id).await {
        Ok(participant) => {
            slot.record(ParticipantForm::from(&participant));
            state.page(route, ParticipantFormContent::new(Some(id), slot))
        }
        Err(err) => {
            warn!("加载参赛者失败: {} - {}", id, err);
            slot.reset();
            Page::failed(
                route,
                ParticipantFormContent::new(Some(id), slot),
                &err,
                "Load failed",
            )
        }
    }
}

/// 整条更新，成功后回到列表
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ParticipantForm>,
) -> Response {
    let slot = &state.forms.edit_participant;
    let route = Route::ParticipantEdit(id.clone());
    let Some(_ticket) = slot.begin() else {
        return Page::busy(route, ParticipantFormContent::new(Some(id), slot)).into_response();
    };

    let result = match slot.validate(form) {
        Ok(payload) => state.participants.update(&id, &payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            slot.reset();
            state.flash(Notification::success("Updated!"));
            Redirect::to(&Route::ParticipantList.path()).into_response()
        }
        Err(err) => {
            warn!("更新参赛者失败: {} - {}", id, err);
            slot.fail(err.user_message(UPDATE_FAILED));
            Page::failed(
                route,
                ParticipantFormContent::new(Some(id), slot),
                &err,
                UPDATE_FAILED,
            )
            .into_response()
        }
    }
}
