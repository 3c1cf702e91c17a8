//! 参赛者业务服务

use tracing::info;

use super::model::{Participant, ParticipantPayload};
use crate::core::error::CoreError;
use crate::infrastructure::http_client::{record_path, BackendClient};

const COLLECTION: &str = "/ParticipantRegistration";
const KIND: &str = "participant";

#[derive(Clone)]
pub struct ParticipantService {
    client: BackendClient,
}

impl ParticipantService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Participant>, CoreError> {
        let participants: Option<Vec<Participant>> = self.client.get(COLLECTION).await?;
        Ok(participants.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<Participant, CoreError> {
        let path = record_path(COLLECTION, id, KIND)?;
        let participant: Option<Participant> = self.client.get(&path).await?;
        participant.ok_or_else(|| CoreError::NotFound(format!("participant {id}")))
    }

    pub async fn register(&self, payload: &ParticipantPayload) -> Result<(), CoreError> {
        let _: serde_json::Value = self.client.post(COLLECTION, payload).await?;
        info!("参赛者已报名: {}", payload.full_name);
        Ok(())
    }

    pub async fn update(&self, id: &str, payload: &ParticipantPayload) -> Result<(), CoreError> {
        let path = record_path(COLLECTION, id, KIND)?;
        let _: serde_json::Value = self.client.put(&path, payload).await?;
        info!("参赛者已更新: {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let path = record_path(COLLECTION, id, KIND)?;
        self.client.delete(&path).await?;
        info!("参赛者已删除: {}", id);
        Ok(())
    }
}
