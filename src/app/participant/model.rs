//! 参赛者数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

use crate::core::{
    error::CoreError,
    form::{require, FormModel},
};

/// 性别，线上格式为 0/1/2
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GenderRepr", into = "u8")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenderRepr {
    Code(i64),
    Text(String),
}

impl TryFrom<i64> for Gender {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Gender::Male),
            1 => Ok(Gender::Female),
            2 => Ok(Gender::Other),
            other => Err(format!("unknown gender code {other}")),
        }
    }
}

impl TryFrom<GenderRepr> for Gender {
    type Error = String;

    fn try_from(repr: GenderRepr) -> Result<Self, Self::Error> {
        match repr {
            GenderRepr::Code(code) => Gender::try_from(code),
            GenderRepr::Text(text) => {
                let text = text.trim();
                match text.to_ascii_lowercase().as_str() {
                    "male" => Ok(Gender::Male),
                    "female" => Ok(Gender::Female),
                    "other" => Ok(Gender::Other),
                    _ => text
                        .parse::<i64>()
                        .map_err(|_| format!("unknown gender {text:?}"))
                        .and_then(Gender::try_from),
                }
            }
        }
    }
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> u8 {
        match gender {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
        }
    }
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenderOption {
    pub label: &'static str,
    pub value: u8,
}

pub fn gender_options() -> Vec<GenderOption> {
    [Gender::Male, Gender::Female, Gender::Other]
        .into_iter()
        .map(|g| GenderOption {
            label: g.label(),
            value: g.into(),
        })
        .collect()
}

/// 后端返回的参赛者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Gender,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default, deserialize_with = "date_prefix")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(rename = "instagramID", default)]
    pub instagram_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// 列表里的脏数据不应让整页失败
fn lenient_gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Gender, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<Gender>(v).ok())
        .unwrap_or_default())
}

/// 只取前 10 个字符（YYYY-MM-DD）
fn date_prefix<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }))
}

/// 出生日期按 UTC 零点发送
fn date_on_wire<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
}

/// 报名/编辑表单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticipantForm {
    pub full_name: String,
    pub gender: Gender,
    pub blood_group: String,
    pub license_number: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    #[serde(rename = "instagramID")]
    pub instagram_id: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Participant> for ParticipantForm {
    fn from(participant: &Participant) -> Self {
        Self {
            full_name: participant.full_name.clone(),
            gender: participant.gender,
            blood_group: participant.blood_group.clone(),
            license_number: participant.license_number.clone(),
            date_of_birth: participant
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            instagram_id: participant.instagram_id.clone(),
            address: participant.address.clone(),
            email: participant.email.clone(),
            phone_number: participant.phone_number.clone(),
        }
    }
}

/// 提交给后端的参赛者
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPayload {
    pub full_name: String,
    pub gender: Gender,
    pub blood_group: String,
    pub license_number: String,
    #[serde(serialize_with = "date_on_wire")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "instagramID")]
    pub instagram_id: String,
    pub address: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone_number: String,
}

impl ParticipantForm {
    fn checked_payload(&self, today: NaiveDate) -> Result<ParticipantPayload, CoreError> {
        require(&[
            (&self.full_name, "Full name"),
            (&self.blood_group, "Blood group"),
            (&self.license_number, "License number"),
            (&self.date_of_birth, "Date of birth"),
            (&self.address, "Address"),
            (&self.email, "Email"),
            (&self.phone_number, "Phone number"),
        ])?;

        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| {
                CoreError::Validation("Date of birth must be a valid date".to_string())
            })?;
        if date_of_birth > today {
            return Err(CoreError::Validation(
                "Date of birth cannot be in the future".to_string(),
            ));
        }

        let payload = ParticipantPayload {
            full_name: self.full_name.trim().to_string(),
            gender: self.gender,
            blood_group: self.blood_group.trim().to_string(),
            license_number: self.license_number.trim().to_string(),
            date_of_birth,
            instagram_id: self.instagram_id.trim().to_string(),
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl FormModel for ParticipantForm {
    type Payload = ParticipantPayload;

    fn to_payload(&self) -> Result<ParticipantPayload, CoreError> {
        self.checked_payload(chrono::Utc::now().date_naive())
    }
}
