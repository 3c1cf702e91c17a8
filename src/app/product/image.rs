//! 商品图片：校验后编码为 base64 data URL

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::core::error::CoreError;

/// 单张图片上限 5 MB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> Result<String, CoreError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(CoreError::Validation(
            "Only image files can be uploaded".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(CoreError::Validation("Image file is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(
            "Image must be 5 MB or smaller".to_string(),
        ));
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
