use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(ApiError::BadRequest("Only image files are allowed".to_string()));
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    Ok(())
}

/// Object-key-safe rendition of a client-supplied filename.
pub(crate) fn sanitized_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    #[test]
    fn accepts_allowed_image() {
        assert!(validate_image_upload("cover.png", "image/png", &allowed()).is_ok());
    }

    #[test]
    fn rejects_non_image_content_type() {
        let err = validate_image_upload("cover.png", "application/pdf", &allowed());
        assert!(matches!(err, Err(ApiError::BadRequest(message)) if message.contains("image")));
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = validate_image_upload("cover.bmp", "image/bmp", &allowed());
        assert!(matches!(err, Err(ApiError::BadRequest(message)) if message.contains("bmp")));
    }

    #[test]
    fn sanitized_filename_replaces_unsafe_chars() {
        assert_eq!(sanitized_filename("my cover (1).png"), "my_cover__1_.png");
        assert_eq!(sanitized_filename("simple-name.jpg"), "simple-name.jpg");
    }
}
