use axum::extract::Multipart;

use crate::errors::AppError;

/// A text file received through a multipart form.
#[derive(Debug)]
pub struct TextUpload {
    pub filename: String,
    pub content: String,
}

/// Reads the multipart field named `file`, requiring the given extension and UTF-8 content.
pub async fn read_text_upload(
    mut multipart: Multipart,
    extension: &str,
) -> Result<TextUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.to_lowercase().ends_with(&format!(".{extension}")) {
            return Err(AppError::Validation(format!(
                "Only .{extension} files are allowed"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let content = String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("Uploaded file must be UTF-8 text".to_string()))?;

        return Ok(TextUpload { filename, content });
    }

    Err(AppError::Validation(
        "Missing multipart field 'file'".to_string(),
    ))
}
