//! Form input helpers.
//!
//! Multipart bodies are read field by field. File parts are accumulated chunk
//! by chunk and abandoned as soon as they pass the upload bound, so an
//! oversized file never reaches the model API.

use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use super::error::PageError;
use crate::domain::backend::UploadedFile;

/// Text fields and the (single) file part of a multipart form.
#[derive(Debug, Default)]
pub struct MultipartInput {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl MultipartInput {
    /// Trimmed value of a text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        non_blank(self.fields.get(name).map(String::as_str))
    }

    /// Free-text field as submitted; blank counts as absent.
    pub fn text_owned(&self, name: &str) -> Option<String> {
        as_typed(self.fields.get(name).map(String::as_str)).map(str::to_string)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// The uploaded file, or a `BadRequest` when none was chosen.
    pub fn take_file(&mut self) -> Result<UploadedFile, PageError> {
        self.file
            .take()
            .ok_or_else(|| PageError::bad_request("Please choose a file to upload"))
    }
}

/// Reads a multipart form, keeping the part named `file_field` as the file.
///
/// A file larger than `max_file_bytes` fails with `PayloadTooLarge`.
pub async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
    max_file_bytes: usize,
) -> Result<MultipartInput, PageError> {
    let mut input = MultipartInput::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| multipart_error(e, max_file_bytes))?
            {
                if bytes.len() + chunk.len() > max_file_bytes {
                    tracing::info!(limit = max_file_bytes, "Rejected oversized upload");
                    return Err(PageError::PayloadTooLarge {
                        limit: max_file_bytes,
                    });
                }
                bytes.extend_from_slice(&chunk);
            }

            // Browsers send an empty, unnamed part when no file was chosen
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            let mut file = UploadedFile::new(file_name, bytes);
            if let Some(content_type) = content_type {
                file = file.with_content_type(content_type);
            }
            input.file = Some(file);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| multipart_error(e, max_file_bytes))?;
            input.fields.insert(name, value);
        }
    }

    Ok(input)
}

fn multipart_error(err: MultipartError, max_file_bytes: usize) -> PageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PageError::PayloadTooLarge {
            limit: max_file_bytes,
        }
    } else {
        PageError::bad_request(format!("Malformed form data: {}", err.body_text()))
    }
}

/// Trimmed, non-empty value.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Non-empty value with its surrounding whitespace kept.
pub fn as_typed(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trimmed value of a required field, or `BadRequest` naming it.
pub fn required<'a>(value: Option<&'a str>, label: &str) -> Result<&'a str, PageError> {
    non_blank(value).ok_or_else(|| PageError::bad_request(format!("{} is required", label)))
}
