//! Upload limits

use serde::Deserialize;

use super::error::ValidationError;

/// Upload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl UploadConfig {
    /// Inbound body limit: the file bound plus room for the other form fields.
    /// `max_file_bytes` itself is checked by the upload handler.
    pub fn body_limit(&self) -> usize {
        self.max_file_bytes.saturating_add(FORM_OVERHEAD_BYTES)
    }

    /// Validate upload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_file_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

fn default_max_file_bytes() -> usize {
    10 << 20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_is_ten_mebibytes() {
        assert_eq!(UploadConfig::default().max_file_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_body_limit_exceeds_file_limit() {
        let config = UploadConfig { max_file_bytes: 16 };
        assert!(config.body_limit() > 16);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = UploadConfig { max_file_bytes: 0 };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUploadLimit));
    }
}
