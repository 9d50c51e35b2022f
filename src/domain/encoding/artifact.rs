//! Encoded artifact value object

/// Final output of a recording session: container bytes and their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    data: Vec<u8>,
    mime_type: String,
}

impl EncodedArtifact {
    /// Create an artifact from raw bytes
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Get the encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the encoded bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the bytes as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_accessors() {
        let artifact = EncodedArtifact::new(vec![1, 2, 3], "audio/wav");
        assert_eq!(artifact.data(), &[1, 2, 3]);
        assert_eq!(artifact.mime_type(), "audio/wav");
        assert_eq!(artifact.size_bytes(), 3);
    }

    #[test]
    fn human_readable_size() {
        assert_eq!(EncodedArtifact::new(vec![0; 500], "x").human_readable_size(), "500 B");
        assert_eq!(EncodedArtifact::new(vec![0; 2048], "x").human_readable_size(), "2.0 KB");
        assert_eq!(
            EncodedArtifact::new(vec![0; 2 * 1024 * 1024], "x").human_readable_size(),
            "2.0 MB"
        );
    }

    #[test]
    fn base64_decodes_back() {
        use base64::Engine;
        let artifact = EncodedArtifact::new(vec![82, 73, 70, 70], "audio/wav");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(artifact.to_base64())
            .unwrap();
        assert_eq!(decoded, b"RIFF");
    }
}
