//! Requests, images and errors shared by every layout bridge

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::layout::Layout;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to an AI service or validating its output
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The API key environment variable is not set
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// A configuration value could not be parsed
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response
    #[error("API request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The service refused the request on content-safety grounds
    #[error("request rejected by content safety filter: {reason}")]
    SafetyRejected { reason: String },

    /// The response body is not the expected structure
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The returned layout uses a type outside the closed set
    #[error("unknown item type '{name}' in generated layout")]
    UnknownItemType { name: String },

    /// The returned layout repeats an id
    #[error("duplicate item id '{id}' in generated layout")]
    DuplicateId { id: String },

    /// The response carried no usable content
    #[error("empty response: {0}")]
    Empty(String),

    /// The operation's preconditions are not met
    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl BridgeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Self::Empty(msg.into())
    }

    /// One line suitable for an error toast
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey { .. } | Self::ConfigParse(_) | Self::HttpClientBuild(_) => {
                format!("The AI service is not configured ({})", self)
            }
            Self::Transport(_) => "Could not reach the AI service. Try again.".to_string(),
            Self::Status { status, .. } if *status == 429 => {
                "The AI service is busy. Try again in a moment.".to_string()
            }
            Self::Status { status, .. } => {
                format!("The AI service returned an error (status {})", status)
            }
            Self::SafetyRejected { .. } => {
                "The request was blocked by the content safety filter. Rephrase it and try again."
                    .to_string()
            }
            Self::Malformed(_) | Self::UnknownItemType { .. } | Self::DuplicateId { .. } => {
                format!("The AI returned an invalid layout: {}", self)
            }
            Self::Empty(_) => "The AI returned no result.".to_string(),
            Self::Precondition(msg) => msg.clone(),
        }
    }

    /// Transient failures worth offering a retry for
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// IMAGES
// =============================================================================

/// An uploaded image, already decoded from the host's file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: Option<String>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Read an image file, guessing the MIME type from its extension
    pub fn from_file(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| mime_for_extension(&e.to_ascii_lowercase()))
            .unwrap_or("application/octet-stream");
        let mut image = Self::new(bytes, mime);
        image.filename = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(image)
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }

    /// Decode a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime, payload) = rest.split_once(";base64,")?;
        let bytes = STANDARD.decode(payload.trim()).ok()?;
        Some(Self::new(bytes, mime))
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Input for a layout generation
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    /// Natural-language description of the event
    pub description: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Photo of the real venue to lay the plan over
    pub reference_photo: Option<ImageData>,
    /// Real-world size of the venue, e.g. "20m x 30m"
    pub venue_dimensions: Option<String>,
}

impl LayoutRequest {
    pub fn new(description: impl Into<String>, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            description: description.into(),
            canvas_width,
            canvas_height,
            reference_photo: None,
            venue_dimensions: None,
        }
    }

    pub fn with_photo(mut self, photo: ImageData) -> Self {
        self.reference_photo = Some(photo);
        self
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.venue_dimensions = Some(dimensions.into());
        self
    }
}

/// Input for a photorealistic preview of a layout inside a real venue
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub reference_photo: ImageData,
    pub layout: Layout,
    pub ambience: String,
}
