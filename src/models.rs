use std::fmt;
use std::path::{Path, PathBuf};

use llmapi::{LLMMessage, LLMMessageType};

use crate::constants::CAPTION_EXTENSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling caption file: same stem, `.txt` extension.
    pub fn caption_path(&self) -> PathBuf {
        self.path.with_extension(CAPTION_EXTENSION)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub image_base64: String,
    pub mime_type: String,
    pub prompt: String,
}

impl CaptionRequest {
    pub fn into_messages(self) -> Vec<LLMMessage> {
        vec![LLMMessage::new(
            None,
            "user",
            vec![
                LLMMessageType::text(self.prompt),
                LLMMessageType::image_b64(self.image_base64, self.mime_type),
            ],
        )]
    }
}

/// Caption text that always opens with `a photo of {trigger}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// The prefix check ignores case; an inserted prefix keeps the trigger's exact case.
    pub fn from_response(raw: &str, trigger: &str) -> Self {
        let caption = raw.trim();
        let required = format!("a photo of {}", trigger.to_lowercase());
        if caption.to_lowercase().starts_with(&required) {
            Caption(caption.to_string())
        } else {
            Caption(format!("a photo of {trigger}, {caption}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    Captioned(Caption),
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub captioned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &CaptionOutcome) {
        match outcome {
            CaptionOutcome::Captioned(_) => self.captioned += 1,
            CaptionOutcome::Skipped => self.skipped += 1,
            CaptionOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Captioned: {}, Skipped: {}, Failed: {}",
            self.captioned, self.skipped, self.failed
        )
    }
}
