use std::path::PathBuf;

use thiserror::Error;

use crate::constants::API_KEY_ENV;

/// Conditions that stop the run before any image is captioned.
#[derive(Debug, Error)]
pub enum CaptionerError {
    #[error("{} environment variable not set", API_KEY_ENV)]
    MissingCredential,

    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("Unable to read folder '{}': {source}", .path.display())]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptionerError {
    /// Extra guidance printed under the error line, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            CaptionerError::MissingCredential => {
                Some(format!("Export it: export {API_KEY_ENV}=sk-..."))
            }
            _ => None,
        }
    }
}
