use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use super::models::FeedbackRequest;

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("could not write feedback file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode feedback: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persist one submission as its own timestamp-named file under `dir`.
/// Files are write-once; nothing updates or deletes them.
pub fn save(dir: &Path, feedback: &FeedbackRequest) -> Result<PathBuf, FeedbackError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("feedback_{}.json", Utc::now().timestamp_micros()));
    let json = serde_json::to_vec_pretty(feedback)?;
    fs::write(&path, json)?;
    debug!(path = %path.display(), "feedback saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn saves_one_file_per_submission() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("feedback");
        let request = FeedbackRequest {
            conversation: vec![serde_json::json!({ "text": "Bonjour", "sender": "user" })],
            rating: true,
        };

        let path = save(&target, &request).unwrap();

        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("feedback_") && name.ends_with(".json"));

        let stored: FeedbackRequest =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(stored.rating);
        assert_eq!(stored.conversation.len(), 1);
        assert_eq!(stored.conversation[0]["sender"], "user");
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("deeply").join("nested");
        let request = FeedbackRequest {
            conversation: Vec::new(),
            rating: false,
        };

        let path = save(&target, &request).unwrap();
        assert!(path.exists());
    }
}
