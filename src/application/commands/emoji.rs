//! `/emoji` - fetch a random picture and send it as an image

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::errors::{BotError, CommandError, ServiceError};
use crate::domain::entities::{Command, User};
use crate::domain::traits::{ChatGateway, PictureService};

pub const SENT: &str = "successful!";
pub const FAILED: &str = "Failed to fetch a picture, try again later.";

pub struct RandomPictureCommand {
    pictures: Arc<dyn PictureService>,
    gateway: Arc<dyn ChatGateway>,
    scratch_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum PictureError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("descriptor has no image url")]
    NoUrl,
    #[error("could not write {0}: {1}")]
    Write(PathBuf, std::io::Error),
    #[error(transparent)]
    Gateway(#[from] BotError),
}

/// Last path segment of the url, without query string
fn file_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

impl RandomPictureCommand {
    pub fn new(pictures: Arc<dyn PictureService>, gateway: Arc<dyn ChatGateway>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            pictures,
            gateway,
            scratch_dir: scratch_dir.into(),
        }
    }

    async fn fetch_and_send(&self, conversation_id: &str) -> Result<PathBuf, PictureError> {
        let descriptor = self.pictures.random_descriptor().await?;
        let url = descriptor
            .get("text")
            .and_then(serde_json::Value::as_str)
            .ok_or(PictureError::NoUrl)?;

        let bytes = self.pictures.download(url).await?;
        let name = file_name(url).unwrap_or("picture");
        let path = self.scratch_dir.join(name);
        write_file(&path, &bytes).await?;

        self.gateway.send_image(conversation_id, &path).await?;
        Ok(path)
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PictureError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PictureError::Write(parent.to_path_buf(), e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| PictureError::Write(path.to_path_buf(), e))
}

#[async_trait]
impl Command for RandomPictureCommand {
    fn name(&self) -> &str {
        "/emoji"
    }

    fn description(&self) -> &str {
        "Send a random picture"
    }

    /// The image always goes to the sender's direct chat, even for group commands.
    /// Never fails: problems are logged and reported in the reply text.
    async fn execute(&self, user: &User, _params: &[String]) -> Result<String, CommandError> {
        match self.fetch_and_send(&user.id).await {
            Ok(path) => {
                tracing::info!("Sent picture {} to {}", path.display(), user);
                Ok(SENT.to_string())
            }
            Err(e) => {
                tracing::warn!("Random picture for {} failed: {}", user, e);
                Ok(FAILED.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedPictures, RecordingGateway};
    use serde_json::json;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name("http://img.example.com/a/b/cat.gif"), Some("cat.gif"));
        assert_eq!(file_name("http://img.example.com/cat.png?size=2"), Some("cat.png"));
        assert_eq!(file_name("http://img.example.com/"), None);
    }

    #[tokio::test]
    async fn test_downloads_and_sends_image() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(RecordingGateway::default());
        let pictures = Arc::new(CannedPictures {
            descriptor: Ok(json!({"code": 200, "text": "http://img.example.com/e/dog.gif"})),
            bytes: Ok(b"GIF89a".to_vec()),
        });
        let cmd = RandomPictureCommand::new(pictures, gateway.clone(), dir.path());

        let reply = cmd.execute(&User::new("wxid_a"), &["/emoji".to_string()]).await.unwrap();

        assert_eq!(reply, SENT);
        let expected = dir.path().join("dog.gif");
        assert_eq!(std::fs::read(&expected).unwrap(), b"GIF89a");
        assert_eq!(gateway.images(), vec![("wxid_a".to_string(), expected)]);
    }

    #[tokio::test]
    async fn test_download_failure_still_returns_text() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(RecordingGateway::default());
        let pictures = Arc::new(CannedPictures {
            descriptor: Ok(json!({"text": "http://img.example.com/e/dog.gif"})),
            bytes: Err("connection reset".to_string()),
        });
        let cmd = RandomPictureCommand::new(pictures, gateway.clone(), dir.path());

        let reply = cmd.execute(&User::new("wxid_a"), &[]).await.unwrap();

        assert_eq!(reply, FAILED);
        assert!(gateway.images().is_empty());
    }

    #[tokio::test]
    async fn test_descriptor_without_url() {
        let dir = tempfile::tempdir().unwrap();
        let pictures = Arc::new(CannedPictures {
            descriptor: Ok(json!({"code": 500})),
            bytes: Ok(Vec::new()),
        });
        let cmd = RandomPictureCommand::new(pictures, Arc::new(RecordingGateway::default()), dir.path());

        assert_eq!(cmd.execute(&User::new("u"), &[]).await.unwrap(), FAILED);
    }
}
