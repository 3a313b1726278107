// Terminal stand-in for a camera: decoded payloads arrive one per line on a feed file,
// typically a FIFO written by an external decoder such as `zbarcam --raw`.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wash_registry::{Camera, CameraError, FacingMode};

#[derive(Debug)]
pub struct FeedCamera {
    feed: Option<PathBuf>,
    reader: Option<JoinHandle<()>>,
    /// Receiving end for the current reader only; replaced on every start and stop.
    payloads: UnboundedReceiver<String>,
}

impl FeedCamera {
    pub fn new(feed: Option<PathBuf>) -> Self {
        let (_, payloads) = mpsc::unbounded_channel();
        Self {
            feed,
            reader: None,
            payloads,
        }
    }

    /// Swap in a new channel. Whatever still holds the old sender can no longer deliver.
    fn open_channel(&mut self) -> UnboundedSender<String> {
        let (sender, payloads) = mpsc::unbounded_channel();
        self.payloads = payloads;
        sender
    }

    pub fn feed(&self) -> Option<&PathBuf> {
        self.feed.as_ref()
    }

    /// Next decoded payload, if one is waiting. Never blocks.
    pub fn poll(&mut self) -> Option<String> {
        self.payloads.try_recv().ok()
    }

    /// Wait for the next decoded payload.
    pub async fn next_payload(&mut self) -> Option<String> {
        self.payloads.recv().await
    }
}

async fn read_feed(path: PathBuf, sender: UnboundedSender<String>) {
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(error) => {
            warn!(path = %path.display(), %error, "scan feed could not be opened");
            return;
        }
    };

    let mut lines = BufReader::new(file).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let payload = line.trim();
                if payload.is_empty() {
                    continue;
                }
                debug!(%payload, "scan feed payload");
                if sender.send(payload.to_string()).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "scan feed read failed");
                break;
            }
        }
    }
    debug!("scan feed closed");
}

impl Camera for FeedCamera {
    fn start(&mut self, facing: FacingMode) -> Result<(), CameraError> {
        self.stop();

        let Some(path) = self.feed.clone() else {
            return Err(CameraError::NotSupported);
        };
        if !path.exists() {
            return Err(CameraError::NotFound);
        }

        info!(path = %path.display(), camera = facing.label(), "reading scan feed");
        let sender = self.open_channel();
        self.reader = Some(tokio::spawn(read_feed(path, sender)));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
            debug!("scan feed reader stopped");
        }
        self.open_channel();
    }

    fn is_active(&self) -> bool {
        self.reader
            .as_ref()
            .is_some_and(|reader| !reader.is_finished())
    }
}

impl Drop for FeedCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn no_feed_means_no_camera() {
        let mut camera = FeedCamera::new(None);
        assert_eq!(
            camera.start(FacingMode::Environment),
            Err(CameraError::NotSupported)
        );
    }

    #[test]
    fn missing_feed_is_not_found() {
        let mut camera = FeedCamera::new(Some(PathBuf::from("/nonexistent/wash-scan-feed")));
        assert_eq!(camera.start(FacingMode::Any), Err(CameraError::NotFound));
        assert!(!camera.is_active());
    }

    #[tokio::test]
    async fn feed_lines_become_payloads() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("wash-scan-feed-{}", std::process::id()));
        tokio::fs::write(&path, "\n  BH-2024-001  \nHP-2023-014\n").await?;

        let mut camera = FeedCamera::new(Some(path.clone()));
        camera.start(FacingMode::Environment)?;

        let first = tokio::time::timeout(Duration::from_secs(2), camera.next_payload()).await?;
        assert_eq!(first.as_deref(), Some("BH-2024-001"));

        camera.stop();
        assert!(!camera.is_active());
        assert_eq!(camera.poll(), None);

        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    #[test]
    fn stopped_reader_cannot_deliver_late_payloads() {
        let mut camera = FeedCamera::new(None);
        let stale = camera.open_channel();

        camera.stop();

        assert!(stale.send("BH-2024-001".to_string()).is_err());
        assert_eq!(camera.poll(), None);
    }

    #[tokio::test]
    async fn reader_finishes_at_end_of_file() -> Result<(), Box<dyn std::error::Error>> {
        let path =
            std::env::temp_dir().join(format!("wash-scan-feed-eof-{}", std::process::id()));
        tokio::fs::write(&path, "BH-2024-001\n").await?;

        let mut camera = FeedCamera::new(Some(path.clone()));
        camera.start(FacingMode::Environment)?;
        tokio::time::timeout(Duration::from_secs(2), async {
            while camera.is_active() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await?;

        assert_eq!(camera.poll().as_deref(), Some("BH-2024-001"));
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
