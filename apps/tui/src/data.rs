// Fetches the registry documents over HTTP or from a local export directory.

use std::path::PathBuf;

use color_eyre::Result;
use tracing::debug;
use wash_registry::{BoundarySchema, DocumentKind, DocumentLoad, Endpoints};

#[derive(Debug, Clone)]
pub enum DataSource {
    Http {
        client: reqwest::Client,
        endpoints: Endpoints,
    },
    Directory(PathBuf),
}

impl DataSource {
    /// `http(s)://` locations are fetched, anything else is read as a directory.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http {
                client: reqwest::Client::new(),
                endpoints: Endpoints::new(location),
            }
        } else {
            Self::Directory(PathBuf::from(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http { endpoints, .. } => endpoints.base().to_string(),
            Self::Directory(dir) => dir.display().to_string(),
        }
    }

    async fn read(&self, kind: DocumentKind) -> Result<String> {
        match self {
            Self::Http { client, endpoints } => {
                let url = endpoints.url(kind);
                debug!(%url, "fetching document");
                let body = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Ok(body)
            }
            Self::Directory(dir) => {
                let path = dir.join(kind.path());
                debug!(path = %path.display(), "reading document");
                Ok(tokio::fs::read_to_string(path).await?)
            }
        }
    }

    /// Fetch and parse one document. Transport and parse failures both come back as `Failed`.
    pub async fn fetch(&self, kind: DocumentKind, schema: &BoundarySchema) -> DocumentLoad {
        match self.read(kind).await {
            Ok(body) => kind.parse(&body, schema),
            Err(error) => DocumentLoad::failed(kind, error),
        }
    }

    /// All four documents, concurrently.
    pub async fn fetch_all(&self, schema: &BoundarySchema) -> [DocumentLoad; 4] {
        let (schools, facilities, indicators, boundaries) = tokio::join!(
            self.fetch(DocumentKind::Schools, schema),
            self.fetch(DocumentKind::Facilities, schema),
            self.fetch(DocumentKind::Indicators, schema),
            self.fetch(DocumentKind::Boundaries, schema),
        );
        [schools, facilities, indicators, boundaries]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wash_registry::Dataset;

    async fn export_dir(name: &str) -> std::io::Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("wash-registry-{name}-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("api/source")).await?;
        tokio::fs::write(
            dir.join("api/dpi.json"),
            r#"[{ "id": "BH-2024-001", "type": "Borehole",
                  "functionality": "Functioning", "jmpStatus": "Basic Service" }]"#,
        )
        .await?;
        tokio::fs::write(dir.join("api/schools.json"), r#"{ "schools": [] }"#).await?;
        Ok(dir)
    }

    #[test]
    fn location_picks_the_transport() {
        assert!(matches!(
            DataSource::from_location("https://registry.example.org"),
            DataSource::Http { .. }
        ));
        assert!(matches!(
            DataSource::from_location("./export"),
            DataSource::Directory(_)
        ));
    }

    #[tokio::test]
    async fn missing_documents_fail_without_touching_the_rest() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = export_dir("partial").await?;
        let source = DataSource::Directory(dir.clone());

        let mut dataset = Dataset::default();
        let applied: Vec<bool> = source
            .fetch_all(&BoundarySchema::default())
            .await
            .into_iter()
            .map(|load| dataset.apply(load))
            .collect();

        assert_eq!(applied, [true, true, false, false]);
        assert_eq!(dataset.facilities.len(), 1);
        assert!(dataset.boundaries.is_empty());

        tokio::fs::remove_dir_all(dir).await?;
        Ok(())
    }
}
