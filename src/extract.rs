use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One candidate event as produced by the extraction service. Names are free
/// text; nothing here has been resolved to an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub championship_name: String,
    pub stage_name: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub city_name: String,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub member_names: Vec<String>,
}

#[derive(Debug)]
pub struct ExtractError(pub String);

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "extraction error: {}", self.0)
    }
}

impl std::error::Error for ExtractError {}

/// Turns unstructured prose into an ordered sequence of candidate records.
/// The natural-language extraction itself lives outside this crate.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<RawEventRecord>, ExtractError>;
}

/// Extractor for text that is already a JSON array of records — the shape the
/// external service hands back. Used by tests and embedders that run the
/// language-model step elsewhere.
pub struct JsonExtractor;

#[async_trait]
impl TextExtractor for JsonExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<RawEventRecord>, ExtractError> {
        serde_json::from_str(text).map_err(|e| ExtractError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_record_array() {
        let text = r#"[{
            "championship_name": "Copa Truck",
            "stage_name": "Etapa 3",
            "date": "2026-06-15",
            "city_name": "Cascavel",
            "state_code": "PR",
            "member_names": ["Ana Souza", "Bruno Lima"]
        }]"#;
        let records = JsonExtractor.extract(text).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].member_names.len(), 2);
    }

    #[tokio::test]
    async fn missing_optional_fields_tolerated() {
        let text = r#"[{
            "championship_name": "Copa Truck",
            "stage_name": "Etapa 1",
            "date": "2026-03-01",
            "city_name": "Goiânia"
        }]"#;
        let records = JsonExtractor.extract(text).await.unwrap();
        assert_eq!(records[0].state_code, None);
        assert!(records[0].member_names.is_empty());
    }

    #[tokio::test]
    async fn malformed_text_is_an_error() {
        assert!(JsonExtractor.extract("not json").await.is_err());
    }
}
