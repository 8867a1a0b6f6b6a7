pub mod locale;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Output language of a document. Serialized as the short codes the
/// stored snapshots have always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "so")]
    Somali,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Arabic, Language::Somali, Language::English];

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Arabic)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Arabic
    }
}

/// Document category. Serialized as the full display strings so snapshots
/// stay compatible with the original storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Formal Report")]
    Formal,
    #[serde(rename = "Official Letter")]
    Letter,
    #[serde(rename = "Technical Document")]
    Technical,
    #[serde(rename = "Meeting Minutes")]
    Minutes,
    #[serde(rename = "Project Proposal")]
    Proposal,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::Formal,
        ReportType::Letter,
        ReportType::Technical,
        ReportType::Minutes,
        ReportType::Proposal,
    ];
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Formal
    }
}

/// A generated document with its metadata. Immutable once created except for
/// wholesale content replacement during refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub recipient: String,
    pub sender_name: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Epoch milliseconds; display value and newest-first sort key.
    pub created_at: i64,
}

impl Report {
    /// Builds a new report from a consumed config and generated content.
    /// Ids are time-based; uniqueness within a session is the only requirement.
    pub fn from_config(config: ReportConfig, content: String) -> Self {
        let now = Utc::now().timestamp_millis();
        Report {
            id: now.to_string(),
            title: config.topic,
            content,
            kind: config.kind,
            recipient: config.recipient,
            sender_name: config.sender_name,
            language: config.language,
            logo_url: config.logo_url,
            created_at: now,
        }
    }

    /// Six-digit reference code shown on the exported document header.
    pub fn reference_code(&self) -> String {
        let tail: String = self
            .id
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("SEC-{}", tail.to_uppercase())
    }
}

/// Draft-time input used to construct the next report. Transient: consumed
/// exactly once per generation; only the sender name outlives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub recipient: String,
    pub sender_name: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub topic: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ReportConfig {
        ReportConfig {
            kind: ReportType::Formal,
            recipient: "Finance Dept".to_string(),
            sender_name: "A. Noor".to_string(),
            language: Language::English,
            logo_url: None,
            topic: "Budget Review".to_string(),
            details: "Q3 figures".to_string(),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.language, Language::Arabic);
        assert_eq!(config.kind, ReportType::Formal);
        assert!(config.topic.is_empty());
    }

    #[test]
    fn test_config_deserialize_partial_body() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"recipient": "Ministry", "senderName": "Ali", "topic": "Roads"}"#,
        )
        .unwrap();
        assert_eq!(config.language, Language::Arabic);
        assert_eq!(config.kind, ReportType::Formal);
        assert_eq!(config.sender_name, "Ali");
    }

    #[test]
    fn test_report_from_config_carries_fields() {
        let report = Report::from_config(sample_config(), "Dear Sir...".to_string());
        assert_eq!(report.title, "Budget Review");
        assert_eq!(report.content, "Dear Sir...");
        assert_eq!(report.recipient, "Finance Dept");
        assert_eq!(report.sender_name, "A. Noor");
        assert_eq!(report.language, Language::English);
        assert_eq!(report.id, report.created_at.to_string());
    }

    #[test]
    fn test_report_json_field_names_match_snapshot_format() {
        let report = Report::from_config(sample_config(), "body".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "Formal Report");
        assert_eq!(json["language"], "en");
        assert_eq!(json["senderName"], "A. Noor");
        assert!(json.get("createdAt").is_some());
        // absent logo is omitted entirely, as the original snapshots had it
        assert!(json.get("logoUrl").is_none());
    }

    #[test]
    fn test_report_json_round_trip() {
        let mut report = Report::from_config(sample_config(), "body".to_string());
        report.logo_url = Some("data:image/png;base64,AAAA".to_string());
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_reference_code_uses_id_tail() {
        let mut report = Report::from_config(sample_config(), String::new());
        report.id = "1733112345678".to_string();
        assert_eq!(report.reference_code(), "SEC-345678");

        report.id = "42".to_string();
        assert_eq!(report.reference_code(), "SEC-42");
    }
}
