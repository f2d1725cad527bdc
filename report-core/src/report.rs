//! Inspection report data model.
//!
//! Reports are produced by an LLM upstream, so every leaf is optional and
//! scalar leaves are accepted as strings or numbers alike. A payload is
//! classified into exactly one [`ReportSource`] by the presence of fields.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Structured AI-generated inspection output for one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accident_history: Option<AccidentHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks_and_advice: Option<RisksAndAdvice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<PredictedPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_prediction: Option<MaintenancePrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<RiskScore>,
}

impl Report {
    /// `true` when no section at all is present.
    pub fn is_empty(&self) -> bool {
        self.basic_info.is_none()
            && self.accident_history.is_none()
            && self.risks_and_advice.is_none()
            && self.predicted_price.is_none()
            && self.maintenance_prediction.is_none()
            && self.risk_score.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentHistory {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "loose_list", skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RisksAndAdvice {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<RiskItem>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub price_guidance: Option<String>,
}

/// One itemised current risk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedPrice {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePrediction {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub major_items: Vec<MaintenanceItem>,
    #[serde(default, deserialize_with = "loose_list", skip_serializing_if = "Vec::is_empty")]
    pub common_issues: Vec<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub overall_advice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceItem {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Coarse classification of a 0..=100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    /// 80 and above.
    Good,
    /// 60..80.
    Caution,
    /// Below 60.
    Danger,
    /// Score missing or not numeric.
    Unknown,
}

impl RiskScore {
    /// Classifies the score by its leading integer (`"85점"` → 85).
    pub fn band(&self) -> RiskBand {
        match self.score.as_deref().and_then(leading_integer) {
            Some(n) if n >= 80 => RiskBand::Good,
            Some(n) if n >= 60 => RiskBand::Caution,
            Some(_) => RiskBand::Danger,
            None => RiskBand::Unknown,
        }
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Report-shaped value signalling that upstream generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(deserialize_with = "required_loose_text")]
    pub error: String,
    #[serde(
        default,
        alias = "raw_text",
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_text: Option<String>,
}

/// Exactly one of the three things a view can be asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSource {
    /// Nothing usable was supplied.
    Missing,
    /// Upstream generation failed.
    Failed(ErrorReport),
    /// A well-formed report; may still have no sections.
    Analysed(Arc<Report>),
}

impl ReportSource {
    /// Classifies an arbitrary payload handed over by the upload collaborator.
    pub fn from_value(value: Option<Value>) -> Self {
        let Some(value) = value else {
            return ReportSource::Missing;
        };
        let Value::Object(map) = &value else {
            return ReportSource::Missing;
        };

        let has_error = match map.get("error") {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        };

        if has_error {
            return match serde_json::from_value::<ErrorReport>(value) {
                Ok(report) => ReportSource::Failed(report),
                Err(e) => {
                    warn!(error = %e, "error report could not be decoded");
                    ReportSource::Missing
                }
            };
        }

        match serde_json::from_value::<Report>(value) {
            Ok(report) => ReportSource::Analysed(Arc::new(report)),
            Err(e) => {
                warn!(error = %e, "report payload could not be decoded; showing no data");
                ReportSource::Missing
            }
        }
    }

    /// Parses and classifies a JSON document; unparsable input is [`ReportSource::Missing`].
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(Some(v)),
            Err(e) => {
                warn!(error = %e, "report payload is not valid JSON");
                ReportSource::Missing
            }
        }
    }

    /// The report questions may be asked about: analysed and non-empty.
    pub fn askable(&self) -> Option<&Arc<Report>> {
        match self {
            ReportSource::Analysed(report) if !report.is_empty() => Some(report),
            _ => None,
        }
    }
}

impl From<Report> for ReportSource {
    fn from(report: Report) -> Self {
        ReportSource::Analysed(Arc::new(report))
    }
}

impl From<ErrorReport> for ReportSource {
    fn from(report: ErrorReport) -> Self {
        ReportSource::Failed(report)
    }
}

/* ------------------------------------------------------------------------- */
/* Lenient leaf decoding                                                     */
/* ------------------------------------------------------------------------- */

fn scalar_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn loose_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(d)?.and_then(scalar_text))
}

fn required_loose_text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(d)?).unwrap_or_default())
}

fn loose_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_missing_and_non_objects() {
        assert_eq!(ReportSource::from_value(None), ReportSource::Missing);
        assert_eq!(ReportSource::from_value(Some(json!(null))), ReportSource::Missing);
        assert_eq!(ReportSource::from_value(Some(json!("text"))), ReportSource::Missing);
        assert_eq!(ReportSource::from_value(Some(json!([1, 2]))), ReportSource::Missing);
        assert_eq!(ReportSource::from_json_str("{not json"), ReportSource::Missing);
    }

    #[test]
    fn error_payload_wins_over_sections() {
        let src = ReportSource::from_value(Some(json!({
            "error": "JSON 생성 실패",
            "raw_text": "```json {broken",
            "basicInfo": { "modelName": "K5" }
        })));
        match src {
            ReportSource::Failed(e) => {
                assert_eq!(e.error, "JSON 생성 실패");
                assert_eq!(e.raw_text.as_deref(), Some("```json {broken"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn camel_case_raw_text_is_accepted() {
        let src = ReportSource::from_value(Some(json!({"error": "x", "rawText": "raw"})));
        assert!(matches!(src, ReportSource::Failed(ref e) if e.raw_text.as_deref() == Some("raw")));
    }

    #[test]
    fn empty_object_is_an_empty_report() {
        let src = ReportSource::from_value(Some(json!({})));
        match &src {
            ReportSource::Analysed(r) => assert!(r.is_empty()),
            other => panic!("expected Analysed, got {other:?}"),
        }
        assert!(src.askable().is_none());
    }

    #[test]
    fn numeric_leaves_become_text() {
        let src = ReportSource::from_value(Some(json!({
            "basicInfo": { "year": 2019, "mileage": 85000 },
            "riskScore": { "score": 72, "summary": null },
            "accidentHistory": { "details": null }
        })));
        let report = src.askable().cloned().expect("askable report");
        let info = report.basic_info.as_ref().expect("basic info");
        assert_eq!(info.year.as_deref(), Some("2019"));
        assert_eq!(info.mileage.as_deref(), Some("85000"));
        let score = report.risk_score.as_ref().expect("risk score");
        assert_eq!(score.band(), RiskBand::Caution);
        assert!(score.summary.is_none());
        assert!(report.accident_history.as_ref().expect("history").details.is_empty());
    }

    #[test]
    fn risk_band_uses_leading_integer() {
        let band = |s: &str| {
            RiskScore {
                score: Some(s.into()),
                summary: None,
            }
            .band()
        };
        assert_eq!(band("85점"), RiskBand::Good);
        assert_eq!(band("80"), RiskBand::Good);
        assert_eq!(band(" 60.9"), RiskBand::Caution);
        assert_eq!(band("59"), RiskBand::Danger);
        assert_eq!(band("?"), RiskBand::Unknown);
        assert_eq!(RiskScore::default().band(), RiskBand::Unknown);
    }

    #[test]
    fn serialises_back_in_camel_case_without_absent_fields() {
        let report = Report {
            predicted_price: Some(PredictedPrice {
                range: Some("1,200~1,350만원".into()),
                basis: None,
            }),
            ..Report::default()
        };
        let v = serde_json::to_value(&report).expect("serialize");
        assert_eq!(v, json!({ "predictedPrice": { "range": "1,200~1,350만원" } }));
    }
}
