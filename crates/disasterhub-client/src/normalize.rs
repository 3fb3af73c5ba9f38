use std::str::FromStr;

use serde_json::Value;

use disasterhub_types::models::{DisasterStatus, Report, UserVote};

pub const UNTITLED: &str = "Untitled Report";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const NO_TIME: &str = "Time not specified";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NOT_CHECKED: &str = "Not checked";
pub const DEFAULT_AUTHOR: &str = "AI System";

/// How the upstream `is_disaster` flag maps onto [`DisasterStatus`].
///
/// `TwoWay` is what the report list has always done: only `"yes"` is
/// confirmed, everything else (including `"no"`) is unverified.
/// `ThreeWay` additionally maps `"no"` to a false alarm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusMapping {
    #[default]
    TwoWay,
    ThreeWay,
}

impl FromStr for StatusMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-way" => Ok(Self::TwoWay),
            "three-way" => Ok(Self::ThreeWay),
            other => Err(format!("unknown status mapping: {}", other)),
        }
    }
}

pub fn disaster_status(flag: Option<&str>, mapping: StatusMapping) -> DisasterStatus {
    match (flag, mapping) {
        (Some("yes"), _) => DisasterStatus::Confirmed,
        (Some("no"), StatusMapping::ThreeWay) => DisasterStatus::FalseAlarm,
        _ => DisasterStatus::Unverified,
    }
}

/// Maps a fact-checker response onto reports, in upstream order.
///
/// A payload without a `predictions` array yields no reports. Individual
/// items never fail; missing fields take their display fallbacks.
pub fn normalize_predictions(payload: &Value, mapping: StatusMapping) -> Vec<Report> {
    let Some(items) = payload.get("predictions").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_prediction(index, item, mapping))
        .collect()
}

fn normalize_prediction(index: usize, item: &Value, mapping: StatusMapping) -> Report {
    let description = text(item, "description")
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Report {
        id: prediction_id(item).unwrap_or_else(|| format!("report-{}", index)),
        title: text(item, "text").unwrap_or_else(|| UNTITLED.into()),
        source: text(item, "source").unwrap_or_else(|| UNKNOWN_SOURCE.into()),
        time: text(item, "time").unwrap_or_else(|| NO_TIME.into()),
        description: description.unwrap_or_else(|| NO_DESCRIPTION.into()),
        by: text(item, "by").unwrap_or_else(|| DEFAULT_AUTHOR.into()),
        disaster_status: disaster_status(item.get("is_disaster").and_then(Value::as_str), mapping),
        verified: item
            .get("fact_checker_verified")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        fact_verdict: text(item, "fact_verdict").unwrap_or_else(|| NOT_CHECKED.into()),
        fact_confidence: item.get("fact_confidence").and_then(Value::as_f64),
        upvotes: 0,
        downvotes: 0,
        user_vote: UserVote::None,
        raw: item.clone(),
    }
}

/// Non-empty string or number field rendered as text.
fn text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `_id` as a plain string/number, or Mongo extended JSON `{"$oid": ...}`.
fn prediction_id(item: &Value) -> Option<String> {
    match item.get("_id")? {
        Value::Object(obj) => obj.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => text(item, "_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_predictions_is_empty() {
        for payload in [json!({}), json!({"predictions": "nope"}), json!(null), json!([1, 2])] {
            assert!(normalize_predictions(&payload, StatusMapping::TwoWay).is_empty());
        }
    }

    #[test]
    fn flood_warning_scenario() {
        let payload = json!({
            "predictions": [{
                "_id": "m1",
                "text": "Flood Warning",
                "is_disaster": "yes",
                "fact_verdict": "Not checked"
            }]
        });

        let reports = normalize_predictions(&payload, StatusMapping::TwoWay);
        assert_eq!(reports.len(), 1);
        let r = &reports[0];
        assert_eq!(r.id, "m1");
        assert_eq!(r.title, "Flood Warning");
        assert_eq!(r.disaster_status, DisasterStatus::Confirmed);
        assert_eq!(r.fact_verdict, "Not checked");
        assert_eq!(r.upvotes, 0);
        assert_eq!(r.downvotes, 0);
        assert_eq!(r.user_vote, UserVote::None);
        assert_eq!(r.raw["_id"], "m1");
    }

    #[test]
    fn empty_item_takes_every_fallback() {
        let reports = normalize_predictions(&json!({"predictions": [{}]}), StatusMapping::TwoWay);
        let r = &reports[0];
        assert_eq!(r.id, "report-0");
        assert_eq!(r.title, UNTITLED);
        assert_eq!(r.source, UNKNOWN_SOURCE);
        assert_eq!(r.time, NO_TIME);
        assert_eq!(r.description, NO_DESCRIPTION);
        assert_eq!(r.by, DEFAULT_AUTHOR);
        assert_eq!(r.fact_verdict, NOT_CHECKED);
        assert!(!r.verified);
        assert_eq!(r.fact_confidence, None);
    }

    #[test]
    fn description_is_trimmed_and_blank_falls_back() {
        let payload = json!({"predictions": [
            {"description": "  rising water  "},
            {"description": "   "}
        ]});
        let reports = normalize_predictions(&payload, StatusMapping::TwoWay);
        assert_eq!(reports[0].description, "rising water");
        assert_eq!(reports[1].description, NO_DESCRIPTION);
    }

    #[test]
    fn upstream_vote_fields_are_ignored() {
        let payload = json!({"predictions": [{"_id": "x", "upvotes": 40, "userVote": "up"}]});
        let r = &normalize_predictions(&payload, StatusMapping::TwoWay)[0];
        assert_eq!(r.upvotes, 0);
        assert_eq!(r.user_vote, UserVote::None);
    }

    #[test]
    fn explicit_no_depends_on_mapping() {
        assert_eq!(disaster_status(Some("no"), StatusMapping::TwoWay), DisasterStatus::Unverified);
        assert_eq!(
            disaster_status(Some("no"), StatusMapping::ThreeWay),
            DisasterStatus::FalseAlarm
        );
        assert_eq!(
            disaster_status(Some("no idea"), StatusMapping::ThreeWay),
            DisasterStatus::Unverified
        );
        assert_eq!(disaster_status(None, StatusMapping::ThreeWay), DisasterStatus::Unverified);
    }

    #[test]
    fn object_ids_and_numeric_ids() {
        let payload = json!({"predictions": [
            {"_id": {"$oid": "65f0c0ffee"}},
            {"_id": 17}
        ]});
        let reports = normalize_predictions(&payload, StatusMapping::TwoWay);
        assert_eq!(reports[0].id, "65f0c0ffee");
        assert_eq!(reports[1].id, "17");
    }
}
