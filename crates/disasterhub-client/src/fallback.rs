use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::json;

use disasterhub_types::models::Report;

use crate::normalize::{StatusMapping, normalize_predictions};

/// Static report set shown when the fact-checker cannot be reached.
pub fn mock_reports(now: DateTime<Utc>, mapping: StatusMapping) -> Vec<Report> {
    let an_hour_ago = now - Duration::hours(1);

    let payload = json!({
        "predictions": [
            {
                "_id": "mock1",
                "text": "Flood Warning - Northern Regions",
                "source": "National Weather Service",
                "time": now.to_rfc3339_opts(SecondsFormat::Millis, true),
                "description": "Rising water levels detected in northern regions",
                "is_disaster": "yes",
                "fact_checker_verified": true,
                "fact_verdict": "Not checked",
                "by": "ai"
            },
            {
                "_id": "mock2",
                "text": "Wildfire Alert",
                "source": "Forest Service",
                "time": an_hour_ago.to_rfc3339_opts(SecondsFormat::Millis, true),
                "description": "Fire spreading in western territories",
                "is_disaster": "no idea",
                "fact_checker_verified": false,
                "fact_verdict": "False",
                "fact_confidence": 0.85,
                "by": "ai"
            }
        ]
    });

    normalize_predictions(&payload, mapping)
}
