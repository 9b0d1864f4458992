//! Text and JSON rendering of query results

use serde::Serialize;

use crate::error::ParseError;
use crate::point::Point;
use crate::query::{METERS_PER_KM, NearbyHit, RankedHit, SearchHit};

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Meters shown as kilometers with two decimals
pub fn km(meters: f64) -> String {
    format!("{:.2}", meters / METERS_PER_KM)
}

/// `3: GPS:Base:1.0:2.0:3.0:`
pub fn indexed_line(index: usize, point: &Point) -> String {
    format!("{}: {}", index, point)
}

pub fn search_line(hit: &SearchHit) -> String {
    indexed_line(hit.index, &hit.point)
}

pub fn ranked_line(hit: &RankedHit) -> String {
    format!("{}, Distance: {} Km", indexed_line(hit.index, &hit.point), km(hit.distance))
}

pub fn nearby_line(hit: &NearbyHit) -> String {
    format!("{}: {} (Distance: {} Km)", hit.point.name(), hit.point, km(hit.distance))
}

/// Per-fragment result of a bulk add, as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AddOutcome {
    Identified { point: Point },
    Rejected { fragment: String, reason: String },
}

impl From<&Result<Point, ParseError>> for AddOutcome {
    fn from(outcome: &Result<Point, ParseError>) -> Self {
        match outcome {
            Ok(point) => Self::Identified { point: point.clone() },
            Err(e) => Self::Rejected {
                fragment: e.fragment.clone(),
                reason: e.reason.to_string(),
            },
        }
    }
}

impl std::fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identified { point } => write!(f, "Identified Point: {}", point),
            Self::Rejected { fragment, reason } => {
                write!(f, "Error adding GPS point: {}\nPoint: {}", reason, fragment.trim_end())
            }
        }
    }
}

/// Pretty JSON for any result set
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseReason;

    fn p(name: &str, x: f64, y: f64, z: f64) -> Point {
        Point::new(name, x, y, z).unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_km_two_decimals() {
        assert_eq!(km(1234.0), "1.23");
        assert_eq!(km(0.0), "0.00");
        assert_eq!(km(5000.0), "5.00");
    }

    #[test]
    fn test_lines() {
        let point = p("Base", 1.0, 2.0, 3.0);
        assert_eq!(
            search_line(&SearchHit {
                index: 4,
                point: point.clone()
            }),
            "4: GPS:Base:1.0:2.0:3.0:"
        );
        assert_eq!(
            ranked_line(&RankedHit {
                index: 2,
                point: point.clone(),
                distance: 2500.0
            }),
            "2: GPS:Base:1.0:2.0:3.0:, Distance: 2.50 Km"
        );
        assert_eq!(
            nearby_line(&NearbyHit { point, distance: 10.0 }),
            "Base: GPS:Base:1.0:2.0:3.0: (Distance: 0.01 Km)"
        );
    }

    #[test]
    fn test_add_outcome_display() {
        let ok: Result<Point, ParseError> = Ok(p("A", 0.0, 0.0, 0.0));
        assert_eq!(AddOutcome::from(&ok).to_string(), "Identified Point: GPS:A:0.0:0.0:0.0:");

        let bad: Result<Point, ParseError> = Err(ParseError::new("bad:", ParseReason::MissingFields { found: 1 }));
        let text = AddOutcome::from(&bad).to_string();
        assert!(text.starts_with("Error adding GPS point:"));
        assert!(text.ends_with("Point: bad:"));
    }

    #[test]
    fn test_json_shapes() {
        let ok: Result<Point, ParseError> = Ok(p("A", 1.5, 0.0, -2.0));
        let json: serde_json::Value = serde_json::from_str(&to_json(&AddOutcome::from(&ok)).unwrap()).unwrap();
        assert_eq!(json["status"], "identified");
        assert_eq!(json["point"]["name"], "A");
        assert_eq!(json["point"]["x"], 1.5);
        assert_eq!(json["point"]["z"], -2.0);

        let hits = vec![NearbyHit {
            point: p("B", 0.0, 0.0, 0.0),
            distance: 12.5,
        }];
        let json: serde_json::Value = serde_json::from_str(&to_json(&hits).unwrap()).unwrap();
        assert_eq!(json[0]["distance"], 12.5);
        assert_eq!(json[0]["point"]["name"], "B");
    }
}
