use crate::error::{Result, TopologyError};
use serde::Deserialize;

/// Message returned when either endpoint id is absent
pub const MISSING_PAIR_MESSAGE: &str = "from and to parameters required";

/// Raw `from`, `to`, `fromTime` and `toTime` query parameters.
///
/// Every field is optional at this level so that a missing id or a bad
/// timestamp can be reported with its own message instead of a generic
/// decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub from_time: Option<String>,
    pub to_time: Option<String>,
}

/// A validated pair and its optional inclusive time bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairWindow {
    pub from: String,
    pub to: String,
    pub from_time: Option<i64>,
    pub to_time: Option<i64>,
}

impl PairQuery {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..Self::default()
        }
    }

    pub fn with_times(mut self, from_time: Option<&str>, to_time: Option<&str>) -> Self {
        self.from_time = from_time.map(str::to_string);
        self.to_time = to_time.map(str::to_string);
        self
    }

    /// Both ids are required and must be non-empty. Time bounds are
    /// millisecond timestamps; an empty value counts as absent.
    pub fn window(&self) -> Result<PairWindow> {
        let (Some(from), Some(to)) = (non_empty(&self.from), non_empty(&self.to)) else {
            return Err(TopologyError::MissingParameter(MISSING_PAIR_MESSAGE.into()));
        };

        Ok(PairWindow {
            from: from.to_string(),
            to: to.to_string(),
            from_time: parse_time(&self.from_time, "fromTime")?,
            to_time: parse_time(&self.to_time, "toTime")?,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_time(value: &Option<String>, name: &'static str) -> Result<Option<i64>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| TopologyError::InvalidParameter {
                name,
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_only() -> Result<()> {
        let window = PairQuery::new("srv-0", "srv-1").window()?;
        assert_eq!(
            window,
            PairWindow {
                from: "srv-0".into(),
                to: "srv-1".into(),
                from_time: None,
                to_time: None,
            }
        );
        Ok(())
    }

    #[test]
    fn test_time_bounds() -> Result<()> {
        let window = PairQuery::new("a", "b").with_times(Some("1000"), Some("2000")).window()?;
        assert_eq!(window.from_time, Some(1000));
        assert_eq!(window.to_time, Some(2000));

        let window = PairQuery::new("a", "b").with_times(Some(""), Some("5")).window()?;
        assert_eq!(window.from_time, None);
        assert_eq!(window.to_time, Some(5));

        // Zero is a real bound, not "absent"
        let window = PairQuery::new("a", "b").with_times(Some("0"), None).window()?;
        assert_eq!(window.from_time, Some(0));
        Ok(())
    }

    #[test]
    fn test_missing_ids() {
        let queries = [
            PairQuery::default(),
            PairQuery { from: Some("a".into()), ..PairQuery::default() },
            PairQuery { to: Some("b".into()), ..PairQuery::default() },
            PairQuery::new("", "b"),
            PairQuery::new("a", ""),
        ];
        for query in queries {
            match query.window() {
                Err(TopologyError::MissingParameter(msg)) => assert_eq!(msg, MISSING_PAIR_MESSAGE),
                other => panic!("expected missing parameter for {:?}, got {:?}", query, other),
            }
        }
    }

    #[test]
    fn test_invalid_time() {
        assert!(matches!(
            PairQuery::new("a", "b").with_times(Some("yesterday"), None).window(),
            Err(TopologyError::InvalidParameter { name: "fromTime", .. })
        ));
    }

    #[test]
    fn test_deserializes_camel_case_names() -> serde_json::Result<()> {
        let query: PairQuery =
            serde_json::from_str(r#"{"from":"a","to":"b","fromTime":"1","toTime":"2"}"#)?;
        assert_eq!(query, PairQuery::new("a", "b").with_times(Some("1"), Some("2")));
        Ok(())
    }
}
