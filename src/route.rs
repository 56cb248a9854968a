use csv::StringRecord;
use regex::Regex;

use crate::{error::GraphError, graph::Edge};

/// Structured form of a `route_long_name` such as
/// `"Central to Parramatta via Strathfield"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteName {
    pub origin: String,
    pub destination: String,
    pub waypoint: Option<String>,
}

/// Splits free-text route names into origin, destination and waypoint.
#[derive(Debug, Clone)]
pub struct RouteNameParser {
    regex: Regex,
}

impl RouteNameParser {
    /// origin and destination are non-greedy, the `via` clause is optional.
    /// A single trailing newline is allowed after the name.
    pub const ROUTE_NAME_REGEX: &str = r"^(.*?)\s+to\s+(.*?)(?:\s+via\s+(.*))?\n?\z";

    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            regex: Regex::new(Self::ROUTE_NAME_REGEX)?,
        })
    }

    /// Returns `None` when the text has no `to` separator.
    pub fn parse(&self, text: &str) -> Option<RouteName> {
        let groups = self.regex.captures(text)?;
        Some(RouteName {
            origin: groups.get(1)?.as_str().to_string(),
            destination: groups.get(2)?.as_str().to_string(),
            waypoint: groups.get(3).map(|waypoint| waypoint.as_str().to_string()),
        })
    }
}

/// One row of the routes table. `fields` holds the passthrough columns
/// untouched; the derived route is computed once when the row is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub fields: StringRecord,
    pub route_long_name: Option<String>,
    pub route: Option<RouteName>,
}

impl RouteRecord {
    pub fn new(
        fields: StringRecord,
        route_long_name: Option<&str>,
        parser: &RouteNameParser,
    ) -> Self {
        let route_long_name = route_long_name
            .filter(|name| !name.is_empty())
            .map(String::from);
        let route = route_long_name.as_deref().and_then(|name| parser.parse(name));

        Self {
            fields,
            route_long_name,
            route,
        }
    }

    pub fn has_name(&self) -> bool {
        self.route_long_name.is_some()
    }

    pub fn is_parsed(&self) -> bool {
        self.route.is_some()
    }

    pub fn origin(&self) -> Option<&str> {
        self.route.as_ref().map(|route| route.origin.as_str())
    }

    pub fn destination(&self) -> Option<&str> {
        self.route.as_ref().map(|route| route.destination.as_str())
    }

    pub fn waypoint(&self) -> Option<&str> {
        self.route.as_ref()?.waypoint.as_deref()
    }

    pub fn edge(&self) -> Option<Edge> {
        self.route.as_ref().map(|route| Edge {
            origin: route.origin.to_owned(),
            destination: route.destination.to_owned(),
        })
    }
}
