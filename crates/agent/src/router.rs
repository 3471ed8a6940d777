//! Keyword router: picks the sub-agent that formats the reply to a query.
//!
//! Each route scores a query by the total length of its keywords found in
//! the lower-cased text, so longer (more specific) keywords weigh more.

use serde::{Deserialize, Serialize};
use tracing::info;

/// The sub-agent a query is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    AdminAgent,
    ProductivityAgent,
    ProfileAgent,
    GeneralAgent,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::AdminAgent => "admin_agent",
            Route::ProductivityAgent => "productivity_agent",
            Route::ProfileAgent => "profile_agent",
            Route::GeneralAgent => "general_agent",
        }
    }

    pub fn description(&self) -> &'static str {
        ROUTES
            .iter()
            .find(|r| r.route == *self)
            .map_or("General assistance", |r| r.description)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct RouteSpec {
    route: Route,
    keywords: &'static [&'static str],
    description: &'static str,
}

// Declaration order breaks ties.
const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        route: Route::AdminAgent,
        keywords: &[
            "calendar", "event", "schedule", "remind", "reminder", "appointment", "meeting",
            "book", "email", "draft", "mail", "send", "renew", "renewal", "deadline",
        ],
        description: "Handles calendar events, email drafts, and renewal reminders",
    },
    RouteSpec {
        route: Route::ProductivityAgent,
        keywords: &[
            "task", "priority", "prioritize", "eisenhower", "matrix", "energy", "todo", "to-do",
            "schedule", "time block", "productive", "focus", "plan", "daily", "routine",
            "tired", "exhausted", "energetic", "motivated",
        ],
        description: "Handles task prioritization and daily planning",
    },
    RouteSpec {
        route: Route::ProfileAgent,
        keywords: &[
            "license", "passport", "insurance", "policy", "number", "address", "phone", "email",
            "contact", "ssn", "id", "document", "info", "information", "profile", "what's my",
            "what is my", "do i have",
        ],
        description: "Retrieves personal information from profile",
    },
];

/// Where a query went and how sure the router was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub query: String,
    pub routed_to: Route,
    pub confidence: f32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentDescription {
    pub agent: Route,
    pub description: &'static str,
}

#[derive(Debug, Default, Clone)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    /// Score every route and return the best one with its confidence.
    /// A query matching no keyword goes to `general_agent` at 0.5.
    pub fn classify_intent(&self, query: &str) -> (Route, f32) {
        let query_lower = query.to_lowercase();

        let mut best: Option<(Route, usize)> = None;
        for spec in ROUTES {
            let score: usize = spec
                .keywords
                .iter()
                .filter(|kw| query_lower.contains(*kw))
                .map(|kw| kw.len())
                .sum();
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((spec.route, score));
            }
        }

        match best {
            Some((route, score)) if score > 0 => {
                let length = query_lower.chars().count().max(1);
                let confidence = (score as f32 / length as f32 * 10.0).min(1.0);
                (route, confidence)
            }
            _ => (Route::GeneralAgent, 0.5),
        }
    }

    pub fn route(&self, query: &str) -> RoutingDecision {
        let (routed_to, confidence) = self.classify_intent(query);
        info!(route = %routed_to, confidence = format!("{confidence:.2}"), "Query routed");

        RoutingDecision {
            query: query.to_string(),
            routed_to,
            confidence,
            description: routed_to.description().to_string(),
        }
    }

    /// The specialised agents, in routing order.
    pub fn available_agents(&self) -> Vec<AgentDescription> {
        ROUTES
            .iter()
            .map(|r| AgentDescription {
                agent: r.route,
                description: r.description,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_keyword() {
        let router = Router::new();
        assert_eq!(
            router.classify_intent("What's my driver's license number?").0,
            Route::ProfileAgent
        );
        assert_eq!(
            router.classify_intent("Create a calendar event for my DMV appointment").0,
            Route::AdminAgent
        );
        assert_eq!(
            router.classify_intent("Help me prioritize my tasks").0,
            Route::ProductivityAgent
        );
        assert_eq!(
            router.classify_intent("I'm feeling tired today, what should I work on?").0,
            Route::ProductivityAgent
        );
    }

    #[test]
    fn no_keyword_falls_back_to_general() {
        let (route, confidence) = Router::new().classify_intent("hello there");
        assert_eq!(route, Route::GeneralAgent);
        assert!((confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn tie_goes_to_first_declared_route() {
        // "schedule" is an admin and a productivity keyword
        assert_eq!(Router::new().classify_intent("schedule").0, Route::AdminAgent);
    }

    #[test]
    fn confidence_is_capped() {
        let (_, confidence) = Router::new().classify_intent("renewal");
        assert!((confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn decision_carries_description() {
        let router = Router::new();
        let decision = router.route("hi");
        assert_eq!(decision.routed_to, Route::GeneralAgent);
        assert_eq!(decision.description, "General assistance");
        assert_eq!(router.available_agents().len(), 3);
        assert_eq!(serde_json::to_value(decision.routed_to).unwrap(), "general_agent");
    }
}
