//! Flight partner operations exposed under `/api/flights/{operation}`.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightOperation {
    Login,
    Refresh,
    Search,
    Session,
    Preview,
    Hold,
    Book,
    Ancillary,
    Airports,
    FareCalendar,
}

impl FlightOperation {
    pub const ALL: [FlightOperation; 10] = [
        FlightOperation::Login,
        FlightOperation::Refresh,
        FlightOperation::Search,
        FlightOperation::Session,
        FlightOperation::Preview,
        FlightOperation::Hold,
        FlightOperation::Book,
        FlightOperation::Ancillary,
        FlightOperation::Airports,
        FlightOperation::FareCalendar,
    ];

    /// Inbound path segment.
    pub fn name(&self) -> &'static str {
        match self {
            FlightOperation::Login => "login",
            FlightOperation::Refresh => "refresh",
            FlightOperation::Search => "search",
            FlightOperation::Session => "session",
            FlightOperation::Preview => "preview",
            FlightOperation::Hold => "hold",
            FlightOperation::Book => "book",
            FlightOperation::Ancillary => "ancillary",
            FlightOperation::Airports => "airports",
            FlightOperation::FareCalendar => "fare-calendar",
        }
    }

    /// Inbound method the operation is exposed on.
    pub fn method(&self) -> Method {
        match self {
            FlightOperation::Airports | FlightOperation::FareCalendar => Method::GET,
            _ => Method::POST,
        }
    }

    /// Look up an operation by inbound name and method.
    pub fn resolve(name: &str, method: &Method) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name && op.method() == *method)
    }

    /// Credential operations are served by the credential manager, not relayed.
    pub fn is_credential_operation(&self) -> bool {
        matches!(self, FlightOperation::Login | FlightOperation::Refresh)
    }

    /// Path on the flight partner API.
    pub fn upstream_path(&self) -> String {
        format!("/flights/{}", self.name())
    }
}
