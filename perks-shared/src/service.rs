use serde::{Deserialize, Serialize};
use std::fmt;

/// The three mock partner services the backend talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Travel,
    Hotel,
    Shopping,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Travel, ServiceKind::Hotel, ServiceKind::Shopping];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Travel => "travel",
            ServiceKind::Hotel => "hotel",
            ServiceKind::Shopping => "shopping",
        }
    }

    /// Name reported by the simulator's `/health` endpoint.
    pub fn simulator_name(&self) -> &'static str {
        match self {
            ServiceKind::Travel => "travel-booking-simulator",
            ServiceKind::Hotel => "hotel-booking-simulator",
            ServiceKind::Shopping => "shopping-simulator",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
