//! Ambient, cross-cutting pieces shared by the collaborator-trait crate
//! (`sesamestream-api`) and the engine crate: the error taxonomy (§7), the
//! injectable clock (§6 `setClock`), and the metrics counters (§5, §9).

pub mod clock;
pub mod error;
pub mod metrics;
pub mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SesameStreamError;
pub use metrics::{IndexMetrics, Metrics};
pub use ttl::{Expiry, Ttl};
