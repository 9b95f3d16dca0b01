pub mod batch_deriver;
pub mod daily_summary_session;
pub mod first_card_session;
pub mod resolver;

pub use batch_deriver::{BatchDeriver, BatchSummary};
pub use daily_summary_session::DailySummarySession;
pub use first_card_session::{FirstCardSession, SubmitState};
pub use resolver::{parse_reading, DerivedValueResolver, ResolveError, ResolvedObservation};
