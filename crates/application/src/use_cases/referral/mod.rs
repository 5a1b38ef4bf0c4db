mod refer_query;
mod retry_schedule;

pub use refer_query::ReferQueryUseCase;
pub use retry_schedule::{Attempt, RetrySchedule, INITIAL_TIMEOUT, REFERRAL_ROUNDS};
