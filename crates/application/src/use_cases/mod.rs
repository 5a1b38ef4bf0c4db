pub mod referral;

pub use referral::{Attempt, ReferQueryUseCase, RetrySchedule};
