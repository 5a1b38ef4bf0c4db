use std::time::Duration;

pub const REFERRAL_ROUNDS: u32 = 4;
pub const INITIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// One send-and-wait against a single upstream server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub round: u32,
    pub server_index: usize,
    pub timeout: Duration,
}

/// Backoff used when relaying a query upstream.
///
/// Every round tries each server once, in list order, and the round's
/// timeout doubles after a failed round. The round timeout is split evenly
/// between the servers, so a lone server gets 5, 10, 20 and 40 seconds
/// while three servers get a third of that each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    rounds: u32,
    initial_timeout: Duration,
}

impl RetrySchedule {
    pub fn new(rounds: u32, initial_timeout: Duration) -> Self {
        Self {
            rounds,
            initial_timeout,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn initial_timeout(&self) -> Duration {
        self.initial_timeout
    }

    pub fn attempts(&self, server_count: usize) -> Vec<Attempt> {
        if server_count == 0 {
            return Vec::new();
        }

        let divisor = u32::try_from(server_count).unwrap_or(u32::MAX);
        let mut round_timeout = self.initial_timeout;
        let mut attempts = Vec::with_capacity(self.rounds as usize * server_count);

        for round in 0..self.rounds {
            let timeout = round_timeout / divisor;
            attempts.extend((0..server_count).map(|server_index| Attempt {
                round,
                server_index,
                timeout,
            }));
            round_timeout = round_timeout.saturating_mul(2);
        }

        attempts
    }

    /// Sum of every attempt's timeout.
    pub fn total_wait(&self, server_count: usize) -> Duration {
        self.attempts(server_count)
            .iter()
            .map(|attempt| attempt.timeout)
            .sum()
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(REFERRAL_ROUNDS, INITIAL_TIMEOUT)
    }
}
