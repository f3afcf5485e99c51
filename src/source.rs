use crate::dataset::ContributionDataset;
use crate::github::{FetchError, GitHubClient, UserStats};
use crate::mock;
use crate::year::CalendarYear;
use rand::Rng;
use time::Date;
use tracing::{info, warn};

/// Produces contribution data for the calendar.  Every failure to reach
/// GitHub is absorbed here and answered with sample data instead.
#[derive(Clone, Debug)]
pub(crate) struct ContributionSource<R> {
    client: Option<GitHubClient>,
    today: Date,
    rng: R,
}

impl<R: Rng> ContributionSource<R> {
    pub(crate) fn new(client: Option<GitHubClient>, today: Date, rng: R) -> Self {
        ContributionSource { client, today, rng }
    }

    pub(crate) fn contributions(
        &mut self,
        username: &str,
        year: CalendarYear,
    ) -> ContributionDataset {
        let Some(client) = self.client.as_ref() else {
            info!(username, %year, "offline; using sample contributions");
            return self.sample(year);
        };
        match client.fetch_contributions(username, year) {
            Ok(dataset) => {
                info!(
                    username,
                    %year,
                    days = dataset.contributions.len(),
                    total = dataset.total_contributions,
                    "fetched contributions"
                );
                dataset
            }
            Err(FetchError::MissingToken) => {
                info!(username, %year, "no GitHub token; using sample contributions");
                self.sample(year)
            }
            Err(e) => {
                warn!(
                    username,
                    %year,
                    error = %ErrorChain(&e),
                    "failed to fetch contributions; using sample contributions"
                );
                self.sample(year)
            }
        }
    }

    pub(crate) fn user_stats(&self, username: &str) -> UserStats {
        let Some(client) = self.client.as_ref() else {
            return UserStats::PLACEHOLDER;
        };
        client.fetch_user_stats(username).unwrap_or_else(|e| {
            warn!(
                username,
                error = %ErrorChain(&e),
                "failed to fetch user profile; using placeholder stats"
            );
            UserStats::PLACEHOLDER
        })
    }

    fn sample(&mut self, year: CalendarYear) -> ContributionDataset {
        mock::generate(year, self.today, &mut self.rng)
    }
}

/// Displays an error together with all of its sources
#[derive(Debug)]
struct ErrorChain<'a>(&'a dyn std::error::Error);

impl std::fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(e) = source {
            write!(f, ": {e}")?;
            source = e.source();
        }
        Ok(())
    }
}
