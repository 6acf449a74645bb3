use crate::core::acquirer::{FixAcquirer, FixFailure, FixOutcome};
use crate::core::checker::PrerequisiteChecker;
use crate::core::reporter::{build_record, Reporter};
use crate::core::resolver::AddressResolver;
use crate::domain::model::GeoRecord;
use crate::domain::ports::{LocationProvider, NetworkProbe, PolicyReader, ReverseGeocoder};
use crate::utils::error::Result;
use chrono::Local;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Reported(GeoRecord),
    NoFix(FixFailure),
}

/// Runs checker, acquirer, resolver and reporter strictly in that order.
pub struct GeoEngine<R, N, P, G, W>
where
    R: PolicyReader,
    N: NetworkProbe,
    P: LocationProvider,
    G: ReverseGeocoder,
    W: Write,
{
    checker: PrerequisiteChecker<R, N>,
    acquirer: FixAcquirer,
    provider: P,
    resolver: AddressResolver<G>,
    reporter: Reporter<W>,
}

impl<R, N, P, G, W> GeoEngine<R, N, P, G, W>
where
    R: PolicyReader,
    N: NetworkProbe,
    P: LocationProvider,
    G: ReverseGeocoder,
    W: Write,
{
    pub fn new(
        checker: PrerequisiteChecker<R, N>,
        acquirer: FixAcquirer,
        provider: P,
        resolver: AddressResolver<G>,
        reporter: Reporter<W>,
    ) -> Self {
        Self {
            checker,
            acquirer,
            provider,
            resolver,
            reporter,
        }
    }

    pub async fn run(&mut self) -> Result<RunOutcome> {
        tracing::info!("Checking location prerequisites...");
        let report = self.checker.check().await?;
        tracing::debug!("Prerequisites: {:?}", report);

        tracing::info!(
            "Waiting up to {:?} for a location fix...",
            self.acquirer.timeout()
        );
        let coordinate = match self.acquirer.acquire(&mut self.provider).await? {
            FixOutcome::Fixed(coordinate) => coordinate,
            FixOutcome::Failed(failure) => return Ok(RunOutcome::NoFix(failure)),
        };
        let fixed_at = Local::now();

        let address = self.resolver.resolve(coordinate).await;

        let record = build_record(fixed_at, coordinate, address);
        self.reporter.emit(&record)?;
        Ok(RunOutcome::Reported(record))
    }

    pub fn into_parts(self) -> (P, Reporter<W>) {
        (self.provider, self.reporter)
    }
}
