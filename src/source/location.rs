//! The definitions/references source.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use crate::config::{Method, SourceParams};
use crate::error::Result;
use crate::host::{HostBridge, LocationRequest, Reporter, TracingReporter};
use crate::lsp::{Location, resolve_locations};

use super::SourceContext;
use super::item::Item;

const SUBSYSTEM: &str = "lsp-locations";

/// Runs a navigation method against every client and lists the targets.
pub struct LocationSource<H> {
    host: H,
    reporter: Arc<dyn Reporter>,
}

impl<H: HostBridge> LocationSource<H> {
    /// Creates a source reporting through `tracing`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// The host bridge the source queries.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Replaces the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Streams one batch per answering client.
    ///
    /// An unsupported method, a failure, or no answer at all yields a single
    /// empty batch.
    pub fn gather(
        &self,
        params: SourceParams,
        context: SourceContext,
    ) -> impl Stream<Item = Vec<Item<Location>>> + '_ {
        stream::once(async move {
            let method = match params.method.parse::<Method>() {
                Ok(method) => method,
                Err(err) => {
                    self.reporter.warn(SUBSYSTEM, &err.to_string());
                    return vec![Vec::new()];
                }
            };

            match self
                .collect(method, params.include_declaration, context)
                .await
            {
                Ok(batches) if batches.is_empty() => vec![Vec::new()],
                Ok(batches) => batches,
                Err(err) => {
                    self.reporter.error(SUBSYSTEM, &err);
                    vec![Vec::new()]
                }
            }
        })
        .flat_map(stream::iter)
    }

    /// Collects one item batch per answering client.
    ///
    /// A client whose result is malformed is reported and gets an empty
    /// batch; the other clients are unaffected.
    /// ## Errors
    /// Returns an error if the host query fails.
    pub async fn collect(
        &self,
        method: Method,
        include_declaration: bool,
        context: SourceContext,
    ) -> Result<Vec<Vec<Item<Location>>>> {
        let request = LocationRequest {
            method,
            buf_nr: context.buf_nr,
            win_id: context.win_id,
            include_declaration,
        };

        let Some(responses) = self.host.query_locations(&request).await? else {
            debug!(%method, "no client answered");
            return Ok(Vec::new());
        };

        Ok(responses
            .into_iter()
            .map(|response| match resolve_locations(response.result) {
                Ok(locations) => {
                    debug!(
                        %method,
                        source_id = %response.source_id,
                        count = locations.len(),
                        "resolved locations"
                    );
                    locations.into_iter().map(Item::from_location).collect()
                }
                Err(err) => {
                    debug!(%method, source_id = %response.source_id, "unusable result");
                    self.reporter.error(SUBSYSTEM, &err);
                    Vec::new()
                }
            })
            .collect())
    }
}
