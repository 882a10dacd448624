//! The diagnostics source.

use std::sync::Arc;

use futures::Stream;
use futures::future::{join_all, try_join_all};
use futures::stream;
use tracing::debug;

use crate::client::{BufferContext, ClientName, DiagnosticAdapter};
use crate::config::{BufferScope, SourceParams};
use crate::error::Result;
use crate::host::{HostBridge, Reporter, TracingReporter};
use crate::lsp::Diagnostic;

use super::SourceContext;
use super::decorate::{Decorator, Undecorated};
use super::item::Item;
use super::sort::sort_items;

/// Collects, decorates and sorts the diagnostics of one client.
pub struct DiagnosticSource<H, D = Undecorated> {
    host: H,
    reporter: Arc<dyn Reporter>,
    decorator: D,
}

impl<H: HostBridge> DiagnosticSource<H> {
    /// Creates a source reporting through `tracing`, without decoration.
    pub fn new(host: H) -> Self {
        Self {
            host,
            reporter: Arc::new(TracingReporter),
            decorator: Undecorated,
        }
    }
}

impl<H, D> DiagnosticSource<H, D> {
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

    /// Replaces the decorator.
    pub fn with_decorator<E>(self, decorator: E) -> DiagnosticSource<H, E> {
        DiagnosticSource {
            host: self.host,
            reporter: self.reporter,
            decorator,
        }
    }
}

impl<H: HostBridge, D: Decorator> DiagnosticSource<H, D> {
    /// Streams the diagnostics selected by `params` as a single batch.
    ///
    /// Nothing is queried until the stream is polled. On failure the error
    /// is reported and the batch is empty.
    pub fn gather(
        &self,
        params: SourceParams,
        context: SourceContext,
    ) -> impl Stream<Item = Vec<Item<Diagnostic>>> + '_ {
        stream::once(async move {
            let client = params.client_name;
            match self.collect(client, params.buffer.as_ref(), context).await {
                Ok(items) => items,
                Err(err) => {
                    self.reporter.error(client.as_str(), &err);
                    Vec::new()
                }
            }
        })
    }

    /// Collects the sorted items, propagating the first failure.
    /// ## Errors
    /// Returns an error if the client is unsupported on this host, a backend
    /// query fails, or a payload does not match the client's shape.
    pub async fn collect(
        &self,
        client: ClientName,
        scope: Option<&BufferScope>,
        context: SourceContext,
    ) -> Result<Vec<Item<Diagnostic>>> {
        client.ensure_supported(self.host.host_kind())?;
        let adapter = client.adapter();

        let diagnostics = match scope {
            None => {
                let raw = self.host.query_backend(client, None).await?;
                adapter.normalize(raw, None)?
            }
            Some(scope) => {
                let buffers = scope.resolve(context.buf_nr);
                debug!(%client, ?buffers, "querying diagnostics");
                try_join_all(
                    buffers
                        .into_iter()
                        .map(|buf_nr| self.query_buffer(adapter, buf_nr)),
                )
                .await?
                .into_iter()
                .flatten()
                .collect()
            }
        };
        debug!(%client, count = diagnostics.len(), "normalized diagnostics");

        let items = join_all(
            diagnostics
                .into_iter()
                .map(|diagnostic| self.decorator.decorate(Item::from_diagnostic(diagnostic))),
        )
        .await;

        Ok(sort_items(items, context.buf_nr))
    }

    async fn query_buffer(
        &self,
        adapter: &dyn DiagnosticAdapter,
        buf_nr: u32,
    ) -> Result<Vec<Diagnostic>> {
        let uri = if adapter.needs_uri() {
            Some(self.host.resolve_file_uri(buf_nr).await?)
        } else {
            None
        };
        let raw = self.host.query_backend(adapter.client(), Some(buf_nr)).await?;
        adapter.normalize(raw, Some(&BufferContext { buf_nr, uri }))
    }
}
