mod common;

use std::sync::Arc;

use common::{CapturingReporter, FakeHost};
use futures::StreamExt;
use lsp_digest::client::ClientName;
use lsp_digest::config::{BufferScope, SourceParams};
use lsp_digest::host::HostKind;
use lsp_digest::lsp::Diagnostic;
use lsp_digest::source::{DiagnosticSource, Item, SeverityIcons, SourceContext};
use serde_json::{Value, json};

fn context(buf_nr: u32) -> SourceContext {
    SourceContext {
        buf_nr,
        win_id: 1000,
    }
}

fn params(client: ClientName, buffer: Option<BufferScope>) -> SourceParams {
    SourceParams {
        client_name: client,
        buffer,
        ..SourceParams::default()
    }
}

fn range(line: u32, character: u32, end_character: u32) -> Value {
    json!({
        "start": {"line": line, "character": character},
        "end": {"line": line, "character": end_character}
    })
}

fn coc_record(message: &str, severity: &str, uri: &str, file: &str, line: u32) -> Value {
    json!({
        "file": file,
        "lnum": line + 1,
        "col": 1,
        "location": {"uri": uri, "range": range(line, 0, 4)},
        "severity": severity,
        "message": message,
        "source": "tsserver"
    })
}

async fn gather<H, D>(
    source: &DiagnosticSource<H, D>,
    params: SourceParams,
    context: SourceContext,
) -> Vec<Vec<Item<Diagnostic>>>
where
    H: lsp_digest::host::HostBridge,
    D: lsp_digest::source::Decorator,
{
    source.gather(params, context).collect().await
}

fn words(items: &[Item<Diagnostic>]) -> Vec<&str> {
    items.iter().map(|item| item.word.as_str()).collect()
}

#[tokio::test]
async fn test_coc_scoped_buffer_sorted_by_severity() {
    let raw = json!([
        coc_record("M1", "Warning", "file:///a", "/a", 2),
        coc_record("M2", "Error", "file:///a", "/a", 0),
        coc_record("elsewhere", "Error", "file:///b", "/b", 0),
    ]);
    let host = FakeHost::new(HostKind::Nvim)
        .with_backend(ClientName::CocNvim, Some(7), raw)
        .with_uri(7, "file:///a");
    let source = DiagnosticSource::new(host);

    let batches = gather(
        &source,
        params(ClientName::CocNvim, Some(BufferScope::One(7))),
        context(7),
    )
    .await;

    assert_eq!(batches.len(), 1);
    let items = &batches[0];
    assert_eq!(words(items), vec!["M2", "M1"]);
    for item in items {
        assert_eq!(item.action.buf_nr, Some(7));
        assert_eq!(item.action.path.as_deref(), Some("/a"));
    }
    assert_eq!(items[0].action.line_nr, 1);
    assert_eq!(items[1].action.line_nr, 3);
}

#[tokio::test]
async fn test_all_clients_normalize_to_same_record() {
    let nvim = json!([{
        "bufnr": 3, "lnum": 2, "end_lnum": 2, "col": 4, "end_col": 9,
        "severity": 1, "message": "mismatched types", "source": "rustc"
    }]);
    let coc = json!([{
        "file": "/src/lib.rs",
        "location": {"uri": "file:///src/lib.rs", "range": range(2, 4, 9)},
        "severity": "Error",
        "message": "mismatched types",
        "source": "rustc"
    }]);
    let vim = json!({
        "rust-analyzer": {
            "method": "textDocument/publishDiagnostics",
            "params": {
                "uri": "file:///src/lib.rs",
                "diagnostics": [{
                    "range": range(2, 4, 9),
                    "severity": 1,
                    "message": "mismatched types",
                    "source": "rustc"
                }]
            }
        }
    });

    let host = FakeHost::new(HostKind::Nvim)
        .with_backend(ClientName::NvimLsp, Some(3), nvim)
        .with_backend(ClientName::CocNvim, Some(3), coc)
        .with_backend(ClientName::VimLsp, Some(3), vim)
        .with_uri(3, "file:///src/lib.rs");
    let source = DiagnosticSource::new(host);

    let mut sanitized = Vec::new();
    for client in ClientName::ALL {
        let batches = gather(
            &source,
            params(client, Some(BufferScope::One(3))),
            context(3),
        )
        .await;
        let items = &batches[0];
        assert_eq!(items.len(), 1, "{client} produced no diagnostic");

        let item = &items[0];
        assert_eq!(item.word, "mismatched types");
        assert_eq!(item.action.buf_nr, Some(3));
        assert_eq!((item.action.line_nr, item.action.col), (3, 5));
        sanitized.push(item.data.sanitize());
    }

    assert_eq!(sanitized[0], sanitized[1]);
    assert_eq!(sanitized[1], sanitized[2]);
}

#[tokio::test]
async fn test_nvim_client_on_vim_reports_and_yields_empty_batch() {
    let host = FakeHost::new(HostKind::Vim);
    let reporter = Arc::new(CapturingReporter::default());
    let source = DiagnosticSource::new(host).with_reporter(reporter.clone());

    let batches = gather(&source, params(ClientName::NvimLsp, None), context(1)).await;

    assert_eq!(batches.len(), 1);
    assert!(batches[0].is_empty());
    assert_eq!(
        reporter.errors(),
        vec![(
            "nvim-lsp".to_string(),
            "nvim-lsp is not supported on vim".to_string()
        )]
    );
}

#[tokio::test]
async fn test_current_buffer_sentinel_uses_context() {
    let vim = json!({
        "server": {"params": {"diagnostics": [{"range": range(0, 0, 1), "message": "here"}]}}
    });
    let host = FakeHost::new(HostKind::Vim)
        .with_backend(ClientName::VimLsp, Some(5), vim)
        .with_uri(5, "file:///work/main.c");
    let source = DiagnosticSource::new(host);

    let batches = gather(
        &source,
        params(ClientName::VimLsp, Some(BufferScope::Many(vec![0]))),
        context(5),
    )
    .await;

    let items = &batches[0];
    assert_eq!(words(items), vec!["here"]);
    assert_eq!(items[0].action.buf_nr, Some(5));
    assert_eq!(items[0].action.path.as_deref(), Some("/work/main.c"));
}

#[tokio::test]
async fn test_focused_buffer_listed_first() {
    let record = |buf_nr: u32, message: &str| {
        json!([{"bufnr": buf_nr, "lnum": 0, "col": 0, "severity": 4, "message": message}])
    };
    let host = FakeHost::new(HostKind::Nvim)
        .with_backend(ClientName::NvimLsp, Some(2), record(2, "in two"))
        .with_backend(ClientName::NvimLsp, Some(4), record(4, "in four"))
        .with_backend(ClientName::NvimLsp, Some(6), record(6, "in six"));
    let source = DiagnosticSource::new(host);

    let batches = gather(
        &source,
        params(ClientName::NvimLsp, Some(BufferScope::Many(vec![6, 2, 0]))),
        context(4),
    )
    .await;

    assert_eq!(words(&batches[0]), vec!["in four", "in two", "in six"]);
}

#[tokio::test]
async fn test_repeated_buffer_is_not_deduplicated() {
    let vim = json!({
        "server": {"params": {"diagnostics": [{"range": range(3, 0, 1), "message": "twice"}]}}
    });
    let host = FakeHost::new(HostKind::Vim)
        .with_backend(ClientName::VimLsp, Some(5), vim)
        .with_uri(5, "file:///work/main.c");
    let source = DiagnosticSource::new(host);

    let batches = gather(
        &source,
        params(ClientName::VimLsp, Some(BufferScope::Many(vec![0, 5]))),
        context(5),
    )
    .await;

    let items = &batches[0];
    assert_eq!(words(items), vec!["twice", "twice"]);
    assert!(items.iter().all(|item| item.action.buf_nr == Some(5)));
}

#[tokio::test]
async fn test_list_scope_keeps_input_order_on_ties() {
    // Buffer 2 is another handle on buffer 5: its records carry bufnr 5.
    let record = |message: &str| {
        json!([{"bufnr": 5, "lnum": 1, "col": 0, "severity": 2, "message": message}])
    };
    let host = FakeHost::new(HostKind::Nvim)
        .with_backend(ClientName::NvimLsp, Some(2), record("via two"))
        .with_backend(ClientName::NvimLsp, Some(5), record("via five"));
    let source = DiagnosticSource::new(host);

    let batches = gather(
        &source,
        params(ClientName::NvimLsp, Some(BufferScope::Many(vec![2, 0]))),
        context(5),
    )
    .await;
    assert_eq!(words(&batches[0]), vec!["via two", "via five"]);

    let batches = gather(
        &source,
        params(ClientName::NvimLsp, Some(BufferScope::Many(vec![0, 2]))),
        context(5),
    )
    .await;
    assert_eq!(words(&batches[0]), vec!["via five", "via two"]);
}

#[tokio::test]
async fn test_unscoped_vim_lsp_decodes_every_uri() {
    let notification = |message: &str| {
        let diagnostic = json!({"range": range(1, 0, 1), "severity": 2, "message": message});
        json!({"srv": {"params": {"diagnostics": [diagnostic]}}})
    };
    let raw = json!({
        "file:///tmp/my%20file.rs": notification("spaced"),
        "file:///tmp/plain.rs": notification("plain")
    });
    let host = FakeHost::new(HostKind::Vim).with_backend(ClientName::VimLsp, None, raw);
    let source = DiagnosticSource::new(host);

    let batches = gather(&source, params(ClientName::VimLsp, None), context(1)).await;

    let items = &batches[0];
    assert_eq!(items.len(), 2);
    let mut paths: Vec<_> = items
        .iter()
        .map(|item| item.action.path.clone().unwrap())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["/tmp/my file.rs", "/tmp/plain.rs"]);
    assert!(items.iter().all(|item| item.action.buf_nr.is_none()));
}

#[tokio::test]
async fn test_backend_failure_yields_empty_batch() {
    let host = FakeHost::new(HostKind::Nvim).failing();
    let reporter = Arc::new(CapturingReporter::default());
    let source = DiagnosticSource::new(host).with_reporter(reporter.clone());

    let batches = gather(
        &source,
        params(ClientName::NvimLsp, Some(BufferScope::One(1))),
        context(1),
    )
    .await;

    assert_eq!(batches.len(), 1);
    assert!(batches[0].is_empty());
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "nvim-lsp");
    assert!(errors[0].1.contains("backend unavailable"));
}

#[tokio::test]
async fn test_missing_buffer_uri_is_reported() {
    let host = FakeHost::new(HostKind::Vim);
    let reporter = Arc::new(CapturingReporter::default());
    let source = DiagnosticSource::new(host).with_reporter(reporter.clone());

    let batches = gather(
        &source,
        params(ClientName::VimLsp, Some(BufferScope::One(9))),
        context(9),
    )
    .await;

    assert!(batches[0].is_empty());
    assert!(reporter.errors()[0].1.contains("buffer 9 has no file"));
}

#[tokio::test]
async fn test_gather_is_lazy() {
    let host = FakeHost::new(HostKind::Nvim);
    let source = DiagnosticSource::new(host);

    let stream = source.gather(params(ClientName::NvimLsp, None), context(1));
    drop(stream);
    assert_eq!(source_calls(&source), 0);

    let _ = gather(&source, params(ClientName::NvimLsp, None), context(1)).await;
    assert_eq!(source_calls(&source), 1);
}

#[tokio::test]
async fn test_dropping_stream_cancels_pending_queries() {
    let host = FakeHost::new(HostKind::Nvim).stalled();
    let reporter = Arc::new(CapturingReporter::default());
    let source = DiagnosticSource::new(host).with_reporter(reporter.clone());

    let mut stream = Box::pin(source.gather(
        params(ClientName::NvimLsp, Some(BufferScope::Many(vec![1, 2]))),
        context(1),
    ));
    assert!(futures::poll!(stream.next()).is_pending());
    assert_eq!(source_calls(&source), 2);

    drop(stream);
    tokio::task::yield_now().await;
    assert_eq!(source_calls(&source), 2);
    assert!(reporter.errors().is_empty());
}

fn source_calls<D>(source: &DiagnosticSource<FakeHost, D>) -> usize {
    source.host().calls()
}

#[tokio::test]
async fn test_severity_icons_decorate_items() {
    let raw = json!([
        {"bufnr": 1, "lnum": 0, "col": 0, "severity": 2, "message": "unused\nsecond line"},
    ]);
    let host = FakeHost::new(HostKind::Nvim).with_backend(ClientName::NvimLsp, None, raw);
    let source = DiagnosticSource::new(host).with_decorator(SeverityIcons::default());

    let batches = gather(&source, params(ClientName::NvimLsp, None), context(1)).await;

    let item = &batches[0][0];
    assert_eq!(item.word, "unused");
    assert_eq!(item.display.as_deref(), Some("W unused"));
    assert_eq!(item.highlights[0].hl_group, "DiagnosticSignWarn");
}

#[tokio::test]
async fn test_protocol_items_drop_extension_fields() {
    let raw = json!([{"bufnr": 1, "lnum": 0, "col": 0, "message": "m"}]);
    let host = FakeHost::new(HostKind::Nvim).with_backend(ClientName::NvimLsp, None, raw);
    let source = DiagnosticSource::new(host);

    let mut batches = gather(&source, params(ClientName::NvimLsp, None), context(1)).await;
    let item = batches.remove(0).remove(0).into_protocol();

    assert_eq!(item.action.buf_nr, Some(1));
    let data = serde_json::to_value(&item.data).unwrap();
    assert!(data.get("bufNr").is_none());
    assert!(data.get("path").is_none());
    assert_eq!(data["message"], "m");
}
