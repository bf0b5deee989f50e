//! LSP Backend implementation

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::{
    Diagnostic, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, DocumentFormattingParams,
    ExecuteCommandOptions, ExecuteCommandParams, InitializeParams, InitializeResult,
    InitializedParams, OneOf, Position, Range, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextEdit, Url, WorkspaceEdit,
};
use tower_lsp::{Client, LanguageServer};

use crate::diagnostics::DiagnosticCollector;
use crate::document::{Command, CommandOutcome};
use crate::parser::{IniParser, ParserConfig};
use crate::session::{EditMode, EditSession};

/// Workspace command that applies a document [`Command`] to an open file
pub const APPLY_COMMAND: &str = "ini.applyCommand";

/// Argument of [`APPLY_COMMAND`]
#[derive(Debug, Deserialize)]
struct ApplyCommandParams {
    uri: Url,
    command: Command,
}

/// An open text document and its editing session
#[derive(Clone)]
struct OpenDocument {
    /// Text as last seen by the client
    text: String,
    session: EditSession,
}

impl OpenDocument {
    fn new(text: String, parser: IniParser) -> Self {
        let session = EditSession::open(&text, parser);
        Self { text, session }
    }

    /// Take the client's full text. Returns false when it is already the
    /// current text, as for the echo of an edit the server pushed; the
    /// session is then left alone.
    fn update(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        self.session.set_text(&text);
        self.text = text;
        true
    }

    /// Put `previous` back after the client failed to apply `pushed`.
    ///
    /// Nothing changes if the text has moved on from `pushed`.
    fn restore(&mut self, previous: OpenDocument, pushed: &str) -> bool {
        if self.text != pushed {
            return false;
        }
        *self = previous;
        true
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        compute_diagnostics(&self.session, &self.text)
    }
}

/// The LSP backend that handles all language server requests
pub struct Backend {
    /// The LSP client for sending notifications
    client: Client,
    /// Dialect settings from the client's initialization options
    parser: Arc<RwLock<IniParser>>,
    /// Map of document URIs to their state
    documents: Arc<RwLock<HashMap<Url, OpenDocument>>>,
}

impl Backend {
    /// Create a new backend instance
    pub fn new(client: Client) -> Self {
        Self {
            client,
            parser: Arc::new(RwLock::new(IniParser::default())),
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a fresh session for the text and publish its diagnostics
    async fn open_document(&self, uri: Url, text: String, version: Option<i32>) {
        let parser = self.parser.read().await.clone();
        let doc = OpenDocument::new(text, parser);
        let diagnostics = doc.diagnostics();

        {
            let mut docs = self.documents.write().await;
            docs.insert(uri.clone(), doc);
        }

        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    /// Apply a command to an open document and push the new text to the client
    async fn apply_command(&self, params: ApplyCommandParams) -> Result<CommandOutcome> {
        let ApplyCommandParams { uri, command } = params;

        let (outcome, edit, previous) = {
            let mut docs = self.documents.write().await;
            let doc = docs
                .get_mut(&uri)
                .ok_or_else(|| Error::invalid_params(format!("document is not open: {uri}")))?;

            let previous = doc.clone();
            let outcome = doc
                .session
                .apply(command)
                .map_err(|err| Error::invalid_params(err.to_string()))?;
            let new_text = doc.session.text();
            let edit = TextEdit::new(full_range(&doc.text), new_text.clone());
            doc.text = new_text;
            (outcome, edit, previous)
        };

        let pushed = edit.new_text.clone();
        let changes = HashMap::from([(uri.clone(), vec![edit])]);
        let error = match self.client.apply_edit(WorkspaceEdit::new(changes)).await {
            Ok(response) if response.applied => return Ok(outcome),
            Ok(response) => {
                tracing::warn!(
                    "Client rejected edit for {}: {}",
                    uri,
                    response.failure_reason.as_deref().unwrap_or("no reason given")
                );
                Error::invalid_params("client rejected the edit")
            }
            Err(err) => {
                tracing::warn!("Failed to send edit for {}: {}", uri, err);
                err
            }
        };

        let mut docs = self.documents.write().await;
        if let Some(doc) = docs.get_mut(&uri) {
            if !doc.restore(previous, &pushed) {
                tracing::debug!("Not rolling back {}: text changed since the edit", uri);
            }
        }
        Err(error)
    }
}

/// Diagnostics for a session opened from `text`
fn compute_diagnostics(session: &EditSession, text: &str) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    if let Some(error) = session.parse_error() {
        collector.add_parse_error(error, text);
    }
    collector.into_diagnostics()
}

/// Range spanning all of `text`
fn full_range(text: &str) -> Range {
    let last_line = text.matches('\n').count() as u32;
    let last_width = text
        .rsplit('\n')
        .next()
        .map(|line| line.encode_utf16().count() as u32)
        .unwrap_or(0);
    Range::new(Position::new(0, 0), Position::new(last_line, last_width))
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            match serde_json::from_value::<ParserConfig>(options) {
                Ok(config) => {
                    tracing::debug!(?config, "Using client parser configuration");
                    *self.parser.write().await = IniParser::new(config);
                }
                Err(err) => tracing::warn!("Ignoring invalid initialization options: {}", err),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![APPLY_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "ini-inspect".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        tracing::debug!("Document opened: {}", uri);

        self.open_document(uri, params.text_document.text, Some(version))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Get the full text from the changes (we use FULL sync)
        let Some(change) = params.content_changes.into_iter().next() else {
            return;
        };
        tracing::debug!("Document changed: {}", uri);

        let diagnostics = {
            let mut docs = self.documents.write().await;
            let Some(doc) = docs.get_mut(&uri) else {
                drop(docs);
                self.open_document(uri, change.text, Some(version)).await;
                return;
            };
            if !doc.update(change.text) {
                tracing::debug!("Text already current: {}", uri);
                return;
            }
            doc.diagnostics()
        };

        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document saved: {}", uri);

        if let Some(doc) = self.documents.write().await.get_mut(&uri) {
            doc.session.mark_saved();
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);

        // Remove document from our state
        {
            let mut docs = self.documents.write().await;
            docs.remove(&uri);
        }

        // Clear diagnostics for this document
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let docs = self.documents.read().await;
        let Some(doc) = docs.get(&params.text_document.uri) else {
            return Ok(None);
        };
        if doc.session.mode() == EditMode::Raw {
            return Ok(None);
        }

        let formatted = doc.session.text();
        if formatted == doc.text {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(vec![TextEdit::new(full_range(&doc.text), formatted)]))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != APPLY_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        let argument = params
            .arguments
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_params("missing command argument"))?;
        let args: ApplyCommandParams =
            serde_json::from_value(argument).map_err(|err| Error::invalid_params(err.to_string()))?;

        tracing::debug!("Applying {:?} to {}", args.command, args.uri);

        let outcome = self.apply_command(args).await?;
        let value = serde_json::to_value(outcome).map_err(|_| Error::internal_error())?;
        Ok(Some(value))
    }
}
