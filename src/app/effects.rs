use std::path::Path;

use crate::app::{App, Message, Model};
use crate::import::read_document;
use crate::render::export_html;

impl App {
    /// Run the filesystem work a message asks for.
    ///
    /// Returns the follow-up message carrying the outcome, which the event
    /// loop feeds back through `update`.
    pub(super) fn handle_message_side_effects(model: &Model, msg: &Message) -> Option<Message> {
        match msg {
            Message::ImportFile(path) => Some(import_message(path)),
            Message::ExportHtml => Some(export_message(&model.document, &model.export_dir)),
            _ => None,
        }
    }
}

pub(super) fn import_message(path: &Path) -> Message {
    match read_document(path) {
        Ok(text) => {
            tracing::info!(path = %path.display(), "imported document");
            Message::FileLoaded(text)
        }
        Err(err) if err.is_rejection() => Message::ImportRejected(err.to_string()),
        Err(err) => {
            tracing::warn!(error = %err, "import failed");
            Message::ImportFailed(format!("Open failed: {err}"))
        }
    }
}

fn export_message(document: &str, dir: &Path) -> Message {
    match export_html(document, dir) {
        Ok(path) => Message::Exported(path),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "export failed");
            Message::ExportFailed(format!("Export failed: {err:#}"))
        }
    }
}
