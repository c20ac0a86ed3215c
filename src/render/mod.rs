//! Markdown rendering.
//!
//! Both outputs come from the same comrak configuration:
//! - [`markdown_to_html`]: the HTML used for export
//! - [`Preview`]: wrapped, styled lines for the terminal preview pane

mod html;
mod preview;

pub use html::{EXPORT_FILE_NAME, export_html, markdown_to_html};
pub use preview::{InlineStyle, LineKind, Preview, PreviewLine, StyledText};

use comrak::Options;

/// GFM extensions plus newline-as-line-break, applied to both outputs.
fn configure(options: &mut Options) {
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.hardbreaks = true;
}
