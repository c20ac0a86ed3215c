//! Terminal rendering of the preview pane.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

/// Inline emphasis carried by a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    text: String,
    style: InlineStyle,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }

    fn width(&self) -> usize {
        self.text.width()
    }

    fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// What block a preview line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    ListItem,
    Quote,
    Code,
    Table,
    Rule,
    Image,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    kind: LineKind,
    spans: Vec<StyledText>,
}

impl PreviewLine {
    fn new(kind: LineKind, spans: Vec<StyledText>) -> Self {
        Self { kind, spans }
    }

    fn blank(prefix: &str) -> Self {
        let prefix = prefix.trim_end();
        let spans = if prefix.is_empty() {
            Vec::new()
        } else {
            vec![StyledText::plain(prefix)]
        };
        Self::new(LineKind::Blank, spans)
    }

    pub const fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn spans(&self) -> &[StyledText] {
        &self.spans
    }

    /// The line's text without styling.
    pub fn content(&self) -> String {
        self.spans.iter().map(StyledText::text).collect()
    }
}

/// The rendered preview of a document at a given width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    lines: Vec<PreviewLine>,
    width: u16,
}

impl Preview {
    /// Render `source` wrapped to `width` columns.
    pub fn render(source: &str, width: u16) -> Self {
        let mut options = Options::default();
        super::configure(&mut options);
        let arena = Arena::new();
        let root = parse_document(&arena, source, &options);

        let wrap = usize::from(width.max(8));
        let mut lines = Vec::new();
        for child in root.children() {
            render_block(child, &Prefix::none(), wrap, &mut lines);
        }
        while lines.last().is_some_and(|l: &PreviewLine| l.kind == LineKind::Blank) {
            lines.pop();
        }
        Self { lines, width }
    }

    pub fn lines(&self) -> &[PreviewLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Lines visible from `offset` for `height` rows.
    pub fn visible_lines(&self, offset: usize, height: usize) -> &[PreviewLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(height).min(self.lines.len());
        &self.lines[start..end]
    }
}

/// Leading text for the first and following lines of a block.
#[derive(Debug, Clone)]
struct Prefix {
    first: String,
    rest: String,
    quoted: bool,
    listed: bool,
}

impl Prefix {
    const fn none() -> Self {
        Self {
            first: String::new(),
            rest: String::new(),
            quoted: false,
            listed: false,
        }
    }

    fn continuation(&self) -> Self {
        Self {
            first: self.rest.clone(),
            rest: self.rest.clone(),
            quoted: self.quoted,
            listed: self.listed,
        }
    }

    fn nested(&self, marker: &str) -> Self {
        Self {
            first: format!("{}{marker}", self.first),
            rest: format!("{}{}", self.rest, " ".repeat(marker.width())),
            quoted: self.quoted,
            listed: true,
        }
    }

    fn quoted(&self) -> Self {
        Self {
            first: format!("{}│ ", self.first),
            rest: format!("{}│ ", self.rest),
            quoted: true,
            listed: self.listed,
        }
    }

    const fn kind_or(&self, kind: LineKind) -> LineKind {
        if self.quoted {
            LineKind::Quote
        } else if self.listed {
            LineKind::ListItem
        } else {
            kind
        }
    }
}

fn push_blank(lines: &mut Vec<PreviewLine>, prefix: &str) {
    if lines.is_empty() || lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
        return;
    }
    lines.push(PreviewLine::blank(prefix));
}

fn render_block<'a>(node: &'a AstNode<'a>, prefix: &Prefix, wrap: usize, lines: &mut Vec<PreviewLine>) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let mut text = vec![StyledText::plain(format!(
                "{} ",
                "#".repeat(usize::from(heading.level))
            ))];
            for logical in collect_inline(node) {
                text.extend(logical);
            }
            let kind = LineKind::Heading(heading.level);
            push_wrapped(&text, prefix, kind, wrap, lines);
            push_blank(lines, &prefix.rest);
        }
        NodeValue::Paragraph => {
            let kind = if paragraph_is_image_only(node) {
                LineKind::Image
            } else {
                prefix.kind_or(LineKind::Paragraph)
            };
            let mut current = prefix.clone();
            for logical in collect_inline(node) {
                push_wrapped(&logical, &current, kind, wrap, lines);
                current = current.continuation();
            }
            // List items stay tight.
            if !prefix.listed {
                push_blank(lines, &prefix.rest);
            }
        }
        NodeValue::CodeBlock(code_block) => {
            let kind = if prefix.quoted {
                LineKind::Quote
            } else {
                LineKind::Code
            };
            let mut first = true;
            for source_line in code_block.literal.lines() {
                let lead = if first { &prefix.first } else { &prefix.rest };
                first = false;
                lines.push(PreviewLine::new(
                    kind,
                    vec![
                        StyledText::plain(lead.clone()),
                        StyledText::new(
                            format!("  {source_line}"),
                            InlineStyle {
                                code: true,
                                ..InlineStyle::default()
                            },
                        ),
                    ],
                ));
            }
            push_blank(lines, &prefix.rest);
        }
        NodeValue::BlockQuote => {
            let inner = prefix.quoted();
            let mut child_prefix = inner.clone();
            for child in node.children() {
                render_block(child, &child_prefix, wrap, lines);
                child_prefix = inner.continuation();
            }
            while lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
                lines.pop();
            }
            push_blank(lines, &prefix.rest);
        }
        NodeValue::List(list) => {
            let count = node.children().count();
            let last_number = list.start + count.saturating_sub(1);
            let number_width = last_number.to_string().len();
            let delimiter = match list.delimiter {
                ListDelimType::Paren => ')',
                ListDelimType::Period => '.',
            };
            let mut item_prefix = prefix.clone();
            for (index, item) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => format!(
                        "{:>number_width$}{delimiter} ",
                        list.start + index
                    ),
                };
                render_item(item, &item_prefix.nested(&marker), wrap, lines);
                item_prefix = prefix.continuation();
            }
            push_blank(lines, &prefix.rest);
        }
        NodeValue::ThematicBreak => {
            let width = wrap.saturating_sub(prefix.first.width()).max(3);
            lines.push(PreviewLine::new(
                LineKind::Rule,
                vec![StyledText::plain(format!("{}{}", prefix.first, "─".repeat(width)))],
            ));
            push_blank(lines, &prefix.rest);
        }
        NodeValue::Table(table) => {
            for row in render_table(node, &table.alignments) {
                lines.push(PreviewLine::new(
                    LineKind::Table,
                    vec![StyledText::plain(format!("{}{row}", prefix.rest))],
                ));
            }
            push_blank(lines, &prefix.rest);
        }
        _ => {
            let mut current = prefix.clone();
            for child in node.children() {
                render_block(child, &current, wrap, lines);
                current = prefix.continuation();
            }
        }
    }
}

/// List items carry their marker on the first line; task items swap the
/// bullet for a checkbox.
fn render_item<'a>(item: &'a AstNode<'a>, prefix: &Prefix, wrap: usize, lines: &mut Vec<PreviewLine>) {
    let prefix = match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => {
            let checkbox = if symbol.is_some() { "☑ " } else { "☐ " };
            Prefix {
                first: format!("{}{checkbox}", prefix.first),
                rest: format!("{}  ", prefix.rest),
                ..prefix.clone()
            }
        }
        _ => prefix.clone(),
    };
    let mut current = prefix.clone();
    for child in item.children() {
        render_block(child, &current, wrap, lines);
        current = prefix.continuation();
    }
}

fn paragraph_is_image_only<'a>(node: &'a AstNode<'a>) -> bool {
    let mut saw_image = false;
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(_) => saw_image = true,
            NodeValue::Text(t) if t.trim().is_empty() => {}
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            _ => return false,
        }
    }
    saw_image
}

/// Inline content split at line breaks. Every newline in the source is a
/// break, matching the HTML output.
fn collect_inline<'a>(node: &'a AstNode<'a>) -> Vec<Vec<StyledText>> {
    let mut out = vec![Vec::new()];
    for child in node.children() {
        collect_inline_into(child, InlineStyle::default(), &mut out);
    }
    out
}

fn collect_inline_into<'a>(node: &'a AstNode<'a>, style: InlineStyle, out: &mut Vec<Vec<StyledText>>) {
    let push = |out: &mut Vec<Vec<StyledText>>, span: StyledText| {
        if let Some(line) = out.last_mut() {
            line.push(span);
        }
    };
    match &node.data.borrow().value {
        NodeValue::Text(t) => push(out, StyledText::new(t.clone(), style)),
        NodeValue::Code(code) => push(
            out,
            StyledText::new(
                code.literal.clone(),
                InlineStyle {
                    code: true,
                    ..style
                },
            ),
        ),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(Vec::new()),
        NodeValue::Emph => recurse(node, InlineStyle { emphasis: true, ..style }, out),
        NodeValue::Strong => recurse(node, InlineStyle { strong: true, ..style }, out),
        NodeValue::Strikethrough => {
            recurse(node, InlineStyle { strikethrough: true, ..style }, out);
        }
        NodeValue::Link(_) => recurse(node, InlineStyle { link: true, ..style }, out),
        NodeValue::Image(image) => {
            let alt = plain_text(node);
            let label = if alt.is_empty() { image.url.clone() } else { alt };
            push(
                out,
                StyledText::new(format!("[Image: {label}]"), InlineStyle { link: true, ..style }),
            );
        }
        _ => recurse(node, style, out),
    }
}

fn recurse<'a>(node: &'a AstNode<'a>, style: InlineStyle, out: &mut Vec<Vec<StyledText>>) {
    for child in node.children() {
        collect_inline_into(child, style, out);
    }
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for logical in collect_inline(node) {
        if !text.is_empty() {
            text.push(' ');
        }
        for span in logical {
            text.push_str(span.text());
        }
    }
    text
}

/// Split styled runs into alternating word / whitespace tokens.
fn tokenize(spans: &[StyledText]) -> Vec<StyledText> {
    let mut tokens = Vec::new();
    for span in spans {
        let mut buf = String::new();
        let mut in_ws: Option<bool> = None;
        for ch in span.text.chars() {
            let ws = ch.is_whitespace();
            if in_ws.is_some_and(|prev| prev != ws) {
                tokens.push(StyledText::new(std::mem::take(&mut buf), span.style));
            }
            in_ws = Some(ws);
            buf.push(ch);
        }
        if !buf.is_empty() {
            tokens.push(StyledText::new(buf, span.style));
        }
    }
    tokens
}

/// Greedy word wrap of one logical line.
fn push_wrapped(
    spans: &[StyledText],
    prefix: &Prefix,
    kind: LineKind,
    wrap: usize,
    lines: &mut Vec<PreviewLine>,
) {
    let mut current = vec![StyledText::plain(prefix.first.clone())];
    let mut current_width = prefix.first.width();
    let mut has_word = false;

    for token in tokenize(spans) {
        let token_width = token.width();
        let is_ws = token.is_whitespace();
        if has_word && !is_ws && current_width + token_width > wrap {
            while current.last().is_some_and(StyledText::is_whitespace) && current.len() > 1 {
                current.pop();
            }
            lines.push(PreviewLine::new(kind, std::mem::take(&mut current)));
            current.push(StyledText::plain(prefix.rest.clone()));
            current_width = prefix.rest.width();
            has_word = false;
        }
        if is_ws && !has_word {
            continue;
        }
        current_width += token_width;
        current.push(token);
        has_word = has_word || !is_ws;
    }
    lines.push(PreviewLine::new(kind, current));
}

fn render_table<'a>(table: &'a AstNode<'a>, alignments: &[TableAlignment]) -> Vec<String> {
    let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
    for row in table.children() {
        let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells = row.children().map(plain_text).collect();
        rows.push((header, cells));
    }
    let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    let mut widths = vec![1usize; columns];
    for (_, cells) in &rows {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let border = |left: &str, mid: &str, right: &str| {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", inner.join(mid))
    };

    let mut out = vec![border("┌", "┬", "┐")];
    for (header, cells) in &rows {
        let rendered: Vec<String> = (0..columns)
            .map(|i| {
                let cell = cells.get(i).map_or("", String::as_str);
                let align = alignments.get(i).copied().unwrap_or(TableAlignment::None);
                format!(" {} ", pad_cell(cell, widths[i], align))
            })
            .collect();
        out.push(format!("│{}│", rendered.join("│")));
        if *header {
            out.push(border("├", "┼", "┤"));
        }
    }
    out.push(border("└", "┴", "┘"));
    out
}

fn pad_cell(cell: &str, width: usize, align: TableAlignment) -> String {
    let gap = width.saturating_sub(cell.width());
    match align {
        TableAlignment::Right => format!("{}{cell}", " ".repeat(gap)),
        TableAlignment::Center => {
            let left = gap / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(gap - left))
        }
        _ => format!("{cell}{}", " ".repeat(gap)),
    }
}
