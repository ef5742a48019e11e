//! Plain prose to styled HTML

/// Placeholder paragraph for blank input
pub const EMPTY_PLACEHOLDER: &str = "<p>没有内容</p>";

const FRAME_STYLE: &str = "font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; \
line-height: 1.8; color: #2c3e50; max-width: 800px; margin: 0 auto; padding: 20px; \
background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%); border-radius: 10px; \
box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);";

const CARD_STYLE: &str = "background: white; padding: 25px; border-radius: 8px; \
box-shadow: 0 2px 4px rgba(0, 0, 0, 0.05);";

/// Split text into blocks separated by blank lines
///
/// A line containing only whitespace counts as blank. Each block is trimmed
/// as a whole, so indentation inside a block is kept along with its single
/// line breaks.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            push_block(&mut blocks, &mut current);
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &mut current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &mut Vec<&str>) {
    if !lines.is_empty() {
        blocks.push(lines.join("\n").trim().to_string());
        lines.clear();
    }
}

/// Number of paragraphs `render` will emit for this text
pub fn paragraph_count(text: &str) -> usize {
    split_blocks(text).len()
}

/// Render plain prose as a two-level styled HTML document
///
/// One `<p>` per paragraph, single line breaks become `<br>`. The output is
/// always an outer frame `div` holding an inner card `div`.
pub fn render(text: &str) -> String {
    let blocks = split_blocks(text);

    let content = if blocks.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        blocks
            .iter()
            .map(|block| {
                let lines: Vec<String> = block.lines().map(escape_html).collect();
                format!("<p>{}</p>", lines.join("<br>"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "<div class=\"research-frame\" style=\"{}\">\n\
         <div class=\"research-card\" style=\"{}\">\n{}\n</div>\n</div>",
        FRAME_STYLE, CARD_STYLE, content
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
