//! Minimal PDF writer for conversation transcripts.
//!
//! Produces an uncompressed PDF 1.4 file using the standard Helvetica
//! fonts with WinAnsi encoding, so no font data needs to be embedded.

use crate::chat::{ChatMessage, Sender};
use chrono::{DateTime, Local};
use std::fmt::Write as _;

// A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

const MARGIN: f32 = 42.52;
const TOP: f32 = 56.69;
const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 56.69;
const LINE_HEIGHT: f32 = 19.84;
const BLOCK_GAP: f32 = 14.17;

const TITLE_SIZE: f32 = 16.0;
const DATE_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 11.0;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

pub const TITLE: &str = "Conversation - Fiscal AI Agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
struct TextLine {
    font: Font,
    size: f32,
    y: f32,
    text: String,
}

/// Characters of body text that fit between the margins.
fn line_capacity() -> usize {
    ((PAGE_WIDTH - 2.0 * MARGIN) / (BODY_SIZE * AVG_GLYPH_WIDTH)) as usize
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        lines.push(current);
    }
    lines
}

fn layout(messages: &[ChatMessage], exported_at: DateTime<Local>) -> Vec<Vec<TextLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = TOP;

    pages[0].push(TextLine {
        font: Font::Bold,
        size: TITLE_SIZE,
        y,
        text: TITLE.to_string(),
    });
    y += 28.35;
    pages[0].push(TextLine {
        font: Font::Regular,
        size: DATE_SIZE,
        y,
        text: format!("Date: {}", exported_at.format(super::csv::TIME_FORMAT)),
    });
    y += 42.52;

    let capacity = line_capacity();
    for message in messages {
        let font = match message.sender {
            Sender::User => Font::Bold,
            Sender::Bot => Font::Regular,
        };
        let lines = wrap_text(
            &format!("{}: {}", message.sender.label(), message.text),
            capacity,
        );

        // Keep a block on one page unless it is taller than a page.
        if y + lines.len() as f32 * LINE_HEIGHT > BOTTOM_LIMIT && y > TOP {
            pages.push(Vec::new());
            y = TOP;
        }
        for text in lines {
            if y + LINE_HEIGHT > BOTTOM_LIMIT {
                pages.push(Vec::new());
                y = TOP;
            }
            if let Some(page) = pages.last_mut() {
                page.push(TextLine {
                    font,
                    size: BODY_SIZE,
                    y,
                    text,
                });
            }
            y += LINE_HEIGHT;
        }
        y += BLOCK_GAP;
    }
    pages
}

/// Escape a string for a PDF literal, mapping Latin-1 to WinAnsi octal
/// escapes and anything else to `?`.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push(' '),
            ' '..='~' => out.push(c),
            c if (0xA0..=0xFF).contains(&(c as u32)) => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(lines: &[TextLine]) -> String {
    let mut stream = String::new();
    for line in lines {
        let _ = writeln!(
            stream,
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
            line.font.resource(),
            line.size,
            MARGIN,
            PAGE_HEIGHT - line.y,
            encode_text(&line.text)
        );
    }
    stream
}

fn assemble(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            id + 1
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, object);
    }

    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.into_bytes()
}

/// Render `messages` as a paginated PDF document.
pub fn render_transcript(messages: &[ChatMessage], exported_at: DateTime<Local>) -> Vec<u8> {
    assemble(&layout(messages, exported_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Conversation;
    use crate::remote::chat::ChatReply;

    fn conversation(replies: usize, reply_len: usize) -> Conversation {
        let mut chat = Conversation::new();
        for _ in 0..replies {
            chat.begin_send("Total (2024)?").unwrap();
            chat.receive(ChatReply {
                text: "valor ".repeat(reply_len),
                is_error: false,
            });
        }
        chat
    }

    fn page_count(pdf: &str) -> usize {
        pdf.matches("/Type /Page ").count()
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("one\ntwo", 80), vec!["one", "two"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn escapes_literals() {
        assert_eq!(encode_text("a(b)\\c"), "a\\(b\\)\\\\c");
        assert_eq!(encode_text("ação"), "a\\347\\343o");
        assert_eq!(encode_text("€"), "?");
    }

    #[test]
    fn writes_valid_skeleton() {
        let pdf = render_transcript(conversation(1, 3).messages(), Local::now());
        let text = String::from_utf8(pdf).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains(TITLE));
        assert!(text.contains("(User: Total \\(2024\\)?) Tj"));
        assert_eq!(page_count(&text), 1);

        let start = text.rfind("startxref\n").unwrap() + "startxref\n".len();
        let offset: usize = text[start..].lines().next().unwrap().parse().unwrap();
        assert!(text[offset..].starts_with("xref\n"));

        let first = text.find("1 0 obj").unwrap();
        assert!(text.contains(&format!("{:010} 00000 n ", first)));
    }

    #[test]
    fn long_transcripts_paginate() {
        let pdf = render_transcript(conversation(20, 60).messages(), Local::now());
        let text = String::from_utf8(pdf).unwrap();
        let pages = page_count(&text);
        assert!(pages > 1);
        assert!(text.contains(&format!("/Count {}", pages)));
    }
}
