use crate::chat::ChatMessage;
use crate::error::Result;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub(crate) const TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// BOM, a `Sender,Message,Time` header, then one fully quoted row per message.
pub fn write_transcript<W: Write>(mut writer: W, messages: &[ChatMessage]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(["Sender", "Message", "Time"])?;
    for message in messages {
        let time = message.timestamp.format(TIME_FORMAT).to_string();
        csv.write_record([message.sender.label(), message.text.as_str(), time.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Conversation;
    use crate::remote::chat::ChatReply;

    #[test]
    fn quotes_every_cell() {
        let mut chat = Conversation::new();
        chat.begin_send(r#"Is "ICMS" due, or not?"#).unwrap();
        chat.receive(ChatReply {
            text: "Yes".to_string(),
            is_error: false,
        });

        let mut out = Vec::new();
        write_transcript(&mut out, chat.messages()).unwrap();

        assert!(out.starts_with(UTF8_BOM));
        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#""Sender","Message","Time""#);
        assert!(lines[1].starts_with(r#""Fiscal AI","Hello!"#));
        assert!(lines[2].starts_with(r#""User","Is ""ICMS"" due, or not?","#));
        assert!(lines[3].starts_with(r#""Fiscal AI","Yes","#));
    }
}
