use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::domain::{Channel, Enclosure, Item};
use crate::errors::{PodcastError, PodcastResult};

const RSS: &[u8] = b"rss";
const CHANNEL: &[u8] = b"channel";
const ITEM: &[u8] = b"item";
const ENCLOSURE: &[u8] = b"enclosure";

/// Parse an RSS 2.0 document into a [`Channel`].
///
/// Element names are matched with their namespace prefix, so `itunes:title`
/// never shadows `title`. Unknown elements are ignored.
pub fn parse_channel(body: &[u8]) -> PodcastResult<Channel> {
    let mut reader = Reader::from_reader(body);

    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut channel: Option<Channel> = None;
    let mut item: Option<Item> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();

                if path.is_empty() && name != RSS {
                    return Err(PodcastError::Parse(format!(
                        "expected <rss> root element, found <{}>",
                        String::from_utf8_lossy(&name)
                    )));
                }

                if at(&path, &[RSS]) && name == CHANNEL && channel.is_none() {
                    channel = Some(Channel::default());
                } else if at(&path, &[RSS, CHANNEL]) && name == ITEM {
                    item = Some(Item::default());
                } else if at(&path, &[RSS, CHANNEL, ITEM]) && name == ENCLOSURE {
                    if let Some(ref mut item) = item {
                        item.enclosures.push(read_enclosure(&e)?);
                    }
                }

                // Nested markup inside a field keeps accumulating into that field.
                if at(&path, &[RSS, CHANNEL]) || at(&path, &[RSS, CHANNEL, ITEM]) {
                    text.clear();
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                if at(&path, &[RSS, CHANNEL, ITEM]) && e.name().as_ref() == ENCLOSURE {
                    if let Some(ref mut item) = item {
                        item.enclosures.push(read_enclosure(&e)?);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                text.push_str(&unescape_lenient(&String::from_utf8_lossy(&e)));
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(_)) => {
                let name = path.pop().unwrap_or_default();
                let value = text.trim();

                if at(&path, &[RSS, CHANNEL, ITEM]) {
                    if let Some(ref mut item) = item {
                        assign_item_field(item, &name, value);
                    }
                } else if at(&path, &[RSS, CHANNEL]) {
                    if name == ITEM {
                        if let (Some(finished), Some(channel)) = (item.take(), channel.as_mut()) {
                            channel.items.push(finished);
                        }
                    } else if let Some(ref mut channel) = channel {
                        assign_channel_field(channel, &name, value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PodcastError::Parse(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !path.is_empty() {
        return Err(PodcastError::Parse(
            "unexpected end of document".to_string(),
        ));
    }

    channel.ok_or_else(|| PodcastError::Parse("document has no <channel>".to_string()))
}

fn at(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

fn assign_channel_field(channel: &mut Channel, name: &[u8], value: &str) {
    match name {
        b"title" => channel.title = value.to_string(),
        b"link" => channel.link = value.to_string(),
        b"description" => channel.description = value.to_string(),
        b"lastBuildDate" => channel.last_build_date = value.to_string(),
        _ => {}
    }
}

fn assign_item_field(item: &mut Item, name: &[u8], value: &str) {
    match name {
        b"title" => item.title = value.to_string(),
        b"link" => item.link = value.to_string(),
        b"guid" => item.guid = value.to_string(),
        b"pubDate" => item.pub_date = value.to_string(),
        b"author" => item.author = value.to_string(),
        b"description" => item.description = value.to_string(),
        _ => {}
    }
}

fn read_enclosure(e: &BytesStart<'_>) -> PodcastResult<Enclosure> {
    let mut enclosure = Enclosure::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| PodcastError::Parse(format!("bad enclosure attribute: {}", err)))?;
        let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));

        match attr.key.as_ref() {
            b"url" => enclosure.url = value.trim().to_string(),
            b"length" => enclosure.length = value.trim().parse().ok(),
            b"type" => enclosure.mime_type = value.trim().to_string(),
            _ => {}
        }
    }

    Ok(enclosure)
}

/// Decode entity references one at a time. HTML entities such as `&nbsp;`
/// are common in feeds; a reference that can't be resolved stays as written
/// without affecting its neighbours.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let resolved = tail
            .find(';')
            .and_then(|end| resolve_entity(&tail[1..end]).map(|value| (value, end)));
        match resolved {
            Some((value, end)) => {
                out.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    out
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse().ok(),
        }?;
        return char::from_u32(code).map(String::from);
    }
    resolve_html5_entity(name).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sample podcast feed (iTunes-style, with namespaced duplicates of core fields)
    const SAMPLE_PODCAST: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>The Rust Hour</title>
    <atom:link href="https://rust.example/feed.xml" rel="self" type="application/rss+xml"/>
    <link>https://rust.example/</link>
    <itunes:title>Rust Hour (iTunes)</itunes:title>
    <description><![CDATA[<p>Weekly talk about <b>Rust</b>.</p>]]></description>
    <lastBuildDate>Tue, 10 Jan 2006 08:00:00 GMT</lastBuildDate>
    <item>
      <title>Episode 2: Lifetimes</title>
      <itunes:title>Lifetimes</itunes:title>
      <link>https://rust.example/2</link>
      <guid isPermaLink="false">rust-hour-2</guid>
      <pubDate>Tue, 10 Jan 2006 08:00:00 GMT</pubDate>
      <author>host@rust.example (Host)</author>
      <description>Borrowing &amp; lifetimes explained.</description>
      <enclosure url="https://cdn.rust.example/ep2.mp3?src=rss" length="123456" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode 1: Ownership</title>
      <guid>rust-hour-1</guid>
      <pubDate>Tue, 03 Jan 2006 08:00:00 GMT</pubDate>
      <enclosure url="https://cdn.rust.example/ep1.mp3" length="not-a-number" type="audio/mpeg"></enclosure>
      <enclosure url="https://cdn.rust.example/ep1-bonus.mp3" type="audio/mpeg"/>
    </item>
    <item>
      <title>Show notes only</title>
      <pubDate>Mon, 02 Jan 2006 08:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_channel_metadata() {
        let channel = parse_channel(SAMPLE_PODCAST).unwrap();

        assert_eq!(channel.title, "The Rust Hour");
        assert_eq!(channel.link, "https://rust.example/");
        assert_eq!(channel.description, "<p>Weekly talk about <b>Rust</b>.</p>");
        assert_eq!(channel.last_build_date, "Tue, 10 Jan 2006 08:00:00 GMT");
    }

    #[test]
    fn test_items_keep_feed_order() {
        let channel = parse_channel(SAMPLE_PODCAST).unwrap();

        let titles: Vec<&str> = channel.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Episode 2: Lifetimes", "Episode 1: Ownership", "Show notes only"]
        );
    }

    #[test]
    fn test_item_fields() {
        let channel = parse_channel(SAMPLE_PODCAST).unwrap();
        let item = &channel.items[0];

        assert_eq!(item.link, "https://rust.example/2");
        assert_eq!(item.guid, "rust-hour-2");
        assert_eq!(item.pub_date, "Tue, 10 Jan 2006 08:00:00 GMT");
        assert_eq!(item.author, "host@rust.example (Host)");
        assert_eq!(item.description, "Borrowing & lifetimes explained.");
    }

    #[test]
    fn test_enclosures() {
        let channel = parse_channel(SAMPLE_PODCAST).unwrap();

        let first = &channel.items[0].enclosures;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].url, "https://cdn.rust.example/ep2.mp3?src=rss");
        assert_eq!(first[0].length, Some(123456));
        assert_eq!(first[0].mime_type, "audio/mpeg");

        let second = &channel.items[1].enclosures;
        assert_eq!(second.len(), 2, "both enclosures should be kept in order");
        assert_eq!(second[0].length, None);
        assert_eq!(second[1].url, "https://cdn.rust.example/ep1-bonus.mp3");

        assert!(channel.items[2].enclosures.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let body = br#"<rss><channel><title>Broken</channel></rss>"#;
        assert!(matches!(parse_channel(body), Err(PodcastError::Parse(_))));
    }

    #[test]
    fn test_truncated_document_is_a_parse_error() {
        let body = br#"<rss version="2.0"><channel><title>Cut off</title><item>"#;
        assert!(matches!(parse_channel(body), Err(PodcastError::Parse(_))));
    }

    #[test]
    fn test_non_rss_root_is_rejected() {
        let body = br#"<feed xmlns="http://www.w3.org/2005/Atom"><title>Atom</title></feed>"#;
        match parse_channel(body) {
            Err(PodcastError::Parse(msg)) => assert!(msg.contains("<feed>")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_channel_is_rejected() {
        assert!(matches!(
            parse_channel(br#"<rss version="2.0"></rss>"#),
            Err(PodcastError::Parse(_))
        ));
        assert!(matches!(parse_channel(b""), Err(PodcastError::Parse(_))));
    }

    #[test]
    fn test_empty_channel() {
        let channel = parse_channel(br#"<rss version="2.0"><channel/></rss>"#);
        // A self-closing channel carries nothing, so it counts as missing.
        assert!(channel.is_err());

        let channel = parse_channel(br#"<rss version="2.0"><channel></channel></rss>"#).unwrap();
        assert!(channel.items.is_empty());
        assert_eq!(channel.title, "");
    }

    #[test]
    fn test_html_entities_decode_alongside_xml_entities() {
        let body = br#"<rss version="2.0"><channel>
  <title>Tom &amp; Jerry&nbsp;Show</title>
  <item>
    <title>Caf&eacute; &#8211; &#x41;&lt;B&gt; &bogus;</title>
    <enclosure url="https://a.example/ep.mp3?a=1&amp;b=2"/>
  </item>
</channel></rss>"#;

        let channel = parse_channel(body).unwrap();

        assert_eq!(channel.title, "Tom & Jerry\u{a0}Show");
        assert_eq!(channel.items[0].title, "Caf\u{e9} \u{2013} A<B> &bogus;");
        assert_eq!(
            channel.items[0].enclosures[0].url,
            "https://a.example/ep.mp3?a=1&b=2"
        );
    }
}
