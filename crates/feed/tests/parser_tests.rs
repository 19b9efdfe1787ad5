// ABOUTME: Integration tests for RSS and Atom podcast parsing.
// ABOUTME: Covers fallback fields, canonical URLs, episode filtering, and date defaulting.

use castparse_feed::{
    classify, parse_feed_bytes, CancellationToken, FeedError, FeedFormat, NoRetrieval,
    PodcastParser,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

const PODCAST_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
    <channel>
        <title>Tech Podcast</title>
        <link>https://podcast.example.com</link>
        <description>A podcast about technology</description>
        <copyright>2024 Example Media</copyright>
        <image>
            <url>https://podcast.example.com/cover.jpg</url>
        </image>
        <itunes:new-feed-url>https://feeds.example.com/tech</itunes:new-feed-url>
        <itunes:author>Jane Host</itunes:author>
        <itunes:owner>
            <itunes:name>Example Media</itunes:name>
            <itunes:email>podcasts@example.com</itunes:email>
        </itunes:owner>
        <item>
            <title>Episode 1</title>
            <description>Welcome to the podcast!</description>
            <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
            <itunes:author>Guest Speaker</itunes:author>
            <enclosure url="https://cdn.example.com/ep1.mp3" type="audio/mpeg" length="12345"/>
            <itunes:duration>01:02:03</itunes:duration>
        </item>
        <item>
            <title>Show notes only</title>
            <description>No audio attached.</description>
            <pubDate>Tue, 16 Jan 2024 10:00:00 +0000</pubDate>
        </item>
        <item>
            <title>Episode 2</title>
            <pubDate>Wed, 17 Jan 2024 10:00:00 +0000</pubDate>
            <enclosure url="https://cdn.example.com/ep2.mp3" type="audio/mpeg"/>
            <itunes:duration>45</itunes:duration>
        </item>
    </channel>
</rss>"#;

#[test]
fn test_podcast_rss_metadata() {
    let feed = parse_feed_bytes(PODCAST_RSS.as_bytes(), "https://example.com/fetched.xml").unwrap();

    assert_eq!(feed.title, "Tech Podcast");
    assert_eq!(feed.link, "https://podcast.example.com");
    assert_eq!(feed.url, "https://feeds.example.com/tech");
    assert_eq!(feed.description, "A podcast about technology");
    assert_eq!(feed.copyright, "2024 Example Media");
    assert_eq!(feed.image_url_large, "https://podcast.example.com/cover.jpg");
    assert_eq!(feed.owner_name, "Example Media");
    assert_eq!(feed.owner_email, "podcasts@example.com");
}

#[test]
fn test_podcast_rss_episodes() {
    let feed = parse_feed_bytes(PODCAST_RSS.as_bytes(), "https://example.com/fetched.xml").unwrap();

    // The item without an enclosure is dropped.
    assert_eq!(feed.episodes.len(), 2);

    let first = &feed.episodes[0];
    assert_eq!(first.title, "Episode 1");
    assert_eq!(first.description, "Welcome to the podcast!");
    assert_eq!(first.author, "Guest Speaker");
    assert_eq!(first.url, "https://cdn.example.com/ep1.mp3");
    assert_eq!(first.duration_secs, 3723);
    assert_eq!(first.published, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());

    let second = &feed.episodes[1];
    assert_eq!(second.title, "Episode 2");
    assert_eq!(second.author, "Example Media");
    assert_eq!(second.duration_secs, 45);
    assert!(feed.episodes.iter().all(|e| !e.url.is_empty()));
}

#[test]
fn test_canonical_url_defaults_to_source() {
    let rss = r#"<rss version="2.0"><channel><title>Plain</title></channel></rss>"#;
    let feed = parse_feed_bytes(rss.as_bytes(), "https://example.com/plain.xml").unwrap();
    assert_eq!(feed.url, "https://example.com/plain.xml");
    assert_eq!(feed.owner_name, "Plain");
    assert_eq!(feed.description, "");
}

#[test]
fn test_invalid_date_defaults_to_now() {
    let rss = r#"<rss version="2.0"><channel><title>T</title>
        <item>
            <title>Bad date</title>
            <pubDate>the day after tomorrow</pubDate>
            <enclosure url="https://cdn.example.com/bad.mp3"/>
        </item>
        <item>
            <title>No date</title>
            <enclosure url="https://cdn.example.com/none.mp3"/>
        </item>
    </channel></rss>"#;

    let before = Utc::now();
    let feed = parse_feed_bytes(rss.as_bytes(), "https://example.com/feed.xml").unwrap();
    let after = Utc::now();

    assert_eq!(feed.episodes.len(), 2);
    for episode in &feed.episodes {
        assert!(episode.published >= before && episode.published <= after);
    }
}

#[test]
fn test_parsing_is_repeatable() {
    let first = parse_feed_bytes(PODCAST_RSS.as_bytes(), "https://example.com/a.xml").unwrap();
    let second = parse_feed_bytes(PODCAST_RSS.as_bytes(), "https://example.com/a.xml").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_load_returns_single_feed_for_rss() {
    let parser = PodcastParser::new(NoRetrieval);
    let cancel = CancellationToken::new();

    let feeds = parser
        .load(PODCAST_RSS.as_bytes(), "https://example.com/fetched.xml", true, &cancel)
        .unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].episodes.len(), 2);

    let probe = parser
        .load(PODCAST_RSS.as_bytes(), "https://example.com/fetched.xml", false, &cancel)
        .unwrap();
    assert_eq!(probe.len(), 1);
    assert!(probe[0].episodes.is_empty());
    assert_eq!(probe[0].title, "Tech Podcast");
}

const PODCAST_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Cast</title>
    <subtitle>Episodes in Atom</subtitle>
    <link href="https://atom.example.com/"/>
    <id>https://atom.example.com/feed.atom</id>
    <author>
        <name>Atom Author</name>
        <email>atom@example.com</email>
    </author>
    <entry>
        <title>First entry</title>
        <summary>Audio entry</summary>
        <published>2024-02-01T08:30:00Z</published>
        <author><name>Entry Author</name></author>
        <link rel="alternate" type="text/html" href="https://atom.example.com/1"/>
        <link rel="enclosure" type="audio/mpeg" href="https://cdn.example.com/atom1.mp3"/>
    </entry>
    <entry>
        <title>Text only</title>
        <published>2024-02-02T08:30:00Z</published>
        <link rel="alternate" href="https://atom.example.com/2"/>
    </entry>
    <entry>
        <title>Second audio</title>
        <updated>2024-02-03T08:30:00+01:00</updated>
        <link rel="enclosure" type="audio/x-m4a" href="https://cdn.example.com/atom3.m4a"/>
    </entry>
</feed>"#;

#[test]
fn test_atom_feed() {
    let feed = parse_feed_bytes(PODCAST_ATOM.as_bytes(), "https://example.com/fetched.atom").unwrap();

    assert_eq!(feed.title, "Atom Cast");
    assert_eq!(feed.link, "https://atom.example.com/");
    assert_eq!(feed.url, "https://atom.example.com/feed.atom");
    assert_eq!(feed.description, "Episodes in Atom");
    assert_eq!(feed.owner_name, "Atom Author");
    assert_eq!(feed.owner_email, "atom@example.com");

    assert_eq!(feed.episodes.len(), 2);
    let first = &feed.episodes[0];
    assert_eq!(first.title, "First entry");
    assert_eq!(first.description, "Audio entry");
    assert_eq!(first.author, "Entry Author");
    assert_eq!(first.url, "https://cdn.example.com/atom1.mp3");
    assert_eq!(first.published, Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap());

    let second = &feed.episodes[1];
    assert_eq!(second.title, "Second audio");
    assert_eq!(second.author, "Atom Author");
    assert_eq!(second.published, Utc.with_ymd_and_hms(2024, 2, 3, 7, 30, 0).unwrap());
}

#[test]
fn test_atom_without_id_uses_source_url() {
    let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>No id</title></feed>"#;
    let feed = parse_feed_bytes(atom.as_bytes(), "https://example.com/src.atom").unwrap();
    assert_eq!(feed.url, "https://example.com/src.atom");
}

#[test]
fn test_classifier_end_to_end() {
    assert_eq!(classify(PODCAST_RSS.as_bytes()), FeedFormat::Rss);
    assert_eq!(classify(PODCAST_ATOM.as_bytes()), FeedFormat::Atom);
    assert_eq!(classify(b"<opml version=\"2.0\"><body/></opml>"), FeedFormat::Outline);
    assert_eq!(classify(b"\xff\xfe garbage"), FeedFormat::Unrecognized);

    let parser = PodcastParser::new(NoRetrieval);
    let feeds = parser
        .load(b"\xff\xfe garbage", "https://example.com", true, &CancellationToken::new())
        .unwrap();
    assert!(feeds.is_empty());
}

#[test]
fn test_declared_latin1_feed_is_transcoded() {
    let mut rss = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n".to_vec();
    rss.extend_from_slice(
        b"<rss version=\"2.0\"><channel><title>Caf\xE9 Society</title>\
          <item><title>Cr\xE8me br\xFBl\xE9e</title>\
          <enclosure url=\"https://cdn.example.com/creme.mp3\"/></item>\
          </channel></rss>",
    );

    assert_eq!(classify(&rss), FeedFormat::Rss);

    let feed = parse_feed_bytes(&rss, "https://example.com/latin1.xml").unwrap();
    assert_eq!(feed.title, "Caf\u{e9} Society");
    assert_eq!(feed.episodes[0].title, "Cr\u{e8}me br\u{fb}l\u{e9}e");

    let feeds = PodcastParser::new(NoRetrieval)
        .load(&rss, "https://example.com/latin1.xml", true, &CancellationToken::new())
        .unwrap();
    assert_eq!(feeds.len(), 1);
}

#[test]
fn test_undeclared_invalid_utf8_is_read_lossily() {
    let rss = b"<rss version=\"2.0\"><channel><title>Caf\xE9</title></channel></rss>";
    let feed = parse_feed_bytes(rss, "https://example.com/broken.xml").unwrap();
    assert_eq!(feed.title, "Caf\u{fffd}");
}

#[test]
fn test_empty_source_url_needs_a_declared_url() {
    let plain = r#"<rss version="2.0"><channel><title>Plain</title></channel></rss>"#;
    let err = parse_feed_bytes(plain.as_bytes(), "").unwrap_err();
    assert!(matches!(err, FeedError::Invalid(_)));

    let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>No id</title></feed>"#;
    assert!(parse_feed_bytes(atom.as_bytes(), " ").is_err());

    let declared = r#"<rss version="2.0"><channel><title>Moved</title>
        <itunes:new-feed-url>https://feeds.example.com/moved</itunes:new-feed-url>
    </channel></rss>"#;
    let feed = parse_feed_bytes(declared.as_bytes(), "").unwrap();
    assert_eq!(feed.url, "https://feeds.example.com/moved");

    let feeds = PodcastParser::new(NoRetrieval)
        .load(plain.as_bytes(), "", true, &CancellationToken::new())
        .unwrap();
    assert!(feeds.is_empty());
}
