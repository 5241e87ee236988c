//! End-to-end protocol sessions against a scripted in-memory server

use newswire::{Connection, NntpError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Create a connected client plus the server end of the pipe, with the
/// greeting already exchanged.
async fn connect(greeting: &str) -> (Connection<DuplexStream>, BufReader<DuplexStream>) {
    init_tracing();
    let (client_io, server_io) = tokio::io::duplex(8192);
    let mut server = BufReader::new(server_io);
    server.get_mut().write_all(greeting.as_bytes()).await.unwrap();
    let conn = Connection::handshake(client_io).await.unwrap();
    (conn, server)
}

async fn recv_command(server: &mut BufReader<DuplexStream>) -> String {
    let mut line = String::new();
    server.read_line(&mut line).await.unwrap();
    assert!(line.ends_with("\r\n"), "command not CRLF-terminated: {line:?}");
    line.trim_end().to_string()
}

async fn send(server: &mut BufReader<DuplexStream>, text: &str) {
    server.get_mut().write_all(text.as_bytes()).await.unwrap();
}

#[tokio::test]
async fn group_selection() {
    let (mut conn, mut server) = connect("200 news.example.com ready\r\n").await;

    let client = async {
        let status = conn.group("comp.lang.misc").await.unwrap();
        assert_eq!(status.count, 4);
        assert_eq!(status.low, 1);
        assert_eq!(status.high, 4);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "GROUP comp.lang.misc");
        send(&mut server, "211 4 1 4 comp.lang.misc\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn rejected_greeting() {
    init_tracing();
    let (client_io, server_io) = tokio::io::duplex(8192);
    let mut server = BufReader::new(server_io);
    send(&mut server, "400 service temporarily unavailable\r\n").await;

    let err = Connection::handshake(client_io).await.unwrap_err();
    match err {
        NntpError::UnexpectedReply { code, .. } => assert_eq!(code, 400),
        other => panic!("expected UnexpectedReply, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_reply_is_recoverable() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let err = conn.group("no.such.group").await.unwrap_err();
        match err {
            NntpError::UnexpectedReply { code, message } => {
                assert_eq!(code, 411);
                assert_eq!(message, "no such newsgroup");
            }
            other => panic!("expected UnexpectedReply, got {other:?}"),
        }
        // The session survives a rejected command
        let t = conn.date().await.unwrap();
        assert_eq!(t.format("%Y%m%d%H%M%S").to_string(), "20240102030405");
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "GROUP no.such.group");
        send(&mut server, "411 no such newsgroup\r\n").await;
        assert_eq!(recv_command(&mut server).await, "DATE");
        send(&mut server, "111 20240102030405\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn authentication_with_password_round() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        conn.authenticate("alice", "hunter2").await.unwrap();
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "AUTHINFO USER alice");
        send(&mut server, "381 password required\r\n").await;
        assert_eq!(recv_command(&mut server).await, "AUTHINFO PASS hunter2");
        send(&mut server, "281 authentication accepted\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn authentication_accepted_without_password() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        conn.authenticate("alice", "hunter2").await.unwrap();
        conn.quit().await.unwrap();
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "AUTHINFO USER alice");
        send(&mut server, "281 authentication accepted\r\n").await;
        // The password must never hit the wire; the next line is QUIT
        assert_eq!(recv_command(&mut server).await, "QUIT");
        send(&mut server, "205 bye\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn authentication_rejected() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let err = conn.authenticate("alice", "wrong").await.unwrap_err();
        match err {
            NntpError::UnexpectedReply { code, .. } => assert_eq!(code, 481),
            other => panic!("expected UnexpectedReply, got {other:?}"),
        }
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "AUTHINFO USER alice");
        send(&mut server, "481 authentication rejected\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn article_with_folded_and_duplicate_headers() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let fetched = conn.article("<1@example.com>").await.unwrap();
        assert_eq!(fetched.headers.get("Subject"), Some("hello"));
        assert_eq!(
            fetched.headers.get("References"),
            Some("<a@example.com> <b@example.com>")
        );
        assert_eq!(fetched.headers.get_all("Received"), &["from a", "from b"]);

        let article = fetched.into_article().await.unwrap();
        assert_eq!(article.body.as_deref(), Some("first line\n.starts with dot\n"));
        assert_eq!(article.message_id(), Some("<1@example.com>"));
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "ARTICLE <1@example.com>");
        send(
            &mut server,
            "220 1 <1@example.com> article follows\r\n\
             Received: from a\r\n\
             Subject: hello\r\n\
             Message-ID: <1@example.com>\r\n\
             References: <a@example.com>\r\n\
             \t<b@example.com>\r\n\
             Received: from b\r\n\
             \r\n\
             first line\r\n\
             ..starts with dot\r\n\
             .\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn article_without_body_separator_is_an_error() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let err = conn.article("").await.unwrap_err();
        assert!(matches!(err, NntpError::UnexpectedHeaderEof));
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "ARTICLE");
        send(
            &mut server,
            "220 1 <1@example.com> article follows\r\nSubject: truncated\r\n.\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn head_block_needs_no_blank_line() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let headers = conn.head("<1@example.com>").await.unwrap();
        assert_eq!(headers.get("Subject"), Some("just headers"));
        assert_eq!(headers.len(), 2);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "HEAD <1@example.com>");
        send(
            &mut server,
            "221 1 <1@example.com> head follows\r\n\
             Subject: just headers\r\n\
             From: user@example.com\r\n\
             .\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn body_lines_are_unstuffed() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let mut body = conn.body("<1@example.com>").await.unwrap();
        let lines = body.collect_lines().await.unwrap();
        assert_eq!(lines, vec![".leading dot", "plain", "mid.dle"]);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "BODY <1@example.com>");
        send(
            &mut server,
            "222 1 <1@example.com> body follows\r\n..leading dot\r\nplain\r\nmid.dle\r\n.\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn unread_body_is_drained_before_next_command() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        // Fetch an article and drop the body reader without consuming it
        let fetched = conn.article("").await.unwrap();
        drop(fetched);

        // The next command must still line up with its own reply
        let status = conn.group("misc.test").await.unwrap();
        assert_eq!(status.count, 10);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "ARTICLE");
        send(
            &mut server,
            "220 1 <1@example.com> article follows\r\n\
             Subject: abandoned\r\n\
             \r\n\
             line one\r\n\
             211 fake status inside body\r\n\
             line three\r\n\
             .\r\n",
        )
        .await;
        assert_eq!(recv_command(&mut server).await, "GROUP misc.test");
        send(&mut server, "211 10 1 10 misc.test\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn posting_applies_dot_stuffing() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        conn.raw_post("Subject: test\n\n.leading dot\nplain\n")
            .await
            .unwrap();
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "POST");
        send(&mut server, "340 send article\r\n").await;

        let mut lines = Vec::new();
        loop {
            let line = recv_command(&mut server).await;
            if line == "." {
                break;
            }
            lines.push(line);
        }
        assert_eq!(
            lines,
            vec!["Subject: test", "", "..leading dot", "plain"]
        );
        send(&mut server, "240 article posted\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn new_news_is_sorted_and_deduplicated() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let since = chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .to_utc();
        let ids = conn.new_news("misc.*", since).await.unwrap();
        assert_eq!(ids, vec!["<a@example.com>", "<b@example.com>"]);
    };
    let script = async {
        assert_eq!(
            recv_command(&mut server).await,
            "NEWNEWS misc.* 20240102 030405 GMT"
        );
        send(
            &mut server,
            "230 list follows\r\n<b@example.com>\r\n<a@example.com>\r\n<b@example.com>\r\n.\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn new_groups_listing() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let since = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .to_utc();
        let groups = conn.new_groups(since).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "misc.fresh");
        assert_eq!(groups[0].status, "y");
    };
    let script = async {
        assert_eq!(
            recv_command(&mut server).await,
            "NEWGROUPS 20240101 000000 GMT"
        );
        send(&mut server, "231 new groups follow\r\nmisc.fresh 5 1 y\r\n.\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn overview_rows() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let rows = conn.overview(1, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].subject, "first");
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].references, vec!["<1@example.com>"]);
        assert_eq!(rows[1].bytes, 200);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "OVER 1-2");
        send(
            &mut server,
            "224 overview follows\r\n\
             1\tfirst\tuser@x\tMon, 01 Jan 2024 00:00:00 +0000\t<1@example.com>\t\t100\t3\r\n\
             2\tsecond\tuser@x\tMon, 01 Jan 2024 01:00:00 +0000\t<2@example.com>\t<1@example.com>\t200\t5\r\n\
             .\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn stat_next_last() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let stat = conn.stat("").await.unwrap();
        assert_eq!(stat.number, 1);
        assert_eq!(stat.message_id, "<1@example.com>");

        let next = conn.next().await.unwrap();
        assert_eq!(next.number, 2);

        let last = conn.last().await.unwrap();
        assert_eq!(last.number, 1);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "STAT");
        send(&mut server, "223 1 <1@example.com> retrieved\r\n").await;
        assert_eq!(recv_command(&mut server).await, "NEXT");
        send(&mut server, "223 2 <2@example.com> retrieved\r\n").await;
        assert_eq!(recv_command(&mut server).await, "LAST");
        send(&mut server, "223 1 <1@example.com> retrieved\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn capabilities_and_mode_reader() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let caps = conn.capabilities().await.unwrap();
        assert_eq!(caps, vec!["VERSION 2", "READER", "OVER"]);

        let posting = conn.mode_reader().await.unwrap();
        assert!(!posting);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "CAPABILITIES");
        send(&mut server, "101 capability list\r\nVERSION 2\r\nREADER\r\nOVER\r\n.\r\n").await;
        assert_eq!(recv_command(&mut server).await, "MODE READER");
        send(&mut server, "201 reader mode, no posting\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn quit_closes_the_session() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        conn.quit().await.unwrap();
        assert!(conn.is_closed());

        let err = conn.stat("").await.unwrap_err();
        assert!(matches!(err, NntpError::ConnectionClosed));
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "QUIT");
        send(&mut server, "205 closing connection\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn peer_disconnect_closes_the_connection() {
    let (mut conn, server) = connect("200 ready\r\n").await;
    drop(server);

    // The dropped peer surfaces as a write error; the connection must
    // be unusable from that point on
    let err = conn.stat("").await.unwrap_err();
    assert!(matches!(err, NntpError::Io(_)), "got {err:?}");
    assert!(conn.is_closed());

    let err = conn.stat("").await.unwrap_err();
    assert!(matches!(err, NntpError::ConnectionClosed));
}

#[tokio::test]
async fn peer_eof_closes_the_connection() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        // The command goes out, then the peer hangs up instead of replying
        let err = conn.stat("").await.unwrap_err();
        assert!(matches!(err, NntpError::ConnectionClosed));
        assert!(conn.is_closed());
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "STAT");
        drop(server);
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn garbage_status_line_is_an_error() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let err = conn.stat("").await.unwrap_err();
        assert!(matches!(err, NntpError::ShortStatusLine(_)));
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "STAT");
        send(&mut server, "223\r\n").await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn bare_list() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let groups = conn.list().await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "comp.lang.misc");
        assert_eq!(groups[1].name, "misc.test");
        assert_eq!(groups[1].status, "m");
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "LIST");
        send(
            &mut server,
            "215 list follows\r\ncomp.lang.misc 4 1 y\r\nmisc.test 8 2 m\r\n.\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn help_text_streams() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let mut help = conn.help().await.unwrap();
        let lines = help.collect_lines().await.unwrap();
        assert_eq!(lines, vec!["Commands:", "  ARTICLE", "  BODY"]);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "HELP");
        send(
            &mut server,
            "100 help text follows\r\nCommands:\r\n  ARTICLE\r\n  BODY\r\n.\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn raw_text_forms() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let head = conn.head_text("<1@example.com>").await.unwrap();
        assert_eq!(head, "Subject: raw\nFrom: user@example.com\n");

        let article = conn.article_text("<1@example.com>").await.unwrap();
        assert_eq!(article, "Subject: raw\n\nbody line\n.dot line\n");
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "HEAD <1@example.com>");
        send(
            &mut server,
            "221 1 <1@example.com> head follows\r\n\
             Subject: raw\r\n\
             From: user@example.com\r\n\
             .\r\n",
        )
        .await;
        assert_eq!(recv_command(&mut server).await, "ARTICLE <1@example.com>");
        send(
            &mut server,
            "220 1 <1@example.com> article follows\r\n\
             Subject: raw\r\n\
             \r\n\
             body line\r\n\
             ..dot line\r\n\
             .\r\n",
        )
        .await;
    };
    tokio::join!(client, script);
}

#[tokio::test]
async fn list_with_keyword_and_pattern() {
    let (mut conn, mut server) = connect("200 ready\r\n").await;

    let client = async {
        let groups = conn
            .list_with("ACTIVE", Some("comp.lang.*"))
            .await
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "comp.lang.misc");
        assert_eq!(groups[0].high, 4);
        assert_eq!(groups[0].low, 1);
    };
    let script = async {
        assert_eq!(recv_command(&mut server).await, "LIST ACTIVE comp.lang.*");
        send(&mut server, "215 list follows\r\ncomp.lang.misc 4 1 y\r\n.\r\n").await;
    };
    tokio::join!(client, script);
}
