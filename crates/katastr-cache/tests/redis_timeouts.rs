#![allow(clippy::unwrap_used, clippy::expect_used)]

//! RedisCache against a server that accepts the connection and then stops
//! answering.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use katastr_cache::{CacheBackend, CacheError, CachedFetcher, RedisCache};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const OP_TIMEOUT: Duration = Duration::from_millis(200);

/// Replies `+PONG` to PING and `+OK` to anything else until `silent` is set.
/// After that every command is read and dropped.
async fn start_stalling_redis(silent: Arc<AtomicBool>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let silent = silent.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                loop {
                    let n = match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    if silent.load(Ordering::SeqCst) {
                        continue;
                    }

                    // Each command is a RESP array: `*N`, `$len`, name, ...
                    let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                    let lines: Vec<&str> = request.split("\r\n").collect();
                    let mut reply = String::new();
                    for (i, line) in lines.iter().enumerate() {
                        if !line.starts_with('*') {
                            continue;
                        }
                        let name = lines.get(i + 2).copied().unwrap_or_default();
                        if name.eq_ignore_ascii_case("PING") {
                            reply.push_str("+PONG\r\n");
                        } else {
                            reply.push_str("+OK\r\n");
                        }
                    }
                    if socket.write_all(reply.as_bytes()).await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    addr.to_string()
}

async fn connect_then_stall() -> RedisCache {
    let silent = Arc::new(AtomicBool::new(false));
    let addr = start_stalling_redis(silent.clone()).await;

    let cache = RedisCache::connect(&addr, Duration::from_secs(2), OP_TIMEOUT)
        .await
        .unwrap();
    silent.store(true, Ordering::SeqCst);
    cache
}

#[tokio::test]
async fn test_get_times_out_on_silent_server() {
    let cache = connect_then_stall().await;

    let err = cache.get("cuzk:parcel:6ee90040808954d9").await.unwrap_err();

    assert!(matches!(err, CacheError::Timeout(d) if d == OP_TIMEOUT), "got {}", err);
}

#[tokio::test]
async fn test_set_times_out_on_silent_server() {
    let cache = connect_then_stall().await;

    let err = cache
        .set("cuzk:parcel:6ee90040808954d9", b"{}", Duration::from_secs(60))
        .await
        .unwrap_err();

    assert!(matches!(err, CacheError::Timeout(_)), "got {}", err);
}

#[tokio::test]
async fn test_stalled_cache_falls_through_to_fetch() {
    let fetcher = CachedFetcher::new(Arc::new(connect_then_stall().await));
    let calls = AtomicUsize::new(0);

    let resolved = tokio::time::timeout(
        Duration::from_secs(5),
        fetcher.resolve(
            &CancellationToken::new(),
            "cuzk:parcel:6ee90040808954d9",
            Duration::from_secs(300),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(serde_json::json!({"id": 123456}))
            },
        ),
    )
    .await
    .expect("resolve blocked on the stalled cache");

    assert_eq!(resolved.unwrap(), br#"{"id":123456}"#.to_vec());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
