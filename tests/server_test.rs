use latency_topology::generator::DEFAULT_SEED;
use latency_topology::ingest::{exchange_servers, Scheduler};
use latency_topology::server::{router, ServerMonitor};
use latency_topology::{LatencyHub, ManualClock, Result, Sample, Stats};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Test helper: serve `hub` on an ephemeral port until the test ends
async fn start_test_server(hub: Arc<LatencyHub>) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = router(hub, ServerMonitor::new(100).counters());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// Write raw request bytes and read until the server closes the connection
async fn send_raw(addr: SocketAddr, request: &[u8]) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(request).await?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn status_of(raw: &str) -> u16 {
    raw.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

async fn get(addr: SocketAddr, target: &str) -> std::io::Result<(u16, String)> {
    let request = format!("GET {} HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n", target);
    let raw = send_raw(addr, request.as_bytes()).await?;

    let body = raw.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
    Ok((status_of(&raw), body))
}

#[tokio::test]
async fn test_query_surface_over_tcp() -> Result<()> {
    let hub = Arc::new(LatencyHub::with_clock(Arc::new(ManualClock::new(10_000)), DEFAULT_SEED));
    hub.store().insert(Sample::new("srv-0", "srv-1", 1_000, 10));
    hub.store().insert(Sample::new("srv-0", "srv-1", 2_000, 30));

    let addr = start_test_server(Arc::clone(&hub)).await?;

    let (status, body) = get(addr, "/api/latency/history?from=srv-0&to=srv-1&toTime=1500").await?;
    assert_eq!(status, 200);
    let samples: Vec<Sample> = serde_json::from_str(&body)?;
    assert_eq!(samples, vec![Sample::new("srv-0", "srv-1", 1_000, 10)]);

    let (status, body) = get(addr, "/api/latency/stats?from=srv-0&to=srv-1").await?;
    assert_eq!(status, 200);
    let stats: Stats = serde_json::from_str(&body)?;
    assert_eq!((stats.min, stats.max, stats.avg, stats.count), (10, 30, 20, 2));

    let (status, body) = get(addr, "/api/latency/history?to=srv-1").await?;
    assert_eq!(status, 400);
    assert!(body.contains("from and to parameters required"));

    let (status, body) = get(addr, "/api/latency/recent").await?;
    assert_eq!(status, 200);
    let recent: Vec<Sample> = serde_json::from_str(&body)?;
    assert_eq!(recent.first().map(|s| s.timestamp), Some(2_000));
    Ok(())
}

#[tokio::test]
async fn test_non_utf8_request_line_gets_bad_request() -> Result<()> {
    let hub = Arc::new(LatencyHub::with_clock(Arc::new(ManualClock::new(10_000)), DEFAULT_SEED));
    let addr = start_test_server(hub).await?;

    let raw = send_raw(addr, b"GET /api/latency/recent\xff\xfe HTTP/1.1\r\nHost: test\r\n\r\n").await?;
    assert_eq!(status_of(&raw), 400);

    // The server keeps answering afterwards
    let (status, _) = get(addr, "/api/latency/recent").await?;
    assert_eq!(status, 200);
    Ok(())
}

#[tokio::test]
async fn test_scheduler_feeds_query_surface() -> Result<()> {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let hub = Arc::new(LatencyHub::with_clock(clock.clone(), DEFAULT_SEED));
    let mut scheduler = Scheduler::new(exchange_servers(), 10, 11);

    scheduler.seed_initial(&hub);
    for _ in 0..20 {
        clock.advance(7_000);
        scheduler.tick(&hub);
    }

    let addr = start_test_server(Arc::clone(&hub)).await?;
    let (status, body) = get(addr, "/api/latency/recent").await?;
    assert_eq!(status, 200);

    let recent: Vec<Sample> = serde_json::from_str(&body)?;
    assert_eq!(recent, hub.recent());
    assert!(recent.iter().all(|s| s.rtt_ms >= 5 && s.from_id != s.to_id));
    Ok(())
}
