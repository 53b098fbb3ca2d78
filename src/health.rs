//! Health-check gate that blocks scenario runs until every service responds.

use std::time::Duration;

use tracing::{debug, info, warn};

pub struct HealthGateOptions {
    pub path: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

/// One timed probe. Any transport error means "not yet healthy".
pub async fn check_service_health(
    client: &reqwest::Client,
    host: &str,
    path: &str,
    timeout: Duration,
) -> bool {
    let url = format!("{host}{path}");
    match client.get(&url).timeout(timeout).send().await {
        Ok(response) => response.status().as_u16() == 200,
        Err(err) => {
            debug!("Health probe for {} failed: {}", url, err);
            false
        }
    }
}

/// Waits for every host to become healthy within its own wait budget.
pub async fn wait_for_services(
    client: &reqwest::Client,
    hosts: &[String],
    opts: &HealthGateOptions,
) -> bool {
    info!("Checking service health...");
    for host in hosts {
        info!("Waiting for {} to become healthy...", host);
        if !wait_for_host(client, host, opts).await {
            warn!(
                "{} is not responding after {}s",
                host,
                opts.max_wait.as_secs()
            );
            return false;
        }
        info!("{} is healthy", host);
    }
    info!("All services are healthy.");
    true
}

async fn wait_for_host(client: &reqwest::Client, host: &str, opts: &HealthGateOptions) -> bool {
    let mut waited = Duration::ZERO;
    loop {
        if check_service_health(client, host, &opts.path, opts.request_timeout).await {
            return true;
        }
        if waited >= opts.max_wait {
            return false;
        }
        tokio::time::sleep(opts.poll_interval).await;
        waited = waited.saturating_add(opts.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::io::{Read, Write};
    use std::net::{Shutdown, TcpListener, TcpStream};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, mpsc};
    use std::thread;
    use std::time::Duration;

    use super::{HealthGateOptions, check_service_health, wait_for_services};

    fn run_async_test<F>(future: F) -> Result<(), String>
    where
        F: Future<Output = Result<(), String>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(future)
    }

    struct ServerHandle {
        shutdown: mpsc::Sender<()>,
        thread: Option<thread::JoinHandle<()>>,
    }

    impl Drop for ServerHandle {
        fn drop(&mut self) {
            let _send_result = self.shutdown.send(());
            if let Some(handle) = self.thread.take() {
                drop(handle.join());
            }
        }
    }

    /// Serves 503 for the first `failures` requests, then 200.
    fn spawn_flaky_server(failures: u32) -> Result<(String, ServerHandle), String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind test server failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("server addr failed: {}", err))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("set_nonblocking failed: {}", err))?;

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let served = Arc::new(AtomicU32::new(0));

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let count = served.fetch_add(1, Ordering::SeqCst);
                        let healthy = count >= failures;
                        thread::spawn(move || handle_client(stream, healthy));
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok((
            format!("http://{}", addr),
            ServerHandle {
                shutdown: shutdown_tx,
                thread: Some(handle),
            },
        ))
    }

    fn handle_client(mut stream: TcpStream, healthy: bool) {
        let mut buffer = [0u8; 1024];
        if stream.read(&mut buffer).is_err() {
            return;
        }
        let status_line = if healthy {
            "HTTP/1.1 200 OK"
        } else {
            "HTTP/1.1 503 Service Unavailable"
        };
        let response = format!("{status_line}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK");
        if stream.write_all(response.as_bytes()).is_err() {
            return;
        }
        if stream.flush().is_err() {
            return;
        }
        drop(stream.shutdown(Shutdown::Both));
    }

    fn gate_options(max_wait: Duration) -> HealthGateOptions {
        HealthGateOptions {
            path: "/health".to_owned(),
            request_timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(20),
            max_wait,
        }
    }

    fn build_client() -> Result<reqwest::Client, String> {
        reqwest::Client::builder()
            .build()
            .map_err(|err| format!("client build failed: {}", err))
    }

    #[test]
    fn healthy_host_passes_immediately() -> Result<(), String> {
        run_async_test(async {
            let (host, _server) = spawn_flaky_server(0)?;
            let client = build_client()?;
            if !check_service_health(&client, &host, "/health", Duration::from_secs(1)).await {
                return Err("Expected healthy".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn unreachable_host_is_not_healthy() -> Result<(), String> {
        run_async_test(async {
            let client = build_client()?;
            if check_service_health(
                &client,
                "http://127.0.0.1:9",
                "/health",
                Duration::from_millis(200),
            )
            .await
            {
                return Err("Expected unhealthy".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn gate_passes_when_all_hosts_are_healthy() -> Result<(), String> {
        run_async_test(async {
            let (first, _first_server) = spawn_flaky_server(0)?;
            let (second, _second_server) = spawn_flaky_server(0)?;
            let client = build_client()?;
            let opts = gate_options(Duration::from_secs(2));
            if !wait_for_services(&client, &[first, second], &opts).await {
                return Err("Expected gate to pass".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn gate_retries_until_host_recovers() -> Result<(), String> {
        run_async_test(async {
            let (host, _server) = spawn_flaky_server(2)?;
            let client = build_client()?;
            let opts = gate_options(Duration::from_secs(2));
            if !wait_for_services(&client, std::slice::from_ref(&host), &opts).await {
                return Err("Expected gate to pass after recovery".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn gate_fails_when_any_host_never_recovers() -> Result<(), String> {
        run_async_test(async {
            let (healthy, _healthy_server) = spawn_flaky_server(0)?;
            let unhealthy = "http://127.0.0.1:9".to_owned();
            let client = build_client()?;
            let opts = gate_options(Duration::from_millis(100));
            if wait_for_services(&client, &[healthy, unhealthy], &opts).await {
                return Err("Expected gate to fail".to_owned());
            }
            Ok(())
        })
    }
}
