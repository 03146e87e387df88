use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};

use super::{Pauser, Requester, ScanResult, Throttler, WorkItem};

/// Per-pool knobs handed to `run_worker_pool`.
#[derive(Clone)]
pub struct WorkerConfig {
    pub threads: usize,
    pub throttler: Arc<Throttler>,
    pub pauser: Option<Arc<Pauser>>,
    /// Retain the response body on emitted results (crawl or body filters).
    pub keep_body: bool,
}

/// Fans the work items across `threads` concurrent probers and returns the
/// result stream. The stream closes once every item has been processed or
/// the cancel signal fires. Results arrive in completion order, not input
/// order.
pub fn run_worker_pool(
    cancel: watch::Receiver<bool>,
    requester: Arc<Requester>,
    items: Vec<WorkItem>,
    cfg: WorkerConfig,
) -> mpsc::Receiver<ScanResult> {
    let threads = cfg.threads.max(1);
    let (item_tx, item_rx) = mpsc::channel::<WorkItem>(threads * 2);
    let (result_tx, result_rx) = mpsc::channel::<ScanResult>(threads * 2);
    let item_rx = Arc::new(Mutex::new(item_rx));

    // Producer: drain the item list into the bounded queue, bailing out
    // early on cancellation.
    let mut producer_cancel = cancel.clone();
    tokio::spawn(async move {
        for item in items {
            tokio::select! {
                _ = cancelled(&mut producer_cancel) => break,
                sent = item_tx.send(item) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    });

    for _ in 0..threads {
        let item_rx = item_rx.clone();
        let result_tx = result_tx.clone();
        let requester = requester.clone();
        let throttler = cfg.throttler.clone();
        let pauser = cfg.pauser.clone();
        let mut cancel = cancel.clone();
        let keep_body = cfg.keep_body;

        tokio::spawn(async move {
            loop {
                if *cancel.borrow() {
                    return;
                }
                let item = { item_rx.lock().await.recv().await };
                let Some(item) = item else { return };

                if let Some(pauser) = pauser.as_ref() {
                    pauser.wait().await;
                }

                let delay = throttler.delay();
                if !delay.is_zero() {
                    tokio::select! {
                        _ = cancelled(&mut cancel) => return,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }

                let probe = requester.probe(&item.method, &item.path, &item.host);
                let outcome = tokio::select! {
                    _ = cancelled(&mut cancel) => return,
                    outcome = probe => outcome,
                };

                let result = match outcome {
                    Ok(resp) => {
                        throttler.record_status(resp.status_code);
                        ScanResult::from_response(&item, resp, keep_body)
                    }
                    Err(err) => {
                        if *cancel.borrow() {
                            return;
                        }
                        throttler.record_error();
                        ScanResult::from_error(&item, err)
                    }
                };

                if result_tx.send(result).await.is_err() {
                    return;
                }
            }
        });
    }

    // The result stream closes when the last worker drops its sender.
    result_rx
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            futures::future::pending::<()>().await;
        }
    }
}
