//! Preview recomputation scheduling.
//!
//! A task-replacement queue of depth one: edits may arrive faster than a
//! render completes, so after a short debounce window the queue is drained
//! and only the newest request is rendered. Geometry stays synchronous and
//! pure — only this wrapper knows about supersession.

use crate::{PreviewAssets, render_row_preview};
use card_layout::{DataRow, DocumentModel};
use image::RgbaImage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

/// Coalescing window for bursts of edits.
pub const DEBOUNCE: Duration = Duration::from_millis(30);

/// One preview invocation. `generation` must increase monotonically so the
/// consumer can discard stale frames.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub generation: u64,
    pub doc: DocumentModel,
    pub row: Option<DataRow>,
    pub assets: Arc<PreviewAssets>,
    pub pixels_per_pt: f32,
}

#[derive(Debug)]
pub enum PreviewUpdate {
    Rendered { generation: u64, image: RgbaImage },
    Failed { generation: u64, message: String },
}

/// Worker loop: debounce, drain to the newest request, render off-thread,
/// emit one update. Ends when the request channel closes.
pub async fn preview_task(
    mut request_rx: mpsc::UnboundedReceiver<PreviewRequest>,
    update_tx: mpsc::UnboundedSender<PreviewUpdate>,
) {
    while let Some(mut request) = request_rx.recv().await {
        sleep(DEBOUNCE).await;

        // Drain any queued requests, keeping only the most recent
        while let Ok(newer) = request_rx.try_recv() {
            log::debug!(
                "Discarding superseded preview request {}",
                request.generation
            );
            request = newer;
        }

        let generation = request.generation;
        let rendered = tokio::task::spawn_blocking(move || {
            render_row_preview(
                &request.doc,
                request.row.as_ref(),
                &request.assets,
                request.pixels_per_pt,
            )
        })
        .await;

        let update = match rendered {
            Ok(Ok(image)) => PreviewUpdate::Rendered { generation, image },
            Ok(Err(e)) => PreviewUpdate::Failed {
                generation,
                message: e.to_string(),
            },
            Err(e) => PreviewUpdate::Failed {
                generation,
                message: e.to_string(),
            },
        };
        if update_tx.send(update).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(generation: u64) -> PreviewRequest {
        PreviewRequest {
            generation,
            doc: DocumentModel::with_defaults(),
            row: Some(DataRow {
                payload: "https://example.com".to_string(),
                label: format!("gen {generation}"),
                index: 1,
                errors: Vec::new(),
            }),
            assets: Arc::new(PreviewAssets::default()),
            pixels_per_pt: 1.0,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn burst_of_requests_renders_only_the_newest() {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(preview_task(request_rx, update_tx));

        for generation in 1..=3 {
            request_tx.send(request(generation)).unwrap();
        }

        let update = update_rx.recv().await.expect("one update");
        match update {
            PreviewUpdate::Rendered { generation, image } => {
                assert_eq!(generation, 3);
                assert_eq!(image.dimensions(), (252, 144));
            }
            PreviewUpdate::Failed { message, .. } => panic!("render failed: {message}"),
        }
        // nothing else is pending
        assert!(update_rx.try_recv().is_err());

        drop(request_tx);
        worker.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sequential_requests_each_render() {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(preview_task(request_rx, update_tx));

        request_tx.send(request(1)).unwrap();
        let first = update_rx.recv().await.expect("first update");
        assert!(matches!(first, PreviewUpdate::Rendered { generation: 1, .. }));

        request_tx.send(request(2)).unwrap();
        let second = update_rx.recv().await.expect("second update");
        assert!(matches!(second, PreviewUpdate::Rendered { generation: 2, .. }));

        drop(request_tx);
        worker.await.unwrap();
    }
}
