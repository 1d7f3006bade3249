//! Plugin socket server (during `ukrbadge serve`).
//! Protocol: one JSON request per line, one JSON response per line.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use ukrbadge_core::fetch::PageFetcher;
use ukrbadge_core::plugin_api::PluginApi;

/// Binds `path` (replacing a stale socket) and spawns the accept loop.
/// Each connection is served on its own task.
pub fn spawn_plugin_listener<F>(
    api: Arc<PluginApi<F>>,
    path: impl AsRef<Path>,
) -> Result<tokio::task::JoinHandle<()>>
where
    F: PageFetcher + 'static,
{
    let path = path.as_ref().to_path_buf();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path)
        .with_context(|| format!("plugin socket bind: {}", path.display()))?;

    let handle = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let api = Arc::clone(&api);
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(&api, stream).await {
                            tracing::debug!("plugin connection closed: {}", e);
                        }
                    });
                }
                Err(e) => tracing::debug!("plugin socket accept: {}", e),
            }
        }
    });
    Ok(handle)
}

/// Serves requests in order. While one is being handled the socket is still
/// read: pipelined lines are queued, and EOF or a read error drops the
/// request in flight (aborting its catalog fetch) and ends the connection.
async fn serve_connection<F: PageFetcher>(api: &PluginApi<F>, stream: UnixStream) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    let mut queued: VecDeque<String> = VecDeque::new();
    loop {
        let line = match queued.pop_front() {
            Some(line) => line,
            None => match lines.next_line().await? {
                Some(line) => line,
                None => return Ok(()),
            },
        };
        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        let handled = api.handle_line(request);
        tokio::pin!(handled);
        let mut response = loop {
            tokio::select! {
                response = &mut handled => break response,
                next = lines.next_line() => match next {
                    Ok(Some(line)) => queued.push_back(line),
                    Ok(None) | Err(_) => {
                        tracing::debug!("plugin client disconnected; dropping request in flight");
                        return Ok(());
                    }
                },
            }
        };
        response.push('\n');
        write.write_all(response.as_bytes()).await?;
    }
}
