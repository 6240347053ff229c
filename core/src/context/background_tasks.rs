use tokio::task::JoinHandle;

/// Long-running tasks owned by the front end.
#[derive(Default)]
pub struct BackgroundTasks {
    pub log_tail: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Resolves once the tail task stops on its own.
    /// Never resolves when no tail is running.
    pub async fn join_log_tail(&mut self) {
        match self.log_tail.as_mut() {
            Some(handle) => {
                let _ = handle.await;
                self.log_tail = None;
            }
            None => std::future::pending().await,
        }
    }

    pub fn abort_all(&mut self) {
        if let Some(handle) = self.log_tail.take() {
            handle.abort();
        }
    }
}
