/// Receives download progress. Purely observational: implementations must not
/// influence the download.
pub trait ProgressSink: Send + Sync {
    /// Called after each received chunk. `total` is the advertised length, if any.
    fn on_progress(&self, downloaded: u64, total: Option<u64>);

    /// Called once after the last chunk has been written.
    fn finish(&self) {}
}
