//! Backend commands queued from UI to the backend worker.

pub enum BackendCommand {
    /// One-shot fetch of `/v1/resource-details`; the worker answers
    /// with `ResourceDetailsLoaded` or a classified error.
    FetchResourceDetails,
}
