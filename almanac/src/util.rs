use almanac_core::AlmanacError;

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// This wraps `futures::future::join_all(tasks)` with
/// `crate::core::with_request_deadline`. Results keep the order of `tasks`.
/// On timeout returns `AlmanacError::RequestTimeout` labelled `capability`.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
    capability: &str,
) -> Result<Vec<T>, AlmanacError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(deadline, capability, futures::future::join_all(tasks))
        .await
}
