//! Command execution helpers
//!
//! Provides utilities to reduce boilerplate when implementing commands with
//! metrics tracking and logging.

use std::time::Instant;

use complimask_domain::Result as DomainResult;

use crate::context::AppContext;
use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic metrics recording and logging
///
/// Times the command, logs the outcome via tracing and records it in the
/// context's in-memory metrics.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, body: &Value) -> Result<MyReply> {
///     execute_with_metrics(ctx, "my_command", move || async move {
///         ctx.service.do_something(body).await
///     })
///     .await
/// }
/// ```
pub async fn execute_with_metrics<F, Fut, T>(
    ctx: &AppContext,
    command_name: &str,
    command_fn: F,
) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    let error_type = result.as_ref().err().map(error_label);

    log_command_execution(command_name, elapsed, error_type);
    ctx.metrics.record_command(command_name, elapsed, result.is_ok());

    result
}
