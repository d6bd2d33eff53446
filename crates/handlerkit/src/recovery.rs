//! Request-scoped panic boundary.
//!
//! A panic inside a wrapped handler must not take the serving task down with
//! it. [`catch`] polls the handler future under `catch_unwind` and turns a
//! panic into [`HandlerError::Panic`], which classifies as `unknown` / 500.
//!
//! Location and backtrace are recorded by a process-wide panic hook, but only
//! while the panicking thread is polling inside a boundary. Panics anywhere
//! else go to the hook that was installed before ours.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::{poll_fn, Future};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::pin::pin;
use std::sync::Once;

use futures_util::FutureExt;
use handlerkit_core::{HandlerError, HandlerResult, UNKNOWN_CODE};

static HOOK: Once = Once::new();

thread_local! {
    /// Number of boundaries currently being polled on this thread.
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Report left by the hook for the boundary that caught the panic.
    static LAST_PANIC: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
struct PanicReport {
    location: String,
    backtrace: String,
}

/// Marks the current thread as polling inside a boundary until dropped.
struct Boundary;

impl Boundary {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Boundary
    }
}

impl Drop for Boundary {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let report = PanicReport {
                location: info
                    .location()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                backtrace: Backtrace::force_capture().to_string(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(report));
        }));
    });
}

fn clear_report() {
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
}

/// Runs `future` to completion, converting a panic into
/// [`HandlerError::Panic`] carrying the panic message.
///
/// The panic is logged at info level with the trace id, location and
/// backtrace. Nothing else about it reaches the caller.
pub async fn catch<F>(future: F, trace: &str) -> Result<F::Output, HandlerError>
where
    F: Future,
{
    install_hook();
    clear_report();

    let mut guarded = pin!(AssertUnwindSafe(future).catch_unwind());
    let outcome = poll_fn(|cx| {
        let _boundary = Boundary::enter();
        guarded.as_mut().poll(cx)
    })
    .await;

    match outcome {
        Ok(output) => {
            // A panic caught inside the future itself leaves a report behind.
            clear_report();
            Ok(output)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let report = LAST_PANIC
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_default();

            tracing::info!(
                trace,
                code = UNKNOWN_CODE,
                error = %message,
                location = %report.location,
                panic = %report.backtrace,
                "handle a panic"
            );

            Err(HandlerError::Panic(message))
        }
    }
}

/// [`catch`] for handler futures: a panic becomes the handler's error.
pub async fn recover<F>(future: F, trace: &str) -> HandlerResult
where
    F: Future<Output = HandlerResult>,
{
    catch(future, trace).await.and_then(|result| result)
}

/// Text of a panic payload. `panic!` produces `&str` or `String`; anything
/// else gets a placeholder.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
