//! Console and log-file output for a conversion run.
//!
//! [`Logger`] emits [`tracing`] events; [`init_subscriber`] routes them to a
//! styled console and to `$XDG_CACHE_HOME/icon-converter/<command>.log`.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, ProfileEntry, ProfileStatus};

/// Span wrapping one profile's run; log-file lines emitted inside it are
/// prefixed with `name`.
#[must_use]
pub fn profile_span(name: &str) -> tracing::Span {
    tracing::info_span!("profile", name)
}

/// Guards `XDG_CACHE_HOME` while a test points it at a temporary directory.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Build a [`Logger`] whose log file lives in a fresh temporary cache
/// directory, with a thread-local subscriber feeding that file.
///
/// Keep the returned guard alive for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let cache = tempfile::tempdir().expect("temp cache dir");
    let (layer, log) = {
        let _env = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: TEST_ENV_MUTEX is held until the variable is removed again.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", cache.path());
        }
        let layer = subscriber::FileLayer::new("test");
        let log = Logger::new("test");
        // SAFETY: as above.
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        (layer.expect("file layer in temp cache"), log)
    };

    let registry = tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(registry));
    (log, cache, guard)
}
