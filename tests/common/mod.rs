use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOG_INITIALIZED: Once = Once::new();

/// Installs a test-writer subscriber once per test binary. Filter with `RUST_LOG`.
pub fn init_logging() {
	LOG_INITIALIZED.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}
