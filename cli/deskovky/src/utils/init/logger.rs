use std::sync::OnceLock;

use tracing::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let log_filter = match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,deskovky=error,deskovky_catalog=error",
        // Only show warnings, including failed catalog requests
        Verbosity::Verbose(0) => "off,deskovky=warn,deskovky_catalog=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,deskovky=info,deskovky_catalog=info",
        // Also show debug, e.g. which candidate endpoints were tried
        Verbosity::Verbose(2) => "off,deskovky=debug,deskovky_catalog=debug",
        Verbosity::Verbose(3) => "off,deskovky=trace,deskovky_catalog=trace",
        // Also show debug from the http stack
        Verbosity::Verbose(4) => "debug,deskovky=trace,deskovky_catalog=trace",
        Verbosity::Verbose(_) => "trace",
    };

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        let (subscriber, reload_handle) = create_registry_and_filter_reload_handle();
        if let Err(err) = subscriber.try_init() {
            eprintln!("Could not initialize logger: {err}");
        }
        reload_handle
    });

    update_filters(filter_handle, log_filter);
}

/// Replace the active filter, giving `$RUST_LOG` precedence over `log_filter`.
pub fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}

pub fn create_registry_and_filter_reload_handle() -> (
    impl SubscriberInitExt,
    Handle<EnvFilter, Registry>,
) {
    debug!("Initializing logger (how are you seeing this?)");
    // Start permissive and narrow the filter through the reload handle.
    let filter = EnvFilter::new("trace");
    let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(tracing_subscriber::fmt::format())
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(log_layer);

    (registry, filter_reload_handle)
}
