use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Logger initialization without timestamps but with colors and targets.
/// Graphics-stack noise is turned down to warn.
pub fn init_custom_logger() {
    // Time formatter that prints nothing, removing the timestamp prefix
    struct NoTime;
    impl FormatTime for NoTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    let format = format()
        .with_timer(NoTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let filter = tracing_subscriber::filter::EnvFilter::from_default_env()
        .add_directive("info".parse().unwrap())
        .add_directive("wgpu_core=warn".parse().unwrap())
        .add_directive("wgpu_hal=warn".parse().unwrap())
        .add_directive("naga=warn".parse().unwrap());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_filter(filter),
        )
        .init();
}
