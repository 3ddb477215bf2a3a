use tracing_subscriber::EnvFilter;

/// Inicializa logging estructurado con tracing-subscriber.
///
/// Usa `RUST_LOG` si está definido; si no, cae al nivel indicado.
pub fn init(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
