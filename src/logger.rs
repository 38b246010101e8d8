pub trait Logger: Send + Sync {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
    /// Logs and terminates the process.
    fn fatal(&self, msg: &str) -> !;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn fatal(&self, msg: &str) -> ! {
        tracing::error!(fatal = true, "{msg}");
        std::process::exit(1)
    }
}
