use std::rc::Rc;

/// Fan-out point for transient user-facing notices. The transport layer
/// pushes every failure through this so callers stay free of UI concerns;
/// the app root wires it to the toast host, and the fallback just logs.
#[derive(Clone)]
pub struct Notifier {
    sink: Rc<dyn Fn(String)>,
}

impl Notifier {
    pub fn new(sink: impl Fn(String) + 'static) -> Self {
        Self {
            sink: Rc::new(sink),
        }
    }

    pub fn log_only() -> Self {
        Self::new(|message| log::warn!("{message}"))
    }

    pub fn notify(&self, message: impl Into<String>) {
        (self.sink)(message.into());
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::log_only()
    }
}
