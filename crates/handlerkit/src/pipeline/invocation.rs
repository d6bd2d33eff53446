use handlerkit_core::envelope::Encoder;

/// How a pipeline invokes its handler and writes the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub encoder: Encoder,
    /// In stage position, stop the downstream chain on failure.
    pub abort_on_error: bool,
    /// Hold the namespace lock while the handler runs.
    pub pre_lock: bool,
}

impl Invocation {
    pub const fn new(encoder: Encoder) -> Self {
        Self {
            encoder,
            abort_on_error: false,
            pre_lock: false,
        }
    }

    /// JSON result, `{"success": true}` for empty results.
    pub const fn standard() -> Self {
        Self::new(Encoder::Standard)
    }

    /// Byte results as `application/octet-stream`.
    pub const fn raw() -> Self {
        Self::new(Encoder::Raw)
    }

    /// Status-code envelope, always HTTP 200.
    pub const fn mis() -> Self {
        Self::new(Encoder::Mis)
    }

    /// Writes nothing on success. Used for stages that only prepare the
    /// request for downstream handlers.
    pub const fn passthrough() -> Self {
        Self::new(Encoder::Passthrough)
    }

    pub const fn with_abort(mut self, abort_on_error: bool) -> Self {
        self.abort_on_error = abort_on_error;
        self
    }

    pub const fn with_lock(mut self, pre_lock: bool) -> Self {
        self.pre_lock = pre_lock;
        self
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::standard()
    }
}
