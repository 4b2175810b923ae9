//! Host integration hooks
//!
//! Processing is fully synchronous. Long loops call back into the host at
//! coarse intervals so an embedding event loop can stay responsive and show
//! progress. Hooks never influence the output.

/// Callbacks a host may supply to a long-running call
pub trait ProcessHooks {
    /// Give the host a chance to run its own work
    ///
    /// Processing resumes exactly where it left off when this returns.
    fn yield_now(&mut self) {}

    /// Report fractional completion in [0, 1]
    fn progress(&mut self, fraction: f32) {
        let _ = fraction;
    }
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl ProcessHooks for NoHooks {}

/// Adapter turning a closure into a progress-only hook
pub struct OnProgress<F>(pub F);

impl<F: FnMut(f32)> ProcessHooks for OnProgress<F> {
    fn progress(&mut self, fraction: f32) {
        (self.0)(fraction);
    }
}

/// Maps one stage's local progress onto a slice of the overall run
///
/// Reports are clamped to [0, 1] before mapping and never go backwards.
pub struct ProgressSpan<'a> {
    inner: &'a mut dyn ProcessHooks,
    start: f32,
    width: f32,
    last: f32,
}

impl<'a> ProgressSpan<'a> {
    pub fn new(inner: &'a mut dyn ProcessHooks, start: f32, end: f32) -> Self {
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(start, 1.0);
        Self {
            inner,
            start,
            width: end - start,
            last: start,
        }
    }
}

impl ProcessHooks for ProgressSpan<'_> {
    fn yield_now(&mut self) {
        self.inner.yield_now();
    }

    fn progress(&mut self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let value = self.start + self.width * fraction;
        if value >= self.last {
            self.last = value;
            self.inner.progress(value);
        }
    }
}
