use rand::Rng;

/// One simulated tick of crawl activity.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    /// Pages fetched during this tick.
    pub pages_visited: u32,
    /// Net change to the frontier size, may be negative as pages drain.
    pub queue_delta: i32,
    /// Whether one fetch in this tick failed.
    pub error: bool,
    /// Latency of the sampled fetch, reported in the log line.
    pub response_ms: u32,
    /// Rolling average response time after this tick.
    pub avg_response_ms: u32,
}

/// Source of per-tick crawl activity. The runner is written against this
/// seam so tests can drive it with a deterministic implementation.
pub trait StepSource: Send + Sync {
    fn next_step(&self) -> StepOutcome;
}

/// Random activity tuned to look like a small site crawl.
pub struct SimulatedStepSource;

impl StepSource for SimulatedStepSource {
    fn next_step(&self) -> StepOutcome {
        let mut rng = rand::thread_rng();
        StepOutcome {
            pages_visited: rng.gen_range(5..=24),
            queue_delta: rng.gen_range(-5..=4),
            error: rng.gen_bool(0.2),
            response_ms: rng.gen_range(100..=299),
            avg_response_ms: rng.gen_range(150..=269),
        }
    }
}
