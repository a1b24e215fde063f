use std::collections::VecDeque;

use crate::pipeline::{BuildError, Pipeline};

/// FIFO queue of pipelines, run to completion one at a time in enqueue
/// order. Stops at the first failing pipeline.
#[derive(Default)]
pub struct Executor {
    pipelines: VecDeque<Pipeline>,
}

impl Executor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pipeline: Pipeline) {
        self.pipelines.push_back(pipeline);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Queued pipelines, front of the queue first.
    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.iter()
    }

    /// Drain the queue, running each pipeline in turn.
    pub fn run(&mut self) -> Result<(), BuildError> {
        while let Some(pipeline) = self.pipelines.pop_front() {
            pipeline.run()?;
        }
        Ok(())
    }
}
