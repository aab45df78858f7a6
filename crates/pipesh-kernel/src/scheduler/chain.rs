//! Chain builder: links stage bodies with one channel per adjacent pair.

use std::iter;
use std::sync::Arc;

use crate::error::{ChainError, ChainResult};
use crate::stages::{Filter, Passthrough, Source, StageBody};

use super::channel::{stage_channel, Sink, DEFAULT_CHANNEL_CAPACITY};
use super::stage::{Stage, StageInput, StageOutput};

/// A linked but not yet running pipeline.
#[derive(Debug)]
pub struct Chain {
    stages: Vec<Stage>,
    channels: usize,
}

impl Chain {
    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of internal channels (always `len() - 1`).
    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }
}

/// Builds [`Chain`]s with a fixed channel capacity.
#[derive(Debug, Clone, Copy)]
pub struct ChainBuilder {
    capacity: usize,
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ChainBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Link named stage bodies. The first must be a source, the rest filters.
    ///
    /// Nothing is spawned here, so a failure leaves no worker behind.
    pub fn build(&self, bodies: Vec<(String, StageBody)>, sink: Arc<dyn Sink>) -> ChainResult<Chain> {
        let mut bodies = bodies.into_iter();
        let Some((head_name, head)) = bodies.next() else {
            return Err(ChainError::EmptyPipeline);
        };
        let source = match head {
            StageBody::Source(source) => source,
            StageBody::Filter(_) => return Err(ChainError::RequiresInput(head_name)),
        };

        let mut filters: Vec<(String, Box<dyn Filter>)> = vec![(head_name, Box::new(Passthrough))];
        for (name, body) in bodies {
            match body {
                StageBody::Filter(filter) => filters.push((name, filter)),
                StageBody::Source(_) => return Err(ChainError::CannotHaveInput(name)),
            }
        }

        Ok(self.link(source, filters, sink))
    }

    /// Link filters fed by an external source, e.g. a line reader.
    ///
    /// The first filter reads straight from `source`, so `[uppercase, uniq]`
    /// is a two-stage chain with one channel.
    pub fn build_fed(
        &self,
        source: Box<dyn Source>,
        filters: Vec<(String, Box<dyn Filter>)>,
        sink: Arc<dyn Sink>,
    ) -> ChainResult<Chain> {
        if filters.is_empty() {
            return Err(ChainError::EmptyPipeline);
        }
        Ok(self.link(source, filters, sink))
    }

    fn link(&self, source: Box<dyn Source>, filters: Vec<(String, Box<dyn Filter>)>, sink: Arc<dyn Sink>) -> Chain {
        let channels = filters.len() - 1;
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..channels).map(|_| stage_channel(self.capacity)).unzip();

        let inputs = iter::once(StageInput::Source(source)).chain(receivers.into_iter().map(StageInput::Channel));
        let outputs = senders
            .into_iter()
            .map(StageOutput::Channel)
            .chain(iter::once(StageOutput::Sink(sink)));

        let stages = filters
            .into_iter()
            .zip(inputs.zip(outputs))
            .enumerate()
            .map(|(position, ((name, filter), (input, output)))| Stage::new(position, name, input, filter, output))
            .collect();

        Chain { stages, channels }
    }
}
