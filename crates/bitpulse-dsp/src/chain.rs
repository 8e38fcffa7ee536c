//! Ordered transformation chains over shared stages.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::SignalBuffer;
use crate::error::DspResult;

/// A single transformation over a signal buffer.
///
/// Each stage owns its configuration, fixed at construction. The
/// delta-sigma modulator additionally owns integrator state that survives
/// across `apply` calls, so the trait takes `&mut self`.
pub trait TransformStage {
    /// Consumes a buffer and produces the transformed buffer.
    ///
    /// Either the stage fully succeeds and returns a complete buffer, or it
    /// fails before producing output; no partial results.
    fn apply(&mut self, input: SignalBuffer) -> DspResult<SignalBuffer>;
}

/// Shared handle to a stage, so one instance (and its state) can be
/// attached to several chains.
///
/// `Rc<RefCell<_>>` is deliberate: the pipeline is single-threaded and the
/// modulator's integrator is not synchronized. Parallel use of one stage
/// requires external locking by the caller.
pub type SharedStage = Rc<RefCell<dyn TransformStage>>;

/// Wraps an owned stage in a shareable handle.
pub fn shared<S: TransformStage + 'static>(stage: S) -> Rc<RefCell<S>> {
    Rc::new(RefCell::new(stage))
}

/// An ordered list of stages; attachment order is application order.
#[derive(Default)]
pub struct TransformChain {
    stages: Vec<SharedStage>,
}

impl TransformChain {
    /// Creates an empty chain (the identity transform).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shared stage, returning `self` for fluent chaining.
    pub fn attach(&mut self, stage: SharedStage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Appends a stage that is not shared with another chain.
    pub fn attach_stage<S: TransformStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.attach(Rc::new(RefCell::new(stage)))
    }

    /// Number of attached stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Folds the buffer through every attached stage in attachment order.
    ///
    /// Stateful stages keep their mutations across repeated `run` calls
    /// unless explicitly reset; a modulator shared between two chains
    /// accumulates integrator history across both.
    pub fn run(&self, input: SignalBuffer) -> DspResult<SignalBuffer> {
        let mut buffer = input;
        for stage in &self.stages {
            buffer = stage.borrow_mut().apply(buffer)?;
        }
        Ok(buffer)
    }
}
