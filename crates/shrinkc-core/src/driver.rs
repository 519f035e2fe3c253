//! The fixpoint driver: sweeps a single method over the buffer, and the
//! outer loop that repeats all enabled methods until a full round accepts
//! nothing.

use std::collections::HashMap;

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::trial::TrialRunner;

/// Holds the enabled methods, sorted ascending by [`MethodId::priority`].
pub struct Registry {
    methods: Vec<Box<dyn Method>>,
    stats: HashMap<MethodId, MethodStats>,
}

impl Registry {
    /// Build a registry from a set of methods, sorting by priority.
    pub fn new(mut methods: Vec<Box<dyn Method>>) -> Self {
        methods.sort_by_key(|m| m.id().priority());
        let stats = methods.iter().map(|m| (m.id(), MethodStats::default())).collect();
        Self { methods, stats }
    }

    /// Per-method success/failure counters collected so far.
    pub fn stats(&self) -> &HashMap<MethodId, MethodStats> {
        &self.stats
    }

    /// Narrow the enabled method matching `id` to its concrete type `T`,
    /// e.g. `registry.method_as::<ReplaceRegex>(MethodId::ReplaceRegex)` to
    /// read its per-rule counters after a run.
    pub fn method_as<T: 'static>(&self, id: MethodId) -> Option<&T> {
        self.methods.iter().find(|m| m.id() == id).and_then(|m| m.as_any().downcast_ref::<T>())
    }

    /// Run one pass of a single method: sweep `pos` from 0 to `buf.len()`,
    /// or, for one-shot methods, attempt exactly once. Returns whether any
    /// edit was accepted during the pass.
    fn run_pass(
        &mut self,
        idx: usize,
        buf: &mut Buffer,
        runner: &mut dyn TrialRunner,
    ) -> Result<bool, CoreError> {
        runner.sanity_check()?;
        let method = &mut self.methods[idx];
        let id = method.id();
        let stats = self.stats.entry(id).or_default();

        if method.is_one_shot() {
            let mut pos = 0usize;
            let worked = method.try_at(buf, &mut pos, runner, stats)?;
            return Ok(worked);
        }

        let mut pos = 0usize;
        let mut any_success = false;
        while pos < buf.len() {
            let worked = method.try_at(buf, &mut pos, runner, stats)?;
            if worked {
                any_success = true;
            } else {
                pos += 1;
            }
        }
        Ok(any_success)
    }

    /// Run every enabled method once, in priority order. Returns whether
    /// any method accepted an edit during this round. Callers that need to
    /// act at the start of each outer pass (snapshotting, progress
    /// reporting) should call this directly in their own loop instead of
    /// [`run_to_fixpoint`](Self::run_to_fixpoint), since that hook would
    /// otherwise need a second mutable borrow of `runner`.
    pub fn run_round(&mut self, buf: &mut Buffer, runner: &mut dyn TrialRunner) -> Result<bool, CoreError> {
        let mut round_success = false;
        for idx in 0..self.methods.len() {
            let worked = self.run_pass(idx, buf, runner)?;
            round_success |= worked;
        }
        Ok(round_success)
    }

    /// Run outer passes over all enabled methods, in priority order, until
    /// one full round accepts zero edits anywhere. Returns the number of
    /// outer rounds executed.
    pub fn run_to_fixpoint(
        &mut self,
        buf: &mut Buffer,
        runner: &mut dyn TrialRunner,
        mut on_round: impl FnMut(u32),
    ) -> Result<u32, CoreError> {
        let mut round: u32 = 0;
        loop {
            round += 1;
            on_round(round);
            if !self.run_round(buf, runner)? {
                return Ok(round);
            }
        }
    }
}
