//! Sequential step executor with reverse-order rollback.

use tracing::{debug, info, instrument, warn};

use crate::{
    application::error::{ApplicationError, RollbackFailure},
    domain::PipelineContext,
    error::GgamiResult,
};

/// One unit of work in a generation run.
///
/// `rollback` undoes only what `execute` itself created, and is called only
/// for steps whose `execute` succeeded.
pub trait PipelineStep {
    /// Collaborators the step needs besides the context.
    type Env: ?Sized;

    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    fn execute(&self, ctx: &mut PipelineContext, env: &Self::Env) -> GgamiResult<()>;

    fn rollback(&self, ctx: &mut PipelineContext, env: &Self::Env) -> GgamiResult<()>;
}

/// An ordered list of steps.
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    steps: Vec<S>,
}

impl<S: PipelineStep> Pipeline<S> {
    pub fn new(steps: Vec<S>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(PipelineStep::name).collect()
    }

    /// Run every step in order.
    ///
    /// On the first failure the steps that already completed are rolled back
    /// newest first and the error is returned wrapped in
    /// [`ApplicationError::StepFailed`]. Rollback keeps going past its own
    /// failures; those are attached to the returned error. Steps after the
    /// failing one never run.
    #[instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn run(&self, ctx: &mut PipelineContext, env: &S::Env) -> GgamiResult<()> {
        let mut completed: Vec<&S> = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            info!(step = step.name(), "Running step");

            if let Err(cause) = step.execute(ctx, env) {
                warn!(step = step.name(), error = %cause, "Step failed, rolling back");
                let rollback_failures = Self::roll_back(&completed, ctx, env);

                return Err(ApplicationError::StepFailed {
                    step: step.name(),
                    cause: Box::new(cause),
                    rollback_failures,
                }
                .into());
            }

            completed.push(step);
        }

        info!("Pipeline completed");
        Ok(())
    }

    fn roll_back(
        completed: &[&S],
        ctx: &mut PipelineContext,
        env: &S::Env,
    ) -> Vec<RollbackFailure> {
        let mut failures = Vec::new();

        for step in completed.iter().rev() {
            debug!(step = step.name(), "Rolling back");
            if let Err(e) = step.rollback(ctx, env) {
                warn!(step = step.name(), error = %e, "Rollback failed");
                failures.push(RollbackFailure {
                    step: step.name(),
                    reason: e.to_string(),
                });
            }
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        domain::{DomainError, ProjectConfig},
        error::GgamiError,
    };

    /// Records every call into the shared journal.
    struct Recording {
        name: &'static str,
        fail_execute: bool,
        fail_rollback: bool,
    }

    impl Recording {
        fn ok(name: &'static str) -> Self {
            Self {
                name,
                fail_execute: false,
                fail_rollback: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail_execute: true,
                ..Self::ok(name)
            }
        }

        fn bad_rollback(name: &'static str) -> Self {
            Self {
                fail_rollback: true,
                ..Self::ok(name)
            }
        }
    }

    impl PipelineStep for Recording {
        type Env = RefCell<Vec<String>>;

        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&self, _ctx: &mut PipelineContext, env: &Self::Env) -> GgamiResult<()> {
            env.borrow_mut().push(format!("exec {}", self.name));
            if self.fail_execute {
                return Err(DomainError::UnknownModule { id: "boom".into() }.into());
            }
            Ok(())
        }

        fn rollback(&self, _ctx: &mut PipelineContext, env: &Self::Env) -> GgamiResult<()> {
            env.borrow_mut().push(format!("undo {}", self.name));
            if self.fail_rollback {
                return Err(GgamiError::Internal {
                    message: format!("{} stuck", self.name),
                });
            }
            Ok(())
        }
    }

    fn ctx() -> PipelineContext {
        PipelineContext::new(ProjectConfig::new("blog", "/out/blog"), "go")
    }

    #[test]
    fn runs_all_steps_in_order() {
        let pipeline = Pipeline::new(vec![Recording::ok("a"), Recording::ok("b")]);
        let journal = RefCell::new(Vec::new());

        pipeline.run(&mut ctx(), &journal).unwrap();
        assert_eq!(*journal.borrow(), ["exec a", "exec b"]);
    }

    #[test]
    fn failure_rolls_back_completed_steps_in_reverse() {
        let pipeline = Pipeline::new(vec![
            Recording::ok("s1"),
            Recording::ok("s2"),
            Recording::ok("s3"),
            Recording::failing("s4"),
            Recording::ok("s5"),
        ]);
        let journal = RefCell::new(Vec::new());

        let err = pipeline.run(&mut ctx(), &journal).unwrap_err();

        assert_eq!(
            *journal.borrow(),
            [
                "exec s1", "exec s2", "exec s3", "exec s4", "undo s3", "undo s2", "undo s1"
            ]
        );
        match err {
            GgamiError::Application(ApplicationError::StepFailed {
                step,
                rollback_failures,
                ..
            }) => {
                assert_eq!(step, "s4");
                assert!(rollback_failures.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rollback_is_best_effort_and_reported() {
        let pipeline = Pipeline::new(vec![
            Recording::ok("s1"),
            Recording::bad_rollback("s2"),
            Recording::failing("s3"),
        ]);
        let journal = RefCell::new(Vec::new());

        let err = pipeline.run(&mut ctx(), &journal).unwrap_err();

        // s1 still rolled back after s2's rollback failed
        assert_eq!(
            *journal.borrow(),
            ["exec s1", "exec s2", "exec s3", "undo s2", "undo s1"]
        );
        let msg = err.to_string();
        assert!(msg.starts_with("step 's3' failed: "));
        assert!(msg.contains("rollback of 's2' also failed: Internal error: s2 stuck"));
    }

    #[test]
    fn first_step_failure_rolls_back_nothing() {
        let pipeline = Pipeline::new(vec![Recording::failing("s1"), Recording::ok("s2")]);
        let journal = RefCell::new(Vec::new());

        assert!(pipeline.run(&mut ctx(), &journal).is_err());
        assert_eq!(*journal.borrow(), ["exec s1"]);
    }

    #[test]
    fn step_names_in_order() {
        let pipeline = Pipeline::new(vec![Recording::ok("x"), Recording::ok("y")]);
        assert_eq!(pipeline.step_names(), ["x", "y"]);
    }
}
