// core/workflow.rs

//! # Workflow Orchestrator
//!
//! Sequences one pass of the staged Terraform workflow:
//!
//! ```text
//! Start -> Initialized -> plan                     -> Done
//!                      -> plan -> confirm -> apply -> Done
//!                      -> confirm -> destroy       -> Done
//! ```
//!
//! Any failing step ends the pass with an error and nothing after it runs.
//! Refusing a confirmation is not a failure: the pass ends with
//! [`Outcome::Cancelled`].

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Local;
use log::{debug, info};

use crate::core::confirm::ConfirmationGate;
use crate::core::plan::{produce_plan, tfvars_path, PlanArtifact};
use crate::core::runner::CommandExecutor;
use crate::core::stage::{Action, Stage};
use crate::error::AppError;
use crate::utils::display::{print_unicode_box, BorderColor};

/// Settings for one invocation.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub stage: Stage,
    /// Directory Terraform runs in.
    pub working_dir: PathBuf,
    /// Secret variables layered over the inherited environment.
    pub env: HashMap<String, String>,
}

/// Terminal state of a workflow pass that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Planned(PlanArtifact),
    Applied(PlanArtifact),
    Destroyed,
    /// The operator answered `no`.
    Cancelled,
}

pub struct Workflow<E, G> {
    context: WorkflowContext,
    executor: E,
    gate: G,
}

impl<E: CommandExecutor, G: ConfirmationGate> Workflow<E, G> {
    pub fn new(context: WorkflowContext, executor: E, gate: G) -> Self {
        Self {
            context,
            executor,
            gate,
        }
    }

    /// Run `action` after an unconditional `terraform init`.
    pub fn run(&mut self, action: Action) -> Result<Outcome, AppError> {
        debug!(
            "Starting {} workflow for stage {} in {}",
            action,
            self.context.stage,
            self.context.working_dir.display()
        );

        self.init()?;

        match action {
            Action::Plan => self.plan().map(Outcome::Planned),
            Action::Apply => self.apply(),
            Action::Destroy => self.destroy(),
        }
    }

    fn init(&mut self) -> Result<(), AppError> {
        self.terraform(vec!["init".to_string()])
    }

    fn plan(&mut self) -> Result<PlanArtifact, AppError> {
        let WorkflowContext {
            stage,
            working_dir,
            env,
        } = &self.context;

        let artifact = produce_plan(&mut self.executor, *stage, working_dir, env, Local::now())?
            .ok_or(AppError::PlanFailed(*stage))?;
        debug!(
            "Plan for stage {} stamped {}: {}",
            artifact.stage,
            artifact.timestamp,
            artifact.path.display()
        );
        Ok(artifact)
    }

    fn apply(&mut self) -> Result<Outcome, AppError> {
        let artifact = self.plan()?;
        let stage = self.context.stage;

        print_unicode_box(
            &format!(
                "Terraform plan saved to: {}",
                self.context.working_dir.join(&artifact.path).display()
            ),
            BorderColor::Yellow,
        );

        let prompt = format!("Apply this plan to the '{}' stage? (yes/no): ", stage);
        if !self.gate.confirm(&prompt)? {
            info!("Operator declined to apply {}", artifact.path.display());
            return Ok(Outcome::Cancelled);
        }

        println!("--- Confirmed. Applying '{}'. ---", artifact.path.display());
        self.terraform(vec!["apply".to_string(), artifact.arg()])?;
        Ok(Outcome::Applied(artifact))
    }

    fn destroy(&mut self) -> Result<Outcome, AppError> {
        let stage = self.context.stage;
        println!("--- Starting destroy for the '{}' stage. ---", stage);

        print_unicode_box(
            &format!(
                "WARNING: every Terraform resource in the '{}' stage will be destroyed.",
                stage
            ),
            BorderColor::Red,
        );

        let prompt = format!("Really destroy the '{}' stage? (yes/no): ", stage);
        if !self.gate.confirm(&prompt)? {
            info!("Operator declined to destroy stage {}", stage);
            return Ok(Outcome::Cancelled);
        }

        println!("--- Confirmed. Destroying the '{}' stage. ---", stage);
        self.terraform(vec![
            "destroy".to_string(),
            format!("-var-file={}", tfvars_path(stage).display()),
            "-auto-approve".to_string(),
        ])?;
        Ok(Outcome::Destroyed)
    }

    /// Run one Terraform command, turning a nonzero exit into an error.
    fn terraform(&mut self, args: Vec<String>) -> Result<(), AppError> {
        let result = self
            .executor
            .run(&args, &self.context.working_dir, &self.context.env)?;
        if result.success {
            Ok(())
        } else {
            Err(AppError::CommandFailed {
                command: format!("terraform {}", args.join(" ")),
                code: result.code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::runner::CommandResult;
    use clap::ValueEnum;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records every command and fails the subcommands listed in `failing`.
    #[derive(Clone, Default)]
    struct FakeTerraform {
        calls: Rc<RefCell<Vec<Vec<String>>>>,
        failing: Vec<&'static str>,
    }

    impl FakeTerraform {
        fn failing(subcommands: &[&'static str]) -> Self {
            Self {
                failing: subcommands.to_vec(),
                ..Self::default()
            }
        }

        fn subcommands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c[0].clone()).collect()
        }
    }

    impl CommandExecutor for FakeTerraform {
        fn run(
            &mut self,
            args: &[String],
            _dir: &Path,
            _env: &HashMap<String, String>,
        ) -> Result<CommandResult, AppError> {
            self.calls.borrow_mut().push(args.to_vec());
            if self.failing.iter().any(|f| *f == args[0]) {
                Ok(CommandResult::failed(1))
            } else {
                Ok(CommandResult::ok())
            }
        }
    }

    /// Replays scripted answers and counts how often it was asked.
    #[derive(Clone, Default)]
    struct ScriptedGate {
        answers: Rc<RefCell<VecDeque<bool>>>,
        asked: Rc<RefCell<usize>>,
    }

    impl ScriptedGate {
        fn answering(answers: &[bool]) -> Self {
            Self {
                answers: Rc::new(RefCell::new(answers.iter().copied().collect())),
                ..Self::default()
            }
        }

        fn asked(&self) -> usize {
            *self.asked.borrow()
        }
    }

    impl ConfirmationGate for ScriptedGate {
        fn confirm(&mut self, _prompt: &str) -> Result<bool, AppError> {
            *self.asked.borrow_mut() += 1;
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or(AppError::PromptClosed)
        }
    }

    fn workflow(
        stage: Stage,
        dir: &TempDir,
        terraform: &FakeTerraform,
        gate: &ScriptedGate,
    ) -> Workflow<FakeTerraform, ScriptedGate> {
        let context = WorkflowContext {
            stage,
            working_dir: dir.path().to_path_buf(),
            env: HashMap::new(),
        };
        Workflow::new(context, terraform.clone(), gate.clone())
    }

    #[test]
    fn test_plan_never_applies_or_destroys() {
        for &stage in Stage::value_variants() {
            let dir = TempDir::new().unwrap();
            let terraform = FakeTerraform::default();
            let gate = ScriptedGate::default();

            let outcome = workflow(stage, &dir, &terraform, &gate)
                .run(Action::Plan)
                .unwrap();

            assert!(matches!(outcome, Outcome::Planned(ref a) if a.stage == stage));
            assert_eq!(terraform.subcommands(), vec!["init", "plan"]);
            assert_eq!(gate.asked(), 0);
        }
    }

    #[test]
    fn test_dev_plan_reports_path_under_plans() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::default();
        let gate = ScriptedGate::default();

        let outcome = workflow(Stage::Dev, &dir, &terraform, &gate)
            .run(Action::Plan)
            .unwrap();

        let Outcome::Planned(artifact) = outcome else {
            panic!("expected a plan artifact");
        };
        assert!(artifact.path.starts_with("plans"));
        let name = artifact.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("dev_"));
        assert!(name.ends_with(".tfplan"));
    }

    #[test]
    fn test_failing_init_stops_everything() {
        for action in [Action::Plan, Action::Apply, Action::Destroy] {
            for _ in 0..2 {
                let dir = TempDir::new().unwrap();
                let terraform = FakeTerraform::failing(&["init"]);
                let gate = ScriptedGate::answering(&[true]);

                let err = workflow(Stage::Dev, &dir, &terraform, &gate)
                    .run(action)
                    .unwrap_err();

                assert!(matches!(err, AppError::CommandFailed { ref command, .. } if command == "terraform init"));
                assert_eq!(terraform.subcommands(), vec!["init"]);
                assert_eq!(gate.asked(), 0);
                assert!(!dir.path().join("plans").exists());
            }
        }
    }

    #[test]
    fn test_apply_runs_the_produced_plan() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::default();
        let gate = ScriptedGate::answering(&[true]);

        let outcome = workflow(Stage::Dev, &dir, &terraform, &gate)
            .run(Action::Apply)
            .unwrap();

        let Outcome::Applied(artifact) = outcome else {
            panic!("expected apply");
        };
        let calls = terraform.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], vec!["apply".to_string(), artifact.arg()]);
        assert_eq!(
            calls[1][2],
            format!("-out={}", artifact.path.display())
        );
    }

    #[test]
    fn test_apply_refused_is_cancelled_not_failed() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::default();
        let gate = ScriptedGate::answering(&[false]);

        let outcome = workflow(Stage::Dev, &dir, &terraform, &gate)
            .run(Action::Apply)
            .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(terraform.subcommands(), vec!["init", "plan"]);
        assert_eq!(gate.asked(), 1);
    }

    #[test]
    fn test_apply_skips_confirmation_when_plan_fails() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::failing(&["plan"]);
        let gate = ScriptedGate::answering(&[true]);

        let err = workflow(Stage::Prod, &dir, &terraform, &gate)
            .run(Action::Apply)
            .unwrap_err();

        assert!(matches!(err, AppError::PlanFailed(Stage::Prod)));
        assert_eq!(terraform.subcommands(), vec!["init", "plan"]);
        assert_eq!(gate.asked(), 0);
    }

    #[test]
    fn test_apply_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::failing(&["apply"]);
        let gate = ScriptedGate::answering(&[true]);

        let err = workflow(Stage::Dev, &dir, &terraform, &gate)
            .run(Action::Apply)
            .unwrap_err();

        assert!(matches!(err, AppError::CommandFailed { code: Some(1), .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_prod_destroy_refused_never_destroys() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::default();
        let gate = ScriptedGate::answering(&[false]);

        let outcome = workflow(Stage::Prod, &dir, &terraform, &gate)
            .run(Action::Destroy)
            .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(terraform.subcommands(), vec!["init"]);
    }

    #[test]
    fn test_destroy_confirmed_uses_stage_vars_and_auto_approve() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::default();
        let gate = ScriptedGate::answering(&[true]);

        let outcome = workflow(Stage::Prod, &dir, &terraform, &gate)
            .run(Action::Destroy)
            .unwrap();

        assert_eq!(outcome, Outcome::Destroyed);
        let calls = terraform.calls.borrow();
        assert_eq!(
            calls[1],
            vec![
                "destroy".to_string(),
                format!("-var-file={}", tfvars_path(Stage::Prod).display()),
                "-auto-approve".to_string(),
            ]
        );
        // Destroy never produces a plan
        assert!(!dir.path().join("plans").exists());
    }

    #[test]
    fn test_destroy_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let terraform = FakeTerraform::failing(&["destroy"]);
        let gate = ScriptedGate::answering(&[true]);

        let err = workflow(Stage::Dev, &dir, &terraform, &gate)
            .run(Action::Destroy)
            .unwrap_err();

        assert!(matches!(err, AppError::CommandFailed { ref command, .. } if command.starts_with("terraform destroy")));
    }
}
