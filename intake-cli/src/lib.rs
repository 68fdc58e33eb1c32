//! CuraTB intake wizard and training console
//!
//! The terminal counterpart of the browser pages served in front of the
//! CuraTB proxy:
//!
//! - [`wizard`]: the thirteen-step patient intake, validated per step and
//!   submitted through a [`wizard::PredictionGateway`]
//! - [`console`]: dataset upload followed by a training run with tunable
//!   hyperparameters
//! - [`client`]: the HTTP client for the proxy, which never fails a call and
//!   instead returns error-shaped results
//! - [`render`]: colored text for results and status screens
//!
//! # Example
//!
//! ```rust,no_run
//! use intake_cli::{IntakeWizard, ProxyClient};
//!
//! # async fn run() -> error_common::Result<()> {
//! let client = ProxyClient::new("http://localhost:3000")?;
//! let mut wizard = IntakeWizard::default();
//! wizard.set_idade(45);
//! assert!(wizard.next());
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod console;
pub mod render;
pub mod wizard;

pub use client::{ProxyClient, CONNECTION_ERROR};
pub use console::{ConsoleError, ConsoleState, Hyperparameters, TrainingConsole, TrainingGateway};
pub use wizard::{IntakeWizard, PredictionGateway, Progress, WizardError, WizardState, STEP_COUNT};
