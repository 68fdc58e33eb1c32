//! Training console: upload a dataset, pick hyperparameters, train

use async_trait::async_trait;
use domain_schema::{TrainingCommand, TrainingResponse, UploadEnvelope};
use thiserror::Error;

/// Proxy operations the console needs
#[async_trait]
pub trait TrainingGateway: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> UploadEnvelope;
    async fn train(&self, command: &TrainingCommand) -> TrainingResponse;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    #[error("Falha no upload: {0}")]
    UploadFailed(String),

    #[error("{0}")]
    InvalidParameters(String),

    #[error("Envie um arquivo antes de treinar o modelo")]
    NoDataset,
}

/// The five tunable training parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    pub hidden_layers: u32,
    pub neurons_per_layer: u32,
    pub learning_rate: f64,
    pub error_margin: f64,
    pub max_iterations: u32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        let defaults = TrainingCommand::with_defaults(String::new());
        Self {
            hidden_layers: defaults.hidden_layers,
            neurons_per_layer: defaults.neurons_per_layer,
            learning_rate: defaults.learning_rate,
            error_margin: defaults.error_margin,
            max_iterations: defaults.max_iterations,
        }
    }
}

impl Hyperparameters {
    pub fn into_command(self, encrypted_file_path: impl Into<String>) -> TrainingCommand {
        TrainingCommand {
            encrypted_file_path: encrypted_file_path.into(),
            hidden_layers: self.hidden_layers,
            neurons_per_layer: self.neurons_per_layer,
            learning_rate: self.learning_rate,
            error_margin: self.error_margin,
            max_iterations: self.max_iterations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleState {
    AwaitingFile,
    /// Upload accepted; the parameter dialog is open
    Parameters { encrypted_file_path: String },
    Done(TrainingResponse),
}

#[derive(Debug, Clone)]
pub struct TrainingConsole {
    state: ConsoleState,
}

impl Default for TrainingConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingConsole {
    pub fn new() -> Self {
        Self {
            state: ConsoleState::AwaitingFile,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    /// Reference of the uploaded dataset while the parameter dialog is open
    pub fn encrypted_file_path(&self) -> Option<&str> {
        match &self.state {
            ConsoleState::Parameters {
                encrypted_file_path,
            } => Some(encrypted_file_path),
            _ => None,
        }
    }

    /// Upload a dataset and open the parameter dialog on a 201 reply
    ///
    /// # Errors
    ///
    /// [`ConsoleError::UploadFailed`] with the proxy's message for any other
    /// reply, or when a 201 reply carries no file reference.
    pub async fn upload(
        &mut self,
        gateway: &dyn TrainingGateway,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<&str, ConsoleError> {
        let envelope = gateway.upload(file_name, bytes).await;

        let reference = envelope
            .is_created()
            .then(|| envelope.encrypted_file_reference())
            .flatten()
            .ok_or_else(|| {
                ConsoleError::UploadFailed(
                    envelope
                        .error
                        .clone()
                        .unwrap_or_else(|| format!("status {}", envelope.status)),
                )
            })?;

        tracing::debug!(status = envelope.status, "Dataset uploaded");
        self.state = ConsoleState::Parameters {
            encrypted_file_path: reference,
        };
        Ok(self.encrypted_file_path().unwrap_or_default())
    }

    /// Send the training command for the uploaded dataset
    ///
    /// # Errors
    ///
    /// [`ConsoleError::NoDataset`] before a successful upload and
    /// [`ConsoleError::InvalidParameters`] for values outside the suggested
    /// ranges; the gateway is not called in either case.
    pub async fn train(
        &mut self,
        gateway: &dyn TrainingGateway,
        parameters: Hyperparameters,
    ) -> Result<&TrainingResponse, ConsoleError> {
        let path = self
            .encrypted_file_path()
            .ok_or(ConsoleError::NoDataset)?
            .to_string();

        let command = parameters.into_command(path);
        command
            .check_suggested_ranges()
            .map_err(ConsoleError::InvalidParameters)?;

        let response = gateway.train(&command).await;
        self.state = ConsoleState::Done(response);
        match &self.state {
            ConsoleState::Done(response) => Ok(response),
            _ => Err(ConsoleError::NoDataset),
        }
    }

    pub fn reset(&mut self) {
        self.state = ConsoleState::AwaitingFile;
    }
}
