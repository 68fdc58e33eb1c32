//! `curatb` - terminal front end for the CuraTB proxy
//!
//! ## Commands
//!
//! - `curatb analyze` - fill in the intake wizard and get a cure-time prediction
//! - `curatb upload <file>` - upload a training dataset
//! - `curatb train <file>` - upload a dataset and train the network on it
//! - `curatb status` - show whether the backend holds a trained model

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use config_engine::{AgePolicy, Settings};
use error_common::{log_error, CuraError, Result};
use intake_cli::wizard::{choices_for, step_field, step_title};
use intake_cli::{
    render, Hyperparameters, IntakeWizard, ProxyClient, TrainingConsole, WizardState, STEP_COUNT,
};
use logger_redacted::{init_tracing, LoggerConfig};

/// Typed at the age prompt to return to the previous step
const BACK_KEYWORD: &str = "<";

#[derive(Parser)]
#[command(name = "curatb")]
#[command(author, version, about = "Tuberculosis cure-time intake and training console")]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (TOML, or YAML by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Proxy base URL, overriding the settings file
    #[arg(long, global = true, env = "CURATB_PROXY_URL")]
    proxy_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the patient intake wizard (default)
    Analyze,

    /// Upload a dataset and print its encrypted reference
    Upload {
        file: PathBuf,
    },

    /// Upload a dataset and train the network on it
    Train {
        file: PathBuf,

        /// Take the hyperparameters from the flags without prompting
        #[arg(long)]
        no_input: bool,

        #[arg(long, default_value_t = 2)]
        hidden_layers: u32,

        #[arg(long, default_value_t = 10)]
        neurons_per_layer: u32,

        #[arg(long, default_value_t = 0.1)]
        learning_rate: f64,

        #[arg(long, default_value_t = 0.01)]
        error_margin: f64,

        #[arg(long, default_value_t = 1000)]
        max_iterations: u32,
    },

    /// Show whether the backend holds a trained model
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let logger = LoggerConfig::for_service("intake-cli")
        .verbose(cli.verbose)
        .with_environment();
    init_tracing(&logger).map_err(|e| CuraError::Internal(e.to_string()))?;

    let mut settings = Settings::load(cli.config.as_deref())
        .map_err(|e| CuraError::Config(e.to_string()))?
        .client;
    if let Some(proxy_url) = cli.proxy_url {
        settings.proxy_url = proxy_url;
    }
    let client = ProxyClient::new(settings.proxy_base())?;

    let outcome = match cli.command.unwrap_or(Commands::Analyze) {
        Commands::Analyze => analyze(&client, settings.age_policy).await,
        Commands::Upload { file } => upload(&client, &file).await,
        Commands::Train {
            file,
            no_input,
            hidden_layers,
            neurons_per_layer,
            learning_rate,
            error_margin,
            max_iterations,
        } => {
            let defaults = Hyperparameters {
                hidden_layers,
                neurons_per_layer,
                learning_rate,
                error_margin,
                max_iterations,
            };
            train(&client, &file, defaults, no_input).await
        }
        Commands::Status => status(&client).await,
    };

    if let Err(e) = &outcome {
        log_error("curatb", e);
    }
    outcome
}

fn prompt_error(error: dialoguer::Error) -> CuraError {
    CuraError::Internal(format!("Prompt failed: {}", error))
}

/// Show a spinner while `future` runs
async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

async fn analyze(client: &ProxyClient, age_policy: AgePolicy) -> Result<()> {
    println!();
    println!("{}", "Análise de Tuberculose RNA".bold().cyan());
    println!("{}", "Preencha os dados do paciente para análise do tempo de cura".dimmed());

    let status = with_spinner("Verificando o modelo...", client.model_status()).await;
    if !status.is_trained {
        println!("{}", render::model_status_report(&status));
    }

    let mut wizard = IntakeWizard::new(age_policy);
    loop {
        let step = match wizard.state() {
            WizardState::Step(step) => step,
            WizardState::Result => {
                if let Some(result) = wizard.result() {
                    println!();
                    println!("{}", render::prediction_report(result));
                }
                let again = Confirm::new()
                    .with_prompt("Nova análise?")
                    .default(false)
                    .interact()
                    .map_err(prompt_error)?;
                if !again {
                    return Ok(());
                }
                wizard.reset();
                continue;
            }
        };

        let title = step_title(step).unwrap_or_default();
        let field = step_field(step).unwrap_or_default();
        println!();
        println!("{}", render::progress_header(title, wizard.progress()));
        if let Some(error) = wizard.error_for(field) {
            println!("{}", error.red());
        }

        let went_back = if step == 0 {
            ask_age(&mut wizard)?
        } else {
            ask_choice(&mut wizard, step, title)?
        };
        if went_back {
            wizard.previous();
            continue;
        }

        if step + 1 < STEP_COUNT {
            wizard.next();
            continue;
        }

        println!();
        println!("{}", render::summary_table(&wizard.summary()));
        let send = Confirm::new()
            .with_prompt("Enviar análise?")
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if !send {
            wizard.previous();
            continue;
        }

        if let Err(e) = with_spinner("Analisando...", wizard.submit(client)).await {
            println!("{}", e.to_string().red());
        }
    }
}

/// Returns whether the user asked to go back
fn ask_age(wizard: &mut IntakeWizard) -> Result<bool> {
    let current = wizard.draft().idade.map(|idade| idade.to_string());
    let mut prompt = Input::<String>::new()
        .with_prompt(format!("Idade (anos, '{}' volta)", BACK_KEYWORD))
        .allow_empty(true);
    if let Some(current) = current {
        prompt = prompt.default(current);
    }
    let answer = prompt.interact_text().map_err(prompt_error)?;

    match answer.trim() {
        "" => {}
        BACK_KEYWORD => return Ok(true),
        text => match text.parse::<u32>() {
            Ok(idade) => wizard.set_idade(idade),
            Err(_) => println!("{}", "Informe a idade em anos, apenas números".red()),
        },
    }
    Ok(false)
}

/// Returns whether the user asked to go back
fn ask_choice(wizard: &mut IntakeWizard, step: usize, title: &str) -> Result<bool> {
    let choices = choices_for(step);
    let mut items: Vec<&str> = choices.iter().map(|choice| choice.label).collect();
    items.push("← Anterior");

    let picked = Select::new()
        .with_prompt(title)
        .items(&items)
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    match choices.get(picked) {
        Some(choice) => {
            wizard
                .select(step, &choice.code)
                .map_err(|e| CuraError::Validation(e.to_string()))?;
            Ok(false)
        }
        None => Ok(true),
    }
}

async fn upload(client: &ProxyClient, file: &Path) -> Result<()> {
    let envelope = with_spinner("Enviando arquivo...", client.upload_file(file)).await?;
    println!("{}", render::upload_report(&envelope));
    Ok(())
}

async fn train(
    client: &ProxyClient,
    file: &Path,
    defaults: Hyperparameters,
    no_input: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dataset")
        .to_string();

    let mut console = TrainingConsole::new();
    let uploaded = with_spinner("Enviando arquivo...", console.upload(client, &file_name, bytes)).await;
    match uploaded {
        Ok(reference) => println!("{} {}", "Arquivo enviado:".green().bold(), reference),
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    }

    let parameters = if no_input {
        defaults
    } else {
        ask_hyperparameters(defaults)?
    };

    match with_spinner("Treinando a rede neural...", console.train(client, parameters)).await {
        Ok(response) => println!("{}", render::training_report(response)),
        Err(e) => println!("{}", e.to_string().red()),
    }
    Ok(())
}

fn ask_hyperparameters(defaults: Hyperparameters) -> Result<Hyperparameters> {
    println!();
    println!("{}", "Parâmetros de Treinamento".bold());

    Ok(Hyperparameters {
        hidden_layers: Input::new()
            .with_prompt("Camadas ocultas (1-10)")
            .default(defaults.hidden_layers)
            .interact_text()
            .map_err(prompt_error)?,
        neurons_per_layer: Input::new()
            .with_prompt("Neurônios por camada (1-1000)")
            .default(defaults.neurons_per_layer)
            .interact_text()
            .map_err(prompt_error)?,
        learning_rate: Input::new()
            .with_prompt("Taxa de aprendizado (0-1)")
            .default(defaults.learning_rate)
            .interact_text()
            .map_err(prompt_error)?,
        error_margin: Input::new()
            .with_prompt("Margem de erro (0-1)")
            .default(defaults.error_margin)
            .interact_text()
            .map_err(prompt_error)?,
        max_iterations: Input::new()
            .with_prompt("Máximo de iterações")
            .default(defaults.max_iterations)
            .interact_text()
            .map_err(prompt_error)?,
    })
}

async fn status(client: &ProxyClient) -> Result<()> {
    let status = with_spinner("Consultando o modelo...", client.model_status()).await;
    println!("{}", render::model_status_report(&status));
    Ok(())
}
